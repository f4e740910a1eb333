// SysV IPC: keys, resource flags, control commands

use super::Xlat;

pub const IPC_64: u64 = 0x100;

pub static IPC_PRIVATE: Xlat = Xlat::values(&[(0, "IPC_PRIVATE")]);

pub static RESOURCE_FLAGS: Xlat = Xlat::flags(&[
    (0o1000, "IPC_CREAT"),
    (0o2000, "IPC_EXCL"),
]);

pub static SHM_RESOURCE_FLAGS: Xlat = Xlat::flags(&[
    (0o1000, "IPC_CREAT"),
    (0o2000, "IPC_EXCL"),
    (0o4000, "SHM_HUGETLB"),
    (0o10000, "SHM_NORESERVE"),
]);

pub const SHM_HUGE_SHIFT: u64 = 26;
pub const SHM_HUGE_MASK: u64 = 0x3f;

pub static MSG_FLAGS: Xlat = Xlat::flags(&[
    (0o4000, "IPC_NOWAIT"),
    (0o10000, "MSG_NOERROR"),
    (0o20000, "MSG_EXCEPT"),
    (0o40000, "MSG_COPY"),
]);

pub static SEMOP_FLAGS: Xlat = Xlat::flags(&[
    (0o4000, "IPC_NOWAIT"),
    (0x1000, "SEM_UNDO"),
]);

pub static SHM_FLAGS: Xlat = Xlat::flags(&[
    (0o10000, "SHM_RDONLY"),
    (0o20000, "SHM_RND"),
    (0o40000, "SHM_REMAP"),
    (0o100000, "SHM_EXEC"),
]);

pub const IPC_RMID: u64 = 0;
pub const IPC_SET: u64 = 1;
pub const IPC_STAT: u64 = 2;
pub const IPC_INFO: u64 = 3;

pub const MSG_STAT: u64 = 11;
pub const MSG_INFO: u64 = 12;
pub const MSG_STAT_ANY: u64 = 13;

pub const GETPID: u64 = 11;
pub const GETVAL: u64 = 12;
pub const GETALL: u64 = 13;
pub const GETNCNT: u64 = 14;
pub const GETZCNT: u64 = 15;
pub const SETVAL: u64 = 16;
pub const SETALL: u64 = 17;
pub const SEM_STAT: u64 = 18;
pub const SEM_INFO: u64 = 19;
pub const SEM_STAT_ANY: u64 = 20;

pub const SHM_LOCK: u64 = 11;
pub const SHM_UNLOCK: u64 = 12;
pub const SHM_STAT: u64 = 13;
pub const SHM_INFO: u64 = 14;
pub const SHM_STAT_ANY: u64 = 15;

pub static MSGCTL_FLAGS: Xlat = Xlat::values(&[
    (IPC_RMID, "IPC_RMID"),
    (IPC_SET, "IPC_SET"),
    (IPC_STAT, "IPC_STAT"),
    (IPC_INFO, "IPC_INFO"),
    (MSG_STAT, "MSG_STAT"),
    (MSG_INFO, "MSG_INFO"),
    (MSG_STAT_ANY, "MSG_STAT_ANY"),
]);

pub static SEMCTL_FLAGS: Xlat = Xlat::values(&[
    (IPC_RMID, "IPC_RMID"),
    (IPC_SET, "IPC_SET"),
    (IPC_STAT, "IPC_STAT"),
    (IPC_INFO, "IPC_INFO"),
    (GETPID, "GETPID"),
    (GETVAL, "GETVAL"),
    (GETALL, "GETALL"),
    (GETNCNT, "GETNCNT"),
    (GETZCNT, "GETZCNT"),
    (SETVAL, "SETVAL"),
    (SETALL, "SETALL"),
    (SEM_STAT, "SEM_STAT"),
    (SEM_INFO, "SEM_INFO"),
    (SEM_STAT_ANY, "SEM_STAT_ANY"),
]);

pub static SHMCTL_FLAGS: Xlat = Xlat::values(&[
    (IPC_RMID, "IPC_RMID"),
    (IPC_SET, "IPC_SET"),
    (IPC_STAT, "IPC_STAT"),
    (IPC_INFO, "IPC_INFO"),
    (SHM_LOCK, "SHM_LOCK"),
    (SHM_UNLOCK, "SHM_UNLOCK"),
    (SHM_STAT, "SHM_STAT"),
    (SHM_INFO, "SHM_INFO"),
    (SHM_STAT_ANY, "SHM_STAT_ANY"),
]);

/// sub-call numbers of the multiplexed `ipc` syscall
pub static IPC_CALLS: Xlat = Xlat::values(&[
    (1, "semop"),
    (2, "semget"),
    (3, "semctl"),
    (4, "semtimedop"),
    (11, "msgsnd"),
    (12, "msgrcv"),
    (13, "msgget"),
    (14, "msgctl"),
    (21, "shmat"),
    (22, "shmdt"),
    (23, "shmget"),
    (24, "shmctl"),
])
.dec();
