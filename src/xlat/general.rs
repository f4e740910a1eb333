// tables shared by the file, mount, signal and ioctl decoders

use super::Xlat;

pub const AT_FDCWD: i32 = -100;

pub static OPEN_ACCESS_MODES: Xlat = Xlat::values(&[
    (0o0, "O_RDONLY"),
    (0o1, "O_WRONLY"),
    (0o2, "O_RDWR"),
    (0o3, "O_ACCMODE"),
]);

pub const O_ACCMODE: u64 = 0o3;
pub const O_CREAT: u64 = 0o100;
pub const O_TMPFILE: u64 = 0o20200000;

// multi-bit groups first: O_TMPFILE carries O_DIRECTORY, O_SYNC carries O_DSYNC
pub static OPEN_MODE_FLAGS: Xlat = Xlat::flags(&[
    (0o20200000, "O_TMPFILE"),
    (0o4010000, "O_SYNC"),
    (0o100, "O_CREAT"),
    (0o200, "O_EXCL"),
    (0o400, "O_NOCTTY"),
    (0o1000, "O_TRUNC"),
    (0o2000, "O_APPEND"),
    (0o4000, "O_NONBLOCK"),
    (0o10000, "O_DSYNC"),
    (0o20000, "O_ASYNC"),
    (0o40000, "O_DIRECT"),
    (0o100000, "O_LARGEFILE"),
    (0o200000, "O_DIRECTORY"),
    (0o400000, "O_NOFOLLOW"),
    (0o1000000, "O_NOATIME"),
    (0o2000000, "O_CLOEXEC"),
    (0o10000000, "O_PATH"),
]);

pub static DUP3_FLAGS: Xlat = Xlat::flags(&[(0o2000000, "O_CLOEXEC")]);

pub static INOTIFY_INIT_FLAGS: Xlat = Xlat::flags(&[
    (0o4000, "IN_NONBLOCK"),
    (0o2000000, "IN_CLOEXEC"),
]);

pub static MOUNT_SETATTR_FLAGS: Xlat = Xlat::flags(&[
    (0x100, "AT_SYMLINK_NOFOLLOW"),
    (0x800, "AT_NO_AUTOMOUNT"),
    (0x1000, "AT_EMPTY_PATH"),
    (0x8000, "AT_RECURSIVE"),
]);

pub const MOUNT_ATTR__ATIME: u64 = 0x70;

pub static MOUNT_ATTR_FLAGS: Xlat = Xlat::flags(&[
    (0x1, "MOUNT_ATTR_RDONLY"),
    (0x2, "MOUNT_ATTR_NOSUID"),
    (0x4, "MOUNT_ATTR_NODEV"),
    (0x8, "MOUNT_ATTR_NOEXEC"),
    (0x80, "MOUNT_ATTR_NODIRATIME"),
    (0x100000, "MOUNT_ATTR_IDMAP"),
    (0x200000, "MOUNT_ATTR_NOSYMFOLLOW"),
]);

// the atime field of mount_attr is an enumeration living inside the flag word
pub static MOUNT_ATTR_ATIME: Xlat = Xlat::values(&[
    (0x00, "MOUNT_ATTR_RELATIME"),
    (0x10, "MOUNT_ATTR_NOATIME"),
    (0x20, "MOUNT_ATTR_STRICTATIME"),
]);

pub static MOUNT_PROPAGATION: Xlat = Xlat::values(&[
    (1 << 17, "MS_UNBINDABLE"),
    (1 << 18, "MS_PRIVATE"),
    (1 << 19, "MS_SLAVE"),
    (1 << 20, "MS_SHARED"),
]);

pub static USERFAULTFD_FLAGS: Xlat = Xlat::flags(&[
    (0x1, "UFFD_USER_MODE_ONLY"),
    (0o4000, "O_NONBLOCK"),
    (0o2000000, "O_CLOEXEC"),
]);

pub static SIGPROCMASK_CMDS: Xlat = Xlat::values(&[
    (0, "SIG_BLOCK"),
    (1, "SIG_UNBLOCK"),
    (2, "SIG_SETMASK"),
]);

pub const SIGRTMIN: u32 = 32;
pub const SIGRTMAX: u32 = 64;

pub static SIGNAL_NAMES: Xlat = Xlat::values(&[
    (1, "SIGHUP"),
    (2, "SIGINT"),
    (3, "SIGQUIT"),
    (4, "SIGILL"),
    (5, "SIGTRAP"),
    (6, "SIGABRT"),
    (7, "SIGBUS"),
    (8, "SIGFPE"),
    (9, "SIGKILL"),
    (10, "SIGUSR1"),
    (11, "SIGSEGV"),
    (12, "SIGUSR2"),
    (13, "SIGPIPE"),
    (14, "SIGALRM"),
    (15, "SIGTERM"),
    (16, "SIGSTKFLT"),
    (17, "SIGCHLD"),
    (18, "SIGCONT"),
    (19, "SIGSTOP"),
    (20, "SIGTSTP"),
    (21, "SIGTTIN"),
    (22, "SIGTTOU"),
    (23, "SIGURG"),
    (24, "SIGXCPU"),
    (25, "SIGXFSZ"),
    (26, "SIGVTALRM"),
    (27, "SIGPROF"),
    (28, "SIGWINCH"),
    (29, "SIGIO"),
    (30, "SIGPWR"),
    (31, "SIGSYS"),
])
.dec();

pub static IOC_DIRS: Xlat = Xlat::flags(&[
    (0, "_IOC_NONE"),
    (2, "_IOC_READ"),
    (1, "_IOC_WRITE"),
]);
