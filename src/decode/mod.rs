// syscall dispatch
//
// every decoded syscall is one function taking the call's context. at entry
// it prints whatever is known before the kernel ran, at exit whatever the
// kernel wrote back. a decoder answering `Status::MoreAtExit` at entry is
// called once more at exit; `Status::Decoded` ends decoding and names how
// the return value is printed.

pub mod fs;
pub mod gpio;
pub mod ioctl;
pub mod ipc;
pub mod kd;
pub mod msg;
pub mod perf;
pub mod sem;
pub mod shm;
pub mod signal;
pub mod uffd;
pub mod v4l2;

use crate::{
    config::Config,
    decorator::Decorator,
    peeker_poker::{Fetched, TraceeMemory},
    personality::Personality,
    printer::Printer,
    render::primitives::print_addr,
    traced_call::{ErrnoVariant, TracedCall},
    xlat::{format_hex, XlatStyle},
};

/// How the return value of a decoded call is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetFmt {
    Decimal,
    Udecimal,
    Hex,
    Octal,
    /// a new file descriptor, decorated like fd arguments
    Fd,
    /// `?`
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    MoreAtExit,
    Decoded(RetFmt),
}

pub type Decoder = fn(&mut Ctx) -> Status;

/// What decoders may consult besides the call itself.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub mem: &'a dyn TraceeMemory,
    pub deco: &'a dyn Decorator,
    pub cfg: &'a Config,
}

/// Everything one decoder invocation works with.
pub struct Ctx<'a> {
    pub tcp: &'a mut TracedCall,
    pub mem: &'a dyn TraceeMemory,
    pub deco: &'a dyn Decorator,
    pub cfg: &'a Config,
    pub out: &'a mut Printer,
}

impl<'a> Ctx<'a> {
    pub fn new(tcp: &'a mut TracedCall, env: &Env<'a>, out: &'a mut Printer) -> Self {
        Ctx {
            tcp,
            mem: env.mem,
            deco: env.deco,
            cfg: env.cfg,
            out,
        }
    }

    pub fn personality(&self) -> Personality {
        self.tcp.personality
    }

    pub fn arg(&self, index: usize) -> u64 {
        self.tcp.arg(index)
    }

    /// an argument holding a pointer, cut to the personality's word
    pub fn arg_addr(&self, index: usize) -> u64 {
        self.personality().narrow_word(self.tcp.arg(index))
    }

    pub fn entering(&self) -> bool {
        self.tcp.entering()
    }

    pub fn exiting(&self) -> bool {
        self.tcp.exiting()
    }

    pub fn syserror(&self) -> bool {
        self.tcp.syserror()
    }

    pub fn style(&self) -> XlatStyle {
        self.cfg.xlat_style
    }

    pub fn abbrev(&self) -> bool {
        self.cfg.abbrev()
    }

    /// Exactly `len` bytes at `addr`, nothing on a short or failed read.
    pub fn umove(&self, addr: u64, len: usize) -> Option<Vec<u8>> {
        if addr == 0 {
            return None;
        }
        if len == 0 {
            return Some(Vec::new());
        }
        match self.mem.fetch(addr, len) {
            Fetched::Full(bytes) => Some(bytes),
            Fetched::Short(_) | Fetched::Inaccessible => None,
        }
    }

    /// `umove`, printing the address (or NULL) when it fails
    pub fn umove_or_printaddr(&mut self, addr: u64, len: usize) -> Option<Vec<u8>> {
        let fetched = self.umove(addr, len);
        if fetched.is_none() {
            print_addr(self, addr);
        }
        fetched
    }
}

// x32 gets its own numbers from 512 on for every call whose arguments carry
// a pointer-sized member; their x86_64 numbers are not valid on x32.
static X32_SYSCALLS: [&str; 36] = [
    "rt_sigaction",
    "rt_sigreturn",
    "ioctl",
    "readv",
    "writev",
    "recvfrom",
    "sendmsg",
    "recvmsg",
    "execve",
    "ptrace",
    "rt_sigpending",
    "rt_sigtimedwait",
    "rt_sigqueueinfo",
    "sigaltstack",
    "timer_create",
    "mq_notify",
    "kexec_load",
    "waitid",
    "set_robust_list",
    "get_robust_list",
    "vmsplice",
    "move_pages",
    "preadv",
    "pwritev",
    "rt_tgsigqueueinfo",
    "recvmmsg",
    "sendmmsg",
    "process_vm_readv",
    "process_vm_writev",
    "setsockopt",
    "getsockopt",
    "io_setup",
    "io_submit",
    "execveat",
    "preadv2",
    "pwritev2",
];

const X32_FIRST_SYSCALL: u64 = 512;

fn x32_syscall_name(scno: u64) -> Option<&'static str> {
    if scno >= X32_FIRST_SYSCALL {
        let index = usize::try_from(scno - X32_FIRST_SYSCALL).ok()?;
        return X32_SYSCALLS.get(index).copied();
    }
    let name = syscalls::Sysno::new(scno as usize)?.name();
    (!X32_SYSCALLS.contains(&name)).then_some(name)
}

/// Name of a syscall number for the given personality.
pub fn syscall_name(personality: Personality, scno: u64) -> Option<&'static str> {
    match personality {
        Personality::Native => syscalls::Sysno::new(scno as usize).map(|sysno| sysno.name()),
        Personality::Compat32 => syscalls::x86::Sysno::new(scno as usize).map(|sysno| sysno.name()),
        Personality::X32 => x32_syscall_name(scno),
    }
}

/// The decoder of a syscall, by name.
///
/// Names without one are printed by `printargs`.
pub fn decoder_for(name: &str) -> Option<Decoder> {
    let decoder: Decoder = match name {
        "open" => fs::sys_open,
        "openat" => fs::sys_openat,
        "close" => fs::sys_close,
        "dup" => fs::sys_dup,
        "dup2" => fs::sys_dup2,
        "dup3" => fs::sys_dup3,
        "read" => fs::sys_read,
        "write" => fs::sys_write,
        "inotify_init1" => fs::sys_inotify_init1,
        "mount_setattr" => fs::sys_mount_setattr,
        "userfaultfd" => uffd::sys_userfaultfd,
        "perf_event_open" => perf::sys_perf_event_open,
        "ioctl" => ioctl::sys_ioctl,
        "rt_sigprocmask" => signal::sys_rt_sigprocmask,
        "rt_sigpending" => signal::sys_rt_sigpending,
        "kill" => signal::sys_kill,
        "tgkill" => signal::sys_tgkill,
        "ipc" => ipc::sys_ipc,
        "msgget" => msg::sys_msgget,
        "msgsnd" => msg::sys_msgsnd,
        "msgrcv" => msg::sys_msgrcv,
        "msgctl" => msg::sys_msgctl,
        "semget" => sem::sys_semget,
        "semop" => sem::sys_semop,
        "semtimedop" | "semtimedop_time64" => sem::sys_semtimedop,
        "semctl" => sem::sys_semctl,
        "shmget" => shm::sys_shmget,
        "shmat" => shm::sys_shmat,
        "shmdt" => shm::sys_shmdt,
        "shmctl" => shm::sys_shmctl,
        _ => return None,
    };
    Some(decoder)
}

/// Number of arguments `printargs` shows for syscalls without a decoder.
fn nargs(name: &str) -> usize {
    match name {
        "getpid" | "getppid" | "gettid" | "getuid" | "geteuid" | "getgid" | "getegid"
        | "getuid32" | "geteuid32" | "getgid32" | "getegid32" | "getpgrp" | "setsid"
        | "sched_yield" | "pause" | "fork" | "vfork" | "sync" | "munlockall"
        | "inotify_init" | "restart_syscall" | "rt_sigreturn" | "sigreturn" => 0,
        "exit" | "exit_group" | "brk" | "umask" | "chdir" | "fchdir" | "rmdir" | "unlink"
        | "uname" | "epoll_create" | "epoll_create1" | "time" | "setuid" | "setgid"
        | "alarm" | "personality" | "set_tid_address" | "mlockall" | "pipe" => 1,
        "munmap" | "access" | "fstat" | "stat" | "lstat" | "statfs" | "fstatfs" | "rename"
        | "link" | "symlink" | "mkdir" | "creat" | "chmod" | "fchmod" | "truncate"
        | "ftruncate" | "gettimeofday" | "settimeofday" | "getrlimit" | "setrlimit"
        | "getrusage" | "nanosleep" | "clock_gettime" | "clock_getres" | "listen"
        | "shutdown" | "flock" | "setpgid" | "getpriority" | "capget" | "capset"
        | "arch_prctl" | "set_robust_list" | "mlock" | "munlock" | "sigaltstack"
        | "eventfd2" | "timerfd_create" | "memfd_create" | "getgroups" | "setgroups" | "pipe2"
        | "inotify_rm_watch" => 2,
        "lseek" | "mprotect" | "madvise" | "msync" | "mincore" | "readv" | "writev"
        | "fcntl" | "getdents" | "getdents64" | "execve" | "chown" | "fchown" | "lchown"
        | "socket" | "connect" | "accept" | "bind" | "getsockname" | "getpeername"
        | "readlink" | "setpriority" | "mknod" | "mkdirat" | "unlinkat" | "fchmodat"
        | "faccessat" | "getrandom" | "mlock2" | "getcpu" | "sched_getaffinity"
        | "sched_setaffinity" | "getresuid" | "getresgid" | "setresuid" | "setresgid"
        | "signalfd" | "close_range" | "inotify_add_watch" | "symlinkat" | "rt_sigqueueinfo" => 3,
        "pread64" | "pwrite64" | "rt_sigaction" | "wait4" | "newfstatat" | "fstatat64"
        | "accept4" | "sendfile" | "socketpair" | "tee" | "fadvise64" | "mknodat"
        | "readlinkat" | "renameat" | "epoll_ctl" | "epoll_wait"
        | "timerfd_settime" | "prlimit64" | "signalfd4" | "clock_nanosleep" | "rt_sigtimedwait"
        | "openat2" | "faccessat2" | "pidfd_send_signal" => 4,
        "prctl" | "select" | "mremap" | "setsockopt" | "getsockopt" | "fchownat"
        | "renameat2" | "statx" | "waitid" | "linkat" | "ppoll" | "kcmp" | "move_mount"
        | "fsconfig" | "execveat" => 5,
        _ => 6,
    }
}

/// Name printed for the call, `syscall_0x1ff` when the number is unknown.
pub fn call_name(tcp: &TracedCall) -> String {
    match tcp.name() {
        Some(name) => name.to_owned(),
        None => format!("syscall_{:#x}", tcp.scno),
    }
}

/// Raw argument words in hex.
pub fn printargs(ctx: &mut Ctx) -> Status {
    let count = match ctx.tcp.name() {
        Some(name) => nargs(name),
        None => 6,
    };
    for index in 0..count {
        let word = ctx.personality().narrow_word(ctx.arg(index));
        ctx.out.next();
        ctx.out.text(&format_hex(word));
    }
    Status::Decoded(RetFmt::Decimal)
}

/// Decodes what is known at syscall entry.
///
/// Resolves the call's name and dispatches; the argument text goes to `out`.
pub fn syscall_entering(tcp: &mut TracedCall, env: &Env, out: &mut Printer) -> Status {
    if tcp.name.is_none() {
        tcp.name = syscall_name(tcp.personality, tcp.scno);
    }
    let decoder = tcp.name().and_then(decoder_for);
    let mut ctx = Ctx::new(tcp, env, out);
    let status = match decoder {
        Some(decoder) => decoder(&mut ctx),
        None => printargs(&mut ctx),
    };
    if let Status::Decoded(fmt) = status {
        ctx.tcp.decoded = Some(fmt);
    }
    status
}

/// Finishes decoding once the kernel returned, the call must already carry
/// its return value.
pub fn syscall_exiting(tcp: &mut TracedCall, env: &Env, out: &mut Printer) -> RetFmt {
    if let Some(fmt) = tcp.decoded {
        return fmt;
    }
    let decoder = tcp.name().and_then(decoder_for);
    let mut ctx = Ctx::new(tcp, env, out);
    let status = match decoder {
        Some(decoder) => decoder(&mut ctx),
        None => printargs(&mut ctx),
    };
    let fmt = match status {
        Status::Decoded(fmt) => fmt,
        Status::MoreAtExit => RetFmt::Decimal,
    };
    ctx.tcp.decoded = Some(fmt);
    fmt
}

/// Rendered return value, without the leading ` = `.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnValue {
    pub text: String,
    pub failed: bool,
}

pub fn format_return(tcp: &TracedCall, env: &Env, fmt: RetFmt) -> ReturnValue {
    if let Some(errno) = tcp.errno() {
        let text = match errno {
            ErrnoVariant::Kernel(kernel) if kernel.is_restart() => format!("? {errno}"),
            _ => format!("-1 {errno}"),
        };
        return ReturnValue { text, failed: true };
    }
    let raw = tcp.personality.narrow_word(tcp.raw_rval().unwrap_or(0));
    let text = match fmt {
        RetFmt::Decimal => tcp.return_value().to_string(),
        RetFmt::Udecimal => raw.to_string(),
        RetFmt::Hex => format_hex(raw),
        RetFmt::Octal if raw == 0 => "0".to_owned(),
        RetFmt::Octal => format!("0{raw:o}"),
        RetFmt::Fd => {
            let fd = tcp.return_value() as i32;
            let decoration = if env.cfg.decode_fds {
                env.deco.fd_path(tcp.pid, fd)
            } else {
                None
            };
            match decoration {
                Some(path) => format!("{fd}<{path}>"),
                None => fd.to_string(),
            }
        }
        RetFmt::None => "?".to_owned(),
    };
    ReturnValue {
        text,
        failed: false,
    }
}

/// Renders one complete call as a single line, entry and exit back to back.
pub fn render_call(tcp: &mut TracedCall, env: &Env, rval: u64) -> String {
    let mut out = Printer::new();
    syscall_entering(tcp, env, &mut out);
    tcp.set_exit(rval);
    let fmt = syscall_exiting(tcp, env, &mut out);
    let returned = format_return(tcp, env, fmt);
    format!("{}({}) = {}", call_name(tcp), out.as_str(), returned.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decorator::NoDecoration, peeker_poker::MemoryImage};

    fn env<'a>(mem: &'a MemoryImage, cfg: &'a Config) -> Env<'a> {
        Env {
            mem,
            deco: &NoDecoration,
            cfg,
        }
    }

    #[test]
    fn unknown_numbers_fall_back_to_raw_words() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let mut call = TracedCall::new(1, 0x1ff, Personality::Native, [1, 2, 3, 0, 0, 0xff]);
        let line = render_call(&mut call, &env(&mem, &cfg), 0);
        assert_eq!(line, "syscall_0x1ff(0x1, 0x2, 0x3, 0, 0, 0xff) = 0");
    }

    #[test]
    fn names_follow_the_personality() {
        assert_eq!(syscall_name(Personality::Native, 33), Some("dup2"));
        assert_eq!(syscall_name(Personality::Compat32, 63), Some("dup2"));
        assert_eq!(syscall_name(Personality::Compat32, 117), Some("ipc"));
        assert_eq!(syscall_name(Personality::X32, 514), Some("ioctl"));
        assert_eq!(syscall_name(Personality::X32, 547), Some("pwritev2"));
        assert_eq!(syscall_name(Personality::X32, 548), None);
        // shared with x86_64
        assert_eq!(syscall_name(Personality::X32, 33), Some("dup2"));
        // x86_64 ioctl, which x32 enters at 514 instead
        assert_eq!(syscall_name(Personality::X32, 16), None);
    }

    #[test]
    fn x32_ioctls_decode_with_32_bit_layouts() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let mut call = TracedCall::new(
            1,
            514,
            Personality::X32,
            [3, crate::xlat::v4l2::VIDIOC_G_FMT_32 as u64, 0x5000, 0, 0, 0],
        );
        assert_eq!(
            render_call(&mut call, &env(&mem, &cfg), 0),
            "ioctl(3, VIDIOC_G_FMT, 0x5000) = 0"
        );
    }

    #[test]
    fn calls_without_a_decoder_print_their_arguments() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        // getpid on x86_64
        let mut call = TracedCall::new(7, 39, Personality::Native, [0; 6]);
        assert_eq!(render_call(&mut call, &env(&mem, &cfg), 7), "getpid() = 7");
    }

    #[test]
    fn restart_codes_have_no_value() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let mut call = TracedCall::new(7, 39, Personality::Native, [0; 6]);
        call.set_exit((-512i64) as u64);
        let returned = format_return(&call, &env(&mem, &cfg), RetFmt::Decimal);
        assert_eq!(returned.text, "? ERESTARTSYS (To be restarted if SA_RESTART is set)");
        assert!(returned.failed);
    }

    #[test]
    fn return_formats() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let mut call = TracedCall::new(7, 39, Personality::Native, [0; 6]);
        call.set_exit(0o755);
        let environment = env(&mem, &cfg);
        assert_eq!(format_return(&call, &environment, RetFmt::Octal).text, "0755");
        assert_eq!(format_return(&call, &environment, RetFmt::Hex).text, "0x1ed");
        assert_eq!(format_return(&call, &environment, RetFmt::None).text, "?");
    }
}
