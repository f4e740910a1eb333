use procfs::process::{FDInfo, FDTarget, Process};

/// Human readable names for descriptors and processes of a tracee.
///
/// Decorations only ever follow the number they describe, the number itself
/// is printed whether or not a decoration was found.
pub trait Decorator {
    fn fd_path(&self, pid: i32, fd: i32) -> Option<String>;
    fn pid_comm(&self, pid: i32) -> Option<String>;
}

/// Looks descriptors and commands up in /proc.
pub struct ProcDecorator;

impl Decorator for ProcDecorator {
    fn fd_path(&self, pid: i32, fd: i32) -> Option<String> {
        if fd < 0 {
            return None;
        }
        let info = FDInfo::from_raw_fd(pid, fd).ok()?;
        let described = match info.target {
            FDTarget::Path(path) => path.to_string_lossy().into_owned(),
            FDTarget::Socket(inode) => format!("socket:[{inode}]"),
            FDTarget::Net(inode) => format!("net:[{inode}]"),
            FDTarget::Pipe(inode) => format!("pipe:[{inode}]"),
            // epoll, eventfd, inotify, signalfd, timerfd, userfaultfd, perf_event
            // all live on anonymous inodes
            FDTarget::AnonInode(kind) => format!("anon_inode:{kind}"),
            FDTarget::MemFD(name) => format!("/memfd:{name}"),
            FDTarget::Other(target, _inode) => target,
        };
        Some(described)
    }

    fn pid_comm(&self, pid: i32) -> Option<String> {
        if pid <= 0 {
            return None;
        }
        Process::new(pid).ok()?.stat().ok().map(|stat| stat.comm)
    }
}

/// For decoding without a live tracee.
pub struct NoDecoration;

impl Decorator for NoDecoration {
    fn fd_path(&self, _pid: i32, _fd: i32) -> Option<String> {
        None
    }

    fn pid_comm(&self, _pid: i32) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_descriptors_are_never_looked_up() {
        assert_eq!(ProcDecorator.fd_path(std::process::id() as i32, -1), None);
        assert_eq!(ProcDecorator.pid_comm(-1), None);
    }

    #[test]
    fn own_process_is_visible() {
        let pid = std::process::id() as i32;
        assert!(ProcDecorator.pid_comm(pid).is_some());
    }
}
