pub mod constants {
    pub mod general {
        // return values in [-MAX_ERRNO, -1] are errors, everything else is a result
        pub const MAX_ERRNO: u64 = 4095;
        pub const PATH_MAX: usize = 4096;
    }
}

pub mod kernel_errno {
    // errnos private to the kernel (include/linux/errno.h)
    // userland never sees them, a tracer does when a signal cuts a call short

    macro_rules! kernel_errnos {
        ($($name:ident = $value:literal, $desc:literal;)*) => {
            #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
            #[derive(Clone, Copy, Debug, Eq, PartialEq)]
            #[repr(i32)]
            pub enum KernelErrno {
                $($name = $value,)*
            }

            impl KernelErrno {
                pub fn from_i32(errno: i32) -> Option<KernelErrno> {
                    match errno {
                        $($value => Some(KernelErrno::$name),)*
                        _ => None,
                    }
                }

                pub fn desc(&self) -> &'static str {
                    match self {
                        $(KernelErrno::$name => $desc,)*
                    }
                }
            }
        };
    }

    kernel_errnos! {
        ERESTARTSYS = 512, "To be restarted if SA_RESTART is set";
        ERESTARTNOINTR = 513, "To be restarted";
        ERESTARTNOHAND = 514, "To be restarted if no handler";
        ENOIOCTLCMD = 515, "No ioctl command";
        ERESTART_RESTARTBLOCK = 516, "Interrupted by signal";
        EPROBE_DEFER = 517, "Driver requests probe retry";
        EOPENSTALE = 518, "Open found a stale dentry";
        ENOPARAM = 519, "Parameter not supported";
        // NFSv3
        EBADHANDLE = 521, "Illegal NFS file handle";
        ENOTSYNC = 522, "Update synchronization mismatch";
        EBADCOOKIE = 523, "Cookie is stale";
        ENOTSUPP = 524, "Operation is not supported";
        ETOOSMALL = 525, "Buffer or request is too small";
        ESERVERFAULT = 526, "An untranslatable error occurred";
        EBADTYPE = 527, "Type not supported by server";
        EJUKEBOX = 528, "Request initiated, but will not complete before timeout";
        EIOCBQUEUED = 529, "iocb queued, will get completion event";
        ERECALLCONFLICT = 530, "conflict with recalled state";
        ENOGRACE = 531, "NFS file lock reclaim refused";
    }

    impl std::fmt::Display for KernelErrno {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "{:?} ({})", self, self.desc())
        }
    }

    impl KernelErrno {
        /// restart codes never reach the program, the call did not finish
        pub fn is_restart(&self) -> bool {
            matches!(
                self,
                KernelErrno::ERESTARTSYS
                    | KernelErrno::ERESTARTNOINTR
                    | KernelErrno::ERESTARTNOHAND
                    | KernelErrno::ERESTART_RESTARTBLOCK
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn only_kernel_range_is_known() {
            assert_eq!(KernelErrno::from_i32(512), Some(KernelErrno::ERESTARTSYS));
            assert_eq!(KernelErrno::from_i32(520), None);
            assert_eq!(KernelErrno::from_i32(9), None);
            assert!(KernelErrno::ERESTART_RESTARTBLOCK.is_restart());
            assert!(!KernelErrno::ENOIOCTLCMD.is_restart());
            assert_eq!(
                KernelErrno::ERESTARTSYS.to_string(),
                "ERESTARTSYS (To be restarted if SA_RESTART is set)"
            );
        }
    }
}
