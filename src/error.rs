use nix::errno::Errno;

/// Failures of the tracer itself.
///
/// Decoding a call never fails this way: unreadable memory and unknown
/// values degrade the printed text instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ptrace request failed: {0}")]
    Ptrace(#[from] pete::Error),

    #[error("could not read the registers of {pid}: {errno}")]
    Registers { pid: i32, errno: Errno },

    #[error("could not start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: pete::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("tracing is only supported on x86_64 hosts")]
    UnsupportedArch,
}

pub type Result<T> = std::result::Result<T, Error>;
