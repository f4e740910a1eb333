use std::fmt::Display;

use nix::errno::Errno;

use crate::{
    auxiliary::{constants::general::MAX_ERRNO, kernel_errno::KernelErrno},
    decode::{perf::PerfAttrSnapshot, RetFmt},
    personality::Personality,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrnoVariant {
    Userland(Errno),
    Kernel(KernelErrno),
    Unknown(i32),
}

impl ErrnoVariant {
    pub fn raw(&self) -> i32 {
        match self {
            ErrnoVariant::Userland(errno) => *errno as i32,
            ErrnoVariant::Kernel(errno) => *errno as i32,
            ErrnoVariant::Unknown(raw) => *raw,
        }
    }
}

impl Display for ErrnoVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrnoVariant::Userland(errno) => write!(f, "{:?} ({})", errno, errno.desc()),
            ErrnoVariant::Kernel(errno) => write!(f, "{errno}"),
            ErrnoVariant::Unknown(raw) => write!(f, "ERRNO_{raw} (Unknown error {raw})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallResult {
    Success(u64),
    Fail(ErrnoVariant),
}

/// Decide whether a raw return word is a result or a negated errno.
///
/// The word is narrowed to the personality's width first, a compat task's
/// `-EBADF` arrives as 0x00000000fffffff7.
pub fn interpret_syscall_result(personality: Personality, return_register: u64) -> SyscallResult {
    use ErrnoVariant::*;
    use SyscallResult::*;

    let narrowed = personality.narrow_word(return_register);
    let signed = personality.sign_extend_word(narrowed);
    // strace does something similar to this
    // https://github.com/strace/strace/blob/0f9f46096fa8da84e2e6a6646cd1e326bf7e83c7/src/negated_errno.h#L17
    if signed < 0 && signed.unsigned_abs() <= MAX_ERRNO {
        let errno_positive = (-signed) as i32;
        let userland_errno = Errno::from_raw(errno_positive);
        if !matches!(userland_errno, Errno::UnknownErrno) {
            return Fail(Userland(userland_errno));
        }
        match KernelErrno::from_i32(errno_positive) {
            Some(kernel_errno) => Fail(Kernel(kernel_errno)),
            None => Fail(Unknown(errno_positive)),
        }
    } else {
        Success(narrowed)
    }
}

/// State a decoder keeps between the entry and exit stops of one call.
///
/// Owned by the call, dropped with it: a tracee killed between entry
/// and exit does not leak anything.
#[derive(Clone, Debug, PartialEq)]
pub enum Scratch {
    /// perf_event_attr as fetched at entry
    PerfAttr(Box<PerfAttrSnapshot>),
    /// a remembered scalar, pointer or bitmask
    Word(u64),
    /// a raw structure copied at entry
    Bytes(Vec<u8>),
}

/// One system call of one tracee, alive from its entry stop to its exit stop.
#[derive(Clone, Debug)]
pub struct TracedCall {
    pub pid: i32,
    /// syscall number with any ABI tag bits removed
    pub scno: u64,
    pub personality: Personality,
    args: [u64; 6],
    phase: Phase,
    rval: Option<u64>,
    scratch: Option<Scratch>,
    indirect_ipc: bool,
    pub(crate) name: Option<&'static str>,
    pub(crate) decoded: Option<RetFmt>,
}

impl TracedCall {
    pub fn new(pid: i32, scno: u64, personality: Personality, raw_args: [u64; 6]) -> Self {
        TracedCall {
            pid,
            scno,
            personality,
            args: raw_args,
            phase: Phase::Entering,
            rval: None,
            scratch: None,
            indirect_ipc: false,
            name: None,
            decoded: None,
        }
    }

    /// raw argument word, zero past the sixth
    pub fn arg(&self, index: usize) -> u64 {
        self.args.get(index).copied().unwrap_or(0)
    }

    pub fn args(&self) -> &[u64; 6] {
        &self.args
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entering(&self) -> bool {
        self.phase == Phase::Entering
    }

    pub fn exiting(&self) -> bool {
        self.phase == Phase::Exiting
    }

    /// Moves the call to its exit stop with the raw return register.
    pub fn set_exit(&mut self, return_register: u64) {
        self.phase = Phase::Exiting;
        self.rval = Some(return_register);
    }

    /// replaces the return value, for calls that hand theirs back through memory
    pub fn override_rval(&mut self, value: u64) {
        self.rval = Some(value);
    }

    pub fn raw_rval(&self) -> Option<u64> {
        self.rval
    }

    pub fn result(&self) -> Option<SyscallResult> {
        self.rval
            .map(|raw| interpret_syscall_result(self.personality, raw))
    }

    /// the return value sign-extended from the personality's word
    pub fn return_value(&self) -> i64 {
        self.rval
            .map(|raw| self.personality.sign_extend_word(self.personality.narrow_word(raw)))
            .unwrap_or(0)
    }

    pub fn syserror(&self) -> bool {
        matches!(self.result(), Some(SyscallResult::Fail(_)))
    }

    pub fn errno(&self) -> Option<ErrnoVariant> {
        match self.result() {
            Some(SyscallResult::Fail(errno)) => Some(errno),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn indirect_ipc(&self) -> bool {
        self.indirect_ipc
    }

    /// Turns a multiplexed `ipc(call, a, b, c, d, e)` into the sub-call.
    pub(crate) fn enter_ipc_subcall(&mut self, name: &'static str) {
        self.args.rotate_left(1);
        self.args[5] = 0;
        self.indirect_ipc = true;
        self.name = Some(name);
    }

    pub fn set_private(&mut self, scratch: Scratch) {
        self.scratch = Some(scratch);
    }

    pub fn private(&self) -> Option<&Scratch> {
        self.scratch.as_ref()
    }

    pub fn take_private(&mut self) -> Option<Scratch> {
        self.scratch.take()
    }
}
