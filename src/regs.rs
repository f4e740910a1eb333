// the register file of a syscall stop, reduced to what decoding needs

use crate::{
    personality::{personality_from_registers, Personality, X32_SYSCALL_BIT},
    traced_call::TracedCall,
};

/// Syscall number, raw argument words and return register of one stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyscallRegisters {
    pub personality: Personality,
    /// syscall number with the x32 tag removed
    pub scno: u64,
    pub args: [u64; 6],
    pub rval: u64,
}

impl SyscallRegisters {
    pub fn new(cs: u64, orig_syscall: u64, native: [u64; 6], compat: [u64; 6], rval: u64) -> Self {
        let personality = personality_from_registers(cs, orig_syscall);
        let (scno, args) = match personality {
            Personality::Native => (orig_syscall, native),
            Personality::X32 => (orig_syscall & !X32_SYSCALL_BIT, native),
            // i386 passes arguments in ebx, ecx, edx, esi, edi, ebp
            Personality::Compat32 => (orig_syscall & 0xffff_ffff, compat),
        };
        SyscallRegisters {
            personality,
            scno,
            args,
            rval,
        }
    }

    /// The call as seen at its entry stop.
    pub fn traced_call(&self, pid: i32) -> TracedCall {
        TracedCall::new(pid, self.scno, self.personality, self.args)
    }
}

#[cfg(target_arch = "x86_64")]
impl From<&nix::libc::user_regs_struct> for SyscallRegisters {
    fn from(regs: &nix::libc::user_regs_struct) -> Self {
        SyscallRegisters::new(
            regs.cs,
            regs.orig_rax,
            [regs.rdi, regs.rsi, regs.rdx, regs.r10, regs.r8, regs.r9],
            [regs.rbx, regs.rcx, regs.rdx, regs.rsi, regs.rdi, regs.rbp],
            regs.rax,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: [u64; 6] = [1, 2, 3, 4, 5, 6];
    const COMPAT: [u64; 6] = [11, 12, 13, 14, 15, 16];

    #[test]
    fn arguments_follow_the_abi() {
        let native = SyscallRegisters::new(0x33, 16, NATIVE, COMPAT, 0);
        assert_eq!(native.personality, Personality::Native);
        assert_eq!(native.args, NATIVE);

        let compat = SyscallRegisters::new(0x23, 54, NATIVE, COMPAT, 0);
        assert_eq!(compat.personality, Personality::Compat32);
        assert_eq!(compat.args, COMPAT);
        assert_eq!(compat.scno, 54);
    }

    #[test]
    fn x32_tag_is_stripped() {
        let x32 = SyscallRegisters::new(0x33, X32_SYSCALL_BIT | 514, NATIVE, COMPAT, 0);
        assert_eq!(x32.personality, Personality::X32);
        assert_eq!(x32.scno, 514);
        let call = x32.traced_call(7);
        assert_eq!(call.pid, 7);
        assert_eq!(call.args(), &NATIVE);
    }
}
