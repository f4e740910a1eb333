// which ABI the traced call was made under
//
// on x86_64 a single tracee can enter the kernel through three doors:
// the native 64-bit one, the i386 compat one (int 0x80 / 32-bit code segment)
// and x32 (64-bit registers, 32-bit pointers, syscall number tagged with
// __X32_SYSCALL_BIT). every structure layout in the decoders is keyed by this.

use std::fmt::Display;

pub const X32_SYSCALL_BIT: u64 = 0x4000_0000;
// user code segment selector of a 32-bit task on x86_64
pub const COMPAT_CS: u64 = 0x23;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Personality {
    Native,
    Compat32,
    X32,
}

impl Personality {
    /// Size of a pointer / `long` as seen by the traced program.
    pub const fn word_size(self) -> usize {
        match self {
            Personality::Native => 8,
            Personality::Compat32 | Personality::X32 => 4,
        }
    }

    /// Size of `__kernel_long_t`, which x32 keeps at 64 bits.
    pub const fn kernel_long_size(self) -> usize {
        match self {
            Personality::Native | Personality::X32 => 8,
            Personality::Compat32 => 4,
        }
    }

    /// Narrow a raw register/memory word to the personality's word.
    pub const fn narrow_word(self, word: u64) -> u64 {
        match self.word_size() {
            4 => word & 0xffff_ffff,
            _ => word,
        }
    }

    /// Sign-extend a word-sized value to 64 bits.
    pub const fn sign_extend_word(self, word: u64) -> i64 {
        match self.word_size() {
            4 => word as u32 as i32 as i64,
            _ => word as i64,
        }
    }

    pub const fn is_compat(self) -> bool {
        matches!(self, Personality::Compat32)
    }
}

impl Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Personality::Native => write!(f, "64 bit"),
            Personality::Compat32 => write!(f, "32 bit"),
            Personality::X32 => write!(f, "x32"),
        }
    }
}

/// Resolve the personality of a call from the code segment and raw syscall number.
pub fn personality_from_registers(cs: u64, orig_syscall: u64) -> Personality {
    if cs == COMPAT_CS {
        Personality::Compat32
    } else if orig_syscall & X32_SYSCALL_BIT != 0 && orig_syscall != u64::MAX {
        Personality::X32
    } else {
        Personality::Native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_sizes() {
        assert_eq!(Personality::Native.word_size(), 8);
        assert_eq!(Personality::Compat32.word_size(), 4);
        assert_eq!(Personality::X32.word_size(), 4);
        assert_eq!(Personality::X32.kernel_long_size(), 8);
    }

    #[test]
    fn narrowing_keeps_low_word() {
        assert_eq!(
            Personality::Compat32.narrow_word(0xdead_beef_ffff_fffe),
            0xffff_fffe
        );
        assert_eq!(Personality::Compat32.sign_extend_word(0xffff_fffe), -2);
        assert_eq!(Personality::Native.sign_extend_word(u64::MAX), -1);
    }

    #[test]
    fn detection() {
        assert_eq!(personality_from_registers(0x33, 1), Personality::Native);
        assert_eq!(personality_from_registers(0x23, 4), Personality::Compat32);
        assert_eq!(
            personality_from_registers(0x33, X32_SYSCALL_BIT | 1),
            Personality::X32
        );
        // -1 in orig_rax is not an x32 call
        assert_eq!(personality_from_registers(0x33, u64::MAX), Personality::Native);
    }
}
