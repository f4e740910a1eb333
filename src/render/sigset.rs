use crate::{
    decode::Ctx,
    render::primitives::print_addr,
    xlat::general::{SIGNAL_NAMES, SIGRTMAX, SIGRTMIN},
};

/// sigset_t as the kernel knows it on x86, 64 signals
pub const NSIG_BYTES: usize = 8;

/// `SIGTERM`, `SIGRT_2`, or the bare number
pub fn signal_name(signo: u32) -> String {
    if let Some(name) = SIGNAL_NAMES.lookup_scalar(signo as u64) {
        return name.to_owned();
    }
    if (SIGRTMIN..=SIGRTMAX).contains(&signo) {
        return format!("SIGRT_{}", signo - SIGRTMIN);
    }
    signo.to_string()
}

/// `[HUP INT]`, inverted as `~[...]` when most signals are set.
pub fn format_sigmask(bytes: &[u8]) -> String {
    let nbits = bytes.len() * 8;
    let set_bits: usize = bytes.iter().map(|byte| byte.count_ones() as usize).sum();
    let invert = set_bits * 2 > nbits;
    let mut rendered = String::new();
    if invert {
        rendered.push('~');
    }
    rendered.push('[');
    let mut first = true;
    for bit in 0..nbits {
        let set = bytes[bit / 8] & (1 << (bit % 8)) != 0;
        if set == invert {
            continue;
        }
        if !first {
            rendered.push(' ');
        }
        first = false;
        let name = signal_name(bit as u32 + 1);
        rendered.push_str(name.strip_prefix("SIG").unwrap_or(&name));
    }
    rendered.push(']');
    rendered
}

/// A sigset_t of `len` bytes, address only when the size makes no sense.
pub fn print_sigset_addr_len(ctx: &mut Ctx, addr: u64, len: u64) {
    if addr == 0 {
        ctx.out.text("NULL");
        return;
    }
    let word = ctx.personality().word_size() as u64;
    if len < word || len > NSIG_BYTES as u64 {
        print_addr(ctx, addr);
        return;
    }
    if let Some(mask) = ctx.umove_or_printaddr(addr, len as usize) {
        ctx.out.text(&format_sigmask(&mask));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_of(signals: &[u32]) -> [u8; 8] {
        let mut word = 0u64;
        for signo in signals {
            word |= 1 << (signo - 1);
        }
        word.to_ne_bytes()
    }

    #[test]
    fn small_sets() {
        assert_eq!(format_sigmask(&mask_of(&[1, 2])), "[HUP INT]");
        assert_eq!(format_sigmask(&mask_of(&[])), "[]");
        assert_eq!(format_sigmask(&mask_of(&[34])), "[RT_2]");
    }

    #[test]
    fn mostly_full_sets_are_inverted() {
        let all_but: Vec<u32> = (1..=64).filter(|signo| *signo != 9 && *signo != 19).collect();
        assert_eq!(format_sigmask(&mask_of(&all_but)), "~[KILL STOP]");
        assert_eq!(format_sigmask(&[0xff; 8]), "~[]");
    }

    #[test]
    fn names() {
        assert_eq!(signal_name(15), "SIGTERM");
        assert_eq!(signal_name(32), "SIGRT_0");
        assert_eq!(signal_name(99), "99");
    }
}
