use crate::{
    decode::{Ctx, RetFmt, Status},
    render::{
        flags::print_xval,
        primitives::{print_addr, print_kulong, print_pid},
        sigset::{print_sigset_addr_len, signal_name},
    },
    xlat::general::SIGPROCMASK_CMDS,
};

pub fn format_signal(signo: i32) -> String {
    match u32::try_from(signo) {
        Ok(signo) if signo > 0 => signal_name(signo),
        _ => signo.to_string(),
    }
}

fn print_signal(ctx: &mut Ctx, index: usize) {
    let signo = ctx.arg(index) as i32;
    ctx.out.next();
    ctx.out.text(&format_signal(signo));
}

/// the old set is only written when the call succeeded
fn print_sigset_at_exit(ctx: &mut Ctx, addr: u64, len: u64) {
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, addr);
    } else {
        print_sigset_addr_len(ctx, addr, len);
    }
}

pub fn sys_rt_sigprocmask(ctx: &mut Ctx) -> Status {
    let (how, set, oldset, size) = (ctx.arg(0), ctx.arg_addr(1), ctx.arg_addr(2), ctx.arg(3));
    if ctx.entering() {
        ctx.out.next();
        print_xval(ctx, &SIGPROCMASK_CMDS, how & u32::MAX as u64, "SIG_???");
        ctx.out.next();
        print_sigset_addr_len(ctx, set, size);
        return Status::MoreAtExit;
    }
    print_sigset_at_exit(ctx, oldset, size);
    ctx.out.next();
    print_kulong(ctx, size);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_rt_sigpending(ctx: &mut Ctx) -> Status {
    if ctx.entering() {
        return Status::MoreAtExit;
    }
    let (set, size) = (ctx.arg_addr(0), ctx.arg(1));
    print_sigset_at_exit(ctx, set, size);
    ctx.out.next();
    print_kulong(ctx, size);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_kill(ctx: &mut Ctx) -> Status {
    let pid = ctx.arg(0) as i32;
    ctx.out.next();
    print_pid(ctx, pid);
    print_signal(ctx, 1);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_tgkill(ctx: &mut Ctx) -> Status {
    let (tgid, tid) = (ctx.arg(0) as i32, ctx.arg(1) as i32);
    ctx.out.next();
    print_pid(ctx, tgid);
    ctx.out.next();
    print_pid(ctx, tid);
    print_signal(ctx, 2);
    Status::Decoded(RetFmt::Decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        decode::{render_call, Env},
        decorator::NoDecoration,
        peeker_poker::MemoryImage,
        personality::Personality,
        traced_call::TracedCall,
    };

    fn render(mem: &MemoryImage, scno: u64, args: [u64; 6], rval: u64) -> String {
        let cfg = Config::default();
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        let mut call = TracedCall::new(5, scno, Personality::Native, args);
        render_call(&mut call, &env, rval)
    }

    #[test]
    fn signals_by_name() {
        assert_eq!(format_signal(9), "SIGKILL");
        assert_eq!(format_signal(0), "0");
        assert_eq!(format_signal(-3), "-3");
        // kill on x86_64
        assert_eq!(render(&MemoryImage::new(), 62, [42, 15, 0, 0, 0, 0], 0), "kill(42, SIGTERM) = 0");
    }

    #[test]
    fn procmask_prints_both_sets() {
        let set = (1u64 << 1 | 1 << 14).to_ne_bytes();
        let old = 0u64.to_ne_bytes();
        let mem = MemoryImage::new().with(0x1000, set).with(0x2000, old);
        assert_eq!(
            render(&mem, 14, [0, 0x1000, 0x2000, 8, 0, 0], 0),
            "rt_sigprocmask(SIG_BLOCK, [INT TERM], [], 8) = 0"
        );
    }

    #[test]
    fn failed_procmask_leaves_the_old_set_alone() {
        let mem = MemoryImage::new();
        assert_eq!(
            render(&mem, 14, [2, 0, 0x2000, 8, 0, 0], (-22i64) as u64),
            "rt_sigprocmask(SIG_SETMASK, NULL, 0x2000, 8) = -1 EINVAL (Invalid argument)"
        );
    }
}
