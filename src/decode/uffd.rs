// userfaultfd(2) and the UFFDIO ioctls on its descriptor

use crate::{
    decode::{ioctl::IoctlStatus, Ctx, RetFmt, Status},
    render::{flags::print_flags, StructView},
    traced_call::Scratch,
    xlat::{format_hex, general::USERFAULTFD_FLAGS, uffd::*, Xlat},
};

const UFFDIO_API_SIZE: usize = 24;
const UFFDIO_RANGE_SIZE: usize = 16;
const UFFDIO_REGISTER_SIZE: usize = 32;
const UFFDIO_COPY_SIZE: usize = 40;
const UFFDIO_ZEROPAGE_SIZE: usize = 32;
const UFFDIO_WRITEPROTECT_SIZE: usize = 24;
const UFFDIO_CONTINUE_SIZE: usize = 32;

pub fn sys_userfaultfd(ctx: &mut Ctx) -> Status {
    let flags = ctx.arg(0) & u32::MAX as u64;
    ctx.out.next();
    print_flags(ctx, &USERFAULTFD_FLAGS, flags, "UFFD_???");
    Status::Decoded(RetFmt::Fd)
}

fn print_range(ctx: &mut Ctx, view: StructView) {
    ctx.out.struct_begin();
    ctx.out.field("start");
    ctx.out.text(&format_hex(view.u64(0)));
    ctx.out.field("len");
    ctx.out.text(&view.u64(8).to_string());
    ctx.out.struct_end();
}

/// `{range={...}, mode=...`, left open for what the kernel reports back
fn print_range_and_mode(ctx: &mut Ctx, view: StructView, modes: &Xlat, dflt: &str) {
    ctx.out.struct_begin();
    ctx.out.field("range");
    print_range(ctx, view);
    ctx.out.field("mode");
    print_flags(ctx, modes, view.u64(16), dflt);
}

/// Reads the argument at entry, or closes it at exit after `at_exit` ran
/// over the updated copy.
fn entry_then_exit<E, X>(ctx: &mut Ctx, addr: u64, size: usize, at_entry: E, at_exit: X) -> IoctlStatus
where
    E: FnOnce(&mut Ctx, StructView),
    X: FnOnce(&mut Ctx, StructView),
{
    if ctx.entering() {
        ctx.out.next();
        let Some(buf) = ctx.umove_or_printaddr(addr, size) else {
            return IoctlStatus::Done;
        };
        at_entry(ctx, StructView::new(&buf));
        return IoctlStatus::MoreAtExit;
    }
    if let Some(buf) = ctx.umove(addr, size) {
        at_exit(ctx, StructView::new(&buf));
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn uffdio_api(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    let syserror = ctx.exiting() && ctx.syserror();
    entry_then_exit(
        ctx,
        addr,
        UFFDIO_API_SIZE,
        |ctx, api| {
            ctx.out.struct_begin();
            ctx.out.field("api");
            ctx.out.text(&format_hex(api.u64(0)));
            ctx.out.field("features");
            print_flags(ctx, &UFFD_API_FEATURES, api.u64(8), "UFFD_FEATURE_???");
            ctx.tcp.set_private(Scratch::Word(api.u64(8)));
        },
        |ctx, api| {
            let requested = match ctx.tcp.take_private() {
                Some(Scratch::Word(features)) => features,
                _ => api.u64(8),
            };
            if syserror {
                return;
            }
            if api.u64(8) != requested {
                ctx.out.value_changed();
                print_flags(ctx, &UFFD_API_FEATURES, api.u64(8), "UFFD_FEATURE_???");
            }
            ctx.out.field("ioctls");
            print_flags(ctx, &UFFD_API_FLAGS, api.u64(16), "_UFFDIO_???");
        },
    )
}

fn uffdio_register(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    let syserror = ctx.exiting() && ctx.syserror();
    entry_then_exit(
        ctx,
        addr,
        UFFDIO_REGISTER_SIZE,
        |ctx, register| {
            print_range_and_mode(ctx, register, &UFFD_REGISTER_MODE_FLAGS, "UFFDIO_REGISTER_MODE_???")
        },
        |ctx, register| {
            if !syserror {
                ctx.out.field("ioctls");
                print_flags(ctx, &UFFD_REGISTER_IOCTL_FLAGS, register.u64(24), "_UFFDIO_???");
            }
        },
    )
}

/// COPY, ZEROPAGE and CONTINUE: the kernel reports the bytes handled, or -errno,
/// in the trailing signed field
fn print_result_field(name: &'static str, offset: usize) -> impl FnOnce(&mut Ctx, StructView) {
    move |ctx, view| {
        ctx.out.field(name);
        ctx.out.text(&view.s64(offset).to_string());
    }
}

fn uffdio_copy(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    entry_then_exit(
        ctx,
        addr,
        UFFDIO_COPY_SIZE,
        |ctx, copy| {
            ctx.out.struct_begin();
            ctx.out.field("dst");
            ctx.out.text(&format_hex(copy.u64(0)));
            ctx.out.field("src");
            ctx.out.text(&format_hex(copy.u64(8)));
            ctx.out.field("len");
            ctx.out.text(&copy.u64(16).to_string());
            ctx.out.field("mode");
            print_flags(ctx, &UFFD_COPY_FLAGS, copy.u64(24), "UFFDIO_COPY_???");
        },
        print_result_field("copy", 32),
    )
}

fn print_entry_only(ctx: &mut Ctx, addr: u64, size: usize, render: fn(&mut Ctx, StructView)) -> IoctlStatus {
    ctx.out.next();
    if let Some(buf) = ctx.umove_or_printaddr(addr, size) {
        render(ctx, StructView::new(&buf));
    }
    IoctlStatus::Done
}

fn print_writeprotect(ctx: &mut Ctx, view: StructView) {
    print_range_and_mode(ctx, view, &UFFD_WRITEPROTECT_FLAGS, "UFFDIO_WRITEPROTECT_???");
    ctx.out.struct_end();
}

pub fn uffd_ioctl(ctx: &mut Ctx, code: u32, arg: u64) -> IoctlStatus {
    let addr = ctx.personality().narrow_word(arg);
    match code {
        UFFDIO_API => uffdio_api(ctx, addr),
        UFFDIO_REGISTER => uffdio_register(ctx, addr),
        UFFDIO_UNREGISTER | UFFDIO_WAKE => print_entry_only(ctx, addr, UFFDIO_RANGE_SIZE, print_range),
        UFFDIO_COPY => uffdio_copy(ctx, addr),
        UFFDIO_ZEROPAGE => entry_then_exit(
            ctx,
            addr,
            UFFDIO_ZEROPAGE_SIZE,
            |ctx, zeropage| {
                print_range_and_mode(ctx, zeropage, &UFFD_ZEROPAGE_FLAGS, "UFFDIO_ZEROPAGE_???")
            },
            print_result_field("zeropage", 24),
        ),
        UFFDIO_WRITEPROTECT => {
            print_entry_only(ctx, addr, UFFDIO_WRITEPROTECT_SIZE, print_writeprotect)
        }
        UFFDIO_CONTINUE => entry_then_exit(
            ctx,
            addr,
            UFFDIO_CONTINUE_SIZE,
            |ctx, cont| print_range_and_mode(ctx, cont, &UFFD_CONTINUE_FLAGS, "UFFDIO_CONTINUE_???"),
            print_result_field("mapped", 24),
        ),
        _ => IoctlStatus::NotHandled,
    }
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
        printer::Printer,
        traced_call::TracedCall,
    };

    const ARG: u64 = 0x6000_0000;

    fn words(values: &[u64]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_ne_bytes()).collect()
    }

    fn render(mem: &MemoryImage, code: u32, rval: u64) -> String {
        let cfg = Config::default();
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        // ioctl on x86_64
        let mut call = TracedCall::new(1, 16, Personality::Native, [4, code as u64, ARG, 0, 0, 0]);
        render_call(&mut call, &env, rval)
    }

    #[test]
    fn userfaultfd_flags() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let env = Env {
            mem: &mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        // userfaultfd on x86_64
        let mut call = TracedCall::new(1, 323, Personality::Native, [0o2004001, 0, 0, 0, 0, 0]);
        assert_eq!(
            render_call(&mut call, &env, 5),
            "userfaultfd(UFFD_USER_MODE_ONLY|O_NONBLOCK|O_CLOEXEC) = 5"
        );
    }

    #[test]
    fn api_features_changed_by_the_kernel() {
        let entry = MemoryImage::new().with(ARG, words(&[0xaa, 0, 0]));
        let exit = MemoryImage::new().with(ARG, words(&[0xaa, 0x3, (1 << 63) | 0x3]));
        let cfg = Config::default();
        let mut call = TracedCall::new(1, 16, Personality::Native, [4, UFFDIO_API as u64, ARG, 0, 0, 0]);
        let mut out = Printer::new();
        let entry_env = Env {
            mem: &entry,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        let status = crate::decode::syscall_entering(&mut call, &entry_env, &mut out);
        assert_eq!(status, Status::MoreAtExit);
        call.set_exit(0);
        let exit_env = Env { mem: &exit, ..entry_env };
        crate::decode::syscall_exiting(&mut call, &exit_env, &mut out);
        assert_eq!(
            out.as_str(),
            "4, UFFDIO_API, {api=0xaa, features=0 => UFFD_FEATURE_PAGEFAULT_FLAG_WP|UFFD_FEATURE_EVENT_FORK, \
             ioctls=1<<_UFFDIO_REGISTER|1<<_UFFDIO_UNREGISTER|1<<_UFFDIO_API}"
        );
    }

    #[test]
    fn unchanged_features_print_once() {
        let mem = MemoryImage::new().with(ARG, words(&[0xaa, 0, 1 << 63]));
        assert_eq!(
            render(&mem, UFFDIO_API, 0),
            "ioctl(4, UFFDIO_API, {api=0xaa, features=0, ioctls=1<<_UFFDIO_API}) = 0"
        );
    }

    #[test]
    fn register_reports_the_range_ioctls() {
        let mem = MemoryImage::new().with(ARG, words(&[0x7f00_0000_0000, 4096, 1, 0x1c]));
        assert_eq!(
            render(&mem, UFFDIO_REGISTER, 0),
            "ioctl(4, UFFDIO_REGISTER, {range={start=0x7f0000000000, len=4096}, \
             mode=UFFDIO_REGISTER_MODE_MISSING, \
             ioctls=1<<_UFFDIO_WAKE|1<<_UFFDIO_COPY|1<<_UFFDIO_ZEROPAGE}) = 0"
        );
        assert_eq!(
            render(&mem, UFFDIO_REGISTER, (-22i64) as u64),
            "ioctl(4, UFFDIO_REGISTER, {range={start=0x7f0000000000, len=4096}, \
             mode=UFFDIO_REGISTER_MODE_MISSING}) = -1 EINVAL (Invalid argument)"
        );
    }

    #[test]
    fn copy_and_ranges() {
        let mem = MemoryImage::new().with(ARG, words(&[0x1000, 0x2000, 4096, 0, 4096]));
        assert_eq!(
            render(&mem, UFFDIO_COPY, 0),
            "ioctl(4, UFFDIO_COPY, {dst=0x1000, src=0x2000, len=4096, mode=0, copy=4096}) = 0"
        );
        assert_eq!(
            render(&mem, UFFDIO_WAKE, 0),
            "ioctl(4, UFFDIO_WAKE, {start=0x1000, len=8192}) = 0"
        );
    }
}
