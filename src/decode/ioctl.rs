// ioctl(2): the request code and a per-subsystem decoder for the argument
//
// request codes built with _IOC carry direction, type, number and argument
// size. the type byte picks the subsystem; a code no decoder claims keeps
// its argument in hex and its number spelled out as _IOC(...).

use crate::{
    decode::{gpio, kd, perf, uffd, v4l2, Ctx, RetFmt, Status},
    personality::Personality,
    render::primitives::print_fd,
    xlat::{
        format_flags, format_hex,
        general::IOC_DIRS,
        gpio::GPIO_IOCTLS,
        kd::KD_IOCTLS,
        perf::{PERF_IOCTLS, PERF_IOCTLS_32},
        uffd::UFFD_IOCTLS,
        v4l2::{V4L2_IOCTLS, V4L2_IOCTLS_32},
        Xlat, XlatStyle,
    },
};

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;

const IOC_TYPESHIFT: u32 = IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

pub const PERF_IOC_TYPE: u32 = b'$' as u32;
pub const GPIO_IOC_TYPE: u32 = 0xb4;
pub const UFFD_IOC_TYPE: u32 = 0xaa;
pub const KD_IOC_TYPE: u32 = b'K' as u32;
pub const V4L2_IOC_TYPE: u32 = b'V' as u32;

pub const fn ioc_dir(code: u32) -> u32 {
    code >> IOC_DIRSHIFT
}

pub const fn ioc_type(code: u32) -> u32 {
    (code >> IOC_TYPESHIFT) & ((1 << IOC_TYPEBITS) - 1)
}

pub const fn ioc_nr(code: u32) -> u32 {
    code & ((1 << IOC_NRBITS) - 1)
}

pub const fn ioc_size(code: u32) -> u32 {
    (code >> IOC_SIZESHIFT) & ((1 << IOC_SIZEBITS) - 1)
}

/// What a subsystem decoder did with the argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoctlStatus {
    /// the code is not one the decoder knows, print the argument raw
    NotHandled,
    /// the argument is only partly printed, call again at exit
    MoreAtExit,
    Done,
}

pub type IoctlDecoder = fn(&mut Ctx, u32, u64) -> IoctlStatus;

fn names_for(personality: Personality, ioc_type: u32) -> Option<&'static Xlat> {
    let wide = personality.word_size() == 8;
    let table = match ioc_type {
        PERF_IOC_TYPE if wide => &PERF_IOCTLS,
        PERF_IOC_TYPE => &PERF_IOCTLS_32,
        GPIO_IOC_TYPE => &GPIO_IOCTLS,
        UFFD_IOC_TYPE => &UFFD_IOCTLS,
        KD_IOC_TYPE => &KD_IOCTLS,
        V4L2_IOC_TYPE if wide => &V4L2_IOCTLS,
        V4L2_IOC_TYPE => &V4L2_IOCTLS_32,
        _ => return None,
    };
    Some(table)
}

/// Symbolic name of a request code as the given personality encodes it.
pub fn ioctl_name(personality: Personality, code: u32) -> Option<&'static str> {
    names_for(personality, ioc_type(code))?.lookup_scalar(code as u64)
}

/// `_IOC(_IOC_READ|_IOC_WRITE, 0x24, 0x7, 0x8)`
pub fn format_ioc(code: u32) -> String {
    format!(
        "_IOC({}, {}, {}, {})",
        format_flags(&IOC_DIRS, ioc_dir(code) as u64, Some("_IOC_???"), XlatStyle::Abbrev),
        format_hex(ioc_type(code) as u64),
        format_hex(ioc_nr(code) as u64),
        format_hex(ioc_size(code) as u64),
    )
}

pub fn format_ioctl_code(personality: Personality, code: u32, style: XlatStyle) -> String {
    let symbolic = || match ioctl_name(personality, code) {
        Some(name) => name.to_owned(),
        None => format_ioc(code),
    };
    match style {
        XlatStyle::Raw => format_hex(code as u64),
        XlatStyle::Abbrev => symbolic(),
        XlatStyle::Verbose => format!("{} /* {} */", format_hex(code as u64), symbolic()),
    }
}

fn decoder_for(ioc_type: u32) -> Option<IoctlDecoder> {
    let decoder: IoctlDecoder = match ioc_type {
        PERF_IOC_TYPE => perf::perf_ioctl,
        GPIO_IOC_TYPE => gpio::gpio_ioctl,
        UFFD_IOC_TYPE => uffd::uffd_ioctl,
        KD_IOC_TYPE => kd::kd_ioctl,
        V4L2_IOC_TYPE => v4l2::v4l2_ioctl,
        _ => return None,
    };
    Some(decoder)
}

pub fn sys_ioctl(ctx: &mut Ctx) -> Status {
    let (fd, code, arg) = (ctx.arg(0) as i32, ctx.arg(1) as u32, ctx.arg(2));
    let entering = ctx.entering();
    if entering {
        ctx.out.next();
        print_fd(ctx, fd);
        let rendered = format_ioctl_code(ctx.personality(), code, ctx.style());
        ctx.out.item(&rendered);
    }
    let status = match decoder_for(ioc_type(code)) {
        Some(decoder) => decoder(ctx, code, arg),
        None => IoctlStatus::NotHandled,
    };
    match status {
        IoctlStatus::MoreAtExit if entering => Status::MoreAtExit,
        IoctlStatus::NotHandled if entering => {
            let arg = ctx.personality().narrow_word(arg);
            ctx.out.item(&format_hex(arg));
            Status::Decoded(RetFmt::Decimal)
        }
        _ => Status::Decoded(RetFmt::Decimal),
    }
}
