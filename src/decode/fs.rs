use crate::{
    decode::{Ctx, RetFmt, Status},
    render::{
        flags::{format_flags_in, print_flags},
        primitives::{format_umode, print_addr, print_dirfd, print_fd, print_int, print_kulong},
        strings::{print_path, print_strn},
        structure::{fetch_extensible, Negotiated, StructView},
    },
    xlat::{
        format_flags, format_hex, format_xval,
        general::{
            DUP3_FLAGS, INOTIFY_INIT_FLAGS, MOUNT_ATTR_ATIME, MOUNT_ATTR_FLAGS, MOUNT_ATTR__ATIME,
            MOUNT_PROPAGATION, MOUNT_SETATTR_FLAGS, OPEN_ACCESS_MODES, OPEN_MODE_FLAGS, O_ACCMODE,
            O_CREAT, O_TMPFILE,
        },
        XlatStyle,
    },
};

pub fn sys_close(ctx: &mut Ctx) -> Status {
    let fd = ctx.arg(0) as i32;
    ctx.out.next();
    print_fd(ctx, fd);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_dup(ctx: &mut Ctx) -> Status {
    let fd = ctx.arg(0) as i32;
    ctx.out.next();
    print_fd(ctx, fd);
    Status::Decoded(RetFmt::Fd)
}

fn print_dup2_fds(ctx: &mut Ctx) {
    let (oldfd, newfd) = (ctx.arg(0) as i32, ctx.arg(1) as i32);
    ctx.out.next();
    print_fd(ctx, oldfd);
    ctx.out.next();
    print_fd(ctx, newfd);
}

pub fn sys_dup2(ctx: &mut Ctx) -> Status {
    print_dup2_fds(ctx);
    Status::Decoded(RetFmt::Fd)
}

pub fn sys_dup3(ctx: &mut Ctx) -> Status {
    print_dup2_fds(ctx);
    let flags = ctx.arg(2) & u32::MAX as u64;
    ctx.out.next();
    print_flags(ctx, &DUP3_FLAGS, flags, "O_???");
    Status::Decoded(RetFmt::Fd)
}

pub fn sys_read(ctx: &mut Ctx) -> Status {
    if ctx.entering() {
        let fd = ctx.arg(0) as i32;
        ctx.out.next();
        print_fd(ctx, fd);
        return Status::MoreAtExit;
    }
    let (buf, count) = (ctx.arg_addr(1), ctx.arg(2));
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, buf);
    } else {
        let read = ctx.tcp.return_value().max(0) as u64;
        print_strn(ctx, buf, read);
    }
    ctx.out.next();
    print_kulong(ctx, count);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_write(ctx: &mut Ctx) -> Status {
    let (fd, buf, count) = (ctx.arg(0) as i32, ctx.arg_addr(1), ctx.arg(2));
    ctx.out.next();
    print_fd(ctx, fd);
    ctx.out.next();
    print_strn(ctx, buf, count);
    ctx.out.next();
    print_kulong(ctx, count);
    Status::Decoded(RetFmt::Decimal)
}

/// `O_RDWR|O_CREAT|O_CLOEXEC`: the access mode is an enumeration in the low bits
pub fn format_open_flags(flags: u64, style: XlatStyle) -> String {
    if style == XlatStyle::Raw {
        return format_hex(flags);
    }
    let mut rendered = format_xval(&OPEN_ACCESS_MODES, flags & O_ACCMODE, None, XlatStyle::Abbrev);
    let rest = flags & !O_ACCMODE;
    if rest != 0 {
        rendered.push('|');
        rendered.push_str(&format_flags(&OPEN_MODE_FLAGS, rest, None, XlatStyle::Abbrev));
    }
    match style {
        XlatStyle::Verbose => format!("{} /* {rendered} */", format_hex(flags)),
        _ => rendered,
    }
}

fn print_open_tail(ctx: &mut Ctx, path_index: usize) {
    let path = ctx.arg_addr(path_index);
    let flags = ctx.arg(path_index + 1) & u32::MAX as u64;
    let mode = ctx.arg(path_index + 2);
    ctx.out.next();
    print_path(ctx, path);
    ctx.out.next();
    let rendered = format_open_flags(flags, ctx.style());
    ctx.out.text(&rendered);
    if flags & O_CREAT != 0 || flags & O_TMPFILE == O_TMPFILE {
        ctx.out.next();
        ctx.out.text(&format_umode(mode & 0o7777));
    }
}

pub fn sys_open(ctx: &mut Ctx) -> Status {
    print_open_tail(ctx, 0);
    Status::Decoded(RetFmt::Fd)
}

pub fn sys_openat(ctx: &mut Ctx) -> Status {
    let dirfd = ctx.arg(0) as i32;
    ctx.out.next();
    print_dirfd(ctx, dirfd);
    print_open_tail(ctx, 1);
    Status::Decoded(RetFmt::Fd)
}

pub fn sys_inotify_init1(ctx: &mut Ctx) -> Status {
    let flags = ctx.arg(0) & u32::MAX as u64;
    ctx.out.next();
    print_flags(ctx, &INOTIFY_INIT_FLAGS, flags, "IN_???");
    Status::Decoded(RetFmt::Fd)
}

pub const MOUNT_ATTR_SIZE_VER0: usize = 32;
const MOUNT_ATTR_SIZE: usize = 32;

fn format_mount_attr_flags(attr: u64, style: XlatStyle) -> String {
    let mut rendered = String::new();
    if let Some(flags) = format_flags_in(&MOUNT_ATTR_FLAGS, attr & !MOUNT_ATTR__ATIME, style) {
        rendered.push_str(&flags);
        rendered.push('|');
    }
    rendered.push_str(&format_xval(
        &MOUNT_ATTR_ATIME,
        attr & MOUNT_ATTR__ATIME,
        Some("MOUNT_ATTR_???"),
        style,
    ));
    rendered
}

fn print_mount_attr(ctx: &mut Ctx, addr: u64, size: u64) {
    let reported = usize::try_from(size).unwrap_or(usize::MAX);
    let (buf, _) = match fetch_extensible(ctx, addr, reported, MOUNT_ATTR_SIZE_VER0, MOUNT_ATTR_SIZE) {
        Negotiated::Fetched { buf, fetched } => (buf, fetched),
        Negotiated::TooSmall | Negotiated::Unreadable => {
            print_addr(ctx, addr);
            return;
        }
    };
    let view = StructView::new(&buf);
    let style = ctx.style();
    ctx.out.struct_begin();
    ctx.out.field("attr_set");
    ctx.out.text(&format_mount_attr_flags(view.u64(0), style));
    ctx.out.field("attr_clr");
    ctx.out.text(&format_mount_attr_flags(view.u64(8), style));
    ctx.out.field("propagation");
    ctx.out.text(&format_xval(&MOUNT_PROPAGATION, view.u64(16), Some("MS_???"), style));
    ctx.out.field("userns_fd");
    print_fd(ctx, view.u64(24) as i32);
    if reported > MOUNT_ATTR_SIZE {
        ctx.out.more_data_follows();
    }
    ctx.out.struct_end();
}

pub fn sys_mount_setattr(ctx: &mut Ctx) -> Status {
    let dirfd = ctx.arg(0) as i32;
    let path = ctx.arg_addr(1);
    let flags = ctx.arg(2) & u32::MAX as u64;
    let (attr, size) = (ctx.arg_addr(3), ctx.arg(4));
    ctx.out.next();
    print_dirfd(ctx, dirfd);
    ctx.out.next();
    print_path(ctx, path);
    ctx.out.next();
    print_flags(ctx, &MOUNT_SETATTR_FLAGS, flags, "AT_???");
    ctx.out.next();
    print_mount_attr(ctx, attr, size);
    ctx.out.next();
    print_kulong(ctx, size);
    Status::Decoded(RetFmt::Decimal)
}

/// `int` arguments that are not descriptors
pub fn print_int_arg(ctx: &mut Ctx, index: usize) {
    let value = ctx.arg(index);
    ctx.out.next();
    print_int(ctx, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_flags() {
        assert_eq!(format_open_flags(0, XlatStyle::Abbrev), "O_RDONLY");
        assert_eq!(
            format_open_flags(0o2 | 0o100 | 0o2000000, XlatStyle::Abbrev),
            "O_RDWR|O_CREAT|O_CLOEXEC"
        );
        assert_eq!(format_open_flags(0o20200001, XlatStyle::Abbrev), "O_WRONLY|O_TMPFILE");
        assert_eq!(format_open_flags(0o1, XlatStyle::Raw), "0x1");
        assert_eq!(
            format_open_flags(0o2000000, XlatStyle::Verbose),
            "0x80000 /* O_RDONLY|O_CLOEXEC */"
        );
    }

    #[test]
    fn mount_attr_flags() {
        assert_eq!(format_mount_attr_flags(0, XlatStyle::Abbrev), "MOUNT_ATTR_RELATIME");
        assert_eq!(
            format_mount_attr_flags(0x1 | 0x10, XlatStyle::Abbrev),
            "MOUNT_ATTR_RDONLY|MOUNT_ATTR_NOATIME"
        );
    }
}
