use crate::{
    decode::Ctx,
    render::StructView,
    xlat::{format_hex, general::AT_FDCWD},
};

/// Two's complement narrowing of a raw word to a `width`-byte signed integer.
pub fn narrow_signed(value: u64, width: usize) -> i64 {
    match width {
        1 => value as i8 as i64,
        2 => value as i16 as i64,
        4 => value as i32 as i64,
        _ => value as i64,
    }
}

pub fn narrow_unsigned(value: u64, width: usize) -> u64 {
    match width {
        1 => value as u8 as u64,
        2 => value as u16 as u64,
        4 => value as u32 as u64,
        _ => value,
    }
}

pub fn format_addr(addr: u64) -> String {
    if addr == 0 {
        "NULL".to_owned()
    } else {
        format!("{addr:#x}")
    }
}

/// `%#03o`, zero-padded to three digits, leading zero only when needed
pub fn format_umode(mode: u64) -> String {
    format!("0{:02o}", mode)
}

/// pointer-sized argument or field
pub fn print_addr(ctx: &mut Ctx, addr: u64) {
    let addr = ctx.personality().narrow_word(addr);
    ctx.out.text(&format_addr(addr));
}

/// kernel `int`
pub fn print_int(ctx: &mut Ctx, value: u64) {
    ctx.out.text(&narrow_signed(value, 4).to_string());
}

/// kernel `unsigned int`
pub fn print_uint(ctx: &mut Ctx, value: u64) {
    ctx.out.text(&narrow_unsigned(value, 4).to_string());
}

/// kernel `long`, width follows the personality
pub fn print_klong(ctx: &mut Ctx, value: u64) {
    let width = ctx.personality().kernel_long_size();
    ctx.out.text(&narrow_signed(value, width).to_string());
}

pub fn print_kulong(ctx: &mut Ctx, value: u64) {
    let width = ctx.personality().kernel_long_size();
    ctx.out.text(&narrow_unsigned(value, width).to_string());
}

pub fn print_hex(ctx: &mut Ctx, value: u64) {
    ctx.out.text(&format_hex(value));
}

pub fn format_fd(ctx: &Ctx, fd: i32) -> String {
    let decoration = if ctx.cfg.decode_fds {
        ctx.deco.fd_path(ctx.tcp.pid, fd)
    } else {
        None
    };
    match decoration {
        Some(path) => format!("{fd}<{path}>"),
        None => fd.to_string(),
    }
}

pub fn print_fd(ctx: &mut Ctx, fd: i32) {
    let rendered = format_fd(ctx, fd);
    ctx.out.text(&rendered);
}

/// first argument of the *at() family
pub fn print_dirfd(ctx: &mut Ctx, fd: i32) {
    if fd == AT_FDCWD {
        ctx.out.text("AT_FDCWD");
    } else {
        print_fd(ctx, fd);
    }
}

pub fn print_pid(ctx: &mut Ctx, pid: i32) {
    let comm = if ctx.cfg.decode_pids {
        ctx.deco.pid_comm(pid)
    } else {
        None
    };
    let rendered = match comm {
        Some(comm) => format!("{pid}<{comm}>"),
        None => pid.to_string(),
    };
    ctx.out.text(&rendered);
}

/// 32-bit uid/gid where -1 means "unchanged"
pub fn format_uid(uid: u32) -> String {
    if uid == u32::MAX {
        "-1".to_owned()
    } else {
        uid.to_string()
    }
}

/// `struct timespec` as the kernel sees it for this personality
pub fn print_timespec(ctx: &mut Ctx, addr: u64) {
    let long = ctx.personality().kernel_long_size();
    print_timespec_of(ctx, addr, long);
}

/// `struct __kernel_timespec` of the *_time64 calls, 64-bit everywhere
pub fn print_timespec64(ctx: &mut Ctx, addr: u64) {
    print_timespec_of(ctx, addr, 8);
}

fn print_timespec_of(ctx: &mut Ctx, addr: u64, long: usize) {
    let Some(bytes) = ctx.umove_or_printaddr(addr, 2 * long) else {
        return;
    };
    let view = StructView::new(&bytes);
    ctx.out.struct_begin();
    ctx.out.field("tv_sec");
    ctx.out.text(&view.signed(0, long).to_string());
    ctx.out.field("tv_nsec");
    ctx.out.text(&view.signed(long, long).to_string());
    ctx.out.struct_end();
}

/// `[N]` for a pointer to one int, address when unreadable
pub fn print_int_ptr(ctx: &mut Ctx, addr: u64) {
    if let Some(bytes) = ctx.umove_or_printaddr(addr, 4) {
        let value = StructView::new(&bytes).s32(0);
        ctx.out.array_begin();
        ctx.out.item(&value.to_string());
        ctx.out.array_end();
    }
}

pub fn print_uint_ptr(ctx: &mut Ctx, addr: u64) {
    if let Some(bytes) = ctx.umove_or_printaddr(addr, 4) {
        let value = StructView::new(&bytes).u32(0);
        ctx.out.array_begin();
        ctx.out.item(&value.to_string());
        ctx.out.array_end();
    }
}

pub fn print_u64_ptr(ctx: &mut Ctx, addr: u64) {
    if let Some(bytes) = ctx.umove_or_printaddr(addr, 8) {
        let value = StructView::new(&bytes).u64(0);
        ctx.out.array_begin();
        ctx.out.item(&value.to_string());
        ctx.out.array_end();
    }
}
