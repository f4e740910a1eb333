// console ioctls of linux/kd.h

use crate::{
    decode::{ioctl::IoctlStatus, signal::format_signal, Ctx},
    render::{
        primitives::print_addr,
        strings::{format_quoted, quote_bytes},
        StructView,
    },
    xlat::{format_flags, format_hex, format_xval, kd::*, XlatStyle},
};

const KBENTRY_SIZE: usize = 4;
const KBSENTRY_SIZE: usize = 513;
const KBKEYCODE_SIZE: usize = 8;
const KBD_REPEAT_SIZE: usize = 8;

const KT_FN: u64 = 1;

type Format = fn(u64, XlatStyle) -> String;

fn format_leds(value: u64, style: XlatStyle) -> String {
    format_flags(&KD_LEDS, value, Some("LED_???"), style)
}

/// KDGKBLED packs the lock state in bits 0-2 and its default in bits 4-6.
pub fn format_kbd_leds(value: u64, style: XlatStyle) -> String {
    if style == XlatStyle::Raw {
        return format_hex(value);
    }
    let mut rendered = format_flags(&KD_KBD_LED_FLAGS, value & 0x7, Some("K_???"), style);
    let defaults = (value >> 4) & 0x7;
    if defaults != 0 {
        rendered.push_str(&format!(
            "|({})<<4",
            format_flags(&KD_KBD_LED_FLAGS, defaults, Some("K_???"), style)
        ));
    }
    let rest = value & !0x77;
    if rest != 0 {
        rendered.push('|');
        rendered.push_str(&format_hex(rest));
    }
    rendered
}

fn format_keyboard_type(value: u64, style: XlatStyle) -> String {
    format_xval(&KD_KEYBOARD_TYPES, value, Some("KB_???"), style)
}

fn format_mode(value: u64, style: XlatStyle) -> String {
    format_xval(&KD_MODES, value, Some("KD_???"), style)
}

fn format_kbd_mode(value: u64, style: XlatStyle) -> String {
    format_xval(&KD_KBD_MODES, value, Some("K_???"), style)
}

fn format_meta_mode(value: u64, style: XlatStyle) -> String {
    format_xval(&KD_META_MODES, value, Some("K_???"), style)
}

/// a keymap entry, `K(KT_FN, KVAL(K_F1))` for function keys
fn format_kb_value(value: u64, style: XlatStyle) -> String {
    let function_key = match (style, value >> 8) {
        (XlatStyle::Raw, _) => None,
        (_, KT_FN) => KD_KEY_FN_KEYS.lookup_scalar(value & 0xff),
        _ => None,
    };
    match function_key {
        Some(name) => format!("K(KT_FN, {name})"),
        None => format_hex(value),
    }
}

/// the scalar argument itself
fn print_value_arg(ctx: &mut Ctx, arg: u64, format: Format) -> IoctlStatus {
    let rendered = format(arg & u32::MAX as u64, ctx.style());
    ctx.out.item(&rendered);
    IoctlStatus::Done
}

/// a scalar the kernel stores through the argument, `[VALUE]`
fn print_value_at_exit(ctx: &mut Ctx, addr: u64, width: usize, format: Format) -> IoctlStatus {
    if ctx.entering() {
        return IoctlStatus::MoreAtExit;
    }
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, addr);
        return IoctlStatus::Done;
    }
    if let Some(bytes) = ctx.umove_or_printaddr(addr, width) {
        let value = StructView::new(&bytes).unsigned(0, width);
        let rendered = format(value, ctx.style());
        ctx.out.array_begin();
        ctx.out.item(&rendered);
        ctx.out.array_end();
    }
    IoctlStatus::Done
}

fn print_sound(ctx: &mut Ctx, arg: u64) -> IoctlStatus {
    let count = ctx.personality().narrow_word(arg);
    ctx.out.item(&count.to_string());
    if count != 0 && ctx.style() != XlatStyle::Raw {
        ctx.out.comment(&format!("{} Hz", KERNEL_PIT_TICK_RATE / count));
    }
    IoctlStatus::Done
}

/// KDMKTONE: duration in ms in the high half, PIT count in the low half
fn print_tone(ctx: &mut Ctx, arg: u64) -> IoctlStatus {
    let ticks = (arg >> 16) & 0xffff;
    let count = arg & 0xffff;
    if ticks != 0 {
        ctx.out.item(&format!("{ticks}<<16|{count}"));
    } else {
        ctx.out.item(&count.to_string());
    }
    if ticks != 0 && count != 0 && ctx.style() != XlatStyle::Raw {
        ctx.out.comment(&format!("{} Hz, {ticks} ms", KERNEL_PIT_TICK_RATE / count));
    }
    IoctlStatus::Done
}

/// Prints the part of a structure known at entry; `get` requests leave it
/// open for the exit stop.
fn print_struct_head(
    ctx: &mut Ctx,
    addr: u64,
    size: usize,
    get: bool,
    head: fn(&mut Ctx, StructView),
    tail: fn(&mut Ctx, StructView),
) -> IoctlStatus {
    if ctx.exiting() {
        if !ctx.syserror() {
            if let Some(buf) = ctx.umove(addr, size) {
                tail(ctx, StructView::new(&buf));
            }
        }
        ctx.out.struct_end();
        return IoctlStatus::Done;
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, size) else {
        return IoctlStatus::Done;
    };
    let view = StructView::new(&buf);
    ctx.out.struct_begin();
    head(ctx, view);
    if get {
        return IoctlStatus::MoreAtExit;
    }
    tail(ctx, view);
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn kbentry_head(ctx: &mut Ctx, entry: StructView) {
    let style = ctx.style();
    ctx.out.field("kb_table");
    ctx.out.text(&format_xval(&KD_KBENTRY_TABLES, entry.u8(0) as u64, Some("K_???"), style));
    ctx.out.field("kb_index");
    ctx.out.text(&entry.u8(1).to_string());
}

fn kbentry_tail(ctx: &mut Ctx, entry: StructView) {
    let rendered = format_kb_value(entry.u16(2) as u64, ctx.style());
    ctx.out.field("kb_value");
    ctx.out.text(&rendered);
}

fn kbsentry_head(ctx: &mut Ctx, entry: StructView) {
    let rendered = format_xval(&KD_KEY_FN_KEYS, entry.u8(0) as u64, Some("KVAL(K_???)"), ctx.style());
    ctx.out.field("kb_func");
    ctx.out.text(&rendered);
}

fn kbsentry_tail(ctx: &mut Ctx, entry: StructView) {
    let string = entry.bytes(1, KBSENTRY_SIZE - 1);
    let string = match string.iter().position(|byte| *byte == 0) {
        Some(nul) => &string[..nul],
        None => string,
    };
    let limit = ctx.cfg.max_strlen;
    ctx.out.field("kb_string");
    if string.len() > limit {
        ctx.out.text(&format_quoted(&string[..limit], true));
    } else {
        ctx.out.text(&quote_bytes(string));
    }
}

fn keycode_head(ctx: &mut Ctx, keycode: StructView) {
    ctx.out.field("scancode");
    ctx.out.text(&keycode.u32(0).to_string());
}

fn keycode_tail(ctx: &mut Ctx, keycode: StructView) {
    ctx.out.field("keycode");
    ctx.out.text(&keycode.u32(4).to_string());
}

fn print_kbd_repeat(ctx: &mut Ctx, repeat: StructView) {
    ctx.out.field("delay");
    ctx.out.text(&repeat.s32(0).to_string());
    ctx.out.field("period");
    ctx.out.text(&repeat.s32(4).to_string());
}

/// KDKBDREP reads the new rate and writes the previous one back.
fn print_kbd_repeat_update(ctx: &mut Ctx, repeat: StructView) {
    ctx.out.struct_end();
    ctx.out.value_changed();
    ctx.out.struct_begin();
    print_kbd_repeat(ctx, repeat);
}

fn print_kbd_rep(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    print_struct_head(ctx, addr, KBD_REPEAT_SIZE, true, print_kbd_repeat, print_kbd_repeat_update)
}

pub fn kd_ioctl(ctx: &mut Ctx, code: u32, arg: u64) -> IoctlStatus {
    let addr = ctx.personality().narrow_word(arg);
    match code as u64 {
        KIOCSOUND => print_sound(ctx, arg),
        KDMKTONE => print_tone(ctx, arg),
        KDGETLED => print_value_at_exit(ctx, addr, 1, format_leds),
        KDSETLED => print_value_arg(ctx, arg, format_leds),
        KDGKBLED => print_value_at_exit(ctx, addr, 1, format_kbd_leds),
        KDSKBLED => print_value_arg(ctx, arg, format_kbd_leds),
        KDGKBTYPE => print_value_at_exit(ctx, addr, 1, format_keyboard_type),
        KDGETMODE => print_value_at_exit(ctx, addr, 4, format_mode),
        KDSETMODE => print_value_arg(ctx, arg, format_mode),
        KDGKBMODE => print_value_at_exit(ctx, addr, 4, format_kbd_mode),
        KDSKBMODE => print_value_arg(ctx, arg, format_kbd_mode),
        KDGKBMETA => print_value_at_exit(ctx, addr, 4, format_meta_mode),
        KDSKBMETA => print_value_arg(ctx, arg, format_meta_mode),
        KDGKBENT => print_struct_head(ctx, addr, KBENTRY_SIZE, true, kbentry_head, kbentry_tail),
        KDSKBENT => print_struct_head(ctx, addr, KBENTRY_SIZE, false, kbentry_head, kbentry_tail),
        KDGKBSENT => {
            print_struct_head(ctx, addr, KBSENTRY_SIZE, true, kbsentry_head, kbsentry_tail)
        }
        KDSKBSENT => {
            print_struct_head(ctx, addr, KBSENTRY_SIZE, false, kbsentry_head, kbsentry_tail)
        }
        KDGETKEYCODE => {
            print_struct_head(ctx, addr, KBKEYCODE_SIZE, true, keycode_head, keycode_tail)
        }
        KDSETKEYCODE => {
            print_struct_head(ctx, addr, KBKEYCODE_SIZE, false, keycode_head, keycode_tail)
        }
        KDSIGACCEPT => {
            ctx.out.item(&format_signal(arg as i32));
            IoctlStatus::Done
        }
        KDKBDREP => print_kbd_rep(ctx, addr),
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
        traced_call::TracedCall,
    };

    const ARG: u64 = 0x4000_1000;

    fn render_with(mem: &MemoryImage, cfg: &Config, code: u64, arg: u64, rval: u64) -> String {
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg,
        };
        // ioctl on x86_64
        let mut call = TracedCall::new(1, 16, Personality::Native, [0, code, arg, 0, 0, 0]);
        render_call(&mut call, &env, rval)
    }

    fn render(mem: &MemoryImage, code: u64, arg: u64) -> String {
        render_with(mem, &Config::default(), code, arg, 0)
    }

    #[test]
    fn sound_in_hertz() {
        let mem = MemoryImage::new();
        assert_eq!(render(&mem, KIOCSOUND, 2711), "ioctl(0, KIOCSOUND, 2711 /* 440 Hz */) = 0");
        assert_eq!(render(&mem, KIOCSOUND, 0), "ioctl(0, KIOCSOUND, 0) = 0");
        assert_eq!(
            render(&mem, KDMKTONE, (100 << 16) | 2711),
            "ioctl(0, KDMKTONE, 100<<16|2711 /* 440 Hz, 100 ms */) = 0"
        );
        let raw = Config {
            xlat_style: XlatStyle::Raw,
            ..Config::default()
        };
        assert_eq!(
            render_with(&mem, &raw, KIOCSOUND, 2711, 0),
            "ioctl(0, 0x4b2f, 2711) = 0"
        );
    }

    #[test]
    fn led_state() {
        let mem = MemoryImage::new().with(ARG, [0x52u8]);
        assert_eq!(format_kbd_leds(0x52, XlatStyle::Abbrev), "K_NUMLOCK|(K_SCROLLLOCK|K_CAPSLOCK)<<4");
        assert_eq!(format_kbd_leds(0x100, XlatStyle::Abbrev), "0|0x100");
        assert_eq!(render(&mem, KDGKBLED, ARG), "ioctl(0, KDGKBLED, [K_NUMLOCK|(K_SCROLLLOCK|K_CAPSLOCK)<<4]) = 0");
        assert_eq!(render(&mem, KDSETLED, 0x3), "ioctl(0, KDSETLED, LED_SCR|LED_NUM) = 0");
        assert_eq!(render(&mem, KDSETMODE, 1), "ioctl(0, KDSETMODE, KD_GRAPHICS) = 0");
    }

    #[test]
    fn keymap_entries() {
        let mem = MemoryImage::new().with(ARG, [1u8, 59, 0x00, 0x01]);
        assert_eq!(
            render(&mem, KDGKBENT, ARG),
            "ioctl(0, KDGKBENT, {kb_table=K_SHIFTTAB, kb_index=59, kb_value=K(KT_FN, KVAL(K_F1))}) = 0"
        );
        assert_eq!(
            render_with(&mem, &Config::default(), KDGKBENT, ARG, (-22i64) as u64),
            "ioctl(0, KDGKBENT, {kb_table=K_SHIFTTAB, kb_index=59}) = -1 EINVAL (Invalid argument)"
        );
    }

    #[test]
    fn function_key_strings() {
        let mut entry = vec![0u8; KBSENTRY_SIZE];
        entry[0] = 1;
        entry[1..5].copy_from_slice(b"\x1b[[B");
        let mem = MemoryImage::new().with(ARG, entry);
        assert_eq!(
            render(&mem, KDGKBSENT, ARG),
            "ioctl(0, KDGKBSENT, {kb_func=KVAL(K_F2), kb_string=\"\\33[[B\"}) = 0"
        );
    }

    #[test]
    fn keyboard_repeat_rate_is_swapped() {
        let mut repeat = Vec::new();
        repeat.extend_from_slice(&250i32.to_ne_bytes());
        repeat.extend_from_slice(&33i32.to_ne_bytes());
        let mem = MemoryImage::new().with(ARG, repeat);
        assert_eq!(
            render(&mem, KDKBDREP, ARG),
            "ioctl(0, KDKBDREP, {delay=250, period=33} => {delay=250, period=33}) = 0"
        );
    }

    #[test]
    fn signals() {
        let mem = MemoryImage::new();
        assert_eq!(render(&mem, KDSIGACCEPT, 10), "ioctl(0, KDSIGACCEPT, SIGUSR1) = 0");
    }
}
