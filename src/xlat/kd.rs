// linux/kd.h console ioctls

use super::Xlat;

/// PIT input clock, KIOCSOUND and KDMKTONE count in its ticks
pub const KERNEL_PIT_TICK_RATE: u64 = 1_193_182;

pub static KD_LEDS: Xlat = Xlat::flags(&[
    (0x1, "LED_SCR"),
    (0x2, "LED_NUM"),
    (0x4, "LED_CAP"),
]);

pub static KD_KBD_LED_FLAGS: Xlat = Xlat::flags(&[
    (0x1, "K_SCROLLLOCK"),
    (0x2, "K_NUMLOCK"),
    (0x4, "K_CAPSLOCK"),
]);

pub static KD_KEYBOARD_TYPES: Xlat = Xlat::values(&[
    (1, "KB_84"),
    (2, "KB_101"),
    (3, "KB_OTHER"),
]);

pub static KD_MODES: Xlat = Xlat::values(&[
    (0, "KD_TEXT"),
    (1, "KD_GRAPHICS"),
    (2, "KD_TEXT0"),
    (3, "KD_TEXT1"),
]);

pub static KD_KBD_MODES: Xlat = Xlat::values(&[
    (0, "K_RAW"),
    (1, "K_XLATE"),
    (2, "K_MEDIUMRAW"),
    (3, "K_UNICODE"),
    (4, "K_OFF"),
]);

pub static KD_META_MODES: Xlat = Xlat::values(&[(3, "K_METABIT"), (4, "K_ESCPREFIX")]);

pub static KD_KBENTRY_TABLES: Xlat = Xlat::values(&[
    (0, "K_NORMTAB"),
    (1, "K_SHIFTTAB"),
    (2, "K_ALTTAB"),
    (3, "K_ALTSHIFTTAB"),
]);

pub static KD_KEY_FN_KEYS: Xlat = Xlat::values(&[
    (0, "KVAL(K_F1)"),
    (1, "KVAL(K_F2)"),
    (2, "KVAL(K_F3)"),
    (3, "KVAL(K_F4)"),
    (4, "KVAL(K_F5)"),
    (5, "KVAL(K_F6)"),
    (6, "KVAL(K_F7)"),
    (7, "KVAL(K_F8)"),
    (8, "KVAL(K_F9)"),
    (9, "KVAL(K_F10)"),
    (10, "KVAL(K_F11)"),
    (11, "KVAL(K_F12)"),
    (12, "KVAL(K_F13)"),
    (13, "KVAL(K_F14)"),
    (14, "KVAL(K_F15)"),
    (15, "KVAL(K_F16)"),
    (16, "KVAL(K_F17)"),
    (17, "KVAL(K_F18)"),
    (18, "KVAL(K_F19)"),
    (19, "KVAL(K_F20)"),
    (20, "KVAL(K_FIND)"),
    (21, "KVAL(K_INSERT)"),
    (22, "KVAL(K_REMOVE)"),
    (23, "KVAL(K_SELECT)"),
    (24, "KVAL(K_PGUP)"),
    (25, "KVAL(K_PGDN)"),
    (26, "KVAL(K_MACRO)"),
    (27, "KVAL(K_HELP)"),
    (28, "KVAL(K_DO)"),
    (29, "KVAL(K_PAUSE)"),
])
.dec();

pub const KIOCSOUND: u64 = 0x4B2F;
pub const KDMKTONE: u64 = 0x4B30;
pub const KDGETLED: u64 = 0x4B31;
pub const KDSETLED: u64 = 0x4B32;
pub const KDGKBTYPE: u64 = 0x4B33;
pub const KDSETMODE: u64 = 0x4B3A;
pub const KDGETMODE: u64 = 0x4B3B;
pub const KDGKBMODE: u64 = 0x4B44;
pub const KDSKBMODE: u64 = 0x4B45;
pub const KDGKBENT: u64 = 0x4B46;
pub const KDSKBENT: u64 = 0x4B47;
pub const KDGKBSENT: u64 = 0x4B48;
pub const KDSKBSENT: u64 = 0x4B49;
pub const KDGETKEYCODE: u64 = 0x4B4C;
pub const KDSETKEYCODE: u64 = 0x4B4D;
pub const KDSIGACCEPT: u64 = 0x4B4E;
pub const KDKBDREP: u64 = 0x4B52;
pub const KDGKBMETA: u64 = 0x4B62;
pub const KDSKBMETA: u64 = 0x4B63;
pub const KDGKBLED: u64 = 0x4B64;
pub const KDSKBLED: u64 = 0x4B65;

pub static KD_IOCTLS: Xlat = Xlat::values(&[
    (KIOCSOUND, "KIOCSOUND"),
    (KDMKTONE, "KDMKTONE"),
    (KDGETLED, "KDGETLED"),
    (KDSETLED, "KDSETLED"),
    (KDGKBTYPE, "KDGKBTYPE"),
    (KDSETMODE, "KDSETMODE"),
    (KDGETMODE, "KDGETMODE"),
    (KDGKBMODE, "KDGKBMODE"),
    (KDSKBMODE, "KDSKBMODE"),
    (KDGKBENT, "KDGKBENT"),
    (KDSKBENT, "KDSKBENT"),
    (KDGKBSENT, "KDGKBSENT"),
    (KDSKBSENT, "KDSKBSENT"),
    (KDGETKEYCODE, "KDGETKEYCODE"),
    (KDSETKEYCODE, "KDSETKEYCODE"),
    (KDSIGACCEPT, "KDSIGACCEPT"),
    (KDKBDREP, "KDKBDREP"),
    (KDGKBMETA, "KDGKBMETA"),
    (KDSKBMETA, "KDSKBMETA"),
    (KDGKBLED, "KDGKBLED"),
    (KDSKBLED, "KDSKBLED"),
]);
