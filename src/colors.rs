use colored::CustomColor;
use std::sync::LazyLock;

pub static TERMINAL_THEME: LazyLock<termbg::Theme> = LazyLock::new(|| {
    termbg::theme(std::time::Duration::from_millis(10)).unwrap_or(termbg::Theme::Dark)
});

pub static GENERAL_TEXT_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((64, 64, 64), (160, 160, 160)));
pub static PID_NUMBER_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((0, 0, 140), (0, 173, 216)));
pub static EXITED_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((160, 40, 40), (250, 120, 120)));
pub static FAILED_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((190, 0, 0), (255, 80, 80)));
pub static UNFINISHED_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((82, 138, 174), (47, 86, 54)));

// one color per syscall family, picked by name
pub static FILE_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((112, 127, 35), (187, 142, 35)));
pub static IPC_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((0, 169, 223), (0, 169, 233)));
pub static SIGNAL_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((150, 60, 170), (190, 120, 230)));
pub static DEVICE_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((0, 130, 110), (0, 218, 180)));
pub static OTHER_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| from_terminal_theme((30, 30, 30), (230, 230, 230)));

fn from_terminal_theme(
    (light_r, light_g, light_b): (u8, u8, u8),
    (dark_r, dark_g, dark_b): (u8, u8, u8),
) -> CustomColor {
    match *TERMINAL_THEME {
        termbg::Theme::Light => CustomColor::new(light_r, light_g, light_b),
        termbg::Theme::Dark => CustomColor::new(dark_r, dark_g, dark_b),
    }
}

/// The color a syscall's name is printed in.
pub fn syscall_color(name: &str) -> CustomColor {
    match name {
        "open" | "openat" | "close" | "dup" | "dup2" | "dup3" | "read" | "write"
        | "inotify_init1" | "mount_setattr" => *FILE_COLOR,
        "ipc" | "msgget" | "msgsnd" | "msgrcv" | "msgctl" | "semget" | "semop"
        | "semtimedop" | "semtimedop_time64" | "semctl" | "shmget" | "shmat" | "shmdt"
        | "shmctl" => *IPC_COLOR,
        "rt_sigprocmask" | "rt_sigpending" | "kill" | "tgkill" => *SIGNAL_COLOR,
        "ioctl" | "perf_event_open" | "userfaultfd" => *DEVICE_COLOR,
        _ => *OTHER_COLOR,
    }
}
