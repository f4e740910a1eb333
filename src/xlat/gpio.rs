use super::Xlat;

pub const GPIOHANDLES_MAX: usize = 64;
pub const GPIO_V2_LINES_MAX: usize = 64;
pub const GPIO_V2_LINE_NUM_ATTRS_MAX: usize = 10;

pub const GPIOHANDLE_REQUEST_OUTPUT: u64 = 1 << 1;

pub static GPIO_HANDLE_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "GPIOHANDLE_REQUEST_INPUT"),
    (1 << 1, "GPIOHANDLE_REQUEST_OUTPUT"),
    (1 << 2, "GPIOHANDLE_REQUEST_ACTIVE_LOW"),
    (1 << 3, "GPIOHANDLE_REQUEST_OPEN_DRAIN"),
    (1 << 4, "GPIOHANDLE_REQUEST_OPEN_SOURCE"),
    (1 << 5, "GPIOHANDLE_REQUEST_BIAS_PULL_UP"),
    (1 << 6, "GPIOHANDLE_REQUEST_BIAS_PULL_DOWN"),
    (1 << 7, "GPIOHANDLE_REQUEST_BIAS_DISABLE"),
]);

pub static GPIO_LINE_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "GPIOLINE_FLAG_KERNEL"),
    (1 << 1, "GPIOLINE_FLAG_IS_OUT"),
    (1 << 2, "GPIOLINE_FLAG_ACTIVE_LOW"),
    (1 << 3, "GPIOLINE_FLAG_OPEN_DRAIN"),
    (1 << 4, "GPIOLINE_FLAG_OPEN_SOURCE"),
    (1 << 5, "GPIOLINE_FLAG_BIAS_PULL_UP"),
    (1 << 6, "GPIOLINE_FLAG_BIAS_PULL_DOWN"),
    (1 << 7, "GPIOLINE_FLAG_BIAS_DISABLE"),
]);

pub static GPIO_EVENT_FLAGS: Xlat = Xlat::flags(&[
    (0x3, "GPIOEVENT_REQUEST_BOTH_EDGES"),
    (0x1, "GPIOEVENT_REQUEST_RISING_EDGE"),
    (0x2, "GPIOEVENT_REQUEST_FALLING_EDGE"),
]);

pub static GPIO_V2_LINE_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "GPIO_V2_LINE_FLAG_USED"),
    (1 << 1, "GPIO_V2_LINE_FLAG_ACTIVE_LOW"),
    (1 << 2, "GPIO_V2_LINE_FLAG_INPUT"),
    (1 << 3, "GPIO_V2_LINE_FLAG_OUTPUT"),
    (1 << 4, "GPIO_V2_LINE_FLAG_EDGE_RISING"),
    (1 << 5, "GPIO_V2_LINE_FLAG_EDGE_FALLING"),
    (1 << 6, "GPIO_V2_LINE_FLAG_OPEN_DRAIN"),
    (1 << 7, "GPIO_V2_LINE_FLAG_OPEN_SOURCE"),
    (1 << 8, "GPIO_V2_LINE_FLAG_BIAS_PULL_UP"),
    (1 << 9, "GPIO_V2_LINE_FLAG_BIAS_PULL_DOWN"),
    (1 << 10, "GPIO_V2_LINE_FLAG_BIAS_DISABLED"),
    (1 << 11, "GPIO_V2_LINE_FLAG_EVENT_CLOCK_REALTIME"),
    (1 << 12, "GPIO_V2_LINE_FLAG_EVENT_CLOCK_HTE"),
]);

pub const GPIO_V2_LINE_ATTR_ID_FLAGS: u64 = 1;
pub const GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES: u64 = 2;
pub const GPIO_V2_LINE_ATTR_ID_DEBOUNCE: u64 = 3;

pub static GPIO_V2_LINE_ATTR_IDS: Xlat = Xlat::values(&[
    (GPIO_V2_LINE_ATTR_ID_FLAGS, "GPIO_V2_LINE_ATTR_ID_FLAGS"),
    (GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES, "GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES"),
    (GPIO_V2_LINE_ATTR_ID_DEBOUNCE, "GPIO_V2_LINE_ATTR_ID_DEBOUNCE"),
]);

pub const GPIO_GET_CHIPINFO_IOCTL: u32 = 0x8044_b401;
pub const GPIO_GET_LINEINFO_IOCTL: u32 = 0xc048_b402;
pub const GPIO_GET_LINEHANDLE_IOCTL: u32 = 0xc16c_b403;
pub const GPIO_GET_LINEEVENT_IOCTL: u32 = 0xc030_b404;
pub const GPIO_V2_GET_LINEINFO_IOCTL: u32 = 0xc100_b405;
pub const GPIO_V2_GET_LINEINFO_WATCH_IOCTL: u32 = 0xc100_b406;
pub const GPIO_V2_GET_LINE_IOCTL: u32 = 0xc250_b407;
pub const GPIOHANDLE_GET_LINE_VALUES_IOCTL: u32 = 0xc040_b408;
pub const GPIOHANDLE_SET_LINE_VALUES_IOCTL: u32 = 0xc040_b409;
pub const GPIOHANDLE_SET_CONFIG_IOCTL: u32 = 0xc054_b40a;
pub const GPIO_GET_LINEINFO_WATCH_IOCTL: u32 = 0xc048_b40b;
pub const GPIO_GET_LINEINFO_UNWATCH_IOCTL: u32 = 0xc004_b40c;
pub const GPIO_V2_LINE_SET_CONFIG_IOCTL: u32 = 0xc110_b40d;
pub const GPIO_V2_LINE_GET_VALUES_IOCTL: u32 = 0xc010_b40e;
pub const GPIO_V2_LINE_SET_VALUES_IOCTL: u32 = 0xc010_b40f;

pub static GPIO_IOCTLS: Xlat = Xlat::values(&[
    (GPIO_GET_CHIPINFO_IOCTL as u64, "GPIO_GET_CHIPINFO_IOCTL"),
    (GPIO_GET_LINEINFO_IOCTL as u64, "GPIO_GET_LINEINFO_IOCTL"),
    (GPIO_GET_LINEHANDLE_IOCTL as u64, "GPIO_GET_LINEHANDLE_IOCTL"),
    (GPIO_GET_LINEEVENT_IOCTL as u64, "GPIO_GET_LINEEVENT_IOCTL"),
    (GPIO_V2_GET_LINEINFO_IOCTL as u64, "GPIO_V2_GET_LINEINFO_IOCTL"),
    (GPIO_V2_GET_LINEINFO_WATCH_IOCTL as u64, "GPIO_V2_GET_LINEINFO_WATCH_IOCTL"),
    (GPIO_V2_GET_LINE_IOCTL as u64, "GPIO_V2_GET_LINE_IOCTL"),
    (GPIOHANDLE_GET_LINE_VALUES_IOCTL as u64, "GPIOHANDLE_GET_LINE_VALUES_IOCTL"),
    (GPIOHANDLE_SET_LINE_VALUES_IOCTL as u64, "GPIOHANDLE_SET_LINE_VALUES_IOCTL"),
    (GPIOHANDLE_SET_CONFIG_IOCTL as u64, "GPIOHANDLE_SET_CONFIG_IOCTL"),
    (GPIO_GET_LINEINFO_WATCH_IOCTL as u64, "GPIO_GET_LINEINFO_WATCH_IOCTL"),
    (GPIO_GET_LINEINFO_UNWATCH_IOCTL as u64, "GPIO_GET_LINEINFO_UNWATCH_IOCTL"),
    (GPIO_V2_LINE_SET_CONFIG_IOCTL as u64, "GPIO_V2_LINE_SET_CONFIG_IOCTL"),
    (GPIO_V2_LINE_GET_VALUES_IOCTL as u64, "GPIO_V2_LINE_GET_VALUES_IOCTL"),
    (GPIO_V2_LINE_SET_VALUES_IOCTL as u64, "GPIO_V2_LINE_SET_VALUES_IOCTL"),
]);
