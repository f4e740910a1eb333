use super::Xlat;

pub const V4L2_BUF_TYPE_VIDEO_CAPTURE: u64 = 1;
pub const V4L2_BUF_TYPE_VIDEO_OUTPUT: u64 = 2;

pub static V4L2_BUF_TYPES: Xlat = Xlat::values(&[
    (1, "V4L2_BUF_TYPE_VIDEO_CAPTURE"),
    (2, "V4L2_BUF_TYPE_VIDEO_OUTPUT"),
    (3, "V4L2_BUF_TYPE_VIDEO_OVERLAY"),
    (4, "V4L2_BUF_TYPE_VBI_CAPTURE"),
    (5, "V4L2_BUF_TYPE_VBI_OUTPUT"),
    (6, "V4L2_BUF_TYPE_SLICED_VBI_CAPTURE"),
    (7, "V4L2_BUF_TYPE_SLICED_VBI_OUTPUT"),
    (8, "V4L2_BUF_TYPE_VIDEO_OUTPUT_OVERLAY"),
    (9, "V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE"),
    (10, "V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE"),
    (11, "V4L2_BUF_TYPE_SDR_CAPTURE"),
    (12, "V4L2_BUF_TYPE_SDR_OUTPUT"),
    (13, "V4L2_BUF_TYPE_META_CAPTURE"),
    (14, "V4L2_BUF_TYPE_META_OUTPUT"),
]);

pub static V4L2_MEMORIES: Xlat = Xlat::values(&[
    (1, "V4L2_MEMORY_MMAP"),
    (2, "V4L2_MEMORY_USERPTR"),
    (3, "V4L2_MEMORY_OVERLAY"),
    (4, "V4L2_MEMORY_DMABUF"),
]);

pub static V4L2_FIELDS: Xlat = Xlat::values(&[
    (0, "V4L2_FIELD_ANY"),
    (1, "V4L2_FIELD_NONE"),
    (2, "V4L2_FIELD_TOP"),
    (3, "V4L2_FIELD_BOTTOM"),
    (4, "V4L2_FIELD_INTERLACED"),
    (5, "V4L2_FIELD_SEQ_TB"),
    (6, "V4L2_FIELD_SEQ_BT"),
    (7, "V4L2_FIELD_ALTERNATE"),
    (8, "V4L2_FIELD_INTERLACED_TB"),
    (9, "V4L2_FIELD_INTERLACED_BT"),
]);

pub static V4L2_COLORSPACES: Xlat = Xlat::values(&[
    (0, "V4L2_COLORSPACE_DEFAULT"),
    (1, "V4L2_COLORSPACE_SMPTE170M"),
    (2, "V4L2_COLORSPACE_SMPTE240M"),
    (3, "V4L2_COLORSPACE_REC709"),
    (4, "V4L2_COLORSPACE_BT878"),
    (5, "V4L2_COLORSPACE_470_SYSTEM_M"),
    (6, "V4L2_COLORSPACE_470_SYSTEM_BG"),
    (7, "V4L2_COLORSPACE_JPEG"),
    (8, "V4L2_COLORSPACE_SRGB"),
    (9, "V4L2_COLORSPACE_OPRGB"),
    (10, "V4L2_COLORSPACE_BT2020"),
    (11, "V4L2_COLORSPACE_RAW"),
    (12, "V4L2_COLORSPACE_DCI_P3"),
]);

pub static V4L2_DEVICE_CAPABILITIES_FLAGS: Xlat = Xlat::flags(&[
    (0x00000001, "V4L2_CAP_VIDEO_CAPTURE"),
    (0x00000002, "V4L2_CAP_VIDEO_OUTPUT"),
    (0x00000004, "V4L2_CAP_VIDEO_OVERLAY"),
    (0x00000010, "V4L2_CAP_VBI_CAPTURE"),
    (0x00000020, "V4L2_CAP_VBI_OUTPUT"),
    (0x00000040, "V4L2_CAP_SLICED_VBI_CAPTURE"),
    (0x00000080, "V4L2_CAP_SLICED_VBI_OUTPUT"),
    (0x00000100, "V4L2_CAP_RDS_CAPTURE"),
    (0x00000200, "V4L2_CAP_VIDEO_OUTPUT_OVERLAY"),
    (0x00000400, "V4L2_CAP_HW_FREQ_SEEK"),
    (0x00000800, "V4L2_CAP_RDS_OUTPUT"),
    (0x00001000, "V4L2_CAP_VIDEO_CAPTURE_MPLANE"),
    (0x00002000, "V4L2_CAP_VIDEO_OUTPUT_MPLANE"),
    (0x00004000, "V4L2_CAP_VIDEO_M2M_MPLANE"),
    (0x00008000, "V4L2_CAP_VIDEO_M2M"),
    (0x00010000, "V4L2_CAP_TUNER"),
    (0x00020000, "V4L2_CAP_AUDIO"),
    (0x00040000, "V4L2_CAP_RADIO"),
    (0x00080000, "V4L2_CAP_MODULATOR"),
    (0x00100000, "V4L2_CAP_SDR_CAPTURE"),
    (0x00200000, "V4L2_CAP_EXT_PIX_FORMAT"),
    (0x00400000, "V4L2_CAP_SDR_OUTPUT"),
    (0x00800000, "V4L2_CAP_META_CAPTURE"),
    (0x01000000, "V4L2_CAP_READWRITE"),
    (0x04000000, "V4L2_CAP_STREAMING"),
    (0x08000000, "V4L2_CAP_META_OUTPUT"),
    (0x10000000, "V4L2_CAP_TOUCH"),
    (0x20000000, "V4L2_CAP_IO_MC"),
    (0x80000000, "V4L2_CAP_DEVICE_CAPS"),
]);

pub static V4L2_FORMAT_DESCRIPTION_FLAGS: Xlat = Xlat::flags(&[
    (0x0001, "V4L2_FMT_FLAG_COMPRESSED"),
    (0x0002, "V4L2_FMT_FLAG_EMULATED"),
    (0x0004, "V4L2_FMT_FLAG_CONTINUOUS_BYTESTREAM"),
    (0x0008, "V4L2_FMT_FLAG_DYN_RESOLUTION"),
]);

pub static V4L2_CONTROL_IDS: Xlat = Xlat::values(&[
    (0x0098_0900, "V4L2_CID_BRIGHTNESS"),
    (0x0098_0901, "V4L2_CID_CONTRAST"),
    (0x0098_0902, "V4L2_CID_SATURATION"),
    (0x0098_0903, "V4L2_CID_HUE"),
    (0x0098_0905, "V4L2_CID_AUDIO_VOLUME"),
    (0x0098_0906, "V4L2_CID_AUDIO_BALANCE"),
    (0x0098_0907, "V4L2_CID_AUDIO_BASS"),
    (0x0098_0908, "V4L2_CID_AUDIO_TREBLE"),
    (0x0098_0909, "V4L2_CID_AUDIO_MUTE"),
    (0x0098_090a, "V4L2_CID_AUDIO_LOUDNESS"),
    (0x0098_090b, "V4L2_CID_BLACK_LEVEL"),
    (0x0098_090c, "V4L2_CID_AUTO_WHITE_BALANCE"),
    (0x0098_090d, "V4L2_CID_DO_WHITE_BALANCE"),
    (0x0098_090e, "V4L2_CID_RED_BALANCE"),
    (0x0098_090f, "V4L2_CID_BLUE_BALANCE"),
    (0x0098_0910, "V4L2_CID_GAMMA"),
    (0x0098_0911, "V4L2_CID_EXPOSURE"),
    (0x0098_0912, "V4L2_CID_AUTOGAIN"),
    (0x0098_0913, "V4L2_CID_GAIN"),
    (0x0098_0914, "V4L2_CID_HFLIP"),
    (0x0098_0915, "V4L2_CID_VFLIP"),
    (0x0098_0918, "V4L2_CID_POWER_LINE_FREQUENCY"),
    (0x0098_0919, "V4L2_CID_HUE_AUTO"),
    (0x0098_091a, "V4L2_CID_WHITE_BALANCE_TEMPERATURE"),
    (0x0098_091b, "V4L2_CID_SHARPNESS"),
    (0x0098_091c, "V4L2_CID_BACKLIGHT_COMPENSATION"),
]);

pub const VIDIOC_QUERYCAP: u32 = 0x8068_5600;
pub const VIDIOC_ENUM_FMT: u32 = 0xc040_5602;
pub const VIDIOC_G_FMT: u32 = 0xc0d0_5604;
pub const VIDIOC_S_FMT: u32 = 0xc0d0_5605;
pub const VIDIOC_TRY_FMT: u32 = 0xc0d0_5640;
pub const VIDIOC_REQBUFS: u32 = 0xc014_5608;
pub const VIDIOC_STREAMON: u32 = 0x4004_5612;
pub const VIDIOC_STREAMOFF: u32 = 0x4004_5613;
pub const VIDIOC_G_CTRL: u32 = 0xc008_561b;
pub const VIDIOC_S_CTRL: u32 = 0xc008_561c;
pub const VIDIOC_G_INPUT: u32 = 0x8004_5626;
pub const VIDIOC_S_INPUT: u32 = 0xc004_5627;

// struct v4l2_format is 204 bytes where pointers are 4 bytes wide
pub const VIDIOC_G_FMT_32: u32 = 0xc0cc_5604;
pub const VIDIOC_S_FMT_32: u32 = 0xc0cc_5605;
pub const VIDIOC_TRY_FMT_32: u32 = 0xc0cc_5640;

pub static V4L2_IOCTLS: Xlat = Xlat::values(&[
    (VIDIOC_QUERYCAP as u64, "VIDIOC_QUERYCAP"),
    (VIDIOC_ENUM_FMT as u64, "VIDIOC_ENUM_FMT"),
    (VIDIOC_G_FMT as u64, "VIDIOC_G_FMT"),
    (VIDIOC_S_FMT as u64, "VIDIOC_S_FMT"),
    (VIDIOC_TRY_FMT as u64, "VIDIOC_TRY_FMT"),
    (VIDIOC_REQBUFS as u64, "VIDIOC_REQBUFS"),
    (VIDIOC_STREAMON as u64, "VIDIOC_STREAMON"),
    (VIDIOC_STREAMOFF as u64, "VIDIOC_STREAMOFF"),
    (VIDIOC_G_CTRL as u64, "VIDIOC_G_CTRL"),
    (VIDIOC_S_CTRL as u64, "VIDIOC_S_CTRL"),
    (VIDIOC_G_INPUT as u64, "VIDIOC_G_INPUT"),
    (VIDIOC_S_INPUT as u64, "VIDIOC_S_INPUT"),
]);

pub static V4L2_IOCTLS_32: Xlat = Xlat::values(&[
    (VIDIOC_QUERYCAP as u64, "VIDIOC_QUERYCAP"),
    (VIDIOC_ENUM_FMT as u64, "VIDIOC_ENUM_FMT"),
    (VIDIOC_G_FMT_32 as u64, "VIDIOC_G_FMT"),
    (VIDIOC_S_FMT_32 as u64, "VIDIOC_S_FMT"),
    (VIDIOC_TRY_FMT_32 as u64, "VIDIOC_TRY_FMT"),
    (VIDIOC_REQBUFS as u64, "VIDIOC_REQBUFS"),
    (VIDIOC_STREAMON as u64, "VIDIOC_STREAMON"),
    (VIDIOC_STREAMOFF as u64, "VIDIOC_STREAMOFF"),
    (VIDIOC_G_CTRL as u64, "VIDIOC_G_CTRL"),
    (VIDIOC_S_CTRL as u64, "VIDIOC_S_CTRL"),
    (VIDIOC_G_INPUT as u64, "VIDIOC_G_INPUT"),
    (VIDIOC_S_INPUT as u64, "VIDIOC_S_INPUT"),
]);
