use super::Xlat;

pub static UFFD_API_FEATURES: Xlat = Xlat::flags(&[
    (1 << 0, "UFFD_FEATURE_PAGEFAULT_FLAG_WP"),
    (1 << 1, "UFFD_FEATURE_EVENT_FORK"),
    (1 << 2, "UFFD_FEATURE_EVENT_REMAP"),
    (1 << 3, "UFFD_FEATURE_EVENT_REMOVE"),
    (1 << 4, "UFFD_FEATURE_MISSING_HUGETLBFS"),
    (1 << 5, "UFFD_FEATURE_MISSING_SHMEM"),
    (1 << 6, "UFFD_FEATURE_EVENT_UNMAP"),
    (1 << 7, "UFFD_FEATURE_SIGBUS"),
    (1 << 8, "UFFD_FEATURE_THREAD_ID"),
    (1 << 9, "UFFD_FEATURE_MINOR_HUGETLBFS"),
    (1 << 10, "UFFD_FEATURE_MINOR_SHMEM"),
    (1 << 11, "UFFD_FEATURE_EXACT_ADDRESS"),
    (1 << 12, "UFFD_FEATURE_WP_HUGETLBFS_SHMEM"),
    (1 << 13, "UFFD_FEATURE_WP_UNPOPULATED"),
    (1 << 14, "UFFD_FEATURE_POISON"),
    (1 << 15, "UFFD_FEATURE_WP_ASYNC"),
    (1 << 16, "UFFD_FEATURE_MOVE"),
]);

/// ioctls available on a freshly created descriptor
pub static UFFD_API_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0x00, "1<<_UFFDIO_REGISTER"),
    (1 << 0x01, "1<<_UFFDIO_UNREGISTER"),
    (1 << 0x3f, "1<<_UFFDIO_API"),
]);

/// ioctls available on a registered range
pub static UFFD_REGISTER_IOCTL_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0x02, "1<<_UFFDIO_WAKE"),
    (1 << 0x03, "1<<_UFFDIO_COPY"),
    (1 << 0x04, "1<<_UFFDIO_ZEROPAGE"),
    (1 << 0x06, "1<<_UFFDIO_WRITEPROTECT"),
    (1 << 0x07, "1<<_UFFDIO_CONTINUE"),
]);

pub static UFFD_REGISTER_MODE_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "UFFDIO_REGISTER_MODE_MISSING"),
    (1 << 1, "UFFDIO_REGISTER_MODE_WP"),
    (1 << 2, "UFFDIO_REGISTER_MODE_MINOR"),
]);

pub static UFFD_COPY_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "UFFDIO_COPY_MODE_DONTWAKE"),
    (1 << 1, "UFFDIO_COPY_MODE_WP"),
]);

pub static UFFD_ZEROPAGE_FLAGS: Xlat = Xlat::flags(&[(1 << 0, "UFFDIO_ZEROPAGE_MODE_DONTWAKE")]);

pub static UFFD_WRITEPROTECT_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "UFFDIO_WRITEPROTECT_MODE_WP"),
    (1 << 1, "UFFDIO_WRITEPROTECT_MODE_DONTWAKE"),
]);

pub static UFFD_CONTINUE_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "UFFDIO_CONTINUE_MODE_DONTWAKE"),
    (1 << 1, "UFFDIO_CONTINUE_MODE_WP"),
]);

pub const UFFDIO_API: u32 = 0xc018_aa3f;
pub const UFFDIO_REGISTER: u32 = 0xc020_aa00;
pub const UFFDIO_UNREGISTER: u32 = 0x8010_aa01;
pub const UFFDIO_WAKE: u32 = 0x8010_aa02;
pub const UFFDIO_COPY: u32 = 0xc028_aa03;
pub const UFFDIO_ZEROPAGE: u32 = 0xc020_aa04;
pub const UFFDIO_WRITEPROTECT: u32 = 0xc018_aa06;
pub const UFFDIO_CONTINUE: u32 = 0xc020_aa07;

pub static UFFD_IOCTLS: Xlat = Xlat::values(&[
    (UFFDIO_API as u64, "UFFDIO_API"),
    (UFFDIO_REGISTER as u64, "UFFDIO_REGISTER"),
    (UFFDIO_UNREGISTER as u64, "UFFDIO_UNREGISTER"),
    (UFFDIO_WAKE as u64, "UFFDIO_WAKE"),
    (UFFDIO_COPY as u64, "UFFDIO_COPY"),
    (UFFDIO_ZEROPAGE as u64, "UFFDIO_ZEROPAGE"),
    (UFFDIO_WRITEPROTECT as u64, "UFFDIO_WRITEPROTECT"),
    (UFFDIO_CONTINUE as u64, "UFFDIO_CONTINUE"),
]);
