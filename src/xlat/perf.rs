// perf_event_open and the perf ioctls

use super::Xlat;

pub const PERF_TYPE_HARDWARE: u64 = 0;
pub const PERF_TYPE_SOFTWARE: u64 = 1;
pub const PERF_TYPE_TRACEPOINT: u64 = 2;
pub const PERF_TYPE_HW_CACHE: u64 = 3;
pub const PERF_TYPE_RAW: u64 = 4;
pub const PERF_TYPE_BREAKPOINT: u64 = 5;

pub static PERF_TYPE_ID: Xlat = Xlat::values(&[
    (PERF_TYPE_HARDWARE, "PERF_TYPE_HARDWARE"),
    (PERF_TYPE_SOFTWARE, "PERF_TYPE_SOFTWARE"),
    (PERF_TYPE_TRACEPOINT, "PERF_TYPE_TRACEPOINT"),
    (PERF_TYPE_HW_CACHE, "PERF_TYPE_HW_CACHE"),
    (PERF_TYPE_RAW, "PERF_TYPE_RAW"),
    (PERF_TYPE_BREAKPOINT, "PERF_TYPE_BREAKPOINT"),
]);

pub const PERF_ATTR_SIZE_VER0: usize = 64;
pub const PERF_ATTR_SIZE_VER1: usize = 72;
pub const PERF_ATTR_SIZE_VER2: usize = 80;
pub const PERF_ATTR_SIZE_VER3: usize = 96;
pub const PERF_ATTR_SIZE_VER4: usize = 104;
pub const PERF_ATTR_SIZE_VER5: usize = 112;
pub const PERF_ATTR_SIZE_VER6: usize = 120;
pub const PERF_ATTR_SIZE_VER7: usize = 128;
pub const PERF_ATTR_SIZE_VER8: usize = 136;

pub static PERF_ATTR_SIZE: Xlat = Xlat::values(&[
    (PERF_ATTR_SIZE_VER0 as u64, "PERF_ATTR_SIZE_VER0"),
    (PERF_ATTR_SIZE_VER1 as u64, "PERF_ATTR_SIZE_VER1"),
    (PERF_ATTR_SIZE_VER2 as u64, "PERF_ATTR_SIZE_VER2"),
    (PERF_ATTR_SIZE_VER3 as u64, "PERF_ATTR_SIZE_VER3"),
    (PERF_ATTR_SIZE_VER4 as u64, "PERF_ATTR_SIZE_VER4"),
    (PERF_ATTR_SIZE_VER5 as u64, "PERF_ATTR_SIZE_VER5"),
    (PERF_ATTR_SIZE_VER6 as u64, "PERF_ATTR_SIZE_VER6"),
    (PERF_ATTR_SIZE_VER7 as u64, "PERF_ATTR_SIZE_VER7"),
    (PERF_ATTR_SIZE_VER8 as u64, "PERF_ATTR_SIZE_VER8"),
]);

pub static PERF_HW_ID: Xlat = Xlat::values(&[
    (0, "PERF_COUNT_HW_CPU_CYCLES"),
    (1, "PERF_COUNT_HW_INSTRUCTIONS"),
    (2, "PERF_COUNT_HW_CACHE_REFERENCES"),
    (3, "PERF_COUNT_HW_CACHE_MISSES"),
    (4, "PERF_COUNT_HW_BRANCH_INSTRUCTIONS"),
    (5, "PERF_COUNT_HW_BRANCH_MISSES"),
    (6, "PERF_COUNT_HW_BUS_CYCLES"),
    (7, "PERF_COUNT_HW_STALLED_CYCLES_FRONTEND"),
    (8, "PERF_COUNT_HW_STALLED_CYCLES_BACKEND"),
    (9, "PERF_COUNT_HW_REF_CPU_CYCLES"),
]);

pub static PERF_SW_IDS: Xlat = Xlat::values(&[
    (0, "PERF_COUNT_SW_CPU_CLOCK"),
    (1, "PERF_COUNT_SW_TASK_CLOCK"),
    (2, "PERF_COUNT_SW_PAGE_FAULTS"),
    (3, "PERF_COUNT_SW_CONTEXT_SWITCHES"),
    (4, "PERF_COUNT_SW_CPU_MIGRATIONS"),
    (5, "PERF_COUNT_SW_PAGE_FAULTS_MIN"),
    (6, "PERF_COUNT_SW_PAGE_FAULTS_MAJ"),
    (7, "PERF_COUNT_SW_ALIGNMENT_FAULTS"),
    (8, "PERF_COUNT_SW_EMULATION_FAULTS"),
    (9, "PERF_COUNT_SW_DUMMY"),
    (10, "PERF_COUNT_SW_BPF_OUTPUT"),
    (11, "PERF_COUNT_SW_CGROUP_SWITCHES"),
]);

pub static PERF_HW_CACHE_ID: Xlat = Xlat::values(&[
    (0, "PERF_COUNT_HW_CACHE_L1D"),
    (1, "PERF_COUNT_HW_CACHE_L1I"),
    (2, "PERF_COUNT_HW_CACHE_LL"),
    (3, "PERF_COUNT_HW_CACHE_DTLB"),
    (4, "PERF_COUNT_HW_CACHE_ITLB"),
    (5, "PERF_COUNT_HW_CACHE_BPU"),
    (6, "PERF_COUNT_HW_CACHE_NODE"),
]);

pub static PERF_HW_CACHE_OP_ID: Xlat = Xlat::values(&[
    (0, "PERF_COUNT_HW_CACHE_OP_READ"),
    (1, "PERF_COUNT_HW_CACHE_OP_WRITE"),
    (2, "PERF_COUNT_HW_CACHE_OP_PREFETCH"),
]);

pub static PERF_HW_CACHE_OP_RESULT_ID: Xlat = Xlat::values(&[
    (0, "PERF_COUNT_HW_CACHE_RESULT_ACCESS"),
    (1, "PERF_COUNT_HW_CACHE_RESULT_MISS"),
]);

pub const PERF_SAMPLE_BRANCH_STACK: u64 = 1 << 11;

pub static PERF_EVENT_SAMPLE_FORMAT: Xlat = Xlat::flags(&[
    (1 << 0, "PERF_SAMPLE_IP"),
    (1 << 1, "PERF_SAMPLE_TID"),
    (1 << 2, "PERF_SAMPLE_TIME"),
    (1 << 3, "PERF_SAMPLE_ADDR"),
    (1 << 4, "PERF_SAMPLE_READ"),
    (1 << 5, "PERF_SAMPLE_CALLCHAIN"),
    (1 << 6, "PERF_SAMPLE_ID"),
    (1 << 7, "PERF_SAMPLE_CPU"),
    (1 << 8, "PERF_SAMPLE_PERIOD"),
    (1 << 9, "PERF_SAMPLE_STREAM_ID"),
    (1 << 10, "PERF_SAMPLE_RAW"),
    (1 << 11, "PERF_SAMPLE_BRANCH_STACK"),
    (1 << 12, "PERF_SAMPLE_REGS_USER"),
    (1 << 13, "PERF_SAMPLE_STACK_USER"),
    (1 << 14, "PERF_SAMPLE_WEIGHT"),
    (1 << 15, "PERF_SAMPLE_DATA_SRC"),
    (1 << 16, "PERF_SAMPLE_IDENTIFIER"),
    (1 << 17, "PERF_SAMPLE_TRANSACTION"),
    (1 << 18, "PERF_SAMPLE_REGS_INTR"),
    (1 << 19, "PERF_SAMPLE_PHYS_ADDR"),
    (1 << 20, "PERF_SAMPLE_AUX"),
    (1 << 21, "PERF_SAMPLE_CGROUP"),
    (1 << 22, "PERF_SAMPLE_DATA_PAGE_SIZE"),
    (1 << 23, "PERF_SAMPLE_CODE_PAGE_SIZE"),
    (1 << 24, "PERF_SAMPLE_WEIGHT_STRUCT"),
]);

pub static PERF_EVENT_READ_FORMAT: Xlat = Xlat::flags(&[
    (1 << 0, "PERF_FORMAT_TOTAL_TIME_ENABLED"),
    (1 << 1, "PERF_FORMAT_TOTAL_TIME_RUNNING"),
    (1 << 2, "PERF_FORMAT_ID"),
    (1 << 3, "PERF_FORMAT_GROUP"),
    (1 << 4, "PERF_FORMAT_LOST"),
]);

pub static PERF_BRANCH_SAMPLE_TYPE: Xlat = Xlat::flags(&[
    (1 << 0, "PERF_SAMPLE_BRANCH_USER"),
    (1 << 1, "PERF_SAMPLE_BRANCH_KERNEL"),
    (1 << 2, "PERF_SAMPLE_BRANCH_HV"),
    (1 << 3, "PERF_SAMPLE_BRANCH_ANY"),
    (1 << 4, "PERF_SAMPLE_BRANCH_ANY_CALL"),
    (1 << 5, "PERF_SAMPLE_BRANCH_ANY_RETURN"),
    (1 << 6, "PERF_SAMPLE_BRANCH_IND_CALL"),
    (1 << 7, "PERF_SAMPLE_BRANCH_ABORT_TX"),
    (1 << 8, "PERF_SAMPLE_BRANCH_IN_TX"),
    (1 << 9, "PERF_SAMPLE_BRANCH_NO_TX"),
    (1 << 10, "PERF_SAMPLE_BRANCH_COND"),
    (1 << 11, "PERF_SAMPLE_BRANCH_CALL_STACK"),
    (1 << 12, "PERF_SAMPLE_BRANCH_IND_JUMP"),
    (1 << 13, "PERF_SAMPLE_BRANCH_CALL"),
    (1 << 14, "PERF_SAMPLE_BRANCH_NO_FLAGS"),
    (1 << 15, "PERF_SAMPLE_BRANCH_NO_CYCLES"),
    (1 << 16, "PERF_SAMPLE_BRANCH_TYPE_SAVE"),
    (1 << 17, "PERF_SAMPLE_BRANCH_HW_INDEX"),
    (1 << 18, "PERF_SAMPLE_BRANCH_PRIV_SAVE"),
]);

pub static HW_BREAKPOINT_TYPE: Xlat = Xlat::flags(&[
    (0, "HW_BREAKPOINT_EMPTY"),
    (3, "HW_BREAKPOINT_RW"),
    (1, "HW_BREAKPOINT_R"),
    (2, "HW_BREAKPOINT_W"),
    (4, "HW_BREAKPOINT_X"),
]);

pub static HW_BREAKPOINT_LEN: Xlat = Xlat::values(&[
    (1, "HW_BREAKPOINT_LEN_1"),
    (2, "HW_BREAKPOINT_LEN_2"),
    (3, "HW_BREAKPOINT_LEN_3"),
    (4, "HW_BREAKPOINT_LEN_4"),
    (5, "HW_BREAKPOINT_LEN_5"),
    (6, "HW_BREAKPOINT_LEN_6"),
    (7, "HW_BREAKPOINT_LEN_7"),
    (8, "HW_BREAKPOINT_LEN_8"),
]);

pub static CLOCKNAMES: Xlat = Xlat::values(&[
    (0, "CLOCK_REALTIME"),
    (1, "CLOCK_MONOTONIC"),
    (2, "CLOCK_PROCESS_CPUTIME_ID"),
    (3, "CLOCK_THREAD_CPUTIME_ID"),
    (4, "CLOCK_MONOTONIC_RAW"),
    (5, "CLOCK_REALTIME_COARSE"),
    (6, "CLOCK_MONOTONIC_COARSE"),
    (7, "CLOCK_BOOTTIME"),
    (8, "CLOCK_REALTIME_ALARM"),
    (9, "CLOCK_BOOTTIME_ALARM"),
    (10, "CLOCK_SGI_CYCLE"),
    (11, "CLOCK_TAI"),
])
.signed();

pub static PERF_EVENT_OPEN_FLAGS: Xlat = Xlat::flags(&[
    (1 << 0, "PERF_FLAG_FD_NO_GROUP"),
    (1 << 1, "PERF_FLAG_FD_OUTPUT"),
    (1 << 2, "PERF_FLAG_PID_CGROUP"),
    (1 << 3, "PERF_FLAG_FD_CLOEXEC"),
]);

pub static PERF_IOCTL_FLAGS: Xlat = Xlat::flags(&[(1, "PERF_IOC_FLAG_GROUP")]);

pub static PRECISE_IP_DESC: [&str; 4] = [
    "arbitrary skid",
    "constant skid",
    "requested to have 0 skid",
    "must have 0 skid",
];

pub const PERF_EVENT_IOC_ENABLE: u32 = 0x2400;
pub const PERF_EVENT_IOC_DISABLE: u32 = 0x2401;
pub const PERF_EVENT_IOC_REFRESH: u32 = 0x2402;
pub const PERF_EVENT_IOC_RESET: u32 = 0x2403;
pub const PERF_EVENT_IOC_PERIOD: u32 = 0x4008_2404;
pub const PERF_EVENT_IOC_SET_OUTPUT: u32 = 0x2405;
pub const PERF_EVENT_IOC_SET_BPF: u32 = 0x4004_2408;
pub const PERF_EVENT_IOC_PAUSE_OUTPUT: u32 = 0x4004_2409;

// these encode the size of a pointer
pub const PERF_EVENT_IOC_SET_FILTER: u32 = 0x4008_2406;
pub const PERF_EVENT_IOC_ID: u32 = 0x8008_2407;
pub const PERF_EVENT_IOC_QUERY_BPF: u32 = 0xc008_240a;
pub const PERF_EVENT_IOC_MODIFY_ATTRIBUTES: u32 = 0x4008_240b;
pub const PERF_EVENT_IOC_SET_FILTER_32: u32 = 0x4004_2406;
pub const PERF_EVENT_IOC_ID_32: u32 = 0x8004_2407;
pub const PERF_EVENT_IOC_QUERY_BPF_32: u32 = 0xc004_240a;
pub const PERF_EVENT_IOC_MODIFY_ATTRIBUTES_32: u32 = 0x4004_240b;

pub static PERF_IOCTLS: Xlat = Xlat::values(&[
    (PERF_EVENT_IOC_ENABLE as u64, "PERF_EVENT_IOC_ENABLE"),
    (PERF_EVENT_IOC_DISABLE as u64, "PERF_EVENT_IOC_DISABLE"),
    (PERF_EVENT_IOC_REFRESH as u64, "PERF_EVENT_IOC_REFRESH"),
    (PERF_EVENT_IOC_RESET as u64, "PERF_EVENT_IOC_RESET"),
    (PERF_EVENT_IOC_PERIOD as u64, "PERF_EVENT_IOC_PERIOD"),
    (PERF_EVENT_IOC_SET_OUTPUT as u64, "PERF_EVENT_IOC_SET_OUTPUT"),
    (PERF_EVENT_IOC_SET_BPF as u64, "PERF_EVENT_IOC_SET_BPF"),
    (PERF_EVENT_IOC_PAUSE_OUTPUT as u64, "PERF_EVENT_IOC_PAUSE_OUTPUT"),
    (PERF_EVENT_IOC_SET_FILTER as u64, "PERF_EVENT_IOC_SET_FILTER"),
    (PERF_EVENT_IOC_ID as u64, "PERF_EVENT_IOC_ID"),
    (PERF_EVENT_IOC_QUERY_BPF as u64, "PERF_EVENT_IOC_QUERY_BPF"),
    (PERF_EVENT_IOC_MODIFY_ATTRIBUTES as u64, "PERF_EVENT_IOC_MODIFY_ATTRIBUTES"),
]);

pub static PERF_IOCTLS_32: Xlat = Xlat::values(&[
    (PERF_EVENT_IOC_ENABLE as u64, "PERF_EVENT_IOC_ENABLE"),
    (PERF_EVENT_IOC_DISABLE as u64, "PERF_EVENT_IOC_DISABLE"),
    (PERF_EVENT_IOC_REFRESH as u64, "PERF_EVENT_IOC_REFRESH"),
    (PERF_EVENT_IOC_RESET as u64, "PERF_EVENT_IOC_RESET"),
    (PERF_EVENT_IOC_PERIOD as u64, "PERF_EVENT_IOC_PERIOD"),
    (PERF_EVENT_IOC_SET_OUTPUT as u64, "PERF_EVENT_IOC_SET_OUTPUT"),
    (PERF_EVENT_IOC_SET_BPF as u64, "PERF_EVENT_IOC_SET_BPF"),
    (PERF_EVENT_IOC_PAUSE_OUTPUT as u64, "PERF_EVENT_IOC_PAUSE_OUTPUT"),
    (PERF_EVENT_IOC_SET_FILTER_32 as u64, "PERF_EVENT_IOC_SET_FILTER"),
    (PERF_EVENT_IOC_ID_32 as u64, "PERF_EVENT_IOC_ID"),
    (PERF_EVENT_IOC_QUERY_BPF_32 as u64, "PERF_EVENT_IOC_QUERY_BPF"),
    (PERF_EVENT_IOC_MODIFY_ATTRIBUTES_32 as u64, "PERF_EVENT_IOC_MODIFY_ATTRIBUTES"),
]);
