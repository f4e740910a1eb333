// perf_event_open(2) and the '$' ioctls
//
// perf_event_attr announces its own size. the known layout is fetched up to
// that size, the rest is zero, and every field added after
// PERF_ATTR_SIZE_VER0 is printed only when the tracee's size covers it.

use crate::{
    decode::{ioctl::IoctlStatus, Ctx, RetFmt, Status},
    peeker_poker::PAGE_SIZE,
    render::{
        array::print_array,
        flags::{print_flags, print_xval},
        primitives::{print_addr, print_fd, print_int, print_u64_ptr, print_uint},
        strings::print_str_limited,
        structure::{fetch_extensible, Negotiated},
        StructView,
    },
    traced_call::Scratch,
    xlat::{format_hex, format_xval, perf::*, XlatStyle},
};

const E2BIG: i32 = 7;

/// perf_event_attr as copied from the tracee at entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PerfAttrSnapshot {
    /// the known layout, zero past `fetched`
    bytes: Vec<u8>,
    fetched: usize,
}

impl PerfAttrSnapshot {
    pub fn view(&self) -> StructView<'_> {
        StructView::new(&self.bytes)
    }

    /// bytes actually read from the tracee
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// the size the tracee put into the attribute
    pub fn reported_size(&self) -> u32 {
        self.view().u32(4)
    }
}

/// Reads the attribute at `addr`, printing the address when it cannot be used.
pub fn fetch_perf_event_attr(ctx: &mut Ctx, addr: u64) -> Option<PerfAttrSnapshot> {
    let Some(size) = ctx.umove(addr.wrapping_add(4), 4) else {
        print_addr(ctx, addr);
        return None;
    };
    let reported = match StructView::new(&size).u32(0) as usize {
        0 => PERF_ATTR_SIZE_VER0,
        size => size,
    };
    match fetch_extensible(ctx, addr, reported, PERF_ATTR_SIZE_VER0, PERF_ATTR_SIZE_VER8) {
        Negotiated::Fetched { buf, fetched } => Some(PerfAttrSnapshot { bytes: buf, fetched }),
        Negotiated::TooSmall | Negotiated::Unreadable => {
            print_addr(ctx, addr);
            None
        }
    }
}

/// `config` of a PERF_TYPE_HW_CACHE event: cache id, op and result packed in bytes.
pub fn format_hw_cache_config(config: u64, style: XlatStyle) -> String {
    let mut rendered = format!(
        "{}|{}<<8|{}<<16",
        format_xval(&PERF_HW_CACHE_ID, config & 0xff, Some("PERF_COUNT_HW_CACHE_???"), style),
        format_xval(
            &PERF_HW_CACHE_OP_ID,
            (config >> 8) & 0xff,
            Some("PERF_COUNT_HW_CACHE_OP_???"),
            style
        ),
        format_xval(
            &PERF_HW_CACHE_OP_RESULT_ID,
            (config >> 16) & 0xff,
            Some("PERF_COUNT_HW_CACHE_RESULT_???"),
            style
        ),
    );
    if config >> 24 != 0 {
        rendered.push_str(&format!("|{:#x}<<24 /* PERF_COUNT_HW_CACHE_??? */", config >> 24));
    }
    rendered
}

fn print_config(ctx: &mut Ctx, ty: u64, config: u64) {
    match ty {
        PERF_TYPE_HARDWARE => print_xval(ctx, &PERF_HW_ID, config, "PERF_COUNT_HW_???"),
        PERF_TYPE_SOFTWARE => print_xval(ctx, &PERF_SW_IDS, config, "PERF_COUNT_SW_???"),
        PERF_TYPE_TRACEPOINT => ctx.out.text(&config.to_string()),
        PERF_TYPE_HW_CACHE => {
            let rendered = format_hw_cache_config(config, ctx.style());
            ctx.out.text(&rendered);
        }
        _ => ctx.out.text(&format_hex(config)),
    }
}

// bits of the flag word at offset 40, precise_ip (bits 15 and 16) aside
const FLAG_BITS_LOW: [&str; 15] = [
    "disabled",
    "inherit",
    "pinned",
    "exclusive",
    "exclude_user",
    "exclude_kernel",
    "exclude_hv",
    "exclude_idle",
    "mmap",
    "comm",
    "freq",
    "inherit_stat",
    "enable_on_exec",
    "task",
    "watermark",
];

const FLAG_BITS_HIGH: [&str; 21] = [
    "mmap_data",
    "sample_id_all",
    "exclude_host",
    "exclude_guest",
    "exclude_callchain_kernel",
    "exclude_callchain_user",
    "mmap2",
    "comm_exec",
    "use_clockid",
    "context_switch",
    "write_backward",
    "namespaces",
    "ksymbol",
    "bpf_event",
    "aux_output",
    "cgroup",
    "text_poke",
    "build_id",
    "inherit_thread",
    "remove_on_exec",
    "sigtrap",
];

const FREQ_BIT: u64 = 1 << 10;
const WATERMARK_BIT: u64 = 1 << 14;
const PRECISE_IP_SHIFT: u32 = 15;
const FLAG_BITS_HIGH_SHIFT: u32 = 17;
const USE_CLOCKID_BIT: u64 = 1 << 25;
const RESERVED_1_SHIFT: u32 = 38;

fn print_attr_flags(ctx: &mut Ctx, flags: u64) {
    for (bit, name) in FLAG_BITS_LOW.iter().enumerate() {
        ctx.out.field(name);
        ctx.out.text(&((flags >> bit) & 1).to_string());
    }
    let precise_ip = (flags >> PRECISE_IP_SHIFT) & 3;
    ctx.out.field("precise_ip");
    ctx.out.text(&precise_ip.to_string());
    ctx.out.comment(PRECISE_IP_DESC[precise_ip as usize]);
    for (bit, name) in FLAG_BITS_HIGH.iter().enumerate() {
        ctx.out.field(name);
        ctx.out.text(&((flags >> (FLAG_BITS_HIGH_SHIFT as usize + bit)) & 1).to_string());
    }
    let reserved = flags >> RESERVED_1_SHIFT;
    if reserved != 0 {
        ctx.out.field("__reserved_1");
        ctx.out.text(&format_hex(reserved));
        ctx.out.comment("Bits 63..38");
    }
}

/// Renders a fetched attribute, `{type=..., size=..., config=..., ...}`.
///
/// At the exit of a call that failed with E2BIG the kernel wrote the size
/// it supports back into the tracee; it follows the old one after `=>`.
pub fn print_perf_event_attr(ctx: &mut Ctx, addr: u64, attr: &PerfAttrSnapshot) {
    let view = attr.view();
    let size = attr.fetched();
    let present = |end: usize| end <= size;
    let ty = view.u32(0) as u64;
    let e2big = ctx.exiting() && ctx.tcp.errno().is_some_and(|errno| errno.raw() == E2BIG);

    ctx.out.struct_begin();
    ctx.out.field("type");
    print_xval(ctx, &PERF_TYPE_ID, ty, "PERF_TYPE_???");
    ctx.out.field("size");
    print_xval(ctx, &PERF_ATTR_SIZE, attr.reported_size() as u64, "PERF_ATTR_SIZE_???");
    if e2big {
        ctx.out.value_changed();
        match ctx.umove(addr.wrapping_add(4), 4) {
            Some(bytes) => {
                let new_size = StructView::new(&bytes).u32(0) as u64;
                print_xval(ctx, &PERF_ATTR_SIZE, new_size, "PERF_ATTR_SIZE_???");
            }
            None => ctx.out.text("???"),
        }
    }
    ctx.out.field("config");
    print_config(ctx, ty, view.u64(8));

    if ctx.abbrev() {
        ctx.out.more_data_follows();
        ctx.out.struct_end();
        return;
    }

    let flags = view.u64(40);
    let sample_type = view.u64(24);
    if flags & FREQ_BIT != 0 {
        ctx.out.field("sample_freq");
    } else {
        ctx.out.field("sample_period");
    }
    ctx.out.text(&view.u64(16).to_string());
    ctx.out.field("sample_type");
    print_flags(ctx, &PERF_EVENT_SAMPLE_FORMAT, sample_type, "PERF_SAMPLE_???");
    ctx.out.field("read_format");
    print_flags(ctx, &PERF_EVENT_READ_FORMAT, view.u64(32), "PERF_FORMAT_???");
    print_attr_flags(ctx, flags);

    if flags & WATERMARK_BIT != 0 {
        ctx.out.field("wakeup_watermark");
    } else {
        ctx.out.field("wakeup_events");
    }
    ctx.out.text(&view.u32(48).to_string());

    let breakpoint = ty == PERF_TYPE_BREAKPOINT;
    if breakpoint {
        ctx.out.field("bp_type");
        print_flags(ctx, &HW_BREAKPOINT_TYPE, view.u32(52) as u64, "HW_BREAKPOINT_???");
        ctx.out.field("bp_addr");
    } else {
        ctx.out.field("config1");
    }
    ctx.out.text(&format_hex(view.u64(56)));

    // each field below first appeared in a later PERF_ATTR_SIZE_VER*
    'chain: {
        if !present(72) {
            break 'chain;
        }
        if breakpoint {
            ctx.out.field("bp_len");
            print_xval(ctx, &HW_BREAKPOINT_LEN, view.u64(64), "HW_BREAKPOINT_LEN_???");
        } else {
            ctx.out.field("config2");
            ctx.out.text(&format_hex(view.u64(64)));
        }

        if !present(80) {
            break 'chain;
        }
        if sample_type & PERF_SAMPLE_BRANCH_STACK != 0 {
            ctx.out.field("branch_sample_type");
            print_flags(ctx, &PERF_BRANCH_SAMPLE_TYPE, view.u64(72), "PERF_SAMPLE_BRANCH_???");
        }

        if !present(88) {
            break 'chain;
        }
        ctx.out.field("sample_regs_user");
        ctx.out.text(&format_hex(view.u64(80)));

        if !present(92) {
            break 'chain;
        }
        ctx.out.field("sample_stack_user");
        ctx.out.text(&format_hex(view.u32(88) as u64));

        if !present(96) {
            break 'chain;
        }
        if flags & USE_CLOCKID_BIT != 0 {
            ctx.out.field("clockid");
            print_xval(ctx, &CLOCKNAMES, view.s32(92) as i64 as u64, "CLOCK_???");
        }

        if !present(104) {
            break 'chain;
        }
        ctx.out.field("sample_regs_intr");
        ctx.out.text(&format_hex(view.u64(96)));

        if !present(108) {
            break 'chain;
        }
        ctx.out.field("aux_watermark");
        ctx.out.text(&view.u32(104).to_string());

        if !present(110) {
            break 'chain;
        }
        ctx.out.field("sample_max_stack");
        ctx.out.text(&view.u16(108).to_string());
        if present(112) && view.u16(110) != 0 {
            ctx.out.field("__reserved_2");
            ctx.out.text(&format_hex(view.u16(110) as u64));
        }

        if !present(116) {
            break 'chain;
        }
        ctx.out.field("aux_sample_size");
        ctx.out.text(&view.u32(112).to_string());
        if present(120) && view.u32(116) != 0 {
            ctx.out.field("__reserved_3");
            ctx.out.text(&format_hex(view.u32(116) as u64));
        }

        if !present(128) {
            break 'chain;
        }
        ctx.out.field("sig_data");
        ctx.out.text(&format_hex(view.u64(120)));

        if !present(136) {
            break 'chain;
        }
        ctx.out.field("config3");
        ctx.out.text(&format_hex(view.u64(128)));
    }

    if attr.reported_size() as usize > size {
        ctx.out.more_data_follows();
    }
    ctx.out.struct_end();
}

fn print_perf_event_open_tail(ctx: &mut Ctx) {
    let (pid, cpu, group_fd, flags) = (ctx.arg(1), ctx.arg(2), ctx.arg(3) as i32, ctx.arg(4));
    ctx.out.next();
    print_int(ctx, pid);
    ctx.out.next();
    print_int(ctx, cpu);
    ctx.out.next();
    print_fd(ctx, group_fd);
    ctx.out.next();
    let flags = ctx.personality().narrow_word(flags);
    print_flags(ctx, &PERF_EVENT_OPEN_FLAGS, flags, "PERF_FLAG_???");
}

pub fn sys_perf_event_open(ctx: &mut Ctx) -> Status {
    let addr = ctx.arg_addr(0);
    if ctx.entering() {
        ctx.out.next();
        let Some(attr) = fetch_perf_event_attr(ctx, addr) else {
            print_perf_event_open_tail(ctx);
            return Status::Decoded(RetFmt::Fd);
        };
        // the attribute is printed at exit, when a changed size is known
        ctx.tcp.set_private(Scratch::PerfAttr(Box::new(attr)));
        return Status::MoreAtExit;
    }
    match ctx.tcp.take_private() {
        Some(Scratch::PerfAttr(attr)) => print_perf_event_attr(ctx, addr, &attr),
        _ => print_addr(ctx, addr),
    }
    print_perf_event_open_tail(ctx);
    Status::Decoded(RetFmt::Fd)
}

/// Request codes whose argument size follows the pointer width.
struct SizedCodes {
    set_filter: u32,
    id: u32,
    query_bpf: u32,
    modify_attributes: u32,
}

const SIZED_CODES: SizedCodes = SizedCodes {
    set_filter: PERF_EVENT_IOC_SET_FILTER,
    id: PERF_EVENT_IOC_ID,
    query_bpf: PERF_EVENT_IOC_QUERY_BPF,
    modify_attributes: PERF_EVENT_IOC_MODIFY_ATTRIBUTES,
};

const SIZED_CODES_32: SizedCodes = SizedCodes {
    set_filter: PERF_EVENT_IOC_SET_FILTER_32,
    id: PERF_EVENT_IOC_ID_32,
    query_bpf: PERF_EVENT_IOC_QUERY_BPF_32,
    modify_attributes: PERF_EVENT_IOC_MODIFY_ATTRIBUTES_32,
};

/// `{ids_len=N, prog_cnt=M, ids=[...]}`, ids_len at entry, the rest at exit
fn perf_query_bpf(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.entering() {
        ctx.out.next();
        let Some(bytes) = ctx.umove_or_printaddr(addr, 4) else {
            return IoctlStatus::Done;
        };
        let ids_len = StructView::new(&bytes).u32(0);
        ctx.out.struct_begin();
        ctx.out.field("ids_len");
        ctx.out.text(&ids_len.to_string());
        ctx.tcp.set_private(Scratch::Word(ids_len as u64));
        return IoctlStatus::MoreAtExit;
    }
    let ids_len = match ctx.tcp.take_private() {
        Some(Scratch::Word(ids_len)) => ids_len,
        _ => 0,
    };
    let prog_cnt = if ctx.syserror() {
        None
    } else {
        ctx.umove(addr.wrapping_add(4), 4)
            .map(|bytes| StructView::new(&bytes).u32(0) as u64)
    };
    match prog_cnt {
        Some(prog_cnt) => {
            ctx.out.field("prog_cnt");
            ctx.out.text(&prog_cnt.to_string());
            ctx.out.field("ids");
            print_array(ctx, addr.wrapping_add(8), ids_len.min(prog_cnt), 4, |ctx, id| {
                ctx.out.text(&StructView::new(id).u32(0).to_string());
            });
        }
        None => ctx.out.more_data_follows(),
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

pub fn perf_ioctl(ctx: &mut Ctx, code: u32, arg: u64) -> IoctlStatus {
    let sized = if ctx.personality().word_size() == 8 {
        &SIZED_CODES
    } else {
        &SIZED_CODES_32
    };
    let addr = ctx.personality().narrow_word(arg);
    match code {
        PERF_EVENT_IOC_ENABLE | PERF_EVENT_IOC_DISABLE | PERF_EVENT_IOC_RESET => {
            ctx.out.next();
            print_flags(ctx, &PERF_IOCTL_FLAGS, addr, "PERF_IOC_FLAG_???");
        }
        PERF_EVENT_IOC_REFRESH => {
            ctx.out.next();
            print_int(ctx, arg);
        }
        PERF_EVENT_IOC_PERIOD => {
            ctx.out.next();
            print_u64_ptr(ctx, addr);
        }
        PERF_EVENT_IOC_SET_OUTPUT | PERF_EVENT_IOC_SET_BPF => {
            ctx.out.next();
            print_fd(ctx, arg as i32);
        }
        PERF_EVENT_IOC_PAUSE_OUTPUT => {
            ctx.out.next();
            print_uint(ctx, arg);
        }
        code if code == sized.set_filter => {
            ctx.out.next();
            print_str_limited(ctx, addr, *PAGE_SIZE);
        }
        code if code == sized.id => {
            if ctx.entering() {
                ctx.out.next();
                return IoctlStatus::MoreAtExit;
            }
            if ctx.syserror() {
                print_addr(ctx, addr);
            } else {
                print_u64_ptr(ctx, addr);
            }
        }
        code if code == sized.query_bpf => return perf_query_bpf(ctx, addr),
        code if code == sized.modify_attributes => {
            ctx.out.next();
            if let Some(attr) = fetch_perf_event_attr(ctx, addr) {
                print_perf_event_attr(ctx, addr, &attr);
            }
        }
        _ => return IoctlStatus::NotHandled,
    }
    IoctlStatus::Done
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

    const ATTR: u64 = 0x7000_0000;

    fn attr(ty: u32, size: u32, config: u64, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        bytes[0..4].copy_from_slice(&ty.to_ne_bytes());
        bytes[4..8].copy_from_slice(&size.to_ne_bytes());
        bytes[8..16].copy_from_slice(&config.to_ne_bytes());
        bytes
    }

    fn put_u64(bytes: &mut [u8], offset: usize, value: u64) {
        bytes[offset..offset + 8].copy_from_slice(&value.to_ne_bytes());
    }

    fn render(mem: &MemoryImage, cfg: &Config, name_scno: u64, args: [u64; 6], rval: u64) -> String {
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg,
        };
        let mut call = TracedCall::new(1, name_scno, Personality::Native, args);
        render_call(&mut call, &env, rval)
    }

    // perf_event_open on x86_64
    const PERF_EVENT_OPEN: u64 = 298;

    #[test]
    fn hw_cache_config_packs_three_ids() {
        assert_eq!(
            format_hw_cache_config(0x1_0002, XlatStyle::Abbrev),
            "PERF_COUNT_HW_CACHE_LL|PERF_COUNT_HW_CACHE_OP_READ<<8|PERF_COUNT_HW_CACHE_RESULT_MISS<<16"
        );
        assert_eq!(
            format_hw_cache_config(0xab00_0000, XlatStyle::Abbrev),
            "PERF_COUNT_HW_CACHE_L1D|PERF_COUNT_HW_CACHE_OP_READ<<8|PERF_COUNT_HW_CACHE_RESULT_ACCESS<<16\
             |0xab<<24 /* PERF_COUNT_HW_CACHE_??? */"
        );
    }

    #[test]
    fn abbreviated_after_config() {
        let mem = MemoryImage::new().with(ATTR, attr(0, 72, 0, 72));
        let cfg = Config::default();
        assert_eq!(
            render(&mem, &cfg, PERF_EVENT_OPEN, [ATTR, 0, (-1i64) as u64, (-1i64) as u64, 8, 0], 3),
            "perf_event_open({type=PERF_TYPE_HARDWARE, size=PERF_ATTR_SIZE_VER1, \
             config=PERF_COUNT_HW_CPU_CYCLES, ...}, 0, -1, -1, PERF_FLAG_FD_CLOEXEC) = 3"
        );
    }

    #[test]
    fn verbose_stops_at_the_reported_size() {
        let mut bytes = attr(1, 72, 9, 72);
        put_u64(&mut bytes, 16, 4096);
        put_u64(&mut bytes, 24, 1);
        put_u64(&mut bytes, 40, 1 | (1 << 5) | (2 << 15));
        let mem = MemoryImage::new().with(ATTR, bytes);
        let cfg = Config {
            verbose: true,
            ..Config::default()
        };
        assert_eq!(
            render(&mem, &cfg, PERF_EVENT_OPEN, [ATTR, 0, 0, (-1i64) as u64, 0, 0], 3),
            "perf_event_open({type=PERF_TYPE_SOFTWARE, size=PERF_ATTR_SIZE_VER1, \
             config=PERF_COUNT_SW_DUMMY, sample_period=4096, sample_type=PERF_SAMPLE_IP, \
             read_format=0, disabled=1, inherit=0, pinned=0, exclusive=0, exclude_user=0, \
             exclude_kernel=1, exclude_hv=0, exclude_idle=0, mmap=0, comm=0, freq=0, \
             inherit_stat=0, enable_on_exec=0, task=0, watermark=0, \
             precise_ip=2 /* requested to have 0 skid */, mmap_data=0, sample_id_all=0, \
             exclude_host=0, exclude_guest=0, exclude_callchain_kernel=0, \
             exclude_callchain_user=0, mmap2=0, comm_exec=0, use_clockid=0, \
             context_switch=0, write_backward=0, namespaces=0, ksymbol=0, bpf_event=0, \
             aux_output=0, cgroup=0, text_poke=0, build_id=0, inherit_thread=0, \
             remove_on_exec=0, sigtrap=0, wakeup_events=0, config1=0, config2=0}, \
             0, 0, -1, 0) = 3"
        );
    }

    #[test]
    fn reserved_fields_show_only_when_set() {
        let mut bytes = attr(1, 128, 9, 128);
        bytes[110..112].copy_from_slice(&5u16.to_ne_bytes());
        bytes[116..120].copy_from_slice(&0x10u32.to_ne_bytes());
        let cfg = Config {
            verbose: true,
            ..Config::default()
        };
        let args = [ATTR, 0, 0, (-1i64) as u64, 0, 0];
        let line = render(&MemoryImage::new().with(ATTR, bytes), &cfg, PERF_EVENT_OPEN, args, 3);
        assert!(
            line.contains(
                "sample_max_stack=0, __reserved_2=0x5, aux_sample_size=0, __reserved_3=0x10, sig_data=0}"
            ),
            "{line}"
        );

        let clean = render(&MemoryImage::new().with(ATTR, attr(1, 128, 9, 128)), &cfg, PERF_EVENT_OPEN, args, 3);
        assert!(clean.contains("sample_max_stack=0, aux_sample_size=0, sig_data=0}"), "{clean}");
    }

    #[test]
    fn too_small_and_unreadable_attrs_print_the_address() {
        let mem = MemoryImage::new().with(ATTR, attr(0, 8, 0, 64));
        let cfg = Config::default();
        assert_eq!(
            render(&mem, &cfg, PERF_EVENT_OPEN, [ATTR, 0, 0, 0, 0, 0], (-22i64) as u64),
            "perf_event_open(0x70000000, 0, 0, 0, 0) = -1 EINVAL (Invalid argument)"
        );
        assert_eq!(
            render(&mem, &cfg, PERF_EVENT_OPEN, [0, 0, 0, 0, 0, 0], (-14i64) as u64),
            "perf_event_open(NULL, 0, 0, 0, 0) = -1 EFAULT (Bad address)"
        );
    }

    #[test]
    fn e2big_shows_the_size_the_kernel_wants() {
        // the image is what the tracee holds at exit
        let mem = MemoryImage::new().with(ATTR, attr(0, 136, 0, 136));
        let cfg = Config::default();
        let env = Env {
            mem: &mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        let mut call = TracedCall::new(1, PERF_EVENT_OPEN, Personality::Native, [ATTR, 0, 0, 0, 0, 0]);
        let snapshot = {
            let big = MemoryImage::new().with(ATTR, attr(0, 200, 0, 200));
            let entry_env = Env { mem: &big, ..env };
            let mut out = crate::printer::Printer::new();
            let mut ctx = Ctx::new(&mut call, &entry_env, &mut out);
            fetch_perf_event_attr(&mut ctx, ATTR)
        };
        let Some(snapshot) = snapshot else {
            panic!("attribute should be readable");
        };
        assert_eq!(snapshot.fetched(), PERF_ATTR_SIZE_VER8);
        assert_eq!(snapshot.reported_size(), 200);

        call.set_exit((-7i64) as u64);
        let mut out = crate::printer::Printer::new();
        let mut ctx = Ctx::new(&mut call, &env, &mut out);
        print_perf_event_attr(&mut ctx, ATTR, &snapshot);
        assert_eq!(
            out.as_str(),
            "{type=PERF_TYPE_HARDWARE, size=0xc8 /* PERF_ATTR_SIZE_??? */ => PERF_ATTR_SIZE_VER8, \
             config=PERF_COUNT_HW_CPU_CYCLES, ...}"
        );
    }

    // ioctl on x86_64
    const IOCTL: u64 = 16;

    #[test]
    fn modify_attributes_with_an_unknown_type() {
        let mem = MemoryImage::new().with(ATTR, attr(7, 0x4a, 0xdead_beef, 0x4a));
        let cfg = Config::default();
        assert_eq!(
            render(
                &mem,
                &cfg,
                IOCTL,
                [(-1i64) as u64, PERF_EVENT_IOC_MODIFY_ATTRIBUTES as u64, ATTR, 0, 0, 0],
                (-9i64) as u64
            ),
            "ioctl(-1, PERF_EVENT_IOC_MODIFY_ATTRIBUTES, {type=0x7 /* PERF_TYPE_??? */, \
             size=0x4a /* PERF_ATTR_SIZE_??? */, config=0xdeadbeef, ...}) = -1 EBADF (Bad file number)"
        );
    }

    #[test]
    fn scalar_ioctls() {
        let mem = MemoryImage::new().with(0x1000, 12345u64.to_ne_bytes());
        let cfg = Config::default();
        let ioctl = |code: u32, arg: u64| render(&mem, &cfg, IOCTL, [3, code as u64, arg, 0, 0, 0], 0);
        assert_eq!(ioctl(PERF_EVENT_IOC_ENABLE, 1), "ioctl(3, PERF_EVENT_IOC_ENABLE, PERF_IOC_FLAG_GROUP) = 0");
        assert_eq!(ioctl(PERF_EVENT_IOC_RESET, 0), "ioctl(3, PERF_EVENT_IOC_RESET, 0) = 0");
        assert_eq!(
            ioctl(PERF_EVENT_IOC_REFRESH, 0xffff_ffff),
            "ioctl(3, PERF_EVENT_IOC_REFRESH, -1) = 0"
        );
        assert_eq!(ioctl(PERF_EVENT_IOC_PERIOD, 0x1000), "ioctl(3, PERF_EVENT_IOC_PERIOD, [12345]) = 0");
        assert_eq!(ioctl(PERF_EVENT_IOC_SET_OUTPUT, 4), "ioctl(3, PERF_EVENT_IOC_SET_OUTPUT, 4) = 0");
        assert_eq!(ioctl(PERF_EVENT_IOC_ID, 0x1000), "ioctl(3, PERF_EVENT_IOC_ID, [12345]) = 0");
    }

    #[test]
    fn filters_are_cut_at_a_page() {
        let page = *PAGE_SIZE;
        let mut filter = vec![b'a'; page + 1];
        filter.push(0);
        let mem = MemoryImage::new()
            .with(0x1000, b"common_pid == 42 && prev_state != 0\0".to_vec())
            .with(0x10_0000, filter);
        let cfg = Config::default();
        assert_eq!(
            render(&mem, &cfg, IOCTL, [3, PERF_EVENT_IOC_SET_FILTER as u64, 0x1000, 0, 0, 0], 0),
            "ioctl(3, PERF_EVENT_IOC_SET_FILTER, \"common_pid == 42 && prev_state != 0\") = 0"
        );
        assert_eq!(
            render(&mem, &cfg, IOCTL, [3, PERF_EVENT_IOC_SET_FILTER as u64, 0x10_0000, 0, 0, 0], 0),
            format!("ioctl(3, PERF_EVENT_IOC_SET_FILTER, \"{}\"...) = 0", "a".repeat(page))
        );
    }

    #[test]
    fn query_bpf_spans_entry_and_exit() {
        let mut query = Vec::new();
        for word in [4u32, 2, 10, 11, 0, 0] {
            query.extend_from_slice(&word.to_ne_bytes());
        }
        let mem = MemoryImage::new().with(0x2000, query);
        let cfg = Config::default();
        assert_eq!(
            render(&mem, &cfg, IOCTL, [3, PERF_EVENT_IOC_QUERY_BPF as u64, 0x2000, 0, 0, 0], 0),
            "ioctl(3, PERF_EVENT_IOC_QUERY_BPF, {ids_len=4, prog_cnt=2, ids=[10, 11]}) = 0"
        );
        assert_eq!(
            render(&mem, &cfg, IOCTL, [3, PERF_EVENT_IOC_QUERY_BPF as u64, 0x2000, 0, 0, 0], (-14i64) as u64),
            "ioctl(3, PERF_EVENT_IOC_QUERY_BPF, {ids_len=4, ...}) = -1 EFAULT (Bad address)"
        );
    }
}
