use crate::{
    decode::{
        ipc::{
            by_personality, ds_layout, format_ipc_key, ipc_slot, print_ctl_buffer,
            print_ipc_ds, print_ipc_id, print_ipc_info, CtlBuffer, DsLayout, IPC64_PERM,
            IPC_PERM_OLD,
        },
        Ctx, RetFmt, Status,
    },
    render::{
        flags::{format_flags_in, print_flags, print_ipc_cmd},
        primitives::{format_umode, print_addr, print_kulong},
        structure::{Field, FieldKind},
        StructView,
    },
    xlat::{
        ipc::{
            IPC_64, IPC_INFO, IPC_SET, IPC_STAT, SHMCTL_FLAGS, SHM_FLAGS, SHM_HUGE_MASK,
            SHM_HUGE_SHIFT, SHM_INFO, SHM_RESOURCE_FLAGS, SHM_STAT, SHM_STAT_ANY,
        },
        XlatStyle,
    },
};

static SHMID_NATIVE: DsLayout = DsLayout {
    size: 112,
    perm_name: "shm_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("shm_segsz", 48, 8, FieldKind::Uint),
        Field::new("shm_cpid", 80, 4, FieldKind::Int),
        Field::new("shm_lpid", 84, 4, FieldKind::Int),
        Field::new("shm_nattch", 88, 8, FieldKind::Uint),
        Field::new("shm_atime", 56, 8, FieldKind::Int),
        Field::new("shm_dtime", 64, 8, FieldKind::Int),
        Field::new("shm_ctime", 72, 8, FieldKind::Int),
    ],
    set_tail: &[],
};

static SHMID_COMPAT: DsLayout = DsLayout {
    size: 84,
    perm_name: "shm_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("shm_segsz", 36, 4, FieldKind::Uint),
        Field::new("shm_cpid", 64, 4, FieldKind::Int),
        Field::new("shm_lpid", 68, 4, FieldKind::Int),
        Field::new("shm_nattch", 72, 4, FieldKind::Uint),
        Field::new("shm_atime", 40, 4, FieldKind::Int),
        Field::new("shm_dtime", 48, 4, FieldKind::Int),
        Field::new("shm_ctime", 56, 4, FieldKind::Int),
    ],
    set_tail: &[],
};

static SHMID_OLD: DsLayout = DsLayout {
    size: 48,
    perm_name: "shm_perm",
    perm: &IPC_PERM_OLD,
    tail: &[
        Field::new("shm_segsz", 16, 4, FieldKind::Uint),
        Field::new("shm_cpid", 32, 2, FieldKind::Uint),
        Field::new("shm_lpid", 34, 2, FieldKind::Uint),
        Field::new("shm_nattch", 36, 2, FieldKind::Uint),
        Field::new("shm_atime", 20, 4, FieldKind::Int),
        Field::new("shm_dtime", 24, 4, FieldKind::Int),
        Field::new("shm_ctime", 28, 4, FieldKind::Int),
    ],
    set_tail: &[],
};

static SHMINFO_NATIVE: [Field; 5] = [
    Field::new("shmmax", 0, 8, FieldKind::Uint),
    Field::new("shmmin", 8, 8, FieldKind::Uint),
    Field::new("shmmni", 16, 8, FieldKind::Uint),
    Field::new("shmseg", 24, 8, FieldKind::Uint),
    Field::new("shmall", 32, 8, FieldKind::Uint),
];

static SHMINFO_COMPAT: [Field; 5] = [
    Field::new("shmmax", 0, 4, FieldKind::Uint),
    Field::new("shmmin", 4, 4, FieldKind::Uint),
    Field::new("shmmni", 8, 4, FieldKind::Uint),
    Field::new("shmseg", 12, 4, FieldKind::Uint),
    Field::new("shmall", 16, 4, FieldKind::Uint),
];

static SHM_INFO_NATIVE: [Field; 6] = [
    Field::new("used_ids", 0, 4, FieldKind::Int),
    Field::new("shm_tot", 8, 8, FieldKind::Uint),
    Field::new("shm_rss", 16, 8, FieldKind::Uint),
    Field::new("shm_swp", 24, 8, FieldKind::Uint),
    Field::new("swap_attempts", 32, 8, FieldKind::Uint),
    Field::new("swap_successes", 40, 8, FieldKind::Uint),
];

static SHM_INFO_COMPAT: [Field; 6] = [
    Field::new("used_ids", 0, 4, FieldKind::Int),
    Field::new("shm_tot", 4, 4, FieldKind::Uint),
    Field::new("shm_rss", 8, 4, FieldKind::Uint),
    Field::new("shm_swp", 12, 4, FieldKind::Uint),
    Field::new("swap_attempts", 16, 4, FieldKind::Uint),
    Field::new("swap_successes", 20, 4, FieldKind::Uint),
];

fn shmid_layout(ctx: &Ctx) -> &'static DsLayout {
    ds_layout(ctx.personality(), ctx.arg(1), &SHMID_NATIVE, &SHMID_COMPAT, &SHMID_OLD)
}

fn print_shmid_set(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, shmid_layout(ctx), IPC_SET);
}

fn print_shmid(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, shmid_layout(ctx), IPC_STAT);
}

fn print_shminfo(ctx: &mut Ctx, addr: u64) {
    let (fields, size) = by_personality(
        ctx.personality(),
        (&SHMINFO_NATIVE, 40),
        (&SHMINFO_COMPAT, 20),
    );
    print_ipc_info(ctx, addr, fields, size);
}

fn print_shm_info(ctx: &mut Ctx, addr: u64) {
    let (fields, size) = by_personality(
        ctx.personality(),
        (&SHM_INFO_NATIVE, 48),
        (&SHM_INFO_COMPAT, 24),
    );
    print_ipc_info(ctx, addr, fields, size);
}

/// `SHM_HUGETLB|21<<SHM_HUGE_SHIFT|0600`: the huge page size is a log2
/// stored in the top bits, between the flags and the mode.
pub fn format_shmget_flags(flags: u64, style: XlatStyle) -> String {
    let flags = flags & u32::MAX as u64;
    let huge_mask = SHM_HUGE_MASK << SHM_HUGE_SHIFT;
    let hugetlb = flags & huge_mask;
    let mut parts = Vec::new();
    if let Some(known) = format_flags_in(&SHM_RESOURCE_FLAGS, flags & !0o777 & !huge_mask, style) {
        parts.push(known);
    }
    if hugetlb != 0 {
        let shift = match style {
            XlatStyle::Raw => SHM_HUGE_SHIFT.to_string(),
            XlatStyle::Abbrev => "SHM_HUGE_SHIFT".to_owned(),
            XlatStyle::Verbose => format!("{SHM_HUGE_SHIFT} /* SHM_HUGE_SHIFT */"),
        };
        parts.push(format!("{}<<{shift}", hugetlb >> SHM_HUGE_SHIFT));
    }
    parts.push(format_umode(flags & 0o777));
    parts.join("|")
}

pub fn sys_shmget(ctx: &mut Ctx) -> Status {
    let (key, size, flags) = (ctx.arg(0), ctx.arg(1), ctx.arg(2));
    let style = ctx.style();
    ctx.out.item(&format_ipc_key(key, style));
    ctx.out.next();
    print_kulong(ctx, size);
    ctx.out.item(&format_shmget_flags(flags, style));
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_shmctl(ctx: &mut Ctx) -> Status {
    let cmd_word = ctx.arg(1) & u32::MAX as u64;
    let addr = ctx.arg_addr(ipc_slot(ctx, 2, 3));
    let buffer = match cmd_word & !IPC_64 {
        IPC_SET => CtlBuffer::AtEntry(print_shmid_set),
        IPC_STAT | SHM_STAT | SHM_STAT_ANY => CtlBuffer::AtExit(print_shmid),
        IPC_INFO => CtlBuffer::AtExit(print_shminfo),
        SHM_INFO => CtlBuffer::AtExit(print_shm_info),
        _ => CtlBuffer::Address,
    };
    if ctx.entering() {
        print_ipc_id(ctx);
        ctx.out.next();
        print_ipc_cmd(ctx, &SHMCTL_FLAGS, cmd_word, "SHM_???");
        ctx.out.next();
    }
    print_ctl_buffer(ctx, addr, buffer)
}

pub fn sys_shmat(ctx: &mut Ctx) -> Status {
    let indirect = ctx.tcp.indirect_ipc();
    if ctx.entering() {
        let (addr, flags) = if indirect {
            (ctx.arg_addr(3), ctx.arg(1))
        } else {
            (ctx.arg_addr(1), ctx.arg(2))
        };
        print_ipc_id(ctx);
        ctx.out.next();
        print_addr(ctx, addr);
        ctx.out.next();
        print_flags(ctx, &SHM_FLAGS, flags & u32::MAX as u64, "SHM_???");
        return Status::MoreAtExit;
    }
    if ctx.syserror() || !indirect {
        return Status::Decoded(RetFmt::Hex);
    }
    // the multiplexed call returns 0 and stores the address through its third argument
    let raddr = ctx.arg_addr(2);
    let word = ctx.personality().word_size();
    match ctx.umove(raddr, word) {
        Some(bytes) => {
            let attached = StructView::new(&bytes).unsigned(0, word);
            ctx.tcp.override_rval(attached);
            Status::Decoded(RetFmt::Hex)
        }
        None => Status::Decoded(RetFmt::None),
    }
}

pub fn sys_shmdt(ctx: &mut Ctx) -> Status {
    let addr = ctx.arg_addr(ipc_slot(ctx, 0, 3));
    ctx.out.next();
    print_addr(ctx, addr);
    Status::Decoded(RetFmt::Decimal)
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

    // x86_64 numbers
    const SHMGET: u64 = 29;
    const SHMAT: u64 = 30;
    const SHMCTL: u64 = 31;
    const SHMDT: u64 = 67;

    fn render(mem: &MemoryImage, personality: Personality, scno: u64, args: [u64; 6], rval: u64) -> String {
        let cfg = Config::default();
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        let mut call = TracedCall::new(9, scno, personality, args);
        render_call(&mut call, &env, rval)
    }

    #[test]
    fn hugetlb_size_sits_between_flags_and_mode() {
        let flags = 0o4000 | (26 << SHM_HUGE_SHIFT) | 0o600;
        assert_eq!(
            format_shmget_flags(flags, XlatStyle::Abbrev),
            "SHM_HUGETLB|26<<SHM_HUGE_SHIFT|0600"
        );
        assert_eq!(format_shmget_flags(0o600, XlatStyle::Abbrev), "0600");
        assert_eq!(format_shmget_flags(21 << SHM_HUGE_SHIFT, XlatStyle::Abbrev), "21<<SHM_HUGE_SHIFT|000");
        assert_eq!(
            render(&MemoryImage::new(), Personality::Native, SHMGET, [0, 4096, flags, 0, 0, 0], 7),
            "shmget(IPC_PRIVATE, 4096, SHM_HUGETLB|26<<SHM_HUGE_SHIFT|0600) = 7"
        );
    }

    #[test]
    fn attach_returns_the_address() {
        let mem = MemoryImage::new();
        assert_eq!(
            render(&mem, Personality::Native, SHMAT, [7, 0, 0o10000, 0, 0, 0], 0x7f00_0000_0000),
            "shmat(7, NULL, SHM_RDONLY) = 0x7f0000000000"
        );
        assert_eq!(
            render(&mem, Personality::Native, SHMDT, [0x7f00_0000_0000, 0, 0, 0, 0, 0], 0),
            "shmdt(0x7f0000000000) = 0"
        );
    }

    #[test]
    fn indirect_attach_reads_the_address_back() {
        let mem = MemoryImage::new().with(0x5000, 0xf7f0_0000u32.to_ne_bytes());
        // ipc(SHMAT, shmid, shmflg, &raddr, shmaddr)
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [21, 7, 0, 0x5000, 0, 0], 0),
            "shmat(7, NULL, 0) = 0xf7f00000"
        );
    }

    #[test]
    fn info_commands() {
        let mut info = Vec::new();
        for value in [0x1000u64, 1, 4096, 4096, 0x2000] {
            info.extend_from_slice(&value.to_ne_bytes());
        }
        let mem = MemoryImage::new().with(0x6000, info);
        assert_eq!(
            render(&mem, Personality::Native, SHMCTL, [0, 3, 0x6000, 0, 0, 0], 2),
            "shmctl(0, IPC_INFO, {shmmax=4096, shmmin=1, shmmni=4096, shmseg=4096, shmall=8192}) = 2"
        );
        assert_eq!(
            render(&mem, Personality::Native, SHMCTL, [0, 11, 0x6000, 0, 0, 0], 0),
            "shmctl(0, SHM_LOCK, 0x6000) = 0"
        );
    }
}
