use crate::{
    decode::{
        ipc::{
            ds_layout, ipc_slot, print_ctl_buffer, print_ipc_ds, print_ipc_get_flags,
            print_ipc_id, print_ipc_info, print_ipc_key, CtlBuffer, DsLayout, IPC64_PERM, IPC_PERM_OLD,
        },
        Ctx, RetFmt, Status,
    },
    render::{
        array::print_array,
        flags::{print_flags, print_ipc_cmd},
        primitives::{print_addr, print_int, print_timespec, print_timespec64, print_uint},
        structure::{Field, FieldKind},
        StructView,
    },
    traced_call::Scratch,
    xlat::ipc::{
        IPC_64, IPC_INFO, IPC_SET, IPC_STAT, SEMCTL_FLAGS, SEMOP_FLAGS, SEM_INFO, SEM_STAT,
        SEM_STAT_ANY, SETVAL,
    },
};

static SEMID_NATIVE: DsLayout = DsLayout {
    size: 104,
    perm_name: "sem_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("sem_otime", 48, 8, FieldKind::Int),
        Field::new("sem_ctime", 64, 8, FieldKind::Int),
        Field::new("sem_nsems", 80, 8, FieldKind::Uint),
    ],
    set_tail: &[],
};

static SEMID_COMPAT: DsLayout = DsLayout {
    size: 64,
    perm_name: "sem_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("sem_otime", 36, 4, FieldKind::Int),
        Field::new("sem_ctime", 44, 4, FieldKind::Int),
        Field::new("sem_nsems", 52, 4, FieldKind::Uint),
    ],
    set_tail: &[],
};

static SEMID_OLD: DsLayout = DsLayout {
    size: 44,
    perm_name: "sem_perm",
    perm: &IPC_PERM_OLD,
    tail: &[
        Field::new("sem_otime", 16, 4, FieldKind::Int),
        Field::new("sem_ctime", 20, 4, FieldKind::Int),
        Field::new("sem_nsems", 40, 2, FieldKind::Uint),
    ],
    set_tail: &[],
};

const SEMINFO_SIZE: usize = 40;

static SEMINFO_FIELDS: [Field; 10] = [
    Field::new("semmap", 0, 4, FieldKind::Int),
    Field::new("semmni", 4, 4, FieldKind::Int),
    Field::new("semmns", 8, 4, FieldKind::Int),
    Field::new("semmnu", 12, 4, FieldKind::Int),
    Field::new("semmsl", 16, 4, FieldKind::Int),
    Field::new("semopm", 20, 4, FieldKind::Int),
    Field::new("semume", 24, 4, FieldKind::Int),
    Field::new("semusz", 28, 4, FieldKind::Int),
    Field::new("semvmx", 32, 4, FieldKind::Int),
    Field::new("semaem", 36, 4, FieldKind::Int),
];

const SEMBUF_SIZE: usize = 6;

fn semid_layout(ctx: &Ctx) -> &'static DsLayout {
    ds_layout(ctx.personality(), ctx.arg(2), &SEMID_NATIVE, &SEMID_COMPAT, &SEMID_OLD)
}

fn print_semid_set(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, semid_layout(ctx), IPC_SET);
}

fn print_semid(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, semid_layout(ctx), IPC_STAT);
}

fn print_seminfo(ctx: &mut Ctx, addr: u64) {
    print_ipc_info(ctx, addr, &SEMINFO_FIELDS, SEMINFO_SIZE);
}

/// SETVAL carries the value itself in the semun
fn print_semval(ctx: &mut Ctx, value: u64) {
    print_int(ctx, value);
}

pub fn sys_semget(ctx: &mut Ctx) -> Status {
    print_ipc_key(ctx, 0);
    let nsems = ctx.arg(1);
    ctx.out.next();
    print_int(ctx, nsems);
    print_ipc_get_flags(ctx, 2);
    Status::Decoded(RetFmt::Decimal)
}

fn semctl_buffer(cmd: u64) -> CtlBuffer {
    match cmd & !IPC_64 {
        IPC_SET => CtlBuffer::AtEntry(print_semid_set),
        IPC_STAT | SEM_STAT | SEM_STAT_ANY => CtlBuffer::AtExit(print_semid),
        IPC_INFO | SEM_INFO => CtlBuffer::AtExit(print_seminfo),
        SETVAL => CtlBuffer::AtEntry(print_semval),
        _ => CtlBuffer::Address,
    }
}

/// The multiplexed call passes `union semun` through a pointer, shown in brackets.
fn indirect_semun(ctx: &Ctx) -> bool {
    ctx.tcp.indirect_ipc() && ctx.arg(3) != 0
}

pub fn sys_semctl(ctx: &mut Ctx) -> Status {
    let cmd_word = ctx.arg(2) & u32::MAX as u64;
    let buffer = semctl_buffer(cmd_word);
    let wrapped = indirect_semun(ctx);

    if ctx.exiting() {
        let semun = match ctx.tcp.take_private() {
            Some(Scratch::Word(semun)) => semun,
            _ => ctx.arg_addr(3),
        };
        let status = print_ctl_buffer(ctx, semun, buffer);
        if wrapped {
            ctx.out.text("]");
        }
        return status;
    }

    print_ipc_id(ctx);
    let semnum = ctx.arg(1);
    ctx.out.next();
    print_int(ctx, semnum);
    ctx.out.next();
    print_ipc_cmd(ctx, &SEMCTL_FLAGS, cmd_word, "SEM_???");
    ctx.out.next();

    let semun = if wrapped {
        let ptr = ctx.arg_addr(3);
        let word = ctx.personality().word_size();
        match ctx.umove(ptr, word) {
            Some(bytes) => StructView::new(&bytes).unsigned(0, word),
            None => {
                print_addr(ctx, ptr);
                return Status::Decoded(RetFmt::Decimal);
            }
        }
    } else {
        ctx.arg_addr(3)
    };
    if wrapped {
        ctx.out.text("[");
    }
    let status = print_ctl_buffer(ctx, semun, buffer);
    match status {
        Status::MoreAtExit => ctx.tcp.set_private(Scratch::Word(semun)),
        Status::Decoded(_) if wrapped => ctx.out.text("]"),
        Status::Decoded(_) => {}
    }
    status
}

fn print_sembuf(ctx: &mut Ctx, element: &[u8]) {
    let view = StructView::new(element);
    ctx.out.struct_begin();
    ctx.out.field("sem_num");
    ctx.out.text(&view.u16(0).to_string());
    ctx.out.field("sem_op");
    ctx.out.text(&view.signed(2, 2).to_string());
    ctx.out.field("sem_flg");
    print_flags(ctx, &SEMOP_FLAGS, view.u16(4) as u64, "SEM_???");
    ctx.out.struct_end();
}

fn print_sembuf_array(ctx: &mut Ctx, addr: u64, nsops: u64) {
    ctx.out.next();
    print_array(ctx, addr, nsops & u32::MAX as u64, SEMBUF_SIZE, print_sembuf);
    ctx.out.next();
    print_uint(ctx, nsops);
}

fn sembuf_args(ctx: &Ctx) -> (u64, u64) {
    if ctx.tcp.indirect_ipc() {
        (ctx.arg_addr(3), ctx.arg(1))
    } else {
        (ctx.arg_addr(1), ctx.arg(2))
    }
}

pub fn sys_semop(ctx: &mut Ctx) -> Status {
    let (sops, nsops) = sembuf_args(ctx);
    print_ipc_id(ctx);
    print_sembuf_array(ctx, sops, nsops);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_semtimedop(ctx: &mut Ctx) -> Status {
    let (sops, nsops) = sembuf_args(ctx);
    let timeout = ctx.arg_addr(ipc_slot(ctx, 3, 4));
    print_ipc_id(ctx);
    print_sembuf_array(ctx, sops, nsops);
    ctx.out.next();
    if ctx.tcp.name() == Some("semtimedop_time64") {
        print_timespec64(ctx, timeout);
    } else {
        print_timespec(ctx, timeout);
    }
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
    const SEMGET: u64 = 64;
    const SEMOP: u64 = 65;
    const SEMCTL: u64 = 66;
    const SEMTIMEDOP: u64 = 220;

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

    fn sembuf(num: u16, op: i16, flg: u16) -> Vec<u8> {
        let mut bytes = num.to_ne_bytes().to_vec();
        bytes.extend_from_slice(&op.to_ne_bytes());
        bytes.extend_from_slice(&flg.to_ne_bytes());
        bytes
    }

    #[test]
    fn semget_with_flags() {
        let line = render(
            &MemoryImage::new(),
            Personality::Native,
            SEMGET,
            [0x2a, 2, 0o1000 | 0o666, 0, 0, 0],
            1,
        );
        assert_eq!(line, "semget(0x2a, 2, IPC_CREAT|0666) = 1");
    }

    #[test]
    fn operations_are_an_array() {
        let mut sops = sembuf(0, -1, 0x1000);
        sops.extend(sembuf(1, 1, 0));
        let mem = MemoryImage::new().with(0x3000, sops);
        assert_eq!(
            render(&mem, Personality::Native, SEMOP, [4, 0x3000, 2, 0, 0, 0], 0),
            "semop(4, [{sem_num=0, sem_op=-1, sem_flg=SEM_UNDO}, {sem_num=1, sem_op=1, sem_flg=0}], 2) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, SEMTIMEDOP, [4, 0x3000, 1, 0, 0, 0], 0),
            "semtimedop(4, [{sem_num=0, sem_op=-1, sem_flg=SEM_UNDO}], 1, NULL) = 0"
        );
    }

    fn semid_native() -> Vec<u8> {
        let mut ds = vec![0u8; 104];
        ds[0..4].copy_from_slice(&0xbeefu32.to_ne_bytes());
        ds[4..8].copy_from_slice(&1000u32.to_ne_bytes());
        ds[8..12].copy_from_slice(&1000u32.to_ne_bytes());
        ds[12..16].copy_from_slice(&1000u32.to_ne_bytes());
        ds[16..20].copy_from_slice(&1000u32.to_ne_bytes());
        ds[20..22].copy_from_slice(&0o640u16.to_ne_bytes());
        ds[48..56].copy_from_slice(&1_700_000_000i64.to_ne_bytes());
        ds[64..72].copy_from_slice(&1_700_000_001i64.to_ne_bytes());
        ds[80..88].copy_from_slice(&3u64.to_ne_bytes());
        ds
    }

    #[test]
    fn stat_is_decoded_at_exit() {
        let mem = MemoryImage::new().with(0x4000, semid_native());
        assert_eq!(
            render(&mem, Personality::Native, SEMCTL, [5, 0, 2, 0x4000, 0, 0], 0),
            "semctl(5, 0, IPC_STAT, {sem_perm={uid=1000, gid=1000, mode=0640, key=48879, cuid=1000, cgid=1000}, \
             sem_otime=1700000000, sem_ctime=1700000001, sem_nsems=3}) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, SEMCTL, [5, 0, 1, 0x4000, 0, 0], 0),
            "semctl(5, 0, IPC_SET, {sem_perm={uid=1000, gid=1000, mode=0640}}) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, SEMCTL, [5, 1, 16, 7, 0, 0], 0),
            "semctl(5, 1, SETVAL, 7) = 0"
        );
    }

    #[test]
    fn stat_keeps_its_address_at_entry() {
        let mem = MemoryImage::new().with(0x4000, semid_native());
        let cfg = Config::default();
        let env = Env {
            mem: &mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        let mut call = TracedCall::new(9, SEMCTL, Personality::Native, [5, 0, 2, 0x4000, 0, 0]);
        let mut out = crate::printer::Printer::new();
        let status = crate::decode::syscall_entering(&mut call, &env, &mut out);
        assert_eq!(status, Status::MoreAtExit);
        assert_eq!(out.as_str(), "5, 0, IPC_STAT, ");
        assert_eq!(call.private(), Some(&Scratch::Word(0x4000)));
    }

    #[test]
    fn indirect_semun_goes_through_a_pointer() {
        let mut ds = vec![0u8; 64];
        ds[20..22].copy_from_slice(&0o600u16.to_ne_bytes());
        ds[52..56].copy_from_slice(&1u32.to_ne_bytes());
        let mem = MemoryImage::new()
            .with(0x8000, 0x9000u32.to_ne_bytes())
            .with(0x9000, ds);
        // ipc(SEMCTL, semid, semnum, cmd, &semun)
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [3, 5, 0, 0x102, 0x8000, 0], 0),
            "semctl(5, 0, IPC_64|IPC_STAT, [{sem_perm={uid=0, gid=0, mode=0600, key=0, cuid=0, cgid=0}, \
             sem_otime=0, sem_ctime=0, sem_nsems=1}]) = 0"
        );
    }

    #[test]
    fn bare_i386_commands_use_the_old_layout() {
        let mut ds = vec![0u8; 44];
        ds[4..6].copy_from_slice(&1000u16.to_ne_bytes());
        ds[12..14].copy_from_slice(&0o600u16.to_ne_bytes());
        ds[16..20].copy_from_slice(&1_700_000_000i32.to_ne_bytes());
        ds[40..42].copy_from_slice(&2u16.to_ne_bytes());
        let mem = MemoryImage::new()
            .with(0x8000, 0x9000u32.to_ne_bytes())
            .with(0x9000, ds);
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [3, 5, 0, 2, 0x8000, 0], 0),
            "semctl(5, 0, IPC_STAT, [{sem_perm={uid=1000, gid=0, mode=0600, key=0, cuid=0, cgid=0}, \
             sem_otime=1700000000, sem_ctime=0, sem_nsems=2}]) = 0"
        );
    }
}
