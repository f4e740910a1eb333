use crate::{
    decode::{
        ipc::{
            ds_layout, ipc_slot, print_ctl_buffer, print_ipc_ds, print_ipc_get_flags,
            print_ipc_id, print_ipc_info, print_ipc_key, CtlBuffer, DsLayout, IPC64_PERM, IPC_PERM_OLD,
        },
        Ctx, RetFmt, Status,
    },
    render::{
        flags::{print_flags, print_ipc_cmd},
        primitives::{print_addr, print_klong, print_kulong},
        strings::print_strn,
        structure::{Field, FieldKind},
        StructView,
    },
    traced_call::Scratch,
    xlat::ipc::{
        IPC_64, IPC_INFO, IPC_SET, IPC_STAT, MSGCTL_FLAGS, MSG_FLAGS, MSG_INFO, MSG_STAT,
        MSG_STAT_ANY,
    },
};

static MSQID_NATIVE: DsLayout = DsLayout {
    size: 120,
    perm_name: "msg_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("msg_stime", 48, 8, FieldKind::Int),
        Field::new("msg_rtime", 56, 8, FieldKind::Int),
        Field::new("msg_ctime", 64, 8, FieldKind::Int),
        Field::new("msg_qnum", 80, 8, FieldKind::Uint),
        Field::new("msg_qbytes", 88, 8, FieldKind::Uint),
        Field::new("msg_lspid", 96, 4, FieldKind::Int),
        Field::new("msg_lrpid", 100, 4, FieldKind::Int),
    ],
    set_tail: &[Field::new("msg_qbytes", 88, 8, FieldKind::Uint)],
};

static MSQID_COMPAT: DsLayout = DsLayout {
    size: 88,
    perm_name: "msg_perm",
    perm: &IPC64_PERM,
    tail: &[
        Field::new("msg_stime", 36, 4, FieldKind::Int),
        Field::new("msg_rtime", 44, 4, FieldKind::Int),
        Field::new("msg_ctime", 52, 4, FieldKind::Int),
        Field::new("msg_qnum", 64, 4, FieldKind::Uint),
        Field::new("msg_qbytes", 68, 4, FieldKind::Uint),
        Field::new("msg_lspid", 72, 4, FieldKind::Int),
        Field::new("msg_lrpid", 76, 4, FieldKind::Int),
    ],
    set_tail: &[Field::new("msg_qbytes", 68, 4, FieldKind::Uint)],
};

static MSQID_OLD: DsLayout = DsLayout {
    size: 56,
    perm_name: "msg_perm",
    perm: &IPC_PERM_OLD,
    tail: &[
        Field::new("msg_stime", 24, 4, FieldKind::Int),
        Field::new("msg_rtime", 28, 4, FieldKind::Int),
        Field::new("msg_ctime", 32, 4, FieldKind::Int),
        Field::new("msg_qnum", 46, 2, FieldKind::Uint),
        Field::new("msg_qbytes", 48, 2, FieldKind::Uint),
        Field::new("msg_lspid", 50, 2, FieldKind::Uint),
        Field::new("msg_lrpid", 52, 2, FieldKind::Uint),
    ],
    set_tail: &[Field::new("msg_qbytes", 48, 2, FieldKind::Uint)],
};

const MSGINFO_SIZE: usize = 32;

static MSGINFO_FIELDS: [Field; 8] = [
    Field::new("msgpool", 0, 4, FieldKind::Int),
    Field::new("msgmap", 4, 4, FieldKind::Int),
    Field::new("msgmax", 8, 4, FieldKind::Int),
    Field::new("msgmnb", 12, 4, FieldKind::Int),
    Field::new("msgmni", 16, 4, FieldKind::Int),
    Field::new("msgssz", 20, 4, FieldKind::Int),
    Field::new("msgtql", 24, 4, FieldKind::Int),
    Field::new("msgseg", 28, 2, FieldKind::Uint),
];

fn msqid_layout(ctx: &Ctx) -> &'static DsLayout {
    ds_layout(ctx.personality(), ctx.arg(1), &MSQID_NATIVE, &MSQID_COMPAT, &MSQID_OLD)
}

fn print_msqid_set(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, msqid_layout(ctx), IPC_SET);
}

fn print_msqid(ctx: &mut Ctx, addr: u64) {
    print_ipc_ds(ctx, addr, msqid_layout(ctx), IPC_STAT);
}

fn print_msginfo(ctx: &mut Ctx, addr: u64) {
    print_ipc_info(ctx, addr, &MSGINFO_FIELDS, MSGINFO_SIZE);
}

pub fn sys_msgget(ctx: &mut Ctx) -> Status {
    print_ipc_key(ctx, 0);
    print_ipc_get_flags(ctx, 1);
    Status::Decoded(RetFmt::Decimal)
}

pub fn sys_msgctl(ctx: &mut Ctx) -> Status {
    let cmd_word = ctx.arg(1) & u32::MAX as u64;
    let addr = ctx.arg_addr(ipc_slot(ctx, 2, 3));
    let buffer = match cmd_word & !IPC_64 {
        IPC_SET => CtlBuffer::AtEntry(print_msqid_set),
        IPC_STAT | MSG_STAT | MSG_STAT_ANY => CtlBuffer::AtExit(print_msqid),
        IPC_INFO | MSG_INFO => CtlBuffer::AtExit(print_msginfo),
        _ => CtlBuffer::Address,
    };
    if ctx.entering() {
        print_ipc_id(ctx);
        ctx.out.next();
        print_ipc_cmd(ctx, &MSGCTL_FLAGS, cmd_word, "MSG_???");
        ctx.out.next();
    }
    print_ctl_buffer(ctx, addr, buffer)
}

/// `{mtype=N, mtext="..."}`, the text limited to `count` bytes
fn print_msgbuf(ctx: &mut Ctx, addr: u64, count: u64) {
    let long = ctx.personality().kernel_long_size();
    let Some(bytes) = ctx.umove_or_printaddr(addr, long) else {
        return;
    };
    let mtype = StructView::new(&bytes).signed(0, long);
    ctx.out.struct_begin();
    ctx.out.field("mtype");
    ctx.out.text(&mtype.to_string());
    ctx.out.field("mtext");
    print_strn(ctx, addr.wrapping_add(long as u64), count);
    ctx.out.struct_end();
}

pub fn sys_msgsnd(ctx: &mut Ctx) -> Status {
    let (buf, size, flags) = if ctx.tcp.indirect_ipc() {
        (ctx.arg_addr(3), ctx.arg(1), ctx.arg(2))
    } else {
        (ctx.arg_addr(1), ctx.arg(2), ctx.arg(3))
    };
    print_ipc_id(ctx);
    ctx.out.next();
    print_msgbuf(ctx, buf, size);
    ctx.out.next();
    print_kulong(ctx, size);
    ctx.out.next();
    print_flags(ctx, &MSG_FLAGS, flags & u32::MAX as u64, "MSG_???");
    Status::Decoded(RetFmt::Decimal)
}

fn print_msgrcv_tail(ctx: &mut Ctx, buf: u64, size: u64, msgtyp: Option<u64>) {
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, buf);
    } else {
        let received = ctx.tcp.return_value().max(0) as u64;
        print_msgbuf(ctx, buf, received);
    }
    ctx.out.next();
    print_kulong(ctx, size);
    if let Some(msgtyp) = msgtyp {
        ctx.out.next();
        print_klong(ctx, msgtyp);
    }
}

/// `struct ipc_kludge {msgp, msgtyp}` of the version 0 multiplexed call
fn fetch_ipc_kludge(ctx: &mut Ctx, addr: u64) -> Option<(u64, u64)> {
    let word = ctx.personality().word_size();
    let bytes = ctx.umove(addr, 2 * word)?;
    let view = StructView::new(&bytes);
    Some((view.unsigned(0, word), view.signed(word, word) as u64))
}

pub fn sys_msgrcv(ctx: &mut Ctx) -> Status {
    if ctx.entering() {
        print_ipc_id(ctx);
        return Status::MoreAtExit;
    }
    let flags = if ctx.tcp.indirect_ipc() {
        let versioned = matches!(ctx.tcp.private(), Some(Scratch::Word(version)) if *version != 0);
        let size = ctx.arg(1);
        if versioned {
            let (buf, msgtyp) = (ctx.arg_addr(3), ctx.arg(4));
            print_msgrcv_tail(ctx, buf, size, Some(msgtyp));
        } else {
            let kludge = ctx.arg_addr(3);
            match fetch_ipc_kludge(ctx, kludge) {
                Some((buf, msgtyp)) => print_msgrcv_tail(ctx, buf, size, Some(msgtyp)),
                None => {
                    ctx.out.next();
                    print_addr(ctx, kludge);
                    ctx.out.next();
                    print_kulong(ctx, size);
                }
            }
        }
        ctx.arg(2)
    } else {
        let (buf, size, msgtyp) = (ctx.arg_addr(1), ctx.arg(2), ctx.arg(3));
        print_msgrcv_tail(ctx, buf, size, Some(msgtyp));
        ctx.arg(4)
    };
    ctx.tcp.take_private();
    ctx.out.next();
    print_flags(ctx, &MSG_FLAGS, flags & u32::MAX as u64, "MSG_???");
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
    const MSGGET: u64 = 68;
    const MSGSND: u64 = 69;
    const MSGRCV: u64 = 70;
    const MSGCTL: u64 = 71;

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
    fn msgget_private() {
        let line = render(&MemoryImage::new(), Personality::Native, MSGGET, [0, 0o600, 0, 0, 0, 0], 3);
        assert_eq!(line, "msgget(IPC_PRIVATE, 0600) = 3");
    }

    fn msgbuf(mtype: i64, text: &[u8]) -> Vec<u8> {
        let mut bytes = mtype.to_ne_bytes().to_vec();
        bytes.extend_from_slice(text);
        bytes
    }

    #[test]
    fn send_and_receive() {
        let mem = MemoryImage::new().with(0x5000, msgbuf(1, b"hello"));
        assert_eq!(
            render(&mem, Personality::Native, MSGSND, [3, 0x5000, 5, 0o4000, 0, 0], 0),
            "msgsnd(3, {mtype=1, mtext=\"hello\"}, 5, IPC_NOWAIT) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, MSGRCV, [3, 0x5000, 64, 0, 0, 0], 4),
            "msgrcv(3, {mtype=1, mtext=\"hell\"}, 64, 0, 0) = 4"
        );
    }

    #[test]
    fn indirect_msgrcv_reads_the_kludge() {
        let mut kludge = 0x6000u32.to_ne_bytes().to_vec();
        kludge.extend_from_slice(&(-2i32).to_ne_bytes());
        let mut mtype = 7i32.to_ne_bytes().to_vec();
        mtype.extend_from_slice(b"ab");
        let mem = MemoryImage::new().with(0x5000, kludge).with(0x6000, mtype);
        // ipc(MSGRCV, msqid, msgsz, msgflg, &kludge)
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [12, 3, 16, 0, 0x5000, 0], 2),
            "msgrcv(3, {mtype=7, mtext=\"ab\"}, 16, -2, 0) = 2"
        );
    }

    #[test]
    fn stat_waits_for_the_kernel() {
        let mut ds = vec![0u8; 120];
        ds[0..4].copy_from_slice(&0x1234u32.to_ne_bytes());
        ds[4..8].copy_from_slice(&1000u32.to_ne_bytes());
        ds[8..12].copy_from_slice(&100u32.to_ne_bytes());
        ds[20..22].copy_from_slice(&0o600u16.to_ne_bytes());
        ds[88..96].copy_from_slice(&16384u64.to_ne_bytes());
        let mem = MemoryImage::new().with(0x7000, ds);
        assert_eq!(
            render(&mem, Personality::Native, MSGCTL, [3, 2, 0x7000, 0, 0, 0], 0),
            "msgctl(3, IPC_STAT, {msg_perm={uid=1000, gid=100, mode=0600, key=4660, cuid=0, cgid=0}, \
             msg_stime=0, msg_rtime=0, msg_ctime=0, msg_qnum=0, msg_qbytes=16384, msg_lspid=0, msg_lrpid=0}) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, MSGCTL, [3, 1, 0x7000, 0, 0, 0], 0),
            "msgctl(3, IPC_SET, {msg_perm={uid=1000, gid=100, mode=0600}, msg_qbytes=16384}) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Native, MSGCTL, [3, 2, 0x7000, 0, 0, 0], (-1i64) as u64),
            "msgctl(3, IPC_STAT, 0x7000) = -1 EPERM (Operation not permitted)"
        );
        assert_eq!(
            render(&mem, Personality::Native, MSGCTL, [3, 0, 0, 0, 0, 0], 0),
            "msgctl(3, IPC_RMID, NULL) = 0"
        );
    }

    #[test]
    fn bare_i386_commands_use_the_old_layout() {
        let mut ds = vec![0u8; 56];
        ds[0..4].copy_from_slice(&0x1234u32.to_ne_bytes());
        ds[4..6].copy_from_slice(&1000u16.to_ne_bytes());
        ds[6..8].copy_from_slice(&100u16.to_ne_bytes());
        ds[12..14].copy_from_slice(&0o600u16.to_ne_bytes());
        ds[48..50].copy_from_slice(&16384u16.to_ne_bytes());
        ds[50..52].copy_from_slice(&42u16.to_ne_bytes());
        let mem = MemoryImage::new().with(0x7000, ds);
        // ipc(MSGCTL, msqid, cmd, 0, buf)
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [14, 3, 2, 0, 0x7000, 0], 0),
            "msgctl(3, IPC_STAT, {msg_perm={uid=1000, gid=100, mode=0600, key=4660, cuid=0, cgid=0}, \
             msg_stime=0, msg_rtime=0, msg_ctime=0, msg_qnum=0, msg_qbytes=16384, msg_lspid=42, msg_lrpid=0}) = 0"
        );
        assert_eq!(
            render(&mem, Personality::Compat32, 117, [14, 3, 1, 0, 0x7000, 0], 0),
            "msgctl(3, IPC_SET, {msg_perm={uid=1000, gid=100, mode=0600}, msg_qbytes=16384}) = 0"
        );
    }
}
