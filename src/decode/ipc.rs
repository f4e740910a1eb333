// SysV IPC: the multiplexed `ipc` call and what msg, sem and shm share
//
// x86_64 and x32 enter msgget and friends directly, i386 goes through
// `ipc(call, first, second, third, ptr, fifth)`. after the sub-call is
// resolved the arguments are shifted by one and the sub-call decoder runs
// with `indirect_ipc` set, which moves some pointers to other slots.
//
// 64-bit callers always get the IPC_64 layouts; x32 shares the native ones
// because its ipc64_perm and timestamps are built from __kernel_long_t.
// i386 picks per call: IPC_64 in the command selects *id64_ds, a bare
// command the old *id_ds with its 16-bit ids.

use crate::{
    decode::{decoder_for, printargs, Ctx, RetFmt, Status},
    personality::Personality,
    render::{
        flags::format_flags_in,
        primitives::{format_umode, print_addr},
        structure::{print_fields, print_struct, Field, FieldKind},
        StructView,
    },
    traced_call::Scratch,
    xlat::{
        format_xval,
        ipc::{IPC_64, IPC_CALLS, IPC_PRIVATE, IPC_SET, RESOURCE_FLAGS},
        Xlat, XlatStyle,
    },
};

pub fn sys_ipc(ctx: &mut Ctx) -> Status {
    let call = ctx.arg(0);
    let version = (call >> 16) & 0xffff;
    let subcall = IPC_CALLS
        .lookup_scalar(call & 0xffff)
        .and_then(|name| decoder_for(name).map(|decoder| (name, decoder)));
    let Some((name, decoder)) = subcall else {
        return printargs(ctx);
    };
    tracing::trace!(name, version, "ipc subcall");
    ctx.tcp.enter_ipc_subcall(name);
    if version != 0 && name == "msgrcv" {
        ctx.tcp.set_private(Scratch::Word(version));
    }
    decoder(ctx)
}

/// `IPC_PRIVATE` or the key in hex
pub fn format_ipc_key(key: u64, style: XlatStyle) -> String {
    format_xval(&IPC_PRIVATE, key & u32::MAX as u64, None, style)
}

pub fn print_ipc_key(ctx: &mut Ctx, index: usize) {
    let key = ctx.arg(index);
    ctx.out.next();
    let rendered = format_ipc_key(key, ctx.style());
    ctx.out.text(&rendered);
}

/// `IPC_CREAT|IPC_EXCL|0600`: creation flags and the permission bits in one word
pub fn format_ipc_get_flags(table: &Xlat, flags: u64, style: XlatStyle) -> String {
    let flags = flags & u32::MAX as u64;
    let mut rendered = String::new();
    if let Some(known) = format_flags_in(table, flags & !0o777, style) {
        rendered.push_str(&known);
        rendered.push('|');
    }
    rendered.push_str(&format_umode(flags & 0o777));
    rendered
}

pub fn print_ipc_get_flags(ctx: &mut Ctx, index: usize) {
    let flags = ctx.arg(index);
    ctx.out.next();
    let rendered = format_ipc_get_flags(&RESOURCE_FLAGS, flags, ctx.style());
    ctx.out.text(&rendered);
}

/// the leading `int` id of every ctl/op call
pub fn print_ipc_id(ctx: &mut Ctx) {
    let id = ctx.arg(0) as i32;
    ctx.out.item(&id.to_string());
}

/// the argument slot holding a pointer, which moves for indirect calls
pub fn ipc_slot(ctx: &Ctx, direct: usize, indirect: usize) -> usize {
    if ctx.tcp.indirect_ipc() {
        indirect
    } else {
        direct
    }
}

/// struct ipc64_perm; the first three fields are the ones IPC_SET takes
pub static IPC64_PERM: [Field; 6] = [
    Field::new("uid", 4, 4, FieldKind::Uid),
    Field::new("gid", 8, 4, FieldKind::Uid),
    Field::new("mode", 20, 2, FieldKind::Umode),
    Field::new("key", 0, 4, FieldKind::Uint),
    Field::new("cuid", 12, 4, FieldKind::Uid),
    Field::new("cgid", 16, 4, FieldKind::Uid),
];

/// the i386 struct ipc_perm, same order as `IPC64_PERM`
pub static IPC_PERM_OLD: [Field; 6] = [
    Field::new("uid", 4, 2, FieldKind::Uid),
    Field::new("gid", 6, 2, FieldKind::Uid),
    Field::new("mode", 12, 2, FieldKind::Umode),
    Field::new("key", 0, 4, FieldKind::Uint),
    Field::new("cuid", 8, 2, FieldKind::Uid),
    Field::new("cgid", 10, 2, FieldKind::Uid),
];

const PERM_SET_FIELDS: usize = 3;

/// One `*id_ds`: its permissions at offset 0, then the tail.
#[derive(Debug)]
pub struct DsLayout {
    pub size: usize,
    pub perm_name: &'static str,
    pub perm: &'static [Field; 6],
    /// fields after the permissions for the STAT family
    pub tail: &'static [Field],
    /// fields after the permissions that IPC_SET writes
    pub set_tail: &'static [Field],
}

/// A `*id_ds` at `addr`; IPC_SET shows only what the kernel takes from it.
pub fn print_ipc_ds(ctx: &mut Ctx, addr: u64, layout: &DsLayout, cmd: u64) {
    let Some(buf) = ctx.umove_or_printaddr(addr, layout.size) else {
        return;
    };
    let view = StructView::new(&buf);
    let set = cmd == IPC_SET;
    ctx.out.struct_begin();
    ctx.out.field(layout.perm_name);
    let perm: &[Field] = if set { &layout.perm[..PERM_SET_FIELDS] } else { layout.perm };
    print_struct(ctx, view, perm);
    print_fields(ctx, view, if set { layout.set_tail } else { layout.tail });
    ctx.out.struct_end();
}

/// A fixed-size info record at `addr`.
pub fn print_ipc_info(ctx: &mut Ctx, addr: u64, fields: &[Field], size: usize) {
    if let Some(buf) = ctx.umove_or_printaddr(addr, size) {
        print_struct(ctx, StructView::new(&buf), fields);
    }
}

/// Picks the layout for the call's personality.
pub fn by_personality<T>(personality: Personality, native: T, compat: T) -> T {
    match personality {
        Personality::Native | Personality::X32 => native,
        Personality::Compat32 => compat,
    }
}

/// Picks the `*id_ds` layout for the call's personality and command.
pub fn ds_layout(
    personality: Personality,
    cmd: u64,
    native: &'static DsLayout,
    compat: &'static DsLayout,
    old: &'static DsLayout,
) -> &'static DsLayout {
    match personality {
        Personality::Compat32 if cmd & IPC_64 == 0 => old,
        personality => by_personality(personality, native, compat),
    }
}

/// Where the buffer argument of a ctl command is rendered.
#[derive(Clone, Copy)]
pub enum CtlBuffer {
    /// read by the kernel, shown at entry
    AtEntry(fn(&mut Ctx, u64)),
    /// written by the kernel, shown at exit unless the call failed
    AtExit(fn(&mut Ctx, u64)),
    /// the command ignores it or its layout is not known
    Address,
}

/// Prints the buffer argument of msgctl/shmctl/semctl for the current phase.
///
/// The separator before the buffer is emitted by the caller at entry.
pub fn print_ctl_buffer(ctx: &mut Ctx, addr: u64, buffer: CtlBuffer) -> Status {
    if ctx.entering() {
        match buffer {
            CtlBuffer::AtEntry(render) => render(ctx, addr),
            CtlBuffer::AtExit(_) => return Status::MoreAtExit,
            CtlBuffer::Address => print_addr(ctx, addr),
        }
        return Status::Decoded(RetFmt::Decimal);
    }
    if let CtlBuffer::AtExit(render) = buffer {
        if ctx.syserror() {
            print_addr(ctx, addr);
        } else {
            render(ctx, addr);
        }
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
        traced_call::TracedCall,
        xlat::ipc::SHM_RESOURCE_FLAGS,
    };

    #[test]
    fn keys_and_flags() {
        assert_eq!(format_ipc_key(0, XlatStyle::Abbrev), "IPC_PRIVATE");
        assert_eq!(format_ipc_key(0x1234, XlatStyle::Abbrev), "0x1234");
        assert_eq!(format_ipc_key(0, XlatStyle::Raw), "0");
        assert_eq!(format_ipc_get_flags(&RESOURCE_FLAGS, 0o600, XlatStyle::Abbrev), "0600");
        assert_eq!(
            format_ipc_get_flags(&RESOURCE_FLAGS, 0o1000 | 0o2000 | 0o644, XlatStyle::Abbrev),
            "IPC_CREAT|IPC_EXCL|0644"
        );
        assert_eq!(
            format_ipc_get_flags(&SHM_RESOURCE_FLAGS, 0o100000 | 0o1000, XlatStyle::Abbrev),
            "IPC_CREAT|0x8000|000"
        );
    }

    fn render_compat(args: [u64; 6], rval: u64) -> String {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        let env = Env {
            mem: &mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        // ipc on i386
        let mut call = TracedCall::new(3, 117, Personality::Compat32, args);
        render_call(&mut call, &env, rval)
    }

    #[test]
    fn multiplexed_calls_print_as_the_subcall() {
        assert_eq!(
            render_compat([13, 0, 0o1600, 0, 0, 0], 5),
            "msgget(IPC_PRIVATE, IPC_CREAT|0600) = 5"
        );
    }

    #[test]
    fn unknown_subcalls_print_raw_words() {
        assert_eq!(
            render_compat([99, 1, 2, 3, 4, 5], 0xffff_ffda),
            "ipc(0x63, 0x1, 0x2, 0x3, 0x4, 0x5) = -1 ENOSYS (Function not implemented)"
        );
    }
}
