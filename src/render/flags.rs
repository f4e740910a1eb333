use crate::{
    decode::Ctx,
    xlat::{format_flags, format_hex, format_xval, ipc::IPC_64, Xlat, XlatStyle},
};

pub fn print_xval(ctx: &mut Ctx, table: &Xlat, value: u64, dflt: &str) {
    let rendered = format_xval(table, value, Some(dflt), ctx.style());
    ctx.out.text(&rendered);
}

pub fn print_flags(ctx: &mut Ctx, table: &Xlat, value: u64, dflt: &str) {
    let rendered = format_flags(table, value, Some(dflt), ctx.style());
    ctx.out.text(&rendered);
}

/// Known flags of `value`, nothing at all when it is zero.
///
/// Used where flags share a word with other data and are joined to it by `|`.
pub fn format_flags_in(table: &Xlat, value: u64, style: XlatStyle) -> Option<String> {
    if value == 0 {
        return None;
    }
    Some(format_flags(table, value, None, style))
}

/// A SysV IPC command word: `IPC_64|` when set, then the command itself.
pub fn format_ipc_cmd(table: &Xlat, cmd: u64, dflt: &str, style: XlatStyle) -> String {
    let mut rendered = String::new();
    let mut cmd = cmd;
    if cmd & IPC_64 != 0 {
        match style {
            XlatStyle::Raw => rendered.push_str(&format_hex(IPC_64)),
            XlatStyle::Abbrev => rendered.push_str("IPC_64"),
            XlatStyle::Verbose => rendered.push_str(&format!("{} /* IPC_64 */", format_hex(IPC_64))),
        }
        rendered.push('|');
        cmd &= !IPC_64;
    }
    rendered.push_str(&format_xval(table, cmd, Some(dflt), style));
    rendered
}

pub fn print_ipc_cmd(ctx: &mut Ctx, table: &Xlat, cmd: u64, dflt: &str) {
    let rendered = format_ipc_cmd(table, cmd, dflt, ctx.style());
    ctx.out.text(&rendered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlat::ipc::{MSGCTL_FLAGS, MSG_FLAGS};

    #[test]
    fn ipc_64_prefix() {
        assert_eq!(
            format_ipc_cmd(&MSGCTL_FLAGS, 0x102, "MSG_???", XlatStyle::Abbrev),
            "IPC_64|IPC_STAT"
        );
        assert_eq!(
            format_ipc_cmd(&MSGCTL_FLAGS, 0x2, "MSG_???", XlatStyle::Abbrev),
            "IPC_STAT"
        );
        assert_eq!(
            format_ipc_cmd(&MSGCTL_FLAGS, 0x1ff, "MSG_???", XlatStyle::Abbrev),
            "IPC_64|0xff /* MSG_??? */"
        );
        assert_eq!(
            format_ipc_cmd(&MSGCTL_FLAGS, 0x102, "MSG_???", XlatStyle::Raw),
            "0x100|0x2"
        );
    }

    #[test]
    fn flags_in_prints_nothing_for_zero() {
        assert_eq!(format_flags_in(&MSG_FLAGS, 0, XlatStyle::Abbrev), None);
        assert_eq!(
            format_flags_in(&MSG_FLAGS, 0o4000, XlatStyle::Abbrev).as_deref(),
            Some("IPC_NOWAIT")
        );
    }
}
