use crate::{auxiliary::constants::general::PATH_MAX, decode::Ctx, render::primitives::print_addr};

/// C-style quoting of tracee bytes.
///
/// Non-printable bytes become the shortest octal escape, three digits when the
/// next byte is an octal digit so the escape cannot swallow it.
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut quoted = String::with_capacity(bytes.len() + 2);
    quoted.push('"');
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'"' => quoted.push_str("\\\""),
            b'\\' => quoted.push_str("\\\\"),
            0x0c => quoted.push_str("\\f"),
            b'\n' => quoted.push_str("\\n"),
            b'\r' => quoted.push_str("\\r"),
            b'\t' => quoted.push_str("\\t"),
            0x0b => quoted.push_str("\\v"),
            0x20..=0x7e => quoted.push(byte as char),
            _ => {
                let next_is_octal = bytes
                    .get(index + 1)
                    .is_some_and(|next| (b'0'..=b'7').contains(next));
                if next_is_octal {
                    quoted.push_str(&format!("\\{byte:03o}"));
                } else {
                    quoted.push_str(&format!("\\{byte:o}"));
                }
            }
        }
    }
    quoted.push('"');
    quoted
}

/// `"prefix"...` when `truncated`
pub fn format_quoted(bytes: &[u8], truncated: bool) -> String {
    let mut quoted = quote_bytes(bytes);
    if truncated {
        quoted.push_str("...");
    }
    quoted
}

/// A NUL-terminated string, cut at the configured string limit.
pub fn print_str(ctx: &mut Ctx, addr: u64) {
    let limit = ctx.cfg.max_strlen;
    print_str_limited(ctx, addr, limit);
}

/// A path: limited by PATH_MAX only.
pub fn print_path(ctx: &mut Ctx, addr: u64) {
    print_str_limited(ctx, addr, PATH_MAX);
}

pub fn print_str_limited(ctx: &mut Ctx, addr: u64, limit: usize) {
    if addr == 0 {
        ctx.out.text("NULL");
        return;
    }
    // one byte past the limit tells a string of exactly `limit` bytes from a longer one
    match ctx.mem.fetch_cstring(addr, limit.saturating_add(1)) {
        Some(fetched) if fetched.terminated => {
            let truncated = fetched.bytes.len() > limit;
            let shown = &fetched.bytes[..fetched.bytes.len().min(limit)];
            ctx.out.text(&format_quoted(shown, truncated));
        }
        Some(fetched) if fetched.bytes.len() > limit => {
            ctx.out.text(&format_quoted(&fetched.bytes[..limit], true));
        }
        _ => print_addr(ctx, addr),
    }
}

/// A counted buffer: at most the string limit of `len` bytes is shown.
pub fn print_strn(ctx: &mut Ctx, addr: u64, len: u64) {
    if addr == 0 {
        ctx.out.text("NULL");
        return;
    }
    let limit = ctx.cfg.max_strlen as u64;
    let shown = len.min(limit) as usize;
    match ctx.umove(addr, shown) {
        Some(bytes) => ctx.out.text(&format_quoted(&bytes, len > limit)),
        None => print_addr(ctx, addr),
    }
}

/// A fixed-size char array already fetched with its structure.
///
/// Printed up to the first NUL, an array without one gets a trailing `...`.
pub fn format_local_cstring(bytes: &[u8]) -> String {
    match bytes.iter().position(|byte| *byte == b'\0') {
        Some(nul) => quote_bytes(&bytes[..nul]),
        None => format_quoted(bytes, true),
    }
}
