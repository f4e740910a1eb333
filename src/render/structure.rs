// fixed-layout records
//
// a record is described by a static field list per personality; the bytes
// come from one fetch and every field reads out of that copy.  reads past
// the end of the copy yield zero, the way the kernel treats fields a shorter
// userspace structure does not have.

use crate::{
    decode::Ctx,
    render::{
        flags::{print_flags, print_xval},
        primitives::{format_addr, format_fd, format_uid, format_umode},
        strings::format_local_cstring,
    },
    xlat::{format_hex, Xlat},
};

#[derive(Clone, Copy, Debug)]
pub struct StructView<'b> {
    bytes: &'b [u8],
}

impl<'b> StructView<'b> {
    pub fn new(bytes: &'b [u8]) -> Self {
        StructView { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// the view starting at `offset`
    pub fn sub(&self, offset: usize) -> StructView<'b> {
        StructView {
            bytes: self.bytes.get(offset..).unwrap_or(&[]),
        }
    }

    pub fn bytes(&self, offset: usize, len: usize) -> &'b [u8] {
        let end = offset.saturating_add(len).min(self.bytes.len());
        self.bytes.get(offset..end).unwrap_or(&[])
    }

    pub fn unsigned(&self, offset: usize, width: usize) -> u64 {
        let mut word = [0u8; 8];
        let width = width.min(8);
        let available = self.bytes(offset, width);
        word[..available.len()].copy_from_slice(available);
        u64::from_ne_bytes(word) & mask(width)
    }

    pub fn signed(&self, offset: usize, width: usize) -> i64 {
        let value = self.unsigned(offset, width);
        match width {
            1 => value as i8 as i64,
            2 => value as i16 as i64,
            4 => value as i32 as i64,
            _ => value as i64,
        }
    }

    pub fn u8(&self, offset: usize) -> u8 {
        self.unsigned(offset, 1) as u8
    }

    pub fn u16(&self, offset: usize) -> u16 {
        self.unsigned(offset, 2) as u16
    }

    pub fn u32(&self, offset: usize) -> u32 {
        self.unsigned(offset, 4) as u32
    }

    pub fn s32(&self, offset: usize) -> i32 {
        self.signed(offset, 4) as i32
    }

    pub fn u64(&self, offset: usize) -> u64 {
        self.unsigned(offset, 8)
    }

    pub fn s64(&self, offset: usize) -> i64 {
        self.signed(offset, 8)
    }
}

const fn mask(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// How one field is rendered.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    Int,
    Uint,
    Hex,
    Addr,
    /// octal permission bits
    Umode,
    /// uid or gid, all ones prints as -1
    Uid,
    Fd,
    Xval(&'static Xlat, &'static str),
    Flags(&'static Xlat, &'static str),
    /// char array inside the record
    CString,
    Nested(&'static [Field]),
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> Self {
        Field {
            name,
            offset,
            width,
            kind,
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

pub fn print_field(ctx: &mut Ctx, view: StructView, field: &Field) {
    ctx.out.field(field.name);
    print_field_value(ctx, view, field);
}

pub fn print_field_value(ctx: &mut Ctx, view: StructView, field: &Field) {
    let (offset, width) = (field.offset, field.width);
    match field.kind {
        FieldKind::Int => ctx.out.text(&view.signed(offset, width).to_string()),
        FieldKind::Uint => ctx.out.text(&view.unsigned(offset, width).to_string()),
        FieldKind::Hex => ctx.out.text(&format_hex(view.unsigned(offset, width))),
        FieldKind::Addr => ctx.out.text(&format_addr(view.unsigned(offset, width))),
        FieldKind::Umode => ctx.out.text(&format_umode(view.unsigned(offset, width))),
        FieldKind::Uid => ctx.out.text(&format_uid(view.unsigned(offset, width) as u32)),
        FieldKind::Fd => {
            let rendered = format_fd(ctx, view.signed(offset, width) as i32);
            ctx.out.text(&rendered);
        }
        FieldKind::Xval(table, dflt) => print_xval(ctx, table, view.unsigned(offset, width), dflt),
        FieldKind::Flags(table, dflt) => {
            print_flags(ctx, table, view.unsigned(offset, width), dflt)
        }
        FieldKind::CString => ctx.out.text(&format_local_cstring(view.bytes(offset, width))),
        FieldKind::Nested(fields) => print_struct(ctx, view.sub(offset), fields),
    }
}

pub fn print_fields(ctx: &mut Ctx, view: StructView, fields: &[Field]) {
    for field in fields {
        print_field(ctx, view, field);
    }
}

pub fn print_struct(ctx: &mut Ctx, view: StructView, fields: &[Field]) {
    ctx.out.struct_begin();
    print_fields(ctx, view, fields);
    ctx.out.struct_end();
}

/// Prints the fields that lie entirely within the first `present` bytes.
///
/// Returns false once a field had to be left out.
pub fn print_fields_upto(ctx: &mut Ctx, view: StructView, fields: &[Field], present: usize) -> bool {
    for field in fields {
        if field.end() > present {
            return false;
        }
        print_field(ctx, view, field);
    }
    true
}

/// Outcome of fetching a structure that announces its own size.
#[derive(Debug, PartialEq, Eq)]
pub enum Negotiated {
    /// `buf` has the known size, bytes past `fetched` are zero
    Fetched { buf: Vec<u8>, fetched: usize },
    /// the announced size is below the oldest layout
    TooSmall,
    Unreadable,
}

/// Fetches an extensible structure of `reported` bytes.
///
/// Never reads more than the `known` layout, whatever the tracee claims.
pub fn fetch_extensible(
    ctx: &Ctx,
    addr: u64,
    reported: usize,
    floor: usize,
    known: usize,
) -> Negotiated {
    if reported < floor {
        return Negotiated::TooSmall;
    }
    let fetched = reported.min(known);
    match ctx.umove(addr, fetched) {
        Some(mut buf) => {
            buf.resize(known, 0);
            Negotiated::Fetched { buf, fetched }
        }
        None => Negotiated::Unreadable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_native_endian_and_zero_past_the_end() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x1122_3344u32.to_ne_bytes());
        bytes.extend_from_slice(&(-2i16).to_ne_bytes());
        let view = StructView::new(&bytes);
        assert_eq!(view.u32(0), 0x1122_3344);
        assert_eq!(view.signed(4, 2), -2);
        assert_eq!(view.u16(4), 0xfffe);
        assert_eq!(view.u64(8), 0);
        assert_eq!(view.sub(4).u16(0), 0xfffe);
        assert!(view.sub(100).is_empty());
    }

    #[test]
    fn field_ends() {
        let field = Field::new("x", 8, 4, FieldKind::Uint);
        assert_eq!(field.end(), 12);
    }
}
