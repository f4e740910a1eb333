// numeric constant -> symbolic name tables
//
// tables are plain static data, built once at compile time and only ever read.
// declaration order is part of the output: flag groups are matched greedily
// in the order they are listed, so wider groups (GPIOEVENT_REQUEST_BOTH_EDGES)
// must come before their single-bit members.

pub mod general;
pub mod gpio;
pub mod ipc;
pub mod kd;
pub mod perf;
pub mod uffd;
pub mod v4l2;

use std::{fmt::Display, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XlatKind {
    /// exactly one entry describes the value
    Values,
    /// the value is an OR of entries
    Flags,
}

/// How numbers in a table are spelled when printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumFmt {
    Hex,
    Dec,
    SignedDec,
}

/// How symbolic names are combined with numbers in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum XlatStyle {
    /// numbers only
    Raw,
    /// names, numbers only where no name is known
    #[default]
    Abbrev,
    /// numbers followed by their names in a comment
    Verbose,
}

impl FromStr for XlatStyle {
    type Err = String;

    fn from_str(style: &str) -> Result<Self, Self::Err> {
        match style {
            "raw" => Ok(XlatStyle::Raw),
            "abbrev" => Ok(XlatStyle::Abbrev),
            "verbose" => Ok(XlatStyle::Verbose),
            other => Err(format!(
                "unknown xlat style {other:?}, expected raw, abbrev or verbose"
            )),
        }
    }
}

impl Display for XlatStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XlatStyle::Raw => write!(f, "raw"),
            XlatStyle::Abbrev => write!(f, "abbrev"),
            XlatStyle::Verbose => write!(f, "verbose"),
        }
    }
}

#[derive(Debug)]
pub struct Xlat {
    pub kind: XlatKind,
    pub fmt: NumFmt,
    pub entries: &'static [(u64, &'static str)],
}

impl Xlat {
    pub const fn values(entries: &'static [(u64, &'static str)]) -> Self {
        Xlat {
            kind: XlatKind::Values,
            fmt: NumFmt::Hex,
            entries,
        }
    }

    pub const fn flags(entries: &'static [(u64, &'static str)]) -> Self {
        Xlat {
            kind: XlatKind::Flags,
            fmt: NumFmt::Hex,
            entries,
        }
    }

    pub const fn dec(self) -> Self {
        Xlat {
            fmt: NumFmt::Dec,
            ..self
        }
    }

    pub const fn signed(self) -> Self {
        Xlat {
            fmt: NumFmt::SignedDec,
            ..self
        }
    }

    /// the name of an exact match
    pub fn lookup_scalar(&self, value: u64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == value)
            .map(|(_, name)| *name)
    }

    /// Names of every entry fully contained in `value`, in table order,
    /// and the bits no entry accounted for.
    pub fn lookup_flags(&self, value: u64) -> (Vec<&'static str>, u64) {
        let mut residual = value;
        let mut names = Vec::new();
        for (entry, name) in self.entries {
            if *entry != 0 && residual & entry == *entry {
                names.push(*name);
                residual &= !entry;
            }
        }
        (names, residual)
    }

    fn zero_name(&self) -> Option<&'static str> {
        self.lookup_scalar(0)
    }
}

pub fn format_number(fmt: NumFmt, value: u64) -> String {
    match fmt {
        NumFmt::Hex => format_hex(value),
        NumFmt::Dec => value.to_string(),
        NumFmt::SignedDec => (value as i64).to_string(),
    }
}

/// `%#x`: zero has no prefix
pub fn format_hex(value: u64) -> String {
    if value == 0 {
        "0".to_owned()
    } else {
        format!("{value:#x}")
    }
}

/// Renders a value of an enumeration table.
///
/// `dflt` is the `PREFIX_???` comment attached to numbers no entry matches.
pub fn format_xval(table: &Xlat, value: u64, dflt: Option<&str>, style: XlatStyle) -> String {
    let number = format_number(table.fmt, value);
    let name = table.lookup_scalar(value);
    match (style, name) {
        (XlatStyle::Raw, _) => number,
        (XlatStyle::Abbrev, Some(name)) => name.to_owned(),
        (XlatStyle::Verbose, Some(name)) => format!("{number} /* {name} */"),
        (_, None) => with_comment(number, dflt),
    }
}

/// Renders a bitmask of a flag table.
pub fn format_flags(table: &Xlat, value: u64, dflt: Option<&str>, style: XlatStyle) -> String {
    let number = format_hex(value);
    if style == XlatStyle::Raw {
        return number;
    }
    let symbolic = if value == 0 {
        table.zero_name().map(str::to_owned)
    } else {
        let (names, residual) = table.lookup_flags(value);
        if names.is_empty() {
            None
        } else {
            let mut joined = names.join("|");
            if residual != 0 {
                joined.push('|');
                joined.push_str(&format_hex(residual));
            }
            Some(joined)
        }
    };
    match (style, symbolic) {
        (XlatStyle::Verbose, Some(symbolic)) => format!("{number} /* {symbolic} */"),
        (_, Some(symbolic)) => symbolic,
        (_, None) if value == 0 => number,
        (_, None) => with_comment(number, dflt),
    }
}

fn with_comment(number: String, comment: Option<&str>) -> String {
    match comment {
        Some(comment) => format!("{number} /* {comment} */"),
        None => number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: Xlat = Xlat::values(&[(0, "RED"), (1, "GREEN"), (2, "BLUE")]);
    static PERMS: Xlat = Xlat::flags(&[(3, "RW"), (1, "R"), (2, "W"), (4, "X")]);
    static OPTS: Xlat = Xlat::flags(&[(0, "NONE"), (1, "ONE")]);

    #[test]
    fn scalar_lookup() {
        assert_eq!(COLORS.lookup_scalar(1), Some("GREEN"));
        assert_eq!(COLORS.lookup_scalar(9), None);
        assert_eq!(format_xval(&COLORS, 2, Some("COLOR_???"), XlatStyle::Abbrev), "BLUE");
        assert_eq!(
            format_xval(&COLORS, 0x1f, Some("COLOR_???"), XlatStyle::Abbrev),
            "0x1f /* COLOR_??? */"
        );
        assert_eq!(format_xval(&COLORS, 0x1f, None, XlatStyle::Abbrev), "0x1f");
    }

    #[test]
    fn groups_match_in_declaration_order() {
        let (names, residual) = PERMS.lookup_flags(7);
        assert_eq!(names, vec!["RW", "X"]);
        assert_eq!(residual, 0);
        assert_eq!(PERMS.lookup_flags(7), PERMS.lookup_flags(7));
    }

    #[test]
    fn residual_bits() {
        assert_eq!(
            format_flags(&PERMS, 0x104, Some("P_???"), XlatStyle::Abbrev),
            "X|0x100"
        );
        assert_eq!(
            format_flags(&PERMS, 0x100, Some("P_???"), XlatStyle::Abbrev),
            "0x100 /* P_??? */"
        );
    }

    #[test]
    fn zero_values() {
        assert_eq!(format_flags(&OPTS, 0, None, XlatStyle::Abbrev), "NONE");
        assert_eq!(format_flags(&PERMS, 0, Some("P_???"), XlatStyle::Abbrev), "0");
    }

    #[test]
    fn styles() {
        assert_eq!(format_flags(&PERMS, 5, None, XlatStyle::Raw), "0x5");
        assert_eq!(
            format_flags(&PERMS, 5, None, XlatStyle::Verbose),
            "0x5 /* R|X */"
        );
        assert_eq!(format_xval(&COLORS, 1, None, XlatStyle::Verbose), "0x1 /* GREEN */");
        assert_eq!("verbose".parse::<XlatStyle>(), Ok(XlatStyle::Verbose));
        assert!("loud".parse::<XlatStyle>().is_err());
    }
}
