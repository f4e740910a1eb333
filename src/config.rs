use crate::xlat::XlatStyle;

pub const DEFAULT_STRLEN: usize = 32;

/// Knobs that shape decoded output, threaded through every decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// byte budget for strings and element budget for arrays
    pub max_strlen: usize,
    /// print structures in full instead of abbreviating them
    pub verbose: bool,
    pub xlat_style: XlatStyle,
    /// append `<path>` to file descriptors
    pub decode_fds: bool,
    /// append `<comm>` to pids
    pub decode_pids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_strlen: DEFAULT_STRLEN,
            verbose: false,
            xlat_style: XlatStyle::Abbrev,
            decode_fds: false,
            decode_pids: false,
        }
    }
}

impl Config {
    pub fn abbrev(&self) -> bool {
        !self.verbose
    }
}
