use crate::{config::Config, xlat::XlatStyle};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    about = "xlatrace decodes what a traced process asks the kernel for, down to the last struct field.",
    version,
    allow_external_subcommands = true
)]
pub struct Args {
    /// string bytes and array elements to print before eliding the rest
    #[arg(short = 's', long = "string-limit", default_value_t = crate::config::DEFAULT_STRLEN)]
    pub string_limit: usize,

    /// print structures in full instead of abbreviating them
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// how named constants are printed
    #[arg(short = 'X', long = "xlat-style", value_enum, default_value_t = StyleArg::Abbrev)]
    pub xlat_style: StyleArg,

    /// print the path behind file descriptors
    #[arg(short = 'y', long = "decode-fds")]
    pub decode_fds: bool,

    /// print the command behind pids
    #[arg(short = 'Y', long = "decode-pids")]
    pub decode_pids: bool,

    /// write the trace to a file instead of stderr
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// provide a summary table at the end of tracing
    #[arg(short = 'c', long)]
    pub summary: bool,

    /// attach to an already running proceess
    #[arg(short = 'p', long = "attach")]
    pub pid: Option<i32>,

    /// trace child processes when traced programs create them
    #[arg(short = 'f', long = "follow-forks")]
    pub follow_forks: bool,

    /// only print failed syscalls
    #[arg(short = 'Z', long = "failed-only")]
    pub failed_only: bool,

    /// mute the traced program's std output
    #[arg(short = 'q', long = "mute-stdout")]
    pub mute_stdout: bool,

    /// no colors, even on a terminal
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// tracer diagnostics on stderr, repeat for more
    #[arg(short = 'd', action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub binary: Option<Binary>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Binary {
    #[command(external_subcommand)]
    Command(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Raw,
    Abbrev,
    Verbose,
}

impl From<StyleArg> for XlatStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Raw => XlatStyle::Raw,
            StyleArg::Abbrev => XlatStyle::Abbrev,
            StyleArg::Verbose => XlatStyle::Verbose,
        }
    }
}

impl Args {
    pub fn decode_config(&self) -> Config {
        Config {
            max_strlen: self.string_limit,
            verbose: self.verbose,
            xlat_style: self.xlat_style.into(),
            decode_fds: self.decode_fds,
            decode_pids: self.decode_pids,
        }
    }

    pub fn command(&self) -> &[String] {
        match &self.binary {
            Some(Binary::Command(binary_and_args)) => binary_and_args,
            None => &[],
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.debug {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_flags_reach_the_config() {
        let args = Args::parse_from(["xlatrace", "-s", "64", "-v", "-X", "verbose", "-y", "ls", "-l"]);
        let cfg = args.decode_config();
        assert_eq!(cfg.max_strlen, 64);
        assert!(cfg.verbose);
        assert_eq!(cfg.xlat_style, XlatStyle::Verbose);
        assert!(cfg.decode_fds);
        assert!(!cfg.decode_pids);
        assert_eq!(args.command(), ["ls", "-l"]);
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["xlatrace", "-dd", "true"]);
        assert_eq!(args.decode_config(), Config::default());
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn attach_needs_no_command() {
        let args = Args::parse_from(["xlatrace", "-p", "42"]);
        assert_eq!(args.pid, Some(42));
        assert!(args.command().is_empty());
    }
}
