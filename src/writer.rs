// the trace output channel
//
// pieces of a line are collected as colored strings and only reach the sink
// on flush, so a line is never interleaved with the tracer's own logging.

use crate::colors::{
    syscall_color, EXITED_COLOR, FAILED_COLOR, GENERAL_TEXT_COLOR, PID_NUMBER_COLOR,
    UNFINISHED_COLOR,
};
use colored::{ColoredString, Colorize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{LazyLock, Mutex, MutexGuard, OnceLock, PoisonError},
};

pub static BUFFER: LazyLock<Mutex<Vec<ColoredString>>> = LazyLock::new(|| Mutex::new(Vec::new()));
pub static WRITER: OnceLock<Mutex<BufWriter<Box<dyn Write + Send>>>> = OnceLock::new();

fn buffer() -> MutexGuard<'static, Vec<ColoredString>> {
    BUFFER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Opens the sink: the given file, truncated, or stderr.
pub fn initialize_writer(output: Option<&Path>, color: bool) -> std::io::Result<()> {
    // colored turns itself off for stderr when stdout is redirected, e.g. to /dev/null
    // https://github.com/colored-rs/colored/issues/125#issuecomment-1691155922
    // files never get escapes
    colored::control::set_override(color && output.is_none());

    let sink: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stderr()),
    };
    let _ = WRITER.set(Mutex::new(BufWriter::new(sink)));
    Ok(())
}

#[inline(always)]
pub fn buffered_write(data: ColoredString) {
    buffer().push(data);
}

#[inline(always)]
pub fn write_general_text(text: &str) {
    buffered_write(text.custom_color(*GENERAL_TEXT_COLOR));
}

/// `[pid N] `
pub fn write_pid(pid: i32) {
    write_general_text("[pid ");
    buffered_write(pid.to_string().custom_color(*PID_NUMBER_COLOR));
    write_general_text("] ");
}

pub fn write_syscall_name(name: &str) {
    buffered_write(name.custom_color(syscall_color(name)));
}

/// The decoded arguments, uncolored apart from the general text color.
pub fn write_arguments(arguments: &str) {
    write_general_text(arguments);
}

pub fn write_return(text: &str, failed: bool) {
    write_general_text(") = ");
    if failed {
        buffered_write(text.custom_color(*FAILED_COLOR));
    } else {
        buffered_write(text.normal());
    }
    write_general_text("\n");
}

pub fn write_unfinished() {
    buffered_write(" <unfinished ...>".custom_color(*UNFINISHED_COLOR));
    write_general_text("\n");
}

/// `<... name resumed>`
pub fn write_resumed(name: &str) {
    write_general_text("<... ");
    write_syscall_name(name);
    buffered_write(" resumed>".custom_color(*UNFINISHED_COLOR));
}

pub fn write_exited(text: &str) {
    buffered_write(format!("+++ {text} +++").custom_color(*EXITED_COLOR));
    write_general_text("\n");
}

/// Drops a line that will not be shown after all.
pub fn empty_buffer() {
    buffer().clear();
}

/// The buffered line as plain text.
pub fn buffered_text() -> String {
    buffer().iter().map(|piece| &**piece).collect()
}

pub fn flush_buffer() -> std::io::Result<()> {
    // without a sink the line stays buffered
    let Some(writer) = WRITER.get() else {
        return Ok(());
    };
    let mut buffer = buffer();
    let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
    for colored_text in buffer.drain(..) {
        write!(writer, "{colored_text}")?;
    }
    writer.flush()
}

/// Writes text that bypasses the line buffer, like the summary table.
pub fn write_block(text: &str) -> std::io::Result<()> {
    flush_buffer()?;
    match WRITER.get() {
        Some(writer) => {
            let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(writer, "{text}")?;
            writer.flush()
        }
        None => Ok(()),
    }
}
