// the ptrace loop
//
// every tracee has at most one call in flight. its entry half is printed
// as soon as it is decoded; when another tracee stops in between, the open
// line is closed with `<unfinished ...>` and picked up again on exit as
// `<... name resumed>`.

use crate::{
    config::Config,
    decode::{self, call_name, Env},
    decorator::{Decorator, ProcDecorator},
    error::{Error, Result},
    peeker_poker::{ProcessMemory, TraceeMemory},
    printer::Printer,
    regs::SyscallRegisters,
    render::sigset::signal_name,
    traced_call::TracedCall,
    writer,
};
use nix::unistd::Pid;
use pete::{Ptracer, Restart, Stop, Tracee};
use std::{
    collections::HashMap,
    process::{Command, Stdio},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tabled::{builder::Builder, settings::Style};

/// Set from the interrupt handler, the loop stops at the next stop.
pub static HALT: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Debug, Default)]
pub struct TracerOptions {
    pub follow_forks: bool,
    pub failed_only: bool,
    pub mute_stdout: bool,
    pub summary: bool,
    pub attach: Option<i32>,
    pub command: Vec<String>,
}

/// How a tracee ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessEnd {
    Exited(i32),
    Killed(i32),
}

impl ProcessEnd {
    pub fn from_wait_status(status: i32) -> Self {
        match status & 0x7f {
            0 => ProcessEnd::Exited((status >> 8) & 0xff),
            signal => ProcessEnd::Killed(signal),
        }
    }
}

struct InFlight {
    call: TracedCall,
    out: Printer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub calls: u64,
    pub errors: u64,
}

pub struct Tracer {
    cfg: Config,
    opts: TracerOptions,
    in_flight: HashMap<i32, InFlight>,
    /// tracee whose line is open on the output
    line_owner: Option<i32>,
    counts: HashMap<String, Counts>,
}

impl Tracer {
    pub fn new(cfg: Config, opts: TracerOptions) -> Self {
        Tracer {
            cfg,
            opts,
            in_flight: HashMap::new(),
            line_owner: None,
            counts: HashMap::new(),
        }
    }

    fn prints_live(&self) -> bool {
        !self.opts.failed_only && !self.opts.summary
    }

    fn write_prefix(&self, pid: i32) {
        if self.opts.follow_forks {
            writer::write_pid(pid);
        }
    }

    fn interrupt_open_line(&mut self, pid: i32) {
        if let Some(owner) = self.line_owner {
            if owner != pid {
                writer::write_unfinished();
                self.line_owner = None;
            }
        }
    }

    /// Decodes an entry stop.
    pub fn syscall_enter(
        &mut self,
        pid: i32,
        regs: &SyscallRegisters,
        mem: &dyn TraceeMemory,
        deco: &dyn Decorator,
    ) -> Result<()> {
        let mut call = regs.traced_call(pid);
        let mut out = Printer::new();
        let env = Env {
            mem,
            deco,
            cfg: &self.cfg,
        };
        decode::syscall_entering(&mut call, &env, &mut out);
        if self.in_flight.contains_key(&pid) {
            tracing::debug!(pid, "entry stop while a call was in flight, dropping it");
        }
        if self.prints_live() {
            self.interrupt_open_line(pid);
            self.write_prefix(pid);
            writer::write_syscall_name(&call_name(&call));
            writer::write_general_text("(");
            writer::write_arguments(&out.take_text());
            self.line_owner = Some(pid);
            writer::flush_buffer()?;
        }
        self.in_flight.insert(pid, InFlight { call, out });
        Ok(())
    }

    /// Decodes an exit stop and completes the call's line.
    pub fn syscall_exit(
        &mut self,
        pid: i32,
        rval: u64,
        mem: &dyn TraceeMemory,
        deco: &dyn Decorator,
    ) -> Result<()> {
        let Some(InFlight { mut call, mut out }) = self.in_flight.remove(&pid) else {
            tracing::debug!(pid, "exit stop without an entry");
            return Ok(());
        };
        call.set_exit(rval);
        let env = Env {
            mem,
            deco,
            cfg: &self.cfg,
        };
        let fmt = decode::syscall_exiting(&mut call, &env, &mut out);
        let returned = decode::format_return(&call, &env, fmt);
        let name = call_name(&call);
        let counts = self.counts.entry(name.clone()).or_default();
        counts.calls += 1;
        if returned.failed {
            counts.errors += 1;
        }

        if self.opts.summary || (self.opts.failed_only && !returned.failed) {
            return Ok(());
        }
        if self.opts.failed_only {
            self.write_prefix(pid);
            writer::write_syscall_name(&name);
            writer::write_general_text("(");
        } else if self.line_owner != Some(pid) {
            self.interrupt_open_line(pid);
            self.write_prefix(pid);
            writer::write_resumed(&name);
        }
        writer::write_arguments(&out.take_text());
        writer::write_return(&returned.text, returned.failed);
        self.line_owner = None;
        writer::flush_buffer()?;
        Ok(())
    }

    /// A tracee is about to go away; a call still in flight never returns.
    pub fn process_exited(&mut self, pid: i32, end: ProcessEnd) -> Result<()> {
        if let Some(InFlight { call, .. }) = self.in_flight.remove(&pid) {
            if self.prints_live() {
                if self.line_owner != Some(pid) {
                    self.interrupt_open_line(pid);
                    self.write_prefix(pid);
                    writer::write_resumed(&call_name(&call));
                }
                writer::write_return("?", false);
                self.line_owner = None;
            }
        }
        if self.opts.summary {
            return Ok(());
        }
        self.interrupt_open_line(pid);
        self.write_prefix(pid);
        match end {
            ProcessEnd::Exited(code) => writer::write_exited(&format!("exited with {code}")),
            ProcessEnd::Killed(signal) => {
                writer::write_exited(&format!("killed by {}", signal_name(signal as u32)))
            }
        }
        writer::flush_buffer()?;
        Ok(())
    }

    pub fn counts(&self) -> &HashMap<String, Counts> {
        &self.counts
    }

    /// The `-c` table, most frequent calls first.
    pub fn summary_table(&self) -> String {
        let mut rows = Vec::from_iter(self.counts.iter());
        rows.sort_by(|(name, counts), (name2, counts2)| {
            counts2.calls.cmp(&counts.calls).then_with(|| name.cmp(name2))
        });

        let mut builder = Builder::new();
        builder.push_record(["calls", "errors", "syscall"]);
        let (mut calls, mut errors) = (0, 0);
        for (name, counts) in rows {
            calls += counts.calls;
            errors += counts.errors;
            builder.push_record([counts.calls.to_string(), counts.errors.to_string(), name.clone()]);
        }
        builder.push_record([calls.to_string(), errors.to_string(), "total".to_owned()]);
        builder.build().with(Style::ascii_rounded()).to_string()
    }

    fn spawn(&self, ptracer: &mut Ptracer) -> Result<i32> {
        let Some((binary, args)) = self.opts.command.split_first() else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "no command to run",
            )));
        };
        let mut command = Command::new(binary);
        command.args(args);
        if self.opts.mute_stdout {
            command.stdout(Stdio::null());
        }
        let child = ptracer.spawn(command).map_err(|source| Error::Spawn {
            command: binary.clone(),
            source,
        })?;
        Ok(child.id() as i32)
    }

    fn on_stop(&mut self, tracee: &Tracee) -> Result<()> {
        let pid = tracee.pid.as_raw();
        match tracee.stop {
            Stop::SyscallEnter | Stop::SyscallExit => {
                let regs = match read_registers(pid) {
                    Ok(regs) => regs,
                    Err(error) => {
                        tracing::warn!(%error, "skipping stop");
                        return Ok(());
                    }
                };
                let mem = ProcessMemory::new(Pid::from_raw(pid));
                if matches!(tracee.stop, Stop::SyscallEnter) {
                    self.syscall_enter(pid, &regs, &mem, &ProcDecorator)
                } else {
                    self.syscall_exit(pid, regs.rval, &mem, &ProcDecorator)
                }
            }
            Stop::Exiting { exit_code } => {
                self.process_exited(pid, ProcessEnd::from_wait_status(exit_code))
            }
            stop => {
                tracing::trace!(pid, "ignored stop {:?}", stop);
                Ok(())
            }
        }
    }

    /// Spawns or attaches, then traces until every tracee is gone.
    pub fn run(&mut self) -> Result<()> {
        if !cfg!(target_arch = "x86_64") {
            return Err(Error::UnsupportedArch);
        }
        let mut ptracer = Ptracer::new();
        *ptracer.poll_delay_mut() = Duration::from_nanos(1);
        let root = match self.opts.attach {
            Some(pid) => {
                ptracer.attach(pete::Pid::from_raw(pid))?;
                pid
            }
            None => self.spawn(&mut ptracer)?,
        };
        tracing::info!(pid = root, "tracing");

        while let Some(tracee) = ptracer.wait()? {
            if HALT.load(Ordering::SeqCst) {
                break;
            }
            if self.opts.follow_forks || tracee.pid.as_raw() == root {
                self.on_stop(&tracee)?;
            }
            let pid = tracee.pid.as_raw();
            if let Err(error) = ptracer.restart(tracee, Restart::Syscall) {
                tracing::debug!(pid, %error, "tracee vanished before restart");
            }
        }
        self.finish()
    }

    /// Flushes what is left, and prints the summary when asked to.
    pub fn finish(&mut self) -> Result<()> {
        writer::flush_buffer()?;
        if self.opts.summary {
            writer::write_block(&self.summary_table())?;
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
fn read_registers(pid: i32) -> Result<SyscallRegisters> {
    nix::sys::ptrace::getregs(Pid::from_raw(pid))
        .map(|regs| SyscallRegisters::from(&regs))
        .map_err(|errno| Error::Registers { pid, errno })
}

#[cfg(not(target_arch = "x86_64"))]
fn read_registers(_pid: i32) -> Result<SyscallRegisters> {
    Err(Error::UnsupportedArch)
}
