//! Syscall argument decoding for a ptrace based tracer.
//!
//! A [`traced_call::TracedCall`] is decoded in two halves, at its entry and
//! at its exit stop, through [`decode::syscall_entering`] and
//! [`decode::syscall_exiting`]. Decoders read the tracee only through
//! [`peeker_poker::TraceeMemory`], so a [`peeker_poker::MemoryImage`] can
//! stand in for a live process.

pub mod auxiliary;
pub mod cli;
pub mod colors;
pub mod config;
pub mod decode;
pub mod decorator;
pub mod error;
pub mod peeker_poker;
pub mod personality;
pub mod printer;
pub mod regs;
pub mod render;
pub mod traced_call;
pub mod tracer;
pub mod writer;
pub mod xlat;
