use anyhow::{bail, Context};
use clap::Parser;
use std::sync::atomic::Ordering;
use xlatrace::{
    cli::Args,
    tracer::{Tracer, TracerOptions, HALT},
    writer::{flush_buffer, initialize_writer},
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    if args.pid.is_none() && args.command().is_empty() {
        bail!("nothing to trace: pass a command or -p PID");
    }
    initialize_writer(args.output.as_deref(), !args.no_color).with_context(|| {
        format!(
            "could not open or create {}",
            args.output.as_deref().unwrap_or(std::path::Path::new("stderr")).display()
        )
    })?;

    ctrlc::set_handler(|| {
        let _ = flush_buffer();
        HALT.store(true, Ordering::SeqCst);
    })
    .context("could not install the interrupt handler")?;

    let opts = TracerOptions {
        follow_forks: args.follow_forks,
        failed_only: args.failed_only,
        mute_stdout: args.mute_stdout,
        summary: args.summary,
        attach: args.pid,
        command: args.command().to_vec(),
    };
    let mut tracer = Tracer::new(args.decode_config(), opts);
    tracer.run()?;
    Ok(())
}
