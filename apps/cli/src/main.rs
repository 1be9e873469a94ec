//! blocksim — drive the simulated allocator with a transaction file.
//!
//! Reads one whitespace-separated token stream of `allocate <size>`,
//! `deallocate <address>`, and `compact` commands, applies them in order,
//! echoes one acknowledgment line per command, and finally writes the
//! block-state report to stdout or a file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blocksim_alloc::{parse_stream, Allocator, CommandOutcome, DeallocOutcome, DEFAULT_SPACE_SIZE};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blocksim", version, about = "First-fit heap simulator with compaction")]
struct Cli {
    /// Transaction file: a whitespace-separated command stream.
    transactions: PathBuf,

    /// Size of the simulated address space in bytes.
    #[arg(long, env = "BLOCKSIM_SIZE", default_value_t = DEFAULT_SPACE_SIZE)]
    size: usize,

    /// Write the final report to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit the final report as JSON instead of the text layout.
    #[arg(long)]
    json: bool,

    /// Suppress the per-command acknowledgment lines.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // An unreadable transaction file ends the run before an allocator is
    // ever constructed.
    let stream = fs::read_to_string(&cli.transactions).with_context(|| {
        format!(
            "cannot open transaction file `{}`",
            cli.transactions.display()
        )
    })?;

    let mut heap = Allocator::new(cli.size);
    debug!(size = cli.size, "allocator constructed");

    for command in parse_stream(&stream) {
        let line = describe(&heap.execute(command));
        if !cli.quiet {
            println!("{line}");
        }
    }

    let snapshot = heap.snapshot();
    let report = if cli.json {
        serde_json::to_string_pretty(&snapshot).context("serializing report")?
    } else {
        // Display already ends each line; trim the trailing newline so both
        // sinks get exactly one terminator below.
        snapshot.to_string().trim_end().to_owned()
    };

    match &cli.output {
        Some(path) => fs::write(path, format!("{report}\n"))
            .with_context(|| format!("cannot write report to `{}`", path.display()))?,
        None => println!("{report}"),
    }

    Ok(())
}

/// One acknowledgment line per command, in the reference wording.
fn describe(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Allocated { address, size } => {
            format!("allocated {size} bytes at address {address}")
        }
        CommandOutcome::AllocationFailed { size, .. } => {
            format!("allocation failed for size {size}")
        }
        CommandOutcome::Deallocated(DeallocOutcome::Released { start, .. }) => {
            format!("deallocated at address {start}")
        }
        CommandOutcome::Deallocated(DeallocOutcome::StillReferenced { start, remaining }) => {
            format!("deallocate: block at address {start} still referenced ({remaining} refs remain)")
        }
        CommandOutcome::Deallocated(DeallocOutcome::NotFound { address }) => {
            format!("deallocate: no block at address {address}")
        }
        CommandOutcome::Compacted => "compacted memory".to_owned(),
    }
}
