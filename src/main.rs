//! queuedat - Legacy queue.dat snapshot tool
//!
//! Decodes the legacy folding client's queue.dat work queue snapshot and
//! displays the ten work unit slots, either as a summary list or with full
//! details for one slot.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};

use queuedat::decoder::{QueueReader, QueueSnapshot};
use queuedat::formatter::{create_formatter, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the queue.dat file
    queue: String,

    /// Optional: index of a slot to show details for (0-9)
    slot: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "plain")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let output_format: OutputFormat = args.format.parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let mut reader = QueueReader::new();
    reader.read(&args.queue)?;

    if !reader.snapshot().read_ok {
        anyhow::bail!(
            "{} is not a supported queue.dat snapshot (wrong size or client version)",
            args.queue
        );
    }

    display_snapshot(reader.snapshot(), args.slot, output_format)
}

fn display_snapshot(
    snapshot: &QueueSnapshot,
    slot_index: Option<usize>,
    output_format: OutputFormat,
) -> Result<()> {
    let mut formatter = create_formatter(output_format);
    let mut stdout = io::stdout();

    formatter.begin_document(&mut stdout)?;
    formatter.snapshot_summary(&mut stdout, snapshot)?;

    if let Some(index) = slot_index {
        if let Some(entry) = snapshot.slots.get(index) {
            formatter.slot_details(&mut stdout, entry)?;
        } else if output_format == OutputFormat::Plain {
            writeln!(stdout, "\nSlot {index} is out of range (0-9).")?;
        }
    } else {
        formatter.begin_slot_list(&mut stdout)?;
        for entry in &snapshot.slots {
            formatter.slot_item(&mut stdout, entry)?;
        }
        formatter.end_slot_list(&mut stdout)?;
    }

    formatter.end_document(&mut stdout)?;

    Ok(())
}
