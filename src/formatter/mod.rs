use std::io::Write;

use crate::decoder::{QueueSlot, QueueSnapshot};

mod json;
mod plain;

pub use json::JsonFormatter;
pub use plain::PlainFormatter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub trait OutputFormatter {
    fn begin_document(&mut self, w: &mut dyn Write) -> std::io::Result<()>;
    fn end_document(&mut self, w: &mut dyn Write) -> std::io::Result<()>;

    fn snapshot_summary(
        &mut self,
        w: &mut dyn Write,
        snapshot: &QueueSnapshot,
    ) -> std::io::Result<()>;

    fn begin_slot_list(&mut self, w: &mut dyn Write) -> std::io::Result<()>;
    fn slot_item(&mut self, w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()>;
    fn end_slot_list(&mut self, w: &mut dyn Write) -> std::io::Result<()>;

    fn slot_details(&mut self, w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Plain => Box::new(PlainFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
