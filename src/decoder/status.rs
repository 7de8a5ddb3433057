//! Semantic status derivation for queue slots.
//!
//! The raw status byte only takes values 0-4; the status shown to users needs
//! more context. A raw 0 can mean an empty slot, a deleted unit, or a finished
//! unit depending on the project id and upload status, and a raw 1 means
//! "folding now" only for the slot the client is currently working on.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryStatus {
    Unknown,
    Empty,
    Deleted,
    Finished,
    Garbage,
    FoldingNow,
    Queued,
    ReadyForUpload,
    Abandoned,
    FetchingFromServer,
}

impl Default for EntryStatus {
    fn default() -> Self {
        EntryStatus::Unknown
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntryStatus::Unknown => "Unknown",
            EntryStatus::Empty => "Empty",
            EntryStatus::Deleted => "Deleted",
            EntryStatus::Finished => "Finished",
            EntryStatus::Garbage => "Garbage",
            EntryStatus::FoldingNow => "Folding Now",
            EntryStatus::Queued => "Queued",
            EntryStatus::ReadyForUpload => "Ready For Upload",
            EntryStatus::Abandoned => "Abandoned",
            EntryStatus::FetchingFromServer => "Fetching From Server",
        };
        write!(f, "{label}")
    }
}

/// Derives the semantic status from the raw code plus context.
pub fn resolve(
    raw_status: u32,
    slot_index: u32,
    current_index: u32,
    project_id: u16,
    upload_status: u32,
) -> EntryStatus {
    match raw_status {
        0 => {
            if project_id == 0 {
                EntryStatus::Empty
            } else {
                match upload_status {
                    0 => EntryStatus::Deleted,
                    1 => EntryStatus::Finished,
                    _ => EntryStatus::Garbage,
                }
            }
        }
        1 => {
            if slot_index == current_index {
                EntryStatus::FoldingNow
            } else {
                EntryStatus::Queued
            }
        }
        2 => EntryStatus::ReadyForUpload,
        3 => EntryStatus::Abandoned,
        4 => EntryStatus::FetchingFromServer,
        _ => EntryStatus::Unknown,
    }
}

/// Ratio of the allowed duration to the actual folding duration, rounded to
/// two digits (half away from zero). Only Finished and ReadyForUpload slots
/// have a meaningful value; everything else is 0. A zero-length interval also
/// yields 0 — the legacy client left that case undefined.
pub fn speed_factor(
    status: EntryStatus,
    expiration_seconds: u32,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    if !matches!(status, EntryStatus::Finished | EntryStatus::ReadyForUpload) {
        return 0.0;
    }
    let elapsed = (end - begin).num_seconds();
    if elapsed <= 0 {
        return 0.0;
    }
    let factor = f64::from(expiration_seconds) / elapsed as f64;
    (factor * 100.0).round() / 100.0
}
