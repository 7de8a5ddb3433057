//! Decoder and display tooling for the legacy client's queue.dat snapshot.
//!
//! The [`decoder`] module turns the raw 7168-byte record into a typed,
//! read-only [`decoder::QueueSnapshot`] view and maps decoded slots into an
//! external job-tracking model. The [`formatter`] module renders snapshots
//! for the CLI.

pub mod decoder;
pub mod formatter;
