//! Boundary between decoded queue slots and the external job-tracking model.
//!
//! The job model lives outside this crate; it is reached through the
//! [`JobRecord`] trait, which exposes exactly the fields a decoded slot is
//! allowed to touch. `apply_slot` mutates the record in place and has no
//! other effect.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use super::status::EntryStatus;
use super::QueueSlot;

/// The mutable external job record a slot's derived fields are copied into.
pub trait JobRecord {
    fn set_tag(&mut self, tag: &str);
    fn set_download_time(&mut self, time: NaiveDateTime);
    fn set_due_time(&mut self, time: NaiveDateTime);
    fn set_finished_time(&mut self, time: NaiveDateTime);
    fn set_owner_name(&mut self, name: &str);
    fn set_team(&mut self, team: u32);
    /// Project identity comparison hook, keyed on (project, run, clone, gen).
    fn match_project(&mut self, project: u16, run: u16, clone: u16, generation: u16);
}

/// Copies a slot's derived fields into the external job record.
///
/// Slots whose status carries no usable work unit (Unknown, Empty, Garbage,
/// Abandoned) leave the record completely untouched. Times are copied as UTC
/// wall-clock values when the client runs on a virtual machine, local
/// wall-clock otherwise. The finished time is only set for Finished slots.
pub fn apply_slot(entry: &QueueSlot, on_virtual_machine: bool, job: &mut dyn JobRecord) {
    match entry.status {
        EntryStatus::Unknown
        | EntryStatus::Empty
        | EntryStatus::Garbage
        | EntryStatus::Abandoned => return,
        _ => {}
    }

    job.set_tag(&entry.work_unit_tag);
    job.set_download_time(wall_clock(entry.begin_time_utc, on_virtual_machine));
    job.set_due_time(wall_clock(entry.due_time_utc, on_virtual_machine));
    if entry.status == EntryStatus::Finished {
        job.set_finished_time(wall_clock(entry.end_time_utc, on_virtual_machine));
    }
    job.set_owner_name(&entry.folding_id);
    job.set_team(entry.team_number());
    job.match_project(
        entry.project_id,
        entry.project_run,
        entry.project_clone,
        entry.project_gen,
    );
}

fn wall_clock(time: DateTime<Utc>, on_virtual_machine: bool) -> NaiveDateTime {
    if on_virtual_machine {
        time.naive_utc()
    } else {
        time.with_timezone(&Local).naive_local()
    }
}
