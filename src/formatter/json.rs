use std::io::Write;

use serde::Serialize;

use super::OutputFormatter;
use crate::decoder::{QueueSlot, QueueSnapshot};

pub struct JsonFormatter {
    data: JsonData,
}

#[derive(Serialize)]
struct JsonData {
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<JsonSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<JsonSlotItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot_details: Option<JsonSlotDetails>,
}

#[derive(Serialize)]
struct JsonSnapshot {
    version: u32,
    current_index: u32,
    order: crate::decoder::endian::Endianness,
    performance_fraction: f32,
    performance_fraction_weight: f32,
    download_rate_average: f64,
    download_rate_weight: f32,
    upload_rate_average: f64,
    upload_rate_weight: f32,
    results_sent: u32,
}

#[derive(Serialize)]
struct JsonSlotItem {
    index: u32,
    project: String,
    status: String,
}

/// Full slot dump: the decoded fields plus the derived values the plain
/// formatter computes on the fly.
#[derive(Serialize)]
struct JsonSlotDetails {
    #[serde(flatten)]
    entry: QueueSlot,
    core_url: String,
    speed_factor: f64,
    cpu_label: &'static str,
    os_label: &'static str,
    team_number: u32,
}

impl JsonFormatter {
    pub fn new() -> Self {
        JsonFormatter {
            data: JsonData {
                snapshot: None,
                slots: Vec::new(),
                slot_details: None,
            },
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn begin_document(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn end_document(&mut self, w: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        writeln!(w, "{json}")
    }

    fn snapshot_summary(
        &mut self,
        _w: &mut dyn Write,
        snapshot: &QueueSnapshot,
    ) -> std::io::Result<()> {
        self.data.snapshot = Some(JsonSnapshot {
            version: snapshot.version,
            current_index: snapshot.current_index,
            order: snapshot.order,
            performance_fraction: snapshot.performance_fraction,
            performance_fraction_weight: snapshot.performance_fraction_weight,
            download_rate_average: snapshot.download_rate_average,
            download_rate_weight: snapshot.download_rate_weight,
            upload_rate_average: snapshot.upload_rate_average,
            upload_rate_weight: snapshot.upload_rate_weight,
            results_sent: snapshot.results_sent,
        });
        Ok(())
    }

    fn begin_slot_list(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn slot_item(&mut self, _w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()> {
        self.data.slots.push(JsonSlotItem {
            index: entry.index,
            project: format!(
                "P{} (R{}, C{}, G{})",
                entry.project_id, entry.project_run, entry.project_clone, entry.project_gen
            ),
            status: entry.status.to_string(),
        });
        Ok(())
    }

    fn end_slot_list(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn slot_details(&mut self, _w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()> {
        self.data.slot_details = Some(JsonSlotDetails {
            core_url: entry.core_url(),
            speed_factor: entry.speed_factor(),
            cpu_label: entry.cpu_label(),
            os_label: entry.os_label(),
            team_number: entry.team_number(),
            entry: entry.clone(),
        });
        Ok(())
    }
}
