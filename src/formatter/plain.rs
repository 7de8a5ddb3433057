use std::io::Write;

use super::OutputFormatter;
use crate::decoder::{QueueSlot, QueueSnapshot};

pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        PlainFormatter
    }
}

impl OutputFormatter for PlainFormatter {
    fn begin_document(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn end_document(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn snapshot_summary(
        &mut self,
        w: &mut dyn Write,
        snapshot: &QueueSnapshot,
    ) -> std::io::Result<()> {
        writeln!(
            w,
            "Queue version {}.{:02} ({:?}-endian), current index {}",
            snapshot.version / 100,
            snapshot.version % 100,
            snapshot.order,
            snapshot.current_index
        )?;
        writeln!(
            w,
            "Performance fraction: {:.4} (weight {:.2})",
            snapshot.performance_fraction, snapshot.performance_fraction_weight
        )?;
        writeln!(
            w,
            "Download rate: {:.3} KB/s (weight {:.2})",
            snapshot.download_rate_average, snapshot.download_rate_weight
        )?;
        writeln!(
            w,
            "Upload rate: {:.3} KB/s (weight {:.2})",
            snapshot.upload_rate_average, snapshot.upload_rate_weight
        )?;
        writeln!(w, "Results sent: {}", snapshot.results_sent)
    }

    fn begin_slot_list(&mut self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "\nSlots:")?;
        writeln!(w, "------")
    }

    fn slot_item(&mut self, w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()> {
        writeln!(
            w,
            "  {:02}  P{} (R{}, C{}, G{})  {}",
            entry.index,
            entry.project_id,
            entry.project_run,
            entry.project_clone,
            entry.project_gen,
            entry.status
        )
    }

    fn end_slot_list(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn slot_details(&mut self, w: &mut dyn Write, entry: &QueueSlot) -> std::io::Result<()> {
        writeln!(w, "\nDetailed information for slot {:02}:", entry.index)?;
        writeln!(w, "{}", "=".repeat(33))?;
        writeln!(w, "Status: {} (raw {})", entry.status, entry.raw_status)?;
        writeln!(
            w,
            "Project: P{} (R{}, C{}, G{})",
            entry.project_id, entry.project_run, entry.project_clone, entry.project_gen
        )?;
        writeln!(w, "Issued: {}", entry.project_issued_utc)?;
        writeln!(w, "Begin time: {}", entry.begin_time_utc)?;
        writeln!(w, "End time: {}", entry.end_time_utc)?;
        writeln!(w, "Due time: {}", entry.due_time_utc)?;
        if entry.speed_factor() != 0.0 {
            writeln!(w, "Speed factor: {:.2}", entry.speed_factor())?;
        }
        writeln!(w, "Core: {}", entry.core_url())?;
        writeln!(w, "Work unit type: {}", entry.work_unit_type)?;
        writeln!(w, "Work unit tag: {}", entry.work_unit_tag)?;
        writeln!(w, "Data file size: {} bytes", entry.wu_data_file_size)?;
        writeln!(
            w,
            "Owner: {} (team {}, user id {})",
            entry.folding_id,
            entry.team_number(),
            entry.user_id
        )?;
        writeln!(w, "Machine id: {}", entry.machine_id)?;
        if let Some(ip) = entry.server_ip {
            writeln!(w, "Server: {}:{}", ip, entry.server_port)?;
        }
        if let Some(ip) = entry.collection_server_ip {
            writeln!(w, "Collection server: {ip}")?;
        }
        if entry.assignment_info_present {
            writeln!(w, "Assignment time: {}", entry.assignment_time_utc)?;
            writeln!(w, "Assignment checksum: {}", entry.assignment_checksum)?;
        }
        writeln!(
            w,
            "Platform: {} / {}",
            entry.cpu_label(),
            entry.os_label()
        )?;
        writeln!(w, "Benchmark: {}", entry.benchmark)?;
        writeln!(w, "Flops: {}", entry.flops)?;
        writeln!(
            w,
            "Memory: {} KB (GPU {} KB)",
            entry.memory_kb, entry.gpu_memory_kb
        )?;
        writeln!(w, "SMP cores: {}", entry.number_of_smp_cores)?;
        writeln!(w, "Cores to use: {}", entry.use_cores)?;
        writeln!(w, "Expiration: {} seconds", entry.expiration_seconds)?;
        writeln!(w, "Packet size limit: {}", entry.packet_size_limit)?;
        writeln!(w, "Upload failures: {}", entry.number_of_upload_failures)
    }
}
