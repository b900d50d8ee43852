//! User-facing progress output: stage banners, per-file ✓/✗ lines, and
//! summaries. Diagnostics go through `log`; this module only formats what the
//! operator reads on stdout.

use crate::core::Stage;
use crate::io::walker::normalize;
use crate::pipeline::{PipelineSummary, StageReport};
use crate::run_log::RunLogEntry;
use crate::sources::IngestReport;
use colored::*;
use std::io::Write;

pub struct Reporter<W: Write> {
    writer: W,
    plain: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            plain: false,
        }
    }

    /// Disable colours.
    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ok_mark(&self) -> String {
        if self.plain {
            "✓".to_string()
        } else {
            "✓".green().to_string()
        }
    }

    fn fail_mark(&self) -> String {
        if self.plain {
            "✗".to_string()
        } else {
            "✗".red().to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.plain {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }

    pub fn write_stage_banner(&mut self, stage: Stage, dry_run: bool) -> anyhow::Result<()> {
        let banner = format!("=== {} ===", stage.banner());
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.heading(&banner))?;
        if dry_run {
            writeln!(self.writer, "(dry run: no files will be written)")?;
        }
        Ok(())
    }

    /// Per-file lines for one stage, then its count.
    pub fn write_stage_report(&mut self, report: &StageReport) -> anyhow::Result<()> {
        self.write_stage_banner(report.stage, report.dry_run)?;

        if report.input_missing {
            writeln!(
                self.writer,
                "  No {}/ directory found, nothing to process",
                report.stage.input().dir_name()
            )?;
        }

        for file in &report.results.successes {
            writeln!(
                self.writer,
                "  {} {}: {}",
                self.ok_mark(),
                normalize(&file.path),
                file.message
            )?;
        }
        for failure in &report.results.failures {
            writeln!(
                self.writer,
                "  {} {}: Error - {}",
                self.fail_mark(),
                normalize(&failure.path),
                failure.error
            )?;
        }

        writeln!(
            self.writer,
            "{} files processed ({})",
            report.files_processed(),
            report.action()
        )?;
        Ok(())
    }

    pub fn write_summary(&mut self, summary: &PipelineSummary) -> anyhow::Result<()> {
        for report in &summary.reports {
            self.write_stage_report(report)?;
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.heading("=== PIPELINE SUMMARY ==="))?;
        for report in &summary.reports {
            writeln!(
                self.writer,
                "  {:<10} {} processed, {} failed",
                report.stage.name(),
                report.files_processed(),
                report.results.failure_count()
            )?;
        }
        if summary.dry_run {
            writeln!(self.writer, "Dry run: no files or run-log entries were written")?;
        }
        Ok(())
    }

    pub fn write_ingest_report(&mut self, report: &IngestReport) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.heading("=== INGESTION: Sources -> Raw ==="))?;
        for metric in &report.results.successes {
            writeln!(
                self.writer,
                "  {} {}: {} record(s), {}",
                self.ok_mark(),
                metric.id,
                metric.records,
                metric.origin
            )?;
        }
        for failure in &report.results.failures {
            writeln!(
                self.writer,
                "  {} {}: Error - {}",
                self.fail_mark(),
                normalize(&failure.path),
                failure.error
            )?;
        }
        writeln!(
            self.writer,
            "{} sources ingested, {} from sample data",
            report.results.success_count(),
            report.fallback_count()
        )?;
        if report.dry_run {
            writeln!(self.writer, "Dry run: no files were written")?;
        }
        Ok(())
    }

    pub fn write_run_log<'e>(
        &mut self,
        entries: impl IntoIterator<Item = &'e RunLogEntry>,
    ) -> anyhow::Result<()> {
        let mut any = false;
        for entry in entries {
            any = true;
            writeln!(
                self.writer,
                "{}  {:<24} {:>4} file(s){}",
                entry.timestamp.to_rfc3339(),
                entry.action,
                entry.files_processed,
                if entry.dry_run { "  [dry run]" } else { "" }
            )?;
        }
        if !any {
            writeln!(self.writer, "No pipeline runs recorded")?;
        }
        Ok(())
    }
}
