use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::models::record::DailyUsageRecord;
use crate::core::period::UsagePeriod;

const HEADER: &str = "Date,Total Requests,Total Context Tokens,Total Generated Tokens,Input Token Cost,Output Token Cost,Total Cost";

/// The per-month CSV ledger file. Append-only: rows are never rewritten or
/// reordered, and at most one row exists per date.
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Ledger for a period inside `dir`, creating the directory if needed.
    /// Used by the build path, which is about to write.
    pub fn create(dir: &Path, period: &UsagePeriod) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create ledger directory: {}", dir.display()))?;
        Ok(Self::open(dir, period))
    }

    /// Ledger for a period inside `dir`, without touching the filesystem.
    /// Used by the summary path, which only reads.
    pub fn open(dir: &Path, period: &UsagePeriod) -> Self {
        Self {
            path: dir.join(period.ledger_file_name()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The set of date keys already recorded, loaded once per run so the
    /// build loop checks membership instead of re-scanning the file per day.
    pub fn existing_dates(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger: {}", self.path.display()))?;
        Ok(content
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .filter(|date| !date.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append one record. Writes the header first iff the file does not
    /// exist yet. Currency fields carry fixed 2-decimal precision.
    pub fn append(&self, record: &DailyUsageRecord) -> Result<()> {
        let file_exists = self.path.exists();
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger: {}", self.path.display()))?;
        if !file_exists {
            writeln!(file, "{}", HEADER)?;
        }
        writeln!(
            file,
            "{},{},{},{},{:.2},{:.2},{:.2}",
            record.date.format("%Y-%m-%d"),
            record.total_requests,
            record.total_context_tokens,
            record.total_generated_tokens,
            record.input_token_cost,
            record.output_token_cost,
            record.total_cost,
        )?;
        Ok(())
    }

    /// Read every recorded row back, in file order. `None` when no ledger
    /// file exists for the period.
    pub fn read_records(&self) -> Result<Option<Vec<DailyUsageRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger: {}", self.path.display()))?;

        let mut records = Vec::new();
        for line in content.lines().skip(1) {
            if line.is_empty() {
                continue;
            }
            records.push(parse_row(line).with_context(|| {
                format!("Malformed ledger row in {}: {}", self.path.display(), line)
            })?);
        }
        Ok(Some(records))
    }

    /// Sum of the Total Cost column. `None` when no ledger file exists.
    pub fn total_cost(&self) -> Result<Option<f64>> {
        Ok(self
            .read_records()?
            .map(|records| records.iter().map(|r| r.total_cost).sum()))
    }
}

fn parse_row(line: &str) -> Result<DailyUsageRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 7 {
        anyhow::bail!("expected 7 columns, got {}", fields.len());
    }
    Ok(DailyUsageRecord {
        date: NaiveDate::parse_from_str(fields[0], "%Y-%m-%d").context("bad date")?,
        total_requests: fields[1].parse().context("bad request count")?,
        total_context_tokens: fields[2].parse().context("bad context token count")?,
        total_generated_tokens: fields[3].parse().context("bad generated token count")?,
        input_token_cost: fields[4].parse().context("bad input cost")?,
        output_token_cost: fields[5].parse().context("bad output cost")?,
        total_cost: fields[6].parse().context("bad total cost")?,
    })
}
