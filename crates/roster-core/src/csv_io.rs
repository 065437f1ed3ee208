// CSV import of member names and export of activity outcomes.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::activity::Outcome;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read member names from the first column of a CSV file.
///
/// A leading `name` header is skipped, names are trimmed, and blank rows are
/// ignored. Extra columns are allowed and ignored.
pub fn import_member_names(path: &Path) -> Result<Vec<String>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut names = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let Some(first) = record.get(0) else {
            continue;
        };
        let name = first.trim();
        if name.is_empty() {
            continue;
        }
        if row == 0 && name.eq_ignore_ascii_case("name") {
            continue;
        }
        names.push(name.to_string());
    }

    info!("Read {} member names from {}", names.len(), path.display());
    Ok(names)
}

/// Write an outcome as `group,slot,position,member` rows.
///
/// `position` is 1-based within its slot (team, pair, or the whole order).
pub fn export_outcome(path: &Path, group_name: &str, outcome: &Outcome) -> Result<(), CsvError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["group", "slot", "position", "member"])?;

    let mut last_slot: Option<String> = None;
    let mut position = 0usize;
    for (slot, member) in outcome.placements() {
        if last_slot.as_deref() == Some(slot.as_str()) {
            position += 1;
        } else {
            position = 1;
        }
        writer.write_record([
            group_name,
            slot.as_str(),
            position.to_string().as_str(),
            member.name.as_str(),
        ])?;
        last_slot = Some(slot);
    }
    writer.flush()?;

    info!(
        "Exported {} placements ({}) to {}",
        outcome.member_count(),
        outcome.activity().label(),
        path.display()
    );
    Ok(())
}

/// File name for an export: `<group>-<activity>-<timestamp>.csv`, with the
/// group name reduced to lowercase ASCII alphanumerics and dashes.
pub fn export_file_name(group_name: &str, outcome: &Outcome, at: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for c in group_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "group" } else { slug };

    let activity = match outcome {
        Outcome::Teams(_) => "teams",
        Outcome::Order(_) => "order",
        Outcome::Pairs(_) => "pairs",
        Outcome::Selection(_) => "picks",
    };
    format!("{}-{}-{}.csv", slug, activity, at.format("%Y%m%d_%H%M%S"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
