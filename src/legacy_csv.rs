//! Reader for the legacy guest-account CSV export.
//!
//! The export carries `Created at` as `HH:MM Mon DD YYYY` in local time, not
//! ISO-8601, so rows get their own age check instead of the API filter. The
//! cutoff rule is the same: a row exactly `days` old is eligible.
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CREATED_AT_FORMAT: &str = "%H:%M %b %d %Y";

/// One row of the export. Other columns are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LegacyAccount {
    #[serde(rename = "Account type")]
    pub account_type: String,
    #[serde(rename = "Created at")]
    pub created_at: String,
    #[serde(rename = "Email (Username)")]
    pub email: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

impl LegacyAccount {
    pub fn created_at(&self) -> Result<NaiveDateTime> {
        parse_created_at(&self.created_at)
    }
}

pub fn parse_created_at(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), CREATED_AT_FORMAT)
        .with_context(|| format!("parse created-at {raw:?} (expected HH:MM Mon DD YYYY)"))
}

/// True when `created_at` is at or before `now - days`.
pub fn is_older_than(created_at: NaiveDateTime, days: u32, now: NaiveDateTime) -> bool {
    let cutoff = now
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(NaiveDateTime::MIN);
    created_at <= cutoff
}

/// Columns every export must carry.
const REQUIRED_COLUMNS: [&str; 3] = ["Account type", "Created at", "Email (Username)"];

/// Parse every row of an export held in memory. A leading BOM is skipped.
///
/// A missing required column fails the whole export; a single malformed row
/// is logged and skipped.
pub fn parse_rows(text: &str) -> Result<Vec<LegacyAccount>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().context("read CSV header")?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(anyhow!("CSV header has no {missing:?} column"));
    }

    let mut rows = Vec::new();
    for (index, row) in reader.deserialize::<LegacyAccount>().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(err) => {
                tracing::warn!(record = index + 1, error = %err, "skipping malformed CSV record");
            }
        }
    }
    Ok(rows)
}

/// Rows of `account_type` (exact match) created at least `days` days ago.
///
/// Rows whose date cannot be parsed are logged and skipped.
pub fn select_candidates(
    rows: Vec<LegacyAccount>,
    account_type: &str,
    days: u32,
    now: NaiveDateTime,
) -> Vec<LegacyAccount> {
    rows.into_iter()
        .filter(|row| row.account_type == account_type)
        .filter(|row| match row.created_at() {
            Ok(created_at) => is_older_than(created_at, days, now),
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(email = %row.email, error = %reason, "skipping CSV row");
                false
            }
        })
        .collect()
}

/// Read `path` and return the rows eligible for re-creation and deletion.
pub fn load_candidates(
    path: &Path,
    account_type: &str,
    days: u32,
    now: NaiveDateTime,
) -> Result<Vec<LegacyAccount>> {
    let bytes = fs::read(path).with_context(|| format!("read CSV {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("CSV {} is not valid UTF-8", path.display()))?;
    let rows = parse_rows(&text).with_context(|| format!("parse CSV {}", path.display()))?;
    Ok(select_candidates(rows, account_type, days, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EXPORT: &str = "\u{feff}Email (Username),Name,Account type,Created at,Description\n\
        old@x.com,Old,Guest,09:30 Jan 05 2024,Conference visitor\n\
        new@x.com,New,Guest,16:45 May 30 2024,Contractor\n\
        staff@x.com,Staff,802.1X,09:30 Jan 05 2024,Employee\n\
        lower@x.com,Lower,guest,09:30 Jan 05 2024,Lowercase type\n\
        broken@x.com,Broken,Guest,yesterday,Bad date\n";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn legacy_timestamp_format_parses() {
        let parsed = parse_created_at("14:05 Mar 07 2023").expect("parse");
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2023, 3, 7)
                .and_then(|d| d.and_hms_opt(14, 5, 0))
                .expect("valid")
        );
        assert!(parse_created_at("2023-03-07T14:05:00Z").is_err());
    }

    #[test]
    fn bom_is_stripped_and_columns_are_matched_by_name() {
        let rows = parse_rows(EXPORT).expect("parse rows");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].email, "old@x.com");
        assert_eq!(rows[0].account_type, "Guest");
        assert_eq!(rows[0].description, "Conference visitor");
    }

    #[test]
    fn only_exact_guest_rows_older_than_threshold_are_selected() {
        let rows = parse_rows(EXPORT).expect("parse rows");
        let selected = select_candidates(rows, "Guest", 30, now());
        let emails: Vec<_> = selected.iter().map(|row| row.email.as_str()).collect();
        assert_eq!(emails, vec!["old@x.com"]);
    }

    #[test]
    fn age_check_partitions_at_cutoff_inclusively() {
        let cutoff = now() - TimeDelta::days(30);
        assert!(is_older_than(cutoff, 30, now()));
        assert!(!is_older_than(cutoff + TimeDelta::seconds(1), 30, now()));
        assert!(is_older_than(now() - TimeDelta::days(30) - TimeDelta::hours(20), 30, now()));
    }

    #[test]
    fn zero_threshold_keeps_everything_up_to_now() {
        assert!(is_older_than(now() - TimeDelta::hours(3), 0, now()));
        assert!(is_older_than(now(), 0, now()));
        assert!(!is_older_than(now() + TimeDelta::minutes(1), 0, now()));

        let rows = parse_rows(
            "Email (Username),Account type,Created at\ntoday@x.com,Guest,09:00 Jun 01 2024\n",
        )
        .expect("parse rows");
        assert_eq!(select_candidates(rows, "Guest", 0, now()).len(), 1);
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let rows = parse_rows(
            "Email (Username),Account type,Created at,Description\n\
             good@x.com,Guest,09:30 Jan 05 2024,Kept\n\
             short@x.com,Guest\n\
             tail@x.com,Guest,09:30 Jan 06 2024,Kept\n",
        )
        .expect("parse rows");
        let emails: Vec<_> = rows.iter().map(|row| row.email.as_str()).collect();
        assert_eq!(emails, vec!["good@x.com", "tail@x.com"]);
    }

    #[test]
    fn missing_required_column_fails_the_export() {
        let err = parse_rows("Email (Username),Account type\na@x.com,Guest\n").unwrap_err();
        assert!(err.to_string().contains("Created at"));
    }

    #[test]
    fn load_candidates_reads_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("export.csv");
        std::fs::write(&path, EXPORT).expect("write export");
        let selected = load_candidates(&path, "Guest", 0, now()).expect("load");
        assert_eq!(selected.len(), 2);
    }
}
