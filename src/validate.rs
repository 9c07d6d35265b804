/// Record validation: raw export rows → `WarningRecord`s.
///
/// A row is rejected when its area code, issuance time or severity level is
/// missing or unusable, or when its area is not in the registry (its
/// category would be unknown). Rejections are never silent: each one is
/// kept in the `ValidationReport` with the row index, the field and the
/// reason, and counted per field.
///
/// Exact duplicates (same area, time and severity) are flagged but kept.
/// The reconstructor treats simultaneous records as distinct events.
///
/// Area coverage is reported too: registered areas with no records, and
/// areas whose warnings were never closed by a "no longer in force" record.
/// Neither fails validation.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashSet};

use crate::areas::AreaRegistry;
use crate::error::FwiiError;
use crate::ingest::warnings::RawWarningRecord;
use crate::model::{Severity, WarningRecord};

/// Data-quality outcome of one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub total_records: usize,
    pub valid_records: usize,
    /// One `FwiiError::MalformedRecord` per rejected row, in input order
    pub rejected: Vec<FwiiError>,
    pub rejected_by_field: BTreeMap<&'static str, usize>,
    pub duplicate_records: usize,
    /// Registered areas with no valid record, sorted
    pub missing_areas: Vec<String>,
    /// Areas with warnings but no level-4 closure record, sorted
    pub areas_without_closure: Vec<String>,
}

impl ValidationReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// True when no row was rejected. Duplicates do not fail validation.
    pub fn passed(&self) -> bool {
        self.rejected.is_empty()
    }

    /// One line per finding category, for logs and CLI output.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} of {} records valid",
            self.valid_records, self.total_records
        )];
        for (field, count) in &self.rejected_by_field {
            lines.push(format!("{} rejected: bad '{}'", count, field));
        }
        if self.duplicate_records > 0 {
            lines.push(format!("{} duplicate records kept", self.duplicate_records));
        }
        if !self.missing_areas.is_empty() {
            lines.push(format!("{} registered areas have no records", self.missing_areas.len()));
        }
        if !self.areas_without_closure.is_empty() {
            lines.push(format!(
                "{} areas have no closure records",
                self.areas_without_closure.len()
            ));
        }
        lines
    }

    fn reject(&mut self, index: usize, field: &'static str, reason: String) {
        log::warn!("rejecting record #{}: {} {}", index, field, reason);
        *self.rejected_by_field.entry(field).or_insert(0) += 1;
        self.rejected.push(FwiiError::MalformedRecord {
            index,
            field,
            reason,
        });
    }
}

/// Validates raw rows and resolves each area's category.
pub fn validate_records(
    raw: &[RawWarningRecord],
    areas: &AreaRegistry,
) -> (Vec<WarningRecord>, ValidationReport) {
    let mut report = ValidationReport {
        total_records: raw.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();

    for (index, row) in raw.iter().enumerate() {
        let area_id = match row.area_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => {
                report.reject(index, "fwdCode", "is missing".to_string());
                continue;
            }
        };

        let issued_at = match row.time_raised.as_deref() {
            None => {
                report.reject(index, "timeRaised", "is missing".to_string());
                continue;
            }
            Some(text) => match parse_timestamp(text) {
                Some(ts) => ts,
                None => {
                    report.reject(index, "timeRaised", format!("is not a timestamp: {:?}", text));
                    continue;
                }
            },
        };

        let severity = match row.level() {
            Ok(Some(level)) => match Severity::from_level(level) {
                Some(severity) => severity,
                None => {
                    report.reject(index, "severityLevel", format!("is out of range 1-4: {}", level));
                    continue;
                }
            },
            Ok(None) => {
                report.reject(index, "severityLevel", "is missing".to_string());
                continue;
            }
            Err(reason) => {
                report.reject(index, "severityLevel", format!("is {}", reason));
                continue;
            }
        };

        let is_coastal = match areas.is_coastal(&area_id) {
            Some(is_coastal) => is_coastal,
            None => {
                report.reject(index, "fwdCode", format!("is an unknown warning area: {}", area_id));
                continue;
            }
        };

        if !seen.insert((area_id.clone(), issued_at, severity)) {
            report.duplicate_records += 1;
        }

        records.push(WarningRecord {
            area_id,
            issued_at,
            severity,
            is_update: row.is_update(),
            is_coastal,
        });
    }

    report.valid_records = records.len();
    if report.duplicate_records > 0 {
        log::warn!("{} duplicate warning records", report.duplicate_records);
    }
    check_coverage(&records, areas, &mut report);
    (records, report)
}

fn check_coverage(records: &[WarningRecord], areas: &AreaRegistry, report: &mut ValidationReport) {
    // area code → has a closure record
    let mut closed: BTreeMap<&str, bool> = BTreeMap::new();
    for record in records {
        let entry = closed.entry(record.area_id.as_str()).or_insert(false);
        *entry |= record.severity == Severity::NoLongerInForce;
    }

    report.missing_areas = areas
        .codes()
        .into_iter()
        .filter(|code| !closed.contains_key(code))
        .map(str::to_string)
        .collect();
    report.areas_without_closure = closed
        .iter()
        .filter(|(_, has_closure)| !**has_closure)
        .map(|(code, _)| code.to_string())
        .collect();

    if !report.missing_areas.is_empty() {
        log::info!(
            "{} of {} registered areas have no records",
            report.missing_areas.len(),
            areas.len()
        );
    }
    if !report.areas_without_closure.is_empty() {
        log::info!(
            "{} areas have no closure records: {}",
            report.areas_without_closure.len(),
            report.areas_without_closure.join(", ")
        );
    }
}

/// Accepts RFC 3339, or a naive ISO 8601 date-time interpreted as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}
