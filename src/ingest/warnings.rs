/// Historic flood warning record loader.
///
/// Parses the JSON export of historic warnings: an array of objects with
/// `fwdCode`, `timeRaised`, `severityLevel`, `severity` (free text) and an
/// optional `isUpdate` flag. See `fixtures.rs` for annotated examples.
///
/// Every field is optional at this layer. A row with a missing or odd field
/// still parses into a `RawWarningRecord` so that `validate` can count it as
/// a data-quality finding instead of the whole file failing to load.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{FwiiError, Result};

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

/// One row of the historic warnings export, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawWarningRecord {
    #[serde(rename = "fwdCode", default)]
    pub area_code: Option<String>,

    #[serde(rename = "timeRaised", default)]
    pub time_raised: Option<String>,

    /// Number or numeric string; anything else is left for validation to reject.
    #[serde(rename = "severityLevel", default)]
    pub severity_level: Option<Value>,

    /// e.g. "Flood Alert", "Flood Warning Update", "Warning no Longer in Force"
    #[serde(default)]
    pub severity: Option<String>,

    #[serde(rename = "isUpdate", default)]
    pub is_update: Option<bool>,
}

impl RawWarningRecord {
    /// Numeric severity level, falling back to the severity text when the
    /// level column is absent.
    ///
    /// Returns `Err` with the offending value when a level is present but
    /// is not an integer.
    pub fn level(&self) -> std::result::Result<Option<i64>, String> {
        match &self.severity_level {
            None | Some(Value::Null) => Ok(self.severity.as_deref().and_then(level_from_text)),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| format!("not an integer: {}", n)),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("not an integer: {:?}", s)),
            Some(other) => Err(format!("not an integer: {}", other)),
        }
    }

    /// Explicit flag if present, otherwise "update" appearing in the
    /// severity text (case-insensitive).
    pub fn is_update(&self) -> bool {
        self.is_update.unwrap_or_else(|| {
            self.severity
                .as_deref()
                .map(|s| s.to_lowercase().contains("update"))
                .unwrap_or(false)
        })
    }
}

/// Maps the export's severity text to a level. "no longer" is checked
/// first since closure text also contains "warning".
fn level_from_text(text: &str) -> Option<i64> {
    let text = text.to_lowercase();
    if text.contains("no longer") {
        Some(4)
    } else if text.contains("severe") {
        Some(1)
    } else if text.contains("warning") {
        Some(2)
    } else if text.contains("alert") {
        Some(3)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a JSON array of warning rows.
pub fn parse_warnings_json(json: &str) -> Result<Vec<RawWarningRecord>> {
    let records: Vec<RawWarningRecord> = serde_json::from_str(json)?;
    Ok(records)
}

/// Reads and parses a warnings export file.
pub fn load_warnings<P: AsRef<Path>>(path: P) -> Result<Vec<RawWarningRecord>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| FwiiError::io(path, e))?;
    let records = parse_warnings_json(&json)?;
    log::info!("read {} warning rows from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
