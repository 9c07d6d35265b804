/// Shared data types for the intensity index pipeline.
///
/// `WarningRecord` is validated input; `WarningEvent` is what the event
/// reconstructor derives from it. Both are plain values with no shared
/// mutable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Warning severity as issued by the flood warning service.
///
/// Level 1 is the most severe. Level 4 ("no longer in force") is a closure
/// marker: it never starts an event and always carries zero weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Severe,
    Warning,
    Alert,
    NoLongerInForce,
}

impl Severity {
    /// The three levels that form events, most severe first.
    pub const ACTIVE: [Severity; 3] = [Severity::Severe, Severity::Warning, Severity::Alert];

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Severity::Severe),
            2 => Some(Severity::Warning),
            3 => Some(Severity::Alert),
            4 => Some(Severity::NoLongerInForce),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Severity::Severe => 1,
            Severity::Warning => 2,
            Severity::Alert => 3,
            Severity::NoLongerInForce => 4,
        }
    }

    /// True for levels 1-3.
    pub fn is_active(&self) -> bool {
        !matches!(self, Severity::NoLongerInForce)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Severe => "severe flood warning",
            Severity::Warning => "flood warning",
            Severity::Alert => "flood alert",
            Severity::NoLongerInForce => "warning no longer in force",
        }
    }
}

/// Indicator category a warning area belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fluvial,
    Coastal,
}

impl Category {
    pub fn from_coastal(is_coastal: bool) -> Self {
        if is_coastal {
            Category::Coastal
        } else {
            Category::Fluvial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fluvial => "fluvial",
            Category::Coastal => "coastal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated warning issuance record.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningRecord {
    pub area_id: String,
    pub issued_at: DateTime<Utc>,
    pub severity: Severity,
    /// Continuation or re-issue of an ongoing situation.
    pub is_update: bool,
    /// Resolved from the area registry, not from the record stream.
    pub is_coastal: bool,
}

/// A reconstructed warning period with its estimated duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningEvent {
    pub area_id: String,
    pub severity: Severity,
    pub started_at: DateTime<Utc>,
    pub estimated_duration_hours: f64,
    pub is_coastal: bool,
}

impl WarningEvent {
    pub fn category(&self) -> Category {
        Category::from_coastal(self.is_coastal)
    }
}
