/// Indicator settings loader - parses settings.toml
///
/// Keeps the scoring heuristic's tunables (severity weights, default
/// durations, the maximum gap, category weights and the baseline year) out
/// of the code so they can be versioned and reviewed alongside the data.
/// Settings are validated once at load; calculations assume they are sound.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FwiiError, Result};
use crate::model::Severity;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";
pub const DEFAULT_AREAS_PATH: &str = "config/warning_areas.toml";

/// Tolerance for the category weights summing to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Score multiplier per severity level. Level 4 is fixed at zero.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeverityWeights {
    pub severe: f64,
    pub warning: f64,
    pub alert: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            severe: 3.0,
            warning: 2.0,
            alert: 1.0,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Severe => self.severe,
            Severity::Warning => self.warning,
            Severity::Alert => self.alert,
            Severity::NoLongerInForce => 0.0,
        }
    }
}

/// Assumed duration (hours) of a warning that nothing follows closely.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationDefaults {
    pub severe: f64,
    pub warning: f64,
    pub alert: f64,
}

impl Default for DurationDefaults {
    fn default() -> Self {
        Self {
            severe: 12.0,
            warning: 24.0,
            alert: 48.0,
        }
    }
}

/// Event reconstruction configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationConfig {
    pub defaults: DurationDefaults,

    /// Gap (hours) beyond which the next record is treated as unrelated
    pub max_gap_hours: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            defaults: DurationDefaults::default(),
            max_gap_hours: 72.0,
        }
    }
}

impl DurationConfig {
    pub fn default_hours(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Severe => self.defaults.severe,
            Severity::Warning => self.defaults.warning,
            Severity::Alert => self.defaults.alert,
            Severity::NoLongerInForce => 0.0,
        }
    }
}

/// Weights of the two sub-indices in the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryWeights {
    pub fluvial: f64,
    pub coastal: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            fluvial: 0.55,
            coastal: 0.45,
        }
    }
}

/// Fully validated settings for one calculation run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub version: u32,
    pub baseline_year: i32,
    pub baseline_path: PathBuf,
    pub severity_weights: SeverityWeights,
    pub duration: DurationConfig,
    pub category_weights: CategoryWeights,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            baseline_year: 2020,
            baseline_path: PathBuf::from("config/baseline.toml"),
            severity_weights: SeverityWeights::default(),
            duration: DurationConfig::default(),
            category_weights: CategoryWeights::default(),
        }
    }
}

// ============================================================================
// TOML Configuration Structures
// ============================================================================

/// Root settings structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    indicator: IndicatorSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IndicatorSection {
    baseline_year: i32,
    baseline_path: PathBuf,
    max_gap_hours: f64,
    severity_weights: SeverityWeights,
    duration_defaults: DurationDefaults,
    category_weights: CategoryWeights,
}

impl Default for IndicatorSection {
    fn default() -> Self {
        let defaults = IndicatorConfig::default();
        Self {
            baseline_year: defaults.baseline_year,
            baseline_path: defaults.baseline_path,
            max_gap_hours: defaults.duration.max_gap_hours,
            severity_weights: defaults.severity_weights,
            duration_defaults: defaults.duration.defaults,
            category_weights: defaults.category_weights,
        }
    }
}

fn default_version() -> u32 {
    1
}

impl From<SettingsFile> for IndicatorConfig {
    fn from(file: SettingsFile) -> Self {
        let section = file.indicator;
        IndicatorConfig {
            version: file.version,
            baseline_year: section.baseline_year,
            baseline_path: section.baseline_path,
            severity_weights: section.severity_weights,
            duration: DurationConfig {
                defaults: section.duration_defaults,
                max_gap_hours: section.max_gap_hours,
            },
            category_weights: section.category_weights,
        }
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

/// Parses and validates settings from a TOML string.
pub fn parse_settings(contents: &str, origin: &Path) -> Result<IndicatorConfig> {
    let file: SettingsFile = toml::from_str(contents).map_err(|source| FwiiError::TomlParse {
        path: origin.to_path_buf(),
        source,
    })?;
    let config = IndicatorConfig::from(file);
    config.validate()?;
    Ok(config)
}

/// Loads settings.toml and rejects it before any calculation if invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<IndicatorConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| FwiiError::io(path, e))?;
    let config = parse_settings(&contents, path)?;

    log::info!(
        "loaded settings v{} from {} (baseline year {}, max gap {}h)",
        config.version,
        path.display(),
        config.baseline_year,
        config.duration.max_gap_hours
    );
    Ok(config)
}

/// Resolves a file path from an environment variable (after reading `.env`),
/// falling back to the given default.
pub fn path_from_env(var: &str, default: &str) -> PathBuf {
    dotenv::dotenv().ok();
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        let w = &self.severity_weights;
        for (name, value) in [("severe", w.severe), ("warning", w.warning), ("alert", w.alert)] {
            check_non_negative(&format!("severity_weights.{}", name), value)?;
        }

        let d = &self.duration.defaults;
        for (name, value) in [("severe", d.severe), ("warning", d.warning), ("alert", d.alert)] {
            check_non_negative(&format!("duration_defaults.{}", name), value)?;
        }
        check_non_negative("max_gap_hours", self.duration.max_gap_hours)?;

        let c = &self.category_weights;
        check_non_negative("category_weights.fluvial", c.fluvial)?;
        check_non_negative("category_weights.coastal", c.coastal)?;
        let sum = c.fluvial + c.coastal;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(FwiiError::ConfigurationInvalid(format!(
                "category weights must sum to 1.0, got {} (fluvial {} + coastal {})",
                sum, c.fluvial, c.coastal
            )));
        }

        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FwiiError::ConfigurationInvalid(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}
