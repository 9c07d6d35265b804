/// Baseline scores: the fixed reference every index is normalized against.
///
/// The baseline is a versioned artifact (baseline.toml) kept apart from
/// routine output. It moves from "not established" to "established" only
/// through `BaselineStore::establish`, an explicit and logged action.
/// A routine annual calculation reads the baseline and never writes it.
///
/// Replacing a baseline keeps the prior artifact next to it as
/// `<name>.previous.toml`, so `revert` can undo the replacement. Reverting
/// a first establishment moves the artifact aside to `<name>.retired.toml`
/// and the baseline is "not established" again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::scoring::YearScores;
use crate::error::{FwiiError, Result};
use crate::model::Category;

/// Category scores of the baseline year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineScores {
    pub version: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub fluvial_score: f64,
    pub coastal_score: f64,
    #[serde(default)]
    pub fluvial_hours: f64,
    #[serde(default)]
    pub coastal_hours: f64,
    #[serde(default)]
    pub fluvial_events: usize,
    #[serde(default)]
    pub coastal_events: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BaselineScores {
    pub fn score(&self, category: Category) -> f64 {
        match category {
            Category::Fluvial => self.fluvial_score,
            Category::Coastal => self.coastal_score,
        }
    }

    pub fn total_score(&self) -> f64 {
        self.fluvial_score + self.coastal_score
    }
}

/// Builds a baseline from one year's scores.
pub fn establish_baseline(scores: &YearScores, version: u32, note: Option<String>) -> BaselineScores {
    let baseline = BaselineScores {
        version,
        year: scores.year,
        created_at: Utc::now(),
        fluvial_score: scores.fluvial.raw_weighted_score,
        coastal_score: scores.coastal.raw_weighted_score,
        fluvial_hours: scores.fluvial.total_hours,
        coastal_hours: scores.coastal.total_hours,
        fluvial_events: scores.fluvial.event_count,
        coastal_events: scores.coastal.event_count,
        note,
    };

    log::info!(
        "established baseline v{} for {}: fluvial {:.2}, coastal {:.2}",
        baseline.version,
        baseline.year,
        baseline.fluvial_score,
        baseline.coastal_score
    );
    baseline
}

/// What `BaselineStore::revert` undid.
#[derive(Debug, Clone, PartialEq)]
pub enum RevertOutcome {
    /// A replacement was undone; this baseline is current again.
    Restored(BaselineScores),
    /// The first establishment was undone; no baseline is current.
    Retired(BaselineScores),
}

/// File-backed home of the baseline artifact.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        BaselineStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a replaced baseline is kept.
    pub fn previous_path(&self) -> PathBuf {
        self.sibling("previous")
    }

    /// Where a reverted first establishment is kept.
    pub fn retired_path(&self) -> PathBuf {
        self.sibling("retired")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "baseline".to_string());
        self.path.with_file_name(format!("{}.{}.toml", stem, suffix))
    }

    /// `Ok(None)` means the baseline has not been established.
    pub fn load(&self) -> Result<Option<BaselineScores>> {
        read_baseline(&self.path)
    }

    /// Loads the baseline and checks it belongs to the configured year.
    pub fn load_for_year(&self, baseline_year: i32) -> Result<Option<BaselineScores>> {
        match self.load()? {
            Some(b) if b.year != baseline_year => Err(FwiiError::BaselineYearMismatch {
                expected: baseline_year,
                found: b.year,
            }),
            other => Ok(other),
        }
    }

    /// Writes a baseline. An existing one is only replaced when `replace`
    /// is set and the new version is greater; the old file is kept for
    /// `revert`.
    pub fn save(&self, baseline: &BaselineScores, replace: bool) -> Result<()> {
        if let Some(current) = self.load()? {
            if !replace {
                return Err(FwiiError::BaselineExists {
                    path: self.path.clone(),
                });
            }
            if baseline.version <= current.version {
                return Err(FwiiError::BaselineVersionNotIncreasing {
                    current: current.version,
                    new: baseline.version,
                });
            }
            let previous = self.previous_path();
            fs::copy(&self.path, &previous).map_err(|e| FwiiError::io(&previous, e))?;
            log::info!(
                "replacing baseline v{} (kept at {})",
                current.version,
                previous.display()
            );
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FwiiError::io(parent, e))?;
        }
        let contents = toml::to_string_pretty(baseline)?;
        fs::write(&self.path, contents).map_err(|e| FwiiError::io(&self.path, e))?;

        log::info!(
            "saved baseline v{} for {} to {}",
            baseline.version,
            baseline.year,
            self.path.display()
        );
        Ok(())
    }

    /// Computes and persists the baseline from the configured baseline
    /// year's scores. The version is one past the current (or retired)
    /// baseline's.
    pub fn establish(
        &self,
        scores: &YearScores,
        baseline_year: i32,
        replace: bool,
    ) -> Result<BaselineScores> {
        if scores.year != baseline_year {
            return Err(FwiiError::BaselineYearMismatch {
                expected: baseline_year,
                found: scores.year,
            });
        }

        let latest = match self.load()? {
            Some(current) => Some(current),
            None => read_baseline(&self.retired_path())?,
        };
        let version = latest.map(|b| b.version + 1).unwrap_or(1);
        let baseline = establish_baseline(scores, version, None);
        self.save(&baseline, replace)?;
        Ok(baseline)
    }

    /// Undoes the last establishment. A replacement is undone by restoring
    /// the baseline it superseded; a first establishment is undone by
    /// retiring the artifact, after which `load` returns `None`.
    pub fn revert(&self) -> Result<RevertOutcome> {
        let previous_path = self.previous_path();
        if let Some(previous) = read_baseline(&previous_path)? {
            fs::rename(&previous_path, &self.path).map_err(|e| FwiiError::io(&self.path, e))?;
            log::info!(
                "reverted to baseline v{} for {}",
                previous.version,
                previous.year
            );
            return Ok(RevertOutcome::Restored(previous));
        }

        let current = self.load()?.ok_or_else(|| FwiiError::NoPreviousBaseline {
            path: self.path.clone(),
        })?;
        let retired = self.retired_path();
        fs::rename(&self.path, &retired).map_err(|e| FwiiError::io(&retired, e))?;
        log::info!(
            "retired baseline v{} for {} to {}; baseline is no longer established",
            current.version,
            current.year,
            retired.display()
        );
        Ok(RevertOutcome::Retired(current))
    }
}

fn read_baseline(path: &Path) -> Result<Option<BaselineScores>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|e| FwiiError::io(path, e))?;
    let baseline = toml::from_str(&contents).map_err(|source| FwiiError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(baseline))
}
