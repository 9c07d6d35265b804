/// Baseline normalization and the composite Flood Warning Intensity Index.
///
/// ```text
/// category_index  = category_score / baseline_category_score × 100
/// composite_index = fluvial_index × w_fluvial + coastal_index × w_coastal
/// ```
///
/// The baseline year scored against its own baseline gives 100 for both
/// categories and for the composite. A zero baseline score makes the
/// category index undefined; that is reported as `DivisionUndefined`,
/// never replaced by 0 or infinity. A missing baseline blocks every
/// category at once and is reported as `BaselineNotEstablished`.

use serde::Serialize;

use crate::analysis::reconstruct::reconstruct_events;
use crate::analysis::scoring::{score_year, YearScores};
use crate::baseline::BaselineScores;
use crate::config::{CategoryWeights, IndicatorConfig};
use crate::error::{FwiiError, Result};
use crate::model::{Category, Severity, WarningEvent, WarningRecord};

/// Normalized indicators for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedIndicators {
    pub year: i32,
    pub baseline_year: i32,
    pub baseline_version: u32,

    // Raw scores (weighted durations)
    pub fluvial_score_raw: f64,
    pub coastal_score_raw: f64,
    pub total_score_raw: f64,

    // Baseline year = 100
    pub fluvial_index: f64,
    pub coastal_index: f64,
    pub composite_index: f64,

    pub fluvial_hours: f64,
    pub coastal_hours: f64,
    pub fluvial_events: usize,
    pub coastal_events: usize,
    pub total_events: usize,

    pub severe_warnings: usize,
    pub flood_warnings: usize,
    pub flood_alerts: usize,
}

/// `score / baseline_score × 100`, undefined for a non-positive baseline.
pub fn category_index(score: f64, baseline_score: f64, category: Category) -> Result<f64> {
    if !(baseline_score.is_finite() && baseline_score > 0.0) {
        return Err(FwiiError::DivisionUndefined {
            category,
            reason: format!("baseline {} score is {}", category, baseline_score),
        });
    }
    Ok(score / baseline_score * 100.0)
}

pub fn composite_index(fluvial_index: f64, coastal_index: f64, weights: &CategoryWeights) -> f64 {
    fluvial_index * weights.fluvial + coastal_index * weights.coastal
}

/// Normalizes one year's scores against the baseline.
pub fn normalize(
    scores: &YearScores,
    baseline: &BaselineScores,
    weights: &CategoryWeights,
) -> Result<NormalizedIndicators> {
    let fluvial_index = category_index(
        scores.fluvial.raw_weighted_score,
        baseline.score(Category::Fluvial),
        Category::Fluvial,
    )?;
    let coastal_index = category_index(
        scores.coastal.raw_weighted_score,
        baseline.score(Category::Coastal),
        Category::Coastal,
    )?;

    Ok(NormalizedIndicators {
        year: scores.year,
        baseline_year: baseline.year,
        baseline_version: baseline.version,
        fluvial_score_raw: scores.fluvial.raw_weighted_score,
        coastal_score_raw: scores.coastal.raw_weighted_score,
        total_score_raw: scores.total_score(),
        fluvial_index,
        coastal_index,
        composite_index: composite_index(fluvial_index, coastal_index, weights),
        fluvial_hours: scores.fluvial.total_hours,
        coastal_hours: scores.coastal.total_hours,
        fluvial_events: scores.fluvial.event_count,
        coastal_events: scores.coastal.event_count,
        total_events: scores.total_events(),
        severe_warnings: scores.severity_count(Severity::Severe),
        flood_warnings: scores.severity_count(Severity::Warning),
        flood_alerts: scores.severity_count(Severity::Alert),
    })
}

fn require_baseline(baseline: Option<&BaselineScores>) -> Result<&BaselineScores> {
    baseline.ok_or(FwiiError::BaselineNotEstablished)
}

/// Scores and normalizes one year from already reconstructed events.
pub fn indicators_from_events(
    events: &[WarningEvent],
    year: i32,
    config: &IndicatorConfig,
    baseline: Option<&BaselineScores>,
) -> Result<NormalizedIndicators> {
    let baseline = require_baseline(baseline)?;
    let scores = score_year(events, &config.severity_weights, year);
    normalize(&scores, baseline, &config.category_weights)
}

/// Full pipeline for one year: records → events → scores → indices.
///
/// `records` may span several years; reconstruction sees all of them so a
/// warning late in the previous year still gets its look-ahead.
pub fn calculate_indicators(
    records: Vec<WarningRecord>,
    year: i32,
    config: &IndicatorConfig,
    baseline: Option<&BaselineScores>,
) -> Result<NormalizedIndicators> {
    require_baseline(baseline)?;
    let events = reconstruct_events(records, &config.duration);
    indicators_from_events(&events, year, config, baseline)
}
