/// Scoring Aggregator
///
/// Reduces reconstructed events to per-year, per-category scores:
///
/// ```text
/// weighted_score(event) = estimated_duration_hours × severity_weight[level]
/// ```
///
/// Events are attributed to the calendar year (UTC) in which they started,
/// even when their estimated duration runs into the next year. The category
/// comes from the event's `is_coastal` flag, which was resolved from the
/// area registry upstream.

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::SeverityWeights;
use crate::model::{Category, Severity, WarningEvent};

/// Totals for one severity level within a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeverityBreakdown {
    pub count: usize,
    pub hours: f64,
    pub weighted_score: f64,
}

/// Per-level breakdown; level 4 never produces events so has no bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeverityCounts {
    pub severe: SeverityBreakdown,
    pub warning: SeverityBreakdown,
    pub alert: SeverityBreakdown,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> Option<&SeverityBreakdown> {
        match severity {
            Severity::Severe => Some(&self.severe),
            Severity::Warning => Some(&self.warning),
            Severity::Alert => Some(&self.alert),
            Severity::NoLongerInForce => None,
        }
    }

    fn get_mut(&mut self, severity: Severity) -> Option<&mut SeverityBreakdown> {
        match severity {
            Severity::Severe => Some(&mut self.severe),
            Severity::Warning => Some(&mut self.warning),
            Severity::Alert => Some(&mut self.alert),
            Severity::NoLongerInForce => None,
        }
    }
}

/// Accumulated score for one (year, category).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub year: i32,
    pub category: Category,
    pub raw_weighted_score: f64,
    pub total_hours: f64,
    pub event_count: usize,
    pub by_severity: SeverityCounts,
}

impl CategoryScore {
    pub fn empty(year: i32, category: Category) -> Self {
        CategoryScore {
            year,
            category,
            raw_weighted_score: 0.0,
            total_hours: 0.0,
            event_count: 0,
            by_severity: SeverityCounts::default(),
        }
    }

    fn add(&mut self, event: &WarningEvent, weights: &SeverityWeights) {
        let Some(bucket) = self.by_severity.get_mut(event.severity) else {
            return;
        };
        let score = weighted_score(event, weights);
        bucket.count += 1;
        bucket.hours += event.estimated_duration_hours;
        bucket.weighted_score += score;

        self.raw_weighted_score += score;
        self.total_hours += event.estimated_duration_hours;
        self.event_count += 1;
    }
}

/// Both category scores for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearScores {
    pub year: i32,
    pub fluvial: CategoryScore,
    pub coastal: CategoryScore,
}

impl YearScores {
    /// A quiet year: every score and count is zero.
    pub fn empty(year: i32) -> Self {
        YearScores {
            year,
            fluvial: CategoryScore::empty(year, Category::Fluvial),
            coastal: CategoryScore::empty(year, Category::Coastal),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Fluvial => &self.fluvial,
            Category::Coastal => &self.coastal,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut CategoryScore {
        match category {
            Category::Fluvial => &mut self.fluvial,
            Category::Coastal => &mut self.coastal,
        }
    }

    pub fn total_score(&self) -> f64 {
        self.fluvial.raw_weighted_score + self.coastal.raw_weighted_score
    }

    pub fn total_events(&self) -> usize {
        self.fluvial.event_count + self.coastal.event_count
    }

    /// Events of one severity level across both categories.
    pub fn severity_count(&self, severity: Severity) -> usize {
        [&self.fluvial, &self.coastal]
            .iter()
            .filter_map(|c| c.by_severity.get(severity))
            .map(|b| b.count)
            .sum()
    }
}

pub fn weighted_score(event: &WarningEvent, weights: &SeverityWeights) -> f64 {
    event.estimated_duration_hours * weights.weight(event.severity)
}

/// Aggregates events into one `YearScores` per year that has events.
pub fn aggregate_by_year(events: &[WarningEvent], weights: &SeverityWeights) -> BTreeMap<i32, YearScores> {
    let mut years: BTreeMap<i32, YearScores> = BTreeMap::new();

    for event in events {
        let year = event.started_at.year();
        years
            .entry(year)
            .or_insert_with(|| YearScores::empty(year))
            .category_mut(event.category())
            .add(event, weights);
    }

    years
}

/// Scores a single year; a year without events yields zeroed scores.
pub fn score_year(events: &[WarningEvent], weights: &SeverityWeights, year: i32) -> YearScores {
    let mut scores = YearScores::empty(year);
    for event in events.iter().filter(|e| e.started_at.year() == year) {
        scores.category_mut(event.category()).add(event, weights);
    }
    scores
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
