/// Multi-year trend series of the composite index.

use serde::Serialize;

use crate::indicator::NormalizedIndicators;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub indicators: NormalizedIndicators,
    /// Composite change in index points versus the previous year in the series
    pub change_points: Option<f64>,
    /// `None` for the first year, or when the previous composite is zero
    pub change_percent: Option<f64>,
}

/// Orders years ascending and attaches year-over-year composite change.
pub fn build_trend(mut years: Vec<NormalizedIndicators>) -> Vec<TrendPoint> {
    years.sort_by_key(|i| i.year);

    let mut points: Vec<TrendPoint> = Vec::with_capacity(years.len());
    for indicators in years {
        let previous = points.last().map(|p| p.indicators.composite_index);
        let change_points = previous.map(|prev| indicators.composite_index - prev);
        let change_percent = previous
            .filter(|prev| *prev != 0.0)
            .map(|prev| (indicators.composite_index - prev) / prev * 100.0);

        points.push(TrendPoint {
            indicators,
            change_points,
            change_percent,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(year: i32, composite: f64) -> NormalizedIndicators {
        NormalizedIndicators {
            year,
            baseline_year: 2020,
            baseline_version: 1,
            fluvial_score_raw: 0.0,
            coastal_score_raw: 0.0,
            total_score_raw: 0.0,
            fluvial_index: composite,
            coastal_index: composite,
            composite_index: composite,
            fluvial_hours: 0.0,
            coastal_hours: 0.0,
            fluvial_events: 0,
            coastal_events: 0,
            total_events: 0,
            severe_warnings: 0,
            flood_warnings: 0,
            flood_alerts: 0,
        }
    }

    #[test]
    fn test_trend_sorted_by_year_with_changes() {
        let trend = build_trend(vec![indicators(2022, 150.0), indicators(2020, 100.0), indicators(2021, 75.0)]);
        let years: Vec<_> = trend.iter().map(|p| p.indicators.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);

        assert_eq!(trend[0].change_points, None);
        assert_eq!(trend[1].change_points, Some(-25.0));
        assert_eq!(trend[1].change_percent, Some(-25.0));
        assert_eq!(trend[2].change_points, Some(75.0));
        assert_eq!(trend[2].change_percent, Some(100.0));
    }

    #[test]
    fn test_percent_change_from_zero_is_none() {
        let trend = build_trend(vec![indicators(2020, 0.0), indicators(2021, 40.0)]);
        assert_eq!(trend[1].change_points, Some(40.0));
        assert_eq!(trend[1].change_percent, None);
    }
}
