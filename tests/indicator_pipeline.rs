/// Integration tests for the intensity index pipeline
///
/// These tests drive the public API end to end:
/// 1. JSON export → validation → events → scores → indices
/// 2. Baseline lifecycle: establish, normalize against it, revert
/// 3. Ordering invariance across areas
///
/// No external services are needed; baseline artifacts are written under
/// the system temp directory.
///
/// Run with: cargo test --test indicator_pipeline

use fwii_service::analysis::reconstruct::{reconstruct_events, reconstruct_events_parallel};
use fwii_service::analysis::scoring::{aggregate_by_year, score_year};
use fwii_service::areas::{AreaRegistry, WarningArea};
use fwii_service::baseline::{establish_baseline, BaselineStore, RevertOutcome};
use fwii_service::config::IndicatorConfig;
use fwii_service::indicator::{calculate_indicators, indicators_from_events};
use fwii_service::ingest::warnings::parse_warnings_json;
use fwii_service::model::{Severity, WarningRecord};
use fwii_service::validate::validate_records;
use fwii_service::FwiiError;

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::PathBuf;

const TOLERANCE: f64 = 1e-6;

// A two-year export: 2020 is the baseline season, 2021 a quieter year.
const TEST_EXPORT: &str = r#"[
  { "fwdCode": "112WAFTBRI", "timeRaised": "2020-02-15T08:30:00Z", "severityLevel": 2, "severity": "Flood Warning" },
  { "fwdCode": "112WAFTBRI", "timeRaised": "2020-02-15T14:30:00Z", "severityLevel": 2, "severity": "Flood Warning Update" },
  { "fwdCode": "112WAFTBRI", "timeRaised": "2020-02-16T20:30:00Z", "severityLevel": 4, "severity": "Warning no Longer in Force" },
  { "fwdCode": "112WAFTKEY", "timeRaised": "2020-02-16T09:00:00Z", "severityLevel": 3, "severity": "Flood Alert" },
  { "fwdCode": "112WATSEV",  "timeRaised": "2020-03-10T06:00:00Z", "severityLevel": 1, "severity": "Severe Flood Warning" },
  { "fwdCode": "112WATSEV",  "timeRaised": "2020-03-14T10:00:00Z", "severityLevel": 3, "severity": "Flood Alert" },
  { "fwdCode": "112WAFTKEY", "timeRaised": "2021-11-20T12:00:00Z", "severityLevel": 3, "severity": "Flood Alert" },
  { "fwdCode": "112WATSEV",  "timeRaised": "2021-12-01T00:00:00Z", "severityLevel": 3, "severity": "Flood Alert" },
  { "fwdCode": "NOT-AN-AREA", "timeRaised": "2021-12-02T00:00:00Z", "severityLevel": 2, "severity": "Flood Warning" }
]"#;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn registry() -> AreaRegistry {
    let area = |code: &str, is_tidal| WarningArea {
        code: code.to_string(),
        name: code.to_string(),
        county: None,
        is_tidal,
    };
    AreaRegistry::from_areas(vec![
        area("112WAFTBRI", false),
        area("112WAFTKEY", false),
        area("112WATSEV", true),
    ])
}

fn scratch_store(name: &str) -> BaselineStore {
    let dir: PathBuf = std::env::temp_dir().join(format!("fwii_it_{}_{}", name, std::process::id()));
    std::fs::remove_dir_all(&dir).ok();
    BaselineStore::new(dir.join("baseline.toml"))
}

fn record(area: &str, issued_at: DateTime<Utc>, severity: Severity, is_coastal: bool) -> WarningRecord {
    WarningRecord {
        area_id: area.to_string(),
        issued_at,
        severity,
        is_update: false,
        is_coastal,
    }
}

fn export_records() -> Vec<WarningRecord> {
    let raw = parse_warnings_json(TEST_EXPORT).expect("export should parse");
    let (records, report) = validate_records(&raw, &registry());
    assert_eq!(report.rejected_count(), 1, "only the unknown area is rejected");
    records
}

// ---------------------------------------------------------------------------
// 1. End-to-end scoring
// ---------------------------------------------------------------------------

#[test]
fn test_export_scores_match_hand_computed_values() {
    let config = IndicatorConfig::default();
    let events = reconstruct_events(export_records(), &config.duration);
    let scores = score_year(&events, &config.severity_weights, 2020);

    // Fluvial: warning 6h ×2 + update 30h ×2 + alert 48h ×1 = 120
    assert!((scores.fluvial.raw_weighted_score - 120.0).abs() < TOLERANCE);
    assert!((scores.fluvial.total_hours - 84.0).abs() < TOLERANCE);
    assert_eq!(scores.fluvial.event_count, 3);

    // Coastal: severe 12h ×3 (next record 100h later) + alert 48h ×1 = 84
    assert!((scores.coastal.raw_weighted_score - 84.0).abs() < TOLERANCE);
    assert_eq!(scores.coastal.by_severity.severe.count, 1);
}

#[test]
fn test_single_alert_against_published_baseline() {
    let config = IndicatorConfig::default();
    let issued = Utc.with_ymd_and_hms(2020, 1, 2, 9, 0, 0).unwrap();
    let events = reconstruct_events(vec![record("A", issued, Severity::Alert, false)], &config.duration);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].estimated_duration_hours, 48.0);
    let scores = score_year(&events, &config.severity_weights, 2020);
    assert_eq!(scores.fluvial.raw_weighted_score, 48.0);

    // A year whose fluvial score equals the baseline's normalizes to 100
    let mut baseline_year = scores.clone();
    baseline_year.fluvial.raw_weighted_score = 1051.65;
    baseline_year.coastal.raw_weighted_score = 200.0;
    let baseline = establish_baseline(&baseline_year, 1, None);

    let mut target = scores;
    target.year = 2023;
    target.fluvial.raw_weighted_score = 1051.65;
    let result = fwii_service::indicator::normalize(&target, &baseline, &config.category_weights)
        .expect("baseline is non-zero");
    assert!((result.fluvial_index - 100.0).abs() < TOLERANCE);
}

#[test]
fn test_closure_markers_never_score() {
    let config = IndicatorConfig::default();
    let t = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
    let events = reconstruct_events(
        vec![
            record("A", t, Severity::NoLongerInForce, false),
            record("B", t, Severity::NoLongerInForce, true),
        ],
        &config.duration,
    );
    assert!(events.is_empty());
    assert_eq!(score_year(&events, &config.severity_weights, 2020).total_score(), 0.0);
}

// ---------------------------------------------------------------------------
// 2. Baseline lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_baseline_year_normalizes_to_one_hundred() {
    let config = IndicatorConfig::default();
    let store = scratch_store("identity");
    let events = reconstruct_events(export_records(), &config.duration);

    let scores = score_year(&events, &config.severity_weights, config.baseline_year);
    store.establish(&scores, config.baseline_year, false).expect("establish");
    let baseline = store.load_for_year(config.baseline_year).expect("load");

    let result = indicators_from_events(&events, 2020, &config, baseline.as_ref()).expect("defined");
    assert!((result.fluvial_index - 100.0).abs() < TOLERANCE);
    assert!((result.coastal_index - 100.0).abs() < TOLERANCE);
    assert!((result.composite_index - 100.0).abs() < TOLERANCE);
}

#[test]
fn test_later_year_normalized_against_stored_baseline() {
    let config = IndicatorConfig::default();
    let store = scratch_store("later_year");
    let records = export_records();
    let events = reconstruct_events(records.clone(), &config.duration);
    store
        .establish(&score_year(&events, &config.severity_weights, 2020), 2020, false)
        .expect("establish");
    let baseline = store.load().expect("load");

    let result = calculate_indicators(records, 2021, &config, baseline.as_ref()).expect("defined");

    // 2021: one fluvial alert (48) and one coastal alert (48)
    assert!((result.fluvial_index - 48.0 / 120.0 * 100.0).abs() < TOLERANCE);
    assert!((result.coastal_index - 48.0 / 84.0 * 100.0).abs() < TOLERANCE);
    let expected = result.fluvial_index * 0.55 + result.coastal_index * 0.45;
    assert_eq!(result.composite_index, expected);
    assert_eq!(result.total_events, 2);
}

#[test]
fn test_routine_run_never_creates_a_baseline() {
    let config = IndicatorConfig::default();
    let store = scratch_store("routine");

    let err = calculate_indicators(export_records(), 2020, &config, store.load().expect("load").as_ref())
        .unwrap_err();
    assert!(matches!(err, FwiiError::BaselineNotEstablished));
    assert!(store.load().expect("load").is_none(), "no baseline may appear as a side effect");
}

#[test]
fn test_first_establishment_can_be_reverted() {
    let config = IndicatorConfig::default();
    let store = scratch_store("revert_first");
    let events = reconstruct_events(export_records(), &config.duration);
    store
        .establish(&score_year(&events, &config.severity_weights, 2020), 2020, false)
        .expect("establish");

    assert!(matches!(store.revert().expect("revert"), RevertOutcome::Retired(_)));
    assert!(store.load().expect("load").is_none());

    // Back in the not-established state: normalization is blocked again
    let err = indicators_from_events(&events, 2020, &config, store.load().expect("load").as_ref())
        .unwrap_err();
    assert!(matches!(err, FwiiError::BaselineNotEstablished));
}

#[test]
fn test_zero_coastal_baseline_is_surfaced() {
    let config = IndicatorConfig::default();
    let t = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
    // Baseline year with fluvial activity only
    let events = reconstruct_events(vec![record("A", t, Severity::Warning, false)], &config.duration);
    let baseline = establish_baseline(&score_year(&events, &config.severity_weights, 2020), 1, None);

    let err = indicators_from_events(&events, 2020, &config, Some(&baseline)).unwrap_err();
    assert!(err.to_string().contains("coastal"), "got: {}", err);
}

// ---------------------------------------------------------------------------
// 3. Ordering invariance
// ---------------------------------------------------------------------------

#[test]
fn test_scores_invariant_to_record_order_across_areas() {
    let config = IndicatorConfig::default();
    let base = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let mut records = Vec::new();
    for i in 0..30i64 {
        let area = format!("AREA{:02}", i % 6);
        let severity = Severity::from_level(i % 3 + 1).expect("1-3");
        records.push(record(&area, base + Duration::minutes(i * 517), severity, i % 6 >= 4));
    }

    let forward = aggregate_by_year(&reconstruct_events(records.clone(), &config.duration), &config.severity_weights);

    // Timestamps are distinct within each area, so reversing the stream
    // only changes the interleaving that reconstruction has to undo
    let mut shuffled = records.clone();
    shuffled.reverse();
    let backward = aggregate_by_year(&reconstruct_events(shuffled, &config.duration), &config.severity_weights);

    assert_eq!(forward, backward);

    let parallel = aggregate_by_year(
        &reconstruct_events_parallel(records, &config.duration, 3).expect("all areas complete"),
        &config.severity_weights,
    );
    assert_eq!(forward, parallel);
}
