/// Event Reconstruction
///
/// Turns issuance records into `WarningEvent`s with an estimated duration.
/// The historic export carries no end times, so each warning's active
/// period is inferred from what happens next in the same area.
///
/// # Duration Heuristic
///
/// For each record at level 1-3, with `gap` = hours until the next record
/// in the same area (any level, closure markers included; none ⇒ no gap):
///
/// 1. **Update** (`is_update`) with a following record: duration = `gap`,
///    uncapped. An update asserts the situation is still live.
/// 2. **Gap within `max_gap_hours`**: duration = `min(gap, default)`. A
///    quickly superseded warning is shortened; it never grows past the
///    default for its level.
/// 3. **Otherwise** (gap beyond the maximum, or nothing follows):
///    duration = `default`. The warning stands alone.
///
/// Level-4 records never become events.
///
/// Records sharing a timestamp are distinct events; the earlier one (in
/// input order) gets a zero gap and so a zero-hour duration.
///
/// This heuristic exists only because true end times are unavailable. If
/// they ever become available it should be replaced, not patched.

use std::collections::BTreeMap;
use std::sync::mpsc;
use threadpool::ThreadPool;

use crate::analysis::groupings::group_by_area;
use crate::config::DurationConfig;
use crate::error::{FwiiError, Result};
use crate::model::{Severity, WarningEvent, WarningRecord};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Estimated active duration (hours) of one warning.
///
/// `gap_hours` is `None` when no later record exists for the area.
pub fn estimate_duration(
    severity: Severity,
    gap_hours: Option<f64>,
    is_update: bool,
    config: &DurationConfig,
) -> f64 {
    let default_hours = config.default_hours(severity);

    match gap_hours {
        Some(gap) if is_update => gap,
        Some(gap) if gap <= config.max_gap_hours => gap.min(default_hours),
        _ => default_hours,
    }
}

/// Reconstructs events for one area's records, already sorted by time.
fn reconstruct_sorted_area(records: &[WarningRecord], config: &DurationConfig) -> Vec<WarningEvent> {
    let mut events = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        if !record.severity.is_active() {
            continue;
        }

        let gap_hours = records.get(i + 1).map(|next| {
            next.issued_at
                .signed_duration_since(record.issued_at)
                .num_milliseconds() as f64
                / MILLIS_PER_HOUR
        });

        events.push(WarningEvent {
            area_id: record.area_id.clone(),
            severity: record.severity,
            started_at: record.issued_at,
            estimated_duration_hours: estimate_duration(
                record.severity,
                gap_hours,
                record.is_update,
                config,
            ),
            is_coastal: record.is_coastal,
        });
    }

    events
}

/// Reconstructs events for any set of records, in any order.
///
/// Output is grouped by area (code order), then by issuance time.
pub fn reconstruct_events(records: Vec<WarningRecord>, config: &DurationConfig) -> Vec<WarningEvent> {
    let mut events = Vec::new();

    for (area_id, area_records) in group_by_area(records) {
        let area_events = reconstruct_sorted_area(&area_records, config);
        log::debug!(
            "area {}: {} records → {} events",
            area_id,
            area_records.len(),
            area_events.len()
        );
        events.extend(area_events);
    }

    events
}

/// Same result as `reconstruct_events`, with areas reconstructed on a
/// thread pool. Per-area results are merged back in area code order.
///
/// Fails with `ReconstructionIncomplete` if any area's job did not report
/// back; a partial event list is never returned.
pub fn reconstruct_events_parallel(
    records: Vec<WarningRecord>,
    config: &DurationConfig,
    workers: usize,
) -> Result<Vec<WarningEvent>> {
    let config = *config;
    reconstruct_on_pool(group_by_area(records), workers, move |area_records| {
        reconstruct_sorted_area(area_records, &config)
    })
}

fn reconstruct_on_pool<F>(
    grouped: BTreeMap<String, Vec<WarningRecord>>,
    workers: usize,
    reconstruct_area: F,
) -> Result<Vec<WarningEvent>>
where
    F: Fn(&[WarningRecord]) -> Vec<WarningEvent> + Clone + Send + 'static,
{
    let area_count = grouped.len();
    let pool = ThreadPool::new(workers.max(1));
    let (tx, rx) = mpsc::channel();

    for (area_id, area_records) in grouped {
        let tx = tx.clone();
        let reconstruct_area = reconstruct_area.clone();
        pool.execute(move || {
            let events = reconstruct_area(&area_records);
            // Receiver outlives every job
            let _ = tx.send((area_id, events));
        });
    }
    drop(tx);

    let merged: BTreeMap<String, Vec<WarningEvent>> = rx.iter().collect();
    if merged.len() != area_count {
        log::error!(
            "parallel reconstruction returned {} of {} areas ({} worker panics)",
            merged.len(),
            area_count,
            pool.panic_count()
        );
        return Err(FwiiError::ReconstructionIncomplete {
            completed: merged.len(),
            expected: area_count,
        });
    }

    Ok(merged.into_values().flatten().collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
