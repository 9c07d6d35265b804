/// Area grouping utilities.
///
/// `group_by_area` takes the flat list of validated `WarningRecord`s and
/// partitions it into per-area, time-ordered sequences. Each partition is
/// an independent unit of work for event reconstruction: nothing in one
/// area's history affects another's.
///
/// The outer map is a `BTreeMap` so areas are always visited in code order,
/// whatever order the records arrived in.

use std::collections::BTreeMap;

use crate::model::WarningRecord;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Groups records by area code, each group sorted ascending by issuance time.
///
/// The sort is stable: records sharing a timestamp keep their input order.
pub fn group_by_area(records: Vec<WarningRecord>) -> BTreeMap<String, Vec<WarningRecord>> {
    let mut grouped: BTreeMap<String, Vec<WarningRecord>> = BTreeMap::new();

    for record in records {
        grouped.entry(record.area_id.clone()).or_default().push(record);
    }

    for area_records in grouped.values_mut() {
        area_records.sort_by_key(|r| r.issued_at);
    }

    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
