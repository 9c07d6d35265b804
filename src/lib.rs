/// fwii_service: Flood Warning Intensity Index calculation.
///
/// # Module structure
///
/// ```text
/// fwii_service
/// ├── model       - shared data types (WarningRecord, WarningEvent, Severity, Category)
/// ├── error       - FwiiError taxonomy
/// ├── config      - indicator settings loader (settings.toml)
/// ├── areas       - warning area registry (warning_areas.toml)
/// ├── ingest
/// │   ├── warnings - historic warning export (JSON) parsing
/// │   └── fixtures (test only) - representative export rows
/// ├── validate    - raw rows → WarningRecords + data-quality report
/// ├── analysis
/// │   ├── groupings   - per-area partitioning
/// │   ├── reconstruct - event duration heuristic
/// │   └── scoring     - per-year, per-category weighted scores
/// ├── baseline    - versioned baseline artifact (baseline.toml)
/// ├── indicator   - baseline normalization + composite index
/// └── trend       - year-over-year series
/// ```

/// Public modules
pub mod analysis;
pub mod areas;
pub mod baseline;
pub mod config;
pub mod error;
pub mod indicator;
pub mod ingest;
pub mod model;
pub mod trend;
pub mod validate;

pub use error::{FwiiError, Result};
