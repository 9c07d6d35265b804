/// Data ingestion adapters.
///
/// - `warnings` - historic flood warning export (JSON) → `RawWarningRecord`
/// - `fixtures` (test only) - representative export rows

pub mod warnings;

#[cfg(test)]
pub(crate) mod fixtures;
