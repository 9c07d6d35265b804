/// Warning analysis for the intensity index.
///
/// Submodules:
/// - `groupings`   - partitions records into per-area, time-ordered sequences.
/// - `reconstruct` - infers each warning's duration from the area's sequence.
/// - `scoring`     - reduces events to per-year, per-category scores.

pub mod groupings;
pub mod reconstruct;
pub mod scoring;
