//! Expiration stamping for a run.

const SECONDS_PER_DAY: i64 = 86_400;

/// Absolute expiration shared by every entry of a run.
///
/// Returns `0` ("never expires") when `days` is zero, otherwise
/// `run_start + days` converted to seconds. Computed exactly once per run so
/// all entries of a pass carry the same timestamp.
pub fn expire_at(days: u32, run_start: i64) -> i64 {
    if days == 0 {
        0
    } else {
        run_start + i64::from(days) * SECONDS_PER_DAY
    }
}
