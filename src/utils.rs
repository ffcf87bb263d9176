use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current time as microseconds since the Unix epoch.
///
/// Order and trade timestamps use microsecond resolution; time priority
/// among equal-price orders is ultimately decided by queue position, so a
/// clock that ticks backwards cannot reorder a level.
pub fn current_time_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
