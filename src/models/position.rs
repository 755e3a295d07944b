use chrono::{DateTime, Utc};

/// A single observed device position
///
/// Immutable snapshot; the store replaces the whole value on every fix,
/// it is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTime<Utc>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            observed_at,
        }
    }
}
