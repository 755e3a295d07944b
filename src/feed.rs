use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::Position;

/// Buffered fixes between the provider and the store consumer
const FEED_BUFFER: usize = 16;

/// A single fix as delivered by an external position provider
#[derive(Debug, serde::Deserialize)]
pub struct FixUpdate {
    pub latitude: f64,
    pub longitude: f64,
    /// Provider timestamp; receipt time is used when absent
    pub observed_at: Option<DateTime<Utc>>,
}

impl From<FixUpdate> for Position {
    fn from(fix: FixUpdate) -> Self {
        Position::new(
            fix.latitude,
            fix.longitude,
            fix.observed_at.unwrap_or_else(Utc::now),
        )
    }
}

/// Position provider reading JSON-lines fixes from stdin
///
/// One `FixUpdate` object per line; malformed lines are logged and skipped.
/// The channel closes at EOF or when the consumer goes away.
pub fn stdin_feed() -> mpsc::Receiver<Position> {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<FixUpdate>(line) {
                Ok(fix) => {
                    debug!("New fix from provider: lat={} lon={}", fix.latitude, fix.longitude);
                    if tx.send(fix.into()).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring malformed fix line: {}", e),
            }
        }
        debug!("Position feed closed");
    });

    rx
}
