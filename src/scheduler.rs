use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::models::Position;
use crate::reporter::{ReportOutcome, Reporter};
use crate::store::PositionStore;

/// Status published to UI collaborators on every tick and feed update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    /// No position has been observed yet; manual reporting is unavailable
    WaitingForFix,
    /// Latest coordinates, for display
    Fix { latitude: f64, longitude: f64 },
}

impl From<Position> for Status {
    fn from(position: Position) -> Self {
        Status::Fix {
            latitude: position.latitude,
            longitude: position.longitude,
        }
    }
}

/// Result of a manual report request
#[derive(Debug)]
pub enum ManualReport {
    /// A send was performed, with its classified outcome
    Sent(ReportOutcome),
    /// No fix has arrived yet; the network was not touched
    NoFix,
}

/// Drives the periodic report loop
///
/// Two states: stopped (no timer task) and running. `start` ticks once
/// immediately, then on every interval until `stop` aborts the timer task.
/// Each send runs in its own spawned task so a slow request never delays the
/// next tick; stopping discards future ticks but does not abort a send
/// already in flight.
pub struct Scheduler {
    store: PositionStore,
    reporter: Reporter,
    interval: Duration,
    status: Arc<watch::Sender<Status>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        store: PositionStore,
        reporter: Reporter,
        interval: Duration,
        status: Arc<watch::Sender<Status>>,
    ) -> Self {
        Self {
            store,
            reporter,
            interval,
            status,
            timer: Mutex::new(None),
        }
    }

    /// Start the periodic loop; a no-op if already running
    pub fn start(&self) {
        let mut timer = self.timer.lock().expect("scheduler lock poisoned");
        if timer.is_some() {
            debug!("Scheduler already running");
            return;
        }

        let store = self.store.clone();
        let reporter = self.reporter.clone();
        let status = Arc::clone(&self.status);
        let period = self.interval;

        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately, so a report goes out at
                // t=0 rather than after the first interval.
                ticker.tick().await;
                tick(&store, &reporter, &status);
            }
        }));

        info!("Scheduler started, reporting every {:?}", self.interval);
    }

    /// Cancel the periodic loop; future ticks never fire
    pub fn stop(&self) {
        let mut timer = self.timer.lock().expect("scheduler lock poisoned");
        if let Some(handle) = timer.take() {
            handle.abort();
            info!("Scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.lock().expect("scheduler lock poisoned").is_some()
    }

    /// Manual trigger, independent of the timer's phase
    ///
    /// Does not reset or interact with the periodic schedule; a manual send
    /// overlapping a periodic one proceeds concurrently with its own outcome.
    pub async fn report_now(&self) -> ManualReport {
        match self.store.current() {
            Some(position) => {
                info!("Manual refresh requested, sending location now");
                ManualReport::Sent(self.reporter.send(position).await)
            }
            None => {
                debug!("Manual refresh requested but no fix has arrived yet");
                ManualReport::NoFix
            }
        }
    }

    /// Subscribe to status notifications
    pub fn status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

/// One scheduled execution: read the store, send or report the missing fix
fn tick(store: &PositionStore, reporter: &Reporter, status: &watch::Sender<Status>) {
    match store.current() {
        Some(position) => {
            let _ = status.send(position.into());
            debug!(
                "Sending location on schedule, lat={} lon={}",
                position.latitude, position.longitude
            );
            let reporter = reporter.clone();
            tokio::spawn(async move {
                let outcome = reporter.send(position).await;
                debug!("Scheduled send finished: {:?}", outcome);
            });
        }
        None => {
            debug!("No fix yet, retrying next tick");
            let _ = status.send(Status::WaitingForFix);
        }
    }
}
