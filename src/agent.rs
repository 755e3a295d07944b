use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::models::Position;
use crate::reporter::Reporter;
use crate::scheduler::{ManualReport, Scheduler, Status};
use crate::store::PositionStore;

/// Lifecycle controller pairing the position feed with the scheduler
///
/// `start` begins consuming the feed and starts the periodic loop together;
/// `stop` halts the loop and unsubscribes from the feed together. The feed
/// never runs without a consuming scheduler beyond the start/stop window.
pub struct Agent {
    store: PositionStore,
    scheduler: Scheduler,
    status: Arc<watch::Sender<Status>>,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl Agent {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        config.validate()?;

        let store = PositionStore::new();
        let (status, _) = watch::channel(Status::WaitingForFix);
        let status = Arc::new(status);

        let reporter = Reporter::builder()
            .endpoint(&config.endpoint)
            .device_id(&config.device_id)
            .asset_id(&config.asset_id)
            .timeout(config.timeout)
            .build()?;

        let scheduler = Scheduler::new(
            store.clone(),
            reporter,
            config.interval,
            Arc::clone(&status),
        );

        Ok(Self {
            store,
            scheduler,
            status,
            feed_task: Mutex::new(None),
        })
    }

    /// Begin consuming position fixes and start the report loop
    pub fn start(&self, mut feed: mpsc::Receiver<Position>) {
        let mut task = self.feed_task.lock().expect("agent lock poisoned");
        if task.is_some() {
            debug!("Agent already started");
            return;
        }

        let store = self.store.clone();
        let status = Arc::clone(&self.status);
        *task = Some(tokio::spawn(async move {
            while let Some(position) = feed.recv().await {
                store.update(position);
                let _ = status.send(position.into());
            }
            debug!("Feed consumer finished");
        }));
        drop(task);

        self.scheduler.start();
        info!("Agent started");
    }

    /// Stop the report loop and unsubscribe from the feed
    pub fn stop(&self) {
        self.scheduler.stop();
        if let Some(task) = self.feed_task.lock().expect("agent lock poisoned").take() {
            task.abort();
        }
        info!("Agent stopped");
    }

    /// Manual "report now" trigger for the UI collaborator
    pub async fn report_now(&self) -> ManualReport {
        self.scheduler.report_now().await
    }

    /// Subscribe to status notifications
    pub fn status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        if let Ok(mut task) = self.feed_task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
