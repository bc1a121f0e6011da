// Shared series store with change notification
use crate::domain::environment::Batch;
use crate::domain::series_store::{RetentionPolicy, SeriesSnapshot, SeriesStore, StoreError};
use tokio::sync::{watch, Mutex};

/// The single store instance shared by the fetch cycle and the render pass.
///
/// Appends are serialized by the mutex; every append that changes the data bumps
/// the version published on the watch channel.
pub struct LiveSeries {
    store: Mutex<SeriesStore>,
    version: watch::Sender<u64>,
}

impl LiveSeries {
    pub fn new(policy: RetentionPolicy) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            store: Mutex::new(SeriesStore::new(policy)),
            version,
        }
    }

    pub async fn append(&self, batch: Batch) -> Result<usize, StoreError> {
        let mut store = self.store.lock().await;
        let appended = store.append_batch(batch)?;
        if appended > 0 {
            self.version.send_modify(|v| *v += 1);
        }
        tracing::debug!(appended, total = store.len(), "Appended batch to series store");
        Ok(appended)
    }

    pub async fn snapshot(&self) -> SeriesSnapshot {
        self.store.lock().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
