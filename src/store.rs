use crate::domain::LocationRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tokio::sync::{RwLock, watch};
use tracing::{debug, instrument};

/// Append-only, arrival-ordered collection of accepted location records.
///
/// Cloning is cheap and yields another handle to the same records, so the server, every connection handler
/// and the presentation side can each hold one. The notifier publishes the number of stored records after every
/// append, which lets listeners pick up exactly the records they have not seen yet.
#[derive(Clone, Debug)]
pub struct LocationStore {
    records: Arc<RwLock<Vec<LocationRecord>>>,
    notifier_tx: Arc<WatchSender<usize>>,
}

impl LocationStore {
    pub fn new() -> Self {
        let (notifier_tx, _) = watch::channel::<usize>(0);

        LocationStore {
            records: Arc::new(RwLock::new(Vec::new())),
            notifier_tx: Arc::new(notifier_tx),
        }
    }

    pub fn notifier(&self) -> WatchReceiver<usize> {
        self.notifier_tx.subscribe()
    }

    #[instrument(skip_all, fields(device_id = %record.device_id))]
    pub async fn append(&self, record: LocationRecord) {
        let mut write_guard = self.records.write().await;
        write_guard.push(record);

        // Published while the lock is held so listeners observe counts in append order
        self.notifier_tx.send_replace(write_guard.len());
        debug!("🔵 Stored record #{}", write_guard.len());
    }

    pub async fn snapshot(&self) -> Vec<LocationRecord> {
        self.records.read().await.clone()
    }

    pub async fn latest(&self) -> Option<LocationRecord> {
        self.records.read().await.last().cloned()
    }

    /// Returns the records appended after the first `offset` ones.
    pub async fn since(&self, offset: usize) -> Vec<LocationRecord> {
        let read_guard = self.records.read().await;
        read_guard.get(offset..).map(<[LocationRecord]>::to_vec).unwrap_or_default()
    }

    /// All records of one device, in arrival order.
    pub async fn history(&self, device_id: &str) -> Vec<LocationRecord> {
        let read_guard = self.records.read().await;
        read_guard.iter().filter(|record| record.device_id == device_id).cloned().collect()
    }

    /// The most recently arrived record of every device, ordered by the device's first report.
    pub async fn devices(&self) -> Vec<LocationRecord> {
        let read_guard = self.records.read().await;
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut latest: Vec<&LocationRecord> = Vec::new();

        for record in read_guard.iter() {
            match positions.get(record.device_id.as_str()) {
                Some(&position) => latest[position] = record,
                None => {
                    positions.insert(&record.device_id, latest.len());
                    latest.push(record);
                }
            }
        }

        latest.into_iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}
