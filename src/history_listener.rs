use crate::domain::LocationRecord;
use crate::store::LocationStore;
use tokio::sync::watch::Receiver;
use tracing::instrument;

/// Calls `on_record` once for every record appended to the store, in arrival order.
#[instrument(skip_all)]
pub async fn history_listener<F>(store: LocationStore, mut rx: Receiver<usize>, mut on_record: F)
where
    F: FnMut(&LocationRecord),
{
    let mut seen = 0;
    while rx.changed().await.is_ok() {
        let records = store.since(seen).await;
        seen += records.len();
        records.iter().for_each(&mut on_record);
    }
}
