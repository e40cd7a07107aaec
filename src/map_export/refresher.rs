use crate::map_export::exporter::export_map;
use crate::store::LocationStore;
use std::path::PathBuf;
use tokio::sync::watch::Receiver;
use tracing::{instrument, warn};

/// Keeps the exported map current: rewrites it whenever the store changes, starting with the first record.
#[instrument(skip(store, rx))]
pub async fn map_refresher(store: LocationStore, mut rx: Receiver<usize>, output_path: PathBuf, zoom_start: u8) {
    while rx.changed().await.is_ok() {
        if let Err(e) = export_map(&store.snapshot().await, &output_path, zoom_start).await {
            warn!("⚠️ {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationRecord;
    use std::env::temp_dir;
    use std::path::Path;
    use std::time::Duration;
    use test_log::test;
    use tokio::fs;
    use tokio::time::{Instant, sleep};

    async fn wait_for_content(path: &Path, expected: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Ok(content) = fs::read_to_string(path).await {
                if content.contains(expected) {
                    return true;
                }
            }
            sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[test(tokio::test)]
    async fn rewrites_the_map_while_records_arrive() {
        let path = temp_dir().join("location_tracker_refresher_test.html");
        fs::remove_file(&path).await.unwrap_or_default();
        let store = LocationStore::new();
        let refresher = tokio::spawn(map_refresher(store.clone(), store.notifier(), path.clone(), 14));

        store.append(LocationRecord::new(1.0, 2.0, "2024-05-01 12:30:00", "phone1")).await;
        assert!(wait_for_content(&path, "Device: phone1").await, "map should be exported after the first record");

        store.append(LocationRecord::new(3.0, 4.0, "2024-05-01 12:31:00", "phone2")).await;
        assert!(wait_for_content(&path, "Device: phone2").await, "map should include later records");

        refresher.abort();
    }
}
