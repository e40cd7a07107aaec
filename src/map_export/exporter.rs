use crate::domain::LocationRecord;
use crate::map_export::leaflet_document::render_map;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

#[instrument(skip(records), fields(records = records.len()))]
pub async fn export_map(records: &[LocationRecord], output_path: &Path, zoom_start: u8) -> Result<PathBuf, MapExportError> {
    let document = render_map(records, zoom_start).ok_or(MapExportError::NoData)?;

    debug!("🗺️ Exporting map to '{}'...", output_path.display());
    fs::write(output_path, document).await.map_err(|source| MapExportError::Io {
        source,
        path: output_path.to_path_buf(),
    })?;
    debug!("🗺️ Exporting map to '{}'... OK, {} marker(s)", output_path.display(), records.len());

    Ok(output_path.to_path_buf())
}

#[derive(Error, Debug)]
pub enum MapExportError {
    #[error("no location data available")]
    NoData,
    #[error("could not write map to '{}': {source}", .path.display())]
    Io { source: io::Error, path: PathBuf },
}
