mod exporter;
mod leaflet_document;
mod refresher;

pub use exporter::{MapExportError, export_map};
pub use refresher::map_refresher;
