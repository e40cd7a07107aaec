use crate::domain::LocationRecord;
use serde_json::{Value, json};

const TEMPLATE: &str = include_str!("map_template.html");

/// Renders a standalone Leaflet page with one marker per record, centred on the most recent one.
/// Returns `None` when there is nothing to show.
pub fn render_map(records: &[LocationRecord], zoom_start: u8) -> Option<String> {
    let latest = records.last()?;

    let markers = Value::Array(
        records
            .iter()
            .map(|record| {
                json!({
                    "location": [record.latitude, record.longitude],
                    "popup": popup_text(record),
                })
            })
            .collect(),
    );

    // Markers go last, device supplied text must not be mistaken for a placeholder
    let document = TEMPLATE
        .replace("__CENTER__", &format!("[{}, {}]", latest.latitude, latest.longitude))
        .replace("__ZOOM__", &zoom_start.to_string())
        .replace("__MARKERS__", &markers.to_string().replace("</", "<\\/"));

    Some(document)
}

fn popup_text(record: &LocationRecord) -> String {
    format!(
        "Device: {}<br>Time: {}<br>Lat: {:.6}<br>Lng: {:.6}",
        escape_html(&record.device_id),
        escape_html(&record.timestamp),
        record.latitude,
        record.longitude
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
