use crate::domain::{LocationRecord, UNKNOWN_DEVICE_ID};
use crate::extensions::date_time_ext::ToReportTimestamp;
use chrono::{DateTime, Local};
use std::str::Utf8Error;
use thiserror::Error;

/// A validated report as sent by a device, before server-side defaults are applied.
#[derive(Debug, PartialEq)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<String>,
    pub device_id: Option<String>,
}

impl LocationPayload {
    pub fn parse(bytes: &[u8]) -> Result<LocationPayload, PayloadError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_record(self, received_at: &DateTime<Local>) -> LocationRecord {
        LocationRecord::new(
            self.latitude,
            self.longitude,
            self.timestamp.unwrap_or_else(|| received_at.to_report_timestamp()),
            self.device_id.unwrap_or_else(|| UNKNOWN_DEVICE_ID.to_string()),
        )
    }
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("payload is not a valid location report: {0}")]
    Json(#[from] serde_json::Error),
}
