use std::fmt::{Display, Formatter};

pub const UNKNOWN_DEVICE_ID: &str = "Unknown";

/// A single accepted location report. Immutable once it is in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
    pub device_id: String,
}

impl LocationRecord {
    pub fn new(latitude: f64, longitude: f64, timestamp: impl Into<String>, device_id: impl Into<String>) -> Self {
        LocationRecord {
            latitude,
            longitude,
            timestamp: timestamp.into(),
            device_id: device_id.into(),
        }
    }
}

impl Display for LocationRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {:.6}, {:.6}", self.timestamp, self.device_id, self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn displays_as_a_history_line() {
        let record = LocationRecord::new(37.7749, -122.4194, "2024-05-01 12:30:00", "phone1");

        assert_eq!(record.to_string(), "2024-05-01 12:30:00 - phone1: 37.774900, -122.419400");
    }
}
