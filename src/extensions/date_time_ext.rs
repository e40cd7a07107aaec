use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a point in time the way location reports carry their timestamp.
pub trait ToReportTimestamp {
    fn to_report_timestamp(&self) -> String;
}

impl<Tz: TimeZone> ToReportTimestamp for DateTime<Tz>
where
    Tz::Offset: Display,
{
    fn to_report_timestamp(&self) -> String {
        self.format(REPORT_TIMESTAMP_FORMAT).to_string()
    }
}
