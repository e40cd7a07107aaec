mod location_record;

pub use location_record::{LocationRecord, UNKNOWN_DEVICE_ID};
