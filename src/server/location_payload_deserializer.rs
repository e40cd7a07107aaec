use crate::server::location_payload::LocationPayload;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

impl<'de> Deserialize<'de> for LocationPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Value = Deserialize::deserialize(deserializer)?;
        let Value::Object(mut fields) = value else {
            return Err(Error::custom("expected the payload to be a JSON object"));
        };

        let latitude = coordinate(&mut fields, "latitude", 90.0).map_err(D::Error::custom)?;
        let longitude = coordinate(&mut fields, "longitude", 180.0).map_err(D::Error::custom)?;

        Ok(LocationPayload {
            latitude,
            longitude,
            timestamp: text(fields.remove("timestamp")),
            device_id: text(fields.remove("device_id")),
        })
    }
}

/// Accepts a JSON number or a numeric string, which must be finite and within `-limit..=limit`.
fn coordinate(fields: &mut Map<String, Value>, name: &str, limit: f64) -> Result<f64, String> {
    let value = match fields.remove(name) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(string)) => match string.trim().parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => return Err(format!("invalid {}: {:?} is not a number", name, string)),
        },
        Some(other) => return Err(format!("invalid {}: expected a number, found {}", name, other)),
        None => return Err(format!("missing {}", name)),
    };

    match value {
        Some(value) if value.is_finite() && (-limit..=limit).contains(&value) => Ok(value),
        Some(value) if value.is_finite() => Err(format!("invalid {}: {}, must be between -{} and {}", name, value, limit, limit)),
        _ => Err(format!("invalid {}: not a finite number", name)),
    }
}

/// Strings are taken verbatim, other scalars as their JSON text, `null` counts as absent.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(string) => Some(string),
        other => Some(other.to_string()),
    }
}
