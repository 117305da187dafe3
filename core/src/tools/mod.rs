use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod streaming;

pub use streaming::{FindStreamingPlatformsArgs, FindStreamingPlatformsTool};

/// Deserializes an optional integer. Backends encode JSON numbers loosely,
/// so `2010.0` and `"2010"` are accepted as well; `null` reads as `None`.
pub fn loose_integer_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_integer(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {value}"))),
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
