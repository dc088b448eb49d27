use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A value that is usually a number but may arrive as a string or anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Display form without numeric formatting.
    pub fn literal(&self) -> String {
        match self {
            Scalar::Number(n) => natural_number(*n),
            Scalar::Text(s) => s.clone(),
            Scalar::Other(v) => coerce_text(v),
        }
    }
}

/// Converts any JSON value to display text: strings verbatim, `null` as empty, and
/// everything else as its compact JSON form.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Shortest natural representation of a number (`3`, `-3.5`, `0`).
pub fn natural_number(n: f64) -> String {
    if n == 0.0 {
        // Also folds -0.0.
        return "0".to_string();
    }
    format!("{n}")
}

pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_text(&v)),
    })
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?.unwrap_or_default())
}

/// Decodes a list, treating `null` or a non-array as an empty list. Elements that do
/// not decode as `T` are dropped; the rest are kept in order.
pub fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(index, error = %err, "dropping list element with unexpected shape");
                None
            }
        })
        .collect())
}

/// Decodes a nested object, treating `null` or a non-object as absent.
pub fn opt_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(Value::Object(map)) => serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
