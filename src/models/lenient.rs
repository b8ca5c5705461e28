//! Serde helpers for values older documents stored loosely.
//!
//! Years and section labels were written either as JSON numbers or as
//! strings depending on which form submitted them. Progress counters could
//! hold fractions or negatives typed into a prompt.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

fn value_to_year(value: Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truncates fractions and clamps negatives to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn value_to_count(value: Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
}

fn value_to_label(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts a number, a numeric string or null. Anything else is treated as
/// no year rather than an error.
pub fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_year))
}

/// Patch variant of [`year`]: a present field yields `Some`, so an explicit
/// `null` clears the year while an absent field leaves it alone.
pub fn patch_year<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    year(deserializer).map(Some)
}

/// Accepts a string or a number as a label.
pub fn label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_label))
}

pub fn patch_label<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    label(deserializer).map(Some)
}

pub fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(value_to_label)
        .collect())
}

/// Progress counter. Null or garbage reads as zero.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_count).unwrap_or_default())
}

/// Season count. Null or garbage reads as one season.
pub fn seasons<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_count).unwrap_or(1))
}

/// Known total, `None` when unknown.
pub fn total<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_count))
}

/// Patch counter: null or garbage leaves the field alone.
pub fn patch_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    total(deserializer)
}

/// Patch total: an explicit `null` clears it.
pub fn patch_total<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    total(deserializer).map(Some)
}

/// Entry list that drops and logs the entries it cannot read instead of
/// failing the whole document.
pub fn entries<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable catalog entry");
                None
            }
        })
        .collect())
}
