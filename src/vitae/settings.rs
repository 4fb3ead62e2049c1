//! # Display Settings
//!
//! Settings are the only part of the document with enumerated values. They are
//! sanitized in two places, with the same rules:
//!
//! - when a stored document is deserialized (hand-edited files, older writers)
//! - when a partial [`SettingsUpdate`] is applied
//!
//! `columns` is coerced to an integer and anything other than `1` or `2` becomes `2`.
//! `separator` is coerced to a boolean by truthiness. Neither field can ever hold
//! anything else once it is in memory.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Number of layout columns a renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Columns {
    One,
    #[default]
    Two,
}

impl Columns {
    /// Resolve an arbitrary value: integers (and integer-like strings or floats) of 1
    /// pick one column, everything else, including null, picks two.
    pub fn coerce(value: &Value) -> Self {
        match coerce_int(value) {
            Some(1) => Columns::One,
            _ => Columns::Two,
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Columns::One => 1,
            Columns::Two => 2,
        }
    }
}

impl From<i64> for Columns {
    fn from(n: i64) -> Self {
        if n == 1 {
            Columns::One
        } else {
            Columns::Two
        }
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.count())
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Columns::coerce(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: Columns,
    #[serde(deserialize_with = "lenient_bool")]
    pub separator: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: Columns::Two,
            separator: true,
        }
    }
}

/// A partial settings submission. Fields left as `None` keep their stored value;
/// present fields are coerced, so callers may pass raw form or JSON values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub columns: Option<Value>,
    #[serde(default)]
    pub separator: Option<Value>,
}

impl SettingsUpdate {
    pub fn columns(mut self, columns: impl Into<Value>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<Value>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Apply onto `current`, always producing concrete values.
    pub fn apply(&self, current: Settings) -> Settings {
        Settings {
            columns: self
                .columns
                .as_ref()
                .map(Columns::coerce)
                .unwrap_or(current.columns),
            separator: self
                .separator
                .as_ref()
                .map(truthy)
                .unwrap_or(current.separator),
        }
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Truthiness used for `separator`. Strings that spell out a negative ("false",
/// "off", "no", "0") count as false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "0" | "false" | "off" | "no")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}
