use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::time::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, DEFAULT_TIME_INTERVAL};
use crate::error::{Error, Result};
use crate::node::Scalar;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct DateSettings {
    pub format: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct TimeSettings {
    pub format: Option<String>,
    pub interval: Option<String>,
}

/// Render configuration taken from the `$settings` marker
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub date: Option<DateSettings>,
    pub time: Option<TimeSettings>,
}

/// Shared render context: the `$globals` table and the `$settings`.
/// Both are read-only for the whole render.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Context {
    globals: HashMap<String, String>,
    settings: Settings,
}

impl Context {
    /// Builds the context out of the raw marker values.
    ///
    /// Globals are flattened into strings. Nested values in the table are
    /// skipped since `GB` can only emit text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` when `$settings` does not have the
    /// `{ date: { format }, time: { format, interval } }` shape.
    pub fn build(globals: Option<&Value>, settings: Option<&Value>) -> Result<Self> {
        let globals = globals
            .and_then(Value::as_object)
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(key, value)| Some((key.clone(), global_text(value)?)))
                    .collect()
            })
            .unwrap_or_default();

        let settings = match settings {
            Some(Value::Null) | None => Settings::default(),
            Some(value) => Settings::deserialize(value)
                .map_err(|e| Error::InvalidSettings(e.to_string()))?,
        };

        Ok(Context { globals, settings })
    }

    /// Looks up a global value
    pub fn global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    /// Date pattern used by `DATE`
    pub fn date_format(&self) -> &str {
        self.settings
            .date
            .as_ref()
            .and_then(|d| d.format.as_deref())
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Time pattern and interval used by `TIME`, or `None` when no time
    /// settings were given
    pub fn time_format(&self) -> Option<(&str, &str)> {
        self.settings.time.as_ref().map(|t| {
            (
                t.format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT),
                t.interval.as_deref().unwrap_or(DEFAULT_TIME_INTERVAL),
            )
        })
    }
}

fn global_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(Scalar::Null.render()),
        Value::Bool(b) => Some(Scalar::Bool(*b).render()),
        Value::Number(n) => Some(Scalar::Number(n.clone()).render()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
