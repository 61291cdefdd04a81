//! The job description document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output file path key.
pub const OUT_PATH_KEY: &str = "outPath";

/// Output width key (pixels).
pub const WIDTH_KEY: &str = "width";

/// Output height key (pixels).
pub const HEIGHT_KEY: &str = "height";

/// Quality/speed tradeoff key. Absent means the renderer's own default.
pub const FAST_KEY: &str = "fast";

/// Label used in notices when the job has no output path.
pub const PREVIEW_LABEL: &str = "preview";

/// Resolved parameters for one render invocation.
///
/// Serializes as the bare JSON object, exactly as the renderer expects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDescription(Map<String, Value>);

impl JobDescription {
    /// Wrap a parsed document. Only objects qualify.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, keeping its position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Output path, when present as a string.
    pub fn out_path(&self) -> Option<&str> {
        self.get(OUT_PATH_KEY).and_then(Value::as_str)
    }

    pub fn width(&self) -> Option<i64> {
        self.get(WIDTH_KEY).and_then(Value::as_i64)
    }

    pub fn height(&self) -> Option<i64> {
        self.get(HEIGHT_KEY).and_then(Value::as_i64)
    }

    /// Whether fast mode is explicitly enabled.
    pub fn is_fast(&self) -> bool {
        self.get(FAST_KEY).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Human-readable render target for progress notices.
    pub fn target_label(&self) -> String {
        match self.get(OUT_PATH_KEY) {
            None | Some(Value::Null) => PREVIEW_LABEL.to_string(),
            Some(Value::String(path)) => path.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Map<String, Value>> for JobDescription {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
