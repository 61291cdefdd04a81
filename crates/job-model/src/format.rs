//! Config document formats.
//!
//! Two syntaxes decode to the same document shape. The choice is made by
//! file suffix alone, never by sniffing the contents.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::job::JobDescription;

/// File suffix that selects the relaxed parser.
pub const RELAXED_SUFFIX: &str = ".json5";

/// Which syntax a config file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Canonical JSON. No comments, no trailing commas.
    Strict,

    /// JSON5: comments, trailing commas, unquoted keys, single quotes.
    Relaxed,
}

impl DocumentFormat {
    /// Select the format for a config path.
    pub fn for_path(path: &Path) -> Self {
        if path.to_string_lossy().ends_with(RELAXED_SUFFIX) {
            Self::Relaxed
        } else {
            Self::Strict
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Strict => "JSON",
            Self::Relaxed => "JSON5",
        }
    }

    /// The parser implementing this format.
    pub fn parser(self) -> &'static dyn DocumentParser {
        match self {
            Self::Strict => &StrictJson,
            Self::Relaxed => &RelaxedJson5,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Malformed document text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
}

impl SyntaxError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Turns config text into a generic document.
pub trait DocumentParser: Send + Sync {
    /// The format this parser accepts.
    fn format(&self) -> DocumentFormat;

    /// Parse text into an untyped value.
    fn parse_value(&self, text: &str) -> Result<Value, SyntaxError>;

    /// Parse text into a job description. The top level must be an object.
    fn parse_job(&self, text: &str) -> Result<JobDescription, SyntaxError> {
        let value = self.parse_value(text)?;
        let kind = value_kind(&value);
        JobDescription::from_value(value).ok_or_else(|| {
            SyntaxError::new(format!(
                "expected an object at the top level, found {kind}"
            ))
        })
    }
}

/// Strict JSON parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson;

impl DocumentParser for StrictJson {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Strict
    }

    fn parse_value(&self, text: &str) -> Result<Value, SyntaxError> {
        serde_json::from_str(text).map_err(|e| SyntaxError::new(e.to_string()))
    }
}

/// JSON5 parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedJson5;

impl DocumentParser for RelaxedJson5 {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Relaxed
    }

    fn parse_value(&self, text: &str) -> Result<Value, SyntaxError> {
        json5::from_str(text).map_err(|e| SyntaxError::new(e.to_string()))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
