//! Compile service data shapes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::Options;

/// Zero-based position in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const ORIGIN: Self = Self { line: 0, column: 0 };

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Diagnostic severity as reported by the service (`Error`, `warning`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hidden,
    Other(String),
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warning" => Self::Warning,
            "info" => Self::Info,
            "hidden" => Self::Hidden,
            other => Self::Other(other.to_string()),
        }
    }

    /// Lower-case name, as the editor surface expects it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Hidden => "hidden",
            Self::Other(name) => name,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl Serialize for Severity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub start: Position,
    #[serde(default)]
    pub end: Position,
}

impl Diagnostic {
    /// Error anchored at the origin, for failures without a source location.
    pub fn at_origin(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            start: Position::ORIGIN,
            end: Position::ORIGIN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<Diagnostic>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub warnings: Vec<Diagnostic>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rejection payload of the compile service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFailure {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub exception_message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// User-facing report: exception message (or message), then the stack
    /// trace on following lines.
    pub fn report(&self) -> String {
        let mut report = self
            .exception_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.message)
            .to_string();
        if let Some(trace) = self.stack_trace.as_deref().filter(|t| !t.is_empty()) {
            report.push_str("\r\n");
            report.push_str(trace);
        }
        report
    }

    /// The result shown in place of a real one when the call failed.
    pub fn into_result(self) -> CompileResult {
        CompileResult {
            success: false,
            errors: vec![Diagnostic::at_origin(self.report())],
            warnings: Vec::new(),
        }
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Everything the service needs for one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub code: String,
    pub options: Options,
    /// Base URL of the selected branch's service, if any.
    #[serde(skip)]
    pub branch_url: Option<String>,
}
