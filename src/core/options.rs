//! Typed compile options.
//!
//! `Options` is a closed schema: every key is listed in [`OptionField::ALL`]
//! and nothing else can live in it, so change detection never has to skip
//! bookkeeping keys.
//!
//! | Key        | Values                      |
//! |------------|-----------------------------|
//! | `language` | `csharp`, `vbnet`           |
//! | `target`   | `csharp`, `vbnet`, `il`     |
//! | `mode`     | `debug`, `release`          |
//! | `branch`   | branch id or null           |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option `{0}`")]
    UnknownField(String),

    #[error("invalid value `{value}` for `{field}` (expected one of: {expected})")]
    InvalidValue {
        field: OptionField,
        value: String,
        expected: &'static str,
    },
}

// ============================================================================
// Scalar option types
// ============================================================================

/// Source language of the code being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    VbNet,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CSharp => "csharp",
            Self::VbNet => "vbnet",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CSharp => "C#",
            Self::VbNet => "VB.NET",
        }
    }
}

impl FromStr for Language {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csharp" => Ok(Self::CSharp),
            "vbnet" => Ok(Self::VbNet),
            _ => Err(OptionError::InvalidValue {
                field: OptionField::Language,
                value: s.to_string(),
                expected: "csharp, vbnet",
            }),
        }
    }
}

/// What the compiled code is shown as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    CSharp,
    VbNet,
    Il,
}

impl Target {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CSharp => "csharp",
            Self::VbNet => "vbnet",
            Self::Il => "il",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CSharp => "C#",
            Self::VbNet => "VB.NET",
            Self::Il => "IL",
        }
    }

    /// Syntax mode the editor uses to highlight this target (empty = plain).
    pub const fn editor_mode(self) -> &'static str {
        match self {
            Self::CSharp => "text/x-csharp",
            Self::VbNet => "text/x-vb",
            Self::Il => "",
        }
    }
}

impl FromStr for Target {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csharp" => Ok(Self::CSharp),
            "vbnet" => Ok(Self::VbNet),
            "il" => Ok(Self::Il),
            _ => Err(OptionError::InvalidValue {
                field: OptionField::Target,
                value: s.to_string(),
                expected: "csharp, vbnet, il",
            }),
        }
    }
}

/// Compiler optimization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Debug,
    Release,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl FromStr for Mode {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(OptionError::InvalidValue {
                field: OptionField::Mode,
                value: s.to_string(),
                expected: "debug, release",
            }),
        }
    }
}

// ============================================================================
// Fields and values
// ============================================================================

/// One observable key of [`Options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    Language,
    Target,
    Mode,
    Branch,
}

impl OptionField {
    /// Every field, in observation order.
    pub const ALL: [Self; 4] = [Self::Language, Self::Target, Self::Mode, Self::Branch];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Target => "target",
            Self::Mode => "mode",
            Self::Branch => "branch",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OptionField {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| OptionError::UnknownField(s.to_string()))
    }
}

/// The value of a single option field, used for diffing and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Language(Language),
    Target(Target),
    Mode(Mode),
    Branch(Option<String>),
}

impl OptionValue {
    /// Parse a textual value for `field`. `none`/`null` clear the branch.
    pub fn parse(field: OptionField, raw: &str) -> Result<Self, OptionError> {
        Ok(match field {
            OptionField::Language => Self::Language(raw.parse()?),
            OptionField::Target => Self::Target(raw.parse()?),
            OptionField::Mode => Self::Mode(raw.parse()?),
            OptionField::Branch => match raw {
                "" | "none" | "null" => Self::Branch(None),
                id => Self::Branch(Some(id.to_string())),
            },
        })
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Language(v) => f.write_str(v.as_str()),
            Self::Target(v) => f.write_str(v.as_str()),
            Self::Mode(v) => f.write_str(v.as_str()),
            Self::Branch(Some(id)) => f.write_str(id),
            Self::Branch(None) => f.write_str("none"),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// The authoritative compile options of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub language: Language,
    pub target: Target,
    pub mode: Mode,
    pub branch: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            language: Language::CSharp,
            target: Target::CSharp,
            mode: Mode::Debug,
            branch: None,
        }
    }
}

impl Options {
    pub fn get(&self, field: OptionField) -> OptionValue {
        match field {
            OptionField::Language => OptionValue::Language(self.language),
            OptionField::Target => OptionValue::Target(self.target),
            OptionField::Mode => OptionValue::Mode(self.mode),
            OptionField::Branch => OptionValue::Branch(self.branch.clone()),
        }
    }

    pub fn set(&mut self, value: OptionValue) {
        match value {
            OptionValue::Language(v) => self.language = v,
            OptionValue::Target(v) => self.target = v,
            OptionValue::Mode(v) => self.mode = v,
            OptionValue::Branch(v) => self.branch = v,
        }
    }

    /// Overwrite every field present in `partial` (shallow, per key).
    pub fn overlay(&mut self, partial: &PartialOptions) {
        if let Some(language) = partial.language {
            self.language = language;
        }
        if let Some(target) = partial.target {
            self.target = target;
        }
        if let Some(mode) = partial.mode {
            self.mode = mode;
        }
        if let Some(branch) = &partial.branch {
            self.branch = Some(branch.clone());
        }
    }

    /// `(key, value)` pairs in field order; a null branch is omitted.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        OptionField::ALL.into_iter().filter_map(|field| match self.get(field) {
            OptionValue::Branch(None) => None,
            value => Some((field.key(), value.to_string())),
        })
    }
}

/// Options as supplied by the URL or the persistence store: any key may be
/// missing, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialOptions {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub target: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub branch: Option<String>,
}

impl PartialOptions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The value for `field`, if this source supplies one.
    pub fn get(&self, field: OptionField) -> Option<OptionValue> {
        match field {
            OptionField::Language => self.language.map(OptionValue::Language),
            OptionField::Target => self.target.map(OptionValue::Target),
            OptionField::Mode => self.mode.map(OptionValue::Mode),
            OptionField::Branch => self
                .branch
                .clone()
                .map(|id| OptionValue::Branch(Some(id))),
        }
    }

    /// Record a textual `key=value` pair. Unknown keys and invalid values
    /// are rejected so the caller can decide whether to ignore them.
    pub fn insert(&mut self, key: &str, raw: &str) -> Result<(), OptionError> {
        match OptionValue::parse(key.parse()?, raw)? {
            OptionValue::Language(v) => self.language = Some(v),
            OptionValue::Target(v) => self.target = Some(v),
            OptionValue::Mode(v) => self.mode = Some(v),
            OptionValue::Branch(v) => self.branch = v,
        }
        Ok(())
    }
}

impl From<&Options> for PartialOptions {
    fn from(options: &Options) -> Self {
        Self {
            language: Some(options.language),
            target: Some(options.target),
            mode: Some(options.mode),
            branch: options.branch.clone(),
        }
    }
}

/// Treat values that fail to deserialize as missing instead of failing the
/// whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
