//! `[defaults]` section configuration.
//!
//! Lowest-precedence option source and the starting code per language.
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! language = "csharp"
//! target = "il"
//! mode = "release"
//!
//! [defaults.code]
//! csharp = "public class C { }"
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{Language, Mode, Options, Target};

const CSHARP_TEMPLATE: &str = "\
using System;
public class C {
    public void M() {
    }
}";

const VBNET_TEMPLATE: &str = "\
Imports System
Public Class C
    Public Sub M()
    End Sub
End Class";

/// Default options and code templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub language: Language,
    pub target: Target,
    pub mode: Mode,
    pub code: CodeTemplates,
}

/// Per-language starting code; built-in templates fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeTemplates {
    pub csharp: Option<String>,
    pub vbnet: Option<String>,
}

impl DefaultsConfig {
    /// Defaults as a full option set. Never selects a branch.
    pub fn options(&self) -> Options {
        Options {
            language: self.language,
            target: self.target,
            mode: self.mode,
            branch: None,
        }
    }

    /// Starting code for `language`.
    pub fn code(&self, language: Language) -> String {
        let (custom, builtin) = match language {
            Language::CSharp => (&self.code.csharp, CSHARP_TEMPLATE),
            Language::VbNet => (&self.code.vbnet, VBNET_TEMPLATE),
        };
        custom.clone().unwrap_or_else(|| builtin.to_string())
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let options = Options::default();
        Self {
            language: options.language,
            target: options.target,
            mode: options.mode,
            code: CodeTemplates::default(),
        }
    }
}
