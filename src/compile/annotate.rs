//! Diagnostic to editor annotation mapping.

use serde::Serialize;

use super::result::{Diagnostic, Position};

/// A lint marker as the editor surface consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Lower-cased severity (`error`, `warning`, ...).
    pub severity: String,
    pub message: String,
    pub from: Position,
    pub to: Position,
}

impl From<&Diagnostic> for Annotation {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity.as_str().to_ascii_lowercase(),
            message: diagnostic.message.clone(),
            from: diagnostic.start,
            to: diagnostic.end,
        }
    }
}

/// Errors first, then warnings, each in original order.
pub fn to_annotations(errors: &[Diagnostic], warnings: &[Diagnostic]) -> Vec<Annotation> {
    errors
        .iter()
        .chain(warnings)
        .map(Annotation::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::result::{CompileResult, Severity};

    fn diag(severity: &str, message: &str, line: u32) -> Diagnostic {
        Diagnostic {
            severity: Severity::parse(severity),
            message: message.into(),
            start: Position::new(line, 2),
            end: Position::new(line, 7),
        }
    }

    #[test]
    fn test_errors_before_warnings() {
        let errors = [diag("Error", "e1", 4), diag("Error", "e2", 1)];
        let warnings = [diag("Warning", "w1", 0)];

        let annotations = to_annotations(&errors, &warnings);
        let messages: Vec<_> = annotations.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, ["e1", "e2", "w1"]);

        assert_eq!(annotations[0].severity, "error");
        assert_eq!(annotations[2].severity, "warning");
        assert_eq!(annotations[0].from, Position::new(4, 2));
        assert_eq!(annotations[0].to, Position::new(4, 7));
    }

    #[test]
    fn test_empty_lists() {
        assert!(to_annotations(&[], &[]).is_empty());

        let result: CompileResult =
            serde_json::from_str(r#"{"errors": null, "warnings": [{"severity": "Info", "message": "m"}]}"#)
                .unwrap();
        let annotations = to_annotations(&result.errors, &result.warnings);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].severity, "info");
        assert_eq!(annotations[0].from, Position::ORIGIN);
    }

    #[test]
    fn test_unknown_severity_lowercased() {
        let annotations = to_annotations(&[diag("HIDDEN", "h", 0), diag("Custom", "c", 0)], &[]);
        assert_eq!(annotations[0].severity, "hidden");
        assert_eq!(annotations[1].severity, "custom");
    }
}
