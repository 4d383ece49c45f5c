//! Editor surface: where lint annotations end up.

use crate::compile::Annotation;
use crate::logger::{status_error, status_success, status_warning};

/// Receives the annotations of a compile-and-lint call.
pub trait EditorSurface: Send + Sync {
    fn update_linting(&self, code: &str, annotations: &[Annotation]);
}

/// Renders annotations as the terminal status block.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalEditor;

impl EditorSurface for TerminalEditor {
    fn update_linting(&self, code: &str, annotations: &[Annotation]) {
        let errors = count(annotations, "error");
        let warnings = count(annotations, "warning");
        let detail = render(code, annotations);

        match (errors, warnings) {
            (0, 0) => status_success("compiled", &detail),
            (0, n) => {
                status_warning(&format!("compiled with {}", plural(n, "warning")));
                if !detail.is_empty() {
                    crate::log!("lint"; "\n{}", detail);
                }
            }
            (e, w) => status_error(
                &format!("{}, {}", plural(e, "error"), plural(w, "warning")),
                &detail,
            ),
        }
    }
}

fn count(annotations: &[Annotation], severity: &str) -> usize {
    annotations.iter().filter(|a| a.severity == severity).count()
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// One line per annotation: `line:col severity message`, followed by the
/// offending source line when it exists.
fn render(code: &str, annotations: &[Annotation]) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut out = Vec::with_capacity(annotations.len() * 2);

    for annotation in annotations {
        out.push(format!(
            "{} {} {}",
            annotation.from, annotation.severity, annotation.message
        ));
        if let Some(source) = lines.get(annotation.from.line as usize) {
            out.push(format!("    | {}", source.trim_end()));
        }
    }
    out.join("\n")
}
