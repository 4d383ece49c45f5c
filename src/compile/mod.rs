//! Compile requests and results.
//!
//! - [`result`]: wire shapes of the compile service
//! - [`service`]: the service client
//! - [`orchestrator`]: single-flight request lifecycle
//! - [`annotate`]: diagnostics to editor annotations

pub mod annotate;
pub mod orchestrator;
pub mod result;
pub mod service;

pub use annotate::{Annotation, to_annotations};
pub use orchestrator::{CompileOutcome, Completion, Orchestrator, Trigger};
pub use result::{CompileRequest, CompileResult, Diagnostic, Position, ServiceFailure, Severity};
pub use service::{CompilationService, HttpCompilationService};
