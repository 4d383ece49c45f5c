//! In-memory collaborators for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::compile::{
    Annotation, CompilationService, CompileRequest, CompileResult, Diagnostic, Position,
    ServiceFailure, Severity,
};
use crate::core::{Options, PartialOptions};
use crate::editor::EditorSurface;
use crate::persist::{OptionStore, StoreError, UrlData, UrlState, encode_fragment};

/// Ordered record of side effects across collaborators.
pub type Journal = Arc<Mutex<Vec<&'static str>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Compile service
// ============================================================================

/// Service whose responses wait for [`GatedService::release`].
///
/// The reply depends on the code: `fail` yields a plain failure, `throw` a
/// failure with exception and stack trace, `warn` a success with one
/// warning, `error` a failed compile with one error, anything else a clean
/// success.
pub struct GatedService {
    gate: Semaphore,
    requests: Mutex<Vec<CompileRequest>>,
    journal: Option<Journal>,
}

impl GatedService {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self::with_permits(0, None))
    }

    pub fn open() -> Arc<Self> {
        Arc::new(Self::with_permits(Semaphore::MAX_PERMITS, None))
    }

    pub fn open_with_journal(journal: Journal) -> Arc<Self> {
        Arc::new(Self::with_permits(Semaphore::MAX_PERMITS, Some(journal)))
    }

    fn with_permits(permits: usize, journal: Option<Journal>) -> Self {
        Self {
            gate: Semaphore::new(permits),
            requests: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompilationService for GatedService {
    async fn process(&self, request: &CompileRequest) -> Result<CompileResult, ServiceFailure> {
        self.requests.lock().push(request.clone());
        if let Some(journal) = &self.journal {
            journal.lock().push("compile");
        }

        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }

        let code = request.code.as_str();
        if code.contains("throw") {
            return Err(ServiceFailure {
                message: "An error has occurred.".into(),
                exception_message: Some("Object reference not set".into()),
                stack_trace: Some("   at Compiler.Run()".into()),
            });
        }
        if code.contains("fail") {
            return Err(ServiceFailure::new("bad request"));
        }

        let diagnostic = |severity, message: &str| Diagnostic {
            severity,
            message: message.into(),
            start: Position::new(0, 4),
            end: Position::new(0, 9),
        };
        Ok(if code.contains("error") {
            CompileResult {
                success: false,
                errors: vec![diagnostic(Severity::Error, "; expected")],
                warnings: Vec::new(),
            }
        } else if code.contains("warn") {
            CompileResult {
                success: true,
                errors: Vec::new(),
                warnings: vec![diagnostic(Severity::Warning, "unused variable")],
            }
        } else {
            CompileResult {
                success: true,
                ..CompileResult::default()
            }
        })
    }
}

// ============================================================================
// URL and store
// ============================================================================

/// Address bar holding the fragment of the last save.
#[derive(Clone, Default)]
pub struct MemoryUrl {
    initial: Option<UrlData>,
    pub saves: Arc<Mutex<Vec<String>>>,
    journal: Option<Journal>,
}

impl MemoryUrl {
    pub fn new(initial: Option<UrlData>) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }
}

impl UrlState for MemoryUrl {
    fn load_from_url(&self) -> Option<UrlData> {
        self.initial.clone()
    }

    fn save_to_url(&mut self, code: &str, options: &Options) {
        if let Some(journal) = &self.journal {
            journal.lock().push("url");
        }
        self.saves.lock().push(encode_fragment(code, options));
    }

    fn current_url(&self) -> Option<String> {
        self.saves.lock().last().map(|f| format!("http://lab.example/#{f}"))
    }
}

/// Option store keeping every saved value.
#[derive(Clone, Default)]
pub struct MemoryStore {
    initial: Option<PartialOptions>,
    pub saves: Arc<Mutex<Vec<Options>>>,
    journal: Option<Journal>,
    failing: bool,
}

impl MemoryStore {
    pub fn new(initial: Option<PartialOptions>) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Every save fails with an IO error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }
}

impl OptionStore for MemoryStore {
    fn load(&self) -> Option<PartialOptions> {
        self.initial.clone()
    }

    fn save(&mut self, options: &Options) -> Result<(), StoreError> {
        if let Some(journal) = &self.journal {
            journal.lock().push("store");
        }
        if self.failing {
            return Err(StoreError::Io(
                "options.json".into(),
                std::io::Error::other("disk full"),
            ));
        }
        self.saves.lock().push(options.clone());
        Ok(())
    }
}

// ============================================================================
// Editor
// ============================================================================

/// Editor surface recording every lint update.
#[derive(Default)]
pub struct RecordingEditor {
    pub updates: Mutex<Vec<(String, Vec<Annotation>)>>,
}

impl EditorSurface for RecordingEditor {
    fn update_linting(&self, code: &str, annotations: &[Annotation]) {
        self.updates
            .lock()
            .push((code.to_string(), annotations.to_vec()));
    }
}
