//! Single-flight compile orchestration.
//!
//! At most one request is outstanding. Triggers that arrive while a request
//! is in flight are dropped, not queued: the next genuine change after the
//! response lands compiles whatever the state is at that point.
//!
//! # Flow
//!
//! ```text
//! trigger(state) ──► empty code?   ──► EmptyInput
//!        │          loading?      ──► InFlight (completion discarded)
//!        ▼
//!   loading = true, spawn service call ──► Issued
//!        │
//!        ▼ (channel)
//! next_outcome() ──► complete(state, outcome)
//!                       loading = false
//!                       failure ──► synthetic result
//!                       state.result = result
//!                       completion(result)
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use super::result::{CompileRequest, CompileResult, ServiceFailure};
use super::service::CompilationService;
use crate::core::SelectedState;

/// Callback run once with the result of the request it was attached to.
pub type Completion = Box<dyn FnOnce(&CompileResult) + Send>;

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A request was sent.
    Issued,
    /// The code is empty; nothing to compile.
    EmptyInput,
    /// A request is already outstanding; this trigger was dropped.
    InFlight,
}

/// Tagged outcome of one service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success(CompileResult),
    Failure(ServiceFailure),
}

impl CompileOutcome {
    /// Collapse into the result shown to the user.
    pub fn into_result(self) -> CompileResult {
        match self {
            Self::Success(result) => result,
            Self::Failure(failure) => failure.into_result(),
        }
    }
}

pub struct Orchestrator {
    service: Arc<dyn CompilationService>,
    tx: mpsc::UnboundedSender<CompileOutcome>,
    rx: mpsc::UnboundedReceiver<CompileOutcome>,
    pending: Option<Completion>,
    issued: usize,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn CompilationService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            tx,
            rx,
            pending: None,
            issued: 0,
        }
    }

    /// Request a compile of the current state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, state: &mut SelectedState, completion: Option<Completion>) -> Trigger {
        if state.code.is_empty() {
            crate::debug!("compile"; "empty code, skipped");
            return Trigger::EmptyInput;
        }
        if state.loading {
            crate::debug!("compile"; "request in flight, trigger dropped");
            return Trigger::InFlight;
        }

        state.loading = true;
        self.pending = completion;
        self.issued += 1;

        let request = CompileRequest {
            code: state.code.clone(),
            options: state.options.clone(),
            branch_url: state.branch_url().map(str::to_string),
        };
        crate::debug!("compile"; "request #{} ({}, {} -> {})",
            self.issued,
            request.options.mode.as_str(),
            request.options.language.as_str(),
            request.options.target.as_str());

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match service.process(&request).await {
                Ok(result) => CompileOutcome::Success(result),
                Err(failure) => CompileOutcome::Failure(failure),
            };
            // Receiver gone means the session ended
            let _ = tx.send(outcome);
        });

        Trigger::Issued
    }

    /// Wait for the outstanding request to finish.
    ///
    /// Pends forever when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<CompileOutcome> {
        self.rx.recv().await
    }

    /// Apply an outcome to the state. The only place `loading` is reset.
    pub fn complete(&mut self, state: &mut SelectedState, outcome: CompileOutcome) {
        state.loading = false;

        if let CompileOutcome::Failure(failure) = &outcome {
            crate::debug!("compile"; "request failed: {}", failure.message);
        }
        let result = outcome.into_result();

        if let Some(completion) = self.pending.take() {
            completion(&result);
        }
        state.result = Some(result);
    }

    /// Number of requests actually sent.
    pub fn issued(&self) -> usize {
        self.issued
    }
}
