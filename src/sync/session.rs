//! A playground session.
//!
//! The session owns the selected state and every collaborator that reads
//! or writes it. Mutations go through its methods, each of which ends in a
//! digest: one pass of the watchers that turns genuine changes into
//! fan-outs.
//!
//! ```text
//! set_option / select_branch / reset_options
//!         │
//!         ▼
//!      digest ──► branch watcher ──► options.branch = id
//!         │
//!         └─────► option watchers ──► on_genuine_change (per field)
//! ```

use std::sync::Arc;

use thiserror::Error;

use super::detect::{ChangeDetector, Watched};
use crate::branch::BranchRegistry;
use crate::compile::{
    CompilationService, CompileOutcome, Completion, Orchestrator, Trigger, to_annotations,
};
use crate::config::section::DefaultsConfig;
use crate::core::{OptionField, OptionValue, SelectedState, merge};
use crate::editor::EditorSurface;
use crate::persist::{OptionStore, UrlState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown branch `{0}`")]
    UnknownBranch(String),
}

/// Everything a session is built from.
pub struct SessionParts {
    pub defaults: DefaultsConfig,
    pub registry: BranchRegistry,
    pub url: Box<dyn UrlState>,
    pub store: Box<dyn OptionStore>,
    pub service: Arc<dyn CompilationService>,
    pub editor: Arc<dyn EditorSurface>,
}

pub struct Session {
    pub(super) state: SelectedState,
    pub(super) defaults: DefaultsConfig,
    pub(super) registry: BranchRegistry,
    pub(super) options_watch: ChangeDetector,
    pub(super) branch_watch: Watched<Option<String>>,
    pub(super) url: Box<dyn UrlState>,
    pub(super) store: Box<dyn OptionStore>,
    pub(super) orchestrator: Orchestrator,
    pub(super) editor: Arc<dyn EditorSurface>,
}

impl Session {
    /// Install the startup state and bind the watchers.
    ///
    /// Options come from the URL, or from the store when the URL carries
    /// none, over the defaults. Nothing is compiled: binding is not a change.
    pub fn start(parts: SessionParts) -> Self {
        let from_url = parts.url.load_from_url().unwrap_or_default();
        let persisted = if from_url.options.is_empty() {
            parts.store.load()
        } else {
            None
        };

        let options = merge(
            &parts.defaults.options(),
            persisted.as_ref(),
            Some(&from_url.options),
        );
        let code = from_url
            .code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| parts.defaults.code(options.language));

        let mut session = Self {
            state: SelectedState::new(code, options),
            defaults: parts.defaults,
            registry: parts.registry,
            options_watch: ChangeDetector::new(),
            branch_watch: Watched::new(),
            url: parts.url,
            store: parts.store,
            orchestrator: Orchestrator::new(parts.service),
            editor: parts.editor,
        };
        session.bind();
        session
    }

    fn bind(&mut self) {
        if let Some(id) = self.state.options.branch.clone() {
            match self.registry.resolve(&id) {
                Some(branch) => self.state.branch = Some(branch),
                None => {
                    crate::debug!("session"; "branch `{}` no longer exists, cleared", id);
                    self.state.options.branch = None;
                    // The store holds the branch too, so it is re-synced with the URL
                    self.sync_stores();
                }
            }
        }

        self.branch_watch.update(&self.state.branch_id());
        self.options_watch.observe(&self.state.options);
    }

    /// Run the watchers over the current state; fans out once per changed
    /// option field and returns those fields.
    pub fn digest(&mut self) -> Vec<OptionField> {
        let branch_id = self.state.branch_id();
        if self.branch_watch.update(&branch_id).is_genuine() {
            self.state.options.branch = branch_id;
        }

        let changed = self.options_watch.observe(&self.state.options);
        for field in &changed {
            crate::debug!("session"; "{} -> {}", field, self.state.options.get(*field));
            self.on_genuine_change();
        }
        changed
    }

    /// Edit one option. A branch value goes through branch selection.
    pub fn set_option(&mut self, value: OptionValue) -> Result<Vec<OptionField>, SessionError> {
        match value {
            OptionValue::Branch(id) => self.select_branch(id.as_deref()),
            value => {
                self.state.options.set(value);
                Ok(self.digest())
            }
        }
    }

    /// Select a branch by id, or clear the selection.
    pub fn select_branch(&mut self, id: Option<&str>) -> Result<Vec<OptionField>, SessionError> {
        self.state.branch = match id {
            Some(id) => Some(
                self.registry
                    .resolve(id)
                    .ok_or_else(|| SessionError::UnknownBranch(id.to_string()))?,
            ),
            None => None,
        };
        Ok(self.digest())
    }

    /// Reset every option to its default, keeping the branch selection.
    pub fn reset_options(&mut self) -> Vec<OptionField> {
        let branch = self.state.options.branch.take();
        self.state.options = self.defaults.options();
        self.state.options.branch = branch;
        self.digest()
    }

    /// Compile-and-lint on behalf of the editor: store the code, update the
    /// URL and compile; the result is pushed back as annotations.
    pub fn process(&mut self, code: impl Into<String>) -> Trigger {
        self.state.code = code.into();
        self.url.save_to_url(&self.state.code, &self.state.options);

        let editor = Arc::clone(&self.editor);
        let code = self.state.code.clone();
        let completion: Completion = Box::new(move |result| {
            editor.update_linting(&code, &to_annotations(&result.errors, &result.warnings));
        });
        self.orchestrator.trigger(&mut self.state, Some(completion))
    }

    /// Wait for the outstanding compile request.
    pub async fn next_outcome(&mut self) -> Option<CompileOutcome> {
        self.orchestrator.next_outcome().await
    }

    pub fn complete(&mut self, outcome: CompileOutcome) {
        self.orchestrator.complete(&mut self.state, outcome);
    }

    /// Complete the outstanding request, if any.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while self.state.loading {
            match self.next_outcome().await {
                Some(outcome) => self.complete(outcome),
                None => break,
            }
        }
    }

    pub fn state(&self) -> &SelectedState {
        &self.state
    }

    pub fn registry(&self) -> &BranchRegistry {
        &self.registry
    }

    pub fn share_url(&self) -> Option<String> {
        self.url.current_url()
    }

    /// Compile requests sent so far.
    pub fn issued(&self) -> usize {
        self.orchestrator.issued()
    }
}
