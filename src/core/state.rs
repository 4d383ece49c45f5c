//! Selected state of a playground session.
//!
//! Three user-facing parts plus two orchestration fields:
//! - `code`: source text in the editor
//! - `options`: typed compile options (with `branch` as an id projection)
//! - `branch`: pointer into the branch registry
//! - `loading`: a compile request is in flight
//! - `result`: the last compile result (success or synthesized failure)

use std::sync::Arc;

use super::options::Options;
use crate::branch::Branch;
use crate::compile::CompileResult;

#[derive(Debug, Clone, Default)]
pub struct SelectedState {
    pub code: String,
    pub options: Options,
    /// Selected branch; `options.branch` mirrors its id.
    pub branch: Option<Arc<Branch>>,
    /// Single-flight guard: at most one compile request in flight.
    pub loading: bool,
    pub result: Option<CompileResult>,
}

impl SelectedState {
    pub fn new(code: impl Into<String>, options: Options) -> Self {
        Self {
            code: code.into(),
            options,
            ..Self::default()
        }
    }

    /// Id of the selected branch, if any.
    pub fn branch_id(&self) -> Option<String> {
        self.branch.as_ref().map(|b| b.id.clone())
    }

    /// Compile service override of the selected branch.
    pub fn branch_url(&self) -> Option<&str> {
        self.branch.as_ref().map(|b| b.url.as_str())
    }
}
