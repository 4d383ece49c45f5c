//! Fan-out of one genuine change.
//!
//! Always in this order, always over the current full state:
//!
//! 1. URL write
//! 2. store write (failures are logged, never abort)
//! 3. compile trigger (fired, not awaited)

use super::session::Session;
use crate::compile::Trigger;

impl Session {
    pub(super) fn on_genuine_change(&mut self) -> Trigger {
        self.sync_stores();
        self.orchestrator.trigger(&mut self.state, None)
    }

    /// Write the current state to the URL and the store.
    pub(super) fn sync_stores(&mut self) {
        self.url.save_to_url(&self.state.code, &self.state.options);

        if let Err(err) = self.store.save(&self.state.options) {
            crate::log!("store"; "{:#}", anyhow::Error::from(err));
        }
    }
}
