//! Option merging with source precedence.
//!
//! ```text
//! defaults  <-  persisted  <-  url        (right wins, per key)
//! ```

use super::options::{Options, PartialOptions};

/// Merge the three option sources into one authoritative value.
///
/// Each key is taken from the highest-precedence source that has it:
/// `url` over `persisted` over `defaults`. Missing sources behave like empty
/// mappings, so the result equals `defaults` when both are absent.
pub fn merge(
    defaults: &Options,
    persisted: Option<&PartialOptions>,
    url: Option<&PartialOptions>,
) -> Options {
    let mut merged = defaults.clone();
    for layer in [persisted, url].into_iter().flatten() {
        merged.overlay(layer);
    }
    merged
}
