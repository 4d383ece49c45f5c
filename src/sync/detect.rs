//! Change detection.
//!
//! Every watched value goes through two states:
//!
//! ```text
//! Unbound ──first update──► Observing ──update(v != last)──► Changed
//!                               │
//!                               └──update(v == last)──► Unchanged
//! ```
//!
//! The first update binds the initial value and is never reported as a
//! change; otherwise installing the startup state would fan out a write
//! and a compile on every launch.

use crate::core::{OptionField, OptionValue, Options};

/// Result of feeding a value to a [`Watched`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// First value seen; recorded, not a change.
    Bound,
    Unchanged,
    Changed,
}

impl Change {
    pub const fn is_genuine(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Last seen value of one watched expression.
#[derive(Debug, Clone)]
pub struct Watched<T> {
    last: Option<T>,
}

impl<T> Default for Watched<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq + Clone> Watched<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: &T) -> Change {
        match &self.last {
            None => {
                self.last = Some(value.clone());
                Change::Bound
            }
            Some(last) if last == value => Change::Unchanged,
            Some(_) => {
                self.last = Some(value.clone());
                Change::Changed
            }
        }
    }
}

/// One watcher per option field.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    fields: [Watched<OptionValue>; OptionField::ALL.len()],
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current options; returns the fields that genuinely changed,
    /// in field order. Each returned field is one fan-out.
    pub fn observe(&mut self, options: &Options) -> Vec<OptionField> {
        OptionField::ALL
            .into_iter()
            .filter(|&field| {
                self.fields[field.index()]
                    .update(&options.get(field))
                    .is_genuine()
            })
            .collect()
    }
}
