//! Core types shared by every layer of the sync engine.
//!
//! - `options` - typed option schema, fields and values
//! - `merge` - defaults/persisted/url precedence
//! - `state` - the selected state owned by a session

pub mod merge;
pub mod options;
pub mod state;

pub use merge::merge;
pub use options::{Language, Mode, OptionField, OptionValue, Options, PartialOptions, Target};
pub use state::SelectedState;
