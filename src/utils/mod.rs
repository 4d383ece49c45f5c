//! Small shared utilities.

pub mod date;
