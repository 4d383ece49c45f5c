//! Command-line interface module.

mod args;
pub mod branches;
mod common;
pub mod session;
pub mod share;

pub use args::{Cli, Commands};
