//! State synchronization: change detection, fan-out and the session that
//! ties them together.

pub mod detect;
mod fanout;
pub mod session;

pub use session::{Session, SessionError, SessionParts};
