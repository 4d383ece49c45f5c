//! State that outlives a session: the share URL and remembered options.

pub mod remember;
pub mod url;

pub use remember::{OptionStore, RememberStore, StoreError};
pub use url::{AddressBar, UrlData, UrlState, decode_fragment, encode_fragment};
