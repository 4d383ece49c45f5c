//! `playsync share <URL>`: decode a shareable URL.

use anyhow::{Context, Result};
use serde::Serialize;
use url::Url;

use crate::config::{PlaysyncConfig, section::DefaultsConfig};
use crate::core::{Options, merge};
use crate::persist::decode_fragment;

/// State a shareable URL opens with.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SharedState {
    pub code: String,
    pub options: Options,
}

pub fn print_shared_state(url: &str, config: &PlaysyncConfig) -> Result<()> {
    let state = decode_shared_state(url, &config.defaults)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Merge the URL's state over the defaults, as a session would on start.
pub fn decode_shared_state(url: &str, defaults: &DefaultsConfig) -> Result<SharedState> {
    let parsed = Url::parse(url).with_context(|| format!("invalid url `{url}`"))?;
    let data = parsed.fragment().and_then(decode_fragment).unwrap_or_default();

    let options = merge(&defaults.options(), None, Some(&data.options));
    let code = data
        .code
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| defaults.code(options.language));
    Ok(SharedState { code, options })
}
