//! Shareable URL codec.
//!
//! State lives in the fragment of the share URL as form-encoded pairs:
//!
//! ```text
//! http://host/#language=csharp&target=il&mode=debug&branch=features~x&code=int+x%3D1%3B
//! ```
//!
//! Pairs are always written in the same order (`language`, `target`, `mode`,
//! `branch`, `code`), so saving the same state twice yields the same URL.

use std::path::PathBuf;

use url::{Url, form_urlencoded};

use crate::config::section::ShareConfig;
use crate::core::{Options, PartialOptions};

/// `{code, options}` as recovered from a URL. Either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlData {
    pub code: Option<String>,
    pub options: PartialOptions,
}

/// The address bar of a session.
pub trait UrlState: Send {
    /// State carried by the current URL, `None` when it carries nothing.
    fn load_from_url(&self) -> Option<UrlData>;

    /// Replace the current URL with one encoding `code` and `options`.
    fn save_to_url(&mut self, code: &str, options: &Options);

    /// The current shareable URL, if one has been set.
    fn current_url(&self) -> Option<String>;
}

pub fn encode_fragment(code: &str, options: &Options) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in options.pairs() {
        serializer.append_pair(key, &value);
    }
    serializer.append_pair("code", code);
    serializer.finish()
}

/// Decode a fragment. Unknown keys and invalid values are skipped.
pub fn decode_fragment(fragment: &str) -> Option<UrlData> {
    let mut data = UrlData::default();

    for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
        if key == "code" {
            data.code = Some(value.into_owned());
            continue;
        }
        if let Err(err) = data.options.insert(&key, &value) {
            crate::debug!("url"; "ignored `{}={}`: {}", key, value, err);
        }
    }

    (data.code.is_some() || !data.options.is_empty()).then_some(data)
}

/// URL codec backed by a share base URL, optionally mirrored to a file.
#[derive(Debug, Clone)]
pub struct AddressBar {
    base: Url,
    current: Option<Url>,
    mirror: Option<PathBuf>,
}

impl AddressBar {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            current: None,
            mirror: None,
        }
    }

    pub fn from_config(share: &ShareConfig) -> Result<Self, url::ParseError> {
        let mut bar = Self::new(Url::parse(&share.base_url)?);
        bar.mirror = share.url_file.clone();
        Ok(bar)
    }

    /// Start from a URL the user opened.
    pub fn with_current(mut self, url: Url) -> Self {
        self.current = Some(url);
        self
    }

    fn write_mirror(&self, url: &Url) {
        let Some(path) = &self.mirror else { return };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            crate::log!("url"; "cannot create `{}`: {}", parent.display(), err);
            return;
        }
        if let Err(err) = std::fs::write(path, format!("{url}\n")) {
            crate::log!("url"; "cannot write `{}`: {}", path.display(), err);
        }
    }
}

impl UrlState for AddressBar {
    fn load_from_url(&self) -> Option<UrlData> {
        self.current
            .as_ref()
            .and_then(Url::fragment)
            .and_then(decode_fragment)
    }

    fn save_to_url(&mut self, code: &str, options: &Options) {
        let mut url = self.base.clone();
        url.set_fragment(Some(&encode_fragment(code, options)));
        crate::debug!("url"; "{}", url);

        self.write_mirror(&url);
        self.current = Some(url);
    }

    fn current_url(&self) -> Option<String> {
        self.current.as_ref().map(Url::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Language, Mode, Target};

    fn bar() -> AddressBar {
        AddressBar::new(Url::parse("http://lab.example/").unwrap())
    }

    #[test]
    fn test_round_trip() {
        let options = Options {
            language: Language::CSharp,
            target: Target::Il,
            ..Options::default()
        };
        let mut bar = bar();
        bar.save_to_url("int x=1;", &options);

        let data = bar.load_from_url().unwrap();
        assert_eq!(data.code.as_deref(), Some("int x=1;"));
        assert_eq!(data.options, PartialOptions::from(&options));
    }

    #[test]
    fn test_save_is_idempotent() {
        let options = Options {
            branch: Some("features~x".into()),
            ..Options::default()
        };
        let mut bar = bar();

        bar.save_to_url("a & b = c#", &options);
        let first = bar.current_url();
        bar.save_to_url("a & b = c#", &options);
        assert_eq!(bar.current_url(), first);
    }

    #[test]
    fn test_fragment_order() {
        let options = Options {
            mode: Mode::Release,
            branch: Some("features~x".into()),
            ..Options::default()
        };
        assert_eq!(
            encode_fragment("int x=1;", &options),
            "language=csharp&target=csharp&mode=release&branch=features%7Ex&code=int+x%3D1%3B"
        );
    }

    #[test]
    fn test_null_branch_omitted() {
        let fragment = encode_fragment("", &Options::default());
        assert!(!fragment.contains("branch"));
    }

    #[test]
    fn test_decode_tolerates_garbage() {
        let data = decode_fragment("language=fsharp&target=il&$$hashKey=1&code=x").unwrap();
        assert_eq!(data.options.language, None);
        assert_eq!(data.options.target, Some(Target::Il));
        assert_eq!(data.code.as_deref(), Some("x"));

        assert_eq!(decode_fragment(""), None);
        assert_eq!(decode_fragment("foo=bar"), None);
    }

    #[test]
    fn test_load_without_fragment() {
        let bar = bar().with_current(Url::parse("http://lab.example/").unwrap());
        assert_eq!(bar.load_from_url(), None);
        assert_eq!(self::bar().load_from_url(), None);
    }

    #[test]
    fn test_mirror_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("url");
        let share = ShareConfig {
            base_url: "http://lab.example/".into(),
            url_file: Some(path.clone()),
        };
        let mut bar = AddressBar::from_config(&share).unwrap();

        bar.save_to_url("x", &Options::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), bar.current_url().unwrap());
    }
}
