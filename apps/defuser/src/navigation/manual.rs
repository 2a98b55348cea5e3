//! Reference-manual links.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::api::DEFAULT_MANUAL_URL;
use crate::domain::ModuleType;

/// Characters escaped in a manual page name; non-ASCII is always escaped.
const PAGE_NAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// Builds manual URLs under one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualLinks {
    base_url: String,
}

impl ManualLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn url_for(&self, module_type: ModuleType) -> String {
        manual_url(&self.base_url, module_type)
    }
}

impl Default for ManualLinks {
    fn default() -> Self {
        Self::new(DEFAULT_MANUAL_URL)
    }
}

/// Page URL for a module type: `{base}/{encoded display name}.html`.
pub fn manual_url(base_url: &str, module_type: ModuleType) -> String {
    let page = utf8_percent_encode(module_type.display_name(), PAGE_NAME);
    format!("{}/{page}.html", base_url.trim_end_matches('/'))
}
