//! Caller-supplied settings and read-only site snapshots.
//!
//! The composer never discovers any of this itself; the build driver owns
//! discovery and hands the composer immutable snapshots for the duration of
//! one composition call.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Program-wide settings supplied by the build driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSettings {
    /// Host address the development server binds to.
    pub host: String,

    /// Whether site-relative link prefixing is enabled for this build.
    #[serde(default)]
    pub prefix_links: bool,
}

impl ProgramSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            prefix_links: false,
        }
    }

    /// Enable or disable link prefixing.
    pub fn prefix_links(mut self, enabled: bool) -> Self {
        self.prefix_links = enabled;
        self
    }
}

/// Read-only snapshot of the site's own configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Prefix applied to site-relative links, and to the public path when
    /// prefixing is enabled.
    #[serde(default)]
    pub link_prefix: String,
}

impl SiteConfig {
    pub fn with_link_prefix(prefix: impl Into<String>) -> Self {
        Self {
            link_prefix: prefix.into(),
        }
    }
}

/// A discovered page: a route and the component module that renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub route: String,

    /// Path to the page's component module.
    pub component: PathBuf,
}

impl PageDescriptor {
    pub fn new(route: impl Into<String>, component: impl Into<PathBuf>) -> Self {
        Self {
            route: route.into(),
            component: component.into(),
        }
    }
}

/// Distinct component module paths, sorted so downstream chunk ordering is
/// stable regardless of page discovery order.
pub(crate) fn distinct_components(pages: &[PageDescriptor]) -> Vec<PathBuf> {
    let mut components: Vec<PathBuf> = pages.iter().map(|page| page.component.clone()).collect();
    components.sort();
    components.dedup();
    components
}
