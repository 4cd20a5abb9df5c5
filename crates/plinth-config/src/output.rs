//! Output planning: where and how artifacts are written per stage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::settings::{ProgramSettings, SiteConfig};
use crate::stage::Stage;

/// Filename token the bundler replaces with a digest of the chunk contents,
/// enabling long-term caching of unchanged bundles.
pub const CONTENT_HASH_TOKEN: &str = "[contenthash]";

/// Fixed filename of the pre-render driver bundle. The downstream render step
/// loads it by this exact name and deletes it afterwards, so it must never be
/// hashed.
pub const RENDER_DRIVER_FILENAME: &str = "render-page.js";

/// Module wrapper emitted around an output bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryExport {
    /// Universal wrapper: loadable as a module and callable as a render
    /// function by the external render driver.
    Umd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory artifacts are written to.
    pub path: PathBuf,

    /// Filename pattern for emitted bundles.
    pub filename: String,

    /// Base URL or path emitted artifacts are served from.
    pub public_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_export: Option<LibraryExport>,
}

pub(crate) fn plan_output(
    stage: Stage,
    directory: &Path,
    program: &ProgramSettings,
    site: &SiteConfig,
    port: u16,
) -> OutputConfig {
    match stage {
        // Development bundles are served from memory and never shipped, so
        // filenames stay fixed and the public path points at the dev server.
        Stage::Develop | Stage::DevelopHtml => OutputConfig {
            path: directory.to_path_buf(),
            filename: "[name].js".to_string(),
            public_path: format!("http://{}:{}/", program.host, port),
            library_export: None,
        },
        Stage::BuildCss => OutputConfig {
            path: directory.join("public"),
            filename: "bundle-for-css.js".to_string(),
            public_path: site_public_path(program, site),
            library_export: None,
        },
        Stage::BuildHtml => OutputConfig {
            path: directory.join("public"),
            filename: RENDER_DRIVER_FILENAME.to_string(),
            public_path: site_public_path(program, site),
            library_export: Some(LibraryExport::Umd),
        },
        Stage::BuildJavascript => OutputConfig {
            path: directory.join("public"),
            filename: format!("[name]-{CONTENT_HASH_TOKEN}.js"),
            public_path: site_public_path(program, site),
            library_export: None,
        },
    }
}

/// Read from the site snapshot at call time so a prefix change between
/// compositions is honored.
fn site_public_path(program: &ProgramSettings, site: &SiteConfig) -> String {
    if program.prefix_links {
        format!("{}/", site.link_prefix)
    } else {
        "/".to_string()
    }
}
