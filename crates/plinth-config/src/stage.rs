//! Build stages and stage-token resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// The five build stages the composer supports.
///
/// A stage is chosen once per composition call and never mutated. The
/// `develop-html` stage is an alias of `develop` for every planner except the
/// module-rule table: it produces the same entries, output and plugin chain,
/// but its script rule compiles without the hot-swap wiring so the bundle can
/// run outside a live browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Interactive development with live reload.
    Develop,
    /// Development variant used while server-rendering HTML.
    DevelopHtml,
    /// Style-extraction pass.
    BuildCss,
    /// HTML pre-render pass.
    BuildHtml,
    /// Production client-bundle pass.
    BuildJavascript,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 5] = [
        Stage::Develop,
        Stage::DevelopHtml,
        Stage::BuildCss,
        Stage::BuildHtml,
        Stage::BuildJavascript,
    ];

    /// Resolve a stage token from the build driver.
    ///
    /// Fails with [`ConfigError::UnknownStage`] before any planner runs, so an
    /// invalid token can never produce a partial configuration.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "develop" => Ok(Stage::Develop),
            "develop-html" => Ok(Stage::DevelopHtml),
            "build-css" => Ok(Stage::BuildCss),
            "build-html" => Ok(Stage::BuildHtml),
            "build-javascript" => Ok(Stage::BuildJavascript),
            other => Err(ConfigError::UnknownStage(other.to_string())),
        }
    }

    /// The token accepted by [`Stage::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Develop => "develop",
            Stage::DevelopHtml => "develop-html",
            Stage::BuildCss => "build-css",
            Stage::BuildHtml => "build-html",
            Stage::BuildJavascript => "build-javascript",
        }
    }

    /// Whether this stage is `develop` or its server-rendering alias.
    pub fn is_develop(&self) -> bool {
        matches!(self, Stage::Develop | Stage::DevelopHtml)
    }

    /// Default mode label injected into output code when `NODE_ENV` is unset.
    pub fn default_node_env(&self) -> &'static str {
        if self.is_develop() { "development" } else { "production" }
    }
}

impl FromStr for Stage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Stage::parse(s)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
