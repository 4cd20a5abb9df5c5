//! Configuration composition: assembling the per-stage [`BuildConfiguration`].
//!
//! Composition is a pure, synchronous computation. Every planner produces its
//! slice of the configuration from the resolved stage and the caller-supplied
//! snapshots; the slices are merged, the optional override hook runs, and the
//! finished value is handed back to the external build driver. Nothing is
//! cached across calls.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::{plan_entries, EntryPoints};
use crate::error::{ConfigError, Result};
use crate::output::{plan_output, OutputConfig};
use crate::plugins::{plan_plugins, PluginDescriptor};
use crate::resolution::{plan_resolution, ResolutionConfig};
use crate::rules::{plan_module_rules, ModuleRule};
use crate::settings::{PageDescriptor, ProgramSettings, SiteConfig};
use crate::stage::Stage;

/// Default port for the development server.
pub const DEFAULT_DEV_PORT: u16 = 1500;

/// Debug-information setting for emitted bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// No source maps.
    #[default]
    None,
    /// Fast eval-based mappings for development.
    Eval,
    /// External `.map` files.
    File,
}

/// The assembled, declarative build configuration.
///
/// Purely descriptive: the external bundler engine executes it and performs
/// all file I/O. Composing twice with identical inputs yields a structurally
/// identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    /// Base directory compilation is relative to (the site directory).
    pub context: PathBuf,
    pub entry: EntryPoints,
    pub output: OutputConfig,
    pub module_rules: Vec<ModuleRule>,
    pub plugins: Vec<PluginDescriptor>,
    pub resolution: ResolutionConfig,
    pub source_maps: SourceMapMode,
}

impl BuildConfiguration {
    /// Convert to `serde_json::Value`, the shape override hooks operate on.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Rebuild from a `serde_json::Value`.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Site-supplied function allowed to rewrite the fully assembled
/// configuration before the build driver uses it.
///
/// The hook receives the configuration as a JSON object plus the resolved
/// stage, and must return an object.
pub type OverrideHook = dyn Fn(Value, Stage) -> Value;

/// Builder for one composition call.
///
/// # Example
///
/// ```
/// use plinth_config::{Composer, ProgramSettings, SiteConfig};
///
/// let program = ProgramSettings::new("localhost");
/// let site = SiteConfig::default();
///
/// let config = Composer::new(&program, &site, "/tmp/site")
///     .port(1500)
///     .compose("develop")
///     .unwrap();
///
/// assert_eq!(config.output.public_path, "http://localhost:1500/");
/// ```
pub struct Composer<'a> {
    program: &'a ProgramSettings,
    site: &'a SiteConfig,
    directory: PathBuf,
    framework_dir: PathBuf,
    port: u16,
    pages: &'a [PageDescriptor],
    override_hook: Option<&'a OverrideHook>,
}

impl<'a> Composer<'a> {
    pub fn new(
        program: &'a ProgramSettings,
        site: &'a SiteConfig,
        directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program,
            site,
            directory: directory.into(),
            framework_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            port: DEFAULT_DEV_PORT,
            pages: &[],
            override_hook: None,
        }
    }

    /// Port the development server listens on.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Pages discovered ahead of composition.
    pub fn pages(mut self, pages: &'a [PageDescriptor]) -> Self {
        self.pages = pages;
        self
    }

    /// Directory holding the framework's bundled isomorphic modules, loader
    /// defaults and the render driver. Defaults to this crate's install
    /// directory.
    pub fn framework_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.framework_dir = dir.into();
        self
    }

    /// Install a site-supplied override hook. Absent by default, in which
    /// case the assembled configuration is returned unchanged.
    pub fn override_hook(mut self, hook: &'a OverrideHook) -> Self {
        self.override_hook = Some(hook);
        self
    }

    /// Compose the full configuration for the requested stage token.
    pub fn compose(&self, stage_token: &str) -> Result<BuildConfiguration> {
        let stage = Stage::parse(stage_token)?;
        tracing::debug!("composing build configuration for stage `{stage}`");

        let node_env = effective_node_env(stage, env::var("NODE_ENV").ok());

        let config = BuildConfiguration {
            context: self.directory.clone(),
            entry: plan_entries(
                stage,
                &self.directory,
                &self.framework_dir,
                self.program,
                self.port,
            ),
            output: plan_output(stage, &self.directory, self.program, self.site, self.port),
            module_rules: plan_module_rules(stage),
            plugins: plan_plugins(stage, &node_env, self.program, self.site, self.pages),
            resolution: plan_resolution(&self.directory, &self.framework_dir),
            source_maps: source_map_mode(stage),
        };

        tracing::trace!(
            "assembled {} module rules and {} plugins for `{stage}`",
            config.module_rules.len(),
            config.plugins.len(),
        );

        apply_override(config, stage, self.override_hook)
    }
}

/// Compose the build configuration for one stage.
///
/// Convenience wrapper over [`Composer`] for callers that don't need an
/// override hook or a custom framework directory.
///
/// # Example
///
/// ```
/// use plinth_config::{compose, ProgramSettings, SiteConfig};
///
/// let program = ProgramSettings::new("localhost");
/// let site = SiteConfig::default();
/// let config = compose(&program, &site, "/tmp/site", "build-css", 1500, &[]).unwrap();
///
/// assert_eq!(config.output.filename, "bundle-for-css.js");
/// ```
pub fn compose(
    program: &ProgramSettings,
    site: &SiteConfig,
    directory: impl Into<PathBuf>,
    stage_token: &str,
    port: u16,
    pages: &[PageDescriptor],
) -> Result<BuildConfiguration> {
    Composer::new(program, site, directory)
        .port(port)
        .pages(pages)
        .compose(stage_token)
}

/// Effective mode label: the process-wide `NODE_ENV` wins, otherwise the
/// stage default.
fn effective_node_env(stage: Stage, env_override: Option<String>) -> String {
    env_override.unwrap_or_else(|| stage.default_node_env().to_string())
}

fn source_map_mode(stage: Stage) -> SourceMapMode {
    match stage {
        Stage::Develop | Stage::DevelopHtml => SourceMapMode::Eval,
        Stage::BuildCss | Stage::BuildHtml => SourceMapMode::None,
        Stage::BuildJavascript => SourceMapMode::File,
    }
}

fn apply_override(
    config: BuildConfiguration,
    stage: Stage,
    hook: Option<&OverrideHook>,
) -> Result<BuildConfiguration> {
    let Some(hook) = hook else {
        return Ok(config);
    };

    let rewritten = hook(config.to_value()?, stage);
    if !rewritten.is_object() {
        return Err(ConfigError::OverrideNotAnObject {
            stage,
            received: value_kind(&rewritten).to_string(),
        });
    }

    serde_json::from_value(rewritten).map_err(|e| ConfigError::OverrideInvalid {
        stage,
        message: e.to_string(),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
