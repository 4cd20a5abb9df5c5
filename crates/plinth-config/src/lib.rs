//! Build configuration composition for the Plinth static-site pipeline.
//!
//! A site is built in five stages — interactive development, a
//! server-rendering development variant, style extraction, HTML pre-render
//! and the production client bundle — and each needs a different combination
//! of entry points, output targets, module rules, plugins and debug settings.
//! This crate computes the complete, declarative [`BuildConfiguration`] for a
//! requested stage; the bundler engine that executes it, the CLI that picks
//! stages and the page-discovery step are external collaborators.

pub mod compose;
pub mod entry;
pub mod error;
pub mod output;
pub mod plugins;
pub mod resolution;
pub mod rules;
pub mod settings;
pub mod stage;

// Re-export main types
pub use compose::{
    compose, BuildConfiguration, Composer, OverrideHook, SourceMapMode, DEFAULT_DEV_PORT,
};
pub use entry::EntryPoints;
pub use error::{ConfigError, Result};
pub use output::{LibraryExport, OutputConfig, CONTENT_HASH_TOKEN, RENDER_DRIVER_FILENAME};
pub use plugins::{
    component_chunk_name, min_chunks_threshold, PluginDescriptor, COMMONS_CHUNK_NAME,
    STATS_FILENAME, STYLESHEET_FILENAME,
};
pub use resolution::{ResolutionConfig, SearchPaths};
pub use rules::{ModuleRule, Transform, DEV_SCOPED_NAME_PATTERN, INLINE_LIMIT_BYTES};
pub use settings::{PageDescriptor, ProgramSettings, SiteConfig};
pub use stage::Stage;
