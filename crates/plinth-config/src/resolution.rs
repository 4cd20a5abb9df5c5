//! Search-path planning for source modules and for transformation-rule
//! implementations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tiered search paths: `roots` are scanned in order before falling back to
/// the `dependency_dirs`, also in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPaths {
    pub roots: Vec<PathBuf>,
    pub dependency_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Where source modules are looked up.
    pub modules: SearchPaths,

    /// Where transformation-rule implementations are looked up.
    pub transforms: SearchPaths,
}

/// Site-local code always shadows framework-provided defaults, so site
/// directories come first in every tier.
pub(crate) fn plan_resolution(directory: &Path, framework_dir: &Path) -> ResolutionConfig {
    let dependency_dirs = vec![
        directory.join("node_modules"),
        framework_dir.join("node_modules"),
    ];

    ResolutionConfig {
        modules: SearchPaths {
            roots: vec![directory.to_path_buf(), framework_dir.join("isomorphic")],
            dependency_dirs: dependency_dirs.clone(),
        },
        transforms: SearchPaths {
            roots: vec![directory.join("loaders"), framework_dir.join("loaders")],
            dependency_dirs,
        },
    }
}
