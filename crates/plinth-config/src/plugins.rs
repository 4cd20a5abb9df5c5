//! Plugin-chain planning: the ordered build-time plugin descriptors per stage.
//!
//! Descriptors are pure data (name plus parameters). The adapter that turns
//! them into live bundler plugins is an external collaborator, which keeps
//! configuration decisions separate from bundler execution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::output::RENDER_DRIVER_FILENAME;
use crate::settings::{distinct_components, PageDescriptor, ProgramSettings, SiteConfig};
use crate::stage::Stage;

/// Conventional name of the single extracted stylesheet artifact.
pub const STYLESHEET_FILENAME: &str = "styles.css";

/// Name of the build-stats artifact consumed by downstream tooling.
pub const STATS_FILENAME: &str = "stats.json";

/// Name of the always-loaded shared chunk.
pub const COMMONS_CHUNK_NAME: &str = "commons";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum PluginDescriptor {
    /// Substitute environment values into output code.
    DefineEnvironment {
        node_env: String,
        prefix_links: bool,
        link_prefix: String,
    },
    /// Keep module ordering stable across rebuilds.
    DeterministicModuleOrder,
    /// Swap changed modules into the running page without a reload.
    HotSwap,
    /// Keep the previous bundle in place when a compile fails.
    SkipEmitOnError,
    /// Write all extracted styles into one physical stylesheet.
    ExtractStylesheet { filename: String },
    /// Pre-render every route to static HTML through the render driver bundle.
    StaticSiteGeneration {
        render_driver: String,
        routes: Vec<String>,
    },
    /// Drop the bundled locale data of a large date library.
    IgnoreLocaleData { package: String },
    /// Derive module identifiers from content hashes so unchanged modules
    /// keep their identity across builds.
    ContentHashModuleIds,
    /// Collapse duplicated modules.
    DeduplicateModules,
    /// Extract modules shared between the app entry and page-template chunks.
    CommonsChunk {
        #[serde(rename = "chunk-name")]
        name: String,
        members: Vec<String>,
        min_chunks: usize,
    },
    /// Emit an offline-cache manifest for the generated bundles.
    OfflineCacheManifest,
    /// Minify emitted bundles.
    Minify,
    /// Write bundler statistics for downstream tooling.
    EmitBuildStats { filename: String },
}

/// Minimum number of member chunks that must share a module before it is
/// pulled into the commons chunk.
///
/// Grows with the page-template count, so the bar for the always-loaded
/// bundle rises as a site gains templates. Most visits touch few pages, so a
/// small shared bundle beats avoiding per-page duplication.
pub fn min_chunks_threshold(distinct_components: usize) -> usize {
    distinct_components / 2
}

/// Deterministic chunk name for a page-template component module.
pub fn component_chunk_name(component: &Path) -> String {
    let slug: String = component
        .to_string_lossy()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    format!("component---{}", slug.trim_matches('-'))
}

pub(crate) fn plan_plugins(
    stage: Stage,
    node_env: &str,
    program: &ProgramSettings,
    site: &SiteConfig,
    pages: &[PageDescriptor],
) -> Vec<PluginDescriptor> {
    let mut plugins = vec![PluginDescriptor::DefineEnvironment {
        node_env: node_env.to_string(),
        prefix_links: program.prefix_links,
        link_prefix: site.link_prefix.clone(),
    }];

    match stage {
        Stage::Develop | Stage::DevelopHtml => {
            plugins.push(PluginDescriptor::DeterministicModuleOrder);
            plugins.push(PluginDescriptor::HotSwap);
            plugins.push(PluginDescriptor::SkipEmitOnError);
        }
        Stage::BuildCss => {
            plugins.push(PluginDescriptor::ExtractStylesheet {
                filename: STYLESHEET_FILENAME.to_string(),
            });
        }
        Stage::BuildHtml => {
            plugins.push(PluginDescriptor::ExtractStylesheet {
                filename: STYLESHEET_FILENAME.to_string(),
            });
            plugins.push(PluginDescriptor::StaticSiteGeneration {
                render_driver: RENDER_DRIVER_FILENAME.to_string(),
                routes: pages.iter().map(|page| page.route.clone()).collect(),
            });
        }
        Stage::BuildJavascript => {
            let components = distinct_components(pages);

            let mut members = Vec::with_capacity(components.len() + 1);
            members.push("app".to_string());
            members.extend(components.iter().map(|c| component_chunk_name(c)));

            plugins.push(PluginDescriptor::IgnoreLocaleData {
                package: "moment".to_string(),
            });
            plugins.push(PluginDescriptor::ContentHashModuleIds);
            plugins.push(PluginDescriptor::DeduplicateModules);
            plugins.push(PluginDescriptor::DeterministicModuleOrder);
            plugins.push(PluginDescriptor::CommonsChunk {
                name: COMMONS_CHUNK_NAME.to_string(),
                members,
                min_chunks: min_chunks_threshold(components.len()),
            });
            plugins.push(PluginDescriptor::OfflineCacheManifest);
            plugins.push(PluginDescriptor::Minify);
            plugins.push(PluginDescriptor::EmitBuildStats {
                filename: STATS_FILENAME.to_string(),
            });
        }
    }

    plugins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(stage: Stage, pages: &[PageDescriptor]) -> Vec<PluginDescriptor> {
        plan_plugins(
            stage,
            stage.default_node_env(),
            &ProgramSettings::new("localhost"),
            &SiteConfig::default(),
            pages,
        )
    }

    #[test]
    fn min_chunks_threshold_halves_rounding_down() {
        assert_eq!(min_chunks_threshold(0), 0);
        assert_eq!(min_chunks_threshold(1), 0);
        assert_eq!(min_chunks_threshold(4), 2);
        assert_eq!(min_chunks_threshold(5), 2);
    }

    #[test]
    fn component_chunk_names_are_stable_slugs() {
        let name = component_chunk_name(Path::new("src/templates/Blog Post.js"));
        assert_eq!(name, "component---src-templates-blog-post-js");
        assert_eq!(
            name,
            component_chunk_name(Path::new("src/templates/Blog Post.js"))
        );
    }

    #[test]
    fn every_stage_defines_the_environment_first() {
        for stage in Stage::ALL {
            let plugins = plan(stage, &[]);
            assert!(matches!(
                plugins[0],
                PluginDescriptor::DefineEnvironment { .. }
            ));
        }
    }

    #[test]
    fn define_environment_reads_the_site_snapshot() {
        let plugins = plan_plugins(
            Stage::BuildJavascript,
            "production",
            &ProgramSettings::new("localhost").prefix_links(true),
            &SiteConfig::with_link_prefix("/blog"),
            &[],
        );
        assert_eq!(
            plugins[0],
            PluginDescriptor::DefineEnvironment {
                node_env: "production".to_string(),
                prefix_links: true,
                link_prefix: "/blog".to_string(),
            }
        );
    }

    #[test]
    fn develop_stages_wire_hot_swap_and_error_suppression() {
        for stage in [Stage::Develop, Stage::DevelopHtml] {
            let plugins = plan(stage, &[]);
            assert!(plugins.contains(&PluginDescriptor::HotSwap));
            assert!(plugins.contains(&PluginDescriptor::SkipEmitOnError));
            assert!(plugins.contains(&PluginDescriptor::DeterministicModuleOrder));
        }
    }

    #[test]
    fn extraction_stages_write_the_conventional_stylesheet() {
        for stage in [Stage::BuildCss, Stage::BuildHtml] {
            let plugins = plan(stage, &[]);
            assert!(plugins.contains(&PluginDescriptor::ExtractStylesheet {
                filename: STYLESHEET_FILENAME.to_string()
            }));
        }
    }

    #[test]
    fn build_html_generates_static_pages_for_every_route() {
        let pages = vec![
            PageDescriptor::new("/", "src/pages/index.js"),
            PageDescriptor::new("/about", "src/pages/about.js"),
        ];

        let plugins = plan(Stage::BuildHtml, &pages);
        assert!(plugins.contains(&PluginDescriptor::StaticSiteGeneration {
            render_driver: RENDER_DRIVER_FILENAME.to_string(),
            routes: vec!["/".to_string(), "/about".to_string()],
        }));
    }

    #[test]
    fn commons_chunk_members_collapse_duplicate_components() {
        let pages = vec![
            PageDescriptor::new("/a", "A"),
            PageDescriptor::new("/b", "B"),
            PageDescriptor::new("/c", "A"),
        ];

        let plugins = plan(Stage::BuildJavascript, &pages);
        let commons = plugins
            .iter()
            .find_map(|plugin| match plugin {
                PluginDescriptor::CommonsChunk {
                    name,
                    members,
                    min_chunks,
                } => Some((name.clone(), members.clone(), *min_chunks)),
                _ => None,
            })
            .expect("build-javascript plans a commons chunk");

        assert_eq!(commons.0, COMMONS_CHUNK_NAME);
        assert_eq!(
            commons.1,
            vec![
                "app".to_string(),
                "component---a".to_string(),
                "component---b".to_string(),
            ]
        );
        assert_eq!(commons.2, 1);
    }

    #[test]
    fn build_javascript_carries_the_production_chain() {
        let plugins = plan(Stage::BuildJavascript, &[]);
        assert!(plugins.contains(&PluginDescriptor::IgnoreLocaleData {
            package: "moment".to_string()
        }));
        assert!(plugins.contains(&PluginDescriptor::ContentHashModuleIds));
        assert!(plugins.contains(&PluginDescriptor::DeduplicateModules));
        assert!(plugins.contains(&PluginDescriptor::OfflineCacheManifest));
        assert!(plugins.contains(&PluginDescriptor::Minify));
        assert!(plugins.contains(&PluginDescriptor::EmitBuildStats {
            filename: STATS_FILENAME.to_string()
        }));
    }
}
