//! Module-rule planning: which source-to-artifact transformation applies to
//! which modules, per stage.
//!
//! Rules are declarative descriptors. The external bundler adapter maps each
//! [`Transform`] onto its concrete implementation; this crate only decides
//! which chain applies and why.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Assets at or below this size are inlined into the referencing bundle;
/// larger ones are emitted as standalone files.
pub const INLINE_LIMIT_BYTES: u64 = 10_000;

/// Scoped class-name pattern used during development. Keeps the component
/// name readable in devtools instead of an opaque hash.
pub const DEV_SCOPED_NAME_PATTERN: &str = "[name]---[local]---[hash:base64:5]";

/// One step in a rule's transformation chain, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Transform {
    /// Compile script sources through the project compiler toolchain.
    CompileScript,
    /// Wrap compiled modules so they can be swapped into a running page.
    HotSwapScript,
    /// Parse JSON sources into importable modules.
    Json,
    /// Inline the asset as a data URI when at or below `limit_bytes`, emit a
    /// standalone file otherwise.
    InlineOrEmit { limit_bytes: u64 },
    /// Always emit the asset as a standalone file.
    EmitFile,
    /// Inject parsed styles into the document at runtime.
    InjectStyles,
    /// Parse a stylesheet, optionally rewriting class names to be unique per
    /// source file (`modules`).
    ParseCss {
        modules: bool,
        minimize: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        scoped_name_pattern: Option<String>,
    },
    /// Run the stylesheet postprocessing pipeline.
    PostprocessCss,
    /// Route the chain's result into the single extracted stylesheet artifact.
    ExtractIntoStylesheet,
    /// Satisfy the import but emit nothing.
    Discard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRule {
    /// Regex matched against the module path.
    pub test: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    pub transforms: Vec<Transform>,
}

impl ModuleRule {
    fn new(test: &str, transforms: Vec<Transform>) -> Self {
        Self {
            test: test.to_string(),
            exclude: None,
            transforms,
        }
    }

    fn excluding(mut self, pattern: &str) -> Self {
        self.exclude = Some(pattern.to_string());
        self
    }
}

pub(crate) fn plan_module_rules(stage: Stage) -> Vec<ModuleRule> {
    vec![
        script_rule(stage),
        ModuleRule::new(r"\.json$", vec![Transform::Json]),
        ModuleRule::new(
            r"\.(jpe?g|png|gif|svg)$",
            vec![Transform::InlineOrEmit {
                limit_bytes: INLINE_LIMIT_BYTES,
            }],
        ),
        ModuleRule::new(
            r"\.woff$",
            vec![Transform::InlineOrEmit {
                limit_bytes: INLINE_LIMIT_BYTES,
            }],
        ),
        ModuleRule::new(r"\.(ttf|otf|eot|woff2)$", vec![Transform::EmitFile]),
        plain_css_rule(stage),
        scoped_css_rule(stage),
    ]
}

fn script_rule(stage: Stage) -> ModuleRule {
    // Only `develop` proper carries the hot-swap wiring; its server-rendering
    // alias compiles the same sources without it.
    let transforms = if stage == Stage::Develop {
        vec![Transform::HotSwapScript, Transform::CompileScript]
    } else {
        vec![Transform::CompileScript]
    };

    ModuleRule::new(r"\.jsx?$", transforms).excluding("node_modules")
}

fn plain_css_rule(stage: Stage) -> ModuleRule {
    let transforms = match stage {
        Stage::Develop | Stage::DevelopHtml => vec![
            Transform::InjectStyles,
            parse_css(false, false, None),
            Transform::PostprocessCss,
        ],
        Stage::BuildCss => vec![
            Transform::ExtractIntoStylesheet,
            parse_css(false, true, None),
            Transform::PostprocessCss,
        ],
        // The extraction pass already produced these bytes; re-emitting them
        // here would ship the stylesheet twice.
        Stage::BuildHtml | Stage::BuildJavascript => vec![Transform::Discard],
    };

    ModuleRule::new(r"\.css$", transforms).excluding(r"\.module\.css$")
}

fn scoped_css_rule(stage: Stage) -> ModuleRule {
    // Scoped class names are referenced by server-rendered markup and by
    // runtime code, so this rule is never a no-op.
    let transforms = match stage {
        Stage::Develop | Stage::DevelopHtml => vec![
            Transform::InjectStyles,
            parse_css(true, false, Some(DEV_SCOPED_NAME_PATTERN.to_string())),
            Transform::PostprocessCss,
        ],
        Stage::BuildCss | Stage::BuildHtml | Stage::BuildJavascript => vec![
            Transform::ExtractIntoStylesheet,
            parse_css(true, true, None),
            Transform::PostprocessCss,
        ],
    };

    ModuleRule::new(r"\.module\.css$", transforms)
}

fn parse_css(modules: bool, minimize: bool, scoped_name_pattern: Option<String>) -> Transform {
    Transform::ParseCss {
        modules,
        minimize,
        scoped_name_pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for<'a>(rules: &'a [ModuleRule], test: &str) -> &'a ModuleRule {
        rules
            .iter()
            .find(|rule| rule.test == test)
            .unwrap_or_else(|| panic!("no rule with test {test}"))
    }

    fn plain_css(stage: Stage) -> ModuleRule {
        rule_for(&plan_module_rules(stage), r"\.css$").clone()
    }

    fn scoped_css(stage: Stage) -> ModuleRule {
        rule_for(&plan_module_rules(stage), r"\.module\.css$").clone()
    }

    #[test]
    fn scripts_compile_outside_the_dependency_directory() {
        for stage in Stage::ALL {
            let rules = plan_module_rules(stage);
            let script = rule_for(&rules, r"\.jsx?$");
            assert_eq!(script.exclude.as_deref(), Some("node_modules"));
            assert!(script.transforms.contains(&Transform::CompileScript));
        }
    }

    #[test]
    fn only_develop_proper_hot_swaps_scripts() {
        for stage in Stage::ALL {
            let rules = plan_module_rules(stage);
            let script = rule_for(&rules, r"\.jsx?$");
            let hot = script.transforms.contains(&Transform::HotSwapScript);
            assert_eq!(hot, stage == Stage::Develop, "stage {stage}");
        }
    }

    #[test]
    fn develop_injects_plain_styles_at_runtime() {
        for stage in [Stage::Develop, Stage::DevelopHtml] {
            let rule = plain_css(stage);
            assert_eq!(rule.transforms[0], Transform::InjectStyles);
        }
    }

    #[test]
    fn extraction_stages_never_inject_plain_styles() {
        for stage in [Stage::BuildCss, Stage::BuildHtml, Stage::BuildJavascript] {
            let rule = plain_css(stage);
            assert!(!rule.transforms.contains(&Transform::InjectStyles));
        }
    }

    #[test]
    fn build_css_extracts_plain_styles_minified() {
        let rule = plain_css(Stage::BuildCss);
        assert_eq!(rule.transforms[0], Transform::ExtractIntoStylesheet);
        assert!(matches!(
            rule.transforms[1],
            Transform::ParseCss { minimize: true, .. }
        ));
    }

    #[test]
    fn later_stages_discard_plain_styles_but_keep_scoped_ones() {
        for stage in [Stage::BuildHtml, Stage::BuildJavascript] {
            assert_eq!(plain_css(stage).transforms, vec![Transform::Discard]);

            let scoped = scoped_css(stage);
            assert_eq!(scoped.transforms[0], Transform::ExtractIntoStylesheet);
            assert!(matches!(
                scoped.transforms[1],
                Transform::ParseCss { modules: true, .. }
            ));
        }
    }

    #[test]
    fn develop_scoped_names_stay_readable() {
        let rule = scoped_css(Stage::Develop);
        assert!(matches!(
            &rule.transforms[1],
            Transform::ParseCss {
                modules: true,
                scoped_name_pattern: Some(pattern),
                ..
            } if pattern == DEV_SCOPED_NAME_PATTERN
        ));
    }

    #[test]
    fn plain_rule_excludes_scoped_stylesheets() {
        let rule = plain_css(Stage::Develop);
        assert_eq!(rule.exclude.as_deref(), Some(r"\.module\.css$"));
    }

    #[test]
    fn one_font_format_inlines_below_the_shared_threshold() {
        let rules = plan_module_rules(Stage::BuildJavascript);
        assert_eq!(
            rule_for(&rules, r"\.woff$").transforms,
            vec![Transform::InlineOrEmit {
                limit_bytes: INLINE_LIMIT_BYTES
            }]
        );
        assert_eq!(
            rule_for(&rules, r"\.(ttf|otf|eot|woff2)$").transforms,
            vec![Transform::EmitFile]
        );
    }
}
