//! Error types for build configuration composition.

use thiserror::Error;

use crate::stage::Stage;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Stage resolution errors (raised before any planner runs)
    #[error(
        "unknown build stage `{0}`; expected one of develop, develop-html, build-css, build-html, build-javascript"
    )]
    UnknownStage(String),

    // Override-hook contract errors
    #[error("override hook for stage `{stage}` must return a configuration object, got {received}")]
    OverrideNotAnObject { stage: Stage, received: String },

    #[error("override hook for stage `{stage}` returned an unusable configuration: {message}")]
    OverrideInvalid { stage: Stage, message: String },

    // Serde bridging errors
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}
