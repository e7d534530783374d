//! Typed setup errors raised while building registries and the scene.
//!
//! Everything here is produced before the first frame. `NotFound` and
//! `ShaderCompile` abort startup, `TextureDecode` is only ever logged because
//! the affected texture keeps showing its placeholder.

use std::{fmt, path::PathBuf};

/// The pipeline stage a build log belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    /// Pipeline creation, where both modules and the layout are combined.
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Link => "link",
        })
    }
}

/// Validation output of one failed stage.
#[derive(Clone, Debug)]
pub struct StageLog {
    pub stage: ShaderStage,
    pub message: String,
}

/// Joins stage logs the way they are printed at startup.
pub(crate) fn format_stage_logs(logs: &[StageLog]) -> String {
    logs.iter()
        .map(|log| format!("[{}] {}", log.stage, log.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A scene entry references a name that was never registered.
    #[error("no {kind} named `{name}` is registered")]
    NotFound { kind: &'static str, name: String },

    /// At least one stage failed to compile or the pipeline failed to link.
    #[error("shader `{name}` failed to build:\n{}", format_stage_logs(.logs))]
    ShaderCompile { name: String, logs: Vec<StageLog> },

    /// Reading or decoding a texture image failed.
    #[error("texture `{name}` could not be loaded from {}: {source}", .path.display())]
    TextureDecode {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ResourceError {
    pub(crate) fn not_found(kind: &'static str, name: &str) -> Self {
        ResourceError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// The stage logs of a `ShaderCompile` error, empty for other variants.
    pub fn stage_logs(&self) -> &[StageLog] {
        match self {
            ResourceError::ShaderCompile { logs, .. } => logs,
            _ => &[],
        }
    }
}
