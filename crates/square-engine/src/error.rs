use thiserror::Error;

use crate::render::{ComponentType, ShaderStage};

pub type Result<T> = std::result::Result<T, SquareError>;

/// Failures of the square setup sequence.
///
/// Each step that can fail has its own variant so callers can tell a missing
/// GPU apart from a bad shader.
#[derive(Debug, Error)]
pub enum SquareError {
    #[error("rendering context unavailable: {reason}")]
    ContextUnavailable {
        reason: &'static str,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("attribute `{0}` is not an input of the linked program")]
    AttributeNotFound(String),

    #[error("attribute `{name}` is declared as {declared:?} but bound as {bound:?}")]
    AttributeMismatch {
        name: String,
        declared: wgpu::VertexFormat,
        bound: wgpu::VertexFormat,
    },

    #[error("attribute `{name}`: {size} x {component:?} is not a vertex format")]
    UnsupportedPointer {
        name: String,
        size: u32,
        component: ComponentType,
    },
}

impl SquareError {
    pub(crate) fn context<E>(reason: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ContextUnavailable {
            reason,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn context_bare(reason: &'static str) -> Self {
        Self::ContextUnavailable { reason, source: None }
    }
}
