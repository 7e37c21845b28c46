use thiserror::Error;

/// Backend failure. `log` is the backend's diagnostic text, verbatim.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum GfxError {
    #[error("shader `{label}` failed to compile: {log}")]
    ShaderCompile { label: String, log: String },

    #[error("shader program `{label}` failed to link: {log}")]
    ProgramLink { label: String, log: String },

    #[error("texture `{label}` could not be created: {log}")]
    TextureCreate { label: String, log: String },
}

impl GfxError {
    /// Diagnostic text reported by the backend.
    pub fn log(&self) -> &str {
        match self {
            GfxError::ShaderCompile { log, .. }
            | GfxError::ProgramLink { log, .. }
            | GfxError::TextureCreate { log, .. } => log,
        }
    }
}
