use thiserror::Error;

/// Errors raised by the markdown render capability.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("{0}")]
    Custom(String),
}

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("presenter is missing required collaborators: {}", .missing.join(", "))]
    MissingCollaborators { missing: Vec<&'static str> },

    #[error("invalid viewport size: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("failed to render slide segment {segment}: {source}")]
    Render {
        segment: usize,
        #[source]
        source: RenderError,
    },
}

pub type Result<T> = std::result::Result<T, DeckError>;
