/// Convenience result type used across lampreel.
pub type LampreelResult<T> = Result<T, LampreelError>;

/// Top-level error taxonomy used by generator and codec APIs.
#[derive(thiserror::Error, Debug)]
pub enum LampreelError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The frame source could not be opened or yields no usable frames.
    #[error("source unavailable: {0}")]
    Source(String),

    /// A network builder broke an allocation or wiring invariant.
    #[error("generation error: {0}")]
    Generation(String),

    /// Malformed blueprint text (marker, base64 or deflate stream).
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors when serializing or deserializing the blueprint document.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LampreelError {
    /// Build a [`LampreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LampreelError::Source`] value.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`LampreelError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`LampreelError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`LampreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
