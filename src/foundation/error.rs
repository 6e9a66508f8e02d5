/// Convenience result type used across the overlay engine.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Resolution itself never fails; these errors surface only at the boundaries (parsing
/// configuration, loading content, addressing nodes that do not exist).
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration records that cannot be interpreted at all.
    #[error("config error: {0}")]
    Config(String),

    /// Failures reported by the host content loader.
    #[error("content error: {0}")]
    Content(String),

    /// Operations addressed to nodes that are unknown or in the wrong lifecycle state.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OverlayError::Content`] value.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    /// Build an [`OverlayError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build an [`OverlayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
