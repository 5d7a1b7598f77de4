/// Convenience result type used across postframe.
pub type PostframeResult<T> = Result<T, PostframeError>;

/// Top-level error taxonomy used by compositing APIs.
///
/// Every variant is terminal for the `compose` call that produced it.
#[derive(thiserror::Error, Debug)]
pub enum PostframeError {
    /// A source image reported a zero width or height.
    #[error("dimension error: {0}")]
    Dimension(String),

    /// The image decoder rejected a source blob.
    #[error("decode error: {0}")]
    Decode(String),

    /// The destination surface could not hand out a paint context.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A repeating fill could not be built from the background image.
    #[error("pattern creation error: {0}")]
    PatternCreation(String),

    /// Invalid user-provided options or sizes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failures inside a paint backend.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing persisted options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PostframeError {
    /// Build a [`PostframeError::Dimension`] value.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    /// Build a [`PostframeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PostframeError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`PostframeError::PatternCreation`] value.
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::PatternCreation(msg.into())
    }

    /// Build a [`PostframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PostframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PostframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
