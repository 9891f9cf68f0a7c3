/// Result alias used throughout the crate.
pub type ScrollyteResult<T> = Result<T, ScrollyteError>;

/// Error type for the scroll animation pipeline.
///
/// Contained failures (a single frame failing to load, a region whose trigger element is
/// missing) are logged and absorbed by their owning component. Only configuration problems and
/// invariant violations reach callers through this type.
#[derive(thiserror::Error, Debug)]
pub enum ScrollyteError {
    /// Configuration or input rejected up front.
    #[error("validation error: {0}")]
    Validation(String),

    /// An internal invariant was violated by the caller (e.g. unequal point-set lengths).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Region measurement could not be performed.
    #[error("layout error: {0}")]
    Layout(String),

    /// Asset fetch or decode failure.
    #[error("asset error: {0}")]
    Asset(String),

    /// Page description (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollyteError {
    /// Build a [`ScrollyteError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollyteError::Invariant`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build a [`ScrollyteError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`ScrollyteError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrollyteError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
