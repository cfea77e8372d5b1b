/// Convenience result type used across iconstack.
pub type IconStackResult<T> = Result<T, IconStackError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum IconStackError {
    /// A size was zero, overflowed, or otherwise unusable.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A source file or source bytes could not be found.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The image source provider returned no usable image.
    #[error("provider failure: {0}")]
    ProviderFailure(String),

    /// Buffers passed to a single composite call differ in size.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A catalog manifest had no entry for the written scale.
    #[error("manifest update skipped: {0}")]
    ManifestUpdateSkipped(String),

    /// Invalid configuration, paths or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing JSON documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IconStackError {
    /// Build a [`IconStackError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`IconStackError::SourceNotFound`] value.
    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    /// Build a [`IconStackError::ProviderFailure`] value.
    pub fn provider_failure(msg: impl Into<String>) -> Self {
        Self::ProviderFailure(msg.into())
    }

    /// Build a [`IconStackError::DimensionMismatch`] value.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`IconStackError::ManifestUpdateSkipped`] value.
    pub fn manifest_update_skipped(msg: impl Into<String>) -> Self {
        Self::ManifestUpdateSkipped(msg.into())
    }

    /// Build a [`IconStackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`IconStackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the driver may downgrade this error to a skipped slot.
    ///
    /// IO failures (wrapped in [`IconStackError::Other`]) count as recoverable: they come from
    /// reading or decoding a single slot's source.
    pub fn is_slot_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::ProviderFailure(_) | Self::Other(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
