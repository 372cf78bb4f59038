use std::path::PathBuf;

/// Convenience result type used across slime-rain.
pub type RainResult<T> = Result<T, RainError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum RainError {
    /// Invalid configuration or buffer shapes.
    #[error("validation error: {0}")]
    Validation(String),

    /// No droplet sprite matched the accepted extensions, or the source could not be listed.
    #[error("no droplet assets found in '{}'", dir.display())]
    NoAssetsFound {
        /// Directory (or logical source name) that was searched.
        dir: PathBuf,
    },

    /// Input bytes are not a decodable image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The result image could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Processing exceeded the configured deadline.
    #[error("processing timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout {
        /// Milliseconds spent when the deadline check fired.
        elapsed_ms: u64,
        /// Configured limit in milliseconds.
        limit_ms: u64,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RainError {
    /// Build a [`RainError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RainError::NoAssetsFound`] value.
    pub fn no_assets(dir: impl Into<PathBuf>) -> Self {
        Self::NoAssetsFound { dir: dir.into() }
    }

    /// Build a [`RainError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RainError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RainError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures caused by the caller's input rather than the environment.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoAssetsFound { .. } | Self::Decode(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
