/// Convenience result type used across scrollmotion.
pub type MotionResult<T> = Result<T, MotionError>;

/// Top-level error taxonomy used by the signal pipeline.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// Invalid construction parameters (spring constants, breakpoints, factors, cadence).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid scene or trace data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing scenes, traces or reports.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MotionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MotionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
