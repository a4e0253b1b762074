/// Result alias used throughout the crate.
pub type QuizResult<T> = Result<T, QuizError>;

/// Error taxonomy for a quiz render run.
///
/// Every variant is fatal: the pipeline never retries and never leaves a partial output behind
/// on purpose.
#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    /// Configuration or input that cannot be rendered (empty text, zero fps, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A font, picture, text or audio resource is missing or unreadable.
    #[error("asset error: {0}")]
    Asset(String),

    /// The audio track does not cover the whole timeline.
    #[error(
        "audio too short: timeline needs {needed_secs:.3}s but audio only provides {available_secs:.3}s"
    )]
    AudioTooShort {
        /// Timeline duration in seconds.
        needed_secs: f64,
        /// Decoded audio duration in seconds.
        available_secs: f64,
    },

    /// Rendering or encoding failed (ffmpeg missing, pipe closed, non-zero exit, ...).
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped context-annotated error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuizError {
    /// Build a [`QuizError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuizError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`QuizError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
