//! Crate-wide error taxonomy.

use crate::pipeline::Stage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text generation service could not be reached, or its stream died
    /// mid-flight.
    #[error("Text generation service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    /// A stage of expert polish failed. Later stages were never requested;
    /// progress already delivered to the caller stands.
    #[error("Expert polish aborted during {stage}: {source}")]
    PolishFailed { stage: Stage, source: Box<Error> },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Invalid persona pack: {reason}")]
    PersonaPack { reason: String },

    #[error("Catalog parse failed: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn service(reason: impl Into<String>) -> Self {
        Error::ServiceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    pub fn persona_pack(reason: impl Into<String>) -> Self {
        Error::PersonaPack {
            reason: reason.into(),
        }
    }

    pub(crate) fn polish(stage: Stage, source: Error) -> Self {
        Error::PolishFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// Which polish stage failed, when this error came out of expert polish.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Error::PolishFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_unavailable_display() {
        let err = Error::service("rate limit exceeded - too many requests");
        assert_eq!(
            err.to_string(),
            "Text generation service unavailable: rate limit exceeded - too many requests"
        );
    }

    #[test]
    fn test_polish_failed_names_stage_and_source() {
        let err = Error::polish(Stage::Refinement, Error::service("stream reset"));
        let message = err.to_string();
        assert!(message.contains("stage 2"));
        assert!(message.contains("director refinement"));
        assert!(message.contains("stream reset"));
    }

    #[test]
    fn test_failed_stage_accessor() {
        let err = Error::polish(Stage::Audit, Error::service("no capacity"));
        assert_eq!(err.failed_stage(), Some(Stage::Audit));
        assert_eq!(Error::service("x").failed_stage(), None);
    }
}
