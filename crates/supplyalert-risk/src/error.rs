use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    /// The caller omitted a required route field.
    #[error("validation error: {0}")]
    Validation(String),

    /// A collaborator API failed, timed out, or answered with an error status.
    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A structured model answer did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RiskError {
    pub(crate) fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Whether the caller can fix this by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
