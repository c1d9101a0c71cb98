use thiserror::Error;

/// Failures the planner distinguishes. Only `InvalidRequest` ever reaches a
/// caller; the other two are absorbed by the fallback itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("model call failed: {0}")]
    UpstreamCallFailure(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl PlanError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamCallFailure(message.into())
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedResponse(_) => "malformed_response",
            Self::UpstreamCallFailure(_) => "upstream_call_failure",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Model-side failures are recovered by synthesizing a plan.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}
