use std::fmt;

use thiserror::Error;

/// Broad origin of a failed call to the inference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Endpoint unreachable, timed out, or the response could not be read.
    Network,
    /// Credentials missing, invalid, or lacking access to the model.
    Authentication,
    /// Request rate or quota exceeded for the model.
    Throttled,
    /// The service (or the local request builder) rejected the request.
    MalformedRequest,
    /// Any other service-side failure.
    Service,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::Network => "network",
            FaultKind::Authentication => "authentication",
            FaultKind::Throttled => "throttled",
            FaultKind::MalformedRequest => "malformed request",
            FaultKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// Failure raised by an [`AiBackend`](crate::ai_backend::AiBackend) before a response was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFault {
    pub kind: FaultKind,
    pub message: String,
}

impl TransportFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Can't invoke '{model_id}'. Reason: {fault}")]
    Transport {
        model_id: String,
        #[source]
        fault: TransportFault,
    },

    #[error("Can't invoke '{model_id}'. Reason: response is missing {missing}")]
    MalformedResponse {
        model_id: String,
        missing: &'static str,
    },
}

impl InvocationError {
    pub fn model_id(&self) -> &str {
        match self {
            InvocationError::Transport { model_id, .. }
            | InvocationError::MalformedResponse { model_id, .. } => model_id,
        }
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, InvocationError::MalformedResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_names_model_and_reason() {
        let err = InvocationError::Transport {
            model_id: "M".into(),
            fault: TransportFault::new(FaultKind::Network, "R"),
        };

        assert_eq!(err.to_string(), "Can't invoke 'M'. Reason: R");
        assert_eq!(err.model_id(), "M");
        assert!(!err.is_malformed_response());
    }

    #[test]
    fn malformed_response_names_missing_path() {
        let err = InvocationError::MalformedResponse {
            model_id: "M".into(),
            missing: "output.message",
        };

        assert_eq!(
            err.to_string(),
            "Can't invoke 'M'. Reason: response is missing output.message"
        );
        assert!(err.is_malformed_response());
    }
}
