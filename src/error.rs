//! Error types shared by the repository and the workflows.
use thiserror::Error;

/// Failure of a single Dashboard API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The API key was rejected or lacks access.
    #[error("unauthorized ({status}): check the API key and its organization access")]
    Unauthorized { status: u16 },

    #[error("not found: {path}")]
    NotFound { path: String },

    /// The Dashboard refused the request body or parameters.
    #[error("validation failed ({status}): {}", .messages.join("; "))]
    Validation { status: u16, messages: Vec<String> },

    #[error("rate limited by the Dashboard API")]
    RateLimited,

    #[error("status code = {status}, reason = {reason}, error = {}", .messages.join("; "))]
    Status {
        status: u16,
        reason: String,
        messages: Vec<String>,
    },

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: ureq::Error,
    },
}

impl ApiError {
    /// Map a non-success response to the matching variant.
    pub fn from_status(status: u16, reason: &str, path: &str, messages: Vec<String>) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized { status },
            404 => ApiError::NotFound {
                path: path.to_string(),
            },
            400 | 422 => ApiError::Validation { status, messages },
            429 => ApiError::RateLimited,
            _ => ApiError::Status {
                status,
                reason: reason.to_string(),
                messages,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status }
            | ApiError::Validation { status, .. }
            | ApiError::Status { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Transport(_) | ApiError::Decode { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// The operator answered "n" at a confirmation prompt.
///
/// Propagated with `?` up to `main`, which ends the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled by the operator")]
pub struct Cancelled;

/// True when `err` (or anything it wraps) is a [`Cancelled`].
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Cancelled>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn status_mapping_distinguishes_caller_decisions() {
        assert!(matches!(
            ApiError::from_status(401, "Unauthorized", "/organizations", vec![]),
            ApiError::Unauthorized { status: 401 }
        ));
        assert!(ApiError::from_status(404, "Not Found", "/networks/N_1", vec![]).is_not_found());
        assert!(matches!(
            ApiError::from_status(400, "Bad Request", "/x", vec!["Email is invalid".into()]),
            ApiError::Validation { status: 400, .. }
        ));
        assert!(matches!(
            ApiError::from_status(429, "Too Many Requests", "/x", vec![]),
            ApiError::RateLimited
        ));
        let other = ApiError::from_status(502, "Bad Gateway", "/x", vec!["upstream".into()]);
        assert_eq!(other.status(), Some(502));
        assert_eq!(
            other.to_string(),
            "status code = 502, reason = Bad Gateway, error = upstream"
        );
    }

    #[test]
    fn cancelled_survives_context_wrapping() {
        let result: anyhow::Result<()> = Err(Cancelled.into());
        let err = result.context("sweep network N_1").unwrap_err();
        assert!(is_cancelled(&err));
        assert!(!is_cancelled(&anyhow::anyhow!("other failure")));
    }
}
