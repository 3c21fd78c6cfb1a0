use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("request failed: {0}")]
    Transient(String),
    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl CollectError {
    /// Only generic failures are worth another attempt within the same run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollectError::Transient(_))
    }

    /// Classifies an error response of the GitHub API. GitHub reports an
    /// exhausted rate limit as either 403 or 429.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => CollectError::Auth(message),
            429 => CollectError::RateLimited(message),
            403 if message.to_lowercase().contains("rate limit") => {
                CollectError::RateLimited(message)
            }
            403 => CollectError::Auth(message),
            404 => CollectError::NotFound(message),
            _ => CollectError::Transient(format!("HTTP {status}: {message}")),
        }
    }
}

impl From<octocrab::Error> for CollectError {
    fn from(error: octocrab::Error) -> Self {
        match &error {
            octocrab::Error::GitHub { source, .. } => {
                CollectError::from_status(source.status_code.as_u16(), source.message.clone())
            }
            octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => {
                CollectError::Decode(error.to_string())
            }
            _ => CollectError::Transient(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retried() {
        assert!(CollectError::Transient("timeout".to_string()).is_retryable());
        assert!(!CollectError::Auth("bad token".to_string()).is_retryable());
        assert!(!CollectError::RateLimited("slow down".to_string()).is_retryable());
        assert!(!CollectError::NotFound("near/missing".to_string()).is_retryable());
        assert!(!CollectError::Decode("bad json".to_string()).is_retryable());
        assert!(!CollectError::Exhausted {
            attempts: 4,
            last: "timeout".to_string()
        }
        .is_retryable());
    }

    fn classify(status: u16, message: &str) -> CollectError {
        CollectError::from_status(status, message.to_string())
    }

    #[test]
    fn statuses_map_to_error_kinds() {
        assert!(matches!(classify(401, "Bad credentials"), CollectError::Auth(_)));
        assert!(matches!(
            classify(403, "API rate limit exceeded for 1.2.3.4"),
            CollectError::RateLimited(_)
        ));
        assert!(matches!(
            classify(403, "Secondary Rate Limit hit"),
            CollectError::RateLimited(_)
        ));
        assert!(matches!(
            classify(403, "Resource not accessible by integration"),
            CollectError::Auth(_)
        ));
        assert!(matches!(classify(404, "Not Found"), CollectError::NotFound(_)));
        assert!(matches!(
            classify(429, "Too Many Requests"),
            CollectError::RateLimited(_)
        ));
    }

    #[test]
    fn other_statuses_are_retried() {
        for status in [500, 502, 503, 422] {
            let error = classify(status, "Server Error");
            assert!(error.is_retryable(), "{status} should be retried");
            assert_eq!(
                error.to_string(),
                format!("request failed: HTTP {status}: Server Error")
            );
        }
        assert_eq!(
            classify(404, "Not Found").to_string(),
            "not found: Not Found"
        );
    }

    #[test]
    fn messages_are_distinguishable() {
        assert_eq!(
            CollectError::RateLimited("API rate limit exceeded".to_string()).to_string(),
            "rate limit exceeded: API rate limit exceeded"
        );
        assert_eq!(
            CollectError::Exhausted {
                attempts: 4,
                last: "request failed: timeout".to_string()
            }
            .to_string(),
            "giving up after 4 attempts: request failed: timeout"
        );
    }
}
