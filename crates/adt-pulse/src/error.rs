//! Error types for portal operations.

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response (DNS, connect, timeout).
    Transport,
    /// The portal answered, but the outcome signals rejection.
    Rejected,
    /// The page did not have the shape the scraper expects.
    PageShape,
}

/// All errors that can occur while talking to the portal.
#[derive(thiserror::Error, Debug)]
pub enum PortalError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Too many temporary redirects (limit {0})")]
    RedirectLimit(usize),

    #[error("{operation} rejected: status {status}, location {location:?}")]
    Rejected {
        operation: &'static str,
        status: u16,
        location: Option<String>,
    },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Unexpected page shape: {0}")]
    PageShape(String),
}

impl PortalError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PortalError::Transport(_)
            | PortalError::InvalidUrl(_)
            | PortalError::RedirectLimit(_) => FailureKind::Transport,
            PortalError::Rejected { .. } => FailureKind::Rejected,
            PortalError::UnexpectedStatus { .. } | PortalError::PageShape(_) => {
                FailureKind::PageShape
            }
        }
    }

    pub(crate) fn page_shape(msg: impl Into<String>) -> Self {
        PortalError::PageShape(msg.into())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let rejected = PortalError::Rejected {
            operation: "sign in",
            status: 200,
            location: None,
        };
        assert_eq!(rejected.kind(), FailureKind::Rejected);
        assert_eq!(
            PortalError::page_shape("no icon").kind(),
            FailureKind::PageShape
        );
        assert_eq!(PortalError::RedirectLimit(10).kind(), FailureKind::Transport);
    }

    #[test]
    fn test_rejected_message() {
        let err = PortalError::Rejected {
            operation: "set arm",
            status: 302,
            location: Some("https://portal/mobile/access/signin.jsp".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("set arm"));
        assert!(msg.contains("302"));
        assert!(msg.contains("signin.jsp"));
    }
}
