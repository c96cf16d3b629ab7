//! The portal client: one instance per logical session.
//!
//! Operations are split across modules by concern: sign-in/out live in
//! [`session`](crate::session), page reads in [`reader`](crate::reader) and
//! state changes in [`mutator`](crate::mutator). Each public operation comes
//! in two forms: a `try_*` method returning [`PortalResult`], and a
//! collapsed `bool`/`Option` view that logs the error and swallows it.

use std::sync::atomic::AtomicBool;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::ClientConfig;
use crate::error::{PortalError, PortalResult};
use crate::transport::{PortalResponse, Transport};

/// Client bound to one authenticated portal session.
///
/// Public operations hold an operation lock for their whole body, so calls
/// made concurrently on one client run one after another and never share
/// scraped tokens. The only wait that releases it is the mode-retry pause.
pub struct PortalClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Transport,
    pub(crate) signed_in: AtomicBool,
    operation: Mutex<()>,
}

impl PortalClient {
    /// Create a client with its own cookie jar.
    pub fn new(config: ClientConfig) -> PortalResult<Self> {
        config.base()?;
        let transport = Transport::new(&config)?;
        Ok(Self {
            config,
            transport,
            signed_in: AtomicBool::new(false),
            operation: Mutex::new(()),
        })
    }

    /// Wait until no other operation is running on this session.
    pub(crate) async fn begin(&self) -> MutexGuard<'_, ()> {
        self.operation.lock().await
    }

    /// The transport, for callers that need raw portal access.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub(crate) fn url(&self, path: &str) -> PortalResult<String> {
        Ok(self.config.endpoint(path)?.to_string())
    }

    /// GET a page that must come back 2xx.
    pub(crate) async fn fetch_page(&self, path: &str) -> PortalResult<PortalResponse> {
        let url = self.url(path)?;
        let resp = self.transport.get(&url).await?;
        if !resp.is_success() {
            return Err(PortalError::UnexpectedStatus {
                url,
                status: resp.status,
            });
        }
        Ok(resp)
    }
}

/// Collapse a fallible result into `Option`, logging the failure.
pub(crate) fn collapse<T>(operation: &str, result: PortalResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{operation} failed ({:?}): {e}", e.kind());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths;

    #[test]
    fn test_url_joins_onto_configured_origin() {
        let client = PortalClient::new(ClientConfig::with_base_url("http://127.0.0.1:8080")).unwrap();
        assert_eq!(
            client.url(paths::LIST_ARM).unwrap(),
            "http://127.0.0.1:8080/mobile/quickcontrol/panel.jsp"
        );
    }

    #[test]
    fn test_invalid_origin_is_rejected_up_front() {
        assert!(PortalClient::new(ClientConfig::with_base_url("not a url")).is_err());
    }
}
