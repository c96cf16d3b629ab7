//! Sign-in and sign-out.
//!
//! The portal answers a good login with 302 and a bad one with 200 plus an
//! error page. The status is the only signal read; no detail is scraped from
//! the failure page.

use std::sync::atomic::Ordering;

use reqwest::StatusCode;

use crate::client::{collapse, PortalClient};
use crate::config::paths;
use crate::error::{PortalError, PortalResult};

/// Caption of the login button, sent as the `login` field.
const SIGN_IN_LABEL: &str = "Sign In";

impl PortalClient {
    /// Sign in. Success is exactly a 302 from the sign-in endpoint.
    pub async fn try_sign_in(
        &self,
        username: &str,
        password: &str,
        keep_logged_in: bool,
    ) -> PortalResult<()> {
        let mut form = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
            ("login".to_string(), SIGN_IN_LABEL.to_string()),
        ];
        if keep_logged_in {
            form.push(("keeploggedin".to_string(), "YES".to_string()));
        }

        let _op = self.begin().await;
        // A new attempt ends whatever session came before, however it fails.
        self.signed_in.store(false, Ordering::SeqCst);
        let resp = self
            .transport
            .post(&self.url(paths::SIGN_IN)?, &form, None)
            .await?;
        if resp.status != StatusCode::FOUND.as_u16() {
            return Err(PortalError::Rejected {
                operation: "sign in",
                status: resp.status,
                location: resp.location(),
            });
        }

        self.signed_in.store(true, Ordering::SeqCst);
        tracing::info!("signed in as {username}");
        Ok(())
    }

    /// Sign in, collapsing every failure cause to `false`.
    pub async fn sign_in(&self, username: &str, password: &str, keep_logged_in: bool) -> bool {
        let result = self.try_sign_in(username, password, keep_logged_in).await;
        collapse("sign in", result).is_some()
    }

    /// Sign out. Success is exactly a 302 from the sign-out endpoint.
    pub async fn try_sign_out(&self) -> PortalResult<()> {
        let _op = self.begin().await;
        let resp = self.transport.get(&self.url(paths::SIGN_OUT)?).await?;
        if resp.status != StatusCode::FOUND.as_u16() {
            return Err(PortalError::Rejected {
                operation: "sign out",
                status: resp.status,
                location: resp.location(),
            });
        }

        self.signed_in.store(false, Ordering::SeqCst);
        tracing::info!("signed out");
        Ok(())
    }

    pub async fn sign_out(&self) -> bool {
        collapse("sign out", self.try_sign_out().await).is_some()
    }

    /// Whether the last sign-in succeeded and no sign-out followed.
    ///
    /// The portal can drop a session at any time; this does not notice.
    pub fn is_signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }
}
