//! Client configuration and the fixed portal surface.
//!
//! The portal has no versioned API; every path and suffix below is part of
//! the observed contract of the mobile site.

use std::time::Duration;

use url::Url;

use crate::error::PortalResult;

/// Default portal origin.
pub const DEFAULT_BASE_URL: &str = "https://mobile.adtpulse.com";

/// Desktop Edge user agent. The portal serves different markup to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/46.0.2486.0 Safari/537.36 Edge/13.10586";

/// Portal endpoint paths, relative to the base origin.
pub mod paths {
    pub const SIGN_IN: &str = "/mobile/access/signin.jsp?e=ns&partner=adt";
    pub const SIGN_OUT: &str = "/mobile/access/signout.jsp";
    pub const SUMMARY: &str = "/mobile/summary/summary.jsp";
    pub const LIST_ARM: &str = "/mobile/quickcontrol/panel.jsp";
    pub const SET_ARM: &str = "/mobile/quickcontrol/serv/ChangeVariableServ";
    pub const LIST_MODE: &str = "/mobile/quickcontrol/mode.jsp";
    pub const SET_MODE: &str = "/mobile/quickcontrol/serv/ChangeShiftServ";
    pub const LOG: &str = "/mobile/alarms/alarms.jsp";
}

/// Suffixes the portal uses in links and redirect targets.
pub mod suffixes {
    /// Summary link pointing at the arm-listing page.
    pub const ARM_LINK: &str = "/panel.jsp";
    /// Summary link pointing at the mode-listing page.
    pub const MODE_LINK: &str = "/mode.jsp";
    /// Redirect target after an accepted arm change.
    pub const ARM_DONE: &str = "/controldone.jsp";
    /// Redirect target after an accepted mode change.
    pub const MODE_DONE: &str = "/summary.jsp";
}

/// Settings for one [`PortalClient`](crate::PortalClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Portal origin, e.g. `https://mobile.adtpulse.com`.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of chained 307 hops followed for one request.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    /// Config pointing at a different origin, other settings default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parsed base origin.
    pub fn base(&self) -> PortalResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Absolute URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> PortalResult<Url> {
        Ok(self.base()?.join(path)?)
    }
}
