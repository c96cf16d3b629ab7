//! Typed views of portal state.

use serde::{Deserialize, Serialize};

/// Snapshot of the summary page. Read fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Absolute URL of the system status icon.
    pub icon_url: String,
    /// Current arm state, e.g. `"Disarmed Ready to Arm"`.
    pub arm: String,
    /// Current mode, e.g. `"Home"`.
    pub mode: String,
}

/// One arm transition offered by the arm-listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmOption {
    /// Opaque value to pass to [`PortalClient::set_arm`](crate::PortalClient::set_arm).
    pub key: String,
    /// Caption of the matching submit button.
    pub label: String,
}

/// One operating mode offered by the mode-listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeOption {
    /// Identifier to pass to [`PortalClient::set_mode`](crate::PortalClient::set_mode).
    pub id: i32,
    pub label: String,
}

/// Hidden tokens scraped from the arm-listing page for one arm change.
///
/// Tokens rotate per page view; never reuse a context across submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmFormContext {
    pub sat: String,
    pub fi: String,
    pub vn: String,
    pub ft: String,
}

impl ArmFormContext {
    /// Form body for the arm-change endpoint.
    pub fn into_form(self, target: &str) -> Vec<(String, String)> {
        vec![
            ("sat".to_string(), self.sat),
            ("fi".to_string(), self.fi),
            ("vn".to_string(), self.vn),
            ("ft".to_string(), self.ft),
            ("value".to_string(), target.to_string()),
        ]
    }
}
