//! Arm and mode changes.
//!
//! An arm change is two-phase: scrape fresh hidden tokens from the
//! arm-listing page, then post them back with the target value. The portal
//! reports acceptance with a redirect to `/controldone.jsp`; a mode change
//! is accepted with a redirect to `/summary.jsp`.

use std::time::Duration;

use scraper::Html;

use crate::client::{collapse, PortalClient};
use crate::config::{paths, suffixes};
use crate::error::{PortalError, PortalResult};
use crate::extract;
use crate::transport::PortalResponse;
use crate::types::ArmFormContext;

/// Pause between a failed mode change and its single retry.
pub const MODE_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Scrape the arm-change tokens. `sat` falls back to `tsat`; `fi`, `vn` and
/// `ft` are required.
pub fn parse_arm_form(html: &str) -> PortalResult<ArmFormContext> {
    let doc = Html::parse_document(html);
    let mut values = extract::form_values(&doc);
    let mut take = |name: &str| {
        values
            .remove(name)
            .ok_or_else(|| PortalError::page_shape(format!("arm form has no {name} token")))
    };

    let sat = take("sat").or_else(|_| take("tsat"))?;
    Ok(ArmFormContext {
        sat,
        fi: take("fi")?,
        vn: take("vn")?,
        ft: take("ft")?,
    })
}

fn accepted(operation: &'static str, resp: PortalResponse, suffix: &str) -> PortalResult<()> {
    if resp.redirects_to(suffix) {
        return Ok(());
    }
    Err(PortalError::Rejected {
        operation,
        status: resp.status,
        location: resp.location(),
    })
}

impl PortalClient {
    /// Change the arm state to `target`, a key from
    /// [`list_arm_options`](Self::list_arm_options).
    ///
    /// The token fetch and the POST run under one operation lock, so a
    /// concurrent call cannot rotate the tokens in between.
    pub async fn try_set_arm(&self, target: &str) -> PortalResult<()> {
        let _op = self.begin().await;
        let list_url = self.url(paths::LIST_ARM)?;
        let page = self.fetch_page(paths::LIST_ARM).await?;
        let form = parse_arm_form(&page.body)?.into_form(target);

        let resp = self
            .transport
            .post(&self.url(paths::SET_ARM)?, &form, Some(list_url.as_str()))
            .await?;
        accepted("set arm", resp, suffixes::ARM_DONE)?;

        tracing::info!("arm state set to {target}");
        Ok(())
    }

    pub async fn set_arm(&self, target: &str) -> bool {
        collapse("set arm", self.try_set_arm(target).await).is_some()
    }

    async fn submit_mode(&self, mode: i32) -> PortalResult<()> {
        let form = vec![("shiftModeId".to_string(), mode.to_string())];
        let resp = self
            .transport
            .post(&self.url(paths::SET_MODE)?, &form, None)
            .await?;
        accepted("set mode", resp, suffixes::MODE_DONE)
    }

    /// Change the mode to `mode`, an id from [`list_modes`](Self::list_modes).
    ///
    /// The portal intermittently refuses the first submission. After a
    /// refusal the mode-listing page is fetched (result unused, the fetch
    /// itself is what matters), then one more submission follows after
    /// [`MODE_RETRY_PAUSE`]. No other operation retries. The operation lock
    /// is released for the pause and taken again for the second submission.
    pub async fn try_set_mode(&self, mode: i32) -> PortalResult<()> {
        {
            let _op = self.begin().await;
            match self.submit_mode(mode).await {
                Ok(()) => {
                    tracing::info!("mode set to {mode}");
                    return Ok(());
                }
                Err(e) => tracing::warn!("set mode {mode} failed, retrying once: {e}"),
            }
            let _ = self.read_modes().await;
        }

        tokio::time::sleep(MODE_RETRY_PAUSE).await;

        let _op = self.begin().await;
        self.submit_mode(mode).await?;
        tracing::info!("mode set to {mode} on retry");
        Ok(())
    }

    pub async fn set_mode(&self, mode: i32) -> bool {
        collapse("set mode", self.try_set_mode(mode).await).is_some()
    }
}
