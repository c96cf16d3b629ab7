//! Read-only scrapes of the summary, arm-listing, mode-listing and log pages.
//!
//! Parsing is split from fetching so page shapes can be tested without a
//! server. Controls whose submit-button sibling is missing or blank are
//! dropped, the same as controls with an empty key.

use scraper::Html;
use url::Url;

use crate::client::{collapse, PortalClient};
use crate::config::{paths, suffixes};
use crate::error::{PortalError, PortalResult};
use crate::extract::{self, Locator};
use crate::types::{ArmOption, ModeOption, Summary};

/// `alt` text of the system status icon.
const SYSTEM_ICON_ALT: &str = "System Icon";

/// Row classes of the log table.
const LOG_ROW_CLASSES: &[&str] = &["p_rowLight", "p_rowDark"];

/// Parse the summary page. Relative icon paths resolve against `base`.
pub fn parse_summary(html: &str, base: &Url) -> PortalResult<Summary> {
    let doc = Html::parse_document(html);

    let icon = extract::find_first(
        &doc,
        &Locator::tag("img").attr_eq_ignore_case("alt", SYSTEM_ICON_ALT),
    )
    .ok_or_else(|| PortalError::page_shape("no system icon"))?;
    let src = extract::attr(&icon, "src")
        .ok_or_else(|| PortalError::page_shape("system icon without src"))?;
    let icon_url = base.join(src)?.to_string();

    let arm = linked_label(&doc, suffixes::ARM_LINK)?;
    let mode = linked_label(&doc, suffixes::MODE_LINK)?;

    Ok(Summary {
        icon_url,
        arm,
        mode,
    })
}

/// Normalized text right after the first link ending in `suffix`.
fn linked_label(doc: &Html, suffix: &'static str) -> PortalResult<String> {
    let link = extract::find_first(doc, &Locator::tag("a").attr_ends_with("href", suffix))
        .ok_or_else(|| PortalError::page_shape(format!("no link to {suffix}")))?;
    let text = extract::next_sibling_text(&link)
        .ok_or_else(|| PortalError::page_shape(format!("nothing after link to {suffix}")))?;
    Ok(extract::normalize_label(&text))
}

/// Parse the arm-listing page into key/label pairs, document order.
pub fn parse_arm_options(html: &str) -> Vec<ArmOption> {
    let doc = Html::parse_document(html);
    extract::find_all(&doc, &Locator::tag("input").attr_eq("name", "value"))
        .into_iter()
        .filter_map(|input| {
            let key = extract::attr(&input, "value").unwrap_or("");
            let label = match extract::sibling_submit_value(&input) {
                Some(label) => label,
                None => {
                    tracing::debug!("arm option {key:?} has no submit button, skipping");
                    return None;
                }
            };
            if key.is_empty() || label.is_empty() {
                return None;
            }
            Some(ArmOption {
                key: key.to_string(),
                label: label.to_string(),
            })
        })
        .collect()
}

/// Parse the mode-listing page. A non-numeric mode id fails the whole page.
pub fn parse_modes(html: &str) -> PortalResult<Vec<ModeOption>> {
    let doc = Html::parse_document(html);
    let mut modes = Vec::new();
    for input in extract::find_all(
        &doc,
        &Locator::tag("input").attr_eq_ignore_case("name", "shiftModeId"),
    ) {
        let raw = extract::attr(&input, "value").unwrap_or("");
        let id: i32 = raw
            .trim()
            .parse()
            .map_err(|_| PortalError::page_shape(format!("mode id {raw:?} is not a number")))?;
        match extract::sibling_submit_value(&input) {
            Some(label) if !label.is_empty() => modes.push(ModeOption {
                id,
                label: label.to_string(),
            }),
            _ => tracing::debug!("mode {id} has no label, skipping"),
        }
    }
    Ok(modes)
}

/// Parse the log table. Each row's raw text, document order (newest first).
pub fn parse_log(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    extract::find_all(
        &doc,
        &Locator::tag("tr").attr_one_of_ignore_case("class", LOG_ROW_CLASSES),
    )
    .iter()
    .map(extract::inner_text)
    .collect()
}

impl PortalClient {
    pub async fn try_get_summary(&self) -> PortalResult<Summary> {
        let _op = self.begin().await;
        let page = self.fetch_page(paths::SUMMARY).await?;
        parse_summary(&page.body, &self.config.base()?)
    }

    /// Current summary, or `None` on any failure.
    pub async fn get_summary(&self) -> Option<Summary> {
        collapse("get summary", self.try_get_summary().await)
    }

    pub async fn try_list_arm_options(&self) -> PortalResult<Vec<ArmOption>> {
        let _op = self.begin().await;
        let page = self.fetch_page(paths::LIST_ARM).await?;
        Ok(parse_arm_options(&page.body))
    }

    /// Arm transitions currently offered, or `None` on any failure.
    pub async fn list_arm_options(&self) -> Option<Vec<ArmOption>> {
        collapse("list arm options", self.try_list_arm_options().await)
    }

    pub async fn try_list_modes(&self) -> PortalResult<Vec<ModeOption>> {
        let _op = self.begin().await;
        self.read_modes().await
    }

    /// Mode listing without taking the operation lock; the caller holds it.
    pub(crate) async fn read_modes(&self) -> PortalResult<Vec<ModeOption>> {
        let page = self.fetch_page(paths::LIST_MODE).await?;
        parse_modes(&page.body)
    }

    /// Modes currently offered, or `None` on any failure.
    pub async fn list_modes(&self) -> Option<Vec<ModeOption>> {
        collapse("list modes", self.try_list_modes().await)
    }

    pub async fn try_get_log(&self) -> PortalResult<Vec<String>> {
        let _op = self.begin().await;
        let page = self.fetch_page(paths::LOG).await?;
        Ok(parse_log(&page.body))
    }

    /// Log rows, newest first. `Some(vec![])` means the page had no rows;
    /// `None` means it could not be read.
    pub async fn get_log(&self) -> Option<Vec<String>> {
        collapse("get log", self.try_get_log().await)
    }
}
