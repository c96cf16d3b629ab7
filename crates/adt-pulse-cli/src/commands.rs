//! Command execution and output rendering.

use adt_pulse::extract::collapse_whitespace;
use adt_pulse::{ArmOption, ModeOption, PortalClient, Summary};
use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Credentials;

/// One portal operation, run inside a sign-in/sign-out bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Status,
    ArmOptions,
    Arm(String),
    Modes,
    Mode(i32),
    Log,
}

/// Sign in, run `action`, sign out. Returns the rendered output.
pub async fn run(
    client: &PortalClient,
    credentials: &Credentials,
    action: &Action,
    json: bool,
) -> Result<String> {
    client
        .try_sign_in(&credentials.username, &credentials.password, true)
        .await
        .context("sign in failed")?;

    let output = perform(client, action, json).await;

    if let Err(e) = client.try_sign_out().await {
        tracing::warn!("sign out failed: {e}");
    }
    output
}

async fn perform(client: &PortalClient, action: &Action, json: bool) -> Result<String> {
    match action {
        Action::Status => {
            let summary = client.try_get_summary().await.context("reading summary")?;
            render(&summary, json, render_summary)
        }
        Action::ArmOptions => {
            let options = client
                .try_list_arm_options()
                .await
                .context("listing arm options")?;
            render(&options, json, |o| render_arm_options(o))
        }
        Action::Arm(key) => {
            client
                .try_set_arm(key)
                .await
                .with_context(|| format!("setting arm state {key}"))?;
            Ok(format!("Arm state set to {key}"))
        }
        Action::Modes => {
            let modes = client.try_list_modes().await.context("listing modes")?;
            render(&modes, json, |m| render_modes(m))
        }
        Action::Mode(id) => {
            client
                .try_set_mode(*id)
                .await
                .with_context(|| format!("setting mode {id}"))?;
            Ok(format!("Mode set to {id}"))
        }
        Action::Log => {
            let rows = client.try_get_log().await.context("reading log")?;
            render(&rows, json, |r| render_log(r))
        }
    }
}

fn render<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    text: impl Fn(&T) -> String,
) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Arm:  {}\nMode: {}\nIcon: {}",
        summary.arm, summary.mode, summary.icon_url
    )
}

pub fn render_arm_options(options: &[ArmOption]) -> String {
    if options.is_empty() {
        return "No arm options offered".to_string();
    }
    options
        .iter()
        .map(|o| format!("{:<12} {}", o.key, o.label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_modes(modes: &[ModeOption]) -> String {
    if modes.is_empty() {
        return "No modes offered".to_string();
    }
    modes
        .iter()
        .map(|m| format!("{:<4} {}", m.id, m.label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_log(rows: &[String]) -> String {
    if rows.is_empty() {
        return "Log is empty".to_string();
    }
    rows.iter()
        .map(|r| collapse_whitespace(r))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary() {
        let summary = Summary {
            icon_url: "https://mobile.adtpulse.com/icon.png".to_string(),
            arm: "Disarmed Ready to Arm".to_string(),
            mode: "Home".to_string(),
        };
        let text = render_summary(&summary);
        assert!(text.starts_with("Arm:  Disarmed Ready to Arm"));
        assert!(text.contains("Mode: Home"));
    }

    #[test]
    fn test_render_log_collapses_rows() {
        let rows = vec!["\n  10/18 7:02 PM\n\n  Disarmed  ".to_string()];
        assert_eq!(render_log(&rows), "10/18 7:02 PM Disarmed");
        assert_eq!(render_log(&[]), "Log is empty");
    }

    #[test]
    fn test_render_json() {
        let modes = vec![ModeOption {
            id: 2,
            label: "Away".to_string(),
        }];
        let out = render(&modes, true, |m| render_modes(m)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["id"], 2);
        assert_eq!(parsed[0]["label"], "Away");
    }

    #[test]
    fn test_render_arm_options_text() {
        let options = vec![ArmOption {
            key: "stay".to_string(),
            label: "Arm Stay".to_string(),
        }];
        assert_eq!(render_arm_options(&options), "stay         Arm Stay");
    }
}
