//! Configuration loading and resolution.
//!
//! Each setting is taken from the command line first, then the environment.

use adt_pulse::config::DEFAULT_BASE_URL;
use anyhow::{bail, Result};

pub const ENV_USERNAME: &str = "ADT_PULSE_USERNAME";
pub const ENV_PASSWORD: &str = "ADT_PULSE_PASSWORD";
pub const ENV_BASE_URL: &str = "ADT_PULSE_BASE_URL";

/// Portal credentials for one run. Never written anywhere.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolve the portal origin.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(env_url) = std::env::var(ENV_BASE_URL) {
        if !env_url.is_empty() {
            return env_url;
        }
    }

    DEFAULT_BASE_URL.to_string()
}

/// Resolve credentials. Both parts are required.
pub fn resolve_credentials(
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials> {
    let username = match pick(username, ENV_USERNAME) {
        Some(u) => u,
        None => bail!("no username: pass --username or set {ENV_USERNAME}"),
    };
    let password = match pick(password, ENV_PASSWORD) {
        Some(p) => p,
        None => bail!("no password: pass --password or set {ENV_PASSWORD}"),
    };
    Ok(Credentials { username, password })
}

fn pick(explicit: Option<&str>, env_key: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_key).ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_url_wins() {
        assert_eq!(
            resolve_base_url(Some("http://127.0.0.1:8080")),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_explicit_credentials() {
        let creds = resolve_credentials(Some("alice"), Some("hunter2")).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }
}
