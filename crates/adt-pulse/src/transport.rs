//! Async HTTP transport wrapping reqwest.
//!
//! Automatic redirects are disabled. A 307 is re-issued with the same method
//! and body at its `Location`; every other status, 302 included, comes back
//! to the caller untouched so it can read the redirect target itself.
//! Cookies from every hop land in the shared jar. Nothing is retried here.

use reqwest::header::{LOCATION, REFERER};
use reqwest::{Method, StatusCode};
use tokio::sync::Mutex;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{PortalError, PortalResult};

/// Response from the portal after 307 hops have been followed.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    /// Originally requested URL.
    pub url: String,
    /// URL that produced this response.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// All response headers, lower-cased names.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl PortalResponse {
    /// First value of a header, case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `Location` resolved against the URL that returned it.
    pub fn location(&self) -> Option<String> {
        let raw = self.header("location")?;
        match Url::parse(&self.final_url).and_then(|base| base.join(raw)) {
            Ok(resolved) => Some(resolved.to_string()),
            Err(_) => Some(raw.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when this is a 3xx whose `Location` ends with `suffix`
    /// (case-insensitive).
    pub fn redirects_to(&self, suffix: &str) -> bool {
        if !(300..400).contains(&self.status) {
            return false;
        }
        self.location()
            .map(|loc| {
                loc.to_ascii_lowercase()
                    .ends_with(&suffix.to_ascii_lowercase())
            })
            .unwrap_or(false)
    }
}

/// HTTP transport for one portal session.
pub struct Transport {
    client: reqwest::Client,
    max_redirects: usize,
    /// One exchange at a time; the portal session is stateful.
    gate: Mutex<()>,
}

impl Transport {
    /// Build the underlying client: cookie jar on, redirects off.
    pub fn new(config: &ClientConfig) -> PortalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
            gate: Mutex::new(()),
        })
    }

    /// GET a URL.
    pub async fn get(&self, url: &str) -> PortalResult<PortalResponse> {
        self.send(Method::GET, url, None, None).await
    }

    /// POST url-encoded form fields, optionally with a `Referer` for this
    /// request only.
    pub async fn post(
        &self,
        url: &str,
        form_fields: &[(String, String)],
        referer: Option<&str>,
    ) -> PortalResult<PortalResponse> {
        self.send(Method::POST, url, Some(form_fields), referer)
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        form_fields: Option<&[(String, String)]>,
        referer: Option<&str>,
    ) -> PortalResult<PortalResponse> {
        let _exchange = self.gate.lock().await;
        let mut target = Url::parse(url)?;
        let mut hops = 0usize;

        loop {
            tracing::debug!("{method} {target}");
            let mut builder = self.client.request(method.clone(), target.clone());
            if let Some(referer) = referer {
                builder = builder.header(REFERER, referer);
            }
            if let Some(fields) = form_fields {
                builder = builder.form(fields);
            }

            let r = builder.send().await?;
            let status = r.status();

            if status == StatusCode::TEMPORARY_REDIRECT {
                if hops >= self.max_redirects {
                    return Err(PortalError::RedirectLimit(self.max_redirects));
                }
                let location = r
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| PortalError::page_shape("307 without Location"))?;
                target = target.join(location)?;
                hops += 1;
                continue;
            }

            let final_url = r.url().to_string();
            let headers: Vec<(String, String)> = r
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect();

            let body = r.text().await?;

            return Ok(PortalResponse {
                url: url.to_string(),
                final_url,
                status: status.as_u16(),
                headers,
                body,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, location: Option<&str>) -> PortalResponse {
        PortalResponse {
            url: "https://portal.example/mobile/quickcontrol/serv/ChangeShiftServ".to_string(),
            final_url: "https://portal.example/mobile/quickcontrol/serv/ChangeShiftServ"
                .to_string(),
            status,
            headers: location
                .map(|l| vec![("location".to_string(), l.to_string())])
                .unwrap_or_default(),
            body: String::new(),
        }
    }

    #[test]
    fn test_transport_creation() {
        let transport = Transport::new(&ClientConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_relative_location_is_resolved() {
        let resp = response(302, Some("/mobile/summary/summary.jsp"));
        assert_eq!(
            resp.location().as_deref(),
            Some("https://portal.example/mobile/summary/summary.jsp")
        );
        assert!(resp.redirects_to("/summary.jsp"));
    }

    #[test]
    fn test_redirects_to_is_case_insensitive() {
        let resp = response(302, Some("https://portal.example/mobile/ControlDone.JSP"));
        assert!(resp.redirects_to("/controldone.jsp"));
        assert!(!resp.redirects_to("/summary.jsp"));
    }

    #[test]
    fn test_redirects_to_requires_redirect_status() {
        let resp = response(200, Some("/mobile/summary/summary.jsp"));
        assert!(!resp.redirects_to("/summary.jsp"));
        assert!(!response(302, None).redirects_to("/summary.jsp"));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let resp = response(302, Some("/x"));
        assert_eq!(resp.header("Location"), Some("/x"));
        assert!(resp.header("set-cookie").is_none());
    }
}
