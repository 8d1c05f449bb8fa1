pub(crate) mod seasons;
pub(crate) mod stats;

use std::future::Future;
use std::time::Duration;

pub(crate) use ::scraper::Html;
use ::scraper::ElementRef;
use itertools::Itertools;
use tracing::debug;

use crate::error::{Result, SportschauError};

/// Fetches page bodies over HTTP.
///
/// [`HttpTransport`] is the real implementation; tests substitute their own
/// to serve canned pages and count requests.
pub trait Transport {
    /// GET `url` and return the response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SportschauError::ClientBuild)?;
        Ok(Self { http })
    }

    /// Create a transport using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SportschauError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SportschauError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| SportschauError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document<T: Transport>(transport: &T, url: &str) -> Result<Html> {
    let body = transport.get(url).await?;
    Ok(Html::parse_document(&body))
}

/// Text content of an element with all whitespace runs collapsed to a single
/// space.
pub(crate) fn cell_text(el: &ElementRef) -> String {
    el.text().flat_map(str::split_whitespace).join(" ")
}

/// Parse a German-formatted decimal such as `"10.234,5"` or `"54,3 %"`.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '%'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() || normalized == "-" {
        return None;
    }
    normalized.parse().ok()
}

/// Parse a German-formatted count such as `"1.024"`.
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    normalized.parse().ok()
}

/// Wait between two consecutive requests.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
