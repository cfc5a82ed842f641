//! HTTP access to the listing site.
//!
//! One shared `reqwest::Client` serves both the ranking pages and the
//! per-persona detail pages, with a bounded redirect policy and a
//! per-request timeout.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use vtdex_shared::{BasicRecord, DetailRecord, ListingConfig, Result, VtdexError};

use crate::detail::parse_detail_page;
use crate::listing::parse_listing_page;

/// User-Agent string for listing and detail requests.
const USER_AGENT: &str = concat!("vtdex/", env!("CARGO_PKG_VERSION"));

/// Client for the listing site's ranking and profile pages.
#[derive(Debug, Clone)]
pub struct HololistClient {
    client: Client,
    base_url: String,
}

impl HololistClient {
    /// Create a client for the configured listing site.
    pub fn new(config: &ListingConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            VtdexError::config(format!("invalid listing base_url '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VtdexError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the 1-based ranking page `page`.
    pub fn listing_page_url(&self, page: u32) -> Result<Url> {
        let raw = format!("{}/top/page/{page}", self.base_url);
        Url::parse(&raw).map_err(|e| VtdexError::parse(format!("invalid page URL {raw}: {e}")))
    }

    /// Fetch one ranking page and extract its persona cards.
    #[instrument(skip(self))]
    pub async fn fetch_listing_page(&self, page: u32) -> Result<Vec<BasicRecord>> {
        let url = self.listing_page_url(page)?;
        let body = self.get_html(&url).await?;
        Ok(parse_listing_page(&body, &url))
    }

    /// Fetch the profile page behind `record.url` and merge its fields onto the record.
    pub async fn fetch_detail(&self, record: BasicRecord) -> Result<DetailRecord> {
        let url = Url::parse(&record.url).map_err(|e| {
            VtdexError::parse(format!("invalid detail URL '{}': {e}", record.url))
        })?;
        let body = self.get_html(&url).await?;
        parse_detail_page(&body, record)
    }

    async fn get_html(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| VtdexError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VtdexError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| VtdexError::Network(format!("{url}: body read failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: &str) -> ListingConfig {
        ListingConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn listing_page_url_tolerates_trailing_slash() {
        let client = HololistClient::new(&config_for("https://hololist.net/")).unwrap();
        assert_eq!(
            client.listing_page_url(3).unwrap().as_str(),
            "https://hololist.net/top/page/3"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HololistClient::new(&config_for("not a url")).unwrap_err();
        assert!(matches!(err, VtdexError::Config { .. }));
    }

    #[tokio::test]
    async fn fetches_and_parses_listing_page() {
        let server = MockServer::start().await;

        let page = r#"<html><body>
            <div class="d-flex mb-4 rounded">
                <img class="lazy-image me-2 border rounded-circle" data-src="/img/suisei.jpg">
                <a class="line-truncate" href="/hoshimachi-suisei/">Suisei</a>
                <span itemprop="name">Suisei</span>
                <div itemprop="affiliation">Hololive</div>
            </div>
        </body></html>"#;

        Mock::given(method("GET"))
            .and(path("/top/page/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let client = HololistClient::new(&config_for(&server.uri())).unwrap();
        let records = client.fetch_listing_page(1).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, format!("{}/hoshimachi-suisei/", server.uri()));
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HololistClient::new(&config_for(&server.uri())).unwrap();
        let record = BasicRecord {
            name: "Ghost".into(),
            url: format!("{}/missing/", server.uri()),
            image: "https://hololist.net/img/ghost.jpg".into(),
            affiliation: String::new(),
        };

        let err = client.fetch_detail(record).await.unwrap_err();
        assert!(matches!(err, VtdexError::Network(_)));
        assert!(err.to_string().contains("404"));
    }
}
