//! YouTube Data API channel lookup.
//!
//! Resolves batches of channel ids to [`ChannelMetadata`] through the
//! `channels.list` endpoint. The API key is handed in by the caller; this
//! crate never reads process state.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use vtdex_shared::{ChannelMetadata, MAX_CHANNEL_BATCH, Result, VtdexError, YoutubeConfig};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("vtdex/", env!("CARGO_PKG_VERSION"));

/// `channels.list` path under the API origin.
const CHANNELS_PATH: &str = "/youtube/v3/channels";

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// `channels.list` response body. `items` is omitted when nothing matched.
#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    custom_url: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl From<Snippet> for ChannelMetadata {
    fn from(snippet: Snippet) -> Self {
        Self {
            display_name: snippet.title,
            thumbnail_url: snippet.thumbnails.high.map(|t| t.url).unwrap_or_default(),
            handle: snippet.custom_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated `channels.list` client.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl YoutubeClient {
    /// Create a client for the configured API origin using `api_key`.
    pub fn new(config: &YoutubeConfig, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(&config.api_base_url)
            .and_then(|base| base.join(CHANNELS_PATH))
            .map_err(|e| {
                VtdexError::config(format!(
                    "invalid youtube api_base_url '{}': {e}",
                    config.api_base_url
                ))
            })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VtdexError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Look up to [`MAX_CHANNEL_BATCH`] channel ids in one request.
    ///
    /// Ids the API does not return are simply absent from the map.
    #[instrument(skip_all, fields(ids = ids.len()))]
    pub async fn lookup_channels(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, ChannelMetadata>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        if ids.len() > MAX_CHANNEL_BATCH {
            return Err(VtdexError::validation(format!(
                "{} channel ids requested, the API accepts at most {MAX_CHANNEL_BATCH}",
                ids.len()
            )));
        }

        let joined = ids.join(",");
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("key", self.api_key.as_str()),
                ("id", joined.as_str()),
                ("part", "snippet,contentDetails"),
            ])
            .send()
            .await
            .map_err(|e| VtdexError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VtdexError::Network(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        let body: ChannelListResponse = response
            .json()
            .await
            .map_err(|e| VtdexError::parse(format!("invalid channels response: {e}")))?;

        debug!(requested = ids.len(), returned = body.items.len(), "channel lookup done");

        Ok(body
            .items
            .into_iter()
            .map(|item| (item.id, ChannelMetadata::from(item.snippet)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> YoutubeClient {
        let config = YoutubeConfig {
            api_base_url: server.uri(),
            ..Default::default()
        };
        YoutubeClient::new(&config, "test-key").unwrap()
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn maps_returned_items_by_id() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "items": [{
                "id": "UCa",
                "snippet": {
                    "title": "Channel A",
                    "customUrl": "@channela",
                    "thumbnails": {
                        "default": { "url": "https://yt3.example.com/a=s88" },
                        "high": { "url": "https://yt3.example.com/a=s800" }
                    }
                }
            }]
        });

        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .and(query_param("key", "test-key"))
            .and(query_param("id", "UCa,UCb"))
            .and(query_param("part", "snippet,contentDetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let found = client_for(&server)
            .lookup_channels(&ids(&["UCa", "UCb"]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        let a = &found["UCa"];
        assert_eq!(a.display_name, "Channel A");
        assert_eq!(a.thumbnail_url, "https://yt3.example.com/a=s800");
        assert_eq!(a.handle, "@channela");
        assert!(!found.contains_key("UCb"));
    }

    #[tokio::test]
    async fn response_without_items_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "kind": "youtube#channelListResponse" }),
            ))
            .mount(&server)
            .await;

        let found = client_for(&server)
            .lookup_channels(&ids(&["UCgone"]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn api_error_status_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .lookup_channels(&ids(&["UCa"]))
            .await
            .unwrap_err();
        assert!(matches!(err, VtdexError::Network(_)));
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_without_a_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let too_many: Vec<String> = (0..=MAX_CHANNEL_BATCH).map(|i| format!("UC{i}")).collect();
        let err = client_for(&server)
            .lookup_channels(&too_many)
            .await
            .unwrap_err();
        assert!(matches!(err, VtdexError::Validation { .. }));
    }
}
