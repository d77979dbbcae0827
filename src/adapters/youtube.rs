use crate::core::{SearchQuery, VideoId, VideoSearch};
use crate::utils::error::{MashupError, Result};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// YouTube Data API v3 的 search.list
pub struct YouTubeSearch {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl YouTubeSearch {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoId>> {
        let url = format!("{}/search", self.endpoint);
        let max_results = query.max_results.to_string();

        tracing::debug!("Making search request to: {} (q={:?})", url, query.text);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("q", query.text.as_str()),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Search response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(MashupError::SearchError { message });
        }

        let parsed: SearchResponse = serde_json::from_str(&response.text().await?)?;

        let ids = parsed
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter_map(|raw| {
                let id = VideoId::parse(&raw);
                if id.is_none() {
                    tracing::warn!("Skipping malformed video id from search: {}", raw);
                }
                id
            })
            .collect();

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn query(text: &str, max_results: u32) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            max_results,
        }
    }

    #[tokio::test]
    async fn test_search_returns_ids_in_provider_order() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("part", "id")
                .query_param("type", "video")
                .query_param("q", "Adele songs")
                .query_param("maxResults", "2")
                .query_param("key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "kind": "youtube#searchListResponse",
                    "items": [
                        {"id": {"kind": "youtube#video", "videoId": "bbbbbbbbbbb"}},
                        {"id": {"kind": "youtube#video", "videoId": "aaaaaaaaaaa"}}
                    ]
                }));
        });

        let search = YouTubeSearch::new(server.base_url(), "test-key");
        let ids = search.search(&query("Adele songs", 2)).await.unwrap();

        api_mock.assert();
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["bbbbbbbbbbb", "aaaaaaaaaaa"]);
    }

    #[tokio::test]
    async fn test_search_skips_items_without_video_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    {"id": {"kind": "youtube#channel", "channelId": "UC123"}},
                    {"id": {"kind": "youtube#video", "videoId": "ccccccccccc"}}
                ]
            }));
        });

        let search = YouTubeSearch::new(server.base_url(), "k");
        let ids = search.search(&query("x songs", 5)).await.unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "ccccccccccc");
    }

    #[tokio::test]
    async fn test_search_error_surfaces_provider_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(403).json_body(serde_json::json!({
                "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
            }));
        });

        let search = YouTubeSearch::new(server.base_url(), "k");
        let err = search.search(&query("x songs", 5)).await.unwrap_err();

        match err {
            MashupError::SearchError { message } => assert!(message.contains("quota")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_error_without_body_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(500);
        });

        let search = YouTubeSearch::new(format!("{}/", server.base_url()), "k");
        let err = search.search(&query("x songs", 1)).await.unwrap_err();

        assert!(err.to_string().contains("500"));
    }
}
