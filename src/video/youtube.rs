//! YouTube Data API v3 client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{VideoSearch, VideoSearchError};
use crate::config::VideoConfig;
use crate::verify::VideoRef;

/// A search hit with the statistics needed for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub view_count: u64,
}

impl VideoCandidate {
    pub fn watch_url(&self) -> String {
        VideoRef::youtube_watch_url(&self.video_id)
    }
}

/// Most-viewed candidate whose title mentions the tool and that clears `min_views`.
///
/// Keywords are the tool name's words longer than two characters. Equal view
/// counts keep the API's original order.
pub fn select_most_viewed(
    tool_name: &str,
    candidates: &[VideoCandidate],
    min_views: u64,
) -> Option<VideoCandidate> {
    let name = tool_name.to_lowercase();
    let keywords: Vec<&str> = name
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect();

    let mut best: Option<&VideoCandidate> = None;
    for candidate in candidates {
        let title = candidate.title.to_lowercase();
        if candidate.view_count < min_views || !keywords.iter().any(|kw| title.contains(kw)) {
            continue;
        }
        if best.map_or(true, |top| candidate.view_count > top.view_count) {
            best = Some(candidate);
        }
    }
    best.cloned()
}

/// Query used for video search.
pub fn search_query(tool_name: &str) -> String {
    format!("{} AI tutorial review", tool_name.trim())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    view_count: Option<String>,
}

/// YouTube search: relevance-ordered search, then a statistics lookup.
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    max_results: u32,
    min_view_count: u64,
}

impl YouTubeClient {
    pub fn new(client: Client, config: &VideoConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_results: config.max_results,
            min_view_count: config.min_view_count,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, VideoSearchError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.api_base, path))
            .query(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(VideoSearchError::Api(format!(
                "YouTube {} API error: {}",
                path,
                resp.status()
            )));
        }
        resp.json()
            .await
            .map_err(|e| VideoSearchError::Parse(e.to_string()))
    }

    /// Search and enrich results with view counts.
    pub async fn candidates(&self, tool_name: &str) -> Result<Vec<VideoCandidate>, VideoSearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(VideoSearchError::NotConfigured)?;

        let query = search_query(tool_name);
        let max_results = self.max_results.to_string();
        let search: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", query.as_str()),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("order", "relevance"),
                    ("key", api_key),
                ],
            )
            .await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids.join(",");
        let videos: VideosResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "statistics,snippet"),
                    ("id", ids.as_str()),
                    ("key", api_key),
                ],
            )
            .await?;

        Ok(videos
            .items
            .into_iter()
            .map(|item| VideoCandidate {
                view_count: item
                    .statistics
                    .and_then(|s| s.view_count)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
                video_id: item.id,
                title: item.snippet.title,
            })
            .collect())
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn find_most_viewed(&self, tool_name: &str) -> Result<Option<String>, VideoSearchError> {
        let candidates = self.candidates(tool_name).await?;
        debug!("YouTube returned {} candidates for '{}'", candidates.len(), tool_name);
        Ok(select_most_viewed(tool_name, &candidates, self.min_view_count)
            .map(|video| video.watch_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn candidate(id: &str, title: &str, views: u64) -> VideoCandidate {
        VideoCandidate {
            video_id: id.to_string(),
            title: title.to_string(),
            view_count: views,
        }
    }

    #[test]
    fn test_select_requires_keyword_and_threshold() {
        let videos = vec![
            candidate("aaaaaaaaaaa", "Top 10 AI apps", 900_000),
            candidate("bbbbbbbbbbb", "Notion AI tutorial", 9_999),
            candidate("ccccccccccc", "Notion for beginners", 50_000),
            candidate("ddddddddddd", "NOTION deep dive", 80_000),
        ];
        let best = select_most_viewed("Notion", &videos, 10_000).unwrap();
        assert_eq!(best.video_id, "ddddddddddd");
    }

    #[test]
    fn test_select_tie_keeps_first() {
        let videos = vec![
            candidate("aaaaaaaaaaa", "Runway Gen-3 review", 20_000),
            candidate("bbbbbbbbbbb", "Runway tips", 20_000),
        ];
        assert_eq!(
            select_most_viewed("Runway", &videos, 10_000).unwrap().video_id,
            "aaaaaaaaaaa"
        );
    }

    #[test]
    fn test_short_words_are_not_keywords() {
        let videos = vec![candidate("aaaaaaaaaaa", "An AI tool", 1_000_000)];
        assert!(select_most_viewed("An AI", &videos, 10_000).is_none());
    }

    fn client_for(server: &mockito::ServerGuard, key: Option<&str>) -> YouTubeClient {
        let config = VideoConfig {
            api_key: key.map(str::to_string),
            api_base: server.url(),
            ..VideoConfig::default()
        };
        YouTubeClient::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_find_most_viewed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Notion AI tutorial review".into()),
                Matcher::UrlEncoded("key".into(), "yt-key".into()),
                Matcher::UrlEncoded("maxResults".into(), "15".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"items":[{"id":{"videoId":"aaaaaaaaaaa"}},{"id":{"videoId":"bbbbbbbbbbb"}},{"id":{"channelId":"x"}}]}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded(
                "id".into(),
                "aaaaaaaaaaa,bbbbbbbbbbb".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"items":[
                    {"id":"aaaaaaaaaaa","snippet":{"title":"Notion in 10 minutes"},"statistics":{"viewCount":"120000"}},
                    {"id":"bbbbbbbbbbb","snippet":{"title":"Notion AI review"},"statistics":{"viewCount":"450000"}}
                ]}"#,
            )
            .create_async()
            .await;

        let url = client_for(&server, Some("yt-key"))
            .find_most_viewed("Notion")
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://www.youtube.com/watch?v=bbbbbbbbbbb"));
    }

    #[tokio::test]
    async fn test_empty_search_skips_stats() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;
        let stats = server
            .mock("GET", "/videos")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let url = client_for(&server, Some("k")).find_most_viewed("Notion").await.unwrap();
        assert!(url.is_none());
        stats.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_and_missing_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).find_most_viewed("Notion").await.unwrap_err();
        assert!(matches!(err, VideoSearchError::Api(_)));

        let client = client_for(&server, None);
        assert!(!client.is_configured());
        assert!(matches!(
            client.find_most_viewed("Notion").await.unwrap_err(),
            VideoSearchError::NotConfigured
        ));
    }
}
