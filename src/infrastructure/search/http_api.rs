// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::ChannelDetail;
use crate::domain::models::raw_result::RawResult;
use crate::domain::models::search_job::SearchJob;
use crate::domain::models::video::VideoDetail;
use crate::domain::search::{DetailApi, SearchApiError, SearchPage, VideoSearchApi};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 基于reqwest的搜索/详情API客户端
///
/// 只负责单次HTTP交互与响应解析，分页、轮换、重试都在上层。
/// `base_url` 可配置，测试时指向本地桩服务。
pub struct HttpSearchApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 状态码到错误分类的映射
    async fn classify_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SearchApiError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::FORBIDDEN => Err(SearchApiError::QuotaExceeded),
            StatusCode::TOO_MANY_REQUESTS => Err(SearchApiError::RateLimited),
            status => {
                let body = response.text().await.unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                Err(SearchApiError::Unexpected(format!(
                    "HTTP {}: {}",
                    status, snippet
                )))
            }
        }
    }

    fn classify_transport(err: reqwest::Error) -> SearchApiError {
        if err.is_timeout() || err.is_connect() {
            SearchApiError::Transient(err.to_string())
        } else {
            SearchApiError::Unexpected(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "customUrl")]
    custom_url: Option<String>,
    country: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "defaultAudioLanguage")]
    default_audio_language: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl Thumbnails {
    fn best_url(&self) -> Option<String> {
        self.high
            .as_ref()
            .and_then(|t| t.url.clone())
            .or_else(|| self.default.as_ref().and_then(|t| t.url.clone()))
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// 统计字段在线上是字符串，缺失或不可解析记0
fn parse_count(value: Option<&String>) -> i64 {
    value.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

/// 解析 ISO 8601 时长（如 "PT1H2M3S"、"P1DT2H"）为秒数
fn parse_iso8601_duration(value: &str) -> i64 {
    let mut total: i64 = 0;
    let mut number = String::new();
    let mut in_time = false;

    for ch in value.chars() {
        match ch {
            'P' => {}
            'T' => in_time = true,
            '0'..='9' => number.push(ch),
            unit => {
                let n: i64 = number.parse().unwrap_or(0);
                number.clear();
                total += match (unit, in_time) {
                    ('D', false) => n * 86_400,
                    ('H', true) => n * 3_600,
                    ('M', true) => n * 60,
                    ('S', true) => n,
                    _ => 0,
                };
            }
        }
    }
    total
}

#[async_trait]
impl VideoSearchApi for HttpSearchApi {
    async fn search_page(
        &self,
        api_key: &str,
        job: &SearchJob,
        published_after: Option<DateTime<Utc>>,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SearchPage, SearchApiError> {
        let url = format!("{}/search", self.base_url);
        let max_results = page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("order", "date"),
            ("q", &job.query),
            ("regionCode", &job.region_code),
            ("relevanceLanguage", &job.language),
            ("maxResults", &max_results),
            ("key", api_key),
        ];
        let published_after_str =
            published_after.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        if let Some(after) = published_after_str.as_deref() {
            params.push(("publishedAfter", after));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(Self::classify_transport)?;
        let response = Self::classify_response(response).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchApiError::Unexpected(format!("malformed response: {}", e)))?;

        let items = body
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let snippet = item.snippet?;
                let channel_id = snippet.channel_id?;
                Some(RawResult {
                    video_id,
                    channel_id,
                    published_at: parse_timestamp(snippet.published_at.as_deref()),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            query = %job.query,
            items = items.len(),
            has_next = body.next_page_token.is_some(),
            "Search page fetched"
        );
        Ok(SearchPage {
            items,
            next_page_token: body.next_page_token,
        })
    }
}

#[async_trait]
impl DetailApi for HttpSearchApi {
    async fn fetch_channels(
        &self,
        api_key: &str,
        channel_ids: &[String],
    ) -> Result<Vec<ChannelDetail>, SearchApiError> {
        let url = format!("{}/channels", self.base_url);
        let ids = channel_ids.join(",");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", ids.as_str()),
                ("maxResults", "50"),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(Self::classify_transport)?;
        let response = Self::classify_response(response).await?;
        let body: ChannelsResponse = response
            .json()
            .await
            .map_err(|e| SearchApiError::Unexpected(format!("malformed response: {}", e)))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| {
                let snippet = item.snippet.unwrap_or(ChannelSnippet {
                    title: None,
                    description: None,
                    custom_url: None,
                    country: None,
                    published_at: None,
                    thumbnails: None,
                });
                let stats = item.statistics;
                ChannelDetail {
                    channel_id: item.id,
                    title: snippet.title.unwrap_or_default(),
                    handle: snippet.custom_url,
                    description: snippet.description.unwrap_or_default(),
                    thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best_url),
                    country_code: snippet.country,
                    subscriber_count: parse_count(
                        stats.as_ref().and_then(|s| s.subscriber_count.as_ref()),
                    ),
                    video_count: parse_count(stats.as_ref().and_then(|s| s.video_count.as_ref())),
                    view_count: parse_count(stats.as_ref().and_then(|s| s.view_count.as_ref())),
                    published_at: parse_timestamp(snippet.published_at.as_deref()),
                }
            })
            .collect())
    }

    async fn fetch_videos(
        &self,
        api_key: &str,
        video_ids: &[String],
    ) -> Result<Vec<VideoDetail>, SearchApiError> {
        let url = format!("{}/videos", self.base_url);
        let ids = video_ids.join(",");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", ids.as_str()),
                ("maxResults", "50"),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(Self::classify_transport)?;
        let response = Self::classify_response(response).await?;
        let body: VideosResponse = response
            .json()
            .await
            .map_err(|e| SearchApiError::Unexpected(format!("malformed response: {}", e)))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| {
                let snippet = item.snippet.unwrap_or(VideoSnippet {
                    channel_id: None,
                    title: None,
                    description: None,
                    published_at: None,
                    tags: Vec::new(),
                    default_audio_language: None,
                    thumbnails: None,
                });
                let stats = item.statistics;
                VideoDetail {
                    video_id: item.id,
                    channel_id: snippet.channel_id.unwrap_or_default(),
                    title: snippet.title.unwrap_or_default(),
                    description: snippet.description.unwrap_or_default(),
                    thumbnail_url: snippet.thumbnails.as_ref().and_then(Thumbnails::best_url),
                    published_at: parse_timestamp(snippet.published_at.as_deref()),
                    duration_seconds: item
                        .content_details
                        .and_then(|c| c.duration)
                        .map(|d| parse_iso8601_duration(&d))
                        .unwrap_or(0),
                    view_count: parse_count(stats.as_ref().and_then(|s| s.view_count.as_ref())),
                    like_count: parse_count(stats.as_ref().and_then(|s| s.like_count.as_ref())),
                    comment_count: parse_count(
                        stats.as_ref().and_then(|s| s.comment_count.as_ref()),
                    ),
                    tags: snippet.tags,
                    language: snippet.default_audio_language,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT3M20S"), 200);
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration("P1DT2H"), 93600);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration(""), 0);
    }

    #[test]
    fn test_parse_count_handles_missing_and_garbage() {
        assert_eq!(parse_count(Some(&"1234".to_string())), 1234);
        assert_eq!(parse_count(Some(&"n/a".to_string())), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "nextPageToken": "CAUQAA",
            "items": [
                {"id": {"videoId": "abc"}, "snippet": {"channelId": "UC1", "publishedAt": "2026-01-02T03:04:05Z"}},
                {"id": {}, "snippet": {"channelId": "UC2"}}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.next_page_token.as_deref(), Some("CAUQAA"));
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].id.video_id.as_deref(), Some("abc"));
        // 缺少videoId的条目在映射阶段被过滤
        assert!(parsed.items[1].id.video_id.is_none());
    }
}
