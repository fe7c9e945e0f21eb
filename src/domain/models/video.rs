// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 视频详情
///
/// 详情API返回的视频原始元数据，转换阶段的输入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetail {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: i64,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub tags: Vec<String>,
    pub language: Option<String>,
}

/// 视频记录
///
/// 转换阶段的输出，按 `video_id` insert-ignore到存储。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration_seconds: i64,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
