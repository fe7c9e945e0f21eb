// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 频道详情
///
/// 详情API返回的频道原始元数据，转换阶段的输入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDetail {
    pub channel_id: String,
    pub title: String,
    /// 自定义短链句柄（如 "@somecreator"）
    pub handle: Option<String>,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub country_code: Option<String>,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
}

/// 频道记录
///
/// 转换阶段的输出，携带联系方式与互动指标，
/// 按 `channel_id` 批量upsert到存储。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub name: String,
    pub handle: Option<String>,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub country_code: Option<String>,
    pub subscriber_count: i64,
    pub total_video_count: i64,
    pub total_view_count: i64,
    pub channel_created_at: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,

    /// 首选联系邮箱
    pub primary_email: Option<String>,
    /// 首选 Instagram 链接
    pub primary_instagram: Option<String>,
    /// 首选网站链接
    pub primary_website: Option<String>,
    pub has_email: bool,
    pub has_instagram: bool,

    /// 平均单视频播放量
    pub avg_views: i64,
    /// 播放量/订阅数 百分比，作为互动率的近似
    pub engagement_rate: f64,

    pub discovered_at: DateTime<Utc>,
}

/// 提取到的邮箱记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEmailRecord {
    pub channel_id: String,
    pub email: String,
}

/// 社交链接记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinkRecord {
    pub channel_id: String,
    /// 平台标识（instagram / twitter / tiktok / facebook / youtube / website）
    pub platform: String,
    pub url: String,
}
