// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::ChannelDetail;
use crate::domain::models::raw_result::RawResult;
use crate::domain::models::search_job::SearchJob;
use crate::domain::models::video::VideoDetail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 搜索API错误分类
///
/// 四类错误对应四种不同的恢复策略：
/// - QuotaExceeded：密钥级，换下一个密钥重试同一页，当天不再用该密钥
/// - RateLimited：全局级，固定冷却后用同一密钥重试同一页
/// - Transient：网络级，短暂等待后有限次重试
/// - Unexpected：不重试，当前作业以部分结果收尾
#[derive(Debug, Error, Clone)]
pub enum SearchApiError {
    #[error("API key quota exceeded")]
    QuotaExceeded,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Transient network error: {0}")]
    Transient(String),
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

/// 单页搜索结果
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<RawResult>,
    /// 下一页游标，缺失表示该查询已取尽
    pub next_page_token: Option<String>,
}

/// 视频搜索API
///
/// 一页一调用。分页、密钥轮换与重试全部由执行器负责，
/// 实现方只做单次HTTP交互和状态码到错误分类的映射。
#[async_trait]
pub trait VideoSearchApi: Send + Sync {
    async fn search_page(
        &self,
        api_key: &str,
        job: &SearchJob,
        published_after: Option<DateTime<Utc>>,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SearchPage, SearchApiError>;
}

/// 详情API
///
/// 批量查询频道/视频的完整元数据，单次调用最多50个ID。
/// 分块与并发由调用方（详情拉取器）负责。
#[async_trait]
pub trait DetailApi: Send + Sync {
    async fn fetch_channels(
        &self,
        api_key: &str,
        channel_ids: &[String],
    ) -> Result<Vec<ChannelDetail>, SearchApiError>;

    async fn fetch_videos(
        &self,
        api_key: &str,
        video_ids: &[String],
    ) -> Result<Vec<VideoDetail>, SearchApiError>;
}
