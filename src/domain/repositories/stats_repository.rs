// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 单个分类单次运行的聚合统计
#[derive(Debug, Clone)]
pub struct DiscoveryStatRecord {
    pub category_id: Option<i32>,
    pub videos_found: i64,
    pub channels_found: i64,
    pub emails_found: i64,
    pub leads_created: i64,
    pub run_at: DateTime<Utc>,
}

/// 统计仓库特质
///
/// 统计是只追加的观察数据，写入失败只记日志，不影响流水线结果。
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn record(&self, stat: &DiscoveryStatRecord) -> Result<(), RepositoryError>;
}
