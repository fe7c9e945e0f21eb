// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::TargetCategory;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 目标分类仓库特质
///
/// 定义目标分类数据访问接口
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// 按优先级返回所有启用的分类
    async fn active_categories(&self) -> Result<Vec<TargetCategory>, RepositoryError>;
    /// 分类流水线成功收尾后推进抓取水位
    async fn mark_fetched(&self, id: i32, at: DateTime<Utc>) -> Result<(), RepositoryError>;
}
