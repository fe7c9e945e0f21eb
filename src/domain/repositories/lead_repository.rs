// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lead::NewLead;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 线索仓库特质
///
/// 定义线索数据访问接口。`video_id` 上的唯一约束是
/// 防重复线索的最终依据，应用层判定只是减少无谓写入。
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// 该视频是否已有线索
    async fn exists_for_video(&self, video_id: &str) -> Result<bool, RepositoryError>;
    /// 创建线索；命中唯一约束时静默跳过并返回 `false`
    async fn create(&self, lead: &NewLead) -> Result<bool, RepositoryError>;
}
