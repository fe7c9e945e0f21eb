// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video::VideoRecord;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::HashSet;

/// 视频仓库特质
///
/// 定义视频记录的数据访问接口
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// 返回给定ID中已存在于存储的子集
    async fn existing_video_ids(
        &self,
        video_ids: &[String],
    ) -> Result<HashSet<String>, RepositoryError>;
    /// 批量插入视频记录，已存在的 video_id 忽略
    async fn bulk_insert(&self, videos: &[VideoRecord]) -> Result<(), RepositoryError>;
}
