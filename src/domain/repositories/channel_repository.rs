// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::{ChannelRecord, ExtractedEmailRecord, SocialLinkRecord};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::HashSet;

/// 频道仓库特质
///
/// 定义频道及其联系方式的数据访问接口
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// 返回给定ID中已存在于存储的子集
    async fn existing_channel_ids(
        &self,
        channel_ids: &[String],
    ) -> Result<HashSet<String>, RepositoryError>;
    /// 按 channel_id 批量upsert频道记录
    async fn bulk_upsert(&self, channels: &[ChannelRecord]) -> Result<(), RepositoryError>;
    /// 批量保存提取到的邮箱，重复的 (channel_id, email) 忽略
    async fn save_emails(&self, emails: &[ExtractedEmailRecord]) -> Result<(), RepositoryError>;
    /// 批量保存社交链接，重复的 (channel_id, url) 忽略
    async fn save_social_links(
        &self,
        links: &[SocialLinkRecord],
    ) -> Result<(), RepositoryError>;
}
