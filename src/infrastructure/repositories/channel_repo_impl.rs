// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::{ChannelRecord, ExtractedEmailRecord, SocialLinkRecord};
use crate::domain::repositories::channel_repository::ChannelRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{channel, channel_social_link, extracted_email};
use crate::infrastructure::repositories::ID_CHUNK_SIZE;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use std::collections::HashSet;
use std::sync::Arc;

/// 频道仓库实现
///
/// 基于SeaORM实现的频道数据访问层
#[derive(Clone)]
pub struct ChannelRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ChannelRepositoryImpl {
    /// 创建新的频道仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(record: &ChannelRecord) -> channel::ActiveModel {
    channel::ActiveModel {
        channel_id: Set(record.channel_id.clone()),
        name: Set(record.name.clone()),
        handle: Set(record.handle.clone()),
        description: Set(record.description.clone()),
        thumbnail_url: Set(record.thumbnail_url.clone()),
        country_code: Set(record.country_code.clone()),
        subscriber_count: Set(record.subscriber_count),
        total_video_count: Set(record.total_video_count),
        total_view_count: Set(record.total_view_count),
        channel_created_at: Set(record.channel_created_at.map(|t| t.fixed_offset())),
        category_id: Set(record.category_id),
        primary_email: Set(record.primary_email.clone()),
        primary_instagram: Set(record.primary_instagram.clone()),
        primary_website: Set(record.primary_website.clone()),
        has_email: Set(record.has_email),
        has_instagram: Set(record.has_instagram),
        avg_views: Set(record.avg_views),
        engagement_rate: Set(record.engagement_rate),
        discovered_at: Set(record.discovered_at.fixed_offset()),
        updated_at: Set(Utc::now().fixed_offset()),
    }
}

/// insert-ignore语义下"全部命中冲突"不是错误
fn ignore_nothing_inserted(err: DbErr) -> Result<(), RepositoryError> {
    match err {
        DbErr::RecordNotInserted => Ok(()),
        other => Err(other.into()),
    }
}

#[async_trait]
impl ChannelRepository for ChannelRepositoryImpl {
    async fn existing_channel_ids(
        &self,
        channel_ids: &[String],
    ) -> Result<HashSet<String>, RepositoryError> {
        let mut found = HashSet::new();
        for chunk in channel_ids.chunks(ID_CHUNK_SIZE) {
            let ids: Vec<String> = channel::Entity::find()
                .select_only()
                .column(channel::Column::ChannelId)
                .filter(channel::Column::ChannelId.is_in(chunk.to_vec()))
                .into_tuple()
                .all(self.db.as_ref())
                .await?;
            found.extend(ids);
        }
        Ok(found)
    }

    async fn bulk_upsert(&self, channels: &[ChannelRecord]) -> Result<(), RepositoryError> {
        if channels.is_empty() {
            return Ok(());
        }

        let models: Vec<channel::ActiveModel> = channels.iter().map(to_active_model).collect();
        channel::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(channel::Column::ChannelId)
                    .update_columns([
                        channel::Column::Name,
                        channel::Column::Handle,
                        channel::Column::Description,
                        channel::Column::ThumbnailUrl,
                        channel::Column::CountryCode,
                        channel::Column::SubscriberCount,
                        channel::Column::TotalVideoCount,
                        channel::Column::TotalViewCount,
                        channel::Column::PrimaryEmail,
                        channel::Column::PrimaryInstagram,
                        channel::Column::PrimaryWebsite,
                        channel::Column::HasEmail,
                        channel::Column::HasInstagram,
                        channel::Column::AvgViews,
                        channel::Column::EngagementRate,
                        channel::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn save_emails(&self, emails: &[ExtractedEmailRecord]) -> Result<(), RepositoryError> {
        if emails.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models: Vec<extracted_email::ActiveModel> = emails
            .iter()
            .map(|e| extracted_email::ActiveModel {
                channel_id: Set(e.channel_id.clone()),
                email: Set(e.email.clone()),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        match extracted_email::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    extracted_email::Column::ChannelId,
                    extracted_email::Column::Email,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => ignore_nothing_inserted(err),
        }
    }

    async fn save_social_links(
        &self,
        links: &[SocialLinkRecord],
    ) -> Result<(), RepositoryError> {
        if links.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models: Vec<channel_social_link::ActiveModel> = links
            .iter()
            .map(|l| channel_social_link::ActiveModel {
                channel_id: Set(l.channel_id.clone()),
                platform: Set(l.platform.clone()),
                url: Set(l.url.clone()),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        match channel_social_link::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    channel_social_link::Column::ChannelId,
                    channel_social_link::Column::Url,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => ignore_nothing_inserted(err),
        }
    }
}
