// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lead::NewLead;
use crate::domain::repositories::lead_repository::LeadRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::lead;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use std::sync::Arc;
use tracing::debug;

/// 线索仓库实现
///
/// 基于SeaORM实现的线索数据访问层
#[derive(Clone)]
pub struct LeadRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl LeadRepositoryImpl {
    /// 创建新的线索仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeadRepository for LeadRepositoryImpl {
    async fn exists_for_video(&self, video_id: &str) -> Result<bool, RepositoryError> {
        let count = lead::Entity::find()
            .filter(lead::Column::VideoId.eq(video_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, new_lead: &NewLead) -> Result<bool, RepositoryError> {
        let model = lead::ActiveModel {
            channel_id: Set(new_lead.channel_id.clone()),
            video_id: Set(new_lead.video_id.clone()),
            primary_email: Set(new_lead.primary_email.clone()),
            instagram_username: Set(new_lead.instagram_username.clone()),
            status: Set(new_lead.status.clone()),
            notes: Set(Some(new_lead.notes.clone())),
            created_at: Set(new_lead.created_at.fixed_offset()),
            ..Default::default()
        };

        // video_id上的唯一约束是最终防线，并发写入时冲突方静默跳过
        match lead::Entity::insert(model)
            .on_conflict(
                OnConflict::column(lead::Column::VideoId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => {
                debug!(video_id = %new_lead.video_id, "Lead already exists, skipped");
                Ok(false)
            }
            Err(other) => Err(other.into()),
        }
    }
}
