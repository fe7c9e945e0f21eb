// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::video::VideoRecord;
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::video;
use crate::infrastructure::repositories::ID_CHUNK_SIZE;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use std::collections::HashSet;
use std::sync::Arc;

/// 视频仓库实现
///
/// 基于SeaORM实现的视频数据访问层
#[derive(Clone)]
pub struct VideoRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl VideoRepositoryImpl {
    /// 创建新的视频仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(record: &VideoRecord) -> video::ActiveModel {
    video::ActiveModel {
        video_id: Set(record.video_id.clone()),
        channel_id: Set(record.channel_id.clone()),
        title: Set(record.title.clone()),
        description: Set(record.description.clone()),
        thumbnail_url: Set(record.thumbnail_url.clone()),
        published_at: Set(record.published_at.map(|t| t.fixed_offset())),
        duration_seconds: Set(record.duration_seconds),
        view_count: Set(record.view_count),
        like_count: Set(record.like_count),
        comment_count: Set(record.comment_count),
        tags: Set(serde_json::json!(record.tags)),
        language: Set(record.language.clone()),
        fetched_at: Set(record.fetched_at.fixed_offset()),
    }
}

#[async_trait]
impl VideoRepository for VideoRepositoryImpl {
    async fn existing_video_ids(
        &self,
        video_ids: &[String],
    ) -> Result<HashSet<String>, RepositoryError> {
        let mut found = HashSet::new();
        for chunk in video_ids.chunks(ID_CHUNK_SIZE) {
            let ids: Vec<String> = video::Entity::find()
                .select_only()
                .column(video::Column::VideoId)
                .filter(video::Column::VideoId.is_in(chunk.to_vec()))
                .into_tuple()
                .all(self.db.as_ref())
                .await?;
            found.extend(ids);
        }
        Ok(found)
    }

    async fn bulk_insert(&self, videos: &[VideoRecord]) -> Result<(), RepositoryError> {
        if videos.is_empty() {
            return Ok(());
        }

        let models: Vec<video::ActiveModel> = videos.iter().map(to_active_model).collect();
        match video::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(video::Column::VideoId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
        {
            Ok(_) => Ok(()),
            // 全部命中冲突时SeaORM返回RecordNotInserted，对insert-ignore不是错误
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }
}
