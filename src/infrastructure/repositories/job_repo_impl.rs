// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::{JobRepository, JobStatus};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::automation_job;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

/// 自动化任务仓库实现
///
/// 基于SeaORM实现的自动化任务审计记录访问层
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的自动化任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn finish(
        &self,
        job_id: i32,
        status: JobStatus,
        result: Option<serde_json::Value>,
        error: Option<String>,
    ) -> Result<(), RepositoryError> {
        let model = automation_job::Entity::find_by_id(job_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: automation_job::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.finished_at = Set(Some(Utc::now().fixed_offset()));
        active.result = Set(result);
        active.error = Set(error);
        active.update(self.db.as_ref()).await?;
        Ok(())
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn start(&self, job_type: &str) -> Result<i32, RepositoryError> {
        let model = automation_job::ActiveModel {
            job_type: Set(job_type.to_string()),
            status: Set(JobStatus::Running.as_str().to_string()),
            started_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.id)
    }

    async fn complete(
        &self,
        job_id: i32,
        summary: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        self.finish(job_id, JobStatus::Completed, Some(summary), None)
            .await
    }

    async fn fail(&self, job_id: i32, error: &str) -> Result<(), RepositoryError> {
        self.finish(job_id, JobStatus::Failed, None, Some(error.to_string()))
            .await
    }
}
