// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::TargetCategory;
use crate::domain::repositories::category_repository::CategoryRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::target_category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

/// 目标分类仓库实现
///
/// 基于SeaORM实现的目标分类数据访问层
#[derive(Clone)]
pub struct CategoryRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CategoryRepositoryImpl {
    /// 创建新的目标分类仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<target_category::Model> for TargetCategory {
    fn from(model: target_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            search_query: model.search_query,
            last_fetched_at: model.last_fetched_at.map(|t| t.with_timezone(&Utc)),
            priority: model.priority,
            is_active: model.is_active,
        }
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn active_categories(&self) -> Result<Vec<TargetCategory>, RepositoryError> {
        let models = target_category::Entity::find()
            .filter(target_category::Column::IsActive.eq(true))
            .order_by_desc(target_category::Column::Priority)
            .order_by_asc(target_category::Column::Name)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_fetched(&self, id: i32, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let result = target_category::Entity::update_many()
            .col_expr(
                target_category::Column::LastFetchedAt,
                Expr::value(Some(at.fixed_offset())),
            )
            .col_expr(
                target_category::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(target_category::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
