// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::stats_repository::{DiscoveryStatRecord, StatsRepository};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::discovery_stat;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;

/// 统计仓库实现
///
/// 基于SeaORM实现的发现统计访问层
#[derive(Clone)]
pub struct StatsRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl StatsRepositoryImpl {
    /// 创建新的统计仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for StatsRepositoryImpl {
    async fn record(&self, stat: &DiscoveryStatRecord) -> Result<(), RepositoryError> {
        let model = discovery_stat::ActiveModel {
            category_id: Set(stat.category_id),
            videos_found: Set(stat.videos_found),
            channels_found: Set(stat.channels_found),
            emails_found: Set(stat.emails_found),
            leads_created: Set(stat.leads_created),
            run_at: Set(stat.run_at.fixed_offset()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }
}
