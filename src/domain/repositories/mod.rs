// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 目标分类仓库（category_repository）：管理目标分类与抓取水位
/// - 频道仓库（channel_repository）：管理频道记录与联系方式的批量落库
/// - 视频仓库（video_repository）：管理视频记录与已知视频判定
/// - 线索仓库（lead_repository）：管理线索的创建与按视频去重
/// - 自动化任务仓库（job_repository）：管理每次运行的审计记录
/// - 统计仓库（stats_repository）：管理每次运行的聚合统计
pub mod category_repository;
pub mod channel_repository;
pub mod job_repository;
pub mod lead_repository;
pub mod stats_repository;
pub mod video_repository;

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

pub use category_repository::CategoryRepository;
pub use channel_repository::ChannelRepository;
pub use job_repository::{JobRepository, JobStatus};
pub use lead_repository::LeadRepository;
pub use stats_repository::{DiscoveryStatRecord, StatsRepository};
pub use video_repository::VideoRepository;
