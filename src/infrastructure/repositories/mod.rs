// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于SeaORM实现领域层定义的仓库接口
/// 负责领域模型与数据库实体之间的转换
pub mod category_repo_impl;
pub mod channel_repo_impl;
pub mod job_repo_impl;
pub mod lead_repo_impl;
pub mod stats_repo_impl;
pub mod video_repo_impl;

pub use category_repo_impl::CategoryRepositoryImpl;
pub use channel_repo_impl::ChannelRepositoryImpl;
pub use job_repo_impl::JobRepositoryImpl;
pub use lead_repo_impl::LeadRepositoryImpl;
pub use stats_repo_impl::StatsRepositoryImpl;
pub use video_repo_impl::VideoRepositoryImpl;

/// IN 查询的ID分块大小，避免超长参数列表
pub(crate) const ID_CHUNK_SIZE: usize = 500;
