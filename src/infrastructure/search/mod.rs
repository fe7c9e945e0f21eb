// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索基础设施模块
///
/// 外部视频搜索API的具体接入与作业执行机制：
/// - 矩阵展开（matrix）：分类到搜索作业列表的静态定向矩阵
/// - 分页执行器（executor)：单作业的分页、密钥轮换与重试
/// - 扇出调度（fanout）：同分类作业的有界并发执行
/// - 去重器（deduplicator）：批内去重与对已落库状态的过滤
/// - 详情拉取（detail_fetcher）：频道/视频详情的分块批量拉取
/// - HTTP接入（http_api）：基于reqwest的真实API客户端
pub mod deduplicator;
pub mod detail_fetcher;
pub mod executor;
pub mod fanout;
pub mod http_api;
pub mod matrix;

pub use deduplicator::{Deduplicator, FreshSets};
pub use detail_fetcher::DetailFetcher;
pub use executor::{ExecutorConfig, JobOutcome, SearchJobExecutor};
pub use fanout::{FanoutResult, FanoutScheduler};
pub use http_api::HttpSearchApi;
