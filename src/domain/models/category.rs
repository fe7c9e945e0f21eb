// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 目标分类实体
///
/// 表示一个配置好的潜在客户目标分类。`last_fetched_at` 是
/// 抓取引擎唯一会修改的字段，仅在该分类的完整流水线无致命
/// 错误地结束后更新，作为下次运行的回溯游标。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCategory {
    /// 分类唯一标识符
    pub id: i32,
    /// 分类名称，与搜索矩阵的键严格对应
    pub name: String,
    /// 存储的原始搜索查询，矩阵缺失时的兜底查询
    pub search_query: String,
    /// 上次成功运行完成的时间，首次运行前为空
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// 优先级，数值越大越先处理
    pub priority: i32,
    /// 是否参与发现流水线
    pub is_active: bool,
}
