// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单个分类运行摘要
///
/// 每次分类流水线结束后产生的临时统计，不做结构化持久化，
/// 仅记入日志并汇总进自动化任务记录。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub jobs_run: usize,
    pub raw_results: usize,
    pub unique_videos: usize,
    pub unique_channels: usize,
    pub emails_found: usize,
    pub leads_created: usize,
    pub errors: Vec<String>,
}

impl CategorySummary {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }
}

/// 整次发现运行的汇总报告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub categories: Vec<CategorySummary>,
    pub total_videos: usize,
    pub total_leads: usize,
    /// 是否因密钥池耗尽而提前停止
    pub halted_early: bool,
}
