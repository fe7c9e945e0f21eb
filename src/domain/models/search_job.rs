// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 搜索作业
///
/// 一个具体的 (查询 × 地区 × 语言) 组合，由搜索矩阵展开产生，
/// 由分页搜索执行器消费。纯值对象，除字段元组外没有身份。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchJob {
    /// 搜索查询字符串
    pub query: String,
    /// ISO 3166-1 alpha-2 地区代码（如 "IN", "US", "GB"）
    pub region_code: String,
    /// BCP-47 语言代码（如 "hi", "en"）
    pub language: String,
    /// 所属分类名称
    pub category_name: String,
}

impl SearchJob {
    pub fn new(
        query: impl Into<String>,
        region_code: impl Into<String>,
        language: impl Into<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            region_code: region_code.into(),
            language: language.into(),
            category_name: category_name.into(),
        }
    }
}
