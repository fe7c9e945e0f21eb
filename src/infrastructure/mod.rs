// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 领域层抽象的具体实现：数据库、仓库、搜索API接入与富化
pub mod database;
pub mod enrichment;
pub mod repositories;
pub mod search;
