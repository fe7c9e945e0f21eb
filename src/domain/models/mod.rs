// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 目标分类（category）：配置的潜在客户目标分类及其抓取游标
/// - 搜索作业（search_job）：一个 (查询 × 地区 × 语言) 组合
/// - 原始结果（raw_result）：搜索API返回的最小结果单元
/// - 频道与视频（channel / video）：详情获取与转换后的记录
/// - 线索（lead）：携带联系方式的外联记录
/// - 运行摘要（run_summary）：单次分类运行的统计汇总
pub mod category;
pub mod channel;
pub mod lead;
pub mod raw_result;
pub mod run_summary;
pub mod search_job;
pub mod video;
