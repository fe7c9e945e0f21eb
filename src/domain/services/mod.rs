// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含不依赖具体基础设施的业务规则：
/// - API密钥池（key_pool）：配额感知的轮换密钥池
/// - 回溯窗口（lookback）：按分类计算 publishedAfter 截止时间
/// - 联系方式提取（contact_extractor）：从自由文本提取邮箱与社交链接
/// - 富化接口（enrichment）：about页面联系方式富化的抽象
/// - 转换器（transformer）：详情+富化数据到持久化记录的合并
pub mod contact_extractor;
pub mod enrichment;
pub mod key_pool;
pub mod lookback;
pub mod transformer;
