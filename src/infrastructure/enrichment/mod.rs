// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 富化基础设施模块
///
/// 对频道做补充性联系方式挖掘的具体实现
pub mod about_scraper;

pub use about_scraper::AboutPageScraper;
