// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索领域模块
///
/// 定义对外部视频搜索/详情API的抽象接口及其错误分类
pub mod api;

pub use api::{DetailApi, SearchApiError, SearchPage, VideoSearchApi};
