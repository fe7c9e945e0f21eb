// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 原始搜索结果
///
/// 搜索API每页返回的最小结果单元。先在单个作业内按视频ID去重，
/// 再由去重器在整个分类运行范围内对照已持久化的数据二次去重。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    /// 视频唯一标识符
    pub video_id: String,
    /// 所属频道唯一标识符
    pub channel_id: String,
    /// 发布时间（API未返回时为空）
    pub published_at: Option<DateTime<Utc>>,
}
