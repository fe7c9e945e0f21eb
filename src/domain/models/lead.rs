// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 新建线索
///
/// 线索门控的输出：每个携带联系方式的新发现视频至多创建一条。
/// 存储层在 `video_id` 上有唯一约束作为权威防重保证，
/// 创建前的存在性检查只是优化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub channel_id: String,
    pub video_id: String,
    pub primary_email: Option<String>,
    pub instagram_username: Option<String>,
    /// 外联状态，新建时固定为 "new"
    pub status: String,
    /// 人工查看用的来源备注（发现该线索的分类）
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
