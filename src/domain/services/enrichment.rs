// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::contact_extractor::ContactInfo;
use async_trait::async_trait;
use std::collections::HashMap;

/// 联系方式富化器
///
/// 对一批频道做补充性的联系方式挖掘（如抓取about页面）。
/// 纯尽力而为：任何单个频道失败都不得影响批次其余频道，
/// 实现方以空结果表达"没挖到"。
#[async_trait]
pub trait ContactEnricher: Send + Sync {
    /// 返回 channel_id 到补充联系方式的映射，未命中的频道可以缺席
    async fn enrich(&self, channel_ids: &[String]) -> HashMap<String, ContactInfo>;
}

/// 不做任何富化的空实现，用于关闭about抓取的部署
pub struct NoopEnricher;

#[async_trait]
impl ContactEnricher for NoopEnricher {
    async fn enrich(&self, _channel_ids: &[String]) -> HashMap<String, ContactInfo> {
        HashMap::new()
    }
}
