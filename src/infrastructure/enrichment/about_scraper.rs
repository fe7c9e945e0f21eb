// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::contact_extractor::{self, ContactInfo};
use crate::domain::services::enrichment::ContactEnricher;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

/// about页面抓取器
///
/// 抓取频道about页面的原始HTML，用联系方式提取器在全文上
/// 挖补充邮箱与社交链接。简介里藏不下的联系方式往往在这里。
/// 纯尽力而为：单页失败只记日志，绝不影响流水线。
pub struct AboutPageScraper {
    client: reqwest::Client,
    base_url: String,
    concurrency: usize,
}

impl AboutPageScraper {
    pub fn new(base_url: impl Into<String>, concurrency: usize, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            concurrency: concurrency.max(1),
        }
    }

    async fn scrape_one(&self, channel_id: &str) -> Option<ContactInfo> {
        let url = format!("{}/channel/{}/about", self.base_url, channel_id);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(err) => {
                debug!(channel_id = %channel_id, "About page request failed: {}", err);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(
                channel_id = %channel_id,
                status = %response.status(),
                "About page returned non-success status"
            );
            return None;
        }
        let html = response.text().await.ok()?;

        let info = contact_extractor::extract_contacts(&html);
        if info.is_empty() {
            None
        } else {
            Some(info)
        }
    }
}

#[async_trait]
impl ContactEnricher for AboutPageScraper {
    async fn enrich(&self, channel_ids: &[String]) -> HashMap<String, ContactInfo> {
        let found: Vec<(String, ContactInfo)> = stream::iter(channel_ids.to_vec())
            .map(|id| async move {
                let info = self.scrape_one(&id).await;
                (id, info)
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|(id, info)| async move { info.map(|i| (id, i)) })
            .collect()
            .await;

        if found.len() < channel_ids.len() {
            warn!(
                attempted = channel_ids.len(),
                hits = found.len(),
                "About scrape finished with partial hits"
            );
        } else {
            info!(hits = found.len(), "About scrape finished");
        }
        found.into_iter().collect()
    }
}
