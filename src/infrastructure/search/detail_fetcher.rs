// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::ChannelDetail;
use crate::domain::models::video::VideoDetail;
use crate::domain::search::{DetailApi, SearchApiError};
use crate::domain::services::key_pool::ApiKeyPool;
use crate::utils::retry_policy::RetryPolicy;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// 详情API单次请求的ID上限
pub const DETAIL_BATCH_SIZE: usize = 50;

/// 详情拉取器
///
/// 把ID列表按50个一块、有界并发地拉取完整元数据。尽力而为：
/// 配额超限换密钥重试同一块，瞬时错误按退避策略重试，
/// 其余错误跳过该块继续，密钥池耗尽时带着已拿到的部分返回。
pub struct DetailFetcher {
    api: Arc<dyn DetailApi>,
    key_pool: Arc<ApiKeyPool>,
    concurrency: usize,
    retry_policy: RetryPolicy,
}

impl DetailFetcher {
    pub fn new(
        api: Arc<dyn DetailApi>,
        key_pool: Arc<ApiKeyPool>,
        concurrency: usize,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            api,
            key_pool,
            concurrency: concurrency.max(1),
            retry_policy,
        }
    }

    /// 拉取频道详情
    pub async fn fetch_channel_details(&self, channel_ids: &[String]) -> Vec<ChannelDetail> {
        let batches: Vec<Vec<ChannelDetail>> =
            stream::iter(channel_ids.chunks(DETAIL_BATCH_SIZE).map(<[String]>::to_vec))
                .map(|chunk| async move {
                    self.fetch_chunk(|key| {
                        let api = Arc::clone(&self.api);
                        let ids = chunk.clone();
                        async move { api.fetch_channels(&key, &ids).await }
                    })
                    .await
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let details: Vec<ChannelDetail> = batches.into_iter().flatten().collect();
        info!(
            requested = channel_ids.len(),
            fetched = details.len(),
            "Channel details fetched"
        );
        details
    }

    /// 拉取视频详情
    pub async fn fetch_video_details(&self, video_ids: &[String]) -> Vec<VideoDetail> {
        let batches: Vec<Vec<VideoDetail>> =
            stream::iter(video_ids.chunks(DETAIL_BATCH_SIZE).map(<[String]>::to_vec))
                .map(|chunk| async move {
                    self.fetch_chunk(|key| {
                        let api = Arc::clone(&self.api);
                        let ids = chunk.clone();
                        async move { api.fetch_videos(&key, &ids).await }
                    })
                    .await
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let details: Vec<VideoDetail> = batches.into_iter().flatten().collect();
        info!(
            requested = video_ids.len(),
            fetched = details.len(),
            "Video details fetched"
        );
        details
    }

    /// 执行单块请求，失败到底时返回空集让整批继续
    async fn fetch_chunk<T, F, Fut>(&self, call: F) -> Vec<T>
    where
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<Vec<T>, SearchApiError>>,
    {
        let mut rotations_left = self.key_pool.status().total;
        let mut attempt = 0u32;

        loop {
            let Some(key) = self.key_pool.acquire() else {
                warn!("Key pool exhausted, dropping detail chunk");
                return Vec::new();
            };

            match call(key.clone()).await {
                Ok(batch) => return batch,
                Err(SearchApiError::QuotaExceeded) => {
                    self.key_pool.mark_exhausted(&key);
                    if rotations_left == 0 {
                        return Vec::new();
                    }
                    rotations_left -= 1;
                }
                Err(SearchApiError::Transient(_)) | Err(SearchApiError::RateLimited)
                    if self.retry_policy.should_retry(attempt) =>
                {
                    attempt += 1;
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    warn!(
                        attempt,
                        "Detail batch transient failure, retrying in {:?}", backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => {
                    // 单块失败不拖垮整批
                    warn!("Detail batch failed, skipping chunk: {}", err);
                    return Vec::new();
                }
            }
        }
    }
}
