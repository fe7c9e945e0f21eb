// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::raw_result::RawResult;
use crate::domain::repositories::{ChannelRepository, RepositoryError, VideoRepository};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// 去重产物
///
/// 两个列表保持首次出现顺序，只包含存储中尚不存在的标识。
#[derive(Debug, Default)]
pub struct FreshSets {
    pub new_video_ids: Vec<String>,
    pub new_channel_ids: Vec<String>,
    /// 批内去重后的唯一视频数（含已落库的）
    pub unique_videos: usize,
    /// 批内去重后的唯一频道数（含已落库的）
    pub unique_channels: usize,
}

/// 结果去重器
///
/// 两级过滤：先在合并批内按视频/频道标识去重，
/// 再用仓库剔除已经落库的标识。
pub struct Deduplicator {
    channels: Arc<dyn ChannelRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl Deduplicator {
    pub fn new(channels: Arc<dyn ChannelRepository>, videos: Arc<dyn VideoRepository>) -> Self {
        Self { channels, videos }
    }

    /// 过滤出存储中尚不存在的视频与频道标识
    pub async fn filter_new(&self, results: &[RawResult]) -> Result<FreshSets, RepositoryError> {
        let mut video_ids: Vec<String> = Vec::new();
        let mut channel_ids: Vec<String> = Vec::new();
        let mut seen_videos: HashSet<&str> = HashSet::new();
        let mut seen_channels: HashSet<&str> = HashSet::new();

        for result in results {
            if seen_videos.insert(&result.video_id) {
                video_ids.push(result.video_id.clone());
            }
            if seen_channels.insert(&result.channel_id) {
                channel_ids.push(result.channel_id.clone());
            }
        }

        let unique_videos = video_ids.len();
        let unique_channels = channel_ids.len();

        let known_videos = self.videos.existing_video_ids(&video_ids).await?;
        let known_channels = self.channels.existing_channel_ids(&channel_ids).await?;

        let new_video_ids: Vec<String> = video_ids
            .into_iter()
            .filter(|id| !known_videos.contains(id))
            .collect();
        let new_channel_ids: Vec<String> = channel_ids
            .into_iter()
            .filter(|id| !known_channels.contains(id))
            .collect();

        info!(
            raw = results.len(),
            unique_videos,
            unique_channels,
            new_videos = new_video_ids.len(),
            new_channels = new_channel_ids.len(),
            "Deduplication complete"
        );

        Ok(FreshSets {
            new_video_ids,
            new_channel_ids,
            unique_videos,
            unique_channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::channel::{ChannelRecord, ExtractedEmailRecord, SocialLinkRecord};
    use crate::domain::models::video::VideoRecord;
    use async_trait::async_trait;

    struct FixedRepo {
        known_videos: Vec<String>,
        known_channels: Vec<String>,
    }

    #[async_trait]
    impl VideoRepository for FixedRepo {
        async fn existing_video_ids(
            &self,
            video_ids: &[String],
        ) -> Result<HashSet<String>, RepositoryError> {
            Ok(video_ids
                .iter()
                .filter(|id| self.known_videos.contains(id))
                .cloned()
                .collect())
        }

        async fn bulk_insert(&self, _videos: &[VideoRecord]) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ChannelRepository for FixedRepo {
        async fn existing_channel_ids(
            &self,
            channel_ids: &[String],
        ) -> Result<HashSet<String>, RepositoryError> {
            Ok(channel_ids
                .iter()
                .filter(|id| self.known_channels.contains(id))
                .cloned()
                .collect())
        }

        async fn bulk_upsert(&self, _channels: &[ChannelRecord]) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn save_emails(
            &self,
            _emails: &[ExtractedEmailRecord],
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn save_social_links(
            &self,
            _links: &[SocialLinkRecord],
        ) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn raw(video: &str, channel: &str) -> RawResult {
        RawResult {
            video_id: video.to_string(),
            channel_id: channel.to_string(),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_batch_dedupe_then_store_filter() {
        let repo = Arc::new(FixedRepo {
            known_videos: vec!["v1".to_string()],
            known_channels: vec!["c2".to_string()],
        });
        let dedup = Deduplicator::new(repo.clone(), repo);

        let results = vec![
            raw("v1", "c1"),
            raw("v2", "c1"),
            raw("v2", "c2"),
            raw("v3", "c3"),
        ];
        let fresh = dedup.filter_new(&results).await.unwrap();

        assert_eq!(fresh.unique_videos, 3);
        assert_eq!(fresh.unique_channels, 3);
        assert_eq!(fresh.new_video_ids, vec!["v2", "v3"]);
        assert_eq!(fresh.new_channel_ids, vec!["c1", "c3"]);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_sets() {
        let repo = Arc::new(FixedRepo {
            known_videos: vec![],
            known_channels: vec![],
        });
        let dedup = Deduplicator::new(repo.clone(), repo);

        let fresh = dedup.filter_new(&[]).await.unwrap();
        assert!(fresh.new_video_ids.is_empty());
        assert!(fresh.new_channel_ids.is_empty());
    }
}
