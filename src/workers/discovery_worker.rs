// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::TargetCategory;
use crate::domain::models::lead::NewLead;
use crate::domain::models::run_summary::{CategorySummary, RunReport};
use crate::domain::models::search_job::SearchJob;
use crate::domain::repositories::{
    CategoryRepository, ChannelRepository, DiscoveryStatRecord, JobRepository, LeadRepository,
    StatsRepository, VideoRepository,
};
use crate::domain::services::contact_extractor;
use crate::domain::services::enrichment::ContactEnricher;
use crate::domain::services::key_pool::ApiKeyPool;
use crate::domain::services::lookback::{resolve_lookback, LookbackConfig};
use crate::domain::services::transformer;
use crate::infrastructure::search::{matrix, Deduplicator, DetailFetcher, FanoutScheduler};
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 发现流水线的存储依赖
pub struct DiscoveryStores {
    pub categories: Arc<dyn CategoryRepository>,
    pub channels: Arc<dyn ChannelRepository>,
    pub videos: Arc<dyn VideoRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

/// 发现流水线的执行组件
pub struct DiscoveryPipeline {
    pub fanout: Arc<FanoutScheduler>,
    pub deduplicator: Deduplicator,
    pub detail_fetcher: DetailFetcher,
    pub enricher: Arc<dyn ContactEnricher>,
}

/// 发现工作器运行参数
#[derive(Debug, Clone)]
pub struct DiscoveryWorkerConfig {
    pub lookback: LookbackConfig,
    /// 单作业目标结果数
    pub results_per_job: usize,
    /// 相邻分类之间的停顿
    pub category_pause: Duration,
}

impl Default for DiscoveryWorkerConfig {
    fn default() -> Self {
        Self {
            lookback: LookbackConfig::default(),
            results_per_job: 250,
            category_pause: Duration::from_secs(2),
        }
    }
}

/// 发现工作器
///
/// 串起一次完整发现运行：按优先级遍历启用分类，每个分类
/// 走 回溯→展开→扇出→去重→详情→富化→转换→落库→建线索 的
/// 流水线。分类是故障隔离边界，单分类失败只记入该分类摘要；
/// 每个分类收尾后检查密钥池，全部耗尽则提前结束整次运行。
pub struct DiscoveryWorker {
    stores: DiscoveryStores,
    pipeline: DiscoveryPipeline,
    key_pool: Arc<ApiKeyPool>,
    config: DiscoveryWorkerConfig,
}

impl DiscoveryWorker {
    pub fn new(
        stores: DiscoveryStores,
        pipeline: DiscoveryPipeline,
        key_pool: Arc<ApiKeyPool>,
        config: DiscoveryWorkerConfig,
    ) -> Self {
        Self {
            stores,
            pipeline,
            key_pool,
            config,
        }
    }

    /// 执行一次完整的发现运行
    pub async fn run_once(&self) -> Result<RunReport, WorkerError> {
        let job_id = self.stores.jobs.start("discovery").await?;
        info!(job_id, "Discovery run started");

        let categories = match self.stores.categories.active_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                let _ = self.stores.jobs.fail(job_id, &err.to_string()).await;
                return Err(err.into());
            }
        };

        let mut report = RunReport::default();
        let total = categories.len();

        for (index, category) in categories.iter().enumerate() {
            let summary = match self.run_category(category).await {
                Ok(summary) => {
                    // 只有流水线成功收尾才推进水位，失败的分类下次补抓
                    if let Err(err) = self
                        .stores
                        .categories
                        .mark_fetched(category.id, Utc::now())
                        .await
                    {
                        warn!(category = %category.name, "Failed to advance watermark: {}", err);
                    }
                    summary
                }
                Err(err) => {
                    error!(category = %category.name, "Category pipeline failed: {}", err);
                    let mut summary = CategorySummary::new(&category.name);
                    summary.errors.push(err.to_string());
                    summary
                }
            };

            self.record_stats(category, &summary).await;
            report.total_videos += summary.unique_videos;
            report.total_leads += summary.leads_created;
            report.categories.push(summary);

            if self.key_pool.status().active == 0 {
                warn!("All API keys exhausted, halting run early");
                report.halted_early = true;
                break;
            }

            if index + 1 < total {
                tokio::time::sleep(self.config.category_pause).await;
            }
        }

        let summary_json = serde_json::json!({
            "categories": report.categories,
            "total_videos": report.total_videos,
            "total_leads": report.total_leads,
            "halted_early": report.halted_early,
        });
        if let Err(err) = self.stores.jobs.complete(job_id, summary_json).await {
            warn!(job_id, "Failed to finalize job record: {}", err);
        }

        info!(
            job_id,
            categories = report.categories.len(),
            videos = report.total_videos,
            leads = report.total_leads,
            halted_early = report.halted_early,
            "Discovery run finished"
        );
        Ok(report)
    }

    /// 单个分类的完整流水线
    async fn run_category(
        &self,
        category: &TargetCategory,
    ) -> Result<CategorySummary, WorkerError> {
        let mut summary = CategorySummary::new(&category.name);
        let now = Utc::now();
        let published_after = resolve_lookback(now, category.last_fetched_at, &self.config.lookback);

        let mut jobs = matrix::expand(&category.name);
        if jobs.is_empty() {
            // 矩阵没覆盖的分类退化为用库里的原始查询跑一个作业
            jobs = vec![SearchJob::new(
                category.search_query.clone(),
                "IN",
                "en",
                category.name.clone(),
            )];
        }

        info!(
            category = %category.name,
            jobs = jobs.len(),
            published_after = %published_after,
            "Category pipeline started"
        );

        let fanout = self
            .pipeline
            .fanout
            .run_jobs(jobs, Some(published_after), self.config.results_per_job)
            .await;
        summary.jobs_run = fanout.jobs_run;
        summary.raw_results = fanout.results.len();
        summary.errors = fanout.errors;

        let fresh = self.pipeline.deduplicator.filter_new(&fanout.results).await?;
        summary.unique_videos = fresh.new_video_ids.len();
        summary.unique_channels = fresh.new_channel_ids.len();

        let channel_details = self
            .pipeline
            .detail_fetcher
            .fetch_channel_details(&fresh.new_channel_ids)
            .await;
        let video_details = self
            .pipeline
            .detail_fetcher
            .fetch_video_details(&fresh.new_video_ids)
            .await;

        let enrichment = self.pipeline.enricher.enrich(&fresh.new_channel_ids).await;

        let payload = transformer::transform(
            &channel_details,
            &video_details,
            &enrichment,
            Some(category.id),
            now,
        );
        summary.emails_found = payload.emails.len();

        self.stores.channels.bulk_upsert(&payload.channels).await?;
        self.stores.channels.save_emails(&payload.emails).await?;
        self.stores
            .channels
            .save_social_links(&payload.social_links)
            .await?;
        self.stores.videos.bulk_insert(&payload.videos).await?;

        summary.leads_created = self.create_leads(category, &payload).await?;

        info!(
            category = %category.name,
            raw = summary.raw_results,
            new_videos = summary.unique_videos,
            new_channels = summary.unique_channels,
            emails = summary.emails_found,
            leads = summary.leads_created,
            "Category pipeline finished"
        );
        Ok(summary)
    }

    /// 线索门：只为带联系信号的频道的新视频建线索
    async fn create_leads(
        &self,
        category: &TargetCategory,
        payload: &transformer::TransformPayload,
    ) -> Result<usize, WorkerError> {
        let mut created = 0usize;

        for video in &payload.videos {
            let Some(channel) = payload
                .channels
                .iter()
                .find(|c| c.channel_id == video.channel_id)
            else {
                continue;
            };
            if !channel.has_email && !channel.has_instagram {
                continue;
            }

            // 应用层判定只是省一次无谓写入，最终由唯一约束兜底
            if self.stores.leads.exists_for_video(&video.video_id).await? {
                continue;
            }

            let lead = NewLead {
                channel_id: channel.channel_id.clone(),
                video_id: video.video_id.clone(),
                primary_email: channel.primary_email.clone(),
                instagram_username: channel
                    .primary_instagram
                    .as_deref()
                    .and_then(contact_extractor::instagram_username),
                status: "new".to_string(),
                notes: format!("Auto-discovered via {}", category.name),
                created_at: Utc::now(),
            };
            if self.stores.leads.create(&lead).await? {
                created += 1;
            }
        }

        Ok(created)
    }

    async fn record_stats(&self, category: &TargetCategory, summary: &CategorySummary) {
        let stat = DiscoveryStatRecord {
            category_id: Some(category.id),
            videos_found: summary.unique_videos as i64,
            channels_found: summary.unique_channels as i64,
            emails_found: summary.emails_found as i64,
            leads_created: summary.leads_created as i64,
            run_at: Utc::now(),
        };
        // 统计是观察数据，失败不影响流水线结果
        if let Err(err) = self.stores.stats.record(&stat).await {
            warn!(category = %category.name, "Failed to record stats: {}", err);
        }
    }
}

#[async_trait]
impl Worker for DiscoveryWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        self.run_once().await.map(|_| ())
    }

    fn name(&self) -> &str {
        "discovery_worker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::channel::{
        ChannelDetail, ChannelRecord, ExtractedEmailRecord, SocialLinkRecord,
    };
    use crate::domain::models::raw_result::RawResult;
    use crate::domain::models::video::{VideoDetail, VideoRecord};
    use crate::domain::repositories::RepositoryError;
    use crate::domain::search::{
        DetailApi, SearchApiError, SearchPage, VideoSearchApi,
    };
    use crate::domain::services::enrichment::NoopEnricher;
    use crate::infrastructure::search::{ExecutorConfig, SearchJobExecutor};
    use crate::utils::retry_policy::RetryPolicy;
    use chrono::{DateTime, Utc};
    use parking_lot::Mutex;
    use std::collections::HashSet;

    /// 贯穿全流水线的内存存储桩
    #[derive(Default)]
    struct MemStore {
        categories: Vec<TargetCategory>,
        fetched: Mutex<Vec<i32>>,
        channels: Mutex<Vec<ChannelRecord>>,
        videos: Mutex<Vec<VideoRecord>>,
        leads: Mutex<Vec<NewLead>>,
        jobs: Mutex<Vec<String>>,
        stats: Mutex<Vec<DiscoveryStatRecord>>,
    }

    #[async_trait]
    impl CategoryRepository for MemStore {
        async fn active_categories(&self) -> Result<Vec<TargetCategory>, RepositoryError> {
            Ok(self.categories.clone())
        }

        async fn mark_fetched(
            &self,
            id: i32,
            _at: DateTime<Utc>,
        ) -> Result<(), RepositoryError> {
            self.fetched.lock().push(id);
            Ok(())
        }
    }

    #[async_trait]
    impl ChannelRepository for MemStore {
        async fn existing_channel_ids(
            &self,
            channel_ids: &[String],
        ) -> Result<HashSet<String>, RepositoryError> {
            let known = self.channels.lock();
            Ok(channel_ids
                .iter()
                .filter(|id| known.iter().any(|c| &c.channel_id == *id))
                .cloned()
                .collect())
        }

        async fn bulk_upsert(&self, channels: &[ChannelRecord]) -> Result<(), RepositoryError> {
            self.channels.lock().extend_from_slice(channels);
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

    #[async_trait]
    impl VideoRepository for MemStore {
        async fn existing_video_ids(
            &self,
            video_ids: &[String],
        ) -> Result<HashSet<String>, RepositoryError> {
            let known = self.videos.lock();
            Ok(video_ids
                .iter()
                .filter(|id| known.iter().any(|v| &v.video_id == *id))
                .cloned()
                .collect())
        }

        async fn bulk_insert(&self, videos: &[VideoRecord]) -> Result<(), RepositoryError> {
            self.videos.lock().extend_from_slice(videos);
            Ok(())
        }
    }

    #[async_trait]
    impl LeadRepository for MemStore {
        async fn exists_for_video(&self, video_id: &str) -> Result<bool, RepositoryError> {
            Ok(self.leads.lock().iter().any(|l| l.video_id == video_id))
        }

        async fn create(&self, lead: &NewLead) -> Result<bool, RepositoryError> {
            let mut leads = self.leads.lock();
            if leads.iter().any(|l| l.video_id == lead.video_id) {
                return Ok(false);
            }
            leads.push(lead.clone());
            Ok(true)
        }
    }

    #[async_trait]
    impl JobRepository for MemStore {
        async fn start(&self, job_type: &str) -> Result<i32, RepositoryError> {
            self.jobs.lock().push(format!("start:{}", job_type));
            Ok(1)
        }

        async fn complete(
            &self,
            _job_id: i32,
            _summary: serde_json::Value,
        ) -> Result<(), RepositoryError> {
            self.jobs.lock().push("complete".to_string());
            Ok(())
        }

        async fn fail(&self, _job_id: i32, _error: &str) -> Result<(), RepositoryError> {
            self.jobs.lock().push("fail".to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl StatsRepository for MemStore {
        async fn record(&self, stat: &DiscoveryStatRecord) -> Result<(), RepositoryError> {
            self.stats.lock().push(stat.clone());
            Ok(())
        }
    }

    /// 固定返回两条指向同一视频的结果，外加一条无联系方式频道的视频
    struct FixtureApi;

    #[async_trait]
    impl VideoSearchApi for FixtureApi {
        async fn search_page(
            &self,
            _api_key: &str,
            _job: &SearchJob,
            _published_after: Option<DateTime<Utc>>,
            _page_token: Option<&str>,
            _page_size: u32,
        ) -> Result<SearchPage, SearchApiError> {
            Ok(SearchPage {
                items: vec![
                    RawResult {
                        video_id: "vid-1".to_string(),
                        channel_id: "UC-contact".to_string(),
                        published_at: None,
                    },
                    // 同一视频第二次出现，线索门必须只放行一次
                    RawResult {
                        video_id: "vid-1".to_string(),
                        channel_id: "UC-contact".to_string(),
                        published_at: None,
                    },
                    RawResult {
                        video_id: "vid-2".to_string(),
                        channel_id: "UC-silent".to_string(),
                        published_at: None,
                    },
                ],
                next_page_token: None,
            })
        }
    }

    #[async_trait]
    impl DetailApi for FixtureApi {
        async fn fetch_channels(
            &self,
            _api_key: &str,
            channel_ids: &[String],
        ) -> Result<Vec<ChannelDetail>, SearchApiError> {
            Ok(channel_ids
                .iter()
                .map(|id| ChannelDetail {
                    channel_id: id.clone(),
                    title: id.clone(),
                    handle: None,
                    description: if id == "UC-contact" {
                        "business: reach@me.dev".to_string()
                    } else {
                        "no contacts here".to_string()
                    },
                    thumbnail_url: None,
                    country_code: None,
                    subscriber_count: 100,
                    video_count: 10,
                    view_count: 1000,
                    published_at: None,
                })
                .collect())
        }

        async fn fetch_videos(
            &self,
            _api_key: &str,
            video_ids: &[String],
        ) -> Result<Vec<VideoDetail>, SearchApiError> {
            Ok(video_ids
                .iter()
                .map(|id| VideoDetail {
                    video_id: id.clone(),
                    channel_id: if id == "vid-1" {
                        "UC-contact".to_string()
                    } else {
                        "UC-silent".to_string()
                    },
                    title: "t".to_string(),
                    description: String::new(),
                    thumbnail_url: None,
                    published_at: None,
                    duration_seconds: 60,
                    view_count: 10,
                    like_count: 1,
                    comment_count: 0,
                    tags: Vec::new(),
                    language: None,
                })
                .collect())
        }
    }

    fn category(id: i32, name: &str) -> TargetCategory {
        TargetCategory {
            id,
            name: name.to_string(),
            search_query: "fallback query".to_string(),
            last_fetched_at: None,
            priority: 10,
            is_active: true,
        }
    }

    fn worker_with(store: Arc<MemStore>) -> DiscoveryWorker {
        let key_pool = Arc::new(ApiKeyPool::new(vec!["key-test-12345678".to_string()]).unwrap());
        let api = Arc::new(FixtureApi);
        let executor = Arc::new(SearchJobExecutor::new(
            api.clone(),
            Arc::clone(&key_pool),
            ExecutorConfig {
                page_delay: Duration::ZERO,
                ..ExecutorConfig::default()
            },
        ));
        let pipeline = DiscoveryPipeline {
            fanout: Arc::new(FanoutScheduler::new(executor, 2)),
            deduplicator: Deduplicator::new(store.clone(), store.clone()),
            detail_fetcher: DetailFetcher::new(
                api,
                Arc::clone(&key_pool),
                1,
                RetryPolicy::fast(),
            ),
            enricher: Arc::new(NoopEnricher),
        };
        let stores = DiscoveryStores {
            categories: store.clone(),
            channels: store.clone(),
            videos: store.clone(),
            leads: store.clone(),
            jobs: store.clone(),
            stats: store,
        };
        DiscoveryWorker::new(
            stores,
            pipeline,
            key_pool,
            DiscoveryWorkerConfig {
                category_pause: Duration::ZERO,
                ..DiscoveryWorkerConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_lead_gate_creates_one_lead_per_video_with_contact_signal() {
        let store = Arc::new(MemStore {
            categories: vec![category(1, "Fixture Category")],
            ..MemStore::default()
        });

        let report = worker_with(store.clone()).run_once().await.unwrap();

        // 有联系方式的频道产出1条线索，无联系方式的不产出
        let leads = store.leads.lock();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].video_id, "vid-1");
        assert_eq!(leads[0].primary_email.as_deref(), Some("reach@me.dev"));
        assert_eq!(report.total_leads, 1);
        assert!(!report.halted_early);
    }

    #[tokio::test]
    async fn test_watermark_advances_and_job_record_completes() {
        let store = Arc::new(MemStore {
            categories: vec![category(1, "Fixture Category"), category(2, "Second One")],
            ..MemStore::default()
        });

        worker_with(store.clone()).run_once().await.unwrap();

        assert_eq!(*store.fetched.lock(), vec![1, 2]);
        let jobs = store.jobs.lock();
        assert_eq!(jobs.first().map(String::as_str), Some("start:discovery"));
        assert_eq!(jobs.last().map(String::as_str), Some("complete"));
        assert_eq!(store.stats.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_second_run_creates_no_duplicate_leads() {
        let store = Arc::new(MemStore {
            categories: vec![category(1, "Fixture Category")],
            ..MemStore::default()
        });
        let worker = worker_with(store.clone());

        worker.run_once().await.unwrap();
        let report2 = worker.run_once().await.unwrap();

        assert_eq!(store.leads.lock().len(), 1);
        assert_eq!(report2.total_leads, 0);
    }
}
