// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::raw_result::RawResult;
use crate::domain::models::search_job::SearchJob;
use crate::infrastructure::search::executor::SearchJobExecutor;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// 一个分类全部作业的合并结果
#[derive(Debug, Default)]
pub struct FanoutResult {
    pub results: Vec<RawResult>,
    pub jobs_run: usize,
    /// 出错作业的描述，单个作业出错不中断其余作业
    pub errors: Vec<String>,
}

/// 扇出调度器
///
/// 以有界并发跑完一个分类的所有搜索作业，结果按完成顺序合并。
/// 并发宽度限制的是同时在途的作业数，不是总量。
pub struct FanoutScheduler {
    executor: Arc<SearchJobExecutor>,
    concurrency: usize,
}

impl FanoutScheduler {
    pub fn new(executor: Arc<SearchJobExecutor>, concurrency: usize) -> Self {
        Self {
            executor,
            concurrency: concurrency.max(1),
        }
    }

    /// 并发执行全部作业并合并结果
    pub async fn run_jobs(
        &self,
        jobs: Vec<SearchJob>,
        published_after: Option<DateTime<Utc>>,
        target_per_job: usize,
    ) -> FanoutResult {
        let total = jobs.len();
        let outcomes = stream::iter(jobs)
            .map(|job| {
                let executor = Arc::clone(&self.executor);
                async move {
                    let outcome = executor.run(&job, published_after, target_per_job).await;
                    (job, outcome)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut merged = FanoutResult::default();
        for (job, outcome) in outcomes {
            merged.jobs_run += 1;
            merged.results.extend(outcome.results);
            if let Some(err) = outcome.error {
                warn!(
                    query = %job.query,
                    region = %job.region_code,
                    "Search job ended with error: {}",
                    err
                );
                merged.errors.push(format!(
                    "{} [{}/{}]: {}",
                    job.query, job.region_code, job.language, err
                ));
            }
        }

        info!(
            jobs = total,
            raw_results = merged.results.len(),
            errors = merged.errors.len(),
            "Fanout complete"
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{SearchApiError, SearchPage, VideoSearchApi};
    use crate::domain::services::key_pool::ApiKeyPool;
    use crate::infrastructure::search::executor::ExecutorConfig;
    use async_trait::async_trait;
    use std::time::Duration;

    /// 按查询串决定成功或失败的测试API
    struct PerQueryApi;

    #[async_trait]
    impl VideoSearchApi for PerQueryApi {
        async fn search_page(
            &self,
            _api_key: &str,
            job: &SearchJob,
            _published_after: Option<DateTime<Utc>>,
            _page_token: Option<&str>,
            _page_size: u32,
        ) -> Result<SearchPage, SearchApiError> {
            if job.query == "broken" {
                return Err(SearchApiError::Unexpected("HTTP 500".into()));
            }
            Ok(SearchPage {
                items: vec![RawResult {
                    video_id: format!("{}-{}", job.query, job.region_code),
                    channel_id: format!("ch-{}", job.query),
                    published_at: None,
                }],
                next_page_token: None,
            })
        }
    }

    fn scheduler() -> FanoutScheduler {
        let pool = Arc::new(ApiKeyPool::new(vec!["key-test-12345678".to_string()]).unwrap());
        let config = ExecutorConfig {
            page_delay: Duration::ZERO,
            ..ExecutorConfig::default()
        };
        let executor = Arc::new(SearchJobExecutor::new(Arc::new(PerQueryApi), pool, config));
        FanoutScheduler::new(executor, 5)
    }

    #[tokio::test]
    async fn test_job_error_does_not_abort_siblings() {
        let jobs = vec![
            SearchJob::new("alpha", "IN", "hi", "Indian Music"),
            SearchJob::new("broken", "IN", "hi", "Indian Music"),
            SearchJob::new("gamma", "GB", "en", "Indian Music"),
        ];

        let result = scheduler().run_jobs(jobs, None, 100).await;

        assert_eq!(result.jobs_run, 3);
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("broken"));
    }

    #[tokio::test]
    async fn test_merges_all_job_results() {
        let jobs = vec![
            SearchJob::new("alpha", "IN", "hi", "Indian Music"),
            SearchJob::new("alpha", "GB", "hi", "Indian Music"),
        ];

        let result = scheduler().run_jobs(jobs, None, 100).await;

        assert_eq!(result.results.len(), 2);
        assert!(result.errors.is_empty());
    }
}
