// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::raw_result::RawResult;
use crate::domain::models::search_job::SearchJob;
use crate::domain::search::{SearchApiError, VideoSearchApi};
use crate::domain::services::key_pool::ApiKeyPool;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 执行器参数
///
/// 单作业结果上限 = `max_pages_per_job * page_size`（默认 10×50=500）。
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub page_size: u32,
    pub max_pages_per_job: u32,
    /// 全局限流后的冷却时长
    pub rate_limit_cooldown: Duration,
    /// 瞬时网络错误的重试间隔
    pub transient_retry_delay: Duration,
    /// 单作业内瞬时错误的重试总次数
    pub transient_retry_budget: u32,
    /// 相邻两页之间的礼貌延迟
    pub page_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages_per_job: 10,
            rate_limit_cooldown: Duration::from_secs(15),
            transient_retry_delay: Duration::from_secs(2),
            transient_retry_budget: 3,
            page_delay: Duration::from_millis(150),
        }
    }
}

/// 单个搜索作业的执行结果
///
/// 作业从不以 `Err` 收尾：中途出错时 `results` 里是已拿到的
/// 部分结果，`error` 记录中断原因供分类摘要汇总。
#[derive(Debug)]
pub struct JobOutcome {
    pub results: Vec<RawResult>,
    pub pages_fetched: u32,
    pub error: Option<String>,
}

/// 分页搜索执行器
///
/// 驱动单个搜索作业的完整分页流程，按错误类别执行不同的
/// 恢复策略。密钥在页粒度获取，配额耗尽的密钥换下一个重试
/// 同一页，页游标不前进。
pub struct SearchJobExecutor {
    api: Arc<dyn VideoSearchApi>,
    key_pool: Arc<ApiKeyPool>,
    config: ExecutorConfig,
}

impl SearchJobExecutor {
    pub fn new(
        api: Arc<dyn VideoSearchApi>,
        key_pool: Arc<ApiKeyPool>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            api,
            key_pool,
            config,
        }
    }

    /// 执行一个搜索作业直到取满目标数、翻页到底或中断
    pub async fn run(
        &self,
        job: &SearchJob,
        published_after: Option<DateTime<Utc>>,
        target_count: usize,
    ) -> JobOutcome {
        let page_cap = (self.config.max_pages_per_job * self.config.page_size) as usize;
        let effective_target = target_count.min(page_cap);

        let mut results: Vec<RawResult> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut pages_fetched = 0u32;
        let mut transient_left = self.config.transient_retry_budget;
        let mut error: Option<String> = None;

        'pages: while results.len() < effective_target
            && pages_fetched < self.config.max_pages_per_job
        {
            // 同一页的密钥轮换上限取池快照，防止标记失效时死循环
            let mut rotations_left = self.key_pool.status().total;

            let page = loop {
                let Some(key) = self.key_pool.acquire() else {
                    warn!(
                        query = %job.query,
                        "Key pool exhausted mid-job, returning {} partial results",
                        results.len()
                    );
                    error = Some("API key pool exhausted".to_string());
                    break 'pages;
                };

                match self
                    .api
                    .search_page(
                        &key,
                        job,
                        published_after,
                        page_token.as_deref(),
                        self.config.page_size,
                    )
                    .await
                {
                    Ok(page) => break page,
                    Err(SearchApiError::QuotaExceeded) => {
                        // 同一页换密钥重试，游标不前进
                        self.key_pool.mark_exhausted(&key);
                        if rotations_left == 0 {
                            error = Some("key rotation limit reached".to_string());
                            break 'pages;
                        }
                        rotations_left -= 1;
                    }
                    Err(SearchApiError::RateLimited) => {
                        debug!(
                            query = %job.query,
                            "Rate limited, cooling down {:?}",
                            self.config.rate_limit_cooldown
                        );
                        tokio::time::sleep(self.config.rate_limit_cooldown).await;
                    }
                    Err(SearchApiError::Transient(msg)) => {
                        if transient_left == 0 {
                            warn!(query = %job.query, "Transient retry budget spent: {}", msg);
                            error = Some(format!("transient error: {}", msg));
                            break 'pages;
                        }
                        transient_left -= 1;
                        tokio::time::sleep(self.config.transient_retry_delay).await;
                    }
                    Err(SearchApiError::Unexpected(msg)) => {
                        warn!(query = %job.query, "Unexpected API error, aborting job: {}", msg);
                        error = Some(format!("unexpected error: {}", msg));
                        break 'pages;
                    }
                }
            };

            pages_fetched += 1;
            for item in page.items {
                if seen.insert(item.video_id.clone()) {
                    results.push(item);
                }
            }

            match page.next_page_token {
                Some(token) => {
                    page_token = Some(token);
                    tokio::time::sleep(self.config.page_delay).await;
                }
                // 该查询已取尽
                None => break,
            }
        }

        results.truncate(effective_target);
        info!(
            query = %job.query,
            region = %job.region_code,
            language = %job.language,
            pages = pages_fetched,
            results = results.len(),
            "Search job finished"
        );

        JobOutcome {
            results,
            pages_fetched,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::SearchPage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// 按脚本回放响应的测试API，记录每次调用的密钥与游标
    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<SearchPage, SearchApiError>>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<SearchPage, SearchApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl VideoSearchApi for ScriptedApi {
        async fn search_page(
            &self,
            api_key: &str,
            _job: &SearchJob,
            _published_after: Option<DateTime<Utc>>,
            page_token: Option<&str>,
            _page_size: u32,
        ) -> Result<SearchPage, SearchApiError> {
            self.calls
                .lock()
                .push((api_key.to_string(), page_token.map(str::to_string)));
            self.responses
                .lock()
                .pop_front()
                .unwrap_or(Err(SearchApiError::Unexpected("script exhausted".into())))
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> Result<SearchPage, SearchApiError> {
        Ok(SearchPage {
            items: ids
                .iter()
                .map(|id| RawResult {
                    video_id: id.to_string(),
                    channel_id: format!("ch-{}", id),
                    published_at: None,
                })
                .collect(),
            next_page_token: next.map(str::to_string),
        })
    }

    fn job() -> SearchJob {
        SearchJob::new("hindi song 2026", "IN", "hi", "Indian Music")
    }

    fn fast_config() -> ExecutorConfig {
        ExecutorConfig {
            page_size: 2,
            max_pages_per_job: 3,
            rate_limit_cooldown: Duration::ZERO,
            transient_retry_delay: Duration::ZERO,
            transient_retry_budget: 3,
            page_delay: Duration::ZERO,
        }
    }

    fn pool(keys: &[&str]) -> Arc<ApiKeyPool> {
        Arc::new(ApiKeyPool::new(keys.iter().map(|k| k.to_string()).collect()).unwrap())
    }

    #[tokio::test]
    async fn test_quota_exceeded_rotates_key_without_advancing_page() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1", "v2"], Some("t2")),
            Err(SearchApiError::QuotaExceeded),
            page(&["v3"], None),
        ]));
        let executor = SearchJobExecutor::new(
            api.clone(),
            pool(&["key-one-11111111", "key-two-22222222"]),
            fast_config(),
        );

        let outcome = executor.run(&job(), None, 100).await;

        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.error.is_none());
        let calls = api.calls();
        // 第二页配额超限后：换了密钥，但游标仍是t2
        assert_eq!(calls[1].1.as_deref(), Some("t2"));
        assert_eq!(calls[2].1.as_deref(), Some("t2"));
        assert_ne!(calls[1].0, calls[2].0);
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts_with_partial_results() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1", "v2"], Some("t2")),
            Err(SearchApiError::Unexpected("HTTP 500".into())),
        ]));
        let executor =
            SearchJobExecutor::new(api, pool(&["key-one-11111111"]), fast_config());

        let outcome = executor.run(&job(), None, 100).await;

        assert_eq!(outcome.results.len(), 2);
        let err = outcome.error.unwrap();
        assert!(err.contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_transient_budget_exhaustion_aborts() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1"], Some("t2")),
            Err(SearchApiError::Transient("timeout".into())),
            Err(SearchApiError::Transient("timeout".into())),
            Err(SearchApiError::Transient("timeout".into())),
            Err(SearchApiError::Transient("timeout".into())),
        ]));
        let mut config = fast_config();
        config.transient_retry_budget = 3;
        let executor = SearchJobExecutor::new(api, pool(&["key-one-11111111"]), config);

        let outcome = executor.run(&job(), None, 100).await;

        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.error.unwrap().contains("transient"));
    }

    #[tokio::test]
    async fn test_rate_limited_retries_same_page() {
        let api = Arc::new(ScriptedApi::new(vec![
            Err(SearchApiError::RateLimited),
            page(&["v1"], None),
        ]));
        let executor =
            SearchJobExecutor::new(api.clone(), pool(&["key-one-11111111"]), fast_config());

        let outcome = executor.run(&job(), None, 100).await;

        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.error.is_none());
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, None);
        assert_eq!(calls[1].1, None);
    }

    #[tokio::test]
    async fn test_page_cap_bounds_results() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1", "v2"], Some("t2")),
            page(&["v3", "v4"], Some("t3")),
            page(&["v5", "v6"], Some("t4")),
            page(&["v7", "v8"], Some("t5")),
        ]));
        // 3页×2条 = 上限6
        let executor =
            SearchJobExecutor::new(api.clone(), pool(&["key-one-11111111"]), fast_config());

        let outcome = executor.run(&job(), None, 1000).await;

        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(outcome.results.len(), 6);
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_target_count_stops_early_and_truncates() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1", "v2"], Some("t2")),
            page(&["v3", "v4"], Some("t3")),
        ]));
        let executor =
            SearchJobExecutor::new(api.clone(), pool(&["key-one-11111111"]), fast_config());

        let outcome = executor.run(&job(), None, 3).await;

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_in_job_dedupe_by_video_id() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1", "v2"], Some("t2")),
            page(&["v2", "v3"], None),
        ]));
        let executor =
            SearchJobExecutor::new(api, pool(&["key-one-11111111"]), fast_config());

        let outcome = executor.run(&job(), None, 100).await;

        let ids: Vec<&str> = outcome.results.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[tokio::test]
    async fn test_all_keys_exhausted_returns_partials() {
        let api = Arc::new(ScriptedApi::new(vec![
            page(&["v1"], Some("t2")),
            Err(SearchApiError::QuotaExceeded),
            Err(SearchApiError::QuotaExceeded),
        ]));
        let executor = SearchJobExecutor::new(
            api,
            pool(&["key-one-11111111", "key-two-22222222"]),
            fast_config(),
        );

        let outcome = executor.run(&job(), None, 100).await;

        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.error.unwrap().contains("exhausted"));
    }
}
