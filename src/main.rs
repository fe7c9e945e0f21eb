// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use migration::{Migrator, MigratorTrait};
use prospectrs::config::settings::Settings;
use prospectrs::domain::services::enrichment::{ContactEnricher, NoopEnricher};
use prospectrs::domain::services::key_pool::ApiKeyPool;
use prospectrs::infrastructure::database::connection;
use prospectrs::infrastructure::enrichment::AboutPageScraper;
use prospectrs::infrastructure::repositories::{
    CategoryRepositoryImpl, ChannelRepositoryImpl, JobRepositoryImpl, LeadRepositoryImpl,
    StatsRepositoryImpl, VideoRepositoryImpl,
};
use prospectrs::infrastructure::search::{
    Deduplicator, DetailFetcher, FanoutScheduler, HttpSearchApi, SearchJobExecutor,
};
use prospectrs::queue::DiscoveryScheduler;
use prospectrs::utils::retry_policy::RetryPolicy;
use prospectrs::utils::telemetry;
use prospectrs::workers::discovery_worker::{
    DiscoveryPipeline, DiscoveryStores, DiscoveryWorker, DiscoveryWorkerConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动调度器
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting prospectrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Load API key pool from environment
    let key_pool = Arc::new(ApiKeyPool::from_env()?);

    // 4. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 5. Initialize repositories
    let category_repo = Arc::new(CategoryRepositoryImpl::new(db.clone()));
    let channel_repo = Arc::new(ChannelRepositoryImpl::new(db.clone()));
    let video_repo = Arc::new(VideoRepositoryImpl::new(db.clone()));
    let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let stats_repo = Arc::new(StatsRepositoryImpl::new(db.clone()));

    // 6. Initialize search pipeline components
    let search_api = Arc::new(HttpSearchApi::new(
        settings.search_api.base_url.clone(),
        Duration::from_secs(settings.search_api.request_timeout),
    ));
    let executor = Arc::new(SearchJobExecutor::new(
        search_api.clone(),
        key_pool.clone(),
        settings.executor.to_executor_config(),
    ));
    let fanout = Arc::new(FanoutScheduler::new(
        executor,
        settings.concurrency.search_jobs,
    ));
    let deduplicator = Deduplicator::new(channel_repo.clone(), video_repo.clone());
    let detail_fetcher = DetailFetcher::new(
        search_api,
        key_pool.clone(),
        settings.concurrency.search_jobs,
        RetryPolicy::fast(),
    );
    let enricher: Arc<dyn ContactEnricher> = if settings.enrichment.about_scrape_enabled {
        Arc::new(AboutPageScraper::new(
            settings.enrichment.about_base_url.clone(),
            settings.concurrency.about_scrapes,
            Duration::from_secs(settings.enrichment.request_timeout),
        ))
    } else {
        Arc::new(NoopEnricher)
    };

    // 7. Assemble the discovery worker
    let worker = Arc::new(DiscoveryWorker::new(
        DiscoveryStores {
            categories: category_repo,
            channels: channel_repo,
            videos: video_repo,
            leads: lead_repo,
            jobs: job_repo,
            stats: stats_repo,
        },
        DiscoveryPipeline {
            fanout,
            deduplicator,
            detail_fetcher,
            enricher,
        },
        key_pool,
        DiscoveryWorkerConfig {
            lookback: settings.lookback.to_lookback_config(),
            results_per_job: settings.executor.results_per_job as usize,
            category_pause: Duration::from_secs(settings.scheduler.category_pause_secs),
        },
    ));

    // 8. Start the interval scheduler
    let scheduler = DiscoveryScheduler::new(
        worker,
        Duration::from_secs(settings.scheduler.interval_hours * 3600),
        settings.scheduler.run_on_startup,
    );
    let handle = scheduler.start();
    info!(
        interval_hours = settings.scheduler.interval_hours,
        "Discovery scheduler started"
    );

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping scheduler");
    handle.abort();

    Ok(())
}
