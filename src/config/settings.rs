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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、搜索API、执行器、并发和调度等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 搜索API配置
    pub search_api: SearchApiSettings,
    /// 作业执行器配置
    pub executor: ExecutorSettings,
    /// 回溯窗口配置
    pub lookback: LookbackSettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 富化配置
    pub enrichment: EnrichmentSettings,
    /// 调度配置
    pub scheduler: SchedulerSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 连接最大存活时间（秒）
    pub max_lifetime: Option<u64>,
    /// 是否打印SQL日志
    pub sqlx_logging: bool,
}

/// 搜索API配置设置
#[derive(Debug, Deserialize)]
pub struct SearchApiSettings {
    /// 搜索/详情API基础URL
    pub base_url: String,
    /// 单次HTTP请求超时（秒）
    pub request_timeout: u64,
}

/// 作业执行器配置设置
#[derive(Debug, Deserialize)]
pub struct ExecutorSettings {
    /// 单页结果数
    pub page_size: u32,
    /// 单作业最大页数
    pub max_pages_per_job: u32,
    /// 单作业目标结果数
    pub results_per_job: u32,
    /// 限流后的冷却时间（秒）
    pub rate_limit_cooldown_secs: u64,
    /// 瞬时错误重试间隔（秒）
    pub transient_retry_delay_secs: u64,
    /// 单作业瞬时错误重试预算
    pub transient_retry_budget: u32,
    /// 相邻页之间的礼貌延迟（毫秒）
    pub page_delay_ms: u64,
}

/// 回溯窗口配置设置
#[derive(Debug, Deserialize)]
pub struct LookbackSettings {
    /// 首次抓取回看天数
    pub first_run_days: i64,
    /// 调度缺口判定阈值（小时）
    pub stale_threshold_hours: i64,
    /// 补抓安全余量（小时）
    pub gap_buffer_hours: i64,
    /// 正常节奏回看小时数
    pub default_hours: i64,
}

/// 并发控制配置设置
#[derive(Debug, Deserialize)]
pub struct ConcurrencySettings {
    /// 同时在途的搜索作业数
    pub search_jobs: usize,
    /// 同时在途的about页面抓取数
    pub about_scrapes: usize,
}

/// 富化配置设置
#[derive(Debug, Deserialize)]
pub struct EnrichmentSettings {
    /// 是否启用about页面抓取
    pub about_scrape_enabled: bool,
    /// about页面基础URL
    pub about_base_url: String,
    /// about页面请求超时（秒）
    pub request_timeout: u64,
}

/// 调度配置设置
#[derive(Debug, Deserialize)]
pub struct SchedulerSettings {
    /// 两次发现运行之间的间隔（小时）
    pub interval_hours: u64,
    /// 启动时是否立即跑一轮
    pub run_on_startup: bool,
    /// 相邻分类之间的停顿（秒）
    pub category_pause_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.max_lifetime", 3600)?
            .set_default("database.sqlx_logging", true)?
            // Default search API settings
            .set_default("search_api.base_url", "https://www.googleapis.com/youtube/v3")?
            .set_default("search_api.request_timeout", 30)?
            // Default executor settings
            .set_default("executor.page_size", 50)?
            .set_default("executor.max_pages_per_job", 10)?
            .set_default("executor.results_per_job", 250)?
            .set_default("executor.rate_limit_cooldown_secs", 15)?
            .set_default("executor.transient_retry_delay_secs", 2)?
            .set_default("executor.transient_retry_budget", 3)?
            .set_default("executor.page_delay_ms", 150)?
            // Default lookback settings
            .set_default("lookback.first_run_days", 7)?
            .set_default("lookback.stale_threshold_hours", 48)?
            .set_default("lookback.gap_buffer_hours", 24)?
            .set_default("lookback.default_hours", 26)?
            // Default concurrency settings
            .set_default("concurrency.search_jobs", 5)?
            .set_default("concurrency.about_scrapes", 25)?
            // Default enrichment settings
            .set_default("enrichment.about_scrape_enabled", true)?
            .set_default("enrichment.about_base_url", "https://www.youtube.com")?
            .set_default("enrichment.request_timeout", 15)?
            // Default scheduler settings
            .set_default("scheduler.interval_hours", 4)?
            .set_default("scheduler.run_on_startup", true)?
            .set_default("scheduler.category_pause_secs", 2)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PROSPECTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl ExecutorSettings {
    /// 转换为执行器运行参数
    pub fn to_executor_config(&self) -> crate::infrastructure::search::ExecutorConfig {
        crate::infrastructure::search::ExecutorConfig {
            page_size: self.page_size,
            max_pages_per_job: self.max_pages_per_job,
            rate_limit_cooldown: std::time::Duration::from_secs(self.rate_limit_cooldown_secs),
            transient_retry_delay: std::time::Duration::from_secs(
                self.transient_retry_delay_secs,
            ),
            transient_retry_budget: self.transient_retry_budget,
            page_delay: std::time::Duration::from_millis(self.page_delay_ms),
        }
    }
}

impl LookbackSettings {
    /// 转换为回溯窗口参数
    pub fn to_lookback_config(&self) -> crate::domain::services::lookback::LookbackConfig {
        crate::domain::services::lookback::LookbackConfig {
            first_run_days: self.first_run_days,
            stale_threshold_hours: self.stale_threshold_hours,
            gap_buffer_hours: self.gap_buffer_hours,
            default_hours: self.default_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_pool_defaults() {
        std::env::set_var("PROSPECTRS__DATABASE__URL", "sqlite::memory:");
        let settings = Settings::new().expect("settings should load from defaults");
        assert_eq!(settings.database.max_connections, Some(20));
        assert_eq!(settings.database.min_connections, Some(2));
        assert_eq!(settings.database.connect_timeout, Some(10));
        assert_eq!(settings.database.idle_timeout, Some(300));
        assert_eq!(settings.database.max_lifetime, Some(3600));
        assert!(settings.database.sqlx_logging);
    }
}
