// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info};

/// 发现调度器
///
/// 按固定间隔驱动工作器跑完整轮次。轮次串行：上一轮没结束
/// 不会叠加下一轮（interval落后时tick会压缩）。
pub struct DiscoveryScheduler {
    worker: Arc<dyn Worker>,
    interval: Duration,
    run_on_startup: bool,
}

impl DiscoveryScheduler {
    pub fn new(worker: Arc<dyn Worker>, interval: Duration, run_on_startup: bool) -> Self {
        Self {
            worker,
            interval,
            run_on_startup,
        }
    }

    /// 启动调度器后台任务
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(&self) -> JoinHandle<()> {
        let worker = Arc::clone(&self.worker);
        let period = self.interval;
        let run_on_startup = self.run_on_startup;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            // 第一个tick立即到期，对应启动即跑一轮
            if !run_on_startup {
                ticker.tick().await;
            }

            loop {
                ticker.tick().await;
                info!(worker = worker.name(), "Scheduled run starting");
                match worker.run().await {
                    Ok(()) => info!(worker = worker.name(), "Scheduled run finished"),
                    Err(err) => {
                        error!(worker = worker.name(), "Scheduled run failed: {}", err)
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::WorkerError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWorker {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Worker for CountingWorker {
        async fn run(&self) -> Result<(), WorkerError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting_worker"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_startup_then_on_interval() {
        let worker = Arc::new(CountingWorker {
            runs: AtomicUsize::new(0),
        });
        let scheduler = DiscoveryScheduler::new(
            worker.clone(),
            Duration::from_secs(3600),
            true,
        );
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(worker.runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(worker.runs.load(Ordering::SeqCst), 2);

        handle.abort();
    }
}
