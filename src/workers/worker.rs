// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// 可调度工作器
///
/// 调度器眼中的一次完整运行。实现方自行负责内部的故障隔离，
/// `run` 返回 `Err` 仅表示整轮都没能开展（如启动记录写入失败）。
#[async_trait]
pub trait Worker: Send + Sync {
    /// 执行一轮完整运行
    async fn run(&self) -> Result<(), WorkerError>;

    /// 日志用的工作器名称
    fn name(&self) -> &str;
}
