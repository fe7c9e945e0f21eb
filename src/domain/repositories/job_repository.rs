// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 自动化任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// 自动化任务仓库特质
///
/// 每次发现运行对应一条审计记录：启动时创建，
/// 结束时写入终态与结果摘要。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 记录一次运行开始，返回任务记录ID
    async fn start(&self, job_type: &str) -> Result<i32, RepositoryError>;
    /// 以成功终态收尾，附带JSON结果摘要
    async fn complete(
        &self,
        job_id: i32,
        summary: serde_json::Value,
    ) -> Result<(), RepositoryError>;
    /// 以失败终态收尾，附带错误说明
    async fn fail(&self, job_id: i32, error: &str) -> Result<(), RepositoryError>;
}
