// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::RepositoryError;
use thiserror::Error;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Key pool error: {0}")]
    KeyPool(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
