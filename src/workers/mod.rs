// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台发现流水线的编排与执行
pub mod discovery_worker;
pub mod worker;

pub use worker::Worker;
