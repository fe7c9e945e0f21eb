// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供发现运行的周期调度功能
pub mod scheduler;

pub use scheduler::DiscoveryScheduler;
