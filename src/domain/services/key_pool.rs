// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

/// 密钥池错误类型
#[derive(Error, Debug)]
pub enum KeyPoolError {
    /// 环境中没有任何可用密钥，属于致命的启动配置错误
    #[error("No API keys configured. Set API_KEY_1 ... API_KEY_N in the environment")]
    NoKeysConfigured,
}

/// 密钥池健康快照
#[derive(Debug, Clone)]
pub struct KeyPoolStatus {
    pub total: usize,
    pub exhausted: usize,
    pub active: usize,
    /// 按脱敏后缀展示的每密钥用量
    pub usage_per_key: Vec<(String, u64)>,
    pub reset_date: NaiveDate,
}

struct PoolState {
    keys: Vec<String>,
    exhausted: HashSet<usize>,
    usage: Vec<u64>,
    current_index: usize,
    reset_date: NaiveDate,
}

impl PoolState {
    /// 跨过UTC日界后清空耗尽集合并将用量归零
    fn daily_reset_if_needed(&mut self, today: NaiveDate) {
        if today != self.reset_date {
            self.exhausted.clear();
            self.usage.iter_mut().for_each(|u| *u = 0);
            self.reset_date = today;
            info!(
                "Daily key quota reset — all {} keys active again",
                self.keys.len()
            );
        }
    }
}

/// API密钥池
///
/// 持有N个外部搜索API密钥，轮换选取，跟踪配额耗尽状态，
/// 每个UTC日自动重置。进程启动时构造一次，以句柄形式注入
/// 到每个搜索作业中，不存在任何全局可变状态。
///
/// 所有公开方法在单个互斥锁内完成全部状态变更，锁内没有
/// 任何I/O，调用复杂度为 O(池大小)。耗尽不是错误而是终止
/// 信号：`acquire` 以 `None` 表达"今天没有余量了"。
pub struct ApiKeyPool {
    inner: Mutex<PoolState>,
}

impl ApiKeyPool {
    /// 用给定密钥集合创建密钥池
    ///
    /// # 返回值
    ///
    /// * `Ok(ApiKeyPool)` - 至少有一个密钥的池
    /// * `Err(KeyPoolError::NoKeysConfigured)` - 密钥集合为空
    pub fn new(keys: Vec<String>) -> Result<Self, KeyPoolError> {
        if keys.is_empty() {
            return Err(KeyPoolError::NoKeysConfigured);
        }

        let count = keys.len();
        let usage = vec![0u64; count];
        let pool = Self {
            inner: Mutex::new(PoolState {
                keys,
                exhausted: HashSet::new(),
                usage,
                current_index: 0,
                reset_date: Utc::now().date_naive(),
            }),
        };

        info!("ApiKeyPool initialized with {} keys", count);
        Ok(pool)
    }

    /// 从环境变量加载密钥池
    ///
    /// 优先读取编号密钥 `API_KEY_1..N`，再补充旧式的
    /// `API_KEY` / `EMERGENCY_BACKUP_KEY` 单密钥变量。
    pub fn from_env() -> Result<Self, KeyPoolError> {
        let mut keys: Vec<String> = Vec::new();

        let mut i = 1;
        while let Ok(key) = std::env::var(format!("API_KEY_{}", i)) {
            let key = key.trim().to_string();
            if key.is_empty() {
                break;
            }
            keys.push(key);
            i += 1;
        }

        // Legacy single-key fallbacks
        for legacy in ["API_KEY", "EMERGENCY_BACKUP_KEY"] {
            if let Ok(val) = std::env::var(legacy) {
                let val = val.trim().to_string();
                if !val.is_empty() && !keys.contains(&val) {
                    keys.push(val);
                }
            }
        }

        Self::new(keys)
    }

    /// 获取下一个可用密钥
    ///
    /// 从上次使用的索引开始轮询，跳过已耗尽的密钥，递增用量。
    /// 当天所有密钥都耗尽时返回 `None`，调用方必须视为
    /// "今天没有余量"并停止获取。
    pub fn acquire(&self) -> Option<String> {
        self.acquire_at(Utc::now().date_naive())
    }

    fn acquire_at(&self, today: NaiveDate) -> Option<String> {
        let mut state = self.inner.lock();
        state.daily_reset_if_needed(today);

        let count = state.keys.len();
        if state.exhausted.len() == count {
            warn!("All {} API keys exhausted for today", count);
            return None;
        }

        let start = state.current_index % count;
        for offset in 0..count {
            let idx = (start + offset) % count;
            if !state.exhausted.contains(&idx) {
                state.current_index = idx;
                state.usage[idx] += 1;
                return Some(state.keys[idx].clone());
            }
        }

        None
    }

    /// 标记密钥配额已耗尽
    ///
    /// 收到配额超限响应时调用；该密钥当天不会再被 `acquire` 返回。
    pub fn mark_exhausted(&self, key: &str) {
        self.mark_exhausted_at(key, Utc::now().date_naive());
    }

    fn mark_exhausted_at(&self, key: &str, today: NaiveDate) {
        let mut state = self.inner.lock();
        state.daily_reset_if_needed(today);

        if let Some(idx) = state.keys.iter().position(|k| k == key) {
            state.exhausted.insert(idx);
            let remaining = state.keys.len() - state.exhausted.len();
            warn!(
                "Key ...{} exhausted. {}/{} keys still active",
                mask_key(key),
                remaining,
                state.keys.len()
            );
        }
    }

    /// 获取当前池健康快照
    pub fn status(&self) -> KeyPoolStatus {
        self.status_at(Utc::now().date_naive())
    }

    fn status_at(&self, today: NaiveDate) -> KeyPoolStatus {
        let mut state = self.inner.lock();
        state.daily_reset_if_needed(today);

        KeyPoolStatus {
            total: state.keys.len(),
            exhausted: state.exhausted.len(),
            active: state.keys.len() - state.exhausted.len(),
            usage_per_key: state
                .keys
                .iter()
                .zip(state.usage.iter())
                .map(|(k, u)| (mask_key(k), *u))
                .collect(),
            reset_date: state.reset_date,
        }
    }
}

/// 日志用密钥脱敏，只保留末8位
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        key.to_string()
    } else {
        chars[chars.len() - 8..].iter().collect()
    }
}
