// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

/// 回溯窗口参数
///
/// 所有窗口都以小时或天为粒度，默认值对应每日一次以上的调度节奏。
#[derive(Debug, Clone, Deserialize)]
pub struct LookbackConfig {
    /// 分类从未抓取过时的初始回看天数
    pub first_run_days: i64,
    /// 超过该间隔视为调度出现缺口，需要补抓
    pub stale_threshold_hours: i64,
    /// 补抓时在实际缺口上追加的安全余量
    pub gap_buffer_hours: i64,
    /// 正常节奏下的回看小时数（24小时节奏加2小时重叠）
    pub default_hours: i64,
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            first_run_days: 7,
            stale_threshold_hours: 48,
            gap_buffer_hours: 24,
            default_hours: 26,
        }
    }
}

/// 计算分类的发布时间下限
///
/// 返回值用作搜索请求的 publishedAfter 过滤器。三种情形：
/// 首次抓取回看 `first_run_days` 天；上次抓取距今超过
/// `stale_threshold_hours` 时按实际缺口（向下取整的小时数）
/// 加 `gap_buffer_hours` 余量补抓；否则使用固定的
/// `default_hours` 重叠窗口。
///
/// 窗口刻意只加宽不收窄，重复由下游按标识去重兜底，
/// 因此同一视频被相邻两次运行覆盖到是预期行为。
pub fn resolve_lookback(
    now: DateTime<Utc>,
    last_fetched_at: Option<DateTime<Utc>>,
    config: &LookbackConfig,
) -> DateTime<Utc> {
    let cutoff = match last_fetched_at {
        None => now - Duration::days(config.first_run_days),
        Some(last) => {
            let gap_hours = (now - last).num_hours();
            if gap_hours > config.stale_threshold_hours {
                now - Duration::hours(gap_hours + config.gap_buffer_hours)
            } else {
                now - Duration::hours(config.default_hours)
            }
        }
    };

    debug!(
        last_fetched_at = ?last_fetched_at,
        cutoff = %cutoff,
        "Resolved lookback window"
    );
    cutoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_run_looks_back_seven_days() {
        let now = at(10, 12);
        let cutoff = resolve_lookback(now, None, &LookbackConfig::default());
        assert_eq!(cutoff, now - Duration::days(7));
    }

    #[test]
    fn test_recent_fetch_uses_default_overlap_window() {
        let now = at(10, 12);
        // 30小时前抓过，未超过48小时阈值
        let last = now - Duration::hours(30);
        let cutoff = resolve_lookback(now, Some(last), &LookbackConfig::default());
        assert_eq!(cutoff, now - Duration::hours(26));
    }

    #[test]
    fn test_gap_recovery_covers_gap_plus_buffer() {
        let now = at(10, 12);
        // 调度缺口：上次抓取在72小时前
        let last = now - Duration::hours(72);
        let cutoff = resolve_lookback(now, Some(last), &LookbackConfig::default());
        assert_eq!(cutoff, now - Duration::hours(72 + 24));
        // 补抓窗口必须覆盖上次抓取时刻
        assert!(cutoff < last);
    }

    #[test]
    fn test_fractional_gap_hours_floor_before_buffer() {
        let now = at(10, 12);
        // 72.5小时 → 向下取整为72，再加24小时余量
        let last = now - Duration::hours(72) - Duration::minutes(30);
        let cutoff = resolve_lookback(now, Some(last), &LookbackConfig::default());
        assert_eq!(cutoff, now - Duration::hours(96));
    }

    #[test]
    fn test_exactly_at_threshold_is_not_a_gap() {
        let now = at(10, 12);
        let last = now - Duration::hours(48);
        let cutoff = resolve_lookback(now, Some(last), &LookbackConfig::default());
        assert_eq!(cutoff, now - Duration::hours(26));
    }
}
