// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_job::SearchJob;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{info, warn};

/// 单分类的定向配置
///
/// 每个 (query × region × language) 组合就是一个搜索作业。
/// 多查询变体是为了绕开单查询约500条的结果上限，
/// 多地区覆盖本土加侨民市场。
#[derive(Debug)]
pub struct MatrixEntry {
    pub queries: &'static [&'static str],
    pub regions: &'static [&'static str],
    pub languages: &'static [&'static str],
}

/// 主搜索矩阵，键与 target_categories.name 逐字对应
static SEARCH_MATRIX: Lazy<HashMap<&'static str, MatrixEntry>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert(
        "Indian Music",
        MatrixEntry {
            queries: &[
                "official music video 2026",
                "new song 2026",
                "punjabi song 2026",
                "hindi song 2026",
                "bollywood song new",
                "haryanvi song 2026",
                "bhojpuri song 2026",
                "rajasthani song 2026",
                "devotional song hindi 2026",
                "independent artist india music",
                "new album release india",
                "music video india upcoming",
                "desi hip hop 2026",
                "lo-fi hindi music",
            ],
            // 本土 + 英国/加拿大侨民 + 海湾
            regions: &["IN", "GB", "CA", "AE"],
            languages: &["hi", "en"],
        },
    );

    m.insert(
        "Indian Podcasts",
        MatrixEntry {
            queries: &[
                "business podcast hindi 2026",
                "startup india podcast",
                "entrepreneur interview hindi",
                "hindi podcast episode",
                "founder story india",
                "motivational podcast india hindi",
                "investor talk india",
                "saas startup india podcast",
                "side hustle india hindi",
                "career advice india hindi",
                "self improvement hindi podcast",
                "real estate india hindi",
            ],
            regions: &["IN", "GB", "CA"],
            languages: &["hi", "en"],
        },
    );

    m.insert(
        "Finance & Stock Market",
        MatrixEntry {
            queries: &[
                "stock market hindi 2026",
                "trading tutorial india",
                "investment guide hindi",
                "crypto india 2026",
                "mutual fund india hindi",
                "nifty sensex analysis hindi",
                "options trading india hindi",
                "personal finance hindi",
                "financial freedom india hindi",
                "demat account india tutorial",
                "share market basics hindi",
                "swing trading india",
                "fundamental analysis hindi",
            ],
            // 海湾与新加坡的NRI投资人群
            regions: &["IN", "GB", "AE", "SG"],
            languages: &["hi", "en"],
        },
    );

    m.insert(
        "Education & Tech Creators",
        MatrixEntry {
            queries: &[
                "coding tutorial hindi",
                "software engineering india",
                "tech career hindi",
                "python tutorial hindi",
                "web development hindi 2026",
                "data science hindi tutorial",
                "machine learning hindi",
                "javascript tutorial hindi",
                "react tutorial india",
                "django tutorial hindi",
                "placement preparation india",
                "dsa coding interview india",
                "ai tools india hindi",
                "cloud computing india hindi",
            ],
            regions: &["IN", "GB", "CA", "US"],
            languages: &["hi", "en"],
        },
    );

    m
});

/// 展开单个分类的全部搜索作业
///
/// 返回 (query × region × language) 笛卡尔积，每项都打上分类名。
/// 精确匹配失败时降级为一次不区分大小写的查找；仍未命中返回
/// 空列表并告警，由调用方决定兜底策略。
pub fn expand(category_name: &str) -> Vec<SearchJob> {
    let entry = SEARCH_MATRIX.get(category_name).or_else(|| {
        SEARCH_MATRIX
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(category_name))
            .map(|(_, v)| v)
    });

    let Some(entry) = entry else {
        warn!(category = %category_name, "No search matrix entry, skipping");
        return Vec::new();
    };

    let mut jobs = Vec::with_capacity(
        entry.queries.len() * entry.regions.len() * entry.languages.len(),
    );
    for query in entry.queries {
        for region in entry.regions {
            for language in entry.languages {
                jobs.push(SearchJob::new(*query, *region, *language, category_name));
            }
        }
    }

    info!(
        category = %category_name,
        queries = entry.queries.len(),
        regions = entry.regions.len(),
        languages = entry.languages.len(),
        jobs = jobs.len(),
        "Search matrix expanded"
    );
    jobs
}

/// 矩阵覆盖的全部分类名
pub fn known_categories() -> Vec<&'static str> {
    SEARCH_MATRIX.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_is_full_cartesian_product() {
        let jobs = expand("Indian Music");
        assert_eq!(jobs.len(), 14 * 4 * 2);

        // 每个组合恰好出现一次
        let mut seen = std::collections::HashSet::new();
        for job in &jobs {
            assert_eq!(job.category_name, "Indian Music");
            assert!(seen.insert((
                job.query.clone(),
                job.region_code.clone(),
                job.language.clone()
            )));
        }
    }

    #[test]
    fn test_unknown_category_returns_empty() {
        assert!(expand("Cooking Channels").is_empty());
    }

    #[test]
    fn test_lookup_falls_back_to_case_insensitive() {
        let jobs = expand("indian podcasts");
        assert_eq!(jobs.len(), 12 * 3 * 2);
    }

    #[test]
    fn test_all_seed_categories_present() {
        let mut names = known_categories();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "Education & Tech Creators",
                "Finance & Stock Market",
                "Indian Music",
                "Indian Podcasts",
            ]
        );
    }
}
