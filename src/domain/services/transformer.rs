// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::channel::{
    ChannelDetail, ChannelRecord, ExtractedEmailRecord, SocialLinkRecord,
};
use crate::domain::models::video::{VideoDetail, VideoRecord};
use crate::domain::services::contact_extractor::{self, ContactInfo};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// 转换产物
///
/// 一次分类流水线中所有待持久化的记录，按表分组。
#[derive(Debug, Default)]
pub struct TransformPayload {
    pub channels: Vec<ChannelRecord>,
    pub videos: Vec<VideoRecord>,
    pub emails: Vec<ExtractedEmailRecord>,
    pub social_links: Vec<SocialLinkRecord>,
}

/// 合并详情与富化数据，产出持久化记录
///
/// 对每个频道：从简介提取联系方式，再叠加about页面的富化结果
/// （简介优先，富化只做补充），计算均值与互动率等派生指标。
/// 视频记录只做逐字段映射加抓取时间戳。
pub fn transform(
    channel_details: &[ChannelDetail],
    video_details: &[VideoDetail],
    enrichment: &HashMap<String, ContactInfo>,
    category_id: Option<i32>,
    now: DateTime<Utc>,
) -> TransformPayload {
    let mut payload = TransformPayload::default();

    for detail in channel_details {
        let mut contacts = contact_extractor::extract_contacts(&detail.description);
        if let Some(extra) = enrichment.get(&detail.channel_id) {
            contacts.merge(extra.clone());
        }

        let primary_email = contacts.emails.first().cloned();
        let primary_instagram = contacts
            .social_links
            .iter()
            .find(|(platform, _)| platform == "instagram")
            .map(|(_, url)| url.clone());
        let primary_website = contacts.websites.first().cloned();

        for email in &contacts.emails {
            payload.emails.push(ExtractedEmailRecord {
                channel_id: detail.channel_id.clone(),
                email: email.clone(),
            });
        }
        for (platform, url) in &contacts.social_links {
            payload.social_links.push(SocialLinkRecord {
                channel_id: detail.channel_id.clone(),
                platform: platform.clone(),
                url: url.clone(),
            });
        }

        payload.channels.push(ChannelRecord {
            channel_id: detail.channel_id.clone(),
            name: detail.title.clone(),
            handle: detail.handle.clone(),
            description: detail.description.clone(),
            thumbnail_url: detail.thumbnail_url.clone(),
            country_code: detail.country_code.clone(),
            subscriber_count: detail.subscriber_count,
            total_video_count: detail.video_count,
            total_view_count: detail.view_count,
            channel_created_at: detail.published_at,
            category_id,
            has_email: primary_email.is_some(),
            has_instagram: primary_instagram.is_some(),
            primary_email,
            primary_instagram,
            primary_website,
            avg_views: average_views(detail.view_count, detail.video_count),
            engagement_rate: engagement_rate(detail.view_count, detail.subscriber_count),
            discovered_at: now,
        });
    }

    for detail in video_details {
        payload.videos.push(VideoRecord {
            video_id: detail.video_id.clone(),
            channel_id: detail.channel_id.clone(),
            title: detail.title.clone(),
            description: detail.description.clone(),
            thumbnail_url: detail.thumbnail_url.clone(),
            published_at: detail.published_at,
            duration_seconds: detail.duration_seconds,
            view_count: detail.view_count,
            like_count: detail.like_count,
            comment_count: detail.comment_count,
            tags: detail.tags.clone(),
            language: detail.language.clone(),
            fetched_at: now,
        });
    }

    payload
}

fn average_views(total_views: i64, video_count: i64) -> i64 {
    if video_count <= 0 {
        0
    } else {
        total_views / video_count
    }
}

/// 总播放量相对订阅数的百分比，订阅数为0时记0
fn engagement_rate(total_views: i64, subscribers: i64) -> f64 {
    if subscribers <= 0 {
        0.0
    } else {
        (total_views as f64 / subscribers as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, description: &str) -> ChannelDetail {
        ChannelDetail {
            channel_id: id.to_string(),
            title: format!("Channel {}", id),
            handle: Some(format!("@{}", id)),
            description: description.to_string(),
            thumbnail_url: None,
            country_code: Some("US".to_string()),
            subscriber_count: 1000,
            video_count: 10,
            view_count: 50000,
            published_at: None,
        }
    }

    #[test]
    fn test_description_contacts_flow_into_record() {
        let details = vec![channel(
            "UC1",
            "Business: biz@creator.dev IG https://instagram.com/creator1",
        )];
        let payload = transform(&details, &[], &HashMap::new(), Some(7), Utc::now());

        let record = &payload.channels[0];
        assert_eq!(record.primary_email.as_deref(), Some("biz@creator.dev"));
        assert_eq!(
            record.primary_instagram.as_deref(),
            Some("https://instagram.com/creator1")
        );
        assert!(record.has_email);
        assert!(record.has_instagram);
        assert_eq!(record.category_id, Some(7));
        assert_eq!(payload.emails.len(), 1);
        assert_eq!(payload.social_links.len(), 1);
    }

    #[test]
    fn test_enrichment_supplements_but_does_not_override() {
        let details = vec![channel("UC1", "contact first@x.com")];
        let mut enrichment = HashMap::new();
        enrichment.insert(
            "UC1".to_string(),
            contact_extractor::extract_contacts("second@x.com https://instagram.com/extra"),
        );

        let payload = transform(&details, &[], &enrichment, None, Utc::now());
        let record = &payload.channels[0];
        // 简介里的邮箱仍是首选
        assert_eq!(record.primary_email.as_deref(), Some("first@x.com"));
        assert_eq!(payload.emails.len(), 2);
        assert!(record.has_instagram);
    }

    #[test]
    fn test_derived_metrics_guard_zero_denominators() {
        let mut detail = channel("UC1", "");
        detail.subscriber_count = 0;
        detail.video_count = 0;
        let payload = transform(&[detail], &[], &HashMap::new(), None, Utc::now());
        let record = &payload.channels[0];
        assert_eq!(record.avg_views, 0);
        assert_eq!(record.engagement_rate, 0.0);
    }

    #[test]
    fn test_video_records_carry_fetch_timestamp() {
        let now = Utc::now();
        let video = VideoDetail {
            video_id: "vid1".to_string(),
            channel_id: "UC1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            thumbnail_url: None,
            published_at: None,
            duration_seconds: 90,
            view_count: 5,
            like_count: 1,
            comment_count: 0,
            tags: vec!["tag".to_string()],
            language: None,
        };
        let payload = transform(&[], &[video], &HashMap::new(), None, now);
        assert_eq!(payload.videos[0].fetched_at, now);
        assert_eq!(payload.videos[0].duration_seconds, 90);
    }
}
