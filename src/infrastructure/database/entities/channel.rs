// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel_id: String,
    pub name: String,
    pub handle: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub country_code: Option<String>,
    pub subscriber_count: i64,
    pub total_video_count: i64,
    pub total_view_count: i64,
    pub channel_created_at: Option<ChronoDateTimeWithTimeZone>,
    pub category_id: Option<i32>,
    pub primary_email: Option<String>,
    pub primary_instagram: Option<String>,
    pub primary_website: Option<String>,
    pub has_email: bool,
    pub has_instagram: bool,
    pub avg_views: i64,
    pub engagement_rate: f64,
    pub discovered_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
