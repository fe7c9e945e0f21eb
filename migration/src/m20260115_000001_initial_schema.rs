// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 数据库初始模式迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create target_categories table
        manager
            .create_table(
                Table::create()
                    .table(TargetCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TargetCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::SearchQuery)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::LastFetchedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TargetCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Create channels table
        manager
            .create_table(
                Table::create()
                    .table(Channels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Channels::ChannelId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Channels::Name).string().not_null())
                    .col(ColumnDef::new(Channels::Handle).string().null())
                    .col(ColumnDef::new(Channels::Description).text().not_null())
                    .col(ColumnDef::new(Channels::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Channels::CountryCode).string().null())
                    .col(
                        ColumnDef::new(Channels::SubscriberCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Channels::TotalVideoCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Channels::TotalViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Channels::ChannelCreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Channels::CategoryId).integer().null())
                    .col(ColumnDef::new(Channels::PrimaryEmail).string().null())
                    .col(ColumnDef::new(Channels::PrimaryInstagram).string().null())
                    .col(ColumnDef::new(Channels::PrimaryWebsite).string().null())
                    .col(
                        ColumnDef::new(Channels::HasEmail)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channels::HasInstagram)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channels::AvgViews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Channels::EngagementRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Channels::DiscoveredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Channels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_channels_has_email")
                    .table(Channels::Table)
                    .col(Channels::HasEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_channels_category_id")
                    .table(Channels::Table)
                    .col(Channels::CategoryId)
                    .to_owned(),
            )
            .await?;

        // 3. Create videos table
        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Videos::VideoId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Videos::ChannelId).string().not_null())
                    .col(ColumnDef::new(Videos::Title).string().not_null())
                    .col(ColumnDef::new(Videos::Description).text().not_null())
                    .col(ColumnDef::new(Videos::ThumbnailUrl).string().null())
                    .col(
                        ColumnDef::new(Videos::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Videos::DurationSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Videos::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Videos::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Videos::CommentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Videos::Tags).json().not_null())
                    .col(ColumnDef::new(Videos::Language).string().null())
                    .col(
                        ColumnDef::new(Videos::FetchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videos_channel_id")
                    .table(Videos::Table)
                    .col(Videos::ChannelId)
                    .to_owned(),
            )
            .await?;

        // 4. Create extracted_emails table
        manager
            .create_table(
                Table::create()
                    .table(ExtractedEmails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtractedEmails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExtractedEmails::ChannelId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExtractedEmails::Email).string().not_null())
                    .col(
                        ColumnDef::new(ExtractedEmails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_extracted_emails_channel_email")
                    .table(ExtractedEmails::Table)
                    .col(ExtractedEmails::ChannelId)
                    .col(ExtractedEmails::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 5. Create channel_social_links table
        manager
            .create_table(
                Table::create()
                    .table(ChannelSocialLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChannelSocialLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChannelSocialLinks::ChannelId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChannelSocialLinks::Platform)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChannelSocialLinks::Url).string().not_null())
                    .col(
                        ColumnDef::new(ChannelSocialLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_channel_social_links_channel_url")
                    .table(ChannelSocialLinks::Table)
                    .col(ChannelSocialLinks::ChannelId)
                    .col(ChannelSocialLinks::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 6. Create leads table
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leads::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leads::ChannelId).string().not_null())
                    .col(ColumnDef::new(Leads::VideoId).string().not_null())
                    .col(ColumnDef::new(Leads::PrimaryEmail).string().null())
                    .col(ColumnDef::new(Leads::InstagramUsername).string().null())
                    .col(ColumnDef::new(Leads::Status).string().not_null())
                    .col(ColumnDef::new(Leads::Notes).text().null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // video_id唯一索引是防重复线索的权威保证
        manager
            .create_index(
                Index::create()
                    .name("uq_leads_video_id")
                    .table(Leads::Table)
                    .col(Leads::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_channel_id")
                    .table(Leads::Table)
                    .col(Leads::ChannelId)
                    .to_owned(),
            )
            .await?;

        // 7. Create automation_jobs table
        manager
            .create_table(
                Table::create()
                    .table(AutomationJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AutomationJobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AutomationJobs::JobType).string().not_null())
                    .col(ColumnDef::new(AutomationJobs::Status).string().not_null())
                    .col(
                        ColumnDef::new(AutomationJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AutomationJobs::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(AutomationJobs::Result).json().null())
                    .col(ColumnDef::new(AutomationJobs::Error).text().null())
                    .to_owned(),
            )
            .await?;

        // 8. Create discovery_stats table
        manager
            .create_table(
                Table::create()
                    .table(DiscoveryStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscoveryStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiscoveryStats::CategoryId).integer().null())
                    .col(
                        ColumnDef::new(DiscoveryStats::VideosFound)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DiscoveryStats::ChannelsFound)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DiscoveryStats::EmailsFound)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DiscoveryStats::LeadsCreated)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DiscoveryStats::RunAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_discovery_stats_category_run")
                    .table(DiscoveryStats::Table)
                    .col(DiscoveryStats::CategoryId)
                    .col(DiscoveryStats::RunAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    /// 回滚数据库迁移
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiscoveryStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AutomationJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChannelSocialLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExtractedEmails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Channels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TargetCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum TargetCategories {
    Table,
    Id,
    Name,
    SearchQuery,
    Priority,
    IsActive,
    LastFetchedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Channels {
    Table,
    ChannelId,
    Name,
    Handle,
    Description,
    ThumbnailUrl,
    CountryCode,
    SubscriberCount,
    TotalVideoCount,
    TotalViewCount,
    ChannelCreatedAt,
    CategoryId,
    PrimaryEmail,
    PrimaryInstagram,
    PrimaryWebsite,
    HasEmail,
    HasInstagram,
    AvgViews,
    EngagementRate,
    DiscoveredAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Videos {
    Table,
    VideoId,
    ChannelId,
    Title,
    Description,
    ThumbnailUrl,
    PublishedAt,
    DurationSeconds,
    ViewCount,
    LikeCount,
    CommentCount,
    Tags,
    Language,
    FetchedAt,
}

#[derive(DeriveIden)]
enum ExtractedEmails {
    Table,
    Id,
    ChannelId,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ChannelSocialLinks {
    Table,
    Id,
    ChannelId,
    Platform,
    Url,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    ChannelId,
    VideoId,
    PrimaryEmail,
    InstagramUsername,
    Status,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AutomationJobs {
    Table,
    Id,
    JobType,
    Status,
    StartedAt,
    FinishedAt,
    Result,
    Error,
}

#[derive(DeriveIden)]
enum DiscoveryStats {
    Table,
    Id,
    CategoryId,
    VideosFound,
    ChannelsFound,
    EmailsFound,
    LeadsCreated,
    RunAt,
}
