//! tracking_logs 表迁移
//!
//! 创建 tracking_logs 表用于存储追踪事件，仅插入、不更新：
//! - 事件类型 (view / open / download)
//! - IP 地址、User-Agent、Referer
//! - 地理位置信息 (country, city, region, latitude, longitude)
//! - 公司提示 (company_hint)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrackingLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackingLogs::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::ResumeId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::EventType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrackingLogs::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(TrackingLogs::UserAgent).text().null())
                    .col(ColumnDef::new(TrackingLogs::Referer).text().null())
                    .col(ColumnDef::new(TrackingLogs::Country).string_len(100).null())
                    .col(ColumnDef::new(TrackingLogs::City).string_len(100).null())
                    .col(ColumnDef::new(TrackingLogs::Region).string_len(100).null())
                    .col(ColumnDef::new(TrackingLogs::Latitude).double().null())
                    .col(ColumnDef::new(TrackingLogs::Longitude).double().null())
                    .col(ColumnDef::new(TrackingLogs::CompanyHint).string_len(255).null())
                    .col(
                        ColumnDef::new(TrackingLogs::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracking_logs_resume_id")
                            .from(TrackingLogs::Table, TrackingLogs::ResumeId)
                            .to(Resumes::Table, Resumes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // resume_id 索引（聚合查询的主要访问路径）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tracking_logs_resume_id")
                    .table(TrackingLogs::Table)
                    .col(TrackingLogs::ResumeId)
                    .to_owned(),
            )
            .await?;

        // viewed_at 索引（时间范围查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tracking_logs_viewed_at")
                    .table(TrackingLogs::Table)
                    .col(TrackingLogs::ViewedAt)
                    .to_owned(),
            )
            .await?;

        // 复合索引（单文档时间序列查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tracking_logs_resume_time")
                    .table(TrackingLogs::Table)
                    .col(TrackingLogs::ResumeId)
                    .col(TrackingLogs::ViewedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_tracking_logs_resume_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_tracking_logs_viewed_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_tracking_logs_resume_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TrackingLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrackingLogs {
    #[sea_orm(iden = "tracking_logs")]
    Table,
    Id,
    ResumeId,
    EventType,
    IpAddress,
    UserAgent,
    Referer,
    Country,
    City,
    Region,
    Latitude,
    Longitude,
    CompanyHint,
    ViewedAt,
}

#[derive(DeriveIden)]
enum Resumes {
    #[sea_orm(iden = "resumes")]
    Table,
    Id,
}
