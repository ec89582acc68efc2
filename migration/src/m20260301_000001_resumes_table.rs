//! resumes 表迁移
//!
//! 创建 resumes 表，保存被追踪文档的 id/token 映射：
//! - id（UUID 主键）
//! - tracking_token（嵌入像素 URL 的不透明 token，唯一）
//! - original_filename / created_at

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resumes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resumes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resumes::OriginalFilename).string_len(255).null())
                    .col(
                        ColumnDef::new(Resumes::TrackingToken)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resumes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // tracking_token 唯一索引（beacon 按 token 查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_resumes_tracking_token")
                    .table(Resumes::Table)
                    .col(Resumes::TrackingToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_resumes_tracking_token").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Resumes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Resumes {
    #[sea_orm(iden = "resumes")]
    Table,
    Id,
    OriginalFilename,
    TrackingToken,
    CreatedAt,
}
