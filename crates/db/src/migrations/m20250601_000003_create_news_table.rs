//! Create news table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(News::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(News::Title).string_len(512).not_null())
                    .col(ColumnDef::new(News::Content).text().not_null())
                    .col(ColumnDef::new(News::ShortDescription).string_len(1024))
                    .col(ColumnDef::new(News::PublishedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(News::Status)
                            .string_len(8)
                            .not_null()
                            .default("hide"),
                    )
                    .col(ColumnDef::new(News::ViewCount).integer().not_null().default(0))
                    .col(ColumnDef::new(News::ImgId).string_len(32))
                    .col(
                        ColumnDef::new(News::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(News::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(News::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (status, deleted_at) - public listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_news_status_deleted")
                    .table(News::Table)
                    .col(News::Status)
                    .col(News::DeletedAt)
                    .to_owned(),
            )
            .await?;

        // Index: published_date - listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_news_published_date")
                    .table(News::Table)
                    .col(News::PublishedDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum News {
    Table,
    Id,
    Title,
    Content,
    ShortDescription,
    PublishedDate,
    Status,
    ViewCount,
    ImgId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
