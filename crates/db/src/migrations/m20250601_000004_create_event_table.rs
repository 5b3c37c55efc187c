//! Create event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Event::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Event::Description).text().not_null())
                    .col(ColumnDef::new(Event::EventDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Event::Status)
                            .string_len(8)
                            .not_null()
                            .default("hide"),
                    )
                    .col(ColumnDef::new(Event::ImgId).string_len(32))
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Event::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Event::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (status, deleted_at) - public listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_event_status_deleted")
                    .table(Event::Table)
                    .col(Event::Status)
                    .col(Event::DeletedAt)
                    .to_owned(),
            )
            .await?;

        // Index: event_date - listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_event_event_date")
                    .table(Event::Table)
                    .col(Event::EventDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    Title,
    Description,
    EventDate,
    Status,
    ImgId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
