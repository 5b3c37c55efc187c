//! Create visitor and admission tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visitor::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitor::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitor::Ip).string_len(64).not_null())
                    .col(ColumnDef::new(Visitor::LastSeenAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Visitor::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at - dashboard windows
        manager
            .create_index(
                Index::create()
                    .name("idx_visitor_created_at")
                    .table(Visitor::Table)
                    .col(Visitor::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admission::Title).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Admission::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Admission::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Admission::SelectionStartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Admission::SelectionEndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Admission::TrainingStartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Admission::LinkRegister).string_len(1024))
                    .col(
                        ColumnDef::new(Admission::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Admission::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Admission::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: start_date - listing order and active window lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_admission_start_date")
                    .table(Admission::Table)
                    .col(Admission::StartDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admission::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Visitor::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Visitor {
    Table,
    Id,
    Ip,
    LastSeenAt,
    CreatedAt,
}

#[derive(Iden)]
enum Admission {
    Table,
    Id,
    Title,
    StartDate,
    EndDate,
    SelectionStartDate,
    SelectionEndDate,
    TrainingStartDate,
    LinkRegister,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
