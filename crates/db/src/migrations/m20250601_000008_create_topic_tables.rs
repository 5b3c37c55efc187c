//! Create topic and topic_answer tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Topic::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Topic::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Topic::Title).text().not_null())
                    .col(ColumnDef::new(Topic::PostedBy).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Topic::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Topic::Status)
                            .string_len(8)
                            .not_null()
                            .default("hide"),
                    )
                    .col(
                        ColumnDef::new(Topic::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Topic::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Topic::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (status, deleted_at) - public listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_status_deleted")
                    .table(Topic::Table)
                    .col(Topic::Status)
                    .col(Topic::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TopicAnswer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TopicAnswer::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TopicAnswer::TopicId).string_len(32).not_null())
                    .col(ColumnDef::new(TopicAnswer::AnswerText).text().not_null())
                    .col(
                        ColumnDef::new(TopicAnswer::AnsweredBy)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TopicAnswer::Status)
                            .string_len(8)
                            .not_null()
                            .default("hide"),
                    )
                    .col(
                        ColumnDef::new(TopicAnswer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(TopicAnswer::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TopicAnswer::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_answer_topic")
                            .from(TopicAnswer::Table, TopicAnswer::TopicId)
                            .to(Topic::Table, Topic::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: topic_id
        manager
            .create_index(
                Index::create()
                    .name("idx_topic_answer_topic_id")
                    .table(TopicAnswer::Table)
                    .col(TopicAnswer::TopicId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TopicAnswer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Topic::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Topic {
    Table,
    Id,
    Title,
    PostedBy,
    IsApproved,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TopicAnswer {
    Table,
    Id,
    TopicId,
    AnswerText,
    AnsweredBy,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
