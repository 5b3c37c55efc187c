//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Review::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Review::CourseId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Username).string_len(256).not_null())
                    .col(ColumnDef::new(Review::Score).float())
                    .col(ColumnDef::new(Review::Comment).text())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Review::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Review::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_course")
                            .from(Review::Table, Review::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: course_id
        manager
            .create_index(
                Index::create()
                    .name("idx_review_course_id")
                    .table(Review::Table)
                    .col(Review::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    CourseId,
    Username,
    Score,
    Comment,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}
