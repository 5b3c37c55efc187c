//! Create course and industry tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Course::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Course::Name).string_len(512).not_null())
                    .col(ColumnDef::new(Course::Description).text())
                    .col(ColumnDef::new(Course::SubDescription).text())
                    .col(ColumnDef::new(Course::AdditionalInfo).text())
                    .col(ColumnDef::new(Course::Instructor).string_len(256))
                    .col(ColumnDef::new(Course::ResourceId).string_len(32))
                    .col(ColumnDef::new(Course::ImgId).string_len(32))
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Course::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Course::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: created_at - listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_course_created_at")
                    .table(Course::Table)
                    .col(Course::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Industry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Industry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Industry::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Industry::CourseId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Industry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Industry::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Industry::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_industry_course")
                            .from(Industry::Table, Industry::CourseId)
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
                    .name("idx_industry_course_id")
                    .table(Industry::Table)
                    .col(Industry::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Industry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
    Name,
    Description,
    SubDescription,
    AdditionalInfo,
    Instructor,
    ResourceId,
    ImgId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Industry {
    Table,
    Id,
    Name,
    CourseId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
