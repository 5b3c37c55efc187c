//! Create tag and tag_assignment tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Tag::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Tag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Tag::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tag::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: name - find-or-create keys on this
        manager
            .create_index(
                Index::create()
                    .name("idx_tag_name")
                    .table(Tag::Table)
                    .col(Tag::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TagAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TagAssignment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TagAssignment::TagId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(TagAssignment::TaggableId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TagAssignment::TaggableType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TagAssignment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(TagAssignment::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TagAssignment::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_assignment_tag")
                            .from(TagAssignment::Table, TagAssignment::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (taggable_type, taggable_id) - polymorphic owner lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_tag_assignment_taggable")
                    .table(TagAssignment::Table)
                    .col(TagAssignment::TaggableType)
                    .col(TagAssignment::TaggableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TagAssignment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum TagAssignment {
    Table,
    Id,
    TagId,
    TaggableId,
    TaggableType,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
