//! Create image table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Image::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Image::RefId).string_len(32))
                    .col(ColumnDef::new(Image::RefType).string_len(32))
                    .col(ColumnDef::new(Image::ImagePath).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Image::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Image::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Image::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (ref_type, ref_id) - weak polymorphic owner lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_image_ref")
                    .table(Image::Table)
                    .col(Image::RefType)
                    .col(Image::RefId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
    RefId,
    RefType,
    ImagePath,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
