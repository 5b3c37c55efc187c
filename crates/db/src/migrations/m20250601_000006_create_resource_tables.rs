//! Create resource and resource_file tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resource::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resource::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Resource::Description).text())
                    .col(ColumnDef::new(Resource::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Resource::Duration).string_len(64))
                    .col(ColumnDef::new(Resource::Pages).integer())
                    .col(ColumnDef::new(Resource::Author).string_len(256))
                    .col(ColumnDef::new(Resource::PublishedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Resource::Status)
                            .string_len(8)
                            .not_null()
                            .default("hide"),
                    )
                    .col(
                        ColumnDef::new(Resource::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Resource::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Resource::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (kind, status, deleted_at) - listing filter
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_kind_status")
                    .table(Resource::Table)
                    .col(Resource::Kind)
                    .col(Resource::Status)
                    .col(Resource::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ResourceFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceFile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ResourceFile::ResourceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResourceFile::FileType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ResourceFile::FilePath)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResourceFile::IsDownloadable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ResourceFile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ResourceFile::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ResourceFile::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_file_resource")
                            .from(ResourceFile::Table, ResourceFile::ResourceId)
                            .to(Resource::Table, Resource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: resource_id
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_file_resource_id")
                    .table(ResourceFile::Table)
                    .col(ResourceFile::ResourceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResourceFile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resource::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resource {
    Table,
    Id,
    Title,
    Description,
    Kind,
    Duration,
    Pages,
    Author,
    PublishedDate,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum ResourceFile {
    Table,
    Id,
    ResourceId,
    FileType,
    FilePath,
    IsDownloadable,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
