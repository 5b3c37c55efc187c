//! Create admin table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admin::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admin::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Admin::Username).string_len(128).not_null())
                    .col(ColumnDef::new(Admin::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Admin::Email).string_len(256))
                    .col(ColumnDef::new(Admin::OtpCode).string_len(16))
                    .col(ColumnDef::new(Admin::OtpExpiry).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Admin::OtpState)
                            .string_len(16)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(Admin::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Admin::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Admin::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: username
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_username")
                    .table(Admin::Table)
                    .col(Admin::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: email (OTP lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_email")
                    .table(Admin::Table)
                    .col(Admin::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admin::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Admin {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    OtpCode,
    OtpExpiry,
    OtpState,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
