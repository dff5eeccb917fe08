use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsVerified).boolean().not_null().default(false))
                    // HMAC fingerprint of the last issued refresh token; NULL when logged out
                    .col(ColumnDef::new(Users::RefreshTokenHash).string().null())
                    .col(ColumnDef::new(Users::Bio).string().not_null().default(""))
                    .col(ColumnDef::new(Users::ImageUri).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Contact).string().not_null().default(""))
                    .col(ColumnDef::new(Users::JoinedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsAdmin,
    IsVerified,
    RefreshTokenHash,
    Bio,
    ImageUri,
    Contact,
    JoinedAt,
    UpdatedAt,
}
