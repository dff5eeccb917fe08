use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Loans::UserId).string().not_null())
                    .col(ColumnDef::new(Loans::Amount).double().not_null())
                    .col(ColumnDef::new(Loans::Interest).double().not_null())
                    .col(ColumnDef::new(Loans::Duration).integer().not_null())
                    .col(ColumnDef::new(Loans::Status).string().not_null().default("pending"))
                    .col(ColumnDef::new(Loans::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Loans::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Ownership lookups (details) filter on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_loans_user_id")
                    .table(Loans::Table)
                    .col(Loans::UserId)
                    .to_owned(),
            )
            .await?;

        // Admin listing filters by status and sorts by created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_loans_status_created_at")
                    .table(Loans::Table)
                    .col(Loans::Status)
                    .col(Loans::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Loans {
    Table,
    Id,
    UserId,
    Amount,
    Interest,
    Duration,
    Status,
    CreatedAt,
    UpdatedAt,
}
