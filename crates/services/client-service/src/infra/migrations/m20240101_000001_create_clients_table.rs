//! Migration: Create clients table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::TradeName).string_len(200).not_null())
                    .col(ColumnDef::new(Clients::Cnpj).char_len(14).not_null())
                    .col(ColumnDef::new(Clients::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Clients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the duplicate-CNPJ check against concurrent inserts
        manager
            .create_index(
                Index::create()
                    .name("idx_clients_cnpj")
                    .table(Clients::Table)
                    .col(Clients::Cnpj)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    TradeName,
    Cnpj,
    Active,
    CreatedAt,
    UpdatedAt,
}
