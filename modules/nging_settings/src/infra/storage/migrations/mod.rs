//! Database migrations for the settings store

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_config::Migration)]
    }
}

mod m20240601_000001_create_config {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Config::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Config::Group).string_len(64).not_null())
                        .col(ColumnDef::new(Config::Key).string_len(128).not_null())
                        .col(
                            ColumnDef::new(Config::Label)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Config::Value).text().not_null())
                        .col(
                            ColumnDef::new(Config::Kind)
                                .string_len(16)
                                .not_null()
                                .default("text"),
                        )
                        .col(
                            ColumnDef::new(Config::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Config::Disabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Config::UpdatedAt).timestamp_with_time_zone())
                        .primary_key(Index::create().col(Config::Group).col(Config::Key))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_config_group")
                        .table(Config::Table)
                        .col(Config::Group)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Config::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Config {
        Table,
        Group,
        Key,
        Label,
        Value,
        Kind,
        Description,
        Disabled,
        UpdatedAt,
    }
}
