use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, string},
    sea_query,
};

#[derive(Iden)]
enum LeaderLease {
    Table,
    Name,
    Holder,
    ExpiresAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeaderLease::Table)
                    .if_not_exists()
                    .col(string(LeaderLease::Name))
                    .col(string(LeaderLease::Holder))
                    .col(big_integer(LeaderLease::ExpiresAt))
                    .primary_key(Index::create().col(LeaderLease::Name))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaderLease::Table).if_exists().to_owned())
            .await
    }
}
