use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, string, text},
    sea_query,
};

#[derive(Iden)]
enum Destination {
    Table,
    TenantId,
    Name,
    BundleId,
    Revision,
    DestinationType,
    Url,
    Authentication,
    XCorrelationId,
    XSystemTenantId,
    XSystemTenantName,
    XSystemType,
    XSystemBaseUrl,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Destination::Table)
                    .if_not_exists()
                    .col(string(Destination::TenantId))
                    .col(string(Destination::Name))
                    .col(string(Destination::BundleId))
                    .col(string(Destination::Revision))
                    .col(string(Destination::DestinationType))
                    .col(text(Destination::Url))
                    .col(string(Destination::Authentication))
                    .col(string(Destination::XCorrelationId))
                    .col(string(Destination::XSystemTenantId))
                    .col(string(Destination::XSystemTenantName))
                    .col(string(Destination::XSystemType))
                    .col(text(Destination::XSystemBaseUrl))
                    .col(big_integer(Destination::UpdatedAt))
                    .primary_key(
                        Index::create()
                            .col(Destination::TenantId)
                            .col(Destination::Name)
                            .col(Destination::BundleId),
                    )
                    .to_owned(),
            )
            .await?;

        // Stale-revision sweep filters on (tenant_id, revision)
        manager
            .create_index(
                Index::create()
                    .name("idx_destination_tenant_revision")
                    .table(Destination::Table)
                    .col(Destination::TenantId)
                    .col(Destination::Revision)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Destination::Table).if_exists().to_owned())
            .await
    }
}
