use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{string, string_null, text},
    sea_query,
};

#[derive(Iden)]
enum Application {
    Table,
    Id,
    TenantId,
    Name,
    BaseUrl,
    LocalTenantId,
    SystemType,
}

#[derive(Iden)]
enum Bundle {
    Table,
    Id,
    TenantId,
    ApplicationId,
    Name,
    CorrelationIds,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Application::Table)
                    .if_not_exists()
                    .col(string(Application::Id))
                    .col(string(Application::TenantId))
                    .col(string(Application::Name))
                    .col(string_null(Application::BaseUrl))
                    .col(string_null(Application::LocalTenantId))
                    .col(string_null(Application::SystemType))
                    .primary_key(Index::create().col(Application::Id))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_application_tenant")
                    .table(Application::Table)
                    .col(Application::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bundle::Table)
                    .if_not_exists()
                    .col(string(Bundle::Id))
                    .col(string(Bundle::TenantId))
                    .col(string(Bundle::ApplicationId))
                    .col(string(Bundle::Name))
                    .col(text(Bundle::CorrelationIds))
                    .primary_key(Index::create().col(Bundle::Id))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bundle_tenant_application")
                    .table(Bundle::Table)
                    .col(Bundle::TenantId)
                    .col(Bundle::ApplicationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bundle::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Application::Table).if_exists().to_owned())
            .await
    }
}
