use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::string,
    sea_query,
};

#[derive(Iden)]
enum TenantLabel {
    Table,
    TenantId,
    Key,
    Value,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantLabel::Table)
                    .if_not_exists()
                    .col(string(TenantLabel::TenantId))
                    .col(string(TenantLabel::Key))
                    .col(string(TenantLabel::Value))
                    .primary_key(
                        Index::create()
                            .col(TenantLabel::TenantId)
                            .col(TenantLabel::Key),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_label_key")
                    .table(TenantLabel::Table)
                    .col(TenantLabel::Key)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantLabel::Table).if_exists().to_owned())
            .await
    }
}
