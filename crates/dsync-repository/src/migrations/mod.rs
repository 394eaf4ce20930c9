use sea_orm_migration::{MigrationTrait, MigratorTrait, async_trait::async_trait};

mod m001_create_destination;
mod m002_create_tenant_label;
mod m003_create_application_and_bundle;
mod m004_create_leader_lease;

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_destination::Migration),
            Box::new(m002_create_tenant_label::Migration),
            Box::new(m003_create_application_and_bundle::Migration),
            Box::new(m004_create_leader_lease::Migration),
        ]
    }
}
