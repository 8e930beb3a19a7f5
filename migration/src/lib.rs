pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_identity_schema;
mod m20250601_000002_create_access_graph_schema;
mod m20250601_000003_create_activity_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_identity_schema::Migration),
            Box::new(m20250601_000002_create_access_graph_schema::Migration),
            Box::new(m20250601_000003_create_activity_schema::Migration),
        ]
    }
}
