pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_parking_tables;
mod m20250901_000002_create_users;
mod m20250903_000001_add_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_parking_tables::Migration),
            Box::new(m20250901_000002_create_users::Migration),
            Box::new(m20250903_000001_add_notifications::Migration),
        ]
    }
}
