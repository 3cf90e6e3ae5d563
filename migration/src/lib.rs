pub use sea_orm_migration::prelude::*;

mod m20251020_000001_create_account_tables;
mod m20251020_000002_create_member_tables;
mod m20251020_000003_create_voting_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_account_tables::Migration),
            Box::new(m20251020_000002_create_member_tables::Migration),
            Box::new(m20251020_000003_create_voting_tables::Migration),
        ]
    }
}
