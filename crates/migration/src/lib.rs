pub use sea_orm_migration::prelude::*;

use sea_orm::DatabaseConnection;
use tracing::info;

mod m20260101_000001_collections;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260101_000001_collections::Migration)]
    }
}

/// What [`run`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationReport {
    /// Names of the migrations applied by this run, oldest first.
    pub applied: Vec<String>,
    /// Name of the last applied migration after the run.
    pub schema_version: Option<String>,
}

impl MigrationReport {
    pub fn migrated(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Applies every pending migration and reports the outcome.
pub async fn run(db: &DatabaseConnection) -> Result<MigrationReport, DbErr> {
    let applied: Vec<String> = Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|migration| migration.name().to_string())
        .collect();
    if !applied.is_empty() {
        Migrator::up(db, None).await?;
    }

    let schema_version = Migrator::get_applied_migrations(db)
        .await?
        .last()
        .map(|migration| migration.name().to_string());
    info!(
        applied = applied.len(),
        schema_version = schema_version.as_deref().unwrap_or("none"),
        "migrations checked"
    );
    Ok(MigrationReport {
        applied,
        schema_version,
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;

    use super::*;

    #[tokio::test]
    async fn second_run_is_a_noop() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let first = run(&db).await.unwrap();
        assert!(first.migrated());
        assert_eq!(
            first.schema_version.as_deref(),
            Some("m20260101_000001_collections")
        );

        let second = run(&db).await.unwrap();
        assert!(!second.migrated());
        assert_eq!(second.schema_version, first.schema_version);
    }
}
