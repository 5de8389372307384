//! Persistence adapter: one row per top-level collection, holding its JSON
//! value.

use chrono::Utc;
use engine::{CollectionKey, LoadedState, Snapshot};
use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, warn};

use crate::{error::Result, settings};

mod collections {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "collections")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub key: String,
        #[sea_orm(column_type = "Text")]
        pub value: String,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Connects and brings the schema up to date.
pub async fn connect(config: &settings::Database) -> Result<DatabaseConnection> {
    let database = sea_orm::Database::connect(config.url()).await?;
    let report = migration::run(&database).await?;
    if report.migrated() {
        tracing::info!(
            applied = ?report.applied,
            schema_version = report.schema_version.as_deref().unwrap_or("none"),
            "database migrated"
        );
    }
    Ok(database)
}

/// Reads every persisted collection. Unknown keys and values that no longer
/// parse are reported and treated as absent.
pub async fn load(db: &DatabaseConnection) -> Result<LoadedState> {
    let mut loaded = LoadedState::default();
    for row in collections::Entity::find().all(db).await? {
        let Ok(key) = CollectionKey::try_from(row.key.as_str()) else {
            warn!(key = %row.key, "unknown persisted collection ignored");
            continue;
        };
        let parsed = serde_json::from_str(&row.value)
            .and_then(|value| loaded.insert_raw(key, value));
        if let Err(err) = parsed {
            warn!(key = key.as_str(), %err, "persisted collection unreadable, using default");
        }
    }
    Ok(loaded)
}

/// Writes all eleven collections in one transaction.
pub async fn persist(db: &DatabaseConnection, snapshot: &Snapshot) -> Result<()> {
    let exported = snapshot.export()?;
    let now = Utc::now();

    let db_tx = db.begin().await?;
    for (key, value) in exported {
        let row = collections::ActiveModel {
            key: ActiveValue::Set(key.as_str().to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(now),
        };
        collections::Entity::insert(row)
            .on_conflict(
                OnConflict::column(collections::Column::Key)
                    .update_columns([collections::Column::Value, collections::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&db_tx)
            .await?;
    }
    db_tx.commit().await?;
    debug!("snapshot persisted");
    Ok(())
}
