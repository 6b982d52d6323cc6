//! SeaORM repository implementation

use crate::contract::ConfigEntry;
use crate::domain::{ConfigRepository, DebugSwitch};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QueryTrait, Select,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::entity;

/// Config repository over a SeaORM connection.
///
/// Also the database layer's debug switch: in debug mode every query it
/// issues is logged.
pub struct SeaOrmConfigRepository {
    db: Arc<DatabaseConnection>,
    debug: AtomicBool,
}

impl SeaOrmConfigRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            debug: AtomicBool::new(false),
        }
    }

    fn trace_query(&self, query: &Select<entity::Entity>) {
        if self.debug.load(Ordering::Relaxed) {
            let statement = query.build(self.db.get_database_backend());
            tracing::debug!(target: "nging_settings::db", sql = %statement, "Config query");
        }
    }
}

#[async_trait]
impl ConfigRepository for SeaOrmConfigRepository {
    async fn find_enabled(&self, groups: &[&str]) -> Result<Vec<ConfigEntry>> {
        let mut query = entity::Entity::find().filter(entity::Column::Disabled.eq(false));

        if !groups.is_empty() {
            query = query.filter(entity::Column::Group.is_in(groups.iter().copied()));
        }

        let query = query
            .order_by_asc(entity::Column::Group)
            .order_by_asc(entity::Column::Key);
        self.trace_query(&query);

        let results = query.all(&*self.db).await?;
        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn find(&self, group: &str, key: &str) -> Result<Option<ConfigEntry>> {
        let query = entity::Entity::find_by_id((group.to_string(), key.to_string()));
        self.trace_query(&query);

        let result = query.one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn upsert(&self, entry: &ConfigEntry) -> Result<ConfigEntry> {
        let existing = self.find(&entry.group, &entry.key).await?;
        let active: entity::ActiveModel = entry.into();

        let result = if existing.is_some() {
            active.update(&*self.db).await?
        } else {
            active.insert(&*self.db).await?
        };

        if self.debug.load(Ordering::Relaxed) {
            tracing::debug!(
                target: "nging_settings::db",
                group = %entry.group,
                key = %entry.key,
                created = existing.is_none(),
                "Config entry saved"
            );
        }

        Ok(result.into())
    }

    async fn is_connected(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Settings database ping failed: {}", e);
                false
            }
        }
    }
}

impl DebugSwitch for SeaOrmConfigRepository {
    fn name(&self) -> &str {
        "db"
    }

    fn set_debug(&self, on: bool) {
        self.debug.store(on, Ordering::Relaxed);
    }
}
