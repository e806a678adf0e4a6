//! Settings store
//!
//! Access to the `settings` key/value table. Values are written by external
//! administrative tooling. The only write made here is `get_or_insert`, used
//! to generate the API shared secret on first start.

use crate::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Well-known setting keys
pub mod keys {
    /// Google Analytics tracking id published by `GET /google_analytics/id`
    pub const TRACKING_ID: &str = "google_analytics.tracking_id";

    /// API shared secret (i64, 0 disables authentication)
    pub const API_SHARED_SECRET: &str = "api_shared_secret";
}

/// One row of the settings table
///
/// `updated_at` is kept as the stored text; external writers may use any format.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SettingRecord {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: Option<String>,
}

/// Settings store handed to request handlers
#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: SqlitePool,
}

impl SettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a setting value
    ///
    /// A missing row and a NULL value are both reported as `None`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(value,)| value))
    }

    /// Get the full settings row, for inspection
    pub async fn get_record(&self, key: &str) -> Result<Option<SettingRecord>> {
        let record = sqlx::query_as::<_, SettingRecord>(
            "SELECT key, value, CAST(updated_at AS TEXT) AS updated_at FROM settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get a setting, storing `default` first when it is missing or NULL
    pub async fn get_or_insert(&self, key: &str, default: &str) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE
                SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
                WHERE settings.value IS NULL
            "#,
        )
        .bind(key)
        .bind(default)
        .execute(&self.pool)
        .await?;

        let value: String = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_store() -> SettingsStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        SettingsStore::new(pool)
    }

    async fn put(store: &SettingsStore, key: &str, value: Option<&str>) {
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(store.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_returns_stored_value() {
        let store = setup_store().await;
        put(&store, keys::TRACKING_ID, Some("UA-12345-1")).await;

        let value = store.get(keys::TRACKING_ID).await.unwrap();
        assert_eq!(value.as_deref(), Some("UA-12345-1"));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let store = setup_store().await;

        assert_eq!(store.get(keys::TRACKING_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_null_value_is_none() {
        let store = setup_store().await;
        put(&store, keys::TRACKING_ID, None).await;

        assert_eq!(store.get(keys::TRACKING_ID).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_record_includes_timestamp() {
        let store = setup_store().await;
        put(&store, "some_key", Some("v")).await;

        let record = store.get_record("some_key").await.unwrap().expect("Row should exist");
        assert_eq!(record.key, "some_key");
        assert_eq!(record.value.as_deref(), Some("v"));

        assert!(record.updated_at.is_some());

        assert!(store.get_record("other_key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_record_keeps_unparseable_timestamp() {
        let store = setup_store().await;
        sqlx::query("INSERT INTO settings (key, value, updated_at) VALUES ('k', 'v', 'last tuesday')")
            .execute(store.pool())
            .await
            .unwrap();

        let record = store.get_record("k").await.unwrap().unwrap();
        assert_eq!(record.updated_at.as_deref(), Some("last tuesday"));
    }

    #[tokio::test]
    async fn test_get_or_insert_keeps_existing_value() {
        let store = setup_store().await;
        put(&store, "k", Some("existing")).await;

        assert_eq!(store.get_or_insert("k", "default").await.unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_get_or_insert_fills_missing_and_null() {
        let store = setup_store().await;
        assert_eq!(store.get_or_insert("k", "first").await.unwrap(), "first");

        put(&store, "n", None).await;
        assert_eq!(store.get_or_insert("n", "filled").await.unwrap(), "filled");
    }

    #[tokio::test]
    async fn test_get_fails_when_pool_closed() {
        let store = setup_store().await;
        store.pool().close().await;

        assert!(matches!(
            store.get(keys::TRACKING_ID).await,
            Err(crate::Error::Database(_))
        ));
    }
}
