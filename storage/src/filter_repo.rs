//! Filter repository: users and search filters in SQLite.
//!
//! Uses SqlitePoolManager and the models (SearchFilter, SearchFilterRecord, UserRecord).
//! External: SQLite via sqlx; the wizard uses it through [`FilterStore`].

use crate::error::StorageError;
use crate::models::{SearchFilter, SearchFilterRecord, UserRecord};
use crate::repository::FilterStore;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::Utc;
use filterbot_core::UserIdentity;
use sqlx::SqliteConnection;
use tracing::info;

#[derive(Clone)]
pub struct SqliteFilterStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteFilterStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS telegram_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                telegram_id INTEGER NOT NULL UNIQUE,
                telegram_username TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS search_filters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES telegram_users(id),
                filter_name TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                city_id INTEGER NOT NULL,
                region_id INTEGER NOT NULL,
                currency TEXT NOT NULL CHECK (currency IN ('UAH', 'USD', 'EUR')),
                price_from INTEGER,
                price_to INTEGER,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_search_filters_user_id ON search_filters(user_id)")
            .execute(pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    pub async fn get_user(&self, telegram_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM telegram_users WHERE telegram_id = ?",
        )
        .bind(telegram_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(user)
    }

    /// Filters saved by the user with the given external id, oldest first.
    pub async fn filters_for_user(
        &self,
        telegram_id: i64,
    ) -> Result<Vec<SearchFilterRecord>, StorageError> {
        let filters = sqlx::query_as::<_, SearchFilterRecord>(
            r#"
            SELECT f.* FROM search_filters f
            JOIN telegram_users u ON u.id = f.user_id
            WHERE u.telegram_id = ?
            ORDER BY f.id
            "#,
        )
        .bind(telegram_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!(
            telegram_id = telegram_id,
            count = filters.len(),
            "Retrieved saved filters"
        );
        Ok(filters)
    }
}

async fn upsert_user_on(
    conn: &mut SqliteConnection,
    user: &UserIdentity,
) -> Result<i64, StorageError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO telegram_users (telegram_id, telegram_username, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(telegram_id) DO NOTHING
        "#,
    )
    .bind(user.external_user_id)
    .bind(&user.display_name)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM telegram_users WHERE telegram_id = ?")
        .bind(user.external_user_id)
        .fetch_one(&mut *conn)
        .await?;

    if inserted > 0 {
        info!(telegram_id = user.external_user_id, id = id, "Added new user");
    } else {
        info!(telegram_id = user.external_user_id, id = id, "User already exists");
    }
    Ok(id)
}

#[async_trait]
impl FilterStore for SqliteFilterStore {
    async fn upsert_user(&self, user: &UserIdentity) -> Result<i64, StorageError> {
        let mut conn = self.pool_manager.pool().acquire().await?;
        upsert_user_on(&mut *conn, user).await
    }

    async fn insert_filter(
        &self,
        user: &UserIdentity,
        filter: &SearchFilter,
    ) -> Result<i64, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;
        let user_id = upsert_user_on(&mut *tx, user).await?;

        let filter_id = sqlx::query(
            r#"
            INSERT INTO search_filters (user_id, filter_name, category_id, city_id, region_id, currency, price_from, price_to, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&filter.filter_name)
        .bind(filter.category_id)
        .bind(filter.city_id)
        .bind(filter.region_id)
        .bind(filter.currency.code())
        .bind(filter.price_from.map(i64::from))
        .bind(filter.price_to.map(i64::from))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!(
            user_id = user_id,
            filter_id = filter_id,
            filter_name = %filter.filter_name,
            "Saved search filter"
        );
        Ok(filter_id)
    }
}
