//! Search filter models.
//!
//! [`SearchFilter`] is what the wizard hands off once all steps are done;
//! [`SearchFilterRecord`] maps to the `search_filters` table.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use filterbot_core::Currency;
use serde::{Deserialize, Serialize};

/// A completed filter, not yet persisted. `None` prices mean "no bound".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub filter_name: String,
    pub category_id: i64,
    pub city_id: i64,
    pub region_id: i64,
    pub currency: Currency,
    pub price_from: Option<u32>,
    pub price_to: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchFilterRecord {
    pub id: i64,
    pub user_id: i64,
    pub filter_name: String,
    pub category_id: i64,
    pub city_id: i64,
    pub region_id: i64,
    pub currency: String,
    pub price_from: Option<i64>,
    pub price_to: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl SearchFilterRecord {
    pub fn currency(&self) -> Result<Currency, StorageError> {
        self.currency.parse().map_err(StorageError::InvalidData)
    }
}
