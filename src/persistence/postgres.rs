//! PostgreSQL implementation of the catalog store.

use sqlx::PgPool;

use super::models::{NewSet, SetRow};
use super::retry::{RetryPolicy, with_retry};
use crate::domain::{PricePoint, SetNumber};
use crate::error::CatalogError;

const SET_COLUMNS: &str = "set_number, name, theme, sub_theme, year, minifigs, image_url, \
                           last_price, price_history, created_at, updated_at";

/// PostgreSQL-backed catalog store using `sqlx::PgPool`.
///
/// Every query goes through the retry wrapper; all writes are single-row
/// upserts or updates keyed on `set_number`, so a retried statement is
/// idempotent.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl CatalogStore {
    /// Creates a new store with the given connection pool and retry
    /// policy.
    #[must_use]
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Loads a single catalog row by set number.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure
    /// after retry exhaustion.
    pub async fn find_by_number(
        &self,
        number: &SetNumber,
    ) -> Result<Option<SetRow>, CatalogError> {
        let sql = format!("SELECT {SET_COLUMNS} FROM lego_sets WHERE set_number = $1");
        let number = number.as_str().to_string();
        let row = with_retry(&self.pool, self.retry, || {
            let pool = self.pool.clone();
            let sql = sql.clone();
            let number = number.clone();
            async move {
                sqlx::query_as::<_, SetRow>(&sql)
                    .bind(number)
                    .fetch_optional(&pool)
                    .await
            }
        })
        .await?;
        Ok(row)
    }

    /// Case-insensitive substring search over set number, name, and
    /// theme, newest releases first.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure
    /// after retry exhaustion.
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<SetRow>, CatalogError> {
        let sql = format!(
            "SELECT {SET_COLUMNS} FROM lego_sets \
             WHERE set_number ILIKE $1 OR name ILIKE $1 OR theme ILIKE $1 \
             ORDER BY year DESC LIMIT $2"
        );
        let pattern = like_pattern(term);
        let rows = with_retry(&self.pool, self.retry, || {
            let pool = self.pool.clone();
            let sql = sql.clone();
            let pattern = pattern.clone();
            async move {
                sqlx::query_as::<_, SetRow>(&sql)
                    .bind(pattern)
                    .bind(limit)
                    .fetch_all(&pool)
                    .await
            }
        })
        .await?;
        Ok(rows)
    }

    /// Most recently created rows, for the empty-query landing list.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure
    /// after retry exhaustion.
    pub async fn recent(&self, limit: i64) -> Result<Vec<SetRow>, CatalogError> {
        let sql =
            format!("SELECT {SET_COLUMNS} FROM lego_sets ORDER BY created_at DESC LIMIT $1");
        let rows = with_retry(&self.pool, self.retry, || {
            let pool = self.pool.clone();
            let sql = sql.clone();
            async move {
                sqlx::query_as::<_, SetRow>(&sql)
                    .bind(limit)
                    .fetch_all(&pool)
                    .await
            }
        })
        .await?;
        Ok(rows)
    }

    /// Upserts descriptive fields keyed on `set_number`.
    ///
    /// Pricing state (`last_price`, `price_history`) is never written
    /// here; only the refresh pipeline touches it.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure
    /// after retry exhaustion.
    pub async fn upsert(&self, item: &NewSet) -> Result<(), CatalogError> {
        let item = item.clone();
        with_retry(&self.pool, self.retry, || {
            let pool = self.pool.clone();
            let item = item.clone();
            async move {
                sqlx::query(
                    "INSERT INTO lego_sets \
                       (set_number, name, theme, sub_theme, year, minifigs, image_url) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     ON CONFLICT (set_number) DO UPDATE SET \
                       name = EXCLUDED.name, \
                       theme = EXCLUDED.theme, \
                       sub_theme = EXCLUDED.sub_theme, \
                       year = EXCLUDED.year, \
                       minifigs = EXCLUDED.minifigs, \
                       image_url = COALESCE(EXCLUDED.image_url, lego_sets.image_url), \
                       updated_at = now()",
                )
                .bind(item.set_number)
                .bind(item.name)
                .bind(item.theme)
                .bind(item.sub_theme)
                .bind(item.year)
                .bind(item.minifigs)
                .bind(item.image_url)
                .execute(&pool)
                .await
                .map(|_| ())
            }
        })
        .await?;
        Ok(())
    }

    /// Replaces a row's pricing state: the last-known price and the full
    /// history array, together, so the two stay consistent.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure
    /// after retry exhaustion, or [`CatalogError::Internal`] if the
    /// history fails to serialize.
    pub async fn update_price(
        &self,
        number: &SetNumber,
        last_price: f64,
        history: &[PricePoint],
    ) -> Result<(), CatalogError> {
        let history_json = serde_json::to_value(history)
            .map_err(|e| CatalogError::Internal(format!("history serialization failed: {e}")))?;
        let number = number.as_str().to_string();
        with_retry(&self.pool, self.retry, || {
            let pool = self.pool.clone();
            let number = number.clone();
            let history_json = history_json.clone();
            async move {
                sqlx::query(
                    "UPDATE lego_sets \
                     SET last_price = $2, price_history = $3, updated_at = now() \
                     WHERE set_number = $1",
                )
                .bind(number)
                .bind(last_price)
                .bind(history_json)
                .execute(&pool)
                .await
                .map(|_| ())
            }
        })
        .await?;
        Ok(())
    }
}

/// Builds an ILIKE pattern with the user's wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("10246"), "%10246%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }
}
