use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::core::criteria::{Criteria, CriteriaError};
use crate::core::query::{build_product_query, BindValue};
use crate::models::Product;

/// Errors that can occur when interacting with the catalog database
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid criteria: {0}")]
    Criteria(#[from] CriteriaError),
}

/// PostgreSQL client for the product catalog
///
/// Owns the connection pool and exposes the catalog's read operations
/// plus the bulk ingredient insert. Every operation is a single
/// request/response against the pool; connections, statements, and row
/// streams are released on every exit path by the pool's own guards.
pub struct CatalogClient {
    pool: PgPool,
}

impl CatalogClient {
    /// Create a new catalog client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, DataAccessError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new catalog client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, DataAccessError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
        )
        .await
    }

    /// Fetch products matching the given filter criteria
    ///
    /// Joins the brand and category reference tables and applies every
    /// present, supported criterion plus the fixed fiber baseline, capped
    /// at [`crate::core::query::MAX_RESULTS`] rows. All criteria values
    /// are bound as query parameters.
    pub async fn fetch_products(
        &self,
        criteria: &Criteria,
    ) -> Result<Vec<Product>, DataAccessError> {
        let built = build_product_query(criteria)?;

        let mut query = sqlx::query(&built.sql);
        for value in &built.binds {
            query = match value {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::Number(v) => query.bind(*v),
                BindValue::Id(v) => query.bind(*v),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<Product>, sqlx::Error>>()?;

        tracing::debug!(
            "Fetched {} products for {} active criteria",
            products.len(),
            built.binds.len()
        );

        Ok(products)
    }

    /// List the distinct nutrition grades present in the product table,
    /// ascending. Products without a grade are skipped.
    pub async fn nutrition_grades(&self) -> Result<Vec<String>, DataAccessError> {
        let rows = sqlx::query(
            "SELECT DISTINCT pdt_nutritiongrade FROM produit \
             WHERE pdt_nutritiongrade IS NOT NULL \
             ORDER BY pdt_nutritiongrade ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let grades = rows
            .iter()
            .map(|row| row.try_get("pdt_nutritiongrade"))
            .collect::<Result<Vec<String>, sqlx::Error>>()?;

        Ok(grades)
    }

    /// Resolve the ingredient names of one product, keyed by product id
    pub async fn product_ingredients(
        &self,
        product_id: i32,
    ) -> Result<Vec<String>, DataAccessError> {
        let rows = sqlx::query(
            "SELECT ing.ing_nom FROM ingredient ing \
             INNER JOIN produit_ingredient pi ON ing.ing_id = pi.pi_idingredient \
             INNER JOIN produit pro ON pi.pi_idproduit = pro.pdt_id \
             WHERE pi.pi_idproduit = $1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        let names = rows
            .iter()
            .map(|row| row.try_get("ing_nom"))
            .collect::<Result<Vec<String>, sqlx::Error>>()?;

        tracing::debug!("Product {} has {} ingredients", product_id, names.len());

        Ok(names)
    }

    /// Bulk-insert a set of ingredient names inside a single transaction
    ///
    /// On any failure the transaction rolls back and nothing is inserted.
    /// Returns the number of inserted rows.
    pub async fn insert_ingredients(
        &self,
        names: &HashSet<String>,
    ) -> Result<u64, DataAccessError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for name in names {
            let result = sqlx::query("INSERT INTO ingredient (ing_nom) VALUES ($1)")
                .bind(name.as_str())
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("Inserted {} ingredients", inserted);

        Ok(inserted)
    }

    /// Look up an ingredient id by exact name
    pub async fn ingredient_id(&self, name: &str) -> Result<Option<i32>, DataAccessError> {
        let row = sqlx::query("SELECT ing_id FROM ingredient WHERE ing_nom = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.try_get("ing_id")).transpose()?)
    }

    /// Load the full ingredient table as a name-to-id map
    pub async fn ingredient_ids(&self) -> Result<HashMap<String, i32>, DataAccessError> {
        let rows = sqlx::query("SELECT ing_id, ing_nom FROM ingredient")
            .fetch_all(&self.pool)
            .await?;

        let mut ids = HashMap::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.try_get("ing_nom")?;
            let id: i32 = row.try_get("ing_id")?;
            ids.insert(name, id);
        }

        Ok(ids)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, DataAccessError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("pdt_id")?,
        name: row.try_get("pdt_nom")?,
        category: row.try_get("ctg_nom")?,
        nutrition_grade: row.try_get("pdt_nutritiongrade")?,
        brand: row.try_get("mrq_nom")?,
        energy: row.try_get("pdt_energie")?,
        fat: row.try_get("pdt_graisse")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::KEY_ENERGY_MIN;

    #[test]
    fn test_criteria_error_wraps_into_data_access_error() {
        let err: DataAccessError = CriteriaError::InvalidNumber {
            key: KEY_ENERGY_MIN,
            value: "ten".to_string(),
        }
        .into();

        assert!(err.to_string().contains("Invalid criteria"));
    }
}
