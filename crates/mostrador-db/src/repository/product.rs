//! # Product Repository
//!
//! Catalog reads plus the two mutations the ledger owns: stock deltas and
//! the cost/price overwrite applied by purchase registration.
//!
//! ## Stock Delta Pattern
//! ```text
//! ❌ Absolute update (races between two terminals):
//!    UPDATE products SET stock_actual = 7 WHERE id = ?
//!
//! ✅ Guarded delta update, atomic check-and-apply:
//!    UPDATE products SET stock_actual = stock_actual + :delta
//!    WHERE id = :id AND stock_actual + :delta >= 0
//!    RETURNING stock_actual
//! ```
//! The guard makes "read, check, write" a single statement; a concurrent
//! sale that would overdraw the product simply matches zero rows.

use chrono::Utc;
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::Product;

const PRODUCT_COLUMNS: &str = "id, code, name, cost_cents, price_cents, margin_bps, \
     stock_actual, stock_minimo, status, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRepository;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new() -> Self {
        ProductRepository
    }

    /// Gets a product by ID.
    pub async fn get_by_id(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(product)
    }

    /// Gets a product by its business code.
    pub async fn get_by_code(
        &self,
        exec: impl SqliteExecutor<'_>,
        code: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(exec)
        .await?;

        Ok(product)
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, exec: impl SqliteExecutor<'_>) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = 'active' ORDER BY name"
        ))
        .fetch_all(exec)
        .await?;

        Ok(products)
    }

    /// Lists active products at or below their reorder threshold.
    pub async fn list_below_minimum(
        &self,
        exec: impl SqliteExecutor<'_>,
    ) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE status = 'active' AND stock_actual <= stock_minimo \
             ORDER BY name"
        ))
        .fetch_all(exec)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(&self, exec: impl SqliteExecutor<'_>, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, name, cost_cents, price_cents, margin_bps,
                stock_actual, stock_minimo, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.margin_bps)
        .bind(product.stock_actual)
        .bind(product.stock_minimo)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Applies a signed stock delta if it would not take stock negative.
    ///
    /// ## Returns
    /// * `Ok(Some(new_stock))` - delta applied
    /// * `Ok(None)` - product missing, or delta would overdraw stock
    ///
    /// The caller disambiguates the `None` case by re-reading the product
    /// on the same connection.
    pub async fn try_adjust_stock(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        delta: i64,
    ) -> DbResult<Option<i64>> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let new_stock = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE products
            SET stock_actual = stock_actual + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_actual + ?2 >= 0
            RETURNING stock_actual
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .fetch_optional(exec)
        .await?;

        Ok(new_stock)
    }

    /// Reads the current stock level.
    pub async fn stock_of(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<i64>> {
        let stock = sqlx::query_scalar::<_, i64>("SELECT stock_actual FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(exec)
            .await?;

        Ok(stock)
    }

    /// Overwrites a product's cost and sale price.
    ///
    /// Purchase registration is the only caller; catalog edits never touch
    /// prices.
    ///
    /// ## Returns
    /// * `Ok(true)` - product repriced
    /// * `Ok(false)` - product doesn't exist
    pub async fn reprice(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        cost_cents: i64,
        price_cents: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, cost = %cost_cents, price = %price_cents, "Repricing product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET cost_cents = ?2,
                price_cents = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost_cents)
        .bind(price_cents)
        .bind(now)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self, exec: impl SqliteExecutor<'_>) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = 'active'")
                .fetch_one(exec)
                .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
