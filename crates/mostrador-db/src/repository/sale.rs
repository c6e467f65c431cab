//! # Sale Repository
//!
//! Database operations for sales and sale lines.
//!
//! ## Sale Lifecycle
//! ```text
//! 1. REGISTER (one transaction, driven by the sale processor)
//!    └── insert_sale() + insert_line() × N → Sale { status: completed }
//!
//! 2. (OPTIONAL) VOID
//!    └── mark_voided() → Sale { status: voided }
//!        guarded UPDATE: only a completed sale transitions, so a
//!        concurrent double-void matches zero rows and is rejected
//! ```
//! Sales are never deleted; lines are immutable once committed.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::{Sale, SaleLine};

const SALE_COLUMNS: &str = "id, invoice_number, client_id, employee_id, cash_session_id, \
     subtotal_cents, discount_cents, total_cents, payment_method, status, \
     created_at, voided_at";

const LINE_COLUMNS: &str =
    "id, sale_id, line_no, product_id, quantity, unit_price_cents, subtotal_cents";

/// Repository for sale database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleRepository;

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new() -> Self {
        SaleRepository
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(sale)
    }

    /// Inserts a sale header.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - invoice number already issued
    pub async fn insert_sale(&self, exec: impl SqliteExecutor<'_>, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, invoice = %sale.invoice_number, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, invoice_number, client_id, employee_id, cash_session_id,
                subtotal_cents, discount_cents, total_cents,
                payment_method, status, created_at, voided_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.invoice_number)
        .bind(&sale.client_id)
        .bind(&sale.employee_id)
        .bind(&sale.cash_session_id)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(sale.status)
        .bind(sale.created_at)
        .bind(sale.voided_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Inserts one sale line.
    pub async fn insert_line(&self, exec: impl SqliteExecutor<'_>, line: &SaleLine) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_lines (
                id, sale_id, line_no, product_id,
                quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(line.line_no)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Gets the lines of a sale in line order.
    pub async fn get_lines(
        &self,
        exec: impl SqliteExecutor<'_>,
        sale_id: &str,
    ) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1 ORDER BY line_no"
        ))
        .bind(sale_id)
        .fetch_all(exec)
        .await?;

        Ok(lines)
    }

    /// Returns the most recently issued invoice number, if any sale exists.
    ///
    /// "Most recent" is insertion order (rowid), not lexicographic order,
    /// so numbering stays monotonic even past the zero-padding width.
    pub async fn last_invoice_number(
        &self,
        exec: impl SqliteExecutor<'_>,
    ) -> DbResult<Option<String>> {
        let number = sqlx::query_scalar::<_, String>(
            "SELECT invoice_number FROM sales ORDER BY rowid DESC LIMIT 1",
        )
        .fetch_optional(exec)
        .await?;

        Ok(number)
    }

    /// Transitions a completed sale to voided.
    ///
    /// ## Returns
    /// * `Ok(true)` - sale voided
    /// * `Ok(false)` - sale missing or already voided
    pub async fn mark_voided(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        voided_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, "Voiding sale");

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET status = 'voided', voided_at = ?2
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(id)
        .bind(voided_at)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the sales registered under a cash session, oldest first.
    pub async fn list_for_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        session_id: &str,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE cash_session_id = ?1 ORDER BY rowid"
        ))
        .bind(session_id)
        .fetch_all(exec)
        .await?;

        Ok(sales)
    }

    /// Counts completed sales under a cash session.
    pub async fn count_completed_for_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        session_id: &str,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE cash_session_id = ?1 AND status = 'completed'",
        )
        .bind(session_id)
        .fetch_one(exec)
        .await?;

        Ok(count)
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new sale line ID.
pub fn generate_sale_line_id() -> String {
    Uuid::new_v4().to_string()
}
