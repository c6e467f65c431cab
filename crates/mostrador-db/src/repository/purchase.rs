//! # Purchase Repository
//!
//! Database operations for supplier purchases and purchase lines.
//!
//! Mirrors the sale repository: header + lines inserted inside the
//! processor's transaction, cancellation through a guarded UPDATE so a
//! concurrent double-cancel matches zero rows.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::{Purchase, PurchaseLine};

const PURCHASE_COLUMNS: &str = "id, invoice_number, supplier_id, employee_id, total_cents, \
     status, created_at, cancelled_at";

const LINE_COLUMNS: &str =
    "id, purchase_id, line_no, product_id, quantity, unit_cost_cents, subtotal_cents";

/// Repository for purchase database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseRepository;

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new() -> Self {
        PurchaseRepository
    }

    /// Gets a purchase by ID.
    pub async fn get_by_id(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(purchase)
    }

    /// Inserts a purchase header.
    pub async fn insert_purchase(
        &self,
        exec: impl SqliteExecutor<'_>,
        purchase: &Purchase,
    ) -> DbResult<()> {
        debug!(id = %purchase.id, supplier = %purchase.supplier_id, "Inserting purchase");

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, invoice_number, supplier_id, employee_id,
                total_cents, status, created_at, cancelled_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.invoice_number)
        .bind(&purchase.supplier_id)
        .bind(&purchase.employee_id)
        .bind(purchase.total_cents)
        .bind(purchase.status)
        .bind(purchase.created_at)
        .bind(purchase.cancelled_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Inserts one purchase line.
    pub async fn insert_line(
        &self,
        exec: impl SqliteExecutor<'_>,
        line: &PurchaseLine,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO purchase_lines (
                id, purchase_id, line_no, product_id,
                quantity, unit_cost_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.purchase_id)
        .bind(line.line_no)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_cost_cents)
        .bind(line.subtotal_cents)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Gets the lines of a purchase in line order.
    pub async fn get_lines(
        &self,
        exec: impl SqliteExecutor<'_>,
        purchase_id: &str,
    ) -> DbResult<Vec<PurchaseLine>> {
        let lines = sqlx::query_as::<_, PurchaseLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM purchase_lines WHERE purchase_id = ?1 ORDER BY line_no"
        ))
        .bind(purchase_id)
        .fetch_all(exec)
        .await?;

        Ok(lines)
    }

    /// Transitions a completed purchase to cancelled.
    ///
    /// ## Returns
    /// * `Ok(true)` - purchase cancelled
    /// * `Ok(false)` - purchase missing or already cancelled
    pub async fn mark_cancelled(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        cancelled_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, "Cancelling purchase");

        let result = sqlx::query(
            r#"
            UPDATE purchases
            SET status = 'cancelled', cancelled_at = ?2
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(id)
        .bind(cancelled_at)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper to generate a new purchase ID.
pub fn generate_purchase_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new purchase line ID.
pub fn generate_purchase_line_id() -> String {
    Uuid::new_v4().to_string()
}
