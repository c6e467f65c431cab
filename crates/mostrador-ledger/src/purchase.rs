//! # Purchase Transaction Processor
//!
//! Registers and cancels supplier purchases.
//!
//! Same shape as sale registration minus the invoice and cash steps: stock
//! is replenished per line, and each purchased product's cost is
//! overwritten with the line's unit cost while its sale price is recomputed
//! from the product's stored margin. Purchasing is the only path that
//! changes prices; catalog edits never touch price or stock. Purchases do
//! not touch the cash ledger.

use chrono::Utc;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::stock::StockLedger;
use mostrador_core::validation::validate_purchase_request;
use mostrador_core::{
    Money, Purchase, PurchaseLine, PurchaseRequest, PurchaseStatus, PurchaseWithLines,
};
use mostrador_db::repository::purchase::{generate_purchase_id, generate_purchase_line_id};
use mostrador_db::Database;

/// Registers and cancels purchases against an injected database handle.
#[derive(Debug, Clone)]
pub struct PurchaseProcessor {
    db: Database,
    stock: StockLedger,
}

impl PurchaseProcessor {
    /// Creates a processor bound to the given database.
    pub fn new(db: Database) -> Self {
        PurchaseProcessor {
            db,
            stock: StockLedger::new(),
        }
    }

    /// Registers a purchase.
    ///
    /// Per line, in one transaction: replenish stock, overwrite the
    /// product's cost with the unit cost, recompute its sale price from the
    /// stored margin.
    ///
    /// ## Errors
    /// * `ValidationError` - empty lines, non-positive quantity/cost
    /// * `ProductNotFound` - a line references a missing product
    pub async fn create(&self, req: &PurchaseRequest) -> LedgerResult<PurchaseWithLines> {
        validate_purchase_request(req)?;

        let mut tx = self.db.begin().await?;
        let products = self.db.products();

        for line in &req.lines {
            self.stock
                .apply(&mut tx, &line.product_id, line.quantity)
                .await?;

            let product = products
                .get_by_id(&mut *tx, &line.product_id)
                .await?
                .ok_or_else(|| LedgerError::ProductNotFound(line.product_id.clone()))?;

            let cost = Money::from_cents(line.unit_cost_cents);
            let price = cost.with_margin(product.margin());
            products
                .reprice(&mut *tx, &line.product_id, cost.cents(), price.cents())
                .await?;
        }

        let now = Utc::now();
        let total = req.total();

        let purchase = Purchase {
            id: generate_purchase_id(),
            invoice_number: req.invoice_number.clone(),
            supplier_id: req.supplier_id.clone(),
            employee_id: req.employee_id.clone(),
            total_cents: total.cents(),
            status: PurchaseStatus::Completed,
            created_at: now,
            cancelled_at: None,
        };

        let purchases = self.db.purchases();
        purchases.insert_purchase(&mut *tx, &purchase).await?;

        let mut lines = Vec::with_capacity(req.lines.len());
        for (idx, line_req) in req.lines.iter().enumerate() {
            let line = PurchaseLine {
                id: generate_purchase_line_id(),
                purchase_id: purchase.id.clone(),
                line_no: (idx + 1) as i64,
                product_id: line_req.product_id.clone(),
                quantity: line_req.quantity,
                unit_cost_cents: line_req.unit_cost_cents,
                subtotal_cents: line_req.subtotal().cents(),
            };
            purchases.insert_line(&mut *tx, &line).await?;
            lines.push(line);
        }

        tx.commit().await?;

        info!(
            purchase_id = %purchase.id,
            supplier_id = %purchase.supplier_id,
            total = %total,
            lines = lines.len(),
            "Purchase registered"
        );

        Ok(PurchaseWithLines { purchase, lines })
    }

    /// Cancels a purchase, removing the replenished stock.
    ///
    /// If sales consumed the stock in the interim, the removal surfaces
    /// `InsufficientStock` and nothing is cancelled - never silently
    /// clamped. Cost/price overwrites from the original registration are
    /// not reverted.
    ///
    /// ## Errors
    /// * `PurchaseNotFound` - no such purchase
    /// * `AlreadyCancelled` - idempotency guard; no stock mutation
    /// * `InsufficientStock` - replenished stock already consumed
    pub async fn cancel(&self, purchase_id: &str) -> LedgerResult<Purchase> {
        let mut tx = self.db.begin().await?;
        let purchases = self.db.purchases();

        let purchase = purchases
            .get_by_id(&mut *tx, purchase_id)
            .await?
            .ok_or_else(|| LedgerError::PurchaseNotFound(purchase_id.to_string()))?;

        if purchase.status == PurchaseStatus::Cancelled {
            return Err(LedgerError::AlreadyCancelled(purchase_id.to_string()));
        }

        let now = Utc::now();

        // Guarded transition: a concurrent cancel matches zero rows here.
        let cancelled = purchases.mark_cancelled(&mut *tx, purchase_id, now).await?;
        if !cancelled {
            return Err(LedgerError::AlreadyCancelled(purchase_id.to_string()));
        }

        let lines = purchases.get_lines(&mut *tx, purchase_id).await?;
        for line in &lines {
            self.stock
                .apply(&mut tx, &line.product_id, -line.quantity)
                .await?;
        }

        tx.commit().await?;

        info!(purchase_id = %purchase_id, "Purchase cancelled");

        Ok(Purchase {
            status: PurchaseStatus::Cancelled,
            cancelled_at: Some(now),
            ..purchase
        })
    }

    /// Fetches a purchase with its lines.
    pub async fn get(&self, purchase_id: &str) -> LedgerResult<PurchaseWithLines> {
        let purchases = self.db.purchases();

        let purchase = purchases
            .get_by_id(self.db.pool(), purchase_id)
            .await?
            .ok_or_else(|| LedgerError::PurchaseNotFound(purchase_id.to_string()))?;
        let lines = purchases.get_lines(self.db.pool(), purchase_id).await?;

        Ok(PurchaseWithLines { purchase, lines })
    }
}
