//! # Sale Transaction Processor
//!
//! Orchestrates the stock ledger, invoice sequencer and cash session
//! manager to register or void a sale.
//!
//! ## Registration Flow (one transaction)
//! ```text
//! validate request            ── ValidationError, nothing written
//!      │
//! check session open + owned  ── SessionNotOpen
//!      │
//! consume stock per line      ── InsufficientStock rolls back all lines
//!      │
//! next invoice number         ── UNIQUE backstop → DuplicateInvoice
//!      │
//! update client aggregate     ── total_compras, fecha_primera_compra
//!      │
//! insert sale + lines
//!      │
//! post income movement, bump total_ventas
//!      │
//! COMMIT                      ── any failure above rolls back everything
//! ```
//!
//! Voiding replays the exact inverse from the sale's immutable lines and
//! posts a compensating expense movement.

use chrono::Utc;
use tracing::info;

use crate::cash_session::CashSessionManager;
use crate::error::{LedgerError, LedgerResult};
use crate::invoice::InvoiceSequencer;
use crate::stock::StockLedger;
use mostrador_core::validation::validate_sale_request;
use mostrador_core::{MovementKind, Sale, SaleLine, SaleRequest, SaleStatus, SaleWithLines};
use mostrador_db::repository::sale::{generate_sale_id, generate_sale_line_id};
use mostrador_db::Database;

/// Registers and voids sales against an injected database handle.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    db: Database,
    stock: StockLedger,
    sequencer: InvoiceSequencer,
}

impl SaleProcessor {
    /// Creates a processor bound to the given database.
    pub fn new(db: Database) -> Self {
        SaleProcessor {
            db,
            stock: StockLedger::new(),
            sequencer: InvoiceSequencer::new(),
        }
    }

    /// Registers a sale.
    ///
    /// ## Errors
    /// * `ValidationError` - empty lines, non-positive quantity/price
    /// * `SessionNotFound` / `SessionNotOpen` - bad cash session
    /// * `InsufficientStock` - a line would overdraw its product
    /// * `DuplicateInvoice` - uniqueness backstop hit; retry once
    /// * `ClientNotFound` - attached client does not exist
    pub async fn create(&self, req: &SaleRequest) -> LedgerResult<SaleWithLines> {
        validate_sale_request(req)?;

        let mut tx = self.db.begin().await?;

        // The session must be open and belong to the acting employee.
        let session = self
            .db
            .cash()
            .get_session(&mut *tx, &req.cash_session_id)
            .await?
            .ok_or_else(|| LedgerError::SessionNotFound(req.cash_session_id.clone()))?;
        if !session.is_open() || session.employee_id != req.employee_id {
            return Err(LedgerError::SessionNotOpen(session.id));
        }

        // Consume stock line by line; the first failure aborts the whole
        // unit of work, so earlier lines leave no trace.
        for line in &req.lines {
            self.stock
                .apply(&mut tx, &line.product_id, -line.quantity)
                .await?;
        }

        let invoice_number = self.sequencer.next(&mut tx).await?;

        let now = Utc::now();
        let subtotal = req.subtotal();
        let discount = subtotal.percentage_of(req.discount_rate());
        let total = subtotal - discount;

        // Client aggregate first: a zero-row update means the attached
        // client does not exist, and nothing else has to be unwound.
        if let Some(client) = &req.client {
            let updated = self
                .db
                .clients()
                .record_sale(&mut *tx, &client.id, total.cents(), now)
                .await?;
            if !updated {
                return Err(LedgerError::ClientNotFound(client.id.clone()));
            }
        }

        let sale = Sale {
            id: generate_sale_id(),
            invoice_number: invoice_number.clone(),
            client_id: req.client.as_ref().map(|c| c.id.clone()),
            employee_id: req.employee_id.clone(),
            cash_session_id: req.cash_session_id.clone(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            total_cents: total.cents(),
            payment_method: req.payment_method,
            status: SaleStatus::Completed,
            created_at: now,
            voided_at: None,
        };

        let sales = self.db.sales();
        if let Err(err) = sales.insert_sale(&mut *tx, &sale).await {
            if err.is_unique_violation_on("sales.invoice_number") {
                return Err(LedgerError::DuplicateInvoice(invoice_number));
            }
            return Err(err.into());
        }

        let mut lines = Vec::with_capacity(req.lines.len());
        for (idx, line_req) in req.lines.iter().enumerate() {
            let line = SaleLine {
                id: generate_sale_line_id(),
                sale_id: sale.id.clone(),
                line_no: (idx + 1) as i64,
                product_id: line_req.product_id.clone(),
                quantity: line_req.quantity,
                unit_price_cents: line_req.unit_price_cents,
                subtotal_cents: line_req.subtotal().cents(),
            };
            sales.insert_line(&mut *tx, &line).await?;
            lines.push(line);
        }

        // Cash side: income movement plus the session's net-sales counter.
        // A fully discounted sale puts nothing in the drawer and posts no
        // movement.
        if total.is_positive() {
            CashSessionManager::post_movement_on(
                &mut tx,
                &session.id,
                MovementKind::Income,
                total,
                &format!("sale {invoice_number}"),
                &req.employee_id,
            )
            .await?;
        }
        self.db
            .cash()
            .add_ventas(&mut *tx, &session.id, total.cents())
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            invoice = %invoice_number,
            total = %total,
            lines = lines.len(),
            "Sale registered"
        );

        Ok(SaleWithLines { sale, lines })
    }

    /// Voids a sale, restoring stock and compensating the cash ledger.
    ///
    /// The stock restore replays the exact original line quantities. The
    /// expense movement posts to the sale's session even if that session
    /// has since closed.
    ///
    /// ## Errors
    /// * `SaleNotFound` - no such sale
    /// * `AlreadyVoided` - idempotency guard; no stock or cash mutation
    pub async fn void(&self, sale_id: &str, employee_id: &str) -> LedgerResult<Sale> {
        let mut tx = self.db.begin().await?;
        let sales = self.db.sales();

        let sale = sales
            .get_by_id(&mut *tx, sale_id)
            .await?
            .ok_or_else(|| LedgerError::SaleNotFound(sale_id.to_string()))?;

        if sale.status == SaleStatus::Voided {
            return Err(LedgerError::AlreadyVoided(sale_id.to_string()));
        }

        let now = Utc::now();

        // Guarded transition: a concurrent void matches zero rows here.
        let voided = sales.mark_voided(&mut *tx, sale_id, now).await?;
        if !voided {
            return Err(LedgerError::AlreadyVoided(sale_id.to_string()));
        }

        // Restore stock from the immutable original lines.
        let lines = sales.get_lines(&mut *tx, sale_id).await?;
        for line in &lines {
            self.stock
                .apply(&mut tx, &line.product_id, line.quantity)
                .await?;
        }

        if sale.total_cents > 0 {
            CashSessionManager::post_movement_on(
                &mut tx,
                &sale.cash_session_id,
                MovementKind::Expense,
                sale.total(),
                &format!("void {}", sale.invoice_number),
                employee_id,
            )
            .await?;
        }
        self.db
            .cash()
            .add_ventas(&mut *tx, &sale.cash_session_id, -sale.total_cents)
            .await?;

        if let Some(client_id) = &sale.client_id {
            self.db
                .clients()
                .revert_sale(&mut *tx, client_id, sale.total_cents)
                .await?;
        }

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            invoice = %sale.invoice_number,
            total = %sale.total(),
            "Sale voided"
        );

        Ok(Sale {
            status: SaleStatus::Voided,
            voided_at: Some(now),
            ..sale
        })
    }

    /// Fetches a sale with its lines.
    pub async fn get(&self, sale_id: &str) -> LedgerResult<SaleWithLines> {
        let sales = self.db.sales();

        let sale = sales
            .get_by_id(self.db.pool(), sale_id)
            .await?
            .ok_or_else(|| LedgerError::SaleNotFound(sale_id.to_string()))?;
        let lines = sales.get_lines(self.db.pool(), sale_id).await?;

        Ok(SaleWithLines { sale, lines })
    }
}
