//! # Domain Types
//!
//! Core domain types for the Mostrador inventory ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product          Sale ── SaleLine          Purchase ── PurchaseLine│
//! │  stock_actual     invoice_number            supplier_id             │
//! │  cost/price       subtotal/discount/total   total                   │
//! │                                                                     │
//! │  CashSession ── CashMovement                Client                  │
//! │  open → closed    income/expense            total_compras           │
//! │  aggregates       append-only               fecha_primera_compra    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key where one exists: (product code, invoice number)
//!
//! Monetary fields are raw cents (`*_cents`, i64) so rows map directly to
//! storage; use [`Money`] accessors for arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Rate};

// =============================================================================
// Product
// =============================================================================

/// Lifecycle state of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
    Discontinued,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

/// A catalog product.
///
/// `stock_actual` is mutated only through the stock ledger; `cost_cents`
/// and `price_cents` are overwritten only by purchase registration, which
/// recomputes the price from `margin_bps`. Catalog edits never touch
/// quantity or prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code - unique, human-readable.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Last purchase cost in cents.
    pub cost_cents: i64,

    /// Current sale price in cents.
    pub price_cents: i64,

    /// Profit margin in basis points; price = cost × (1 + margin).
    pub margin_bps: u32,

    /// Units on hand. Never negative.
    pub stock_actual: i64,

    /// Reorder threshold.
    pub stock_minimo: i64,

    /// Lifecycle state.
    pub status: ProductStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the profit margin.
    #[inline]
    pub fn margin(&self) -> Rate {
        Rate::from_bps(self.margin_bps)
    }

    /// Whether stock has fallen to or below the reorder threshold.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.stock_actual <= self.stock_minimo
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client with its purchase aggregate.
///
/// `total_compras_cents` is a running sum maintained by sale
/// registration/void; `fecha_primera_compra` is set exactly once, on the
/// first completed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub name: String,

    /// Standing discount applied to every sale, in basis points.
    pub discount_bps: u32,

    /// Lifetime purchases in cents. Floored at zero when sales are voided.
    pub total_compras_cents: i64,

    /// Timestamp of the first completed sale, if any.
    pub fecha_primera_compra: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Returns the standing discount rate.
    #[inline]
    pub fn discount(&self) -> Rate {
        Rate::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The status of a sale.
///
/// Sales are created already completed (there is no draft stage) and are
/// voided in place, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
    Voided,
}

/// How the client paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// A completed (or voided) sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// Unique, monotonically increasing invoice number (e.g. `FACT-00042`).
    pub invoice_number: String,

    pub client_id: Option<String>,
    pub employee_id: String,

    /// Cash session the sale was registered under.
    pub cash_session_id: String,

    pub subtotal_cents: i64,
    pub discount_cents: i64,

    /// total = subtotal − discount.
    pub total_cents: i64,

    pub payment_method: PaymentMethod,
    pub status: SaleStatus,

    pub created_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line on a sale. Immutable once the sale is committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,

    /// 1-based position within the sale.
    pub line_no: i64,

    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,

    /// subtotal = quantity × unit price.
    pub subtotal_cents: i64,
}

/// A sale together with its ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithLines {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Purchase
// =============================================================================

/// The status of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Completed,
    Cancelled,
}

/// A supplier purchase (goods received).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,

    /// Supplier's paper invoice number, if any. Not sequenced locally.
    pub invoice_number: Option<String>,

    pub supplier_id: String,
    pub employee_id: String,

    /// total = Σ line subtotals.
    pub total_cents: i64,

    pub status: PurchaseStatus,

    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// A line on a purchase. Immutable once the purchase is committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLine {
    pub id: String,
    pub purchase_id: String,

    /// 1-based position within the purchase.
    pub line_no: i64,

    pub product_id: String,
    pub quantity: i64,
    pub unit_cost_cents: i64,

    /// subtotal = quantity × unit cost.
    pub subtotal_cents: i64,
}

/// A purchase together with its ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseWithLines {
    pub purchase: Purchase,
    pub lines: Vec<PurchaseLine>,
}

// =============================================================================
// Cash Session
// =============================================================================

/// Cash-register session state. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    Open,
    Closed,
}

/// Kind of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Income,
    Expense,
}

/// A cash-register session.
///
/// The aggregates track activity after opening: `total_ingresos_cents` /
/// `total_egresos_cents` sum posted movements (the opening float is a
/// ledger entry but not an ingreso), `total_ventas_cents` tracks net sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashSession {
    pub id: String,
    pub employee_id: String,

    pub status: CashSessionStatus,

    /// Opening float counted into the drawer.
    pub opening_cents: i64,

    /// Counted drawer amount at close.
    pub closing_cents: Option<i64>,

    pub total_ventas_cents: i64,
    pub total_ingresos_cents: i64,
    pub total_egresos_cents: i64,

    /// closing − (opening + ingresos − egresos); sign preserved
    /// (positive = over, negative = short). Set at close.
    pub diferencia_cents: Option<i64>,

    pub notes: Option<String>,

    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashSession {
    /// The drawer amount the movements ledger accounts for:
    /// `opening + ingresos − egresos`.
    #[inline]
    pub fn expected(&self) -> Money {
        Money::from_cents(
            self.opening_cents + self.total_ingresos_cents - self.total_egresos_cents,
        )
    }

    /// Whether the session accepts new sales.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == CashSessionStatus::Open
    }
}

/// An entry in a session's append-only movement ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: String,
    pub session_id: String,
    pub kind: MovementKind,
    pub amount_cents: i64,
    pub concept: String,
    pub employee_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of closing a cash session: the closed session plus the
/// reconciliation figures surfaced to the cashier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashClose {
    pub session: CashSession,
    pub expected_cents: i64,
    pub diferencia_cents: i64,
}

/// Session overview for close-of-day reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: CashSession,
    pub num_ventas: i64,
}

// =============================================================================
// Requests
// =============================================================================

/// Client reference carried on a sale request.
///
/// The standing discount travels with the request so sale registration
/// stays a pure computation over its inputs (no client lookup mid-sale).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: String,
    pub discount: Rate,
}

/// One requested sale line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleLineRequest {
    /// Line subtotal = quantity × unit price.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// A sale as assembled by the GUI layer, ready for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub client: Option<ClientRef>,
    pub employee_id: String,
    pub cash_session_id: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<SaleLineRequest>,
}

impl SaleRequest {
    /// Sum of line subtotals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(SaleLineRequest::subtotal).sum()
    }

    /// Standing discount of the attached client, if any.
    pub fn discount_rate(&self) -> Rate {
        self.client.as_ref().map(|c| c.discount).unwrap_or_default()
    }
}

/// One requested purchase line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLineRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_cost_cents: i64,
}

impl PurchaseLineRequest {
    /// Line subtotal = quantity × unit cost.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_cost_cents).multiply_quantity(self.quantity)
    }
}

/// A purchase as assembled by the GUI layer, ready for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub invoice_number: Option<String>,
    pub supplier_id: String,
    pub employee_id: String,
    pub lines: Vec<PurchaseLineRequest>,
}

impl PurchaseRequest {
    /// Sum of line subtotals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(PurchaseLineRequest::subtotal).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
