//! # Ledger Error Types
//!
//! The full error taxonomy of the transaction processors.
//!
//! ## Error Flow
//! ```text
//! ValidationError (mostrador-core)  ── rejected before any store access
//! DbError (mostrador-db)            ── constraint and query failures
//!          │
//!          ▼
//! LedgerError (this module)         ── domain failures + both of the above
//!          │
//!          ▼
//! GUI layer renders a precise message (entity id, quantities)
//! ```
//!
//! Every processor operation is all-or-nothing: any of these errors raised
//! after the transaction opened causes a full rollback, never a partial
//! write.

use thiserror::Error;

use mostrador_core::ValidationError;
use mostrador_db::DbError;

/// Transaction processor errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Product referenced by a line does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Not enough stock to consume the requested quantity.
    ///
    /// Raised mid-transaction; the whole unit of work rolls back, so
    /// earlier lines of the same request leave no trace.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Sale not found.
    #[error("sale not found: {0}")]
    SaleNotFound(String),

    /// Purchase not found.
    #[error("purchase not found: {0}")]
    PurchaseNotFound(String),

    /// Cash session not found.
    #[error("cash session not found: {0}")]
    SessionNotFound(String),

    /// Client referenced by a sale does not exist.
    #[error("client not found: {0}")]
    ClientNotFound(String),

    /// Idempotency guard: the sale was already voided.
    #[error("sale {0} is already voided")]
    AlreadyVoided(String),

    /// Idempotency guard: the purchase was already cancelled.
    #[error("purchase {0} is already cancelled")]
    AlreadyCancelled(String),

    /// The cash session is closed, or does not belong to the acting
    /// employee.
    #[error("cash session {0} is not open for this employee")]
    SessionNotOpen(String),

    /// The employee already has an open cash session.
    #[error("employee {employee_id} already has open cash session {session_id}")]
    SessionAlreadyOpen {
        employee_id: String,
        session_id: String,
    },

    /// The uniqueness backstop on invoice numbers was hit despite
    /// sequencing. The caller may retry once with a fresh number.
    #[error("duplicate invoice number: {0}")]
    DuplicateInvoice(String),

    /// A stored invoice number did not match the expected format.
    #[error("invoice number '{0}' has an unrecognized format")]
    MalformedInvoice(String),

    /// Request validation failure; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage-level failure.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Raw sqlx errors raised at the transaction boundary (e.g. `commit`) map
/// through the same classification the repositories use, surfacing as a
/// `Storage` failure.
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(DbError::from(err))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
