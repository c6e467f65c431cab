//! # mostrador-core: Pure Business Logic for Mostrador
//!
//! This crate is the heart of the Mostrador inventory ledger. It contains
//! the domain types and business rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 GUI / service collaborators                 │
//! │      (build SaleRequest / PurchaseRequest objects)          │
//! └──────────────────────────────┬──────────────────────────────┘
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │                      mostrador-ledger                       │
//! │   SaleProcessor · PurchaseProcessor · CashSessionManager    │
//! └──────────────────────────────┬──────────────────────────────┘
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │               ★ mostrador-core (THIS CRATE) ★               │
//! │                                                             │
//! │     types · money · validation · error                      │
//! │                                                             │
//! │     NO I/O • NO DATABASE • PURE FUNCTIONS                   │
//! └──────────────────────────────┬──────────────────────────────┘
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │               mostrador-db (SQLite storage)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output, no side effects
//! 2. **Integer money**: all monetary values are cents (i64), never floats
//! 3. **Basis-point rates**: discounts and margins are u32 basis points
//! 4. **Explicit errors**: typed validation errors, never strings or panics

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use money::{Money, Rate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on one sale or purchase line.
///
/// Guards against fat-finger entry (1000 typed instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum number of lines on a single sale or purchase.
pub const MAX_DOCUMENT_LINES: usize = 100;
