//! # Repository Module
//!
//! Database repository implementations for Mostrador.
//!
//! ## Repository Pattern
//! ```text
//! Ledger processor
//!      │
//!      │  db.products().get_by_id(&mut *tx, id)
//!      ▼
//! ProductRepository ── parameterized SQL ──► SQLite
//! ```
//!
//! Repositories are stateless: every method takes an `impl SqliteExecutor`,
//! so the same query runs against the pool for standalone reads or against
//! `&mut *tx` inside a unit of work. Multi-statement operations take
//! `&mut SqliteConnection` instead, since a generic executor is consumed by
//! its first query.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog reads, stock delta, reprice
//! - [`client::ClientRepository`] - client aggregate updates
//! - [`sale::SaleRepository`] - sale + line inserts, void transition
//! - [`purchase::PurchaseRepository`] - purchase + line inserts, cancel
//! - [`cash::CashRepository`] - sessions and the movement ledger

pub mod cash;
pub mod client;
pub mod product;
pub mod purchase;
pub mod sale;
