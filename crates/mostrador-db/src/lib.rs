//! # mostrador-db: Database Layer for Mostrador
//!
//! SQLite storage for the Mostrador inventory ledger, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! mostrador-ledger (transaction processors)
//!       │
//!       ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                 mostrador-db (THIS CRATE)               │
//! │                                                         │
//! │   Database        Repositories          Migrations      │
//! │   (pool.rs)       (repository/*)        (embedded)      │
//! │                                                         │
//! │   SqlitePool      ProductRepository     001_initial.sql │
//! │   Transactions    SaleRepository        ...             │
//! │                   PurchaseRepository                    │
//! │                   CashRepository                        │
//! │                   ClientRepository                      │
//! └─────────────────────────────────────────────────────────┘
//!       │
//!       ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! Repository methods take an `impl SqliteExecutor` so the same query runs
//! against the pool directly or on a transaction connection; every
//! multi-entity unit of work in mostrador-ledger passes its own transaction
//! through.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cash::CashRepository;
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::SaleRepository;
