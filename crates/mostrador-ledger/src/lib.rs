//! # mostrador-ledger: Transaction Processors for Mostrador
//!
//! The units of work that keep product stock, sale/purchase records and
//! cash-register balances mutually consistent.
//!
//! ## Components
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SaleProcessor                 PurchaseProcessor             │
//! │  create / void                 create / cancel               │
//! │       │      │                      │                        │
//! │       ▼      ▼                      ▼                        │
//! │  StockLedger · InvoiceSequencer · CashSessionManager         │
//! │  apply(±qty)   next()             open / post / close        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation runs as one atomic unit of work: a single database
//! transaction that commits whole or rolls back whole. Stock checks and
//! invoice derivation happen inside that transaction; UNIQUE and CHECK
//! constraints in the schema are the last-resort backstops under
//! concurrent callers.
//!
//! Processors take an explicit [`mostrador_db::Database`] handle at
//! construction, so tests inject an in-memory store:
//!
//! ```rust,ignore
//! let db = Database::new(DbConfig::in_memory()).await?;
//! let cash = CashSessionManager::new(db.clone());
//! let sales = SaleProcessor::new(db.clone());
//!
//! let session = cash.open("emp-1", Money::from_cents(5_000)).await?;
//! let receipt = sales.create(&request).await?;
//! ```

pub mod cash_session;
pub mod error;
pub mod invoice;
pub mod purchase;
pub mod sale;
pub mod stock;

pub use cash_session::CashSessionManager;
pub use error::{LedgerError, LedgerResult};
pub use invoice::{InvoiceSequencer, INVOICE_NUMBER_WIDTH, INVOICE_PREFIX};
pub use purchase::PurchaseProcessor;
pub use sale::SaleProcessor;
pub use stock::StockLedger;
