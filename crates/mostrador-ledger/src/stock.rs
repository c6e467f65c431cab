//! # Stock Ledger
//!
//! Owns the invariant `stock_actual >= 0` and the atomic application of
//! signed quantity deltas.
//!
//! The ledger keeps no history of its own: a reversal is simply
//! `apply(product_id, -delta)` with the delta recomputed from the original
//! document lines, which are immutable once committed.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use mostrador_db::ProductRepository;

/// Applies stock deltas inside a caller-managed transaction.
///
/// `apply` always runs on the caller's transaction connection so that a
/// later failure in the same unit of work rolls the quantity change back
/// with everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockLedger;

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new() -> Self {
        StockLedger
    }

    /// Applies a signed delta to a product's stock.
    ///
    /// Positive = replenish, negative = consume. The check-and-apply is a
    /// single guarded UPDATE, so two concurrent consumers can never both
    /// observe enough stock for a quantity only one can satisfy.
    ///
    /// ## Returns
    /// * `Ok(new_stock)` - delta applied
    /// * `Err(InsufficientStock)` - delta would take stock negative;
    ///   nothing was applied
    /// * `Err(ProductNotFound)` - no such product
    pub async fn apply(
        &self,
        conn: &mut SqliteConnection,
        product_id: &str,
        delta: i64,
    ) -> LedgerResult<i64> {
        let products = ProductRepository::new();

        match products.try_adjust_stock(&mut *conn, product_id, delta).await? {
            Some(new_stock) => {
                debug!(product_id = %product_id, delta = %delta, new_stock = %new_stock, "Stock adjusted");
                Ok(new_stock)
            }
            None => {
                // The guard matched no row: missing product or overdraw.
                // Re-read on the same connection to tell which.
                match products.stock_of(&mut *conn, product_id).await? {
                    Some(available) => Err(LedgerError::InsufficientStock {
                        product_id: product_id.to_string(),
                        available,
                        requested: -delta,
                    }),
                    None => Err(LedgerError::ProductNotFound(product_id.to_string())),
                }
            }
        }
    }
}
