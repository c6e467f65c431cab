//! # Invoice Sequencer
//!
//! Derives the next invoice number from the last issued one.
//!
//! ```text
//! last issued: FACT-00041
//!       │  parse numeric suffix, increment
//!       ▼
//! next:        FACT-00042
//! ```
//!
//! `next()` runs inside the same transaction as the sale insert; the
//! UNIQUE constraint on `sales.invoice_number` is the correctness backstop
//! if two units of work race to the same number.

use sqlx::SqliteConnection;

use crate::error::{LedgerError, LedgerResult};
use mostrador_db::SaleRepository;

/// Prefix carried by every invoice number.
pub const INVOICE_PREFIX: &str = "FACT-";

/// Minimum digit width of the numeric suffix; longer sequences grow
/// naturally past it.
pub const INVOICE_NUMBER_WIDTH: usize = 5;

/// Formats a sequence value as an invoice number, e.g. `FACT-00042`.
pub fn format_invoice_number(seq: u64) -> String {
    format!("{INVOICE_PREFIX}{seq:0width$}", width = INVOICE_NUMBER_WIDTH)
}

/// Parses the numeric suffix of an invoice number, if well-formed.
pub fn parse_invoice_suffix(number: &str) -> Option<u64> {
    number.strip_prefix(INVOICE_PREFIX)?.parse().ok()
}

/// Issues invoice numbers inside a caller-managed transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceSequencer;

impl InvoiceSequencer {
    /// Creates a new InvoiceSequencer.
    pub fn new() -> Self {
        InvoiceSequencer
    }

    /// Derives the next invoice number.
    ///
    /// Reads the most recently issued number (insertion order), increments
    /// its suffix; starts at 1 when no sale exists yet.
    pub async fn next(&self, conn: &mut SqliteConnection) -> LedgerResult<String> {
        let last = SaleRepository::new().last_invoice_number(&mut *conn).await?;

        let next_seq = match last {
            None => 1,
            Some(number) => {
                let seq = parse_invoice_suffix(&number)
                    .ok_or_else(|| LedgerError::MalformedInvoice(number.clone()))?;
                seq + 1
            }
        };

        Ok(format_invoice_number(next_seq))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_invoice_number(1), "FACT-00001");
        assert_eq!(format_invoice_number(42), "FACT-00042");
        assert_eq!(format_invoice_number(99_999), "FACT-99999");
        // Sequences outgrow the padding without truncation
        assert_eq!(format_invoice_number(100_000), "FACT-100000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_invoice_suffix("FACT-00001"), Some(1));
        assert_eq!(parse_invoice_suffix("FACT-100000"), Some(100_000));

        assert_eq!(parse_invoice_suffix("NV-00001"), None);
        assert_eq!(parse_invoice_suffix("FACT-"), None);
        assert_eq!(parse_invoice_suffix("FACT-12x"), None);
        assert_eq!(parse_invoice_suffix(""), None);
    }

    #[test]
    fn test_roundtrip() {
        for seq in [1, 9, 99_999, 1_000_000] {
            assert_eq!(parse_invoice_suffix(&format_invoice_number(seq)), Some(seq));
        }
    }
}
