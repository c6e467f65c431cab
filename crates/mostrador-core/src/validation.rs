//! # Validation Module
//!
//! Request validation for the transaction processors.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: GUI           immediate per-field feedback
//! Layer 2: THIS MODULE   business rule validation, before any store access
//! Layer 3: Database      NOT NULL / UNIQUE / CHECK constraints as backstop
//! ```
//! A request rejected here has touched nothing: there is no transaction to
//! roll back.

use crate::error::{ValidationError, ValidationResult};
use crate::types::{PurchaseRequest, SaleRequest};
use crate::{MAX_DOCUMENT_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line quantity: positive, bounded by [`MAX_LINE_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: qty,
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale line unit price: strictly positive.
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a purchase line unit cost: strictly positive.
pub fn validate_unit_cost(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit_cost".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a cash movement amount: strictly positive.
pub fn validate_movement_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a session opening float: zero is a legal empty drawer.
pub fn validate_opening_amount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "opening_amount".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a discount or margin rate: at most 100%.
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a product code.
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Empty {
            field: "lines".to_string(),
        });
    }

    if count > MAX_DOCUMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_DOCUMENT_LINES as i64,
        });
    }

    Ok(())
}

/// Validates a sale request: nonempty lines, every quantity and unit price
/// strictly positive.
pub fn validate_sale_request(req: &SaleRequest) -> ValidationResult<()> {
    validate_line_count(req.lines.len())?;

    for line in &req.lines {
        validate_quantity(line.quantity)?;
        validate_unit_price(line.unit_price_cents)?;
    }

    validate_rate_bps(req.discount_rate().bps())?;

    Ok(())
}

/// Validates a purchase request: nonempty lines, every quantity and unit
/// cost strictly positive.
pub fn validate_purchase_request(req: &PurchaseRequest) -> ValidationResult<()> {
    validate_line_count(req.lines.len())?;

    for line in &req.lines {
        validate_quantity(line.quantity)?;
        validate_unit_cost(line.unit_cost_cents)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, PurchaseLineRequest, SaleLineRequest};

    fn sale_req(lines: Vec<SaleLineRequest>) -> SaleRequest {
        SaleRequest {
            client: None,
            employee_id: "e1".to_string(),
            cash_session_id: "s1".to_string(),
            payment_method: PaymentMethod::Cash,
            lines,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(1).is_ok());
        assert!(validate_unit_price(0).is_err());
        assert!(validate_unit_price(-100).is_err());
    }

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("CAFE-250").is_ok());
        assert!(validate_product_code("ABC123").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_sale_request_rejects_empty_lines() {
        let err = validate_sale_request(&sale_req(vec![])).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_validate_sale_request_rejects_bad_line() {
        let req = sale_req(vec![
            SaleLineRequest {
                product_id: "p1".to_string(),
                quantity: 2,
                unit_price_cents: 300,
            },
            SaleLineRequest {
                product_id: "p2".to_string(),
                quantity: 0,
                unit_price_cents: 300,
            },
        ]);
        assert!(validate_sale_request(&req).is_err());
    }

    #[test]
    fn test_validate_purchase_request() {
        let good = PurchaseRequest {
            invoice_number: None,
            supplier_id: "sup1".to_string(),
            employee_id: "e1".to_string(),
            lines: vec![PurchaseLineRequest {
                product_id: "p1".to_string(),
                quantity: 5,
                unit_cost_cents: 200,
            }],
        };
        assert!(validate_purchase_request(&good).is_ok());

        let bad = PurchaseRequest {
            lines: vec![PurchaseLineRequest {
                product_id: "p1".to_string(),
                quantity: 5,
                unit_cost_cents: 0,
            }],
            ..good
        };
        assert!(validate_purchase_request(&bad).is_err());
    }

    #[test]
    fn test_validate_opening_amount() {
        assert!(validate_opening_amount(0).is_ok());
        assert!(validate_opening_amount(5_000).is_ok());
        assert!(validate_opening_amount(-1).is_err());
    }
}
