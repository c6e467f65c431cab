//! End-to-end flows through the transaction processors against an
//! in-memory database: sale registration/void, purchase
//! registration/cancel, cash session lifecycle, and the rollback behavior
//! that keeps stock, documents and cash mutually consistent.

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use mostrador_core::{
    Client, ClientRef, Money, MovementKind, PaymentMethod, Product, ProductStatus,
    PurchaseLineRequest, PurchaseRequest, Rate, SaleLineRequest, SaleRequest, SaleStatus,
};
use mostrador_db::repository::client::generate_client_id;
use mostrador_db::repository::product::generate_product_id;
use mostrador_db::{Database, DbConfig};
use mostrador_ledger::{
    CashSessionManager, LedgerError, PurchaseProcessor, SaleProcessor,
};

const EMPLOYEE: &str = "emp-1";

struct Harness {
    db: Database,
    cash: CashSessionManager,
    sales: SaleProcessor,
    purchases: PurchaseProcessor,
}

async fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .try_init();

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    Harness {
        cash: CashSessionManager::new(db.clone()),
        sales: SaleProcessor::new(db.clone()),
        purchases: PurchaseProcessor::new(db.clone()),
        db,
    }
}

async fn seed_product(db: &Database, code: &str, stock: i64, price_cents: i64) -> String {
    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        code: code.to_string(),
        name: format!("Producto {code}"),
        cost_cents: price_cents / 2,
        price_cents,
        margin_bps: 5000,
        stock_actual: stock,
        stock_minimo: 2,
        status: ProductStatus::Active,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(db.pool(), &product).await.unwrap();
    product.id
}

async fn seed_client(db: &Database, discount_bps: u32) -> String {
    let now = Utc::now();
    let client = Client {
        id: generate_client_id(),
        name: "María Gómez".to_string(),
        discount_bps,
        total_compras_cents: 0,
        fecha_primera_compra: None,
        created_at: now,
        updated_at: now,
    };
    db.clients().insert(db.pool(), &client).await.unwrap();
    client.id
}

fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> SaleLineRequest {
    SaleLineRequest {
        product_id: product_id.to_string(),
        quantity,
        unit_price_cents,
    }
}

fn sale_request(session_id: &str, lines: Vec<SaleLineRequest>) -> SaleRequest {
    SaleRequest {
        client: None,
        employee_id: EMPLOYEE.to_string(),
        cash_session_id: session_id.to_string(),
        payment_method: PaymentMethod::Cash,
        lines,
    }
}

async fn stock_of(db: &Database, product_id: &str) -> i64 {
    db.products()
        .stock_of(db.pool(), product_id)
        .await
        .unwrap()
        .unwrap()
}

// =============================================================================
// Sale registration
// =============================================================================

#[tokio::test]
async fn sale_consumes_stock_and_issues_first_invoice() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::from_cents(5_000)).await.unwrap();

    let receipt = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 4, 300)]))
        .await
        .unwrap();

    assert_eq!(receipt.sale.invoice_number, "FACT-00001");
    assert_eq!(receipt.sale.subtotal_cents, 1_200);
    assert_eq!(receipt.sale.discount_cents, 0);
    assert_eq!(receipt.sale.total_cents, 1_200);
    assert_eq!(receipt.sale.status, SaleStatus::Completed);
    assert_eq!(receipt.lines.len(), 1);
    assert_eq!(receipt.lines[0].line_no, 1);
    assert_eq!(receipt.lines[0].subtotal_cents, 1_200);

    assert_eq!(stock_of(&h.db, &product_id).await, 6);

    // Cash side: total_ventas and an income movement for the sale
    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ventas_cents, 1_200);
    assert_eq!(session.total_ingresos_cents, 1_200);
    assert_eq!(session.total_egresos_cents, 0);

    let movements = h.cash.movements(&session.id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].concept, "opening");
    assert_eq!(movements[1].kind, MovementKind::Income);
    assert_eq!(movements[1].amount_cents, 1_200);
    assert_eq!(movements[1].concept, "sale FACT-00001");
}

#[tokio::test]
async fn invoice_numbers_increment_across_sales() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let first = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap();
    let second = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap();

    assert_eq!(first.sale.invoice_number, "FACT-00001");
    assert_eq!(second.sale.invoice_number, "FACT-00002");
    assert_ne!(first.sale.invoice_number, second.sale.invoice_number);
}

#[tokio::test]
async fn client_discount_is_applied_and_aggregated() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let client_id = seed_client(&h.db, 1_000).await; // 10%
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let mut req = sale_request(&session.id, vec![line(&product_id, 4, 300)]);
    req.client = Some(ClientRef {
        id: client_id.clone(),
        discount: Rate::from_bps(1_000),
    });

    let receipt = h.sales.create(&req).await.unwrap();
    assert_eq!(receipt.sale.subtotal_cents, 1_200);
    assert_eq!(receipt.sale.discount_cents, 120);
    assert_eq!(receipt.sale.total_cents, 1_080);

    let client = h.db.clients().get_by_id(h.db.pool(), &client_id).await.unwrap().unwrap();
    assert_eq!(client.total_compras_cents, 1_080);
    let first_purchase = client.fecha_primera_compra.expect("first purchase stamped");

    // A second sale accumulates without touching the first-purchase date
    let receipt = h.sales.create(&req).await.unwrap();
    assert_eq!(receipt.sale.total_cents, 1_080);

    let client = h.db.clients().get_by_id(h.db.pool(), &client_id).await.unwrap().unwrap();
    assert_eq!(client.total_compras_cents, 2_160);
    assert_eq!(
        client.fecha_primera_compra.unwrap().timestamp(),
        first_purchase.timestamp()
    );
}

#[tokio::test]
async fn unknown_client_rolls_back_the_whole_sale() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let mut req = sale_request(&session.id, vec![line(&product_id, 4, 300)]);
    req.client = Some(ClientRef {
        id: "no-such-client".to_string(),
        discount: Rate::zero(),
    });

    let err = h.sales.create(&req).await.unwrap_err();
    assert!(matches!(err, LedgerError::ClientNotFound(id) if id == "no-such-client"));

    // Nothing persisted: stock, cash and invoice sequence are untouched
    assert_eq!(stock_of(&h.db, &product_id).await, 10);
    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ventas_cents, 0);
    let next = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap();
    assert_eq!(next.sale.invoice_number, "FACT-00001");
}

#[tokio::test]
async fn insufficient_stock_leaves_every_product_untouched() {
    let h = harness().await;
    let plenty = seed_product(&h.db, "AZUCAR-1K", 50, 168).await;
    let scarce = seed_product(&h.db, "CAFE-250", 3, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let err = h
        .sales
        .create(&sale_request(
            &session.id,
            vec![line(&plenty, 5, 168), line(&scarce, 4, 300)],
        ))
        .await
        .unwrap_err();

    match err {
        LedgerError::InsufficientStock {
            product_id,
            available,
            requested,
        } => {
            assert_eq!(product_id, scarce);
            assert_eq!(available, 3);
            assert_eq!(requested, 4);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // The earlier line's consumption was rolled back too
    assert_eq!(stock_of(&h.db, &plenty).await, 50);
    assert_eq!(stock_of(&h.db, &scarce).await, 3);

    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ventas_cents, 0);
    assert_eq!(session.total_ingresos_cents, 0);
}

#[tokio::test]
async fn sale_request_validation_rejects_before_store_access() {
    let h = harness().await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    // Empty line list
    let err = h
        .sales
        .create(&sale_request(&session.id, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // Non-positive quantity
    let err = h
        .sales
        .create(&sale_request(&session.id, vec![line("p", 0, 300)]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // Non-positive unit price
    let err = h
        .sales
        .create(&sale_request(&session.id, vec![line("p", 1, 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn sale_requires_an_open_session_owned_by_the_employee() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;

    // Closed session
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();
    h.cash.close(&session.id, Money::zero(), None).await.unwrap();
    let err = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SessionNotOpen(_)));

    // Someone else's open session
    let other = h.cash.open("emp-2", Money::zero()).await.unwrap();
    let err = h
        .sales
        .create(&sale_request(&other.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SessionNotOpen(_)));

    // Unknown session
    let err = h
        .sales
        .create(&sale_request("no-such-session", vec![line(&product_id, 1, 300)]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SessionNotFound(_)));

    assert_eq!(stock_of(&h.db, &product_id).await, 10);
}

// =============================================================================
// Sale void
// =============================================================================

#[tokio::test]
async fn void_round_trips_stock_and_cash() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::from_cents(5_000)).await.unwrap();

    let receipt = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 4, 300)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&h.db, &product_id).await, 6);

    let voided = h.sales.void(&receipt.sale.id, EMPLOYEE).await.unwrap();
    assert_eq!(voided.status, SaleStatus::Voided);
    assert!(voided.voided_at.is_some());

    // The stored sale reflects the transition, lines intact
    let fetched = h.sales.get(&receipt.sale.id).await.unwrap();
    assert_eq!(fetched.sale.status, SaleStatus::Voided);
    assert_eq!(fetched.lines.len(), 1);

    // Stock round-trip
    assert_eq!(stock_of(&h.db, &product_id).await, 10);

    // Cash side: net sales back to pre-sale value, expense posted
    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ventas_cents, 0);
    assert_eq!(session.total_ingresos_cents, 1_200);
    assert_eq!(session.total_egresos_cents, 1_200);

    let movements = h.cash.movements(&session.id).await.unwrap();
    let last = movements.last().unwrap();
    assert_eq!(last.kind, MovementKind::Expense);
    assert_eq!(last.amount_cents, 1_200);
    assert_eq!(last.concept, "void FACT-00001");
}

#[tokio::test]
async fn double_void_is_rejected_without_mutation() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let receipt = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 4, 300)]))
        .await
        .unwrap();
    h.sales.void(&receipt.sale.id, EMPLOYEE).await.unwrap();

    let err = h.sales.void(&receipt.sale.id, EMPLOYEE).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyVoided(_)));

    // No second restock, no second expense
    assert_eq!(stock_of(&h.db, &product_id).await, 10);
    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_egresos_cents, 1_200);
    assert_eq!(h.cash.movements(&session.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn void_after_session_close_still_posts_the_expense() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let receipt = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 2, 300)]))
        .await
        .unwrap();
    h.cash.close(&session.id, Money::from_cents(600), None).await.unwrap();

    let voided = h.sales.void(&receipt.sale.id, EMPLOYEE).await.unwrap();
    assert_eq!(voided.status, SaleStatus::Voided);
    assert_eq!(stock_of(&h.db, &product_id).await, 10);

    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ventas_cents, 0);
    assert_eq!(session.total_egresos_cents, 600);
}

#[tokio::test]
async fn void_floors_client_aggregate_at_zero() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let client_id = seed_client(&h.db, 0).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let mut req = sale_request(&session.id, vec![line(&product_id, 2, 300)]);
    req.client = Some(ClientRef {
        id: client_id.clone(),
        discount: Rate::zero(),
    });
    let receipt = h.sales.create(&req).await.unwrap();

    h.sales.void(&receipt.sale.id, EMPLOYEE).await.unwrap();

    let client = h.db.clients().get_by_id(h.db.pool(), &client_id).await.unwrap().unwrap();
    assert_eq!(client.total_compras_cents, 0);
    // The first-purchase date survives the void
    assert!(client.fecha_primera_compra.is_some());
}

// =============================================================================
// Purchases
// =============================================================================

#[tokio::test]
async fn purchase_replenishes_stock_and_reprices() {
    let h = harness().await;
    // margin 50%; price will be recomputed from the purchase cost
    let product_id = seed_product(&h.db, "CAFE-250", 10, 280).await;

    let req = PurchaseRequest {
        invoice_number: Some("PROV-778".to_string()),
        supplier_id: "sup-1".to_string(),
        employee_id: EMPLOYEE.to_string(),
        lines: vec![PurchaseLineRequest {
            product_id: product_id.clone(),
            quantity: 5,
            unit_cost_cents: 200,
        }],
    };

    let result = h.purchases.create(&req).await.unwrap();
    assert_eq!(result.purchase.total_cents, 1_000);
    assert_eq!(result.lines.len(), 1);
    assert_eq!(result.lines[0].subtotal_cents, 1_000);

    let product = h.db.products().get_by_id(h.db.pool(), &product_id).await.unwrap().unwrap();
    assert_eq!(product.stock_actual, 15);
    assert_eq!(product.cost_cents, 200);
    assert_eq!(product.price_cents, 300); // 200 × 1.5
}

#[tokio::test]
async fn purchase_validation_and_missing_product() {
    let h = harness().await;

    let empty = PurchaseRequest {
        invoice_number: None,
        supplier_id: "sup-1".to_string(),
        employee_id: EMPLOYEE.to_string(),
        lines: vec![],
    };
    assert!(matches!(
        h.purchases.create(&empty).await.unwrap_err(),
        LedgerError::Validation(_)
    ));

    let ghost = PurchaseRequest {
        invoice_number: None,
        supplier_id: "sup-1".to_string(),
        employee_id: EMPLOYEE.to_string(),
        lines: vec![PurchaseLineRequest {
            product_id: "no-such-product".to_string(),
            quantity: 5,
            unit_cost_cents: 200,
        }],
    };
    assert!(matches!(
        h.purchases.create(&ghost).await.unwrap_err(),
        LedgerError::ProductNotFound(_)
    ));
}

#[tokio::test]
async fn purchase_cancel_round_trips_stock() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;

    let req = PurchaseRequest {
        invoice_number: None,
        supplier_id: "sup-1".to_string(),
        employee_id: EMPLOYEE.to_string(),
        lines: vec![PurchaseLineRequest {
            product_id: product_id.clone(),
            quantity: 5,
            unit_cost_cents: 200,
        }],
    };
    let result = h.purchases.create(&req).await.unwrap();
    assert_eq!(stock_of(&h.db, &product_id).await, 15);

    let cancelled = h.purchases.cancel(&result.purchase.id).await.unwrap();
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(stock_of(&h.db, &product_id).await, 10);

    // Idempotency guard
    assert!(matches!(
        h.purchases.cancel(&result.purchase.id).await.unwrap_err(),
        LedgerError::AlreadyCancelled(_)
    ));
}

#[tokio::test]
async fn purchase_cancel_surfaces_insufficient_stock() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 0, 300).await;

    let req = PurchaseRequest {
        invoice_number: None,
        supplier_id: "sup-1".to_string(),
        employee_id: EMPLOYEE.to_string(),
        lines: vec![PurchaseLineRequest {
            product_id: product_id.clone(),
            quantity: 5,
            unit_cost_cents: 200,
        }],
    };
    let result = h.purchases.create(&req).await.unwrap();

    // Sales consume 3 of the 5 replenished units
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();
    h.sales
        .create(&sale_request(&session.id, vec![line(&product_id, 3, 300)]))
        .await
        .unwrap();

    let err = h.purchases.cancel(&result.purchase.id).await.unwrap_err();
    match err {
        LedgerError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 2);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Cancel failed whole: the purchase stays completed, stock untouched
    let purchase = h.purchases.get(&result.purchase.id).await.unwrap();
    assert_eq!(stock_of(&h.db, &product_id).await, 2);
    assert!(purchase.purchase.cancelled_at.is_none());
}

// =============================================================================
// Cash sessions
// =============================================================================

#[tokio::test]
async fn second_open_session_is_rejected() {
    let h = harness().await;

    let session = h.cash.open(EMPLOYEE, Money::from_cents(5_000)).await.unwrap();

    let err = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap_err();
    match err {
        LedgerError::SessionAlreadyOpen {
            employee_id,
            session_id,
        } => {
            assert_eq!(employee_id, EMPLOYEE);
            assert_eq!(session_id, session.id);
        }
        other => panic!("expected SessionAlreadyOpen, got {other:?}"),
    }

    // Another employee opens freely; after closing, the first can reopen
    h.cash.open("emp-2", Money::zero()).await.unwrap();
    h.cash.close(&session.id, Money::from_cents(5_000), None).await.unwrap();
    h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();
}

#[tokio::test]
async fn opening_float_is_the_first_ledger_entry() {
    let h = harness().await;

    let session = h.cash.open(EMPLOYEE, Money::from_cents(5_000)).await.unwrap();

    let movements = h.cash.movements(&session.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Income);
    assert_eq!(movements[0].amount_cents, 5_000);
    assert_eq!(movements[0].concept, "opening");

    // The opening float is not an ingreso: close with an untouched drawer
    // reconciles to zero difference
    let session = h.db.cash().get_session(h.db.pool(), &session.id).await.unwrap().unwrap();
    assert_eq!(session.total_ingresos_cents, 0);
    assert_eq!(session.expected().cents(), 5_000);
}

#[tokio::test]
async fn close_computes_signed_difference_exactly() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::from_cents(5_000)).await.unwrap();

    h.sales
        .create(&sale_request(&session.id, vec![line(&product_id, 5, 300)]))
        .await
        .unwrap();

    // Manual expense from the drawer
    h.cash
        .post_movement(
            &session.id,
            MovementKind::Expense,
            Money::from_cents(400),
            "mensajería",
            EMPLOYEE,
        )
        .await
        .unwrap();

    // expected = 5000 + 1500 − 400 = 6100; drawer counted short by 150
    let close = h
        .cash
        .close(&session.id, Money::from_cents(5_950), Some("turno tarde"))
        .await
        .unwrap();

    assert_eq!(close.expected_cents, 6_100);
    assert_eq!(close.diferencia_cents, -150);
    assert_eq!(close.session.closing_cents, Some(5_950));
    assert_eq!(close.session.notes.as_deref(), Some("turno tarde"));

    // Closed is terminal
    let err = h
        .cash
        .close(&session.id, Money::from_cents(5_950), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SessionNotOpen(_)));

    // Over-counted drawers keep a positive sign
    let session2 = h.cash.open(EMPLOYEE, Money::from_cents(1_000)).await.unwrap();
    let close2 = h
        .cash
        .close(&session2.id, Money::from_cents(1_025), None)
        .await
        .unwrap();
    assert_eq!(close2.diferencia_cents, 25);
}

#[tokio::test]
async fn post_movement_validates_and_updates_aggregates() {
    let h = harness().await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let err = h
        .cash
        .post_movement(&session.id, MovementKind::Income, Money::zero(), "x", EMPLOYEE)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    h.cash
        .post_movement(
            &session.id,
            MovementKind::Income,
            Money::from_cents(2_000),
            "cambio inicial",
            EMPLOYEE,
        )
        .await
        .unwrap();

    let err = h
        .cash
        .post_movement(
            "no-such-session",
            MovementKind::Income,
            Money::from_cents(100),
            "x",
            EMPLOYEE,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SessionNotFound(_)));

    let summary = h.cash.summary(&session.id).await.unwrap();
    assert_eq!(summary.session.total_ingresos_cents, 2_000);
    assert_eq!(summary.num_ventas, 0);
}

#[tokio::test]
async fn session_summary_counts_completed_sales() {
    let h = harness().await;
    let product_id = seed_product(&h.db, "CAFE-250", 10, 300).await;
    let session = h.cash.open(EMPLOYEE, Money::zero()).await.unwrap();

    let first = h
        .sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap();
    h.sales
        .create(&sale_request(&session.id, vec![line(&product_id, 1, 300)]))
        .await
        .unwrap();

    assert_eq!(h.cash.summary(&session.id).await.unwrap().num_ventas, 2);

    // A voided sale drops out of the count but stays listed
    h.sales.void(&first.sale.id, EMPLOYEE).await.unwrap();
    assert_eq!(h.cash.summary(&session.id).await.unwrap().num_ventas, 1);

    let listed = h
        .db
        .sales()
        .list_for_session(h.db.pool(), &session.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, SaleStatus::Voided);
}
