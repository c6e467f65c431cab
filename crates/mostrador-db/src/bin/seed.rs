//! Seeds a database with a small demo catalog.
//!
//! ```bash
//! MOSTRADOR_DB=./mostrador.db cargo run -p mostrador-db --bin seed
//! ```

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mostrador_core::{Client, Product, ProductStatus};
use mostrador_db::repository::client::generate_client_id;
use mostrador_db::repository::product::generate_product_id;
use mostrador_db::{Database, DbConfig, DbError};

fn product(code: &str, name: &str, cost: i64, price: i64, margin_bps: u32, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: generate_product_id(),
        code: code.to_string(),
        name: name.to_string(),
        cost_cents: cost,
        price_cents: price,
        margin_bps,
        stock_actual: stock,
        stock_minimo: 5,
        status: ProductStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

fn client(name: &str, discount_bps: u32) -> Client {
    let now = Utc::now();
    Client {
        id: generate_client_id(),
        name: name.to_string(),
        discount_bps,
        total_compras_cents: 0,
        fecha_primera_compra: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::main]
async fn main() -> Result<(), DbError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::var("MOSTRADOR_DB").unwrap_or_else(|_| "mostrador.db".to_string());
    let db = Database::new(DbConfig::new(&path)).await?;

    let products = [
        product("CAFE-250", "Café molido 250g", 200, 300, 5000, 40),
        product("AZUCAR-1K", "Azúcar 1kg", 120, 168, 4000, 60),
        product("LECHE-1L", "Leche entera 1L", 90, 126, 4000, 24),
        product("PAN-INT", "Pan integral", 150, 225, 5000, 15),
        product("ARROZ-1K", "Arroz 1kg", 110, 154, 4000, 80),
    ];

    for p in &products {
        db.products().insert(db.pool(), p).await?;
    }

    let clients = [
        client("María Gómez", 1000),
        client("Taller San José", 500),
        client("Consumidor final", 0),
    ];

    for c in &clients {
        db.clients().insert(db.pool(), c).await?;
    }

    let count = db.products().count(db.pool()).await?;
    info!(path = %path, products = count, clients = clients.len(), "Seed complete");

    Ok(())
}
