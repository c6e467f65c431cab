//! # Client Repository
//!
//! Client lookups and the purchase aggregate maintained by sale
//! registration: `total_compras` accumulates completed sale totals and
//! `fecha_primera_compra` is stamped exactly once.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::Client;

const CLIENT_COLUMNS: &str = "id, name, discount_bps, total_compras_cents, \
     fecha_primera_compra, created_at, updated_at";

/// Repository for client database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientRepository;

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new() -> Self {
        ClientRepository
    }

    /// Gets a client by ID.
    pub async fn get_by_id(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(client)
    }

    /// Inserts a new client.
    pub async fn insert(&self, exec: impl SqliteExecutor<'_>, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, discount_bps, total_compras_cents,
                fecha_primera_compra, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(client.discount_bps)
        .bind(client.total_compras_cents)
        .bind(client.fecha_primera_compra)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Records a completed sale on the client aggregate.
    ///
    /// Adds `total_cents` to `total_compras` and stamps
    /// `fecha_primera_compra` if it was never set.
    ///
    /// ## Returns
    /// * `Ok(true)` - aggregate updated
    /// * `Ok(false)` - client doesn't exist
    pub async fn record_sale(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        total_cents: i64,
        sold_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, total = %total_cents, "Recording sale on client aggregate");

        let result = sqlx::query(
            r#"
            UPDATE clients
            SET total_compras_cents = total_compras_cents + ?2,
                fecha_primera_compra = COALESCE(fecha_primera_compra, ?3),
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(total_cents)
        .bind(sold_at)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reverts a voided sale from the client aggregate, floored at zero.
    ///
    /// `fecha_primera_compra` is never cleared: the client did buy once.
    pub async fn revert_sale(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        total_cents: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, total = %total_cents, "Reverting sale from client aggregate");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE clients
            SET total_compras_cents = MAX(0, total_compras_cents - ?2),
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(total_cents)
        .bind(now)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper to generate a new client ID.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_client() -> Client {
        let now = Utc::now();
        Client {
            id: generate_client_id(),
            name: "María Gómez".to_string(),
            discount_bps: 1000,
            total_compras_cents: 0,
            fecha_primera_compra: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_record_sale_sets_first_purchase_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let client = sample_client();
        repo.insert(db.pool(), &client).await.unwrap();

        let first = Utc::now();
        assert!(repo.record_sale(db.pool(), &client.id, 500, first).await.unwrap());

        let found = repo.get_by_id(db.pool(), &client.id).await.unwrap().unwrap();
        assert_eq!(found.total_compras_cents, 500);
        let stamped = found.fecha_primera_compra.unwrap();

        // A second sale accumulates but keeps the original first-purchase date
        assert!(repo
            .record_sale(db.pool(), &client.id, 300, Utc::now())
            .await
            .unwrap());
        let found = repo.get_by_id(db.pool(), &client.id).await.unwrap().unwrap();
        assert_eq!(found.total_compras_cents, 800);
        assert_eq!(found.fecha_primera_compra.unwrap().timestamp(), stamped.timestamp());
    }

    #[tokio::test]
    async fn test_revert_sale_floors_at_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let client = sample_client();
        repo.insert(db.pool(), &client).await.unwrap();
        repo.record_sale(db.pool(), &client.id, 500, Utc::now())
            .await
            .unwrap();

        assert!(repo.revert_sale(db.pool(), &client.id, 800).await.unwrap());

        let found = repo.get_by_id(db.pool(), &client.id).await.unwrap().unwrap();
        assert_eq!(found.total_compras_cents, 0);
        assert!(found.fecha_primera_compra.is_some());
    }

    #[tokio::test]
    async fn test_record_sale_unknown_client() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let updated = repo
            .record_sale(db.pool(), "nope", 100, Utc::now())
            .await
            .unwrap();
        assert!(!updated);
    }
}
