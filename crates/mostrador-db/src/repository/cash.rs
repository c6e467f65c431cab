//! # Cash Repository
//!
//! Database operations for cash-register sessions and their movement
//! ledger.
//!
//! Movements are append-only: there is no UPDATE or DELETE on
//! `cash_movements` anywhere in this crate. Session aggregates
//! (`total_ventas`, `total_ingresos`, `total_egresos`) are bumped with
//! delta updates in the same unit of work that appends the justifying
//! movement.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::{CashMovement, CashSession, MovementKind};

const SESSION_COLUMNS: &str = "id, employee_id, status, opening_cents, closing_cents, \
     total_ventas_cents, total_ingresos_cents, total_egresos_cents, \
     diferencia_cents, notes, opened_at, closed_at";

const MOVEMENT_COLUMNS: &str =
    "id, session_id, kind, amount_cents, concept, employee_id, created_at";

/// Repository for cash session and movement operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashRepository;

impl CashRepository {
    /// Creates a new CashRepository.
    pub fn new() -> Self {
        CashRepository
    }

    /// Gets a session by ID.
    pub async fn get_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(session)
    }

    /// Gets an employee's open session, if one exists.
    ///
    /// The partial unique index on `(employee_id) WHERE status = 'open'`
    /// guarantees at most one row matches.
    pub async fn open_session_for_employee(
        &self,
        exec: impl SqliteExecutor<'_>,
        employee_id: &str,
    ) -> DbResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions \
             WHERE employee_id = ?1 AND status = 'open'"
        ))
        .bind(employee_id)
        .fetch_optional(exec)
        .await?;

        Ok(session)
    }

    /// Inserts a new session.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - employee already has an open
    ///   session (partial unique index)
    pub async fn insert_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        session: &CashSession,
    ) -> DbResult<()> {
        debug!(id = %session.id, employee = %session.employee_id, "Opening cash session");

        sqlx::query(
            r#"
            INSERT INTO cash_sessions (
                id, employee_id, status, opening_cents, closing_cents,
                total_ventas_cents, total_ingresos_cents, total_egresos_cents,
                diferencia_cents, notes, opened_at, closed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&session.id)
        .bind(&session.employee_id)
        .bind(session.status)
        .bind(session.opening_cents)
        .bind(session.closing_cents)
        .bind(session.total_ventas_cents)
        .bind(session.total_ingresos_cents)
        .bind(session.total_egresos_cents)
        .bind(session.diferencia_cents)
        .bind(&session.notes)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Appends a movement to the ledger.
    pub async fn insert_movement(
        &self,
        exec: impl SqliteExecutor<'_>,
        movement: &CashMovement,
    ) -> DbResult<()> {
        debug!(
            session = %movement.session_id,
            kind = ?movement.kind,
            amount = %movement.amount_cents,
            "Appending cash movement"
        );

        sqlx::query(
            r#"
            INSERT INTO cash_movements (
                id, session_id, kind, amount_cents, concept, employee_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.session_id)
        .bind(movement.kind)
        .bind(movement.amount_cents)
        .bind(&movement.concept)
        .bind(&movement.employee_id)
        .bind(movement.created_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Bumps a session's income or expense aggregate by a movement amount.
    ///
    /// ## Returns
    /// * `Ok(true)` - aggregate updated
    /// * `Ok(false)` - session doesn't exist
    pub async fn bump_movement_totals(
        &self,
        exec: impl SqliteExecutor<'_>,
        session_id: &str,
        kind: MovementKind,
        amount_cents: i64,
    ) -> DbResult<bool> {
        let sql = match kind {
            MovementKind::Income => {
                "UPDATE cash_sessions \
                 SET total_ingresos_cents = total_ingresos_cents + ?2 \
                 WHERE id = ?1"
            }
            MovementKind::Expense => {
                "UPDATE cash_sessions \
                 SET total_egresos_cents = total_egresos_cents + ?2 \
                 WHERE id = ?1"
            }
        };

        let result = sqlx::query(sql)
            .bind(session_id)
            .bind(amount_cents)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adds a signed delta to a session's net sales aggregate.
    ///
    /// Positive on sale registration, negative on void.
    pub async fn add_ventas(
        &self,
        exec: impl SqliteExecutor<'_>,
        session_id: &str,
        delta_cents: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE cash_sessions \
             SET total_ventas_cents = total_ventas_cents + ?2 \
             WHERE id = ?1",
        )
        .bind(session_id)
        .bind(delta_cents)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transitions an open session to closed, storing the counted amount
    /// and the reconciliation difference.
    ///
    /// ## Returns
    /// * `Ok(true)` - session closed
    /// * `Ok(false)` - session missing or already closed
    pub async fn close_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        id: &str,
        closing_cents: i64,
        diferencia_cents: i64,
        notes: Option<&str>,
        closed_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, closing = %closing_cents, "Closing cash session");

        let result = sqlx::query(
            r#"
            UPDATE cash_sessions
            SET status = 'closed',
                closing_cents = ?2,
                diferencia_cents = ?3,
                notes = ?4,
                closed_at = ?5
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(closing_cents)
        .bind(diferencia_cents)
        .bind(notes)
        .bind(closed_at)
        .execute(exec)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a session's movements in append order.
    pub async fn movements_for_session(
        &self,
        exec: impl SqliteExecutor<'_>,
        session_id: &str,
    ) -> DbResult<Vec<CashMovement>> {
        let movements = sqlx::query_as::<_, CashMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movements \
             WHERE session_id = ?1 ORDER BY rowid"
        ))
        .bind(session_id)
        .fetch_all(exec)
        .await?;

        Ok(movements)
    }
}

/// Helper to generate a new session ID.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new movement ID.
pub fn generate_movement_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use mostrador_core::CashSessionStatus;

    fn sample_session(employee_id: &str) -> CashSession {
        CashSession {
            id: generate_session_id(),
            employee_id: employee_id.to_string(),
            status: CashSessionStatus::Open,
            opening_cents: 5_000,
            closing_cents: None,
            total_ventas_cents: 0,
            total_ingresos_cents: 0,
            total_egresos_cents: 0,
            diferencia_cents: None,
            notes: None,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[tokio::test]
    async fn test_one_open_session_per_employee() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cash();

        repo.insert_session(db.pool(), &sample_session("emp-1"))
            .await
            .unwrap();

        // Second open session for the same employee trips the index
        let err = repo
            .insert_session(db.pool(), &sample_session("emp-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // A different employee is unaffected
        repo.insert_session(db.pool(), &sample_session("emp-2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_is_guarded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cash();

        let session = sample_session("emp-1");
        repo.insert_session(db.pool(), &session).await.unwrap();

        assert!(repo
            .close_session(db.pool(), &session.id, 5_200, 200, None, Utc::now())
            .await
            .unwrap());

        // Closed is terminal
        assert!(!repo
            .close_session(db.pool(), &session.id, 5_200, 200, None, Utc::now())
            .await
            .unwrap());

        let closed = repo.get_session(db.pool(), &session.id).await.unwrap().unwrap();
        assert_eq!(closed.status, CashSessionStatus::Closed);
        assert_eq!(closed.closing_cents, Some(5_200));
        assert_eq!(closed.diferencia_cents, Some(200));

        // And the employee can open a fresh session again
        repo.insert_session(db.pool(), &sample_session("emp-1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_movement_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cash();

        let session = sample_session("emp-1");
        repo.insert_session(db.pool(), &session).await.unwrap();

        let movement = CashMovement {
            id: generate_movement_id(),
            session_id: session.id.clone(),
            kind: MovementKind::Income,
            amount_cents: 1_500,
            concept: "sale FACT-00001".to_string(),
            employee_id: "emp-1".to_string(),
            created_at: Utc::now(),
        };
        repo.insert_movement(db.pool(), &movement).await.unwrap();
        repo.bump_movement_totals(db.pool(), &session.id, MovementKind::Income, 1_500)
            .await
            .unwrap();
        repo.add_ventas(db.pool(), &session.id, 1_500).await.unwrap();

        let found = repo.get_session(db.pool(), &session.id).await.unwrap().unwrap();
        assert_eq!(found.total_ingresos_cents, 1_500);
        assert_eq!(found.total_ventas_cents, 1_500);
        assert_eq!(found.total_egresos_cents, 0);

        let movements = repo
            .movements_for_session(db.pool(), &session.id)
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Income);
    }
}
