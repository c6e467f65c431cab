//! # Cash Session Manager
//!
//! Lifecycle of a cash-register session and its movement ledger.
//!
//! ## Session Lifecycle
//! ```text
//! open(employee, opening_amount)
//!      │   creates session + appends the opening float as the
//!      │   first ledger entry
//!      ▼
//!   OPEN ──── post_movement(income/expense) ──┐
//!      │      sales post income, voids post   │  append-only ledger,
//!      │      expense, manual entries allowed │  aggregates bumped in
//!      │                                      │  the same unit of work
//!      ▼
//! close(closing_amount, notes)
//!      │   expected   = opening + ingresos − egresos
//!      │   diferencia = closing − expected   (sign preserved)
//!      ▼
//!   CLOSED (terminal - a closed session never reopens)
//! ```
//!
//! A nonzero `diferencia` is informational (drawer over/short), not an
//! error: reconciliation is surfaced to the cashier, never rejected.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use mostrador_core::validation::{validate_movement_amount, validate_opening_amount};
use mostrador_core::{
    CashClose, CashMovement, CashSession, CashSessionStatus, MovementKind, Money, SessionSummary,
};
use mostrador_db::repository::cash::{generate_movement_id, generate_session_id};
use mostrador_db::{CashRepository, Database};

/// Concept recorded on the opening-float movement.
const OPENING_CONCEPT: &str = "opening";

/// Manages cash-register sessions against an injected database handle.
#[derive(Debug, Clone)]
pub struct CashSessionManager {
    db: Database,
}

impl CashSessionManager {
    /// Creates a manager bound to the given database.
    pub fn new(db: Database) -> Self {
        CashSessionManager { db }
    }

    /// Opens a session for an employee.
    ///
    /// The opening float becomes the first entry of the session's movement
    /// ledger. It does not feed `total_ingresos`: the close reconciliation
    /// counts the opening amount separately.
    ///
    /// ## Errors
    /// * `SessionAlreadyOpen` - the employee already has an open session
    pub async fn open(&self, employee_id: &str, opening: Money) -> LedgerResult<CashSession> {
        validate_opening_amount(opening.cents())?;

        let mut tx = self.db.begin().await?;
        let cash = self.db.cash();

        if let Some(existing) = cash.open_session_for_employee(&mut *tx, employee_id).await? {
            return Err(LedgerError::SessionAlreadyOpen {
                employee_id: employee_id.to_string(),
                session_id: existing.id,
            });
        }

        let now = Utc::now();
        let session = CashSession {
            id: generate_session_id(),
            employee_id: employee_id.to_string(),
            status: CashSessionStatus::Open,
            opening_cents: opening.cents(),
            closing_cents: None,
            total_ventas_cents: 0,
            total_ingresos_cents: 0,
            total_egresos_cents: 0,
            diferencia_cents: None,
            notes: None,
            opened_at: now,
            closed_at: None,
        };

        if let Err(err) = cash.insert_session(&mut *tx, &session).await {
            // Unique-index backstop: a concurrent open won the race.
            if err.is_unique_violation_on("cash_sessions.employee_id") {
                let winner = cash
                    .open_session_for_employee(&mut *tx, employee_id)
                    .await?
                    .map(|s| s.id)
                    .unwrap_or_default();
                return Err(LedgerError::SessionAlreadyOpen {
                    employee_id: employee_id.to_string(),
                    session_id: winner,
                });
            }
            return Err(err.into());
        }

        // Movement amounts are strictly positive; an empty drawer opens
        // with no ledger entry.
        if opening.is_positive() {
            let movement = CashMovement {
                id: generate_movement_id(),
                session_id: session.id.clone(),
                kind: MovementKind::Income,
                amount_cents: opening.cents(),
                concept: OPENING_CONCEPT.to_string(),
                employee_id: employee_id.to_string(),
                created_at: now,
            };
            cash.insert_movement(&mut *tx, &movement).await?;
        }

        tx.commit().await?;

        info!(session_id = %session.id, employee_id = %employee_id, opening = %opening, "Cash session opened");

        Ok(session)
    }

    /// Appends a movement to an open unit of work.
    ///
    /// Shared by the public [`post_movement`](Self::post_movement) and by
    /// the sale processor, which posts sale/void movements inside its own
    /// transaction. Bumps the matching aggregate
    /// (`total_ingresos`/`total_egresos`) before appending, so a missing
    /// session surfaces as `SessionNotFound` rather than a raw
    /// foreign-key violation.
    pub(crate) async fn post_movement_on(
        conn: &mut SqliteConnection,
        session_id: &str,
        kind: MovementKind,
        amount: Money,
        concept: &str,
        employee_id: &str,
    ) -> LedgerResult<CashMovement> {
        validate_movement_amount(amount.cents())?;

        let cash = CashRepository::new();

        let updated = cash
            .bump_movement_totals(&mut *conn, session_id, kind, amount.cents())
            .await?;
        if !updated {
            return Err(LedgerError::SessionNotFound(session_id.to_string()));
        }

        let movement = CashMovement {
            id: generate_movement_id(),
            session_id: session_id.to_string(),
            kind,
            amount_cents: amount.cents(),
            concept: concept.to_string(),
            employee_id: employee_id.to_string(),
            created_at: Utc::now(),
        };
        cash.insert_movement(&mut *conn, &movement).await?;

        Ok(movement)
    }

    /// Posts a manual income or expense movement.
    ///
    /// ## Errors
    /// * `ValidationError` - amount is not strictly positive
    /// * `SessionNotFound` - no such session
    pub async fn post_movement(
        &self,
        session_id: &str,
        kind: MovementKind,
        amount: Money,
        concept: &str,
        employee_id: &str,
    ) -> LedgerResult<CashMovement> {
        validate_movement_amount(amount.cents())?;

        let mut tx = self.db.begin().await?;

        let movement =
            Self::post_movement_on(&mut tx, session_id, kind, amount, concept, employee_id)
                .await?;

        tx.commit().await?;

        info!(
            session_id = %session_id,
            kind = ?kind,
            amount = %amount,
            concept = %concept,
            "Cash movement posted"
        );

        Ok(movement)
    }

    /// Closes a session with the counted drawer amount.
    ///
    /// `diferencia = closing − (opening + ingresos − egresos)`; the sign is
    /// preserved and surfaced for display, never rejected.
    ///
    /// ## Errors
    /// * `SessionNotFound` - no such session
    /// * `SessionNotOpen` - already closed
    pub async fn close(
        &self,
        session_id: &str,
        closing: Money,
        notes: Option<&str>,
    ) -> LedgerResult<CashClose> {
        let mut tx = self.db.begin().await?;
        let cash = self.db.cash();

        let session = cash
            .get_session(&mut *tx, session_id)
            .await?
            .ok_or_else(|| LedgerError::SessionNotFound(session_id.to_string()))?;

        if !session.is_open() {
            return Err(LedgerError::SessionNotOpen(session_id.to_string()));
        }

        let expected = session.expected();
        let diferencia = closing - expected;
        let now = Utc::now();

        let closed = cash
            .close_session(
                &mut *tx,
                session_id,
                closing.cents(),
                diferencia.cents(),
                notes,
                now,
            )
            .await?;
        if !closed {
            // Guarded UPDATE lost a race against a concurrent close.
            return Err(LedgerError::SessionNotOpen(session_id.to_string()));
        }

        tx.commit().await?;

        info!(
            session_id = %session_id,
            closing = %closing,
            expected = %expected,
            diferencia = %diferencia,
            "Cash session closed"
        );

        let session = CashSession {
            status: CashSessionStatus::Closed,
            closing_cents: Some(closing.cents()),
            diferencia_cents: Some(diferencia.cents()),
            notes: notes.map(str::to_string),
            closed_at: Some(now),
            ..session
        };

        Ok(CashClose {
            expected_cents: expected.cents(),
            diferencia_cents: diferencia.cents(),
            session,
        })
    }

    /// Returns a session with its completed-sale count.
    pub async fn summary(&self, session_id: &str) -> LedgerResult<SessionSummary> {
        let session = self
            .db
            .cash()
            .get_session(self.db.pool(), session_id)
            .await?
            .ok_or_else(|| LedgerError::SessionNotFound(session_id.to_string()))?;

        let num_ventas = self
            .db
            .sales()
            .count_completed_for_session(self.db.pool(), session_id)
            .await?;

        Ok(SessionSummary { session, num_ventas })
    }

    /// Lists a session's movements in append order.
    pub async fn movements(&self, session_id: &str) -> LedgerResult<Vec<CashMovement>> {
        let movements = self
            .db
            .cash()
            .movements_for_session(self.db.pool(), session_id)
            .await?;

        if movements.is_empty() {
            // Distinguish "no movements" from "no session".
            self.db
                .cash()
                .get_session(self.db.pool(), session_id)
                .await?
                .ok_or_else(|| LedgerError::SessionNotFound(session_id.to_string()))?;
        }

        Ok(movements)
    }
}
