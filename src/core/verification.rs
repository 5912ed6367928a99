//! PT session lifecycle operations.
//!
//! A session moves `Scheduled → CoachVerified → BothVerified → PaymentApproved`,
//! with a terminal `Cancelled` branch reachable only while still scheduled
//! and unverified. Verification progress is tracked through the
//! `coach_verified`/`member_verified` boolean pair; the `status` column is
//! never advanced by verification, only by cancellation (here) or by
//! external attendance flows. Every operation is a targeted partial write:
//! only the fields it owns are `Set`, so concurrent actors touching
//! disjoint fields of the same session do not clobber each other.

use crate::config::payroll::PayrollConfig;
use crate::core::notify;
use crate::entities::{
    PtSession,
    pt_session::{self, SessionStatus, SessionType},
};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::debug;

/// Field changes a coach may apply to a scheduled, unverified session.
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionEdit {
    /// New start instant
    pub scheduled_at: Option<DateTime<Utc>>,
    /// New duration in minutes
    pub duration_minutes: Option<i32>,
    /// New session type; also drives the commission recomputation
    pub session_type: Option<SessionType>,
    /// New member taking the session
    pub member_id: Option<i64>,
    /// New coach notes
    pub notes: Option<String>,
}

/// Finds a session by its unique ID.
pub async fn get_session_by_id(
    db: &DatabaseConnection,
    session_id: i64,
) -> Result<Option<pt_session::Model>> {
    PtSession::find_by_id(session_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a session, failing if it does not exist.
pub(crate) async fn require_session<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
) -> Result<pt_session::Model> {
    PtSession::find_by_id(session_id)
        .one(conn)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })
}

/// Checks the shared edit/cancel precondition: still scheduled, not
/// cancelled, and the coach has not yet verified.
fn ensure_modifiable(session: &pt_session::Model, action: &str) -> Result<()> {
    if session.status != SessionStatus::Scheduled
        || session.cancelled_at.is_some()
        || session.coach_verified
    {
        return Err(Error::Validation {
            message: format!(
                "session {} can no longer be {action}: it is verified, cancelled, or already held",
                session.id
            ),
        });
    }
    Ok(())
}

/// Marks a session as attended from the coach's side.
///
/// Precondition: the session is scheduled, not cancelled, and not already
/// coach-verified, and belongs to the acting coach. Sets `coach_verified`
/// and `verification_date`; the `status` column stays `scheduled` — progress
/// is tracked purely through the verification pair.
pub async fn mark_attended(
    db: &DatabaseConnection,
    session_id: i64,
    coach_id: i64,
) -> Result<pt_session::Model> {
    let session = require_session(db, session_id).await?;

    if session.coach_id != coach_id {
        return Err(Error::Validation {
            message: format!("session {session_id} is not led by coach {coach_id}"),
        });
    }
    if session.status != SessionStatus::Scheduled
        || session.cancelled_at.is_some()
        || session.coach_verified
    {
        return Err(Error::Validation {
            message: format!("session {session_id} cannot be verified in its current state"),
        });
    }

    let now = Utc::now();
    // Verifying ahead of the scheduled start is allowed but worth a trace
    if now < session.scheduled_at {
        debug!(session_id, "coach verified before the scheduled start");
    }

    let mut active: pt_session::ActiveModel = session.into();
    active.coach_verified = Set(true);
    active.verification_date = Set(Some(now));

    active.update(db).await.map_err(Into::into)
}

/// Undoes a coach verification.
///
/// Only legal while the member has not verified yet; once both sides have
/// confirmed, the session is on its way to payment and the coach can no
/// longer retract.
pub async fn undo_verification(
    db: &DatabaseConnection,
    session_id: i64,
) -> Result<pt_session::Model> {
    let session = require_session(db, session_id).await?;

    if !session.coach_verified {
        return Err(Error::Validation {
            message: format!("session {session_id} is not coach-verified"),
        });
    }
    if session.member_verified {
        return Err(Error::Validation {
            message: format!(
                "session {session_id} is already member-verified; verification cannot be undone"
            ),
        });
    }

    let mut active: pt_session::ActiveModel = session.into();
    active.coach_verified = Set(false);
    active.verification_date = Set(None);

    active.update(db).await.map_err(Into::into)
}

/// Records the member-side confirmation that the session took place.
///
/// This is the member-portal write; it lives here so the field semantics
/// stay in one place. Rejected on cancelled or already-paid sessions.
pub async fn member_verify(db: &DatabaseConnection, session_id: i64) -> Result<pt_session::Model> {
    let session = require_session(db, session_id).await?;

    if session.cancelled_at.is_some() {
        return Err(Error::Validation {
            message: format!("session {session_id} is cancelled"),
        });
    }
    if session.payment_approved {
        return Err(Error::Validation {
            message: format!("session {session_id} is already paid"),
        });
    }

    let mut active: pt_session::ActiveModel = session.into();
    active.member_verified = Set(true);

    active.update(db).await.map_err(Into::into)
}

/// Cancels a scheduled session.
///
/// Precondition: still scheduled, not cancelled, not coach-verified; the
/// reason is required non-empty text. Writes the cancellation fields and,
/// in the same transaction, notification records for the member and every
/// active admin.
pub async fn cancel(
    db: &DatabaseConnection,
    session_id: i64,
    actor_id: i64,
    reason: &str,
) -> Result<pt_session::Model> {
    if reason.trim().is_empty() {
        return Err(Error::Validation {
            message: "cancellation reason cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let session = require_session(&txn, session_id).await?;
    ensure_modifiable(&session, "cancelled")?;

    let member_id = session.member_id;
    let when = session.scheduled_at;

    let mut active: pt_session::ActiveModel = session.into();
    active.status = Set(SessionStatus::Cancelled);
    active.cancelled_by = Set(Some(actor_id));
    active.cancellation_reason = Set(Some(reason.trim().to_string()));
    active.cancelled_at = Set(Some(Utc::now()));

    let updated = active.update(&txn).await?;

    let message = format!(
        "PT session scheduled for {} was cancelled: {}",
        when.format("%Y-%m-%d %H:%M"),
        reason.trim()
    );
    notify::notify_user(
        &txn,
        member_id,
        "Session cancelled",
        &message,
        notify::TYPE_SESSION_CANCELLED,
    )
    .await?;
    notify::notify_active_admins(
        &txn,
        "Session cancelled",
        &message,
        notify::TYPE_SESSION_CANCELLED,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Applies coach edits to a scheduled, unverified session.
///
/// The commission is recomputed from the configured per-type rate table,
/// keyed by the session's (possibly new) type — deliberately independent of
/// any coach-specific rate configured elsewhere. Increments `edit_count`
/// and notifies active admins in the same transaction.
pub async fn edit(
    db: &DatabaseConnection,
    session_id: i64,
    actor_id: i64,
    changes: SessionEdit,
    config: &PayrollConfig,
) -> Result<pt_session::Model> {
    let txn = db.begin().await?;

    let session = require_session(&txn, session_id).await?;
    ensure_modifiable(&session, "edited")?;

    let effective_type = changes.session_type.unwrap_or(session.session_type);
    let edit_count = session.edit_count;

    let mut active: pt_session::ActiveModel = session.into();
    if let Some(scheduled_at) = changes.scheduled_at {
        active.scheduled_at = Set(scheduled_at);
    }
    if let Some(duration_minutes) = changes.duration_minutes {
        active.duration_minutes = Set(duration_minutes);
    }
    if let Some(session_type) = changes.session_type {
        active.session_type = Set(session_type);
    }
    if let Some(member_id) = changes.member_id {
        active.member_id = Set(member_id);
    }
    if let Some(notes) = changes.notes {
        active.notes = Set(Some(notes));
    }
    active.commission_amount = Set(Some(config.session_rates.rate_for(effective_type)));
    active.edit_count = Set(edit_count + 1);
    active.edited_by = Set(Some(actor_id));
    active.edited_at = Set(Some(Utc::now()));

    let updated = active.update(&txn).await?;

    notify::notify_active_admins(
        &txn,
        "Session edited",
        &format!("PT session {session_id} was edited by coach {actor_id}"),
        notify::TYPE_SESSION_EDITED,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}
