//! Payment approval for verified PT sessions.
//!
//! Approval locks in the coach's commission and, for package-drawn
//! sessions, consumes one unit of the member's package. The two writes are
//! an explicit saga: the approval commits first, and a package-side failure
//! is logged as a consistency warning rather than raised — the payment
//! itself is valid. [`reconcile_package_usage`] is the reconciling step
//! that surfaces any drift; it reports and never auto-corrects.

use crate::config::payroll::PayrollConfig;
use crate::core::commission::resolve_commission;
use crate::core::verification::require_session;
use crate::entities::{
    PtPackage, PtSession,
    pt_package::{self, PackageStatus},
    pt_session,
};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::{info, warn};

/// Per-session failure inside a bulk approval run.
#[derive(Debug, Clone)]
pub struct ApprovalFailure {
    /// Session that could not be approved
    pub session_id: i64,
    /// Why it failed
    pub message: String,
}

/// Outcome of a bulk approval run. Failures never abort the batch.
#[derive(Debug, Clone)]
pub struct BulkApprovalSummary {
    /// Number of sessions approved
    pub approved: usize,
    /// Per-session failures, in input order
    pub failures: Vec<ApprovalFailure>,
}

/// Result of comparing a package's stored usage counter against the
/// session-derived count.
#[derive(Debug, Clone)]
pub struct PackageReconciliation {
    /// Package inspected
    pub package_id: i64,
    /// `sessions_used` as stored on the package row
    pub stored_used: i64,
    /// Count of approved sessions referencing the package
    pub derived_used: i64,
}

impl PackageReconciliation {
    /// Whether the stored counter matches the session-derived count.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.stored_used == self.derived_used
    }
}

/// Approves a verified session for payment.
///
/// Precondition: both the coach and the member have verified, and the
/// session has not already been approved. The locked-in `payment_amount`
/// is the explicit `amount` when given, otherwise the session's resolved
/// commission.
///
/// Side effect: if the session draws from a package, the package's usage
/// counter is incremented by exactly 1 (marking the package completed when
/// it reaches its total). A failure there does not undo the approval; it
/// is logged and left to reconciliation.
pub async fn approve_payment(
    db: &DatabaseConnection,
    session_id: i64,
    approver_id: i64,
    amount: Option<f64>,
    config: &PayrollConfig,
) -> Result<pt_session::Model> {
    let session = require_session(db, session_id).await?;

    if !session.coach_verified || !session.member_verified {
        return Err(Error::Validation {
            message: format!("session {session_id} is not verified by both coach and member"),
        });
    }
    if session.payment_approved {
        return Err(Error::Validation {
            message: format!("session {session_id} is already approved for payment"),
        });
    }

    let payment = amount.unwrap_or_else(|| resolve_commission(&session, config));

    let mut active: pt_session::ActiveModel = session.into();
    active.payment_approved = Set(true);
    active.approved_by = Set(Some(approver_id));
    active.approved_at = Set(Some(Utc::now()));
    active.payment_amount = Set(Some(payment));

    let approved = active.update(db).await?;

    if let Some(package_id) = approved.package_id {
        if let Err(err) = consume_package_session(db, package_id).await {
            // The payment itself is valid; the drift is recoverable and
            // surfaced by reconcile_package_usage.
            warn!(
                session_id,
                package_id,
                error = %err,
                "package usage update failed after payment approval"
            );
        }
    }

    Ok(approved)
}

/// Consumes one session from a package, marking it completed when the
/// counter reaches the total. An already-exhausted package is left
/// untouched; incrementing further would break the usage invariant.
async fn consume_package_session(
    db: &DatabaseConnection,
    package_id: i64,
) -> Result<pt_package::Model> {
    let package = PtPackage::find_by_id(package_id)
        .one(db)
        .await?
        .ok_or(Error::PackageNotFound { id: package_id })?;

    if package.sessions_used >= package.total_sessions {
        warn!(package_id, "package already exhausted; usage not incremented");
        return Ok(package);
    }

    let used = package.sessions_used + 1;
    let completed = used >= package.total_sessions;

    let mut active: pt_package::ActiveModel = package.into();
    active.sessions_used = Set(used);
    if completed {
        active.status = Set(PackageStatus::Completed);
    }

    active.update(db).await.map_err(Into::into)
}

/// Approves many sessions, each with its own resolved commission.
///
/// Per-item failures (unverified sessions, missing sessions) are recorded
/// and the batch continues; already-approved rows are not rolled back.
pub async fn bulk_approve_payment(
    db: &DatabaseConnection,
    session_ids: &[i64],
    approver_id: i64,
    config: &PayrollConfig,
) -> Result<BulkApprovalSummary> {
    let mut summary = BulkApprovalSummary {
        approved: 0,
        failures: Vec::new(),
    };

    for &session_id in session_ids {
        match approve_payment(db, session_id, approver_id, None, config).await {
            Ok(_) => summary.approved += 1,
            Err(err) => summary.failures.push(ApprovalFailure {
                session_id,
                message: err.to_string(),
            }),
        }
    }

    info!(
        approved = summary.approved,
        failed = summary.failures.len(),
        "bulk payment approval finished"
    );
    Ok(summary)
}

/// Compares a package's stored usage counter against the number of
/// approved sessions referencing it. Drift is logged, reported, and left
/// for a deliberate correction - never auto-fixed.
pub async fn reconcile_package_usage(
    db: &DatabaseConnection,
    package_id: i64,
) -> Result<PackageReconciliation> {
    let package = PtPackage::find_by_id(package_id)
        .one(db)
        .await?
        .ok_or(Error::PackageNotFound { id: package_id })?;

    let derived = PtSession::find()
        .filter(pt_session::Column::PackageId.eq(package_id))
        .filter(pt_session::Column::PaymentApproved.eq(true))
        .count(db)
        .await?;

    let reconciliation = PackageReconciliation {
        package_id,
        stored_used: i64::from(package.sessions_used),
        derived_used: i64::try_from(derived).unwrap_or(i64::MAX),
    };

    if !reconciliation.is_consistent() {
        warn!(
            package_id,
            stored = reconciliation.stored_used,
            derived = reconciliation.derived_used,
            "package usage counter does not match approved sessions"
        );
    }

    Ok(reconciliation)
}
