//! Bulk payslip generation across all active coaches.
//!
//! One generator invocation per coach, with per-coach isolation: a failure
//! for one coach never aborts the run or rolls back payslips already
//! created for others.

use crate::config::payroll::PayrollConfig;
use crate::core::payslip::generate_payslip;
use crate::entities::{User, user};
use crate::errors::{Error, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, warn};

/// One coach that could not be payrolled.
#[derive(Debug, Clone)]
pub struct CoachFailure {
    /// Coach the generator failed for
    pub coach_id: i64,
    /// Coach display name, for operator-facing summaries
    pub coach_name: String,
    /// Why generation failed
    pub message: String,
}

/// Outcome of a bulk generation run.
#[derive(Debug, Clone, Default)]
pub struct BulkGenerationSummary {
    /// Payslips created by this run
    pub created: usize,
    /// Coaches skipped because the period was already generated
    pub skipped: usize,
    /// Coaches that failed for any other reason
    pub errors: Vec<CoachFailure>,
}

/// Generates payslips for every active coach for the period.
///
/// Outcomes are classified per coach: `created`, `skipped` (a payslip for
/// the period already exists), or an error entry with the message retained.
/// The run always continues to the next coach.
pub async fn bulk_generate_payslips(
    db: &DatabaseConnection,
    month: u32,
    year: i32,
    config: &PayrollConfig,
) -> Result<BulkGenerationSummary> {
    let coaches = User::find()
        .filter(user::Column::Role.eq(user::UserRole::Coach))
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;

    let mut summary = BulkGenerationSummary::default();

    for coach in coaches {
        match generate_payslip(db, coach.id, month, year, config).await {
            Ok(_) => summary.created += 1,
            Err(Error::DuplicatePayslip { .. }) => summary.skipped += 1,
            Err(err) => {
                warn!(coach_id = coach.id, error = %err, "payslip generation failed");
                summary.errors.push(CoachFailure {
                    coach_id: coach.id,
                    coach_name: coach.display_name,
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        month,
        year,
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.errors.len(),
        "bulk payslip generation finished"
    );
    Ok(summary)
}
