//! Post-generation payslip mutations.
//!
//! Status toggling, ad-hoc deductions, and CPF overrides. Every mutation
//! recomputes `other_deductions`, `total_deductions`, and `net_pay` fresh
//! from the stored `gross_pay` and the full deduction list, never
//! incrementally from prior derived values, so rounding drift cannot
//! compound. The recomputation is a read-modify-write of the payslip row:
//! two admins editing the same payslip concurrently race last-write-wins,
//! which is acceptable for this single-admin-in-practice domain and is
//! documented here rather than papered over.

use crate::config::payroll::PayrollConfig;
use crate::entities::{
    Payslip,
    payslip::{self, DeductionDetail, PayslipStatus},
};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

async fn require_payslip(db: &DatabaseConnection, payslip_id: i64) -> Result<payslip::Model> {
    Payslip::find_by_id(payslip_id)
        .one(db)
        .await?
        .ok_or(Error::PayslipNotFound { id: payslip_id })
}

/// Flips a payslip between pending and paid.
///
/// Transitioning to paid stamps `payment_date` with today's date in the
/// business timezone (replacing the scheduled date from generation);
/// reverting to pending clears it.
pub async fn toggle_status(
    db: &DatabaseConnection,
    payslip_id: i64,
    config: &PayrollConfig,
) -> Result<payslip::Model> {
    let payslip = require_payslip(db, payslip_id).await?;

    let mut active: payslip::ActiveModel = payslip.clone().into();
    match payslip.status {
        PayslipStatus::Pending => {
            let today = Utc::now().with_timezone(&config.business_offset()).date_naive();
            active.status = Set(PayslipStatus::Paid);
            active.payment_date = Set(Some(today));
        }
        PayslipStatus::Paid => {
            active.status = Set(PayslipStatus::Pending);
            active.payment_date = Set(None);
        }
    }

    active.update(db).await.map_err(Into::into)
}

/// Appends an ad-hoc deduction line and recomputes the derived fields.
///
/// The amount must be positive and finite, the description non-empty.
/// Line ids are assigned monotonically within the payslip.
pub async fn add_deduction(
    db: &DatabaseConnection,
    payslip_id: i64,
    description: &str,
    amount: f64,
) -> Result<payslip::Model> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    if description.trim().is_empty() {
        return Err(Error::Validation {
            message: "deduction description cannot be empty".to_string(),
        });
    }

    let payslip = require_payslip(db, payslip_id).await?;

    let mut details = payslip.deduction_details.clone();
    let next_id = details.0.iter().map(|detail| detail.id).max().unwrap_or(0) + 1;
    details.0.push(DeductionDetail {
        id: next_id,
        description: description.trim().to_string(),
        amount,
    });

    let other_deductions: f64 = details.0.iter().map(|detail| detail.amount).sum();
    let total_deductions = payslip.cpf_contribution + other_deductions;
    let net_pay = payslip.gross_pay - total_deductions;

    let mut active: payslip::ActiveModel = payslip.into();
    active.deduction_details = Set(details);
    active.other_deductions = Set(other_deductions);
    active.total_deductions = Set(total_deductions);
    active.net_pay = Set(net_pay);

    active.update(db).await.map_err(Into::into)
}

/// Overrides the CPF contribution and recomputes the derived fields.
pub async fn update_cpf(
    db: &DatabaseConnection,
    payslip_id: i64,
    new_amount: f64,
) -> Result<payslip::Model> {
    if new_amount < 0.0 || !new_amount.is_finite() {
        return Err(Error::InvalidAmount { amount: new_amount });
    }

    let payslip = require_payslip(db, payslip_id).await?;

    let other_deductions: f64 = payslip
        .deduction_details
        .0
        .iter()
        .map(|detail| detail.amount)
        .sum();
    let total_deductions = new_amount + other_deductions;
    let net_pay = payslip.gross_pay - total_deductions;

    let mut active: payslip::ActiveModel = payslip.into();
    active.cpf_contribution = Set(new_amount);
    active.other_deductions = Set(other_deductions);
    active.total_deductions = Set(total_deductions);
    active.net_pay = Set(net_pay);

    active.update(db).await.map_err(Into::into)
}
