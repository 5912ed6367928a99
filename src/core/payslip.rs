//! Monthly payslip generation.
//!
//! The one implementation of the payroll arithmetic; every call site
//! (single generation, bulk runs, the payroll-close binary) goes through
//! [`generate_payslip`] so the formula can only diverge in one place.
//!
//! The payroll-eligible session selection is canonical here: sessions the
//! coach led with status attended or completed, scheduled inside the
//! calendar month (business timezone). Dashboard rollups intentionally use
//! a different, `approved_at`-based window; see `core::earnings`.

use crate::config::payroll::PayrollConfig;
use crate::core::commission::{resolve_commission, round_currency};
use crate::entities::{
    GymClass, Payslip, PtSession, User, gym_class,
    payslip::{self, DeductionList, PayslipStatus, WeekCommission, WeeklyBreakdown},
    pt_session::{self, SessionStatus},
    user::{self, EmploymentType, UserRole},
};
use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

/// Number of fixed 7-day buckets the month is partitioned into.
const WEEK_BUCKETS: usize = 5;

/// The pay fields a payslip is computed from, extracted from the coach row.
struct EmploymentProfile {
    employment_type: EmploymentType,
    base_salary: f64,
    rate_per_class: f64,
}

/// Extracts the employment profile, requiring the pay field that matches
/// the employment basis.
fn employment_profile(coach: &user::Model) -> Result<EmploymentProfile> {
    let employment_type = coach
        .employment_type
        .ok_or(Error::ProfileMissing { coach_id: coach.id })?;

    let (base_salary, rate_per_class) = match employment_type {
        EmploymentType::FullTime => (
            coach
                .base_salary
                .ok_or(Error::ProfileMissing { coach_id: coach.id })?,
            coach.rate_per_class.unwrap_or(0.0),
        ),
        EmploymentType::PartTime => (
            coach.base_salary.unwrap_or(0.0),
            coach
                .rate_per_class
                .ok_or(Error::ProfileMissing { coach_id: coach.id })?,
        ),
    };

    Ok(EmploymentProfile {
        employment_type,
        base_salary,
        rate_per_class,
    })
}

/// Converts a local calendar date's midnight into a UTC instant.
fn local_midnight_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN) - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

/// Returns the `[start, end)` UTC window of a calendar month in the
/// business timezone.
fn month_bounds(
    year: i32,
    month: u32,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || Error::Validation {
        message: format!("invalid payroll period {month}/{year}"),
    };

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;

    Ok((local_midnight_utc(start, offset), local_midnight_utc(end, offset)))
}

/// First day of the month following the period. Full-time payout date.
fn first_of_following_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(y, m, 1)
}

/// Last day of the month after next. Part-time payout date; the source
/// system's arithmetic carries an extra month of offset versus the evident
/// "end of next month" intent, preserved faithfully pending verification
/// against the real payroll calendar.
fn last_day_of_month_after_next(year: i32, month: u32) -> Option<NaiveDate> {
    let mut y = year;
    let mut m = month + 3;
    if m > 12 {
        m -= 12;
        y += 1;
    }
    NaiveDate::from_ymd_opt(y, m, 1).map(|first| first - Duration::days(1))
}

/// Partitions the month's sessions into five fixed 7-day buckets anchored
/// at day 1 and sums commission per bucket. Buckets without sessions are
/// omitted.
// Cast safety: bucket indices are in 0..5, day-of-month in 1..=31.
#[allow(clippy::cast_possible_truncation)]
fn weekly_breakdown(
    sessions: &[pt_session::Model],
    offset: FixedOffset,
    config: &PayrollConfig,
) -> WeeklyBreakdown {
    let mut amounts = [0.0_f64; WEEK_BUCKETS];
    let mut counts = [0_u32; WEEK_BUCKETS];

    for session in sessions {
        let day = session.scheduled_at.with_timezone(&offset).day();
        // Day 1-7 -> bucket 0, ..., day 29-31 -> bucket 4
        let bucket = (((day - 1) / 7) as usize).min(WEEK_BUCKETS - 1);
        amounts[bucket] += resolve_commission(session, config);
        counts[bucket] += 1;
    }

    let weeks = amounts
        .iter()
        .zip(counts.iter())
        .enumerate()
        .filter(|&(_, (_, &count))| count > 0)
        .map(|(index, (&amount, _))| WeekCommission {
            week: index as u32 + 1,
            amount: round_currency(amount),
        })
        .collect();

    WeeklyBreakdown(weeks)
}

/// Generates the payslip for one coach and period.
///
/// Preconditions: `month` in 1-12, the coach exists and has a complete
/// employment profile, and no payslip exists yet for the period. The only
/// write is the final insert, so a failure anywhere leaves nothing behind.
///
/// Computation:
/// 1. Class hours: minutes of the coach's classes inside the month / 60.
/// 2. Class earnings: 0 for full-time, hours x hourly rate for part-time.
/// 3. PT commission: resolved commission over the coach's attended or
///    completed sessions scheduled inside the month, plus the per-week
///    breakdown.
/// 4. Gross: base salary + commission (full-time) or class earnings +
///    commission (part-time).
/// 5. CPF: the configured flat rate of gross, rounded to cents, applied
///    unconditionally at generation time.
/// 6. Net: gross minus CPF (no other deductions exist yet).
/// 7. Payment date per employment basis.
#[allow(clippy::too_many_lines)]
pub async fn generate_payslip(
    db: &DatabaseConnection,
    coach_id: i64,
    month: u32,
    year: i32,
    config: &PayrollConfig,
) -> Result<payslip::Model> {
    if !(1..=12).contains(&month) {
        return Err(Error::Validation {
            message: format!("month {month} is out of range 1-12"),
        });
    }
    // month ∈ 1..=12, the cast cannot wrap
    #[allow(clippy::cast_possible_wrap)]
    let month_db = month as i32;

    let coach = User::find_by_id(coach_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("coach {coach_id} not found"),
        })?;
    if coach.role != UserRole::Coach {
        return Err(Error::Validation {
            message: format!("user {coach_id} is not a coach"),
        });
    }
    let profile = employment_profile(&coach)?;

    let existing = Payslip::find()
        .filter(payslip::Column::UserId.eq(coach_id))
        .filter(payslip::Column::Month.eq(month_db))
        .filter(payslip::Column::Year.eq(year))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicatePayslip {
            coach_id,
            month,
            year,
        });
    }

    let offset = config.business_offset();
    let (start, end) = month_bounds(year, month, offset)?;

    let classes = GymClass::find()
        .filter(gym_class::Column::CoachId.eq(coach_id))
        .filter(gym_class::Column::ScheduledAt.gte(start))
        .filter(gym_class::Column::ScheduledAt.lt(end))
        .all(db)
        .await?;
    let class_hours: f64 = classes
        .iter()
        .map(|class| f64::from(class.duration_minutes) / 60.0)
        .sum();
    let class_earnings = match profile.employment_type {
        EmploymentType::FullTime => 0.0,
        EmploymentType::PartTime => class_hours * profile.rate_per_class,
    };

    let sessions = PtSession::find()
        .filter(pt_session::Column::CoachId.eq(coach_id))
        .filter(
            pt_session::Column::Status
                .is_in([SessionStatus::Attended, SessionStatus::Completed]),
        )
        .filter(pt_session::Column::ScheduledAt.gte(start))
        .filter(pt_session::Column::ScheduledAt.lt(end))
        .all(db)
        .await?;
    let pt_commission: f64 = sessions
        .iter()
        .map(|session| resolve_commission(session, config))
        .sum();
    let pt_session_count = i32::try_from(sessions.len()).unwrap_or(i32::MAX);
    let breakdown = weekly_breakdown(&sessions, offset, config);

    let gross_pay = match profile.employment_type {
        EmploymentType::FullTime => profile.base_salary + pt_commission,
        EmploymentType::PartTime => class_earnings + pt_commission,
    };
    let cpf_contribution = round_currency(gross_pay * config.cpf_rate);
    let other_deductions = 0.0;
    let total_deductions = cpf_contribution + other_deductions;
    let net_pay = gross_pay - total_deductions;

    let payment_date = match profile.employment_type {
        EmploymentType::FullTime => first_of_following_month(year, month),
        EmploymentType::PartTime => last_day_of_month_after_next(year, month),
    }
    .ok_or_else(|| Error::Validation {
        message: format!("could not derive a payment date for {month}/{year}"),
    })?;

    let record = payslip::ActiveModel {
        user_id: Set(coach_id),
        month: Set(month_db),
        year: Set(year),
        employment_type: Set(profile.employment_type),
        base_salary: Set(profile.base_salary),
        class_earnings: Set(class_earnings),
        class_hours: Set(class_hours),
        class_rate_per_hour: Set(profile.rate_per_class),
        pt_commission: Set(pt_commission),
        pt_session_count: Set(pt_session_count),
        pt_weekly_breakdown: Set(breakdown),
        bonus: Set(0.0),
        bonus_description: Set(None),
        gross_pay: Set(gross_pay),
        cpf_contribution: Set(cpf_contribution),
        other_deductions: Set(other_deductions),
        deduction_details: Set(DeductionList::default()),
        total_deductions: Set(total_deductions),
        net_pay: Set(net_pay),
        status: Set(PayslipStatus::Pending),
        payment_date: Set(Some(payment_date)),
        ..Default::default()
    };

    let stored = record.insert(db).await?;
    info!(
        coach_id,
        month, year, gross_pay, net_pay, "generated payslip"
    );
    Ok(stored)
}
