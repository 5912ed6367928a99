//! Weekly earnings rollups for coach dashboards.
//!
//! Three read-only sums over a coach's sessions, all derived through the
//! commission resolver: commission awaiting member verification, commission
//! awaiting payment approval, and commission paid out since the start of
//! the current week. "This week" is anchored at the most recent Sunday
//! 00:00 in the gym's business timezone.
//!
//! These are pipeline views, not payroll: the payslip generator selects
//! sessions by `scheduled_at` and attendance status, while `paid_this_week`
//! deliberately watches `approved_at` — it measures cash movement in the
//! current week. Dashboards should treat change notifications as a signal
//! to refetch and recompute, never to merge increments.

use crate::config::payroll::PayrollConfig;
use crate::core::commission::{resolve_commission, round_currency};
use crate::entities::{PtSession, pt_session};
use crate::errors::Result;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Commission rollups for one coach, each rounded once at the end of its
/// own sum.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyEarnings {
    /// Commission on sessions the coach verified but the member has not
    pub pending_verification: f64,
    /// Commission on dual-verified sessions awaiting payment approval
    pub pending_payment: f64,
    /// Commission approved for payment since the start of the week
    pub paid_this_week: f64,
}

/// Returns the most recent Sunday 00:00 in the given business timezone,
/// as a UTC instant.
#[must_use]
pub fn start_of_week(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let days_back = i64::from(local.weekday().num_days_from_sunday());
    let sunday = local.date_naive() - Duration::days(days_back);

    let local_midnight = sunday.and_time(NaiveTime::MIN);
    let utc_naive = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc_naive, Utc)
}

/// Computes the three rollups over a coach's full session set.
#[must_use]
pub fn summarize_sessions(
    sessions: &[pt_session::Model],
    now: DateTime<Utc>,
    config: &PayrollConfig,
) -> WeeklyEarnings {
    let week_start = start_of_week(now, config.business_offset());

    let mut pending_verification = 0.0;
    let mut pending_payment = 0.0;
    let mut paid_this_week = 0.0;

    for session in sessions {
        if session.payment_approved {
            if let Some(approved_at) = session.approved_at {
                if approved_at >= week_start && approved_at < now {
                    paid_this_week += resolve_commission(session, config);
                }
            }
        } else if session.coach_verified {
            if session.member_verified {
                pending_payment += resolve_commission(session, config);
            } else {
                pending_verification += resolve_commission(session, config);
            }
        }
    }

    WeeklyEarnings {
        pending_verification: round_currency(pending_verification),
        pending_payment: round_currency(pending_payment),
        paid_this_week: round_currency(paid_this_week),
    }
}

/// Fetches a coach's sessions and computes the weekly rollups as of now.
pub async fn weekly_earnings_for_coach(
    db: &DatabaseConnection,
    coach_id: i64,
    config: &PayrollConfig,
) -> Result<WeeklyEarnings> {
    let sessions = PtSession::find()
        .filter(pt_session::Column::CoachId.eq(coach_id))
        .all(db)
        .await?;

    Ok(summarize_sessions(&sessions, Utc::now(), config))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::pt_session::{SessionStatus, SessionType};
    use crate::test_utils::{create_verified_session, setup_coach_and_member, test_config};
    use chrono::TimeZone;
    use sea_orm::Set;
    use sea_orm::prelude::*;

    fn session(commission: f64) -> pt_session::Model {
        pt_session::Model {
            id: 0,
            coach_id: 1,
            member_id: 2,
            scheduled_at: Utc::now(),
            duration_minutes: 60,
            status: SessionStatus::Scheduled,
            session_type: SessionType::SoloSingle,
            session_price: None,
            commission_amount: Some(commission),
            coach_verified: false,
            verification_date: None,
            member_verified: false,
            payment_approved: false,
            approved_by: None,
            approved_at: None,
            payment_amount: None,
            package_id: None,
            cancelled_by: None,
            cancellation_reason: None,
            cancelled_at: None,
            edited_by: None,
            edited_at: None,
            edit_count: 0,
            notes: None,
        }
    }

    fn coach_verified(commission: f64) -> pt_session::Model {
        let mut s = session(commission);
        s.coach_verified = true;
        s
    }

    fn both_verified(commission: f64) -> pt_session::Model {
        let mut s = coach_verified(commission);
        s.member_verified = true;
        s
    }

    fn paid(commission: f64, approved_at: DateTime<Utc>) -> pt_session::Model {
        let mut s = both_verified(commission);
        s.payment_approved = true;
        s.approved_at = Some(approved_at);
        s.payment_amount = Some(commission);
        s
    }

    #[test]
    fn test_start_of_week_midweek() {
        // Wednesday 2025-03-12 10:00 +08:00
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = offset
            .with_ymd_and_hms(2025, 3, 12, 10, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let start = start_of_week(now, offset);

        // Most recent Sunday 00:00 local is 2025-03-09, i.e. 2025-03-08 16:00 UTC
        let expected = Utc.with_ymd_and_hms(2025, 3, 8, 16, 0, 0).unwrap();
        assert_eq!(start, expected);
    }

    #[test]
    fn test_start_of_week_on_sunday() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = offset
            .with_ymd_and_hms(2025, 3, 9, 8, 30, 0)
            .unwrap()
            .with_timezone(&Utc);

        let start = start_of_week(now, offset);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 8, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_week_respects_timezone_day_boundary() {
        // Saturday 20:00 UTC is already Sunday 04:00 in +08:00
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 8, 20, 0, 0).unwrap();

        let start = start_of_week(now, offset);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 8, 16, 0, 0).unwrap());
        assert!(start <= now);
    }

    #[test]
    fn test_summarize_classifies_pipeline_stages() {
        let config = test_config();
        let now = Utc::now();
        let sessions = vec![
            session(10.0),                         // unverified: counted nowhere
            coach_verified(20.0),                  // pending member verification
            coach_verified(5.0),                   // pending member verification
            both_verified(30.0),                   // pending payment
            paid(40.0, now - Duration::hours(1)),  // paid inside the window
        ];

        let earnings = summarize_sessions(&sessions, now, &config);
        assert_eq!(earnings.pending_verification, 25.0);
        assert_eq!(earnings.pending_payment, 30.0);
        assert_eq!(earnings.paid_this_week, 40.0);
    }

    #[test]
    fn test_summarize_excludes_payments_before_week_start() {
        let config = test_config();
        let now = Utc::now();
        let week_start = start_of_week(now, config.business_offset());

        let sessions = vec![
            paid(40.0, week_start - Duration::seconds(1)), // last week
            paid(25.0, week_start),                        // boundary: included
        ];

        let earnings = summarize_sessions(&sessions, now, &config);
        assert_eq!(earnings.paid_this_week, 25.0);
    }

    #[test]
    fn test_summarize_rounds_each_aggregate_once() {
        let config = test_config();
        let now = Utc::now();

        // Per-item rounding would give 20.00; a single rounding of the sum
        // gives 20.01.
        let sessions = vec![coach_verified(10.004), coach_verified(10.004)];

        let earnings = summarize_sessions(&sessions, now, &config);
        assert_eq!(earnings.pending_verification, 20.01);
    }

    #[test]
    fn test_summarize_empty() {
        let earnings = summarize_sessions(&[], Utc::now(), &test_config());
        assert_eq!(earnings.pending_verification, 0.0);
        assert_eq!(earnings.pending_payment, 0.0);
        assert_eq!(earnings.paid_this_week, 0.0);
    }

    #[tokio::test]
    async fn test_weekly_earnings_for_coach_scopes_to_coach() -> Result<()> {
        let (db, coach, member) = setup_coach_and_member().await?;
        let other = crate::test_utils::create_part_time_coach(&db, "Other").await?;

        // One dual-verified session for each coach; only ours should count
        create_verified_session(&db, coach.id, member.id, None).await?;
        create_verified_session(&db, other.id, member.id, None).await?;

        let earnings = weekly_earnings_for_coach(&db, coach.id, &test_config()).await?;
        assert_eq!(earnings.pending_payment, 45.0);
        assert_eq!(earnings.pending_verification, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_earnings_counts_recent_payment() -> Result<()> {
        let (db, coach, member) = setup_coach_and_member().await?;
        let session = create_verified_session(&db, coach.id, member.id, None).await?;

        let mut active: pt_session::ActiveModel = session.into();
        active.payment_approved = Set(true);
        active.approved_at = Set(Some(Utc::now() - Duration::minutes(5)));
        active.payment_amount = Set(Some(45.0));
        active.update(&db).await?;

        let earnings = weekly_earnings_for_coach(&db, coach.id, &test_config()).await?;
        assert_eq!(earnings.paid_this_week, 45.0);
        assert_eq!(earnings.pending_payment, 0.0);
        Ok(())
    }
}
