//! Shared test utilities for `CoachPay`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::payroll::PayrollConfig,
    entities::{
        gym_class, pt_package,
        pt_package::PackageStatus,
        pt_session,
        pt_session::{SessionStatus, SessionType},
        user,
        user::{EmploymentType, UserRole},
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The default payroll configuration used across tests.
#[must_use]
pub fn test_config() -> PayrollConfig {
    PayrollConfig::default()
}

/// Creates a coach with the given employment profile fields.
/// Pass `None` for all three to create a coach without a profile.
pub async fn create_test_coach(
    db: &DatabaseConnection,
    name: &str,
    employment_type: Option<EmploymentType>,
    base_salary: Option<f64>,
    rate_per_class: Option<f64>,
) -> Result<user::Model> {
    let coach = user::ActiveModel {
        display_name: Set(name.to_string()),
        role: Set(UserRole::Coach),
        employment_type: Set(employment_type),
        base_salary: Set(base_salary),
        rate_per_class: Set(rate_per_class),
        is_active: Set(true),
        ..Default::default()
    };
    coach.insert(db).await.map_err(Into::into)
}

/// Creates an active part-time coach with an hourly class rate of 50.
pub async fn create_part_time_coach(db: &DatabaseConnection, name: &str) -> Result<user::Model> {
    create_test_coach(db, name, Some(EmploymentType::PartTime), None, Some(50.0)).await
}

/// Creates an active full-time coach with a monthly base salary of 3000.
pub async fn create_full_time_coach(db: &DatabaseConnection, name: &str) -> Result<user::Model> {
    create_test_coach(db, name, Some(EmploymentType::FullTime), Some(3000.0), None).await
}

/// Creates a gym member.
pub async fn create_test_member(db: &DatabaseConnection, name: &str) -> Result<user::Model> {
    let member = user::ActiveModel {
        display_name: Set(name.to_string()),
        role: Set(UserRole::Member),
        employment_type: Set(None),
        base_salary: Set(None),
        rate_per_class: Set(None),
        is_active: Set(true),
        ..Default::default()
    };
    member.insert(db).await.map_err(Into::into)
}

/// Creates an admin with the given active flag.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    name: &str,
    is_active: bool,
) -> Result<user::Model> {
    let admin = user::ActiveModel {
        display_name: Set(name.to_string()),
        role: Set(UserRole::Admin),
        employment_type: Set(None),
        base_salary: Set(None),
        rate_per_class: Set(None),
        is_active: Set(is_active),
        ..Default::default()
    };
    admin.insert(db).await.map_err(Into::into)
}

/// Sets up a database together with a part-time coach and a member.
/// Returns (db, coach, member) for common session-lifecycle tests.
pub async fn setup_coach_and_member() -> Result<(DatabaseConnection, user::Model, user::Model)> {
    let db = setup_test_db().await?;
    let coach = create_part_time_coach(&db, "Test Coach").await?;
    let member = create_test_member(&db, "Test Member").await?;
    Ok((db, coach, member))
}

/// Creates a scheduled PT session with sensible defaults.
///
/// # Defaults
/// * `scheduled_at`: now
/// * `duration_minutes`: 60
/// * `status`: scheduled
/// * `session_type`: `solo_single`
/// * `session_price`: 90.0
/// * no verification, payment, package, cancellation, or edits
pub async fn create_test_session(
    db: &DatabaseConnection,
    coach_id: i64,
    member_id: i64,
) -> Result<pt_session::Model> {
    create_payroll_session(
        db,
        coach_id,
        member_id,
        Utc::now(),
        SessionStatus::Scheduled,
        Some(90.0),
    )
    .await
}

/// Creates a PT session with a specific schedule, status, and price.
/// Use this to shape payroll-eligibility scenarios.
pub async fn create_payroll_session(
    db: &DatabaseConnection,
    coach_id: i64,
    member_id: i64,
    scheduled_at: DateTime<Utc>,
    status: SessionStatus,
    session_price: Option<f64>,
) -> Result<pt_session::Model> {
    let session = pt_session::ActiveModel {
        coach_id: Set(coach_id),
        member_id: Set(member_id),
        scheduled_at: Set(scheduled_at),
        duration_minutes: Set(60),
        status: Set(status),
        session_type: Set(SessionType::SoloSingle),
        session_price: Set(session_price),
        commission_amount: Set(None),
        coach_verified: Set(false),
        verification_date: Set(None),
        member_verified: Set(false),
        payment_approved: Set(false),
        approved_by: Set(None),
        approved_at: Set(None),
        payment_amount: Set(None),
        package_id: Set(None),
        cancelled_by: Set(None),
        cancellation_reason: Set(None),
        cancelled_at: Set(None),
        edited_by: Set(None),
        edited_at: Set(None),
        edit_count: Set(0),
        notes: Set(None),
        ..Default::default()
    };
    session.insert(db).await.map_err(Into::into)
}

/// Creates a session already verified by both coach and member, ready for
/// payment approval. Optionally tied to a package.
pub async fn create_verified_session(
    db: &DatabaseConnection,
    coach_id: i64,
    member_id: i64,
    package_id: Option<i64>,
) -> Result<pt_session::Model> {
    let session = create_test_session(db, coach_id, member_id).await?;

    let mut active: pt_session::ActiveModel = session.into();
    active.coach_verified = Set(true);
    active.verification_date = Set(Some(Utc::now()));
    active.member_verified = Set(true);
    active.package_id = Set(package_id);
    active.update(db).await.map_err(Into::into)
}

/// Creates a PT package for a member.
pub async fn create_test_package(
    db: &DatabaseConnection,
    user_id: i64,
    total_sessions: i32,
    sessions_used: i32,
) -> Result<pt_package::Model> {
    let package = pt_package::ActiveModel {
        user_id: Set(user_id),
        total_sessions: Set(total_sessions),
        sessions_used: Set(sessions_used),
        status: Set(PackageStatus::Active),
        ..Default::default()
    };
    package.insert(db).await.map_err(Into::into)
}

/// Creates a class led by a coach.
pub async fn create_test_class(
    db: &DatabaseConnection,
    coach_id: i64,
    scheduled_at: DateTime<Utc>,
    duration_minutes: i32,
) -> Result<gym_class::Model> {
    let class = gym_class::ActiveModel {
        coach_id: Set(coach_id),
        name: Set("Test Class".to_string()),
        scheduled_at: Set(scheduled_at),
        duration_minutes: Set(duration_minutes),
        ..Default::default()
    };
    class.insert(db).await.map_err(Into::into)
}
