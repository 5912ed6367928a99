//! PT session entity - Represents one scheduled personal-training appointment.
//!
//! A session is created by the booking flow as `scheduled`, verified by the
//! coach (`coach_verified`) and the member (`member_verified`), and finally
//! approved for payment by an admin. Verification progress is tracked through
//! the boolean pair; the `status` column itself only changes on cancellation
//! or through external attendance flows. Once cancelled or paid a session is
//! immutable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a PT session
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SessionStatus {
    /// Booked but not yet held
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    /// Held; attendance recorded by an external flow
    #[sea_orm(string_value = "attended")]
    Attended,
    /// Fully wrapped up by an external flow
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled before it was held; terminal
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Commercial type of a PT session, used for commission rate lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SessionType {
    /// One-on-one session drawn from a prepaid package
    #[sea_orm(string_value = "solo_package")]
    SoloPackage,
    /// One-on-one session paid individually
    #[sea_orm(string_value = "solo_single")]
    SoloSingle,
    /// Two members sharing one session
    #[sea_orm(string_value = "buddy")]
    Buddy,
    /// Session held at the member's home
    #[sea_orm(string_value = "house_call")]
    HouseCall,
}

/// PT session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pt_sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Coach leading the session
    pub coach_id: i64,
    /// Member taking the session
    pub member_id: i64,
    /// When the session is scheduled to take place
    pub scheduled_at: DateTimeUtc,
    /// Planned duration in minutes
    pub duration_minutes: i32,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Commercial session type
    pub session_type: SessionType,
    /// Price charged to the member, if priced at booking time
    pub session_price: Option<f64>,
    /// Explicit coach commission, if one was set
    pub commission_amount: Option<f64>,
    /// Whether the coach has confirmed the session took place
    pub coach_verified: bool,
    /// When the coach verified
    pub verification_date: Option<DateTimeUtc>,
    /// Whether the member has confirmed the session took place
    pub member_verified: bool,
    /// Whether an admin has approved the commission for payment
    pub payment_approved: bool,
    /// Admin who approved the payment
    pub approved_by: Option<i64>,
    /// When the payment was approved
    pub approved_at: Option<DateTimeUtc>,
    /// Commission amount locked in at approval time
    pub payment_amount: Option<f64>,
    /// Prepaid package this session draws from, if any
    pub package_id: Option<i64>,
    /// Actor who cancelled the session
    pub cancelled_by: Option<i64>,
    /// Reason given at cancellation; required non-empty
    pub cancellation_reason: Option<String>,
    /// When the session was cancelled
    pub cancelled_at: Option<DateTimeUtc>,
    /// Coach who last edited the session
    pub edited_by: Option<i64>,
    /// When the session was last edited
    pub edited_at: Option<DateTimeUtc>,
    /// Number of edits applied since booking
    pub edit_count: i32,
    /// Free-form coach notes
    pub notes: Option<String>,
}

/// Defines relationships between PT sessions and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session may draw from one prepaid package
    #[sea_orm(
        belongs_to = "super::pt_package::Entity",
        from = "Column::PackageId",
        to = "super::pt_package::Column::Id"
    )]
    Package,
    /// Each session is led by one coach
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CoachId",
        to = "super::user::Column::Id"
    )]
    Coach,
}

impl Related<super::pt_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coach.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
