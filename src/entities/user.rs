//! User entity - Members, coaches, and admins of the gym platform.
//!
//! Coaches additionally carry an employment profile (employment type plus
//! the pay field matching it: monthly base salary for full-timers, hourly
//! class rate for part-timers). A coach without an employment type has no
//! profile and cannot be payrolled.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user within the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserRole {
    /// Gym member
    #[sea_orm(string_value = "member")]
    Member,
    /// PT coach / class instructor
    #[sea_orm(string_value = "coach")]
    Coach,
    /// Back-office administrator
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Employment basis of a coach
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EmploymentType {
    /// Salaried; classes are covered by the base salary
    #[sea_orm(string_value = "full_time")]
    FullTime,
    /// Paid per class hour plus PT commission
    #[sea_orm(string_value = "part_time")]
    PartTime,
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub display_name: String,
    /// Platform role
    pub role: UserRole,
    /// Employment basis; None for users without an employment profile
    pub employment_type: Option<EmploymentType>,
    /// Monthly base salary, for full-time coaches
    pub base_salary: Option<f64>,
    /// Hourly class rate, for part-time coaches
    pub rate_per_class: Option<f64>,
    /// Whether the user is active; inactive coaches are skipped by bulk jobs
    pub is_active: bool,
}

/// Defines relationships between users and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A coach leads many PT sessions
    #[sea_orm(has_many = "super::pt_session::Entity")]
    Sessions,
    /// A coach leads many classes
    #[sea_orm(has_many = "super::gym_class::Entity")]
    Classes,
}

impl Related<super::pt_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::gym_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
