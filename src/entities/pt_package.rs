//! PT package entity - A prepaid bundle of personal-training sessions.
//!
//! Owned by the member; referenced by sessions via `package_id`. The usage
//! counter is advanced only as a side effect of payment approval, one unit
//! per approved session, and must never exceed `total_sessions`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a prepaid package
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PackageStatus {
    /// Sessions remain to be used
    #[sea_orm(string_value = "active")]
    Active,
    /// All sessions consumed
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Lapsed before full use
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// PT package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pt_packages")]
pub struct Model {
    /// Unique identifier for the package
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who owns the package
    pub user_id: i64,
    /// Total number of sessions purchased
    pub total_sessions: i32,
    /// Number of sessions consumed so far
    pub sessions_used: i32,
    /// Lifecycle status
    pub status: PackageStatus,
}

/// Defines relationships between packages and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One package covers many sessions
    #[sea_orm(has_many = "super::pt_session::Entity")]
    Sessions,
}

impl Related<super::pt_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
