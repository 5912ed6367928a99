//! Class entity - Group classes led by coaches.
//!
//! Payroll only needs the hours: the generator sums `duration_minutes`
//! over a coach's classes inside the calendar month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    /// Unique identifier for the class
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Coach leading the class
    pub coach_id: i64,
    /// Class name (e.g., "Spin", "HIIT")
    pub name: String,
    /// When the class takes place
    pub scheduled_at: DateTimeUtc,
    /// Duration in minutes
    pub duration_minutes: i32,
}

/// Defines relationships between classes and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each class is led by one coach
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CoachId",
        to = "super::user::Column::Id"
    )]
    Coach,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coach.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
