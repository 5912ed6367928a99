//! Notification entity - Records handed to the external dispatch mechanism.
//!
//! The core constructs these on cancellation and edit events; delivery,
//! retry, and read-state UI live outside this crate. `notification_type`
//! values: `"session_cancelled"`, `"session_edited"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipient user
    pub user_id: i64,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Kind of event: `"session_cancelled"` or `"session_edited"`
    pub notification_type: String,
    /// Read flag; always false at creation
    pub is_read: bool,
    /// When the notification was created
    pub created_at: DateTimeUtc,
}

/// Notifications reference their recipient only by id; no modeled relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
