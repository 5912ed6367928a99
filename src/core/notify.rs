//! Notification record construction.
//!
//! Cancellation and edit events produce notification rows for the external
//! dispatch mechanism. This core only writes the records; delivery and
//! read-state tracking happen elsewhere. Helpers are generic over
//! [`ConnectionTrait`] so callers can write notifications inside the same
//! transaction as the session mutation that triggered them.

use crate::entities::{User, notification, user};
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

/// Notification type for a cancelled session
pub const TYPE_SESSION_CANCELLED: &str = "session_cancelled";
/// Notification type for an edited session
pub const TYPE_SESSION_EDITED: &str = "session_edited";

/// Writes one unread notification record for a user.
pub async fn notify_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    title: &str,
    message: &str,
    notification_type: &str,
) -> Result<notification::Model> {
    let record = notification::ActiveModel {
        user_id: Set(user_id),
        title: Set(title.to_string()),
        message: Set(message.to_string()),
        notification_type: Set(notification_type.to_string()),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    record.insert(conn).await.map_err(Into::into)
}

/// Writes one unread notification record for every active admin.
/// Returns the number of records written.
pub async fn notify_active_admins<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    message: &str,
    notification_type: &str,
) -> Result<usize> {
    let admins = User::find()
        .filter(user::Column::Role.eq(user::UserRole::Admin))
        .filter(user::Column::IsActive.eq(true))
        .all(conn)
        .await?;

    let count = admins.len();
    for admin in admins {
        notify_user(conn, admin.id, title, message, notification_type).await?;
    }

    Ok(count)
}
