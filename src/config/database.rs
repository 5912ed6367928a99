//! Database configuration module for `CoachPay`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{GymClass, Notification, Payslip, PtPackage, PtSession, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/coachpay.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Statements carry `IF NOT EXISTS` so the payroll-close binary can run
/// against an already-initialized database file.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut session_table = schema.create_table_from_entity(PtSession);
    let mut package_table = schema.create_table_from_entity(PtPackage);
    let mut class_table = schema.create_table_from_entity(GymClass);
    let mut payslip_table = schema.create_table_from_entity(Payslip);
    let mut notification_table = schema.create_table_from_entity(Notification);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(session_table.if_not_exists())).await?;
    db.execute(builder.build(package_table.if_not_exists())).await?;
    db.execute(builder.build(class_table.if_not_exists())).await?;
    db.execute(builder.build(payslip_table.if_not_exists())).await?;
    db.execute(builder.build(notification_table.if_not_exists())).await?;

    Ok(())
}
