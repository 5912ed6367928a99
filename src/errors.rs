//! Unified error type for the payroll core.
//!
//! Single-item operations abort with one of these variants. Bulk operations
//! downgrade the same conditions to per-item entries in their summary
//! structs and keep going; the batch call itself only fails on the
//! surrounding infrastructure (database, I/O).

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A business-rule precondition was violated (bad input, illegal state
    /// transition, missing coach).
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the violated rule
        message: String,
    },

    /// A monetary amount was outside its legal range.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A payslip already exists for this coach and period.
    #[error("payslip already exists for coach {coach_id} in {month}/{year}")]
    DuplicatePayslip {
        /// Coach the payslip belongs to
        coach_id: i64,
        /// Target month (1-12)
        month: u32,
        /// Target year
        year: i32,
    },

    /// The coach has no (or an incomplete) employment profile.
    #[error("no employment profile for coach {coach_id}")]
    ProfileMissing {
        /// Coach missing the profile
        coach_id: i64,
    },

    /// No PT session with this id.
    #[error("session {id} not found")]
    SessionNotFound {
        /// Session primary key
        id: i64,
    },

    /// No PT package with this id.
    #[error("package {id} not found")]
    PackageNotFound {
        /// Package primary key
        id: i64,
    },

    /// No payslip with this id.
    #[error("payslip {id} not found")]
    PayslipNotFound {
        /// Payslip primary key
        id: i64,
    },

    /// Configuration error (unreadable or invalid config file).
    #[error("configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Database error from the storage layer.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
