//! Core business logic - framework-agnostic session verification, payment
//! approval, earnings, and payslip operations.

/// Payment approval, package usage side effect, and reconciliation
pub mod approval;
/// Bulk payslip generation across all active coaches
pub mod bulk;
/// Commission resolution fallback chain and currency rounding
pub mod commission;
/// Weekly earnings rollups for coach dashboards
pub mod earnings;
/// Post-generation payslip mutations
pub mod ledger;
/// Notification record construction for the external dispatch sink
pub mod notify;
/// Monthly payslip generation
pub mod payslip;
/// PT session lifecycle operations
pub mod verification;
