/// Database configuration and connection management
pub mod database;

/// Payroll business-rule configuration from config.toml
pub mod payroll;
