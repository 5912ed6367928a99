//! Payroll-close job: generates payslips for every active coach for the
//! target period (default: the previous calendar month).

use chrono::{Datelike, NaiveDate, Utc};
use coachpay::config;
use coachpay::core::bulk;
use coachpay::errors::{Error, Result};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load payroll configuration, falling back to built-in defaults
    let payroll_config = config::payroll::load_or_default("config.toml")?;

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db).await?;

    // 5. Resolve the target period and run the close
    let (month, year) = resolve_period()?;
    info!(month, year, "running payroll close");

    let summary = bulk::bulk_generate_payslips(&db, month, year, &payroll_config).await?;
    info!(
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.errors.len(),
        "payroll close finished"
    );
    for failure in &summary.errors {
        warn!(
            coach_id = failure.coach_id,
            coach = %failure.coach_name,
            "payslip generation failed: {}",
            failure.message
        );
    }

    Ok(())
}

/// Resolves the target period from `PAYROLL_PERIOD` (`YYYY-MM`), defaulting
/// to the previous calendar month when unset.
fn resolve_period() -> Result<(u32, i32)> {
    match std::env::var("PAYROLL_PERIOD") {
        Ok(raw) => parse_period(&raw),
        Err(std::env::VarError::NotPresent) => Ok(previous_month(Utc::now().date_naive())),
        Err(e) => Err(e.into()),
    }
}

fn parse_period(raw: &str) -> Result<(u32, i32)> {
    let invalid = || Error::Config {
        message: format!("PAYROLL_PERIOD must be YYYY-MM, got {raw:?}"),
    };

    let (year_part, month_part) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_part.parse().map_err(|_| invalid())?;
    let month: u32 = month_part.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok((month, year))
}

fn previous_month(today: NaiveDate) -> (u32, i32) {
    if today.month() == 1 {
        (12, today.year() - 1)
    } else {
        (today.month() - 1, today.year())
    }
}
