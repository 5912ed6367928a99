//! Payroll business-rule configuration.
//!
//! Every rate and percentage the payroll core applies lives here rather
//! than in the computation code: the statutory CPF rate, the default
//! session price and commission share used by the resolver fallback chain,
//! the per-session-type commission table applied on edits, and the UTC
//! offset of the gym's business timezone. Values load from `config.toml`,
//! with each field falling back to its built-in default when absent, so
//! tests and deployments can vary jurisdictional rules without touching
//! logic.

use crate::entities::pt_session::SessionType;
use crate::errors::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Payroll configuration, typically parsed from config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Flat statutory CPF rate applied to gross pay at generation time
    #[serde(default = "default_cpf_rate")]
    pub cpf_rate: f64,
    /// Session price assumed when a session carries no explicit price
    #[serde(default = "default_session_price")]
    pub default_session_price: f64,
    /// Coach share of the session price when no explicit commission is set
    #[serde(default = "default_commission_rate")]
    pub default_commission_rate: f64,
    /// Fixed commission amounts per session type, applied on session edits
    #[serde(default)]
    pub session_rates: SessionRateTable,
    /// UTC offset of the gym's business timezone, in whole hours
    #[serde(default = "default_utc_offset_hours")]
    pub business_utc_offset_hours: i32,
}

/// Fixed commission amount per session type.
///
/// Applied when a coach edits a session: the commission is recomputed from
/// this table keyed by the (possibly new) session type, independent of any
/// coach-specific rate configured elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRateTable {
    /// Commission for a package-drawn solo session
    #[serde(default = "default_solo_package_rate")]
    pub solo_package: f64,
    /// Commission for an individually paid solo session
    #[serde(default = "default_solo_single_rate")]
    pub solo_single: f64,
    /// Commission for a buddy session
    #[serde(default = "default_buddy_rate")]
    pub buddy: f64,
    /// Commission for a house-call session
    #[serde(default = "default_house_call_rate")]
    pub house_call: f64,
}

impl SessionRateTable {
    /// Looks up the fixed commission for a session type.
    #[must_use]
    pub const fn rate_for(&self, session_type: SessionType) -> f64 {
        match session_type {
            SessionType::SoloPackage => self.solo_package,
            SessionType::SoloSingle => self.solo_single,
            SessionType::Buddy => self.buddy,
            SessionType::HouseCall => self.house_call,
        }
    }
}

impl Default for SessionRateTable {
    fn default() -> Self {
        Self {
            solo_package: default_solo_package_rate(),
            solo_single: default_solo_single_rate(),
            buddy: default_buddy_rate(),
            house_call: default_house_call_rate(),
        }
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            cpf_rate: default_cpf_rate(),
            default_session_price: default_session_price(),
            default_commission_rate: default_commission_rate(),
            session_rates: SessionRateTable::default(),
            business_utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl PayrollConfig {
    /// Returns the business timezone as a fixed offset.
    ///
    /// An out-of-range configured offset falls back to UTC.
    #[must_use]
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business_utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

const fn default_cpf_rate() -> f64 {
    0.17
}

const fn default_session_price() -> f64 {
    90.0
}

const fn default_commission_rate() -> f64 {
    0.5
}

const fn default_solo_package_rate() -> f64 {
    40.0
}

const fn default_solo_single_rate() -> f64 {
    50.0
}

const fn default_buddy_rate() -> f64 {
    60.0
}

const fn default_house_call_rate() -> f64 {
    70.0
}

const fn default_utc_offset_hours() -> i32 {
    8
}

/// Loads payroll configuration from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PayrollConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads payroll configuration from the given path, falling back to the
/// built-in defaults when the file does not exist. A malformed file is
/// still an error.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<PayrollConfig> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        info!("no payroll config file found, using built-in defaults");
        Ok(PayrollConfig::default())
    }
}
