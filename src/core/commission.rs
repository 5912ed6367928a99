//! Commission resolution - the single source of truth for what a coach
//! earns from a PT session.
//!
//! Every component that needs a session's commission calls
//! [`resolve_commission`] rather than re-deriving the amount, so the
//! fallback chain can only diverge in one place.

use crate::config::payroll::PayrollConfig;
use crate::entities::pt_session;

/// Resolves the coach commission for a session.
///
/// Fallback chain: the locked-in `payment_amount` if the session was
/// approved, else the explicit `commission_amount` if one was set, else the
/// configured share of the session price (with the configured default price
/// standing in when the session is unpriced).
///
/// Pure and total. Malformed inputs (a negative price) propagate as-is;
/// rejecting them is a business-rule concern upstream, not the resolver's.
#[must_use]
pub fn resolve_commission(session: &pt_session::Model, config: &PayrollConfig) -> f64 {
    if let Some(amount) = session.payment_amount {
        return amount;
    }
    if let Some(amount) = session.commission_amount {
        return amount;
    }
    session.session_price.unwrap_or(config.default_session_price) * config.default_commission_rate
}

/// Rounds a currency amount to 2 decimal places.
#[must_use]
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
