use serde::Serialize;
use thiserror::Error;

/// Fortnightly payments: the model always simulates 26 periods per year.
pub const PERIODS_PER_YEAR: u32 = 26;

/// Year ceiling used by [`compute_schedule`](super::compute_schedule).
pub const DEFAULT_MAX_YEARS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInputs {
    pub starting_year: i32,
    pub principal_owing: f64,
    pub period_payment: f64,
    pub annual_extra_payment: f64,
    pub annual_rate_percent: f64,
}

/// One simulated year. Money fields are rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year_index: u32,
    pub calendar_year: i32,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub balance_remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub years: u32,
    pub payoff_year: Option<i32>,
    pub total_interest: f64,
    pub total_principal: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(
        "balance of {balance:.2} is not being paid down after {years_simulated} simulated years; \
         increase the payment or the annual extra payment"
    )]
    NonConvergent { years_simulated: u32, balance: f64 },
}

impl ScheduleError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Stable kebab-case tag, used by the API error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InvalidInput { .. } => "invalid-input",
            ScheduleError::NonConvergent { .. } => "non-convergent",
        }
    }
}
