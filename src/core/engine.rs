use super::types::{
    DEFAULT_MAX_YEARS, PERIODS_PER_YEAR, ScheduleError, ScheduleInputs, ScheduleSummary,
    YearRecord,
};

#[derive(Debug, Default, Clone, Copy)]
struct YearFlows {
    interest: f64,
    principal: f64,
}

pub fn compute_schedule(inputs: &ScheduleInputs) -> Result<Vec<YearRecord>, ScheduleError> {
    compute_schedule_with_limit(inputs, DEFAULT_MAX_YEARS)
}

/// Simulates the loan year by year until the balance reaches zero.
///
/// Fails with [`ScheduleError::NonConvergent`] once `max_years` years have been
/// simulated with a balance still owing, or as soon as a full year ends without
/// reducing the balance. The yearly balance map is monotone, so a stalled year
/// can never be followed by progress.
///
/// A year that leaves less than half a unit owing is the final year: the
/// residual is added to that year's principal so no zero-balance record is
/// followed by another year.
pub fn compute_schedule_with_limit(
    inputs: &ScheduleInputs,
    max_years: u32,
) -> Result<Vec<YearRecord>, ScheduleError> {
    validate_inputs(inputs)?;
    if max_years == 0 {
        return Err(ScheduleError::invalid("max_years", "must be > 0"));
    }

    let periodic_rate = inputs.annual_rate_percent / 100.0 / PERIODS_PER_YEAR as f64;
    let mut balance = inputs.principal_owing;
    let mut schedule = Vec::new();
    let mut year_index = 0u32;

    while balance > 0.0 {
        if year_index == max_years {
            return Err(ScheduleError::NonConvergent {
                years_simulated: year_index,
                balance,
            });
        }
        year_index += 1;

        let opening_balance = balance;
        let mut flows = simulate_year(inputs, periodic_rate, &mut balance);
        if balance >= opening_balance {
            return Err(ScheduleError::NonConvergent {
                years_simulated: year_index,
                balance,
            });
        }

        // A sub-unit residual would print as a zero balance; settle it this year.
        if balance > 0.0 && round_whole(balance) == 0.0 {
            flows.principal += balance;
            balance = 0.0;
        }

        schedule.push(YearRecord {
            year_index,
            calendar_year: calendar_year(inputs.starting_year, year_index)?,
            interest_paid: round_whole(flows.interest),
            principal_paid: round_whole(flows.principal),
            balance_remaining: round_whole(balance.max(0.0)),
        });
    }

    Ok(schedule)
}

pub fn summarize(schedule: &[YearRecord]) -> ScheduleSummary {
    ScheduleSummary {
        years: schedule.len() as u32,
        payoff_year: schedule.last().map(|record| record.calendar_year),
        total_interest: schedule.iter().map(|record| record.interest_paid).sum(),
        total_principal: schedule.iter().map(|record| record.principal_paid).sum(),
    }
}

fn simulate_year(inputs: &ScheduleInputs, periodic_rate: f64, balance: &mut f64) -> YearFlows {
    let mut flows = YearFlows::default();

    for _ in 0..PERIODS_PER_YEAR {
        let interest = *balance * periodic_rate;
        let principal = (inputs.period_payment - interest).min(*balance);
        *balance -= principal;
        flows.interest += interest;
        flows.principal += principal;
        if *balance <= 0.0 {
            return flows;
        }
    }

    let lump_sum = inputs.annual_extra_payment.min(*balance);
    *balance -= lump_sum;
    flows.principal += lump_sum;
    flows
}

fn validate_inputs(inputs: &ScheduleInputs) -> Result<(), ScheduleError> {
    for (field, value) in [
        ("principal_owing", inputs.principal_owing),
        ("period_payment", inputs.period_payment),
        ("annual_extra_payment", inputs.annual_extra_payment),
        ("annual_rate_percent", inputs.annual_rate_percent),
    ] {
        if !value.is_finite() {
            return Err(ScheduleError::invalid(field, "must be a finite number"));
        }
    }

    for (field, value) in [
        ("period_payment", inputs.period_payment),
        ("annual_extra_payment", inputs.annual_extra_payment),
        ("annual_rate_percent", inputs.annual_rate_percent),
    ] {
        if value < 0.0 {
            return Err(ScheduleError::invalid(field, "must be >= 0"));
        }
    }

    Ok(())
}

fn calendar_year(starting_year: i32, year_index: u32) -> Result<i32, ScheduleError> {
    i32::try_from(year_index)
        .ok()
        .and_then(|offset| starting_year.checked_add(offset))
        .ok_or_else(|| ScheduleError::invalid("starting_year", "calendar year out of range"))
}

// Ties round to even.
fn round_whole(value: f64) -> f64 {
    value.round_ties_even()
}
