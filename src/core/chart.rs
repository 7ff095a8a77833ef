use serde::Serialize;

use super::types::YearRecord;

pub const BALANCE_CHART_TITLE: &str = "Mortgage Balance Over Time";
pub const PAYMENTS_CHART_TITLE: &str = "Principal & Interest Paid Over Time";

pub const BALANCE_COLOR: &str = "#90caf9";
pub const PRINCIPAL_COLOR: &str = "#aed581";
pub const INTEREST_COLOR: &str = "#ff7e82";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub year_index: u32,
    pub balance: f64,
}

/// One stacked bar: principal below interest, with the closing balance for
/// the secondary-axis overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBar {
    pub year_index: u32,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    pub balance_title: &'static str,
    pub payments_title: &'static str,
    pub balance_color: &'static str,
    pub principal_color: &'static str,
    pub interest_color: &'static str,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            balance_title: BALANCE_CHART_TITLE,
            payments_title: PAYMENTS_CHART_TITLE,
            balance_color: BALANCE_COLOR,
            principal_color: PRINCIPAL_COLOR,
            interest_color: INTEREST_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCharts {
    pub style: ChartStyle,
    pub balance: Vec<BalancePoint>,
    pub payments: Vec<PaymentBar>,
}

pub fn build_charts(schedule: &[YearRecord]) -> ScheduleCharts {
    ScheduleCharts {
        style: ChartStyle::default(),
        balance: schedule
            .iter()
            .map(|record| BalancePoint {
                year_index: record.year_index,
                balance: record.balance_remaining,
            })
            .collect(),
        payments: schedule
            .iter()
            .map(|record| PaymentBar {
                year_index: record.year_index,
                principal: record.principal_paid,
                interest: record.interest_paid,
                balance: record.balance_remaining,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScheduleInputs, compute_schedule};

    #[test]
    fn series_follow_schedule_order() {
        let inputs = ScheduleInputs {
            starting_year: 2024,
            principal_owing: 300_000.0,
            period_payment: 2_000.0,
            annual_extra_payment: 10_000.0,
            annual_rate_percent: 5.0,
        };
        let schedule = compute_schedule(&inputs).expect("valid inputs");
        let charts = build_charts(&schedule);

        assert_eq!(charts.balance.len(), schedule.len());
        assert_eq!(charts.payments.len(), schedule.len());
        for ((record, point), bar) in schedule.iter().zip(&charts.balance).zip(&charts.payments) {
            assert_eq!(point.year_index, record.year_index);
            assert_eq!(point.balance, record.balance_remaining);
            assert_eq!(bar.year_index, record.year_index);
            assert_eq!(bar.principal, record.principal_paid);
            assert_eq!(bar.interest, record.interest_paid);
            assert_eq!(bar.balance, record.balance_remaining);
        }
    }

    #[test]
    fn empty_schedule_has_empty_series() {
        let charts = build_charts(&[]);
        assert!(charts.balance.is_empty());
        assert!(charts.payments.is_empty());
        assert_eq!(charts.style.balance_title, BALANCE_CHART_TITLE);
    }

    #[test]
    fn chart_serialization_uses_camel_case() {
        let charts = build_charts(&[YearRecord {
            year_index: 1,
            calendar_year: 2025,
            interest_paid: 10.0,
            principal_paid: 90.0,
            balance_remaining: 0.0,
        }]);
        let json = serde_json::to_string(&charts).expect("charts should serialize");
        assert!(json.contains("\"yearIndex\":1"));
        assert!(json.contains("\"principalColor\""));
        assert!(json.contains("\"payments\""));
    }
}
