mod chart;
mod engine;
mod export;
mod types;

pub use chart::{BalancePoint, ChartStyle, PaymentBar, ScheduleCharts, build_charts};
pub use engine::{compute_schedule, compute_schedule_with_limit, summarize};
pub use export::{CSV_HEADER, EXPORT_FILE_NAME, ExportError, to_csv_string, write_csv};
pub use types::{
    DEFAULT_MAX_YEARS, PERIODS_PER_YEAR, ScheduleError, ScheduleInputs, ScheduleSummary,
    YearRecord,
};
