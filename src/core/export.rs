use thiserror::Error;

use super::types::YearRecord;

pub const EXPORT_FILE_NAME: &str = "mortgage_schedule.csv";

pub const CSV_HEADER: [&str; 5] = [
    "Year",
    "Actual Year",
    "Interest Paid",
    "Principal Paid",
    "Mortgage Balance",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Writes the header row followed by one row per record. Money columns are
/// written as whole numbers.
pub fn write_csv<W: std::io::Write>(schedule: &[YearRecord], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in schedule {
        wtr.write_record([
            record.year_index.to_string(),
            record.calendar_year.to_string(),
            format!("{:.0}", record.interest_paid),
            format!("{:.0}", record.principal_paid),
            format!("{:.0}", record.balance_remaining),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(schedule: &[YearRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(schedule, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
