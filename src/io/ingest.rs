//! CSV ingest and cleaning.
//!
//! This module turns a heterogeneous CPI export (cache file or remote body) into
//! a clean, date-sorted list of `Observation`s. It never does any math.
//!
//! Cleaning rules:
//! - column names are trimmed and title-cased (`" date"` → `Date`)
//! - `Date` is derived from `Year` + `Month` when absent
//! - `Indicator` falls back to `Item`, then to `"Food CPI"`
//! - rows are filtered to the target country when an `Area` column exists
//! - rows lacking a date or value are dropped
//! - output is sorted by date ascending

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{FOOD_CPI, Observation};
use crate::error::AppError;

/// Options that shape cleaning.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Case-insensitive substring matched against `Area`. `None` keeps every row.
    pub country: Option<String>,
}

/// A row-level problem encountered during ingest. The row is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: cleaned observations plus bookkeeping for logs and reports.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows removed by the country filter or for lacking Date/Value.
    pub rows_dropped: usize,
    /// True when dates were built from `Year` + `Month`.
    pub date_derived: bool,
}

/// Read and clean a CSV file from disk.
pub fn read_observations_csv(path: &Path, options: &CleanOptions) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open cache CSV '{}': {e}", path.display()))
    })?;
    parse_observations(file, options)
}

/// Parse and clean CSV text from any reader.
pub fn parse_observations<R: Read>(reader: R, options: &CleanOptions) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let date_source = resolve_date_source(&header_map)?;
    if !header_map.contains_key("Value") {
        return Err(AppError::input("Data missing Value column; please update data source."));
    }

    let needle = options
        .country
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let filter_area = needle.is_some() && header_map.contains_key("Area");

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let area = get_optional(&record, &header_map, "Area").map(str::to_string);
        if filter_area {
            let keep = match (&area, &needle) {
                (Some(area), Some(needle)) => area.to_lowercase().contains(needle.as_str()),
                _ => false,
            };
            if !keep {
                rows_dropped += 1;
                continue;
            }
        }

        let date = match date_source.read(&record, &header_map) {
            Ok(Some(d)) => d,
            Ok(None) => {
                rows_dropped += 1;
                continue;
            }
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        let value = match get_optional(&record, &header_map, "Value") {
            None => {
                rows_dropped += 1;
                continue;
            }
            Some(raw) => match parse_value(raw) {
                Some(v) => v,
                None => {
                    row_errors.push(RowError {
                        line,
                        message: format!("Invalid Value '{raw}'."),
                    });
                    continue;
                }
            },
        };

        let indicator = get_optional(&record, &header_map, "Indicator")
            .or_else(|| get_optional(&record, &header_map, "Item"))
            .unwrap_or(FOOD_CPI)
            .to_string();

        observations.push(Observation {
            area,
            indicator,
            date,
            value,
        });
    }

    // Stable: rows sharing a date keep file order.
    observations.sort_by_key(|o| o.date);

    for err in &row_errors {
        warn!(line = err.line, "skipped CSV row: {}", err.message);
    }
    debug!(
        rows_read,
        rows_kept = observations.len(),
        rows_dropped,
        row_errors = row_errors.len(),
        "cleaned CPI observations"
    );

    Ok(IngestedData {
        observations,
        row_errors,
        rows_read,
        rows_dropped,
        date_derived: matches!(date_source, DateSource::YearMonth),
    })
}

#[derive(Debug, Clone, Copy)]
enum DateSource {
    Date,
    YearMonth,
}

impl DateSource {
    /// `Ok(None)` means the row has no date (dropped, not an error).
    fn read(self, record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Option<NaiveDate>, String> {
        match self {
            DateSource::Date => get_optional(record, header_map, "Date")
                .map(parse_date)
                .transpose(),
            DateSource::YearMonth => {
                let (Some(year), Some(month)) = (
                    get_optional(record, header_map, "Year"),
                    get_optional(record, header_map, "Month"),
                ) else {
                    return Ok(None);
                };
                year_month_date(year, month).map(Some)
            }
        }
    }
}

fn resolve_date_source(header_map: &HashMap<String, usize>) -> Result<DateSource, AppError> {
    if header_map.contains_key("Date") {
        return Ok(DateSource::Date);
    }
    if header_map.contains_key("Year") && header_map.contains_key("Month") {
        return Ok(DateSource::YearMonth);
    }
    Err(AppError::input("Data missing Date column; please update data source."))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins when two headers normalize to the same name.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

/// Trim, strip a UTF-8 BOM, and title-case each word.
pub(crate) fn normalize_header_name(name: &str) -> String {
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    let mut out = String::with_capacity(name.len());
    let mut start_of_word = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if start_of_word {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(ch);
            start_of_word = true;
        }
    }
    out
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a date and snap it to the first of its month.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let parsed = DATE_FMTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FMTS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok());

    parsed.and_then(first_of_month).ok_or_else(|| {
        format!("Invalid date '{s}'. Expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, YYYY/MM/DD, DD/MM/YYYY or YYYY-MM.")
    })
}

fn year_month_date(year: &str, month: &str) -> Result<NaiveDate, String> {
    let year = parse_whole_number(year).ok_or_else(|| format!("Invalid Year '{year}'."))?;
    let month_num = parse_whole_number(month)
        .and_then(|m| u32::try_from(m).ok())
        .or_else(|| month.parse::<Month>().ok().map(|m| m.number_from_month()))
        .ok_or_else(|| format!("Invalid Month '{month}'."))?;
    let year = i32::try_from(year).map_err(|_| format!("Invalid Year '{year}'."))?;
    NaiveDate::from_ymd_opt(year, month_num, 1)
        .ok_or_else(|| format!("Invalid Year/Month '{year}-{month_num}'."))
}

/// Accept `2024` and `2024.0` (spreadsheet exports often float-format integers).
fn parse_whole_number(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

fn first_of_month(d: NaiveDate) -> Option<NaiveDate> {
    d.with_day(1)
}

fn parse_value(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GENERAL_CPI;

    fn saudi() -> CleanOptions {
        CleanOptions {
            country: Some("Saudi".to_string()),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn header_names_are_title_cased() {
        assert_eq!(normalize_header_name("  date "), "Date");
        assert_eq!(normalize_header_name("\u{feff}AREA"), "Area");
        assert_eq!(normalize_header_name("item code"), "Item Code");
        assert_eq!(normalize_header_name("value"), "Value");
    }

    #[test]
    fn dates_snap_to_first_of_month() {
        assert_eq!(parse_date("2024-03-15").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01 00:00:00").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_date("2024-03").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_date("2024/03/20").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_date("20/03/2024").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_date("2024-03-15T08:30:00").unwrap(), ymd(2024, 3, 1));
        assert!(parse_date("March 2024").is_err());
    }

    #[test]
    fn cleans_filters_and_sorts() {
        let csv = "\
area,indicator,date,value
Saudi Arabia,Food CPI,2024-02-01,101.5
Egypt,Food CPI,2024-01-01,300.0
Saudi Arabia,General CPI,2024-01-01,
Saudi Arabia,Food CPI,2024-01-01,100.0
";
        let data = parse_observations(csv.as_bytes(), &saudi()).unwrap();

        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_dropped, 2);
        assert!(data.row_errors.is_empty());
        let dates: Vec<NaiveDate> = data.observations.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 2, 1)]);
        assert_eq!(data.observations[0].value, 100.0);
        assert_eq!(data.observations[0].area.as_deref(), Some("Saudi Arabia"));
    }

    #[test]
    fn derives_date_from_year_and_month() {
        let csv = "\
Area,Item,Year,Month,Value
Saudi Arabia,General CPI,2023,12,110.0
Saudi Arabia,,2024.0,January,111.0
";
        let data = parse_observations(csv.as_bytes(), &saudi()).unwrap();

        assert!(data.date_derived);
        assert_eq!(data.observations.len(), 2);
        assert_eq!(data.observations[0].indicator, GENERAL_CPI);
        assert_eq!(data.observations[1].date, ymd(2024, 1, 1));
        assert_eq!(data.observations[1].indicator, FOOD_CPI);
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let csv = "Indicator,Value\nFood CPI,100\n";
        let err = parse_observations(csv.as_bytes(), &CleanOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Date"));
    }

    #[test]
    fn no_area_column_keeps_all_rows() {
        let csv = "Date,Value\n2024-01-01,100\n2024-02-01,101\n";
        let data = parse_observations(csv.as_bytes(), &saudi()).unwrap();
        assert_eq!(data.observations.len(), 2);
        assert!(data.observations.iter().all(|o| o.indicator == FOOD_CPI && o.area.is_none()));
    }

    #[test]
    fn bad_cells_become_row_errors() {
        let csv = "Date,Value\nnot-a-date,100\n2024-02-01,abc\n2024-03-01,102\n";
        let data = parse_observations(csv.as_bytes(), &CleanOptions::default()).unwrap();
        assert_eq!(data.observations.len(), 1);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }
}
