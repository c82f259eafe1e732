//! Rendering of workbook cells as the text the sheet shows

use calamine::{Data, ExcelDateTime};
use chrono::DateTime;

/// Days between the spreadsheet epoch (1899-12-30) and the unix epoch
const UNIX_EPOCH_SERIAL: i64 = 25_569;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Last serial the spreadsheet accepts (31/12/9999 23:59:59)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.999_99;

/// Nudge so that serials stored as 0.99999999 of a minute do not round down
const SERIAL_EPSILON: f64 = 1e-7;

/// Text of one workbook cell
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_excel_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Integer-valued numbers lose the trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_excel_datetime(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        format_duration(value.as_f64())
    } else {
        format_excel_serial(value.as_f64())
    }
}

/// Serial date (days since 1899-12-30, fraction = time of day) as `dd/mm/yyyy hh:mm`
///
/// Values outside the spreadsheet's date range are shown as plain numbers.
pub fn format_excel_serial(serial: f64) -> String {
    if !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return format_number(serial);
    }
    let days = serial.floor() as i64 - UNIX_EPOCH_SERIAL;
    let seconds = ((serial - serial.floor() + SERIAL_EPSILON) * SECONDS_PER_DAY).floor() as i64;

    DateTime::from_timestamp(days * 86_400 + seconds, 0)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| format_number(serial))
}

/// Fraction of days as `hh:mm:ss`; hours may exceed 24
fn format_duration(days: f64) -> String {
    if !(-MAX_EXCEL_SERIAL..=MAX_EXCEL_SERIAL).contains(&days) {
        return format_number(days);
    }
    let total = (days * SECONDS_PER_DAY).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_with_time_of_day() {
        assert_eq!(format_excel_serial(45292.5), "01/01/2024 12:00");
    }

    #[test]
    fn test_serial_without_time() {
        assert_eq!(format_excel_serial(45414.0), "02/05/2024 00:00");
    }

    #[test]
    fn test_serial_just_below_a_minute_rounds_up() {
        // 08:30 stored with floating point noise
        let serial = 45292.0 + (8.0 * 60.0 + 30.0) / 1440.0 - 1e-9;
        assert_eq!(format_excel_serial(serial), "01/01/2024 08:30");
    }

    #[test]
    fn test_duration() {
        assert_eq!(format_duration(1.5), "36:00:00");
        assert_eq!(format_duration(0.0625), "01:30:00");
    }

    #[test]
    fn test_out_of_range_serial_falls_back_to_number() {
        assert_eq!(format_excel_serial(1e20), format_number(1e20));
        assert_eq!(format_excel_serial(-1.0), "-1");
        assert_eq!(format_excel_serial(f64::NAN), "NaN");
        assert_eq!(format_excel_serial(2_958_465.0), "31/12/9999 00:00");
    }

    #[test]
    fn test_out_of_range_duration_falls_back_to_number() {
        assert_eq!(format_duration(-1e20), format_number(-1e20));
        assert_eq!(format_duration(f64::INFINITY), "inf");
        assert_eq!(format_duration(-0.5), "-12:00:00");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-12.0), "-12");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_text(&Data::String(" A ".into())), " A ");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }
}
