//! ISO 8601 date/time fragment parsing and civil calendar arithmetic.
//!
//! The temporal primitive kinds compose these fragments:
//! - Date: `-?YYYY+-MM-DD`
//! - TimeOfDay: `HH:MM(:SS(.f+)?)?`
//! - DateTimeOffset: date `T` time offset
//! - Offsets: `Z` or `+HH:MM` / `-HH:MM`

use crate::limits::{MAX_FRACTIONAL_SECONDS_DIGITS, MAX_OFFSET_MINUTES};

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Error type for ISO 8601 fragment parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

fn error(message: impl Into<String>) -> DateTimeParseError {
    DateTimeParseError {
        message: message.into(),
    }
}

/// Calendar date fields as written in a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

/// Time-of-day fields as written in a literal.
///
/// `fraction` holds the raw fractional-second digits, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields<'a> {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub fraction: Option<&'a str>,
}

/// Counts the leading ASCII digits of `s`.
fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Parses exactly two ASCII digits at the start of `s`.
fn two_digits(s: &str, what: &str) -> Result<u32, DateTimeParseError> {
    match s.as_bytes() {
        [hi, lo, ..] if hi.is_ascii_digit() && lo.is_ascii_digit() => {
            Ok(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        }
        _ => Err(error(format!("expected two-digit {}", what))),
    }
}

/// Parses the date fragment at the start of `s`, returning the fields and the rest.
pub fn split_date(s: &str) -> Result<(DateFields, &str), DateTimeParseError> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let year_len = leading_digits(unsigned);
    if year_len < 4 {
        return Err(error(format!("Invalid year in date: {}", s)));
    }
    let magnitude: i64 = unsigned[..year_len]
        .parse()
        .map_err(|_| error(format!("Invalid year in date: {}", s)))?;
    let year = if negative { -magnitude } else { magnitude };

    let rest = &unsigned[year_len..];
    let rest = rest
        .strip_prefix('-')
        .ok_or_else(|| error(format!("Invalid date: {}", s)))?;
    let month = two_digits(rest, "month")?;
    let rest = rest[2..]
        .strip_prefix('-')
        .ok_or_else(|| error(format!("Invalid date: {}", s)))?;
    let day = two_digits(rest, "day")?;

    if !(1..=12).contains(&month) {
        return Err(error(format!("Invalid month in date: {}", s)));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(error(format!("Invalid day in date: {}", s)));
    }

    Ok((DateFields { year, month, day }, &rest[2..]))
}

/// Parses a complete date literal.
pub fn parse_date(s: &str) -> Result<DateFields, DateTimeParseError> {
    match split_date(s)? {
        (fields, "") => Ok(fields),
        _ => Err(error(format!("Trailing characters in date: {}", s))),
    }
}

/// Parses the time fragment at the start of `s`, returning the fields and the rest.
pub fn split_time(s: &str) -> Result<(TimeFields<'_>, &str), DateTimeParseError> {
    let hour = two_digits(s, "hours")?;
    let rest = s[2..]
        .strip_prefix(':')
        .ok_or_else(|| error(format!("Invalid time: {}", s)))?;
    let minute = two_digits(rest, "minutes")?;
    let mut rest = &rest[2..];

    let mut second = 0;
    let mut fraction = None;
    if let Some(after_colon) = rest.strip_prefix(':') {
        second = two_digits(after_colon, "seconds")?;
        rest = &after_colon[2..];

        if let Some(after_dot) = rest.strip_prefix('.') {
            let len = leading_digits(after_dot);
            if len == 0 || len > MAX_FRACTIONAL_SECONDS_DIGITS {
                return Err(error(format!("Invalid fractional seconds in time: {}", s)));
            }
            fraction = Some(&after_dot[..len]);
            rest = &after_dot[len..];
        }
    }

    if hour > 23 {
        return Err(error(format!("Invalid hours in time: {}", s)));
    }
    if minute > 59 {
        return Err(error(format!("Invalid minutes in time: {}", s)));
    }
    if second > 59 {
        return Err(error(format!("Invalid seconds in time: {}", s)));
    }

    Ok((
        TimeFields {
            hour,
            minute,
            second,
            fraction,
        },
        rest,
    ))
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
pub fn parse_offset(offset: &str) -> Result<i16, DateTimeParseError> {
    if offset == "Z" {
        return Ok(0);
    }

    if offset.len() != 6 || !offset.is_ascii() {
        return Err(error(format!("Invalid timezone offset: {}", offset)));
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(error(format!("Invalid timezone offset: {}", offset))),
    };

    if offset.as_bytes()[3] != b':' {
        return Err(error(format!("Invalid timezone offset: {}", offset)));
    }

    let hours = two_digits(&offset[1..3], "offset hours")? as i16;
    let minutes = two_digits(&offset[4..6], "offset minutes")? as i16;

    // 24:00 is allowed as the outer bound
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(error(format!("Invalid timezone offset: {}", offset)));
    }

    let total_minutes = sign * (hours * 60 + minutes);
    if total_minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(error(format!(
            "Timezone offset out of range [-24:00, +24:00]: {}",
            offset
        )));
    }

    Ok(total_minutes)
}

/// Formats an offset in minutes as a timezone string (Z, +HH:MM, -HH:MM).
pub fn format_offset(offset_min: i16) -> String {
    if offset_min == 0 {
        return "Z".to_string();
    }

    let sign = if offset_min >= 0 { '+' } else { '-' };
    let abs_offset = offset_min.abs();
    let hours = abs_offset / 60;
    let minutes = abs_offset % 60;

    format!("{}{:02}:{:02}", sign, hours, minutes)
}

/// Converts fractional-second digits to nanoseconds.
///
/// Returns `None` for anything but ASCII digits, or if a non-zero digit lies
/// beyond nanosecond resolution.
pub fn fraction_to_nanos(digits: &str) -> Option<u32> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (kept, dropped) = digits.split_at(digits.len().min(9));
    if dropped.bytes().any(|b| b != b'0') {
        return None;
    }
    let mut nanos: u32 = 0;
    for b in kept.bytes() {
        nanos = nanos * 10 + u32::from(b - b'0');
    }
    Some(nanos * 10u32.pow((9 - kept.len()) as u32))
}

/// Formats nanoseconds as fractional seconds, omitting the fraction if zero.
pub fn format_fraction(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }

    // Convert to 9-digit string and trim trailing zeros
    let digits = format!("{:09}", nanos);
    format!(".{}", digits.trim_end_matches('0'))
}

/// Returns true if the given year is a leap year.
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
pub fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date (Howard Hinnant's algorithm).
pub fn date_to_days(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 {
        i64::from(month) + 9
    } else {
        i64::from(month) - 3
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // year of era
    let doy = (153 * m + 2) / 5 + i64::from(day) - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146097 + doe - 719468
}

/// Converts days since Unix epoch to (year, month, day).
pub fn days_to_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32; // day
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32; // month

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Formats a year with at least four digits and a leading minus for negative years.
pub fn format_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", -year)
    } else {
        format!("{:04}", year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_date_basic() {
        let (fields, rest) = split_date("2024-03-15T10:00").unwrap();
        assert_eq!(
            fields,
            DateFields {
                year: 2024,
                month: 3,
                day: 15
            }
        );
        assert_eq!(rest, "T10:00");

        let fields = parse_date("-0044-03-15").unwrap();
        assert_eq!(fields.year, -44);

        let fields = parse_date("12345-01-01").unwrap();
        assert_eq!(fields.year, 12345);
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_date("2024-13-01").is_err()); // invalid month
        assert!(parse_date("2024-00-01").is_err()); // invalid month
        assert!(parse_date("2024-02-30").is_err()); // invalid day
        assert!(parse_date("2023-02-29").is_err()); // not a leap year
        assert!(parse_date("024-02-01").is_err()); // short year
        assert!(parse_date("2024-2-01").is_err());
        assert!(parse_date("2024-02-01Z").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_split_time() {
        let (fields, rest) = split_time("14:30").unwrap();
        assert_eq!((fields.hour, fields.minute, fields.second), (14, 30, 0));
        assert_eq!(fields.fraction, None);
        assert_eq!(rest, "");

        let (fields, rest) = split_time("14:30:05.250+01:00").unwrap();
        assert_eq!(fields.second, 5);
        assert_eq!(fields.fraction, Some("250"));
        assert_eq!(rest, "+01:00");
    }

    #[test]
    fn test_invalid_times() {
        assert!(split_time("24:00:00").is_err()); // invalid hour
        assert!(split_time("14:60:00").is_err()); // invalid minute
        assert!(split_time("14:30:60").is_err()); // invalid second
        assert!(split_time("14:30:00.").is_err()); // empty fraction
        assert!(split_time("14:30:00.1234567890123").is_err()); // 13 digits
        assert!(split_time("not:a:time").is_err());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(parse_offset("Z").unwrap(), 0);
        assert_eq!(parse_offset("+05:30").unwrap(), 330);
        assert_eq!(parse_offset("-08:00").unwrap(), -480);
        assert!(parse_offset("+24:00").is_ok());
        assert!(parse_offset("+24:01").is_err()); // out of range
        assert!(parse_offset("z").is_err());
        assert!(parse_offset("+0530").is_err());

        assert_eq!(format_offset(0), "Z");
        assert_eq!(format_offset(330), "+05:30");
        assert_eq!(format_offset(-480), "-08:00");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(fraction_to_nanos("5"), Some(500_000_000));
        assert_eq!(fraction_to_nanos("123456789"), Some(123_456_789));
        assert_eq!(fraction_to_nanos("123456789000"), Some(123_456_789));
        assert_eq!(fraction_to_nanos("1234567891"), None);
        assert_eq!(format_fraction(0), "");
        assert_eq!(format_fraction(500_000_000), ".5");
        assert_eq!(format_fraction(123_456_789), ".123456789");
        assert_eq!(fraction_to_nanos("\u{661}\u{661}\u{661}\u{661}\u{661}"), None);
        assert_eq!(fraction_to_nanos("12a"), None);
    }

    #[test]
    fn test_days_roundtrip() {
        assert_eq!(date_to_days(1970, 1, 1), 0);
        assert_eq!(date_to_days(2024, 3, 15), 19797);
        assert_eq!(days_to_date(19797), (2024, 3, 15));
        assert_eq!(days_to_date(-1), (1969, 12, 31));
        for days in [-800_000, -1, 0, 59, 10_957, 2_932_896] {
            let (y, m, d) = days_to_date(days);
            assert_eq!(date_to_days(y, m, d), days);
        }
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(2024), "2024");
        assert_eq!(format_year(44), "0044");
        assert_eq!(format_year(-44), "-0044");
        assert_eq!(format_year(12345), "12345");
    }
}
