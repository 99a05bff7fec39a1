//! Host representations of EDM values.
//!
//! A literal is parsed into an [`EdmValue`], whose variant is the Rust type
//! holding it. [`HostType`] names those variants so callers can ask for a
//! specific representation.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::limits::MAX_YEAR_MAGNITUDE;
use crate::util::datetime::{
    date_to_days, days_in_month, days_to_date, NANOS_PER_SECOND, SECONDS_PER_DAY,
};

/// Rust types a value can be represented as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Bool,
    U8,
    I8,
    I16,
    I32,
    I64,
    Decimal,
    F64,
    F32,
    String,
    Uuid,
    Bytes,
    Date,
    DateTimeOffset,
    TimeOfDay,
    Duration,
}

impl HostType {
    /// Returns true for the fixed-width integer representations.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            HostType::U8 | HostType::I8 | HostType::I16 | HostType::I32 | HostType::I64
        )
    }
}

/// Calendar date without offset, stored as days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    days: i64,
}

impl Date {
    /// Creates a date from (year, month, day); `None` if the date does not exist.
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Option<Self> {
        if year.abs() > MAX_YEAR_MAGNITUDE || !(1..=12).contains(&month) {
            return None;
        }
        if day < 1 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self {
            days: date_to_days(year, month, day),
        })
    }

    /// Creates a date from days since 1970-01-01.
    pub fn from_days(days: i64) -> Option<Self> {
        let (year, _, _) = days_to_date(days);
        (year.abs() <= MAX_YEAR_MAGNITUDE).then_some(Self { days })
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    /// Returns (year, month, day).
    pub fn ymd(&self) -> (i64, u32, u32) {
        days_to_date(self.days)
    }
}

/// Time of day with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    nanos: u64,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { nanos: 0 };

    /// Creates a time of day; `None` if any component is out of range.
    pub fn from_hms_nano(hour: u32, minute: u32, second: u32, nano: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || i64::from(nano) >= NANOS_PER_SECOND {
            return None;
        }
        let seconds = u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second);
        Some(Self {
            nanos: seconds * NANOS_PER_SECOND as u64 + u64::from(nano),
        })
    }

    /// Nanoseconds since midnight.
    pub fn nanos_since_midnight(&self) -> u64 {
        self.nanos
    }

    /// Returns (hour, minute, second, nanosecond).
    pub fn hms_nano(&self) -> (u32, u32, u32, u32) {
        let nano = (self.nanos % NANOS_PER_SECOND as u64) as u32;
        let seconds = self.nanos / NANOS_PER_SECOND as u64;
        (
            (seconds / 3600) as u32,
            (seconds / 60 % 60) as u32,
            (seconds % 60) as u32,
            nano,
        )
    }
}

/// An instant with the UTC offset it was written in.
///
/// Two values denoting the same instant in different offsets are distinct:
/// the offset is part of the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTimeOffset {
    /// Seconds since 1970-01-01T00:00:00Z.
    epoch_seconds: i64,
    /// Sub-second nanoseconds (0 to 999,999,999).
    nanos: u32,
    /// Signed UTC offset in minutes (e.g., +330 for +05:30).
    offset_min: i16,
}

impl DateTimeOffset {
    /// Creates a value from its UTC instant and offset; `None` if out of range.
    pub fn new(epoch_seconds: i64, nanos: u32, offset_min: i16) -> Option<Self> {
        if i64::from(nanos) >= NANOS_PER_SECOND
            || offset_min.abs() > crate::limits::MAX_OFFSET_MINUTES
        {
            return None;
        }
        let value = Self {
            epoch_seconds,
            nanos,
            offset_min,
        };
        let (local_days, _) = value.local_days_and_seconds();
        Date::from_days(local_days).map(|_| value)
    }

    /// Creates a value from local wall-clock fields and the offset they are in.
    pub fn from_local(date: Date, time: TimeOfDay, offset_min: i16) -> Option<Self> {
        let local_seconds = date.days() * SECONDS_PER_DAY
            + (time.nanos_since_midnight() / NANOS_PER_SECOND as u64) as i64;
        let nanos = (time.nanos_since_midnight() % NANOS_PER_SECOND as u64) as u32;
        // local time = UTC + offset, so UTC = local - offset
        Self::new(local_seconds - i64::from(offset_min) * 60, nanos, offset_min)
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    pub fn offset_minutes(&self) -> i16 {
        self.offset_min
    }

    fn local_days_and_seconds(&self) -> (i64, i64) {
        let local = self.epoch_seconds + i64::from(self.offset_min) * 60;
        (
            local.div_euclid(SECONDS_PER_DAY),
            local.rem_euclid(SECONDS_PER_DAY),
        )
    }

    /// Returns the local wall-clock date and time in this value's offset.
    pub fn local(&self) -> (Date, TimeOfDay) {
        let (days, seconds) = self.local_days_and_seconds();
        let date = Date { days };
        let time = TimeOfDay {
            nanos: seconds as u64 * NANOS_PER_SECOND as u64 + u64::from(self.nanos),
        };
        (date, time)
    }
}

/// Signed elapsed time with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration {
    nanos: i128,
}

impl Duration {
    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    pub const fn total_nanos(&self) -> i128 {
        self.nanos
    }
}

/// A value in one of its host representations.
#[derive(Debug, Clone, PartialEq)]
pub enum EdmValue {
    Bool(bool),
    U8(u8),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Decimal(Decimal),
    F64(f64),
    F32(f32),
    String(String),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    Date(Date),
    DateTimeOffset(DateTimeOffset),
    TimeOfDay(TimeOfDay),
    Duration(Duration),
}

impl EdmValue {
    /// Returns the host type of this value.
    pub fn host_type(&self) -> HostType {
        match self {
            EdmValue::Bool(_) => HostType::Bool,
            EdmValue::U8(_) => HostType::U8,
            EdmValue::I8(_) => HostType::I8,
            EdmValue::I16(_) => HostType::I16,
            EdmValue::I32(_) => HostType::I32,
            EdmValue::I64(_) => HostType::I64,
            EdmValue::Decimal(_) => HostType::Decimal,
            EdmValue::F64(_) => HostType::F64,
            EdmValue::F32(_) => HostType::F32,
            EdmValue::String(_) => HostType::String,
            EdmValue::Uuid(_) => HostType::Uuid,
            EdmValue::Bytes(_) => HostType::Bytes,
            EdmValue::Date(_) => HostType::Date,
            EdmValue::DateTimeOffset(_) => HostType::DateTimeOffset,
            EdmValue::TimeOfDay(_) => HostType::TimeOfDay,
            EdmValue::Duration(_) => HostType::Duration,
        }
    }

    /// Widens a fixed-width integer value to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            EdmValue::U8(v) => Some(i64::from(v)),
            EdmValue::I8(v) => Some(i64::from(v)),
            EdmValue::I16(v) => Some(i64::from(v)),
            EdmValue::I32(v) => Some(i64::from(v)),
            EdmValue::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Narrows an i64 into the requested integer host type.
    ///
    /// Returns `None` if `target` is not an integer type or the value does not fit.
    pub fn from_i64(value: i64, target: HostType) -> Option<EdmValue> {
        match target {
            HostType::U8 => u8::try_from(value).ok().map(EdmValue::U8),
            HostType::I8 => i8::try_from(value).ok().map(EdmValue::I8),
            HostType::I16 => i16::try_from(value).ok().map(EdmValue::I16),
            HostType::I32 => i32::try_from(value).ok().map(EdmValue::I32),
            HostType::I64 => Some(EdmValue::I64(value)),
            _ => None,
        }
    }
}

/// A Rust type usable as the host representation of an EDM value.
pub trait HostValue: Sized {
    /// The host type this Rust type corresponds to.
    const HOST_TYPE: HostType;

    /// Extracts the Rust value if `value` has this host type.
    fn from_edm_value(value: EdmValue) -> Option<Self>;
}

macro_rules! host_value {
    ($ty:ty, $variant:ident) => {
        impl HostValue for $ty {
            const HOST_TYPE: HostType = HostType::$variant;

            fn from_edm_value(value: EdmValue) -> Option<Self> {
                match value {
                    EdmValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for EdmValue {
            fn from(v: $ty) -> Self {
                EdmValue::$variant(v)
            }
        }
    };
}

host_value!(bool, Bool);
host_value!(u8, U8);
host_value!(i8, I8);
host_value!(i16, I16);
host_value!(i32, I32);
host_value!(i64, I64);
host_value!(Decimal, Decimal);
host_value!(f64, F64);
host_value!(f32, F32);
host_value!(String, String);
host_value!(Uuid, Uuid);
host_value!(Vec<u8>, Bytes);
host_value!(Date, Date);
host_value!(DateTimeOffset, DateTimeOffset);
host_value!(TimeOfDay, TimeOfDay);
host_value!(Duration, Duration);

impl From<&str> for EdmValue {
    fn from(v: &str) -> Self {
        EdmValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_i64_ranges() {
        assert_eq!(EdmValue::from_i64(65, HostType::I8), Some(EdmValue::I8(65)));
        assert_eq!(EdmValue::from_i64(300, HostType::I8), None);
        assert_eq!(EdmValue::from_i64(-1, HostType::U8), None);
        assert_eq!(EdmValue::from_i64(255, HostType::U8), Some(EdmValue::U8(255)));
        assert_eq!(EdmValue::from_i64(1, HostType::String), None);
    }

    #[test]
    fn test_date_components() {
        let date = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(date.ymd(), (2024, 2, 29));
        assert!(Date::from_ymd(2023, 2, 29).is_none());
        assert!(Date::from_ymd(1_000_000, 1, 1).is_none());
    }

    #[test]
    fn test_time_of_day_components() {
        let time = TimeOfDay::from_hms_nano(23, 59, 59, 999_999_999).unwrap();
        assert_eq!(time.hms_nano(), (23, 59, 59, 999_999_999));
        assert!(TimeOfDay::from_hms_nano(24, 0, 0, 0).is_none());
    }

    #[test]
    fn test_date_time_offset_local() {
        // 2024-03-15T14:30:00+05:30 is 2024-03-15T09:00:00Z
        let date = Date::from_ymd(2024, 3, 15).unwrap();
        let time = TimeOfDay::from_hms_nano(14, 30, 0, 0).unwrap();
        let value = DateTimeOffset::from_local(date, time, 330).unwrap();
        assert_eq!(value.epoch_seconds(), 1_710_493_200);
        assert_eq!(value.local(), (date, time));

        // Before the epoch
        let value = DateTimeOffset::new(-1, 0, 0).unwrap();
        let (date, time) = value.local();
        assert_eq!(date.ymd(), (1969, 12, 31));
        assert_eq!(time.hms_nano(), (23, 59, 59, 0));
    }

    #[test]
    fn test_host_value_extraction() {
        assert_eq!(i16::from_edm_value(EdmValue::I16(7)), Some(7));
        assert_eq!(i16::from_edm_value(EdmValue::I32(7)), None);
        assert_eq!(EdmValue::from(String::from("a")).host_type(), HostType::String);
        assert!(HostType::I8.is_integer());
        assert!(!HostType::Decimal.is_integer());
    }
}
