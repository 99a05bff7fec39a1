//! Date, DateTimeOffset, TimeOfDay and Duration.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::LiteralError;
use crate::limits::{HOST_FRACTIONAL_SECONDS_DIGITS, MAX_FRACTIONAL_SECONDS_DIGITS};
use crate::model::{Date, DateTimeOffset, Duration, EdmValue, Facets, HostType, TimeOfDay};
use crate::primitive::PrimitiveTypeKind;
use crate::util::datetime::{
    format_fraction, format_offset, format_year, fraction_to_nanos, parse_date, parse_offset,
    split_date, split_time, DateFields, TimeFields, NANOS_PER_SECOND, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};

lazy_static! {
    static ref DURATION_LITERAL: Regex = Regex::new(&format!(
        r"^(-)?P(?:([0-9]+)D)?(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+)(?:\.([0-9]{{1,{}}}))?S)?)?$",
        MAX_FRACTIONAL_SECONDS_DIGITS
    ))
    .expect("duration literal pattern is valid");
}

/// Fails if the fractional-second digits exceed the Precision facet.
fn check_precision(
    kind: PrimitiveTypeKind,
    fraction: Option<&str>,
    facets: &Facets,
) -> Result<(), LiteralError> {
    let digits = fraction.map_or(0, str::len);
    match facets.precision {
        Some(precision) if digits > precision as usize => Err(LiteralError::PrecisionExceeded {
            type_name: kind.qualified_name(),
            digits,
            precision,
        }),
        _ => Ok(()),
    }
}

fn nanos_of(
    kind: PrimitiveTypeKind,
    literal: &str,
    fraction: Option<&str>,
    target: HostType,
) -> Result<u32, LiteralError> {
    match fraction {
        None => Ok(0),
        Some(digits) => fraction_to_nanos(digits).ok_or_else(|| kind.lossy(literal, target)),
    }
}

fn time_of(
    kind: PrimitiveTypeKind,
    literal: &str,
    fields: &TimeFields<'_>,
    target: HostType,
) -> Result<TimeOfDay, LiteralError> {
    let nanos = nanos_of(kind, literal, fields.fraction, target)?;
    TimeOfDay::from_hms_nano(fields.hour, fields.minute, fields.second, nanos)
        .ok_or_else(|| kind.invalid_literal(literal))
}

fn date_of(
    kind: PrimitiveTypeKind,
    literal: &str,
    fields: DateFields,
    target: HostType,
) -> Result<Date, LiteralError> {
    Date::from_ymd(fields.year, fields.month, fields.day).ok_or_else(|| kind.lossy(literal, target))
}

fn format_date(date: Date) -> String {
    let (year, month, day) = date.ymd();
    format!("{}-{:02}-{:02}", format_year(year), month, day)
}

fn format_time(time: TimeOfDay) -> (String, String) {
    let (hour, minute, second, nano) = time.hms_nano();
    (
        format!("{:02}:{:02}:{:02}", hour, minute, second),
        format_fraction(nano),
    )
}

// =============================================================================
// DATE
// =============================================================================

pub(super) fn check_date(literal: &str) -> Result<(), LiteralError> {
    parse_date(literal)
        .map(|_| ())
        .map_err(|_| PrimitiveTypeKind::Date.invalid_literal(literal))
}

pub(super) fn date_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    let kind = PrimitiveTypeKind::Date;
    let fields = parse_date(literal).map_err(|_| kind.invalid_literal(literal))?;
    match target {
        HostType::Date => date_of(kind, literal, fields, target).map(EdmValue::Date),
        HostType::DateTimeOffset => {
            let date = date_of(kind, literal, fields, target)?;
            DateTimeOffset::from_local(date, TimeOfDay::MIDNIGHT, 0)
                .map(EdmValue::DateTimeOffset)
                .ok_or_else(|| kind.lossy(literal, target))
        }
        _ => Err(kind.target_mismatch(target)),
    }
}

pub(super) fn date_to_string(value: &EdmValue) -> Result<String, LiteralError> {
    match value {
        EdmValue::Date(date) => Ok(format_date(*date)),
        EdmValue::DateTimeOffset(dto) => Ok(format_date(dto.local().0)),
        _ => Err(PrimitiveTypeKind::Date.value_mismatch(value)),
    }
}

// =============================================================================
// DATE TIME OFFSET
// =============================================================================

/// Splits a DateTimeOffset literal into its date, time and offset parts.
fn split_date_time_offset(literal: &str) -> Option<(DateFields, TimeFields<'_>, i16)> {
    let (date, rest) = split_date(literal).ok()?;
    let rest = rest.strip_prefix('T')?;
    let (time, offset) = split_time(rest).ok()?;
    let offset = parse_offset(offset).ok()?;
    Some((date, time, offset))
}

pub(super) fn check_date_time_offset(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    let kind = PrimitiveTypeKind::DateTimeOffset;
    let (_, time, _) = split_date_time_offset(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    check_precision(kind, time.fraction, facets)
}

pub(super) fn date_time_offset_value_of(
    literal: &str,
    target: HostType,
) -> Result<EdmValue, LiteralError> {
    let kind = PrimitiveTypeKind::DateTimeOffset;
    let (date, time, offset) =
        split_date_time_offset(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    if target != HostType::DateTimeOffset {
        return Err(kind.target_mismatch(target));
    }

    let date = date_of(kind, literal, date, target)?;
    let time = time_of(kind, literal, &time, target)?;
    DateTimeOffset::from_local(date, time, offset)
        .map(EdmValue::DateTimeOffset)
        .ok_or_else(|| kind.lossy(literal, target))
}

pub(super) fn date_time_offset_to_string(
    value: &EdmValue,
    facets: &Facets,
) -> Result<String, LiteralError> {
    let kind = PrimitiveTypeKind::DateTimeOffset;
    let EdmValue::DateTimeOffset(dto) = value else {
        return Err(kind.value_mismatch(value));
    };

    let (date, time) = dto.local();
    let (clock, fraction) = format_time(time);
    check_precision(kind, fraction.strip_prefix('.'), facets)?;
    Ok(format!(
        "{}T{}{}{}",
        format_date(date),
        clock,
        fraction,
        format_offset(dto.offset_minutes())
    ))
}

// =============================================================================
// TIME OF DAY
// =============================================================================

fn split_time_of_day(literal: &str) -> Option<TimeFields<'_>> {
    match split_time(literal).ok()? {
        (fields, "") => Some(fields),
        _ => None,
    }
}

pub(super) fn check_time_of_day(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    let kind = PrimitiveTypeKind::TimeOfDay;
    let fields = split_time_of_day(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    check_precision(kind, fields.fraction, facets)
}

pub(super) fn time_of_day_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    let kind = PrimitiveTypeKind::TimeOfDay;
    let fields = split_time_of_day(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    match target {
        HostType::TimeOfDay => time_of(kind, literal, &fields, target).map(EdmValue::TimeOfDay),
        _ => Err(kind.target_mismatch(target)),
    }
}

pub(super) fn time_of_day_to_string(value: &EdmValue, facets: &Facets) -> Result<String, LiteralError> {
    let kind = PrimitiveTypeKind::TimeOfDay;
    let EdmValue::TimeOfDay(time) = value else {
        return Err(kind.value_mismatch(value));
    };

    let (clock, fraction) = format_time(*time);
    check_precision(kind, fraction.strip_prefix('.'), facets)?;
    Ok(format!("{}{}", clock, fraction))
}

// =============================================================================
// DURATION
// =============================================================================

fn duration_captures(literal: &str) -> Option<Captures<'_>> {
    let captures = DURATION_LITERAL.captures(literal)?;
    let has_time = (3..=5).any(|i| captures.get(i).is_some());
    // At least one component, and no `T` without a time component
    if !has_time && (captures.get(2).is_none() || literal.contains('T')) {
        return None;
    }
    Some(captures)
}

pub(super) fn check_duration(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    let kind = PrimitiveTypeKind::Duration;
    let captures = duration_captures(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    check_precision(kind, captures.get(6).map(|m| m.as_str()), facets)
}

/// Total signed nanoseconds of a duration literal.
fn duration_nanos(literal: &str, target: HostType) -> Result<i128, LiteralError> {
    let kind = PrimitiveTypeKind::Duration;
    let captures = duration_captures(literal).ok_or_else(|| kind.invalid_literal(literal))?;
    let lossy = || kind.lossy(literal, target);

    let component = |index: usize, seconds: i64| -> Result<i128, LiteralError> {
        match captures.get(index) {
            None => Ok(0),
            Some(m) => m
                .as_str()
                .parse::<i128>()
                .ok()
                .and_then(|n| n.checked_mul(i128::from(seconds) * i128::from(NANOS_PER_SECOND)))
                .ok_or_else(lossy),
        }
    };

    let mut total = component(2, SECONDS_PER_DAY)?;
    for (index, seconds) in [(3, SECONDS_PER_HOUR), (4, SECONDS_PER_MINUTE), (5, 1)] {
        total = total.checked_add(component(index, seconds)?).ok_or_else(lossy)?;
    }
    let fraction = nanos_of(kind, literal, captures.get(6).map(|m| m.as_str()), target)?;
    total = total.checked_add(i128::from(fraction)).ok_or_else(lossy)?;

    Ok(if captures.get(1).is_some() { -total } else { total })
}

pub(super) fn duration_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    let kind = PrimitiveTypeKind::Duration;
    match target {
        HostType::Duration => Ok(EdmValue::Duration(Duration::from_nanos(duration_nanos(
            literal, target,
        )?))),
        HostType::Decimal => {
            let nanos = duration_nanos(literal, target)?;
            Decimal::try_from_i128_with_scale(nanos, HOST_FRACTIONAL_SECONDS_DIGITS as u32)
                .map(|seconds| EdmValue::Decimal(seconds.normalize()))
                .map_err(|_| kind.lossy(literal, target))
        }
        _ => Err(kind.target_mismatch(target)),
    }
}

pub(super) fn duration_to_string(value: &EdmValue, facets: &Facets) -> Result<String, LiteralError> {
    let kind = PrimitiveTypeKind::Duration;
    let nanos = match value {
        EdmValue::Duration(d) => d.total_nanos(),
        // Decimal seconds
        EdmValue::Decimal(seconds) => seconds
            .checked_mul(Decimal::from(NANOS_PER_SECOND))
            .filter(|n| n.fract().is_zero())
            .and_then(|n| n.to_i128())
            .ok_or_else(|| LiteralError::ValueOutOfRange {
                type_name: kind.qualified_name(),
                value: seconds.to_string(),
            })?,
        _ => return Err(kind.value_mismatch(value)),
    };

    let magnitude = nanos.unsigned_abs();
    let nanos_per_second = NANOS_PER_SECOND as u128;
    let fraction = format_fraction((magnitude % nanos_per_second) as u32);
    check_precision(kind, fraction.strip_prefix('.'), facets)?;

    let total_seconds = magnitude / nanos_per_second;
    let days = total_seconds / SECONDS_PER_DAY as u128;
    let hours = total_seconds % SECONDS_PER_DAY as u128 / SECONDS_PER_HOUR as u128;
    let minutes = total_seconds % SECONDS_PER_HOUR as u128 / SECONDS_PER_MINUTE as u128;
    let seconds = total_seconds % SECONDS_PER_MINUTE as u128;

    let mut literal = String::new();
    if nanos < 0 {
        literal.push('-');
    }
    literal.push('P');
    if days > 0 {
        literal.push_str(&format!("{}D", days));
    }
    literal.push('T');
    if hours > 0 {
        literal.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        literal.push_str(&format!("{}M", minutes));
    }
    literal.push_str(&format!("{}{}S", seconds, fraction));
    Ok(literal)
}
