//! Edm.Double and Edm.Single.
//!
//! Literals are rendered with the shortest digit sequence that parses back
//! to the same value: plain notation when the decimal exponent is in
//! `-3..=6`, otherwise `d.dddE±x`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::LiteralError;
use crate::limits::{
    MAX_DOUBLE_DIGITS, MAX_DOUBLE_EXPONENT_DIGITS, MAX_EXACT_F32_INTEGER, MAX_EXACT_F64_INTEGER,
    MAX_SINGLE_DIGITS, MAX_SINGLE_EXPONENT_DIGITS,
};
use crate::model::{EdmValue, HostType};
use crate::primitive::decimal::decimal_to_host;
use crate::primitive::PrimitiveTypeKind;

fn float_pattern(digits: usize, exponent_digits: usize) -> Regex {
    Regex::new(&format!(
        r"^[+-]?[0-9]{{1,{d}}}(?:\.[0-9]{{1,{d}}})?(?:[eE][+-]?[0-9]{{1,{e}}})?$",
        d = digits,
        e = exponent_digits
    ))
    .expect("float literal pattern is valid")
}

lazy_static! {
    static ref DOUBLE_LITERAL: Regex = float_pattern(MAX_DOUBLE_DIGITS, MAX_DOUBLE_EXPONENT_DIGITS);
    static ref SINGLE_LITERAL: Regex = float_pattern(MAX_SINGLE_DIGITS, MAX_SINGLE_EXPONENT_DIGITS);
}

/// Decimal exponents rendered in plain notation.
const PLAIN_EXPONENTS: std::ops::RangeInclusive<i32> = -3..=6;

fn limits(kind: PrimitiveTypeKind) -> (&'static Regex, usize) {
    if kind == PrimitiveTypeKind::Single {
        (&SINGLE_LITERAL, MAX_SINGLE_DIGITS)
    } else {
        (&DOUBLE_LITERAL, MAX_DOUBLE_DIGITS)
    }
}

fn special(literal: &str) -> Option<f64> {
    match literal {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => None,
    }
}

/// Parses the literal as an f64, rejecting values that overflow the kind.
fn parse(kind: PrimitiveTypeKind, literal: &str) -> Result<f64, LiteralError> {
    if let Some(v) = special(literal) {
        return Ok(v);
    }

    let (pattern, _) = limits(kind);
    if !pattern.is_match(literal) {
        return Err(kind.invalid_literal(literal));
    }
    let finite = if kind == PrimitiveTypeKind::Single {
        literal.parse::<f32>().is_ok_and(f32::is_finite)
    } else {
        literal.parse::<f64>().is_ok_and(f64::is_finite)
    };
    if !finite {
        return Err(kind.invalid_literal(literal));
    }
    literal.parse().map_err(|_| kind.invalid_literal(literal))
}

pub(super) fn check(kind: PrimitiveTypeKind, literal: &str) -> Result<(), LiteralError> {
    parse(kind, literal).map(|_| ())
}

/// Exact decimal value of a finite float literal.
///
/// The exponent only moves the scale, so no digit is ever rounded away.
fn literal_to_decimal(literal: &str) -> Option<Decimal> {
    let unsigned = literal.strip_prefix('+').unwrap_or(literal);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (unsigned, 0),
    };

    let mut value = Decimal::from_str_exact(mantissa).ok()?;
    let scale = i64::from(value.scale()) - exponent;
    if scale >= 0 {
        value.set_scale(u32::try_from(scale).ok()?).ok()?;
        return Some(value);
    }

    value.set_scale(0).ok()?;
    for _ in 0..-scale {
        value = value.checked_mul(Decimal::TEN)?;
    }
    Some(value)
}

pub(super) fn value_of(
    kind: PrimitiveTypeKind,
    literal: &str,
    target: HostType,
) -> Result<EdmValue, LiteralError> {
    let value = parse(kind, literal)?;
    match target {
        HostType::F64 => Ok(EdmValue::F64(value)),
        HostType::F32 if !value.is_finite() => Ok(EdmValue::F32(value as f32)),
        HostType::F32 if kind == PrimitiveTypeKind::Single => literal
            .parse()
            .map(EdmValue::F32)
            .map_err(|_| kind.invalid_literal(literal)),
        HostType::F32 => {
            let narrow: f32 = literal.parse().map_err(|_| kind.invalid_literal(literal))?;
            if f64::from(narrow) == value {
                Ok(EdmValue::F32(narrow))
            } else {
                Err(kind.lossy(literal, target))
            }
        }
        HostType::Decimal
        | HostType::U8
        | HostType::I8
        | HostType::I16
        | HostType::I32
        | HostType::I64 => {
            let exact = literal_to_decimal(literal).ok_or_else(|| kind.lossy(literal, target))?;
            decimal_to_host(kind, exact, target)
        }
        _ => Err(kind.target_mismatch(target)),
    }
}

/// Brings a host value to the float it denotes for this kind.
fn to_float(kind: PrimitiveTypeKind, value: &EdmValue) -> Result<f64, LiteralError> {
    let single = kind == PrimitiveTypeKind::Single;
    let out_of_range = || LiteralError::ValueOutOfRange {
        type_name: kind.qualified_name(),
        value: format!("{:?}", value),
    };

    if let Some(v) = value.as_i64() {
        let limit = if single {
            MAX_EXACT_F32_INTEGER
        } else {
            MAX_EXACT_F64_INTEGER
        };
        return if v.unsigned_abs() <= limit as u64 {
            Ok(v as f64)
        } else {
            Err(out_of_range())
        };
    }

    match *value {
        EdmValue::F32(f) => Ok(f64::from(f)),
        EdmValue::F64(f) if !single || !f.is_finite() || f64::from(f as f32) == f => Ok(f),
        EdmValue::F64(_) => Err(out_of_range()),
        EdmValue::Decimal(d) => {
            let f = d.to_f64().ok_or_else(out_of_range)?;
            let narrowed = if single { f64::from(f as f32) } else { f };
            match literal_to_decimal(&shortest(narrowed, single)) {
                Some(back) if back == d => Ok(narrowed),
                _ => Err(out_of_range()),
            }
        }
        _ => Err(kind.value_mismatch(value)),
    }
}

/// Shortest round-trip scientific form, e.g. `1.5e-7`.
fn shortest(value: f64, single: bool) -> String {
    if single {
        format!("{:e}", value as f32)
    } else {
        format!("{:e}", value)
    }
}

pub(super) fn to_string(kind: PrimitiveTypeKind, value: &EdmValue) -> Result<String, LiteralError> {
    let v = to_float(kind, value)?;
    if v.is_nan() {
        return Ok("NaN".to_string());
    }
    if v.is_infinite() {
        return Ok(if v > 0.0 { "INF" } else { "-INF" }.to_string());
    }
    Ok(render(
        &shortest(v, kind == PrimitiveTypeKind::Single),
        limits(kind).1,
    ))
}

/// Lays out the digits of a `{:e}` rendering in literal form.
fn render(scientific: &str, max_digits: usize) -> String {
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if PLAIN_EXPONENTS.contains(&exponent) {
        let (integer, fraction) = if exponent >= 0 {
            let split = exponent as usize + 1;
            if digits.len() > split {
                (digits[..split].to_string(), digits[split..].to_string())
            } else {
                (format!("{:0<width$}", digits, width = split), "0".to_string())
            }
        } else {
            let zeros = "0".repeat((-exponent - 1) as usize);
            ("0".to_string(), format!("{}{}", zeros, digits))
        };
        if integer.len() <= max_digits && fraction.len() <= max_digits {
            return format!("{}{}.{}", sign, integer, fraction);
        }
    }

    let (first, rest) = digits.split_at(1);
    let rest = if rest.is_empty() { "0" } else { rest };
    format!("{}{}.{}E{}", sign, first, rest, exponent)
}
