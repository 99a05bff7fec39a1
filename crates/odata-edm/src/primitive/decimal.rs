//! Edm.Decimal, backed by `rust_decimal`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::LiteralError;
use crate::limits::{MAX_DECIMAL_FRACTION_DIGITS, MAX_DECIMAL_INTEGER_DIGITS};
use crate::model::{EdmValue, Facets, HostType};
use crate::primitive::PrimitiveTypeKind;

const KIND: PrimitiveTypeKind = PrimitiveTypeKind::Decimal;

lazy_static! {
    static ref DECIMAL_LITERAL: Regex = Regex::new(&format!(
        r"^[+-]?([0-9]{{1,{}}})(?:\.([0-9]{{1,{}}}))?$",
        MAX_DECIMAL_INTEGER_DIGITS, MAX_DECIMAL_FRACTION_DIGITS
    ))
    .expect("decimal literal pattern is valid");
}

pub(super) fn check(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    let captures = DECIMAL_LITERAL
        .captures(literal)
        .ok_or_else(|| KIND.invalid_literal(literal))?;

    let integer = captures.get(1).map_or("", |m| m.as_str()).trim_start_matches('0');
    let fraction = captures.get(2).map_or("", |m| m.as_str()).trim_end_matches('0');

    let digits = integer.len() + fraction.len();
    if let Some(precision) = facets.precision {
        if digits > precision as usize {
            return Err(LiteralError::PrecisionExceeded {
                type_name: KIND.qualified_name(),
                digits,
                precision,
            });
        }
    }
    if let Some(scale) = facets.scale {
        if fraction.len() > scale as usize {
            return Err(LiteralError::ScaleExceeded {
                type_name: KIND.qualified_name(),
                digits: fraction.len(),
                scale,
            });
        }
    }
    Ok(())
}

/// Parses a literal already accepted by [`check`].
fn parse(literal: &str) -> Result<Decimal, LiteralError> {
    let unsigned = literal.strip_prefix('+').unwrap_or(literal);
    Decimal::from_str_exact(unsigned).map_err(|_| KIND.lossy(literal, HostType::Decimal))
}

pub(super) fn value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    decimal_to_host(KIND, parse(literal)?, target)
}

/// Converts an exact decimal into the requested host representation.
pub(super) fn decimal_to_host(
    kind: PrimitiveTypeKind,
    value: Decimal,
    target: HostType,
) -> Result<EdmValue, LiteralError> {
    let lossy = || kind.lossy(value, target);
    match target {
        HostType::Decimal => Ok(EdmValue::Decimal(value)),
        HostType::U8 | HostType::I8 | HostType::I16 | HostType::I32 | HostType::I64 => {
            if !value.fract().is_zero() {
                return Err(lossy());
            }
            value
                .to_i64()
                .and_then(|v| EdmValue::from_i64(v, target))
                .ok_or_else(lossy)
        }
        HostType::F64 => {
            let f = value.to_f64().ok_or_else(lossy)?;
            if Decimal::from_str_exact(&f.to_string()).ok() != Some(value) {
                return Err(lossy());
            }
            Ok(EdmValue::F64(f))
        }
        HostType::F32 => {
            let f = value.to_f32().ok_or_else(lossy)?;
            if Decimal::from_str_exact(&f.to_string()).ok() != Some(value) {
                return Err(lossy());
            }
            Ok(EdmValue::F32(f))
        }
        _ => Err(kind.target_mismatch(target)),
    }
}

/// Brings any numeric host value to an exact decimal.
fn to_decimal(value: &EdmValue) -> Result<Decimal, LiteralError> {
    let out_of_range = |v: String| LiteralError::ValueOutOfRange {
        type_name: KIND.qualified_name(),
        value: v,
    };

    if let Some(v) = value.as_i64() {
        return Ok(Decimal::from(v));
    }
    match *value {
        EdmValue::Decimal(d) => Ok(d),
        // Display for floats never uses exponent notation
        EdmValue::F64(f) if f.is_finite() => {
            Decimal::from_str_exact(&f.to_string()).map_err(|_| out_of_range(f.to_string()))
        }
        EdmValue::F32(f) if f.is_finite() => {
            Decimal::from_str_exact(&f.to_string()).map_err(|_| out_of_range(f.to_string()))
        }
        EdmValue::F64(f) => Err(out_of_range(f.to_string())),
        EdmValue::F32(f) => Err(out_of_range(f.to_string())),
        _ => Err(KIND.value_mismatch(value)),
    }
}

pub(super) fn to_string(value: &EdmValue, facets: &Facets) -> Result<String, LiteralError> {
    let d = to_decimal(value)?;
    let literal = if d.is_zero() {
        "0".to_string()
    } else {
        d.normalize().to_string()
    };
    check(&literal, facets)?;
    Ok(literal)
}
