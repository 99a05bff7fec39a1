//! Byte, SByte, Int16, Int32 and Int64.

use crate::error::LiteralError;
use crate::model::{EdmValue, HostType};
use crate::primitive::{integer_to_host, PrimitiveTypeKind};

/// Parses an integer literal and checks it against the kind's range.
fn parse(kind: PrimitiveTypeKind, literal: &str) -> Result<i64, LiteralError> {
    // `i64::from_str` accepts exactly `[+-]?digit+`
    let value: i64 = literal.parse().map_err(|_| kind.invalid_literal(literal))?;
    match kind.integer_range() {
        Some((min, max)) if (min..=max).contains(&value) => Ok(value),
        _ => Err(kind.invalid_literal(literal)),
    }
}

pub(super) fn check(kind: PrimitiveTypeKind, literal: &str) -> Result<(), LiteralError> {
    parse(kind, literal).map(|_| ())
}

pub(super) fn value_of(
    kind: PrimitiveTypeKind,
    literal: &str,
    target: HostType,
) -> Result<EdmValue, LiteralError> {
    integer_to_host(kind, parse(kind, literal)?, target)
}

pub(super) fn to_string(kind: PrimitiveTypeKind, value: &EdmValue) -> Result<String, LiteralError> {
    let v = value.as_i64().ok_or_else(|| kind.value_mismatch(value))?;
    match kind.integer_range() {
        Some((min, max)) if (min..=max).contains(&v) => Ok(v.to_string()),
        _ => Err(LiteralError::ValueOutOfRange {
            type_name: kind.qualified_name(),
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::literal::LiteralType;
    use crate::model::Facets;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn parse_as(kind: PrimitiveTypeKind, literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
        kind.instance()
            .value_of_string(Some(literal), &Facets::NONE, target)
            .map(|v| v.unwrap())
    }

    #[test]
    fn test_integer_grammar() {
        let int32 = PrimitiveTypeKind::Int32.instance();
        for literal in ["0", "-1", "+42", "007", "2147483647", "-2147483648"] {
            assert!(int32.validate(Some(literal), &Facets::NONE), "{}", literal);
        }
        for literal in ["", "+", "1.0", " 1", "1 ", "0x10", "2147483648", "1e3", "١"] {
            assert!(!int32.validate(Some(literal), &Facets::NONE), "{}", literal);
        }
    }

    #[test]
    fn test_kind_ranges() {
        let byte = PrimitiveTypeKind::Byte.instance();
        assert!(byte.validate(Some("255"), &Facets::NONE));
        assert!(!byte.validate(Some("256"), &Facets::NONE));
        assert!(!byte.validate(Some("-1"), &Facets::NONE));

        let sbyte = PrimitiveTypeKind::SByte.instance();
        assert!(sbyte.validate(Some("-128"), &Facets::NONE));
        assert!(!sbyte.validate(Some("128"), &Facets::NONE));

        let err = parse_as(PrimitiveTypeKind::Int16, "32768", HostType::I16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_host_targets() {
        assert_eq!(
            parse_as(PrimitiveTypeKind::Int32, "300", HostType::I64).unwrap(),
            EdmValue::I64(300)
        );
        assert_eq!(
            parse_as(PrimitiveTypeKind::Int32, "-7", HostType::Decimal).unwrap(),
            EdmValue::Decimal(Decimal::from(-7))
        );
        assert_eq!(
            parse_as(PrimitiveTypeKind::Int64, "9007199254740992", HostType::F64).unwrap(),
            EdmValue::F64(9_007_199_254_740_992.0)
        );

        // 300 does not fit a signed 8-bit host
        let err = parse_as(PrimitiveTypeKind::Int32, "300", HostType::I8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = parse_as(PrimitiveTypeKind::Int64, "9007199254740993", HostType::F64).unwrap_err();
        assert!(matches!(err, LiteralError::LossyConversion { .. }));
        let err = parse_as(PrimitiveTypeKind::Int32, "16777217", HostType::F32).unwrap_err();
        assert!(matches!(err, LiteralError::LossyConversion { .. }));
        let err = parse_as(PrimitiveTypeKind::Int32, "1", HostType::String).unwrap_err();
        assert!(matches!(err, LiteralError::TargetTypeMismatch { .. }));
    }

    #[test]
    fn test_render() {
        let byte = PrimitiveTypeKind::Byte.instance();
        assert_eq!(
            byte.value_to_string(Some(&EdmValue::I32(200)), &Facets::NONE).unwrap(),
            Some("200".to_string())
        );
        let err = byte
            .value_to_string(Some(&EdmValue::I32(300)), &Facets::NONE)
            .unwrap_err();
        assert!(matches!(err, LiteralError::ValueOutOfRange { .. }));
        let err = byte
            .value_to_string(Some(&EdmValue::String("1".into())), &Facets::NONE)
            .unwrap_err();
        assert!(matches!(err, LiteralError::ValueTypeMismatch { .. }));
    }

    proptest! {
        #[test]
        fn test_int64_roundtrip(v: i64) {
            let ty = PrimitiveTypeKind::Int64.instance();
            let literal = ty.value_to_string(Some(&EdmValue::I64(v)), &Facets::NONE).unwrap().unwrap();
            prop_assert!(ty.validate(Some(&literal), &Facets::NONE));
            prop_assert_eq!(ty.from_uri_literal(&ty.to_uri_literal(&literal)).unwrap(), literal.clone());
            prop_assert_eq!(
                ty.value_of_string(Some(&literal), &Facets::NONE, HostType::I64).unwrap(),
                Some(EdmValue::I64(v))
            );
        }

        #[test]
        fn test_sbyte_roundtrip(v: i8) {
            let ty = PrimitiveTypeKind::SByte.instance();
            let literal = ty.value_to_string(Some(&EdmValue::I8(v)), &Facets::NONE).unwrap().unwrap();
            prop_assert_eq!(ty.value_of_string_as::<i8>(Some(&literal), &Facets::NONE).unwrap(), Some(v));
        }
    }
}
