//! Boolean, String and Guid.

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::LiteralError;
use crate::model::{EdmValue, Facets, HostType};
use crate::primitive::PrimitiveTypeKind;

lazy_static! {
    static ref GUID_LITERAL: Regex = Regex::new(
        r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$"
    )
    .expect("guid literal pattern is valid");
}

// =============================================================================
// BOOLEAN
// =============================================================================

pub(super) fn check_boolean(literal: &str) -> Result<(), LiteralError> {
    match literal {
        "true" | "false" => Ok(()),
        _ => Err(PrimitiveTypeKind::Boolean.invalid_literal(literal)),
    }
}

pub(super) fn boolean_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    match target {
        HostType::Bool => Ok(EdmValue::Bool(literal == "true")),
        _ => Err(PrimitiveTypeKind::Boolean.target_mismatch(target)),
    }
}

pub(super) fn boolean_to_string(value: &EdmValue) -> Result<String, LiteralError> {
    match value {
        EdmValue::Bool(b) => Ok(b.to_string()),
        _ => Err(PrimitiveTypeKind::Boolean.value_mismatch(value)),
    }
}

// =============================================================================
// STRING
// =============================================================================

pub(super) fn check_string(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    let kind = PrimitiveTypeKind::String;
    if let Some(max) = facets.max_length {
        let length = literal.chars().count();
        if length > max as usize {
            return Err(LiteralError::MaxLengthExceeded {
                type_name: kind.qualified_name(),
                length,
                max,
            });
        }
    }
    if facets.unicode == Some(false) && !literal.is_ascii() {
        return Err(LiteralError::NonAsciiValue {
            type_name: kind.qualified_name(),
        });
    }
    Ok(())
}

pub(super) fn string_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    match target {
        HostType::String => Ok(EdmValue::String(literal.to_string())),
        _ => Err(PrimitiveTypeKind::String.target_mismatch(target)),
    }
}

pub(super) fn string_to_string(value: &EdmValue, facets: &Facets) -> Result<String, LiteralError> {
    match value {
        EdmValue::String(s) => {
            check_string(s, facets)?;
            Ok(s.clone())
        }
        _ => Err(PrimitiveTypeKind::String.value_mismatch(value)),
    }
}

/// Collapses doubled quotes; `None` if a quote is unpaired.
pub(super) fn unescape_quotes(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\'' && chars.next() != Some('\'') {
            return None;
        }
        out.push(c);
    }
    Some(out)
}

// =============================================================================
// GUID
// =============================================================================

pub(super) fn check_guid(literal: &str) -> Result<(), LiteralError> {
    if GUID_LITERAL.is_match(literal) {
        Ok(())
    } else {
        Err(PrimitiveTypeKind::Guid.invalid_literal(literal))
    }
}

pub(super) fn guid_value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    let kind = PrimitiveTypeKind::Guid;
    match target {
        HostType::Uuid => Uuid::parse_str(literal)
            .map(EdmValue::Uuid)
            .map_err(|_| kind.invalid_literal(literal)),
        _ => Err(kind.target_mismatch(target)),
    }
}

pub(super) fn guid_to_string(value: &EdmValue) -> Result<String, LiteralError> {
    match value {
        EdmValue::Uuid(uuid) => Ok(uuid.hyphenated().to_string()),
        _ => Err(PrimitiveTypeKind::Guid.value_mismatch(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::literal::LiteralType;
    use proptest::prelude::*;

    #[test]
    fn test_boolean() {
        let ty = PrimitiveTypeKind::Boolean.instance();
        assert!(ty.validate(Some("true"), &Facets::NONE));
        assert!(ty.validate(Some("false"), &Facets::NONE));
        assert!(!ty.validate(Some("True"), &Facets::NONE));
        assert!(!ty.validate(Some("1"), &Facets::NONE));

        assert_eq!(
            ty.value_of_string_as::<bool>(Some("false"), &Facets::NONE),
            Ok(Some(false))
        );
        assert_eq!(
            ty.value_to_string(Some(&EdmValue::Bool(true)), &Facets::NONE),
            Ok(Some("true".to_string()))
        );
        let err = ty
            .value_to_string(Some(&EdmValue::I32(1)), &Facets::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_string_facets() {
        let ty = PrimitiveTypeKind::String.instance();
        assert!(ty.validate(Some(""), &Facets::NONE));
        assert!(ty.validate(Some("héllo"), &Facets::new().max_length(5)));
        assert!(!ty.validate(Some("héllo!"), &Facets::new().max_length(5)));
        assert!(!ty.validate(Some("héllo"), &Facets::new().unicode(false)));
        assert!(ty.validate(Some("hello"), &Facets::new().unicode(false)));

        let err = ty
            .value_to_string(Some(&EdmValue::from("abcdef")), &Facets::new().max_length(3))
            .unwrap_err();
        assert!(matches!(err, LiteralError::MaxLengthExceeded { length: 6, max: 3, .. }));
        let err = ty
            .value_of_string(Some("ü"), &Facets::new().unicode(false), HostType::String)
            .unwrap_err();
        assert!(matches!(err, LiteralError::NonAsciiValue { .. }));
    }

    #[test]
    fn test_unescape_quotes() {
        assert_eq!(unescape_quotes("it''s").as_deref(), Some("it's"));
        assert_eq!(unescape_quotes("''''").as_deref(), Some("''"));
        assert_eq!(unescape_quotes("it's"), None);
        assert_eq!(unescape_quotes("'"), None);
    }

    #[test]
    fn test_guid() {
        let ty = PrimitiveTypeKind::Guid.instance();
        let literal = "AABBCCDD-aabb-ccdd-eeff-AABBCCDDEEFF";
        assert!(ty.validate(Some(literal), &Facets::NONE));
        assert!(!ty.validate(Some("aabbccddaabbccddeeffaabbccddeeff"), &Facets::NONE));
        assert!(!ty.validate(Some("{aabbccdd-aabb-ccdd-eeff-aabbccddeeff}"), &Facets::NONE));
        assert!(!ty.validate(Some("gabbccdd-aabb-ccdd-eeff-aabbccddeeff"), &Facets::NONE));

        let uuid = ty
            .value_of_string_as::<Uuid>(Some(literal), &Facets::NONE)
            .unwrap()
            .unwrap();
        assert_eq!(
            ty.value_to_string(Some(&EdmValue::Uuid(uuid)), &Facets::NONE),
            Ok(Some(literal.to_lowercase()))
        );
        let err = ty
            .value_of_string(Some(literal), &Facets::NONE, HostType::String)
            .unwrap_err();
        assert!(matches!(err, LiteralError::TargetTypeMismatch { .. }));
    }

    proptest! {
        #[test]
        fn test_string_uri_roundtrip(s in ".*") {
            let ty = PrimitiveTypeKind::String.instance();
            let uri = ty.to_uri_literal(&s);
            prop_assert_eq!(ty.from_uri_literal(&uri).unwrap(), s);
        }

        #[test]
        fn test_guid_roundtrip(bytes: [u8; 16]) {
            let ty = PrimitiveTypeKind::Guid.instance();
            let uuid = Uuid::from_bytes(bytes);
            let literal = ty.value_to_string(Some(&EdmValue::Uuid(uuid)), &Facets::NONE).unwrap().unwrap();
            prop_assert!(ty.validate(Some(&literal), &Facets::NONE));
            prop_assert_eq!(ty.value_of_string_as::<Uuid>(Some(&literal), &Facets::NONE).unwrap(), Some(uuid));
        }
    }
}
