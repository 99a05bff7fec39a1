//! Edm.Binary: base64url literals.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::LiteralError;
use crate::model::{EdmValue, Facets, HostType};
use crate::primitive::PrimitiveTypeKind;

const KIND: PrimitiveTypeKind = PrimitiveTypeKind::Binary;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// base64url, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Standard base64, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

fn decode(literal: &str) -> Result<Vec<u8>, LiteralError> {
    URL_SAFE_LENIENT
        .decode(literal)
        .or_else(|_| STANDARD_LENIENT.decode(literal))
        .map_err(|_| KIND.invalid_literal(literal))
}

fn check_length(length: usize, facets: &Facets) -> Result<(), LiteralError> {
    match facets.max_length {
        Some(max) if length > max as usize => Err(LiteralError::MaxLengthExceeded {
            type_name: KIND.qualified_name(),
            length,
            max,
        }),
        _ => Ok(()),
    }
}

pub(super) fn check(literal: &str, facets: &Facets) -> Result<(), LiteralError> {
    check_length(decode(literal)?.len(), facets)
}

pub(super) fn value_of(literal: &str, target: HostType) -> Result<EdmValue, LiteralError> {
    match target {
        HostType::Bytes => decode(literal).map(EdmValue::Bytes),
        _ => Err(KIND.target_mismatch(target)),
    }
}

pub(super) fn to_string(value: &EdmValue, facets: &Facets) -> Result<String, LiteralError> {
    match value {
        EdmValue::Bytes(bytes) => {
            check_length(bytes.len(), facets)?;
            Ok(URL_SAFE_NO_PAD.encode(bytes))
        }
        _ => Err(KIND.value_mismatch(value)),
    }
}

/// Returns the hex digits of a legacy `X'...'` URI literal.
pub(super) fn strip_hex_uri_literal(uri_literal: &str) -> Option<&str> {
    uri_literal
        .strip_prefix("X'")
        .or_else(|| uri_literal.strip_prefix("x'"))
        .and_then(|rest| rest.strip_suffix('\''))
}

/// Re-encodes hex digits as a base64url literal.
pub(super) fn hex_to_literal(digits: &str) -> Option<String> {
    hex::decode(digits).ok().map(|bytes| URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::literal::LiteralType;
    use proptest::prelude::*;

    fn ty() -> &'static crate::primitive::PrimitiveType {
        KIND.instance()
    }

    #[test]
    fn test_binary_alphabets() {
        // 0xFB 0xFF encodes to "-_8" (url-safe) and "+/8=" (standard)
        for literal in ["-_8", "-_8=", "+/8=", "+/8", "", "AQID"] {
            assert!(ty().validate(Some(literal), &Facets::NONE), "{}", literal);
        }
        for literal in ["A", "AQI*", "AQ=D"] {
            assert!(!ty().validate(Some(literal), &Facets::NONE), "{}", literal);
        }
        assert_eq!(
            ty().value_of_string_as::<Vec<u8>>(Some("+/8="), &Facets::NONE),
            Ok(Some(vec![0xFB, 0xFF]))
        );
        assert_eq!(
            ty().value_to_string(Some(&EdmValue::Bytes(vec![0xFB, 0xFF])), &Facets::NONE),
            Ok(Some("-_8".to_string()))
        );
    }

    #[test]
    fn test_max_length_in_bytes() {
        let facets = Facets::new().max_length(3);
        assert!(ty().validate(Some("AQID"), &facets));
        assert!(!ty().validate(Some("AQIDBA"), &facets));

        let err = ty()
            .value_to_string(Some(&EdmValue::Bytes(vec![0; 4])), &facets)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FacetViolation);
    }

    #[test]
    fn test_hex_uri_literal() {
        assert_eq!(strip_hex_uri_literal("X'0A0b'"), Some("0A0b"));
        assert_eq!(strip_hex_uri_literal("binary'AQID'"), None);
        assert_eq!(hex_to_literal("FBFF").as_deref(), Some("-_8"));
        assert_eq!(hex_to_literal("FBF"), None);
    }

    proptest! {
        #[test]
        fn test_binary_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let literal = ty().value_to_string(Some(&EdmValue::Bytes(bytes.clone())), &Facets::NONE).unwrap().unwrap();
            prop_assert!(ty().validate(Some(&literal), &Facets::NONE));
            let uri = ty().to_uri_literal(&literal);
            prop_assert_eq!(ty().from_uri_literal(&uri).unwrap(), literal.clone());
            prop_assert_eq!(
                ty().value_of_string(Some(&literal), &Facets::NONE, HostType::Bytes).unwrap(),
                Some(EdmValue::Bytes(bytes))
            );
        }
    }
}
