//! Primitive types: one stateless converter per kind.
//!
//! The converters live in a process-wide registry built on first use and are
//! handed out as `&'static PrimitiveType`.
//!
//! | Kind | Literal | URI literal |
//! |------|---------|-------------|
//! | Boolean | `true` / `false` | unchanged |
//! | Byte, SByte, Int16, Int32, Int64 | `[+-]?digits` | unchanged |
//! | Decimal | `[+-]?digits(.digits)?` | unchanged |
//! | Double, Single | `[+-]?digits(.digits)?(E[+-]?digits)?`, `INF`, `-INF`, `NaN` | unchanged |
//! | String | any text | `'text'` with `'` doubled |
//! | Guid | `8-4-4-4-12` hex | unchanged |
//! | Binary | base64url | `binary'...'` |
//! | Date, DateTimeOffset, TimeOfDay | ISO 8601 | unchanged |
//! | Duration | ISO 8601 period | `duration'...'` |

mod binary;
mod decimal;
mod float;
mod integer;
mod temporal;
mod text;

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::edm::EdmType;
use crate::error::LiteralError;
use crate::limits::{MAX_EXACT_F32_INTEGER, MAX_EXACT_F64_INTEGER};
use crate::literal::{absent, LiteralType};
use crate::model::{EdmValue, FacetKind, Facets, FullQualifiedName, HostType};

/// The closed set of primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PrimitiveTypeKind {
    Binary = 0,
    Boolean = 1,
    Byte = 2,
    Date = 3,
    DateTimeOffset = 4,
    Decimal = 5,
    Double = 6,
    Duration = 7,
    Guid = 8,
    Int16 = 9,
    Int32 = 10,
    Int64 = 11,
    SByte = 12,
    Single = 13,
    String = 14,
    TimeOfDay = 15,
}

lazy_static! {
    static ref PRIMITIVE_TYPES: Vec<PrimitiveType> = PrimitiveTypeKind::ALL
        .iter()
        .map(|&kind| PrimitiveType {
            kind,
            name: FullQualifiedName::edm(kind.name()),
        })
        .collect();
    static ref KINDS_BY_NAME: FxHashMap<&'static str, PrimitiveTypeKind> = PrimitiveTypeKind::ALL
        .iter()
        .map(|&kind| (kind.name(), kind))
        .collect();
}

impl PrimitiveTypeKind {
    /// All kinds, in discriminant order.
    pub const ALL: [PrimitiveTypeKind; 16] = [
        PrimitiveTypeKind::Binary,
        PrimitiveTypeKind::Boolean,
        PrimitiveTypeKind::Byte,
        PrimitiveTypeKind::Date,
        PrimitiveTypeKind::DateTimeOffset,
        PrimitiveTypeKind::Decimal,
        PrimitiveTypeKind::Double,
        PrimitiveTypeKind::Duration,
        PrimitiveTypeKind::Guid,
        PrimitiveTypeKind::Int16,
        PrimitiveTypeKind::Int32,
        PrimitiveTypeKind::Int64,
        PrimitiveTypeKind::SByte,
        PrimitiveTypeKind::Single,
        PrimitiveTypeKind::String,
        PrimitiveTypeKind::TimeOfDay,
    ];

    /// Name within the `Edm` namespace (e.g., "Int32").
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTypeKind::Binary => "Binary",
            PrimitiveTypeKind::Boolean => "Boolean",
            PrimitiveTypeKind::Byte => "Byte",
            PrimitiveTypeKind::Date => "Date",
            PrimitiveTypeKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveTypeKind::Decimal => "Decimal",
            PrimitiveTypeKind::Double => "Double",
            PrimitiveTypeKind::Duration => "Duration",
            PrimitiveTypeKind::Guid => "Guid",
            PrimitiveTypeKind::Int16 => "Int16",
            PrimitiveTypeKind::Int32 => "Int32",
            PrimitiveTypeKind::Int64 => "Int64",
            PrimitiveTypeKind::SByte => "SByte",
            PrimitiveTypeKind::Single => "Single",
            PrimitiveTypeKind::String => "String",
            PrimitiveTypeKind::TimeOfDay => "TimeOfDay",
        }
    }

    /// Looks a kind up by its name within the `Edm` namespace.
    pub fn from_name(name: &str) -> Option<PrimitiveTypeKind> {
        KINDS_BY_NAME.get(name).copied()
    }

    /// The registry singleton for this kind.
    pub fn instance(self) -> &'static PrimitiveType {
        &PRIMITIVE_TYPES[self as usize]
    }

    /// The host type values of this kind default to.
    pub fn default_host_type(self) -> HostType {
        match self {
            PrimitiveTypeKind::Binary => HostType::Bytes,
            PrimitiveTypeKind::Boolean => HostType::Bool,
            PrimitiveTypeKind::Byte => HostType::U8,
            PrimitiveTypeKind::Date => HostType::Date,
            PrimitiveTypeKind::DateTimeOffset => HostType::DateTimeOffset,
            PrimitiveTypeKind::Decimal => HostType::Decimal,
            PrimitiveTypeKind::Double => HostType::F64,
            PrimitiveTypeKind::Duration => HostType::Duration,
            PrimitiveTypeKind::Guid => HostType::Uuid,
            PrimitiveTypeKind::Int16 => HostType::I16,
            PrimitiveTypeKind::Int32 => HostType::I32,
            PrimitiveTypeKind::Int64 => HostType::I64,
            PrimitiveTypeKind::SByte => HostType::I8,
            PrimitiveTypeKind::Single => HostType::F32,
            PrimitiveTypeKind::String => HostType::String,
            PrimitiveTypeKind::TimeOfDay => HostType::TimeOfDay,
        }
    }

    /// Facets this kind takes into account; all others are ignored.
    pub fn supported_facets(self) -> &'static [FacetKind] {
        match self {
            PrimitiveTypeKind::String => &[
                FacetKind::Nullable,
                FacetKind::MaxLength,
                FacetKind::Unicode,
            ],
            PrimitiveTypeKind::Binary => &[FacetKind::Nullable, FacetKind::MaxLength],
            PrimitiveTypeKind::Decimal => {
                &[FacetKind::Nullable, FacetKind::Precision, FacetKind::Scale]
            }
            PrimitiveTypeKind::DateTimeOffset
            | PrimitiveTypeKind::TimeOfDay
            | PrimitiveTypeKind::Duration => &[FacetKind::Nullable, FacetKind::Precision],
            _ => &[FacetKind::Nullable],
        }
    }

    pub fn is_integer(self) -> bool {
        self.integer_range().is_some()
    }

    /// Inclusive value range of the integer kinds.
    pub fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            PrimitiveTypeKind::Byte => Some((0, i64::from(u8::MAX))),
            PrimitiveTypeKind::SByte => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
            PrimitiveTypeKind::Int16 => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            PrimitiveTypeKind::Int32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            PrimitiveTypeKind::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Returns true if values of `other` may be used where `self` is expected.
    pub fn is_compatible_with(self, other: PrimitiveTypeKind) -> bool {
        use PrimitiveTypeKind::*;

        self == other
            || match self {
                Int16 => matches!(other, Byte | SByte),
                Int32 => matches!(other, Byte | SByte | Int16),
                Int64 => matches!(other, Byte | SByte | Int16 | Int32),
                Decimal => other.is_integer(),
                Single => other.is_integer() || other == Decimal,
                Double => other.is_integer() || matches!(other, Decimal | Single),
                _ => false,
            }
    }

    pub(crate) fn qualified_name(self) -> String {
        format!("Edm.{}", self.name())
    }

    pub(crate) fn invalid_literal(self, literal: &str) -> LiteralError {
        LiteralError::InvalidLiteral {
            type_name: self.qualified_name(),
            literal: literal.to_string(),
        }
    }

    pub(crate) fn target_mismatch(self, target: HostType) -> LiteralError {
        LiteralError::TargetTypeMismatch {
            type_name: self.qualified_name(),
            target,
        }
    }

    pub(crate) fn value_mismatch(self, value: &EdmValue) -> LiteralError {
        LiteralError::ValueTypeMismatch {
            type_name: self.qualified_name(),
            found: value.host_type(),
        }
    }

    pub(crate) fn lossy(self, value: impl ToString, target: HostType) -> LiteralError {
        LiteralError::LossyConversion {
            type_name: self.qualified_name(),
            value: value.to_string(),
            target,
        }
    }
}

/// Singleton converter for one primitive kind.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveType {
    kind: PrimitiveTypeKind,
    name: FullQualifiedName,
}

impl PrimitiveType {
    /// Looks up the converter for an `Edm.*` name.
    pub fn by_name(name: &FullQualifiedName) -> Option<&'static PrimitiveType> {
        if !name.is_edm() {
            return None;
        }
        PrimitiveTypeKind::from_name(name.name()).map(PrimitiveTypeKind::instance)
    }

    pub fn kind(&self) -> PrimitiveTypeKind {
        self.kind
    }

    /// Returns true if values of `other` may be used where this type is expected.
    ///
    /// Enum and structured types are never compatible with a primitive type.
    pub fn is_compatible(&self, other: &EdmType) -> bool {
        match other {
            EdmType::Primitive(other) => self.kind.is_compatible_with(other.kind),
            _ => false,
        }
    }

    /// Grammar and facet check shared by `validate` and `value_of_string`.
    fn check(&self, literal: &str, facets: &Facets) -> Result<(), LiteralError> {
        match self.kind {
            PrimitiveTypeKind::Boolean => text::check_boolean(literal),
            PrimitiveTypeKind::Byte
            | PrimitiveTypeKind::SByte
            | PrimitiveTypeKind::Int16
            | PrimitiveTypeKind::Int32
            | PrimitiveTypeKind::Int64 => integer::check(self.kind, literal),
            PrimitiveTypeKind::Decimal => decimal::check(literal, facets),
            PrimitiveTypeKind::Double | PrimitiveTypeKind::Single => {
                float::check(self.kind, literal)
            }
            PrimitiveTypeKind::String => text::check_string(literal, facets),
            PrimitiveTypeKind::Guid => text::check_guid(literal),
            PrimitiveTypeKind::Binary => binary::check(literal, facets),
            PrimitiveTypeKind::Date => temporal::check_date(literal),
            PrimitiveTypeKind::DateTimeOffset => {
                temporal::check_date_time_offset(literal, facets)
            }
            PrimitiveTypeKind::TimeOfDay => temporal::check_time_of_day(literal, facets),
            PrimitiveTypeKind::Duration => temporal::check_duration(literal, facets),
        }
    }

    /// Prefix and suffix wrapped around the literal in URI form, if any.
    fn uri_affixes(&self) -> Option<(&'static str, &'static str)> {
        match self.kind {
            PrimitiveTypeKind::String => Some(("'", "'")),
            PrimitiveTypeKind::Binary => Some(("binary'", "'")),
            PrimitiveTypeKind::Duration => Some(("duration'", "'")),
            _ => None,
        }
    }
}

impl LiteralType for PrimitiveType {
    fn full_qualified_name(&self) -> &FullQualifiedName {
        &self.name
    }

    fn default_host_type(&self) -> HostType {
        self.kind.default_host_type()
    }

    fn validate(&self, literal: Option<&str>, facets: &Facets) -> bool {
        match literal {
            None => facets.allows_null(),
            Some(literal) => self.check(literal, facets).is_ok(),
        }
    }

    fn value_to_string(
        &self,
        value: Option<&EdmValue>,
        facets: &Facets,
    ) -> Result<Option<String>, LiteralError> {
        let Some(value) = value else {
            return absent(&self.name, facets);
        };

        let literal = match self.kind {
            PrimitiveTypeKind::Boolean => text::boolean_to_string(value)?,
            PrimitiveTypeKind::Byte
            | PrimitiveTypeKind::SByte
            | PrimitiveTypeKind::Int16
            | PrimitiveTypeKind::Int32
            | PrimitiveTypeKind::Int64 => integer::to_string(self.kind, value)?,
            PrimitiveTypeKind::Decimal => decimal::to_string(value, facets)?,
            PrimitiveTypeKind::Double | PrimitiveTypeKind::Single => {
                float::to_string(self.kind, value)?
            }
            PrimitiveTypeKind::String => text::string_to_string(value, facets)?,
            PrimitiveTypeKind::Guid => text::guid_to_string(value)?,
            PrimitiveTypeKind::Binary => binary::to_string(value, facets)?,
            PrimitiveTypeKind::Date => temporal::date_to_string(value)?,
            PrimitiveTypeKind::DateTimeOffset => {
                temporal::date_time_offset_to_string(value, facets)?
            }
            PrimitiveTypeKind::TimeOfDay => temporal::time_of_day_to_string(value, facets)?,
            PrimitiveTypeKind::Duration => temporal::duration_to_string(value, facets)?,
        };
        Ok(Some(literal))
    }

    fn value_of_string(
        &self,
        literal: Option<&str>,
        facets: &Facets,
        target: HostType,
    ) -> Result<Option<EdmValue>, LiteralError> {
        let Some(literal) = literal else {
            return absent(&self.name, facets);
        };
        self.check(literal, facets)?;

        let value = match self.kind {
            PrimitiveTypeKind::Boolean => text::boolean_value_of(literal, target)?,
            PrimitiveTypeKind::Byte
            | PrimitiveTypeKind::SByte
            | PrimitiveTypeKind::Int16
            | PrimitiveTypeKind::Int32
            | PrimitiveTypeKind::Int64 => integer::value_of(self.kind, literal, target)?,
            PrimitiveTypeKind::Decimal => decimal::value_of(literal, target)?,
            PrimitiveTypeKind::Double | PrimitiveTypeKind::Single => {
                float::value_of(self.kind, literal, target)?
            }
            PrimitiveTypeKind::String => text::string_value_of(literal, target)?,
            PrimitiveTypeKind::Guid => text::guid_value_of(literal, target)?,
            PrimitiveTypeKind::Binary => binary::value_of(literal, target)?,
            PrimitiveTypeKind::Date => temporal::date_value_of(literal, target)?,
            PrimitiveTypeKind::DateTimeOffset => {
                temporal::date_time_offset_value_of(literal, target)?
            }
            PrimitiveTypeKind::TimeOfDay => temporal::time_of_day_value_of(literal, target)?,
            PrimitiveTypeKind::Duration => temporal::duration_value_of(literal, target)?,
        };
        Ok(Some(value))
    }

    fn to_uri_literal(&self, literal: &str) -> String {
        match self.uri_affixes() {
            None => literal.to_string(),
            Some((prefix, suffix)) => {
                let body = if self.kind == PrimitiveTypeKind::String {
                    literal.replace('\'', "''")
                } else {
                    literal.to_string()
                };
                format!("{}{}{}", prefix, body, suffix)
            }
        }
    }

    fn from_uri_literal(&self, uri_literal: &str) -> Result<String, LiteralError> {
        let Some((prefix, suffix)) = self.uri_affixes() else {
            return Ok(uri_literal.to_string());
        };

        let malformed = || LiteralError::MalformedUriLiteral {
            type_name: self.name.to_string(),
            literal: uri_literal.to_string(),
        };

        if self.kind == PrimitiveTypeKind::Binary {
            if let Some(hex) = binary::strip_hex_uri_literal(uri_literal) {
                return binary::hex_to_literal(hex).ok_or_else(malformed);
            }
        }

        if uri_literal.len() < prefix.len() + suffix.len() {
            return Err(malformed());
        }
        let body = uri_literal
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .ok_or_else(malformed)?;

        if self.kind == PrimitiveTypeKind::String {
            text::unescape_quotes(body).ok_or_else(malformed)
        } else {
            Ok(body.to_string())
        }
    }
}

/// Converts an integer into the requested host representation.
pub(crate) fn integer_to_host(
    kind: PrimitiveTypeKind,
    value: i64,
    target: HostType,
) -> Result<EdmValue, LiteralError> {
    match target {
        HostType::U8 | HostType::I8 | HostType::I16 | HostType::I32 | HostType::I64 => {
            EdmValue::from_i64(value, target).ok_or_else(|| kind.lossy(value, target))
        }
        HostType::Decimal => Ok(EdmValue::Decimal(Decimal::from(value))),
        HostType::F64 if value.unsigned_abs() <= MAX_EXACT_F64_INTEGER as u64 => {
            Ok(EdmValue::F64(value as f64))
        }
        HostType::F32 if value.unsigned_abs() <= MAX_EXACT_F32_INTEGER as u64 => {
            Ok(EdmValue::F32(value as f32))
        }
        HostType::F64 | HostType::F32 => Err(kind.lossy(value, target)),
        _ => Err(kind.target_mismatch(target)),
    }
}
