//! Enum types: named members over an integer primitive type.
//!
//! A literal is a comma-separated list of tokens, each either a member name
//! or a value of the underlying type that equals some member's value. Only
//! flags enums accept more than one token; their values are OR-combined.
//!
//! Rendering a flags value lists, in declaration order, every non-zero member
//! whose bits are all set in the value. Bits covered by no member are an
//! error, as is a zero value when no member has value zero.

use rustc_hash::FxHashMap;

use crate::edm::EdmType;
use crate::error::{LiteralError, ModelError};
use crate::literal::{absent, LiteralType};
use crate::model::{EdmValue, EnumTypeDecl, Facets, FullQualifiedName, HostType};
use crate::primitive::{PrimitiveType, PrimitiveTypeKind};

/// A named enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: String,
    value: i64,
}

impl Member {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// A resolved enum type.
#[derive(Debug)]
pub struct EnumType {
    name: FullQualifiedName,
    underlying: &'static PrimitiveType,
    is_flags: bool,
    members: Vec<Member>,
    by_name: FxHashMap<String, usize>,
}

impl EnumType {
    /// Creates an enum type, checking the member list against the underlying type.
    pub fn new(
        name: FullQualifiedName,
        underlying: &'static PrimitiveType,
        is_flags: bool,
        members: Vec<Member>,
    ) -> Result<Self, ModelError> {
        let Some((min, max)) = underlying.kind().integer_range() else {
            return Err(ModelError::InvalidUnderlyingType {
                name,
                underlying: underlying.full_qualified_name().clone(),
            });
        };

        let mut by_name = FxHashMap::default();
        for (index, member) in members.iter().enumerate() {
            if !(min..=max).contains(&member.value) {
                return Err(ModelError::MemberValueOutOfRange {
                    name,
                    member: member.name.clone(),
                    value: member.value,
                });
            }
            if by_name.insert(member.name.clone(), index).is_some() {
                return Err(ModelError::DuplicateMember {
                    name,
                    member: member.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            underlying,
            is_flags,
            members,
            by_name,
        })
    }

    /// Creates an enum type from its raw declaration.
    ///
    /// The underlying type defaults to `Edm.Int32`; a member without a value
    /// takes the previous member's value plus one, starting at 0.
    pub fn from_decl(name: FullQualifiedName, decl: &EnumTypeDecl) -> Result<Self, ModelError> {
        let underlying = match &decl.underlying_type {
            None => PrimitiveTypeKind::Int32.instance(),
            Some(underlying) => {
                PrimitiveType::by_name(underlying).ok_or_else(|| {
                    ModelError::InvalidUnderlyingType {
                        name: name.clone(),
                        underlying: underlying.clone(),
                    }
                })?
            }
        };

        let mut members = Vec::with_capacity(decl.members.len());
        let mut next = Some(0i64);
        for member in &decl.members {
            let value = match member.value.or(next) {
                Some(value) => value,
                None => {
                    return Err(ModelError::MemberValueOutOfRange {
                        name,
                        member: member.name.clone(),
                        value: i64::MAX,
                    });
                }
            };
            next = value.checked_add(1);
            members.push(Member::new(member.name.as_str(), value));
        }

        Self::new(name, underlying, decl.is_flags, members)
    }

    pub fn underlying_type(&self) -> &'static PrimitiveType {
        self.underlying
    }

    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.by_name.get(name).map(|&index| &self.members[index])
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Member::name)
    }

    /// Enums are nominal: only the same enum type is compatible.
    pub fn is_compatible(&self, other: &EdmType) -> bool {
        match other {
            EdmType::Enum(other) => other.name == self.name,
            _ => false,
        }
    }

    fn type_name(&self) -> String {
        self.name.to_string()
    }

    /// Resolves one token to a member value.
    fn resolve_token(&self, token: &str) -> Result<i64, LiteralError> {
        if let Some(member) = self.member(token) {
            return Ok(member.value);
        }

        let unknown = || LiteralError::UnknownEnumMember {
            type_name: self.type_name(),
            token: token.to_string(),
        };
        let value = self
            .underlying
            .value_of_string(Some(token), &Facets::NONE, HostType::I64)
            .ok()
            .flatten()
            .and_then(|value| value.as_i64())
            .ok_or_else(unknown)?;
        if self.members.iter().any(|m| m.value == value) {
            Ok(value)
        } else {
            Err(unknown())
        }
    }

    /// Parses a token list into the combined value.
    fn parse(&self, literal: &str) -> Result<i64, LiteralError> {
        let tokens: Vec<&str> = literal.split(',').collect();
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(LiteralError::EmptyEnumToken {
                type_name: self.type_name(),
                literal: literal.to_string(),
            });
        }
        if !self.is_flags && tokens.len() > 1 {
            return Err(LiteralError::MultipleEnumTokens {
                type_name: self.type_name(),
                literal: literal.to_string(),
            });
        }

        tokens
            .into_iter()
            .try_fold(0i64, |acc, token| {
                self.resolve_token(token).map(|value| acc | value)
            })
    }

    /// Renders a numeric value as member names.
    fn render(&self, value: i64) -> Result<String, LiteralError> {
        let unknown = || LiteralError::UnknownEnumValue {
            type_name: self.type_name(),
            value,
        };

        if !self.is_flags || value == 0 {
            return self
                .members
                .iter()
                .find(|m| m.value == value)
                .map(|m| m.name.clone())
                .ok_or_else(unknown);
        }

        let mut covered = 0i64;
        let mut names = Vec::new();
        for member in &self.members {
            if member.value != 0 && member.value & value == member.value {
                covered |= member.value;
                names.push(member.name.as_str());
            }
        }

        let residual = value & !covered;
        if residual != 0 {
            return Err(LiteralError::UncoveredFlagBits {
                type_name: self.type_name(),
                bits: residual,
            });
        }
        Ok(names.join(","))
    }
}

impl LiteralType for EnumType {
    fn full_qualified_name(&self) -> &FullQualifiedName {
        &self.name
    }

    fn default_host_type(&self) -> HostType {
        self.underlying.default_host_type()
    }

    fn validate(&self, literal: Option<&str>, facets: &Facets) -> bool {
        match literal {
            None => facets.allows_null(),
            Some(literal) => self.parse(literal).is_ok(),
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
        let numeric = value.as_i64().ok_or_else(|| LiteralError::ValueTypeMismatch {
            type_name: self.type_name(),
            found: value.host_type(),
        })?;
        self.render(numeric).map(Some)
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
        let value = self.parse(literal)?;
        if !target.is_integer() {
            return Err(LiteralError::TargetTypeMismatch {
                type_name: self.type_name(),
                target,
            });
        }
        EdmValue::from_i64(value, target)
            .map(Some)
            .ok_or_else(|| LiteralError::LossyConversion {
                type_name: self.type_name(),
                value: value.to_string(),
                target,
            })
    }

    /// Wraps the literal as `Namespace.Name'literal'`.
    fn to_uri_literal(&self, literal: &str) -> String {
        format!("{}'{}'", self.name, literal)
    }

    fn from_uri_literal(&self, uri_literal: &str) -> Result<String, LiteralError> {
        let (prefix, quoted) = match uri_literal.find('\'') {
            Some(index) => uri_literal.split_at(index),
            None => (uri_literal, ""),
        };

        let Some((namespace, name)) = prefix
            .rsplit_once('.')
            .filter(|(namespace, name)| !namespace.is_empty() && !name.is_empty())
        else {
            return Err(LiteralError::UriPrefixMissing {
                type_name: self.type_name(),
                literal: uri_literal.to_string(),
            });
        };
        if namespace != self.name.namespace() {
            return Err(LiteralError::UriNamespaceMismatch {
                expected: self.name.namespace().to_string(),
                found: namespace.to_string(),
            });
        }
        if name != self.name.name() {
            return Err(LiteralError::UriTypeNameMismatch {
                expected: self.name.name().to_string(),
                found: name.to_string(),
            });
        }

        match quoted
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            Some(body) => Ok(body.to_string()),
            None => Err(LiteralError::MalformedUriLiteral {
                type_name: self.type_name(),
                literal: uri_literal.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::MemberDecl;
    use std::sync::Arc;

    fn sbyte_enum(is_flags: bool) -> EnumType {
        EnumType::new(
            FullQualifiedName::new("namespace", "name"),
            PrimitiveTypeKind::SByte.instance(),
            is_flags,
            vec![Member::new("first", 1), Member::new("second", 64)],
        )
        .unwrap()
    }

    fn parse(ty: &EnumType, literal: &str) -> Result<Option<EdmValue>, LiteralError> {
        ty.value_of_string(Some(literal), &Facets::NONE, HostType::I8)
    }

    fn render(ty: &EnumType, value: EdmValue) -> Result<Option<String>, LiteralError> {
        ty.value_to_string(Some(&value), &Facets::NONE)
    }

    #[test]
    fn test_members() {
        let ty = sbyte_enum(false);
        assert_eq!(ty.member("first").map(Member::value), Some(1));
        assert!(ty.member("third").is_none());
        assert_eq!(ty.member_names().collect::<Vec<_>>(), vec!["first", "second"]);
        // Restartable
        assert_eq!(ty.member_names().count(), 2);
        assert_eq!(ty.underlying_type().kind(), PrimitiveTypeKind::SByte);
        assert_eq!(ty.default_host_type(), HostType::I8);
    }

    #[test]
    fn test_nominal_compatibility() {
        let ty = Arc::new(sbyte_enum(false));
        assert!(ty.is_compatible(&EdmType::Enum(ty.clone())));
        assert!(ty.is_compatible(&EdmType::Enum(Arc::new(sbyte_enum(true)))));
        assert!(!ty.is_compatible(&EdmType::Primitive(ty.underlying_type())));

        let other = EnumType::new(
            FullQualifiedName::new("namespace", "other"),
            PrimitiveTypeKind::SByte.instance(),
            false,
            vec![],
        )
        .unwrap();
        assert!(!ty.is_compatible(&EdmType::Enum(Arc::new(other))));
    }

    #[test]
    fn test_non_flags() {
        let ty = sbyte_enum(false);
        assert_eq!(render(&ty, EdmValue::I8(1)).unwrap(), Some("first".to_string()));
        assert_eq!(render(&ty, EdmValue::I64(64)).unwrap(), Some("second".to_string()));
        assert_eq!(parse(&ty, "1").unwrap(), Some(EdmValue::I8(1)));
        assert_eq!(parse(&ty, "second").unwrap(), Some(EdmValue::I8(64)));

        for literal in ["1,", ",1", "1,64", "first,second", ""] {
            let err = parse(&ty, literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Content, "{}", literal);
            assert!(!ty.validate(Some(literal), &Facets::NONE));
        }
        let err = render(&ty, EdmValue::I8(65)).unwrap_err();
        assert!(matches!(err, LiteralError::UnknownEnumValue { value: 65, .. }));
    }

    #[test]
    fn test_flags() {
        let ty = sbyte_enum(true);
        assert_eq!(render(&ty, EdmValue::I8(65)).unwrap(), Some("first,second".to_string()));
        assert_eq!(parse(&ty, "first,64").unwrap(), Some(EdmValue::I8(65)));
        assert_eq!(parse(&ty, "1,1,first").unwrap(), Some(EdmValue::I8(1)));
        assert!(ty.validate(Some("64"), &Facets::NONE));
        assert!(ty.validate(Some("second,first"), &Facets::NONE));

        for literal in ["1,", ",1", "1,,64", "2", "third", "first,2"] {
            let err = parse(&ty, literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Content, "{}", literal);
        }
    }

    #[test]
    fn test_flags_uncovered_bits() {
        let ty = sbyte_enum(true);
        let err = render(&ty, EdmValue::I8(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Content);
        assert!(matches!(err, LiteralError::UncoveredFlagBits { bits: 2, .. }));

        // No member has value zero
        let err = render(&ty, EdmValue::I8(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Content);

        let with_none = EnumType::new(
            FullQualifiedName::new("namespace", "name"),
            PrimitiveTypeKind::SByte.instance(),
            true,
            vec![Member::new("none", 0), Member::new("first", 1)],
        )
        .unwrap();
        assert_eq!(render(&with_none, EdmValue::I8(0)).unwrap(), Some("none".to_string()));
        assert_eq!(render(&with_none, EdmValue::I8(1)).unwrap(), Some("first".to_string()));
    }

    #[test]
    fn test_type_mismatches() {
        let ty = sbyte_enum(false);
        let err = render(&ty, EdmValue::F64(1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = ty
            .value_of_string(Some("first"), &Facets::NONE, HostType::String)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let wide = EnumType::new(
            FullQualifiedName::new("namespace", "wide"),
            PrimitiveTypeKind::Int32.instance(),
            false,
            vec![Member::new("big", 300)],
        )
        .unwrap();
        let err = wide
            .value_of_string(Some("big"), &Facets::NONE, HostType::I8)
            .unwrap_err();
        assert!(matches!(err, LiteralError::LossyConversion { .. }));
        assert_eq!(
            wide.value_of_string_as::<i64>(Some("300"), &Facets::NONE),
            Ok(Some(300))
        );
    }

    #[test]
    fn test_null_handling() {
        let ty = sbyte_enum(false);
        assert!(ty.validate(None, &Facets::NONE));
        assert!(!ty.validate(None, &Facets::new().nullable(false)));
        assert_eq!(ty.value_to_string(None, &Facets::NONE), Ok(None));
        let err = ty
            .value_of_string(None, &Facets::new().nullable(false), HostType::I8)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FacetViolation);
    }

    #[test]
    fn test_uri_literals() {
        let ty = sbyte_enum(true);
        assert_eq!(ty.to_uri_literal("first,second"), "namespace.name'first,second'");
        assert_eq!(ty.from_uri_literal("namespace.name'first'").unwrap(), "first");
        assert_eq!(ty.from_uri_literal("namespace.name''").unwrap(), "");

        assert!(matches!(
            ty.from_uri_literal(""),
            Err(LiteralError::UriPrefixMissing { .. })
        ));
        assert!(matches!(
            ty.from_uri_literal("name'first'"),
            Err(LiteralError::UriPrefixMissing { .. })
        ));
        assert!(matches!(
            ty.from_uri_literal("namespace.name'first"),
            Err(LiteralError::MalformedUriLiteral { .. })
        ));
        assert!(matches!(
            ty.from_uri_literal("namespace.namespace'first'"),
            Err(LiteralError::UriTypeNameMismatch { .. })
        ));
        assert!(matches!(
            ty.from_uri_literal("other.name'first'"),
            Err(LiteralError::UriNamespaceMismatch { .. })
        ));
        let err = ty.from_uri_literal("namespace.name").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_from_decl() {
        let decl = EnumTypeDecl::new("Size")
            .member(MemberDecl::new("Small"))
            .member(MemberDecl::with_value("Large", 10))
            .member(MemberDecl::new("Huge"));
        let ty = EnumType::from_decl(FullQualifiedName::new("namespace", "Size"), &decl).unwrap();
        assert_eq!(ty.underlying_type().kind(), PrimitiveTypeKind::Int32);
        let values: Vec<i64> = ty.members().iter().map(Member::value).collect();
        assert_eq!(values, vec![0, 10, 11]);
    }

    #[test]
    fn test_invalid_declarations() {
        let name = FullQualifiedName::new("namespace", "Bad");

        let decl = EnumTypeDecl::new("Bad").underlying_type(FullQualifiedName::edm("String"));
        assert!(matches!(
            EnumType::from_decl(name.clone(), &decl),
            Err(ModelError::InvalidUnderlyingType { .. })
        ));

        let decl = EnumTypeDecl::new("Bad")
            .underlying_type(FullQualifiedName::edm("Byte"))
            .member(MemberDecl::with_value("a", 256));
        assert!(matches!(
            EnumType::from_decl(name.clone(), &decl),
            Err(ModelError::MemberValueOutOfRange { value: 256, .. })
        ));

        let decl = EnumTypeDecl::new("Bad")
            .member(MemberDecl::new("a"))
            .member(MemberDecl::new("a"));
        let err = EnumType::from_decl(name.clone(), &decl).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateMember { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidModel);

        let decl = EnumTypeDecl::new("Bad")
            .underlying_type(FullQualifiedName::edm("Int64"))
            .member(MemberDecl::with_value("max", i64::MAX))
            .member(MemberDecl::new("overflow"));
        assert!(matches!(
            EnumType::from_decl(name, &decl),
            Err(ModelError::MemberValueOutOfRange { .. })
        ));
    }
}
