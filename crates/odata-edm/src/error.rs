//! Error types for literal conversion, model resolution and version handling.

use thiserror::Error;

use crate::model::{FullQualifiedName, HostType};

/// Error classification shared by every error type in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// E001: Literal, URI literal or version string does not match its grammar
    Syntax,
    /// E002: Nullable, MaxLength, Precision, Scale or Unicode broken
    FacetViolation,
    /// E003: Host type incompatible with the type, or conversion is lossy
    TypeMismatch,
    /// E004: Malformed enum token list, unknown member, uncovered flag bits
    Content,
    /// E005: Referenced type absent from the provider
    UnresolvedReference,
    /// E006: Declaration violates a model invariant
    InvalidModel,
}

impl ErrorKind {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "E001",
            ErrorKind::FacetViolation => "E002",
            ErrorKind::TypeMismatch => "E003",
            ErrorKind::Content => "E004",
            ErrorKind::UnresolvedReference => "E005",
            ErrorKind::InvalidModel => "E006",
        }
    }
}

/// Error while converting between host values, literals and URI literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    // === E001: Syntax ===
    #[error("[E001] {literal:?} is not a valid {type_name} literal")]
    InvalidLiteral { type_name: String, literal: String },

    #[error("[E001] {literal:?} is not a valid {type_name} URI literal")]
    MalformedUriLiteral { type_name: String, literal: String },

    #[error("[E001] URI literal {literal:?} lacks the qualified type prefix of {type_name}")]
    UriPrefixMissing { type_name: String, literal: String },

    #[error("[E001] URI literal namespace {found:?} does not match {expected:?}")]
    UriNamespaceMismatch { expected: String, found: String },

    #[error("[E001] URI literal type name {found:?} does not match {expected:?}")]
    UriTypeNameMismatch { expected: String, found: String },

    // === E002: Facet violation ===
    #[error("[E002] null is not allowed for non-nullable {type_name}")]
    NullNotAllowed { type_name: String },

    #[error("[E002] {type_name} length {length} exceeds MaxLength {max}")]
    MaxLengthExceeded {
        type_name: String,
        length: usize,
        max: u32,
    },

    #[error("[E002] {type_name} has {digits} significant digits, Precision allows {precision}")]
    PrecisionExceeded {
        type_name: String,
        digits: usize,
        precision: u32,
    },

    #[error("[E002] {type_name} has {digits} fractional digits, Scale allows {scale}")]
    ScaleExceeded {
        type_name: String,
        digits: usize,
        scale: u32,
    },

    #[error("[E002] {type_name} value contains non-ASCII characters but Unicode is false")]
    NonAsciiValue { type_name: String },

    // === E003: Type mismatch ===
    #[error("[E003] {type_name} cannot render a value of host type {found:?}")]
    ValueTypeMismatch { type_name: String, found: HostType },

    #[error("[E003] {type_name} cannot be represented as host type {target:?}")]
    TargetTypeMismatch { type_name: String, target: HostType },

    #[error("[E003] {type_name} value {value} does not fit host type {target:?}")]
    LossyConversion {
        type_name: String,
        value: String,
        target: HostType,
    },

    #[error("[E003] value {value} is outside the range of {type_name}")]
    ValueOutOfRange { type_name: String, value: String },

    // === E004: Content ===
    #[error("[E004] {literal:?} contains an empty {type_name} member token")]
    EmptyEnumToken { type_name: String, literal: String },

    #[error("[E004] {literal:?} lists several members of non-flags enum {type_name}")]
    MultipleEnumTokens { type_name: String, literal: String },

    #[error("[E004] {token:?} is neither a member name nor a member value of {type_name}")]
    UnknownEnumMember { type_name: String, token: String },

    #[error("[E004] value {value} is not a member value of {type_name}")]
    UnknownEnumValue { type_name: String, value: i64 },

    #[error("[E004] bits {bits:#x} of {type_name} value are not covered by any member")]
    UncoveredFlagBits { type_name: String, bits: i64 },
}

impl LiteralError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LiteralError::InvalidLiteral { .. }
            | LiteralError::MalformedUriLiteral { .. }
            | LiteralError::UriPrefixMissing { .. }
            | LiteralError::UriNamespaceMismatch { .. }
            | LiteralError::UriTypeNameMismatch { .. } => ErrorKind::Syntax,
            LiteralError::NullNotAllowed { .. }
            | LiteralError::MaxLengthExceeded { .. }
            | LiteralError::PrecisionExceeded { .. }
            | LiteralError::ScaleExceeded { .. }
            | LiteralError::NonAsciiValue { .. } => ErrorKind::FacetViolation,
            LiteralError::ValueTypeMismatch { .. }
            | LiteralError::TargetTypeMismatch { .. }
            | LiteralError::LossyConversion { .. }
            | LiteralError::ValueOutOfRange { .. } => ErrorKind::TypeMismatch,
            LiteralError::EmptyEnumToken { .. }
            | LiteralError::MultipleEnumTokens { .. }
            | LiteralError::UnknownEnumMember { .. }
            | LiteralError::UnknownEnumValue { .. }
            | LiteralError::UncoveredFlagBits { .. } => ErrorKind::Content,
        }
    }
}

/// Error while resolving or constructing types of the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    // === E005: Unresolved reference ===
    #[error("[E005] {context} {name} is not declared by the provider")]
    UnresolvedReference {
        name: FullQualifiedName,
        context: &'static str,
    },

    // === E006: Invalid model ===
    #[error("[E006] base type chain of {name} is cyclic")]
    CyclicBaseType { name: FullQualifiedName },

    #[error("[E006] {name} is declared more than once")]
    DuplicateDeclaration { name: FullQualifiedName },

    #[error("[E006] enum {name} cannot use {underlying} as underlying type")]
    InvalidUnderlyingType {
        name: FullQualifiedName,
        underlying: FullQualifiedName,
    },

    #[error("[E006] enum {name} declares member {member:?} twice")]
    DuplicateMember {
        name: FullQualifiedName,
        member: String,
    },

    #[error("[E006] member {member:?} of enum {name} has value {value} outside the underlying range")]
    MemberValueOutOfRange {
        name: FullQualifiedName,
        member: String,
        value: i64,
    },

    #[error("[E006] {name} declares element {element:?} twice")]
    DuplicateElement {
        name: FullQualifiedName,
        element: String,
    },

    #[error("[E006] {name} is not a primitive or enum type")]
    NotAPrimitiveOrEnum { name: FullQualifiedName },
}

impl ModelError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            _ => ErrorKind::InvalidModel,
        }
    }
}

/// Error while validating or comparing a data service version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("[E001] {version:?} is not a data service version (expected <major>.<minor>[;tag])")]
    InvalidVersion { version: String },

    #[error("[E001] {version:?} is not a supported data service version")]
    UnsupportedVersion { version: String },
}

impl VersionError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Syntax
    }
}
