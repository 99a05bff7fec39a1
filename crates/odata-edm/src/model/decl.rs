//! Raw type declarations as returned by an [`EdmProvider`](crate::provider::EdmProvider).
//!
//! Declarations are plain data. They are validated and turned into
//! resolved types by the [`Edm`](crate::edm::Edm) registry.

use crate::model::{Facets, FullQualifiedName};

/// A structural property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    /// Primitive, enum or complex type of the property.
    pub type_name: FullQualifiedName,
    pub collection: bool,
    pub facets: Facets,
    pub default_value: Option<String>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, type_name: FullQualifiedName) -> Self {
        Self {
            name: name.into(),
            type_name,
            collection: false,
            facets: Facets::NONE,
            default_value: None,
        }
    }

    pub fn collection(mut self, collection: bool) -> Self {
        self.collection = collection;
        self
    }

    pub fn facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }
}

/// A navigation property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPropertyDecl {
    pub name: String,
    /// Entity type the navigation leads to.
    pub type_name: FullQualifiedName,
    pub collection: bool,
    pub nullable: Option<bool>,
    /// Name of the navigation property on the target pointing back.
    pub partner: Option<String>,
    pub contains_target: bool,
}

impl NavigationPropertyDecl {
    pub fn new(name: impl Into<String>, type_name: FullQualifiedName) -> Self {
        Self {
            name: name.into(),
            type_name,
            collection: false,
            nullable: None,
            partner: None,
            contains_target: false,
        }
    }

    pub fn collection(mut self, collection: bool) -> Self {
        self.collection = collection;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    pub fn contains_target(mut self, contains_target: bool) -> Self {
        self.contains_target = contains_target;
        self
    }
}

/// Declaration of a complex or entity type.
///
/// `key` and `has_stream` are only meaningful for entity types and are
/// ignored for complex types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredTypeDecl {
    pub name: String,
    pub base_type: Option<FullQualifiedName>,
    pub is_abstract: bool,
    pub is_open_type: bool,
    pub properties: Vec<PropertyDecl>,
    pub navigation_properties: Vec<NavigationPropertyDecl>,
    pub key: Vec<String>,
    pub has_stream: bool,
}

/// Declaration of a complex type.
pub type ComplexTypeDecl = StructuredTypeDecl;

/// Declaration of an entity type.
pub type EntityTypeDecl = StructuredTypeDecl;

impl StructuredTypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn base_type(mut self, base_type: FullQualifiedName) -> Self {
        self.base_type = Some(base_type);
        self
    }

    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn is_open_type(mut self, is_open_type: bool) -> Self {
        self.is_open_type = is_open_type;
        self
    }

    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    pub fn navigation_property(mut self, navigation_property: NavigationPropertyDecl) -> Self {
        self.navigation_properties.push(navigation_property);
        self
    }

    pub fn key(mut self, property_names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.key = property_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_stream(mut self, has_stream: bool) -> Self {
        self.has_stream = has_stream;
        self
    }
}

/// Declaration of one enum member.
///
/// A member without a value takes the previous member's value plus one
/// (the first member defaults to 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: String,
    pub value: Option<i64>,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// Declaration of an enum type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTypeDecl {
    pub name: String,
    /// Underlying integer type; `Edm.Int32` when absent.
    pub underlying_type: Option<FullQualifiedName>,
    pub is_flags: bool,
    pub members: Vec<MemberDecl>,
}

impl EnumTypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn underlying_type(mut self, underlying_type: FullQualifiedName) -> Self {
        self.underlying_type = Some(underlying_type);
        self
    }

    pub fn is_flags(mut self, is_flags: bool) -> Self {
        self.is_flags = is_flags;
        self
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }
}
