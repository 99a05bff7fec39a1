//! Builder API for ergonomic schema construction.
//!
//! Provides a fluent interface for declaring enum, complex and entity types
//! and collecting them into an in-memory provider.
//!
//! # Example
//!
//! ```rust
//! use odata_edm::model::{Facets, SchemaBuilder};
//!
//! let provider = SchemaBuilder::new("Demo")
//!     .enum_type("Color", |e| e
//!         .underlying_type("Edm.Byte")
//!         .member("Red", 1)
//!         .member("Green", 2)
//!     )
//!     .complex_type("Address", |t| t
//!         .property("Street", "Edm.String")
//!         .property_with("Zip", "Edm.String", Facets::new().max_length(10))
//!     )
//!     .entity_type("Customer", |t| t
//!         .key(["Id"])
//!         .property("Id", "Edm.Int32")
//!         .property("Address", "Address")
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(provider.len(), 3);
//! ```
//!
//! Type names without a dot are qualified with the builder's current
//! namespace.

use crate::error::ModelError;
use crate::model::{
    EnumTypeDecl, Facets, FullQualifiedName, MemberDecl, NavigationPropertyDecl, PropertyDecl,
    StructuredTypeDecl,
};
use crate::provider::SchemaProvider;

fn qualify(namespace: &str, type_name: &str) -> FullQualifiedName {
    FullQualifiedName::parse(type_name)
        .unwrap_or_else(|| FullQualifiedName::new(namespace, type_name))
}

#[derive(Debug, Clone)]
enum Declaration {
    Enum(String, EnumTypeDecl),
    Complex(String, StructuredTypeDecl),
    Entity(String, StructuredTypeDecl),
}

/// Builder for a set of schema declarations.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    namespace: String,
    declarations: Vec<Declaration>,
}

impl SchemaBuilder {
    /// Creates a builder declaring types in `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            declarations: Vec::new(),
        }
    }

    /// Switches the namespace for subsequent declarations.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Declares an enum type using a builder function.
    pub fn enum_type<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(EnumTypeBuilder) -> EnumTypeBuilder,
    {
        let builder = f(EnumTypeBuilder::new(&self.namespace, name));
        self.declarations
            .push(Declaration::Enum(self.namespace.clone(), builder.decl));
        self
    }

    /// Declares a complex type using a builder function.
    pub fn complex_type<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(StructuredTypeBuilder) -> StructuredTypeBuilder,
    {
        let builder = f(StructuredTypeBuilder::new(&self.namespace, name));
        self.declarations
            .push(Declaration::Complex(self.namespace.clone(), builder.decl));
        self
    }

    /// Declares an entity type using a builder function.
    pub fn entity_type<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(StructuredTypeBuilder) -> StructuredTypeBuilder,
    {
        let builder = f(StructuredTypeBuilder::new(&self.namespace, name));
        self.declarations
            .push(Declaration::Entity(self.namespace.clone(), builder.decl));
        self
    }

    /// Collects the declarations into a provider.
    ///
    /// Fails if two declarations share a fully-qualified name.
    pub fn build(self) -> Result<SchemaProvider, ModelError> {
        let mut provider = SchemaProvider::new();
        for declaration in self.declarations {
            match declaration {
                Declaration::Enum(ns, decl) => provider.add_enum_type(&ns, decl)?,
                Declaration::Complex(ns, decl) => provider.add_complex_type(&ns, decl)?,
                Declaration::Entity(ns, decl) => provider.add_entity_type(&ns, decl)?,
            };
        }
        Ok(provider)
    }
}

/// Builder for an enum type declaration.
#[derive(Debug, Clone)]
pub struct EnumTypeBuilder {
    namespace: String,
    decl: EnumTypeDecl,
}

impl EnumTypeBuilder {
    fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            decl: EnumTypeDecl::new(name),
        }
    }

    /// Sets the underlying integer type (default `Edm.Int32`).
    pub fn underlying_type(mut self, type_name: &str) -> Self {
        self.decl.underlying_type = Some(qualify(&self.namespace, type_name));
        self
    }

    /// Marks the enum as a flags enum.
    pub fn flags(mut self) -> Self {
        self.decl.is_flags = true;
        self
    }

    /// Adds a member with an explicit value.
    pub fn member(mut self, name: &str, value: i64) -> Self {
        self.decl.members.push(MemberDecl::with_value(name, value));
        self
    }

    /// Adds a member whose value follows the previous one.
    pub fn next_member(mut self, name: &str) -> Self {
        self.decl.members.push(MemberDecl::new(name));
        self
    }
}

/// Builder for a complex or entity type declaration.
#[derive(Debug, Clone)]
pub struct StructuredTypeBuilder {
    namespace: String,
    decl: StructuredTypeDecl,
}

impl StructuredTypeBuilder {
    fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            decl: StructuredTypeDecl::new(name),
        }
    }

    /// Sets the base type.
    pub fn base_type(mut self, type_name: &str) -> Self {
        self.decl.base_type = Some(qualify(&self.namespace, type_name));
        self
    }

    pub fn is_abstract(mut self) -> Self {
        self.decl.is_abstract = true;
        self
    }

    pub fn open_type(mut self) -> Self {
        self.decl.is_open_type = true;
        self
    }

    // =========================================================================
    // Structural Properties
    // =========================================================================

    /// Adds a single-valued property without facets.
    pub fn property(self, name: &str, type_name: &str) -> Self {
        self.property_with(name, type_name, Facets::NONE)
    }

    /// Adds a single-valued property with facets.
    pub fn property_with(mut self, name: &str, type_name: &str, facets: Facets) -> Self {
        let type_name = qualify(&self.namespace, type_name);
        self.decl
            .properties
            .push(PropertyDecl::new(name, type_name).facets(facets));
        self
    }

    /// Adds a collection-valued property.
    pub fn collection_property(mut self, name: &str, type_name: &str) -> Self {
        let type_name = qualify(&self.namespace, type_name);
        self.decl
            .properties
            .push(PropertyDecl::new(name, type_name).collection(true));
        self
    }

    /// Adds a fully configured property declaration.
    pub fn property_decl(mut self, property: PropertyDecl) -> Self {
        self.decl.properties.push(property);
        self
    }

    // =========================================================================
    // Navigation Properties
    // =========================================================================

    /// Adds a single-valued navigation property.
    pub fn navigation(mut self, name: &str, target: &str) -> Self {
        let target = qualify(&self.namespace, target);
        self.decl
            .navigation_properties
            .push(NavigationPropertyDecl::new(name, target));
        self
    }

    /// Adds a collection-valued navigation property.
    pub fn navigation_collection(mut self, name: &str, target: &str) -> Self {
        let target = qualify(&self.namespace, target);
        self.decl
            .navigation_properties
            .push(NavigationPropertyDecl::new(name, target).collection(true));
        self
    }

    /// Adds a fully configured navigation property declaration.
    pub fn navigation_decl(mut self, navigation_property: NavigationPropertyDecl) -> Self {
        self.decl.navigation_properties.push(navigation_property);
        self
    }

    // =========================================================================
    // Entity Specifics
    // =========================================================================

    /// Sets the key property names (entity types only).
    pub fn key<S: Into<String>>(mut self, property_names: impl IntoIterator<Item = S>) -> Self {
        self.decl.key = property_names.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the entity type as a media entity.
    pub fn has_stream(mut self) -> Self {
        self.decl.has_stream = true;
        self
    }
}
