//! Data model types for the EDM.
//!
//! This module contains the plain data the type engine works on:
//! - Fully-qualified type names
//! - Facets constraining primitive values
//! - Host values produced and consumed by literal conversion
//! - Raw type declarations and a builder for them

pub mod builder;
pub mod decl;
pub mod facets;
pub mod name;
pub mod value;

pub use builder::{EnumTypeBuilder, SchemaBuilder, StructuredTypeBuilder};
pub use decl::{
    ComplexTypeDecl, EntityTypeDecl, EnumTypeDecl, MemberDecl, NavigationPropertyDecl,
    PropertyDecl, StructuredTypeDecl,
};
pub use facets::{FacetKind, Facets};
pub use name::{FullQualifiedName, EDM_NAMESPACE};
pub use value::{Date, DateTimeOffset, Duration, EdmValue, HostType, HostValue, TimeOfDay};
