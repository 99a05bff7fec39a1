//! OData EDM: the type engine of the Entity Data Model.
//!
//! This crate represents the OData type vocabulary, validates literals against
//! it and converts values between host representations, wire literals and the
//! URI literal syntax used in query strings.
//!
//! # Overview
//!
//! - **Primitive types**: sixteen stateless converters with exact,
//!   locale-free grammars
//! - **Enum types**: named integer members, optionally combinable as flags
//! - **Structured types**: complex and entity types resolving inherited
//!   properties through their base-type chain
//! - **Service versions**: protocol versions and their wire vocabularies
//!
//! # Quick Start
//!
//! ```rust
//! use odata_edm::{Edm, EdmType, Facets, FullQualifiedName, LiteralType, SchemaBuilder};
//!
//! let provider = SchemaBuilder::new("Demo")
//!     .enum_type("Access", |e| e
//!         .flags()
//!         .member("Read", 1)
//!         .member("Write", 2)
//!     )
//!     .complex_type("Base", |t| t.property("Id", "Edm.Int32"))
//!     .complex_type("Item", |t| t.base_type("Base").property("Access", "Access"))
//!     .build()
//!     .unwrap();
//! let edm = Edm::new(provider);
//!
//! let item = edm.complex_type(&FullQualifiedName::new("Demo", "Item")).unwrap().unwrap();
//! assert_eq!(item.property_names(&edm).unwrap(), vec!["Id", "Access"]);
//!
//! let access = edm.enum_type(&FullQualifiedName::new("Demo", "Access")).unwrap().unwrap();
//! let bits: Option<i32> = access.value_of_string_as(Some("Read,Write"), &Facets::NONE).unwrap();
//! assert_eq!(bits, Some(3));
//!
//! let int32 = edm.literal_type(&FullQualifiedName::edm("Int32")).unwrap();
//! assert!(matches!(int32, EdmType::Primitive(_)));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Names, facets, host values and raw declarations
//! - [`primitive`]: Primitive type registry and converters
//! - [`enum_type`]: Enum types with flags semantics
//! - [`structural`]: Complex and entity types
//! - [`provider`]: Where declarations come from
//! - [`edm`]: The registry resolving and caching types
//! - [`version`]: Service versions and vocabularies
//! - [`error`]: Error types
//! - [`limits`]: Grammar and range limits
//!
//! # Concurrency
//!
//! Types are built once and then shared. Every converter and registry can be
//! used from many threads; lazily filled caches only ever add entries.

pub mod edm;
pub mod enum_type;
pub mod error;
pub mod limits;
pub mod literal;
pub mod model;
pub mod primitive;
pub mod provider;
pub mod structural;
pub mod util;
pub mod version;

// Re-export commonly used types at crate root
pub use edm::{Edm, EdmType, EdmTypeKind};
pub use enum_type::{EnumType, Member};
pub use error::{ErrorKind, LiteralError, ModelError, VersionError};
pub use literal::LiteralType;
pub use model::{
    ComplexTypeDecl, Date, DateTimeOffset, Duration, EdmValue, EntityTypeDecl, EnumTypeDecl,
    Facets, FullQualifiedName, HostType, HostValue, MemberDecl, NavigationPropertyDecl,
    PropertyDecl, SchemaBuilder, StructuredTypeDecl, TimeOfDay,
};
pub use primitive::{PrimitiveType, PrimitiveTypeKind};
pub use provider::{EdmProvider, SchemaProvider};
pub use structural::{Element, NavigationProperty, Property, StructuredKind, StructuredType};
pub use version::{is_bigger_than, validate_data_service_version, ServiceVersion};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
