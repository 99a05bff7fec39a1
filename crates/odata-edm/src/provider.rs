//! The provider boundary: where raw type declarations come from.
//!
//! An [`Edm`](crate::edm::Edm) asks its provider for a declaration the first
//! time a name is resolved and caches the result, so a provider is consulted
//! at most once per name. Providers are expected to answer from data that is
//! already loaded; the engine never retries.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::ModelError;
use crate::model::{ComplexTypeDecl, EntityTypeDecl, EnumTypeDecl, FullQualifiedName};

/// Resolves fully-qualified names to raw declarations.
///
/// Each method returns `None` when the provider declares no type of that
/// category under the name.
pub trait EdmProvider: Send + Sync {
    fn enum_type(&self, name: &FullQualifiedName) -> Option<EnumTypeDecl>;

    fn complex_type(&self, name: &FullQualifiedName) -> Option<ComplexTypeDecl>;

    fn entity_type(&self, _name: &FullQualifiedName) -> Option<EntityTypeDecl> {
        None
    }
}

impl<P: EdmProvider + ?Sized> EdmProvider for Arc<P> {
    fn enum_type(&self, name: &FullQualifiedName) -> Option<EnumTypeDecl> {
        (**self).enum_type(name)
    }

    fn complex_type(&self, name: &FullQualifiedName) -> Option<ComplexTypeDecl> {
        (**self).complex_type(name)
    }

    fn entity_type(&self, name: &FullQualifiedName) -> Option<EntityTypeDecl> {
        (**self).entity_type(name)
    }
}

/// In-memory provider over declarations registered up front.
///
/// Usually built with [`SchemaBuilder`](crate::model::SchemaBuilder).
#[derive(Debug, Clone, Default)]
pub struct SchemaProvider {
    enum_types: FxHashMap<FullQualifiedName, EnumTypeDecl>,
    complex_types: FxHashMap<FullQualifiedName, ComplexTypeDecl>,
    entity_types: FxHashMap<FullQualifiedName, EntityTypeDecl>,
}

impl SchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, name: &FullQualifiedName) -> bool {
        self.enum_types.contains_key(name)
            || self.complex_types.contains_key(name)
            || self.entity_types.contains_key(name)
    }

    fn ensure_vacant(&self, name: &FullQualifiedName) -> Result<(), ModelError> {
        if self.contains(name) {
            Err(ModelError::DuplicateDeclaration { name: name.clone() })
        } else {
            Ok(())
        }
    }

    /// Registers an enum declaration under `namespace`.
    pub fn add_enum_type(
        &mut self,
        namespace: &str,
        decl: EnumTypeDecl,
    ) -> Result<FullQualifiedName, ModelError> {
        let name = FullQualifiedName::new(namespace, decl.name.as_str());
        self.ensure_vacant(&name)?;
        self.enum_types.insert(name.clone(), decl);
        Ok(name)
    }

    /// Registers a complex type declaration under `namespace`.
    pub fn add_complex_type(
        &mut self,
        namespace: &str,
        decl: ComplexTypeDecl,
    ) -> Result<FullQualifiedName, ModelError> {
        let name = FullQualifiedName::new(namespace, decl.name.as_str());
        self.ensure_vacant(&name)?;
        self.complex_types.insert(name.clone(), decl);
        Ok(name)
    }

    /// Registers an entity type declaration under `namespace`.
    pub fn add_entity_type(
        &mut self,
        namespace: &str,
        decl: EntityTypeDecl,
    ) -> Result<FullQualifiedName, ModelError> {
        let name = FullQualifiedName::new(namespace, decl.name.as_str());
        self.ensure_vacant(&name)?;
        self.entity_types.insert(name.clone(), decl);
        Ok(name)
    }

    /// Number of declarations across all categories.
    pub fn len(&self) -> usize {
        self.enum_types.len() + self.complex_types.len() + self.entity_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EdmProvider for SchemaProvider {
    fn enum_type(&self, name: &FullQualifiedName) -> Option<EnumTypeDecl> {
        self.enum_types.get(name).cloned()
    }

    fn complex_type(&self, name: &FullQualifiedName) -> Option<ComplexTypeDecl> {
        self.complex_types.get(name).cloned()
    }

    fn entity_type(&self, name: &FullQualifiedName) -> Option<EntityTypeDecl> {
        self.entity_types.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructuredTypeDecl;

    #[test]
    fn test_schema_provider_lookup() {
        let mut provider = SchemaProvider::new();
        let name = provider
            .add_complex_type("namespace", StructuredTypeDecl::new("Address"))
            .unwrap();
        assert_eq!(name, FullQualifiedName::new("namespace", "Address"));

        assert!(provider.complex_type(&name).is_some());
        assert!(provider.enum_type(&name).is_none());
        assert!(provider.entity_type(&name).is_none());
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_schema_provider_rejects_duplicates() {
        let mut provider = SchemaProvider::new();
        provider
            .add_enum_type("namespace", EnumTypeDecl::new("Color"))
            .unwrap();
        let err = provider
            .add_complex_type("namespace", StructuredTypeDecl::new("Color"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDeclaration { .. }));

        // Same simple name in another namespace is a different key
        assert!(provider
            .add_complex_type("other", StructuredTypeDecl::new("Color"))
            .is_ok());
    }

    #[test]
    fn test_arc_provider_delegates() {
        let mut provider = SchemaProvider::new();
        let name = provider
            .add_entity_type("namespace", StructuredTypeDecl::new("Person"))
            .unwrap();
        let shared: Arc<dyn EdmProvider> = Arc::new(provider);
        assert!(shared.entity_type(&name).is_some());
    }
}
