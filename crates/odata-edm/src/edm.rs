//! The shared type registry.
//!
//! [`Edm`] resolves fully-qualified names to [`EdmType`]s. Primitive types
//! come from the process-wide registry; enum, complex and entity types are
//! built from provider declarations on first request and published into an
//! append-only cache keyed by name. Once published, a type is never replaced,
//! so every caller resolving the same name receives the same `Arc`.

use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::enum_type::EnumType;
use crate::error::ModelError;
use crate::literal::LiteralType;
use crate::model::FullQualifiedName;
use crate::primitive::PrimitiveType;
use crate::provider::EdmProvider;
use crate::structural::{StructuredKind, StructuredType};

/// Category of an [`EdmType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdmTypeKind {
    Primitive,
    Enum,
    Complex,
    Entity,
}

/// A resolved type of the model.
#[derive(Debug, Clone)]
pub enum EdmType {
    Primitive(&'static PrimitiveType),
    Enum(Arc<EnumType>),
    Complex(Arc<StructuredType>),
    Entity(Arc<StructuredType>),
}

impl EdmType {
    pub fn full_qualified_name(&self) -> &FullQualifiedName {
        match self {
            EdmType::Primitive(t) => t.full_qualified_name(),
            EdmType::Enum(t) => t.full_qualified_name(),
            EdmType::Complex(t) | EdmType::Entity(t) => t.full_qualified_name(),
        }
    }

    pub fn kind(&self) -> EdmTypeKind {
        match self {
            EdmType::Primitive(_) => EdmTypeKind::Primitive,
            EdmType::Enum(_) => EdmTypeKind::Enum,
            EdmType::Complex(_) => EdmTypeKind::Complex,
            EdmType::Entity(_) => EdmTypeKind::Entity,
        }
    }

    /// The literal converter of a primitive or enum type.
    pub fn as_literal_type(&self) -> Option<&dyn LiteralType> {
        match self {
            EdmType::Primitive(t) => Some(*t),
            EdmType::Enum(t) => Some(t.as_ref()),
            EdmType::Complex(_) | EdmType::Entity(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Arc<StructuredType>> {
        match self {
            EdmType::Complex(t) | EdmType::Entity(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true if values of `other` may be used where this type is expected.
    ///
    /// Primitive types follow the numeric promotion rules; every other
    /// category is nominal.
    pub fn is_compatible(&self, other: &EdmType) -> bool {
        match self {
            EdmType::Primitive(t) => t.is_compatible(other),
            EdmType::Enum(t) => t.is_compatible(other),
            EdmType::Complex(_) | EdmType::Entity(_) => {
                self.kind() == other.kind()
                    && self.full_qualified_name() == other.full_qualified_name()
            }
        }
    }
}

type Cache<T> = RwLock<FxHashMap<FullQualifiedName, Arc<T>>>;

// Published entries are immutable, so a panic elsewhere cannot leave the
// maps half-updated.
fn read<T>(cache: &Cache<T>) -> RwLockReadGuard<'_, FxHashMap<FullQualifiedName, Arc<T>>> {
    cache.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(cache: &Cache<T>) -> RwLockWriteGuard<'_, FxHashMap<FullQualifiedName, Arc<T>>> {
    cache.write().unwrap_or_else(PoisonError::into_inner)
}

/// Registry resolving names against a provider.
pub struct Edm {
    provider: Box<dyn EdmProvider>,
    enum_types: Cache<EnumType>,
    complex_types: Cache<StructuredType>,
    entity_types: Cache<StructuredType>,
}

impl Edm {
    pub fn new(provider: impl EdmProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            enum_types: RwLock::default(),
            complex_types: RwLock::default(),
            entity_types: RwLock::default(),
        }
    }

    fn cached<T>(cache: &Cache<T>, name: &FullQualifiedName) -> Option<Arc<T>> {
        read(cache).get(name).cloned()
    }

    /// Publishes a freshly built type, or returns the one published first.
    fn publish<T>(cache: &Cache<T>, name: &FullQualifiedName, built: T) -> Arc<T> {
        match write(cache).entry(name.clone()) {
            Entry::Occupied(entry) => {
                debug!(%name, "type already published by a concurrent resolution");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!(%name, "published type");
                entry.insert(Arc::new(built)).clone()
            }
        }
    }

    /// Resolves any type by name.
    ///
    /// Names in the `Edm` namespace resolve to primitive types. Returns
    /// `Ok(None)` if nothing is declared under the name. On a cache miss every
    /// provider category is asked, so a key declared twice fails no matter
    /// which accessor sees it first.
    pub fn resolve(&self, name: &FullQualifiedName) -> Result<Option<EdmType>, ModelError> {
        if name.is_edm() {
            return Ok(PrimitiveType::by_name(name).map(EdmType::Primitive));
        }
        if let Some(t) = Self::cached(&self.enum_types, name) {
            return Ok(Some(EdmType::Enum(t)));
        }
        if let Some(t) = Self::cached(&self.complex_types, name) {
            return Ok(Some(EdmType::Complex(t)));
        }
        if let Some(t) = Self::cached(&self.entity_types, name) {
            return Ok(Some(EdmType::Entity(t)));
        }

        debug!(%name, "resolving declaration from provider");
        let enum_decl = self.provider.enum_type(name);
        let complex_decl = self.provider.complex_type(name);
        let entity_decl = self.provider.entity_type(name);

        let declared = [
            enum_decl.is_some(),
            complex_decl.is_some(),
            entity_decl.is_some(),
        ];
        if declared.iter().filter(|&&d| d).count() > 1 {
            return Err(ModelError::DuplicateDeclaration { name: name.clone() });
        }

        if let Some(decl) = enum_decl {
            let built = EnumType::from_decl(name.clone(), &decl)?;
            return Ok(Some(EdmType::Enum(Self::publish(&self.enum_types, name, built))));
        }
        if let Some(decl) = complex_decl {
            let built = StructuredType::from_decl(name.clone(), StructuredKind::Complex, &decl)?;
            return Ok(Some(EdmType::Complex(Self::publish(
                &self.complex_types,
                name,
                built,
            ))));
        }
        if let Some(decl) = entity_decl {
            let built = StructuredType::from_decl(name.clone(), StructuredKind::Entity, &decl)?;
            return Ok(Some(EdmType::Entity(Self::publish(
                &self.entity_types,
                name,
                built,
            ))));
        }
        Ok(None)
    }

    /// Resolves an enum type by name.
    ///
    /// A name declared in another category resolves to `None`.
    pub fn enum_type(&self, name: &FullQualifiedName) -> Result<Option<Arc<EnumType>>, ModelError> {
        match self.resolve(name)? {
            Some(EdmType::Enum(t)) => Ok(Some(t)),
            _ => Ok(None),
        }
    }

    /// Resolves a complex type by name.
    pub fn complex_type(
        &self,
        name: &FullQualifiedName,
    ) -> Result<Option<Arc<StructuredType>>, ModelError> {
        self.structured_type(StructuredKind::Complex, name)
    }

    /// Resolves an entity type by name.
    pub fn entity_type(
        &self,
        name: &FullQualifiedName,
    ) -> Result<Option<Arc<StructuredType>>, ModelError> {
        self.structured_type(StructuredKind::Entity, name)
    }

    pub(crate) fn structured_type(
        &self,
        kind: StructuredKind,
        name: &FullQualifiedName,
    ) -> Result<Option<Arc<StructuredType>>, ModelError> {
        match (kind, self.resolve(name)?) {
            (StructuredKind::Complex, Some(EdmType::Complex(t)))
            | (StructuredKind::Entity, Some(EdmType::Entity(t))) => Ok(Some(t)),
            _ => Ok(None),
        }
    }

    /// Resolves a primitive or enum type and returns it as a literal converter.
    pub fn literal_type(&self, name: &FullQualifiedName) -> Result<EdmType, ModelError> {
        match self.resolve(name)? {
            Some(t @ (EdmType::Primitive(_) | EdmType::Enum(_))) => Ok(t),
            Some(_) => Err(ModelError::NotAPrimitiveOrEnum { name: name.clone() }),
            None => Err(ModelError::UnresolvedReference {
                name: name.clone(),
                context: "literal type",
            }),
        }
    }
}
