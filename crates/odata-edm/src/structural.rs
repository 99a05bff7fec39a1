//! Structured types: complex and entity types with single inheritance.
//!
//! A structured type keeps only its own declarations. Inherited elements are
//! found by walking the base-type chain, which is resolved through the
//! [`Edm`] registry by name on first use. Elements found by
//! [`StructuredType::property`] are memoized per instance, so repeated lookups
//! of one name return the same `Arc`.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::edm::{Edm, EdmType};
use crate::error::ModelError;
use crate::limits::MAX_BASE_TYPE_DEPTH;
use crate::model::{Facets, FullQualifiedName, NavigationPropertyDecl, PropertyDecl, StructuredTypeDecl};

/// Whether a structured type is a complex or an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuredKind {
    Complex,
    Entity,
}

/// A structural property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    type_name: FullQualifiedName,
    collection: bool,
    facets: Facets,
    default_value: Option<String>,
}

impl Property {
    fn from_decl(decl: &PropertyDecl) -> Self {
        Self {
            name: decl.name.clone(),
            type_name: decl.type_name.clone(),
            collection: decl.collection,
            facets: decl.facets,
            default_value: decl.default_value.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &FullQualifiedName {
        &self.type_name
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Resolves the declared type of this property.
    pub fn resolve_type(&self, edm: &Edm) -> Result<EdmType, ModelError> {
        edm.resolve(&self.type_name)?
            .ok_or_else(|| ModelError::UnresolvedReference {
                name: self.type_name.clone(),
                context: "property type",
            })
    }
}

/// A navigation property leading to an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    name: String,
    target: FullQualifiedName,
    collection: bool,
    nullable: Option<bool>,
    partner: Option<String>,
    contains_target: bool,
}

impl NavigationProperty {
    fn from_decl(decl: &NavigationPropertyDecl) -> Self {
        Self {
            name: decl.name.clone(),
            target: decl.type_name.clone(),
            collection: decl.collection,
            nullable: decl.nullable,
            partner: decl.partner.clone(),
            contains_target: decl.contains_target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_name(&self) -> &FullQualifiedName {
        &self.target
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn nullable(&self) -> Option<bool> {
        self.nullable
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    pub fn contains_target(&self) -> bool {
        self.contains_target
    }

    /// Resolves the entity type this navigation property leads to.
    pub fn target_type(&self, edm: &Edm) -> Result<Arc<StructuredType>, ModelError> {
        edm.entity_type(&self.target)?
            .ok_or_else(|| ModelError::UnresolvedReference {
                name: self.target.clone(),
                context: "navigation target",
            })
    }
}

/// A named member of a structured type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Property(Property),
    NavigationProperty(NavigationProperty),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Property(p) => p.name(),
            Element::NavigationProperty(n) => n.name(),
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Element::Property(p) => Some(p),
            Element::NavigationProperty(_) => None,
        }
    }

    pub fn as_navigation_property(&self) -> Option<&NavigationProperty> {
        match self {
            Element::NavigationProperty(n) => Some(n),
            Element::Property(_) => None,
        }
    }
}

/// A resolved complex or entity type.
#[derive(Debug)]
pub struct StructuredType {
    name: FullQualifiedName,
    kind: StructuredKind,
    base_type: Option<FullQualifiedName>,
    is_abstract: bool,
    is_open_type: bool,
    has_stream: bool,
    key: Vec<String>,
    /// Own property names in declaration order.
    property_names: Vec<String>,
    /// Own navigation property names in declaration order.
    navigation_property_names: Vec<String>,
    own_elements: FxHashMap<String, Arc<Element>>,
    /// Base types, nearest first. Set once the whole chain has resolved.
    ancestors: OnceLock<Vec<Arc<StructuredType>>>,
    /// Elements already found by name, own or inherited.
    resolved: RwLock<FxHashMap<String, Arc<Element>>>,
}

impl StructuredType {
    /// Builds a structured type from its raw declaration.
    ///
    /// Fails if two own elements share a name. The base type is not resolved
    /// here.
    pub fn from_decl(
        name: FullQualifiedName,
        kind: StructuredKind,
        decl: &StructuredTypeDecl,
    ) -> Result<Self, ModelError> {
        let mut own_elements = FxHashMap::default();
        let elements = decl
            .properties
            .iter()
            .map(|p| Element::Property(Property::from_decl(p)))
            .chain(
                decl.navigation_properties
                    .iter()
                    .map(|n| Element::NavigationProperty(NavigationProperty::from_decl(n))),
            );
        for element in elements {
            let element_name = element.name().to_string();
            if own_elements.contains_key(&element_name) {
                return Err(ModelError::DuplicateElement {
                    name,
                    element: element_name,
                });
            }
            own_elements.insert(element_name, Arc::new(element));
        }

        let (key, has_stream) = match kind {
            StructuredKind::Entity => (decl.key.clone(), decl.has_stream),
            StructuredKind::Complex => (Vec::new(), false),
        };

        Ok(Self {
            name,
            kind,
            base_type: decl.base_type.clone(),
            is_abstract: decl.is_abstract,
            is_open_type: decl.is_open_type,
            has_stream,
            key,
            property_names: decl.properties.iter().map(|p| p.name.clone()).collect(),
            navigation_property_names: decl
                .navigation_properties
                .iter()
                .map(|n| n.name.clone())
                .collect(),
            own_elements,
            ancestors: OnceLock::new(),
            resolved: RwLock::default(),
        })
    }

    pub fn full_qualified_name(&self) -> &FullQualifiedName {
        &self.name
    }

    pub fn kind(&self) -> StructuredKind {
        self.kind
    }

    /// Name of the declared base type, if any.
    pub fn base_type_name(&self) -> Option<&FullQualifiedName> {
        self.base_type.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_open_type(&self) -> bool {
        self.is_open_type
    }

    pub fn has_stream(&self) -> bool {
        self.has_stream
    }

    /// Resolves the base-type chain, nearest first.
    ///
    /// A base type missing from the provider is an unresolved reference; a
    /// chain revisiting a type is cyclic.
    fn ancestors(&self, edm: &Edm) -> Result<&[Arc<StructuredType>], ModelError> {
        if let Some(ancestors) = self.ancestors.get() {
            return Ok(ancestors);
        }

        let mut chain: Vec<Arc<StructuredType>> = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(self.name.clone());
        let mut next = self.base_type.clone();
        while let Some(base_name) = next {
            if !seen.insert(base_name.clone()) || chain.len() >= MAX_BASE_TYPE_DEPTH {
                return Err(ModelError::CyclicBaseType {
                    name: self.name.clone(),
                });
            }
            let base = edm
                .structured_type(self.kind, &base_name)?
                .ok_or_else(|| ModelError::UnresolvedReference {
                    name: base_name.clone(),
                    context: "base type",
                })?;
            next = base.base_type.clone();
            chain.push(base);
        }

        // A concurrent resolution may have won; both chains are equal
        let _ = self.ancestors.set(chain);
        Ok(self.ancestors.get().map(Vec::as_slice).unwrap_or_default())
    }

    /// The base type, resolved by name.
    pub fn base_type(&self, edm: &Edm) -> Result<Option<Arc<StructuredType>>, ModelError> {
        Ok(self.ancestors(edm)?.first().cloned())
    }

    /// Union of own and inherited names, root type first, without duplicates.
    fn collect_names<'a>(
        &'a self,
        edm: &Edm,
        own: impl Fn(&'a StructuredType) -> &'a [String],
    ) -> Result<Vec<&'a str>, ModelError> {
        let ancestors = self.ancestors(edm)?;
        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        for t in ancestors.iter().rev().map(Arc::as_ref).chain(std::iter::once(self)) {
            for name in own(t) {
                if seen.insert(name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        Ok(names)
    }

    /// Names of all structural properties, own and inherited.
    pub fn property_names(&self, edm: &Edm) -> Result<Vec<&str>, ModelError> {
        self.collect_names(edm, |t| t.property_names.as_slice())
    }

    /// Names of all navigation properties, own and inherited.
    pub fn navigation_property_names(&self, edm: &Edm) -> Result<Vec<&str>, ModelError> {
        self.collect_names(edm, |t| t.navigation_property_names.as_slice())
    }

    /// Finds a property or navigation property by name.
    ///
    /// Own declarations mask inherited ones. Returns `Ok(None)` for a name
    /// declared nowhere in the chain.
    pub fn property(&self, edm: &Edm, name: &str) -> Result<Option<Arc<Element>>, ModelError> {
        if let Some(hit) = self
            .resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Some(hit.clone()));
        }

        let found = match self.own_elements.get(name) {
            Some(element) => Some(element.clone()),
            None => match self.base_type(edm)? {
                Some(base) => base.property(edm, name)?,
                None => None,
            },
        };
        let Some(found) = found else {
            return Ok(None);
        };

        trace!(type_name = %self.name, element = name, "caching resolved element");
        let mut resolved = self.resolved.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Some(resolved.entry(name.to_string()).or_insert(found).clone()))
    }

    /// Finds a structural property by name.
    pub fn structural_property(&self, edm: &Edm, name: &str) -> Result<Option<Property>, ModelError> {
        Ok(self
            .property(edm, name)?
            .and_then(|element| element.as_property().cloned()))
    }

    /// Finds a navigation property by name.
    pub fn navigation_property(
        &self,
        edm: &Edm,
        name: &str,
    ) -> Result<Option<NavigationProperty>, ModelError> {
        Ok(self
            .property(edm, name)?
            .and_then(|element| element.as_navigation_property().cloned()))
    }

    /// Key property names, inherited from the nearest type declaring a key.
    pub fn key_property_names(&self, edm: &Edm) -> Result<&[String], ModelError> {
        if !self.key.is_empty() {
            return Ok(&self.key);
        }
        Ok(self
            .ancestors(edm)?
            .iter()
            .map(|t| t.key.as_slice())
            .find(|key| !key.is_empty())
            .unwrap_or_default())
    }

    /// Returns true if `other` is this type or one of its ancestors.
    pub fn is_derived_from(&self, edm: &Edm, other: &FullQualifiedName) -> Result<bool, ModelError> {
        if &self.name == other {
            return Ok(true);
        }
        Ok(self.ancestors(edm)?.iter().any(|t| &t.name == other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{ComplexTypeDecl, EntityTypeDecl, EnumTypeDecl, SchemaBuilder};
    use crate::primitive::PrimitiveTypeKind;
    use crate::provider::{EdmProvider, SchemaProvider};

    fn fqn(name: &str) -> FullQualifiedName {
        FullQualifiedName::new("namespace", name)
    }

    fn schema() -> SchemaProvider {
        SchemaBuilder::new("namespace")
            .complex_type("BaseName", |t| {
                t.property("prop1", "Edm.String").navigation("nav1", "Target")
            })
            .complex_type("typeName", |t| {
                t.base_type("BaseName")
                    .property("prop2", "Edm.Int32")
                    .navigation("nav2", "Target")
            })
            .entity_type("Target", |t| t.key(["Id"]).property("Id", "Edm.Int32"))
            .entity_type("SubTarget", |t| t.base_type("Target").property("Extra", "Edm.String"))
            .build()
            .unwrap()
    }

    fn derived(edm: &Edm) -> Arc<StructuredType> {
        edm.complex_type(&fqn("typeName")).unwrap().unwrap()
    }

    #[test]
    fn test_inherited_names() {
        let edm = Edm::new(schema());
        let ty = derived(&edm);
        assert_eq!(ty.property_names(&edm).unwrap(), vec!["prop1", "prop2"]);
        assert_eq!(ty.navigation_property_names(&edm).unwrap(), vec!["nav1", "nav2"]);

        let base = ty.base_type(&edm).unwrap().unwrap();
        assert_eq!(base.full_qualified_name(), &fqn("BaseName"));
        assert!(base.base_type(&edm).unwrap().is_none());
    }

    #[test]
    fn test_property_lookup_is_cached_by_identity() {
        let edm = Edm::new(schema());
        let ty = derived(&edm);

        let first = ty.property(&edm, "prop1").unwrap().unwrap();
        let second = ty.property(&edm, "prop1").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Inherited element is the base's own element
        let base = ty.base_type(&edm).unwrap().unwrap();
        let from_base = base.property(&edm, "prop1").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &from_base));

        let nav = ty.property(&edm, "nav2").unwrap().unwrap();
        assert!(nav.as_navigation_property().is_some());
        assert!(ty.property(&edm, "unknown").unwrap().is_none());
    }

    #[test]
    fn test_property_types() {
        let edm = Edm::new(schema());
        let ty = derived(&edm);

        let prop2 = ty.structural_property(&edm, "prop2").unwrap().unwrap();
        match prop2.resolve_type(&edm).unwrap() {
            EdmType::Primitive(t) => assert_eq!(t.kind(), PrimitiveTypeKind::Int32),
            other => panic!("unexpected {:?}", other.kind()),
        }
        assert!(ty.structural_property(&edm, "nav1").unwrap().is_none());

        let nav1 = ty.navigation_property(&edm, "nav1").unwrap().unwrap();
        let target = nav1.target_type(&edm).unwrap();
        assert_eq!(target.kind(), StructuredKind::Entity);
    }

    #[test]
    fn test_entity_keys() {
        let edm = Edm::new(schema());
        let sub = edm.entity_type(&fqn("SubTarget")).unwrap().unwrap();
        assert_eq!(sub.key_property_names(&edm).unwrap(), &["Id".to_string()]);
        assert_eq!(sub.property_names(&edm).unwrap(), vec!["Id", "Extra"]);
        assert!(sub.is_derived_from(&edm, &fqn("Target")).unwrap());
        assert!(!sub.is_derived_from(&edm, &fqn("BaseName")).unwrap());
    }

    #[test]
    fn test_derived_masks_base() {
        let provider = SchemaBuilder::new("namespace")
            .complex_type("Base", |t| t.property("shared", "Edm.String").property("a", "Edm.String"))
            .complex_type("Derived", |t| t.base_type("Base").property("shared", "Edm.Int64"))
            .build()
            .unwrap();
        let edm = Edm::new(provider);
        let ty = edm.complex_type(&fqn("Derived")).unwrap().unwrap();

        assert_eq!(ty.property_names(&edm).unwrap(), vec!["shared", "a"]);
        let shared = ty.structural_property(&edm, "shared").unwrap().unwrap();
        assert_eq!(shared.type_name(), &FullQualifiedName::edm("Int64"));
    }

    #[test]
    fn test_unresolved_base_type() {
        let provider = SchemaBuilder::new("namespace")
            .complex_type("Orphan", |t| t.base_type("Missing").property("own", "Edm.String"))
            .build()
            .unwrap();
        let edm = Edm::new(provider);
        let ty = edm.complex_type(&fqn("Orphan")).unwrap().unwrap();

        // Own elements resolve without touching the base
        assert!(ty.property(&edm, "own").unwrap().is_some());

        let err = ty.base_type(&edm).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
        assert!(ty.property_names(&edm).is_err());
        assert!(ty.property(&edm, "inherited").is_err());
    }

    #[test]
    fn test_cyclic_base_type() {
        let provider = SchemaBuilder::new("namespace")
            .complex_type("A", |t| t.base_type("B"))
            .complex_type("B", |t| t.base_type("A"))
            .complex_type("Self", |t| t.base_type("Self"))
            .build()
            .unwrap();
        let edm = Edm::new(provider);

        let a = edm.complex_type(&fqn("A")).unwrap().unwrap();
        let err = a.property_names(&edm).unwrap_err();
        assert!(matches!(err, ModelError::CyclicBaseType { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidModel);

        let itself = edm.complex_type(&fqn("Self")).unwrap().unwrap();
        assert!(matches!(
            itself.base_type(&edm),
            Err(ModelError::CyclicBaseType { .. })
        ));
    }

    #[test]
    fn test_base_of_other_category_is_unresolved() {
        struct Mixed;

        impl EdmProvider for Mixed {
            fn enum_type(&self, _name: &FullQualifiedName) -> Option<EnumTypeDecl> {
                None
            }

            fn complex_type(&self, name: &FullQualifiedName) -> Option<ComplexTypeDecl> {
                (name.name() == "Complex")
                    .then(|| ComplexTypeDecl::new("Complex").base_type(fqn("Entity")))
            }

            fn entity_type(&self, name: &FullQualifiedName) -> Option<EntityTypeDecl> {
                (name.name() == "Entity").then(|| EntityTypeDecl::new("Entity"))
            }
        }

        let edm = Edm::new(Mixed);
        let complex = edm.complex_type(&fqn("Complex")).unwrap().unwrap();
        let err = complex.base_type(&edm).unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedReference { context: "base type", .. }));
    }

    #[test]
    fn test_duplicate_elements() {
        let decl = StructuredTypeDecl::new("Dup")
            .property(PropertyDecl::new("x", FullQualifiedName::edm("String")))
            .navigation_property(NavigationPropertyDecl::new("x", fqn("Target")));
        let err = StructuredType::from_decl(fqn("Dup"), StructuredKind::Complex, &decl).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateElement { .. }));
    }

    #[test]
    fn test_concurrent_property_lookup() {
        let edm = Arc::new(Edm::new(schema()));
        let ty = derived(&edm);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let edm = edm.clone();
                let ty = ty.clone();
                std::thread::spawn(move || ty.property(&edm, "prop1").unwrap().unwrap())
            })
            .collect();
        let found: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for element in &found[1..] {
            assert!(Arc::ptr_eq(&found[0], element));
        }
    }
}
