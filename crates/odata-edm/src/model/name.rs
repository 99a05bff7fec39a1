//! Fully-qualified type names.

use std::fmt;

/// Namespace of the built-in primitive types.
pub const EDM_NAMESPACE: &str = "Edm";

/// A (namespace, name) pair identifying one declared type.
///
/// This is the registry key for every type in the model: no two declarations
/// may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullQualifiedName {
    namespace: String,
    name: String,
}

impl FullQualifiedName {
    /// Creates a name from its namespace and simple name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parses `Namespace.Name`, splitting at the last dot.
    ///
    /// Returns `None` when there is no dot or either side is empty.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (namespace, name) = qualified.rsplit_once('.')?;
        if namespace.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(namespace, name))
    }

    /// Shorthand for a name in the `Edm` namespace.
    pub fn edm(name: impl Into<String>) -> Self {
        Self::new(EDM_NAMESPACE, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this name lives in the `Edm` namespace.
    pub fn is_edm(&self) -> bool {
        self.namespace == EDM_NAMESPACE
    }
}

impl fmt::Display for FullQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_last_dot() {
        let fqn = FullQualifiedName::parse("Org.OData.Core.Tag").unwrap();
        assert_eq!(fqn.namespace(), "Org.OData.Core");
        assert_eq!(fqn.name(), "Tag");
        assert_eq!(fqn.to_string(), "Org.OData.Core.Tag");
    }

    #[test]
    fn test_parse_rejects_unqualified() {
        assert!(FullQualifiedName::parse("Tag").is_none());
        assert!(FullQualifiedName::parse(".Tag").is_none());
        assert!(FullQualifiedName::parse("Core.").is_none());
    }

    #[test]
    fn test_edm_namespace() {
        assert!(FullQualifiedName::edm("Int32").is_edm());
        assert!(!FullQualifiedName::new("namespace", "Int32").is_edm());
    }
}
