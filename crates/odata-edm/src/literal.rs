//! The literal conversion contract shared by primitive and enum types.

use crate::error::LiteralError;
use crate::model::{EdmValue, Facets, FullQualifiedName, HostType, HostValue};

/// A type whose values have a wire literal and a URI literal form.
///
/// Implementations are stateless with respect to conversions and safe to use
/// from many threads at once.
pub trait LiteralType {
    /// The name identifying this type in the model.
    fn full_qualified_name(&self) -> &FullQualifiedName;

    /// The host type `value_of_string` produces when the caller has no preference.
    fn default_host_type(&self) -> HostType;

    /// Checks a literal against the grammar and the facets.
    ///
    /// Never fails: any violation yields `false`. An absent literal is valid
    /// unless Nullable is false.
    fn validate(&self, literal: Option<&str>, facets: &Facets) -> bool;

    /// Renders a host value as a wire literal.
    fn value_to_string(
        &self,
        value: Option<&EdmValue>,
        facets: &Facets,
    ) -> Result<Option<String>, LiteralError>;

    /// Parses a wire literal into the requested host representation.
    fn value_of_string(
        &self,
        literal: Option<&str>,
        facets: &Facets,
        target: HostType,
    ) -> Result<Option<EdmValue>, LiteralError>;

    /// Parses a wire literal directly into a Rust value.
    fn value_of_string_as<T: HostValue>(
        &self,
        literal: Option<&str>,
        facets: &Facets,
    ) -> Result<Option<T>, LiteralError>
    where
        Self: Sized,
    {
        match self.value_of_string(literal, facets, T::HOST_TYPE)? {
            None => Ok(None),
            Some(value) => T::from_edm_value(value).map(Some).ok_or_else(|| {
                LiteralError::TargetTypeMismatch {
                    type_name: self.full_qualified_name().to_string(),
                    target: T::HOST_TYPE,
                }
            }),
        }
    }

    /// Converts a wire literal to the form embedded in a URI.
    fn to_uri_literal(&self, literal: &str) -> String;

    /// Converts a URI literal back to the wire literal.
    fn from_uri_literal(&self, uri_literal: &str) -> Result<String, LiteralError>;
}

/// Outcome for an absent literal or value under the given facets.
pub(crate) fn absent<T>(
    type_name: &FullQualifiedName,
    facets: &Facets,
) -> Result<Option<T>, LiteralError> {
    if facets.allows_null() {
        Ok(None)
    } else {
        Err(LiteralError::NullNotAllowed {
            type_name: type_name.to_string(),
        })
    }
}
