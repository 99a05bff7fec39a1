//! Facets: declared constraints on primitive values.

/// The facets a primitive kind may recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Nullable,
    MaxLength,
    Precision,
    Scale,
    Unicode,
}

/// Constraint values for one conversion.
///
/// Every facet is optional; an absent facet does not constrain the value.
/// Facets a kind does not recognize are ignored by that kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Facets {
    pub nullable: Option<bool>,
    pub max_length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub unicode: Option<bool>,
}

impl Facets {
    /// Facets with nothing declared.
    pub const NONE: Facets = Facets {
        nullable: None,
        max_length: None,
        precision: None,
        scale: None,
        unicode: None,
    };

    pub const fn new() -> Self {
        Self::NONE
    }

    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub const fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub const fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub const fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    /// Returns true unless Nullable is explicitly false.
    pub fn allows_null(&self) -> bool {
        self.nullable != Some(false)
    }
}
