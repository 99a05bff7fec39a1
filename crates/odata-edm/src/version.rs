//! Protocol versions and their wire vocabularies.
//!
//! Each version from 3.0 on carries two fixed tables: namespace URIs and JSON
//! annotation keys. Both are keyed by the constants below and must be
//! reproduced exactly, since client and service compare them byte for byte.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::VersionError;

// =============================================================================
// Vocabulary Keys
// =============================================================================

pub const NS_DATASERVICES: &str = "dataservices";
pub const NS_METADATA: &str = "metadata";
pub const NS_SCHEME: &str = "scheme";
pub const NAVIGATION_LINK_REL: &str = "navigationLinkRel";
pub const ASSOCIATION_LINK_REL: &str = "associationLinkRel";
pub const MEDIA_EDIT_LINK_REL: &str = "mediaEditLinkRel";

pub const JSON_TYPE: &str = "jsonType";
pub const JSON_ID: &str = "jsonId";
pub const JSON_ETAG: &str = "jsonETag";
pub const JSON_READ_LINK: &str = "jsonReadLink";
pub const JSON_EDIT_LINK: &str = "jsonEditLink";
pub const JSON_MEDIAREAD_LINK: &str = "jsonMediaReadLink";
pub const JSON_MEDIAEDIT_LINK: &str = "jsonMediaEditLink";
pub const JSON_MEDIA_CONTENT_TYPE: &str = "jsonMediaContentType";
pub const JSON_MEDIA_ETAG: &str = "jsonMediaETag";
pub const JSON_ASSOCIATION_LINK: &str = "jsonAssociationLink";
pub const JSON_NAVIGATION_LINK: &str = "jsonNavigationLink";
pub const JSON_ERROR: &str = "jsonError";
pub const JSON_NEXT_LINK: &str = "jsonNextLink";

/// Key to wire value table of one protocol version.
pub type Vocabulary = FxHashMap<&'static str, &'static str>;

fn table(entries: &[(&'static str, &'static str)]) -> Vocabulary {
    entries.iter().copied().collect()
}

lazy_static! {
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"^([0-9]+)\.([0-9]+)(?:;.*)?$").expect("version pattern is valid");

    static ref EMPTY: Vocabulary = Vocabulary::default();

    static ref V30_NAMESPACES: Vocabulary = table(&[
        (NS_DATASERVICES, "http://schemas.microsoft.com/ado/2007/08/dataservices"),
        (NS_METADATA, "http://schemas.microsoft.com/ado/2007/08/dataservices/metadata"),
        (NS_SCHEME, "http://schemas.microsoft.com/ado/2007/08/dataservices/scheme"),
        (NAVIGATION_LINK_REL, "http://schemas.microsoft.com/ado/2007/08/dataservices/related/"),
        (ASSOCIATION_LINK_REL, "http://schemas.microsoft.com/ado/2007/08/dataservices/relatedlinks/"),
        (MEDIA_EDIT_LINK_REL, "http://schemas.microsoft.com/ado/2007/08/dataservices/edit-media/"),
    ]);

    static ref V30_JSON: Vocabulary = table(&[
        (JSON_TYPE, "odata.type"),
        (JSON_ID, "odata.id"),
        (JSON_ETAG, "odata.etag"),
        (JSON_READ_LINK, "odata.readLink"),
        (JSON_EDIT_LINK, "odata.editLink"),
        (JSON_MEDIAREAD_LINK, "odata.mediaReadLink"),
        (JSON_MEDIAEDIT_LINK, "odata.mediaEditLink"),
        (JSON_MEDIA_CONTENT_TYPE, "odata.mediaContentType"),
        (JSON_MEDIA_ETAG, "odata.mediaEtag"),
        (JSON_ASSOCIATION_LINK, "@odata.associationLinkUrl"),
        (JSON_NAVIGATION_LINK, "@odata.navigationLinkUrl"),
        (JSON_ERROR, "odata.error"),
        (JSON_NEXT_LINK, "odata.nextLink"),
    ]);

    static ref V40_NAMESPACES: Vocabulary = table(&[
        (NS_METADATA, "http://docs.oasis-open.org/odata/ns/metadata"),
        (NS_DATASERVICES, "http://docs.oasis-open.org/odata/ns/data"),
        (NS_SCHEME, "http://docs.oasis-open.org/odata/ns/scheme"),
        (NAVIGATION_LINK_REL, "http://docs.oasis-open.org/odata/ns/related/"),
        (ASSOCIATION_LINK_REL, "http://docs.oasis-open.org/odata/ns/relatedlinks/"),
        (MEDIA_EDIT_LINK_REL, "http://docs.oasis-open.org/odata/ns/edit-media/"),
    ]);

    static ref V40_JSON: Vocabulary = table(&[
        (JSON_TYPE, "@odata.type"),
        (JSON_ID, "@odata.id"),
        (JSON_ETAG, "@odata.etag"),
        (JSON_READ_LINK, "@odata.readLink"),
        (JSON_EDIT_LINK, "@odata.editLink"),
        (JSON_MEDIAREAD_LINK, "@odata.mediaReadLink"),
        (JSON_MEDIAEDIT_LINK, "@odata.mediaEditLink"),
        (JSON_MEDIA_CONTENT_TYPE, "@odata.mediaContentType"),
        (JSON_MEDIA_ETAG, "@odata.mediaEtag"),
        (JSON_ASSOCIATION_LINK, "@odata.associationLink"),
        (JSON_NAVIGATION_LINK, "@odata.navigationLink"),
        (JSON_ERROR, "error"),
        (JSON_NEXT_LINK, "@odata.nextLink"),
    ]);
}

// =============================================================================
// ServiceVersion
// =============================================================================

/// A supported protocol version, ordered oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceVersion {
    V10,
    V20,
    V30,
    V40,
}

impl ServiceVersion {
    pub const ALL: [ServiceVersion; 4] = [
        ServiceVersion::V10,
        ServiceVersion::V20,
        ServiceVersion::V30,
        ServiceVersion::V40,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceVersion::V10 => "1.0",
            ServiceVersion::V20 => "2.0",
            ServiceVersion::V30 => "3.0",
            ServiceVersion::V40 => "4.0",
        }
    }

    /// Namespace URIs of this version. Empty before 3.0.
    pub fn namespace_map(&self) -> &'static Vocabulary {
        match self {
            ServiceVersion::V10 | ServiceVersion::V20 => &EMPTY,
            ServiceVersion::V30 => &V30_NAMESPACES,
            ServiceVersion::V40 => &V40_NAMESPACES,
        }
    }

    /// JSON annotation keys of this version. Empty before 3.0.
    pub fn json_map(&self) -> &'static Vocabulary {
        match self {
            ServiceVersion::V10 | ServiceVersion::V20 => &EMPTY,
            ServiceVersion::V30 => &V30_JSON,
            ServiceVersion::V40 => &V40_JSON,
        }
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceVersion {
    type Err = VersionError;

    /// Parses a version string, ignoring any `;tag` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = version_number(s)?;
        ServiceVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == number)
            .ok_or_else(|| VersionError::UnsupportedVersion {
                version: s.to_string(),
            })
    }
}

// =============================================================================
// Version Strings
// =============================================================================

/// Returns the `major.minor` part of a well-formed version string.
fn version_number(version: &str) -> Result<&str, VersionError> {
    if !VERSION_PATTERN.is_match(version) {
        return Err(VersionError::InvalidVersion {
            version: version.to_string(),
        });
    }
    Ok(version.split(';').next().unwrap_or(version))
}

/// Checks that `version` is `<major>.<minor>[;tag]` and names a known version.
///
/// A string outside the grammar is an error; a well-formed but unknown
/// version yields `false`.
pub fn validate_data_service_version(version: &str) -> Result<bool, VersionError> {
    let number = version_number(version)?;
    Ok(ServiceVersion::ALL.iter().any(|v| v.as_str() == number))
}

/// Returns true if `actual` is a later version than `compared_to`.
///
/// Both must be known versions. Only the numeric part is compared.
pub fn is_bigger_than(actual: &str, compared_to: &str) -> Result<bool, VersionError> {
    let numeric = |version: &str| -> Result<(u64, u64), VersionError> {
        let unsupported = || VersionError::UnsupportedVersion {
            version: version.to_string(),
        };
        if !validate_data_service_version(version)? {
            return Err(unsupported());
        }
        let captures = VERSION_PATTERN.captures(version).ok_or_else(unsupported)?;
        let major = captures[1].parse().map_err(|_| unsupported())?;
        let minor = captures[2].parse().map_err(|_| unsupported())?;
        Ok((major, minor))
    };
    Ok(numeric(actual)? > numeric(compared_to)?)
}
