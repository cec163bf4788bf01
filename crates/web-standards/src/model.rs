use std::fmt;

use serde::{Deserialize, Serialize};

use mcp_common::mcp_api::{CssFeatureKind, SpecSummary};

/// Standards body publishing a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Organization {
    #[serde(rename = "W3C")]
    W3c,
    #[serde(rename = "WHATWG")]
    Whatwg,
    #[serde(rename = "IETF")]
    Ietf,
    #[serde(rename = "Ecma International")]
    Ecma,
    #[serde(rename = "Khronos Group")]
    Khronos,
    #[serde(rename = "Alliance for Open Media")]
    Aom,
    #[serde(rename = "Unicode Consortium")]
    Unicode,
    #[serde(rename = "ISO/IEC")]
    IsoIec,
    #[serde(rename = "FIDO Alliance")]
    Fido,
}

impl Organization {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W3c => "W3C",
            Self::Whatwg => "WHATWG",
            Self::Ietf => "IETF",
            Self::Ecma => "Ecma International",
            Self::Khronos => "Khronos Group",
            Self::Aom => "Alliance for Open Media",
            Self::Unicode => "Unicode Consortium",
            Self::IsoIec => "ISO/IEC",
            Self::Fido => "FIDO Alliance",
        }
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of versioned specifications, e.g. "service-workers" grouping "service-workers-1".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub shortname: String,
    /// Shortname of the level the series currently points at, when known.
    pub current_specification: Option<String>,
}

/// A single specification from the bundled listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRecord {
    /// Unique key, e.g. "fetch", "css-flexbox-1"
    pub shortname: String,
    pub title: String,
    /// Canonical URL (release when published, otherwise nightly)
    pub url: String,
    pub nightly_url: Option<String>,
    pub abstract_text: Option<String>,
    pub organization: Organization,
    /// Maturity, e.g. "Living Standard", "Working Draft"
    pub status: Option<String>,
    pub series: Option<Series>,
    pub categories: Vec<String>,
}

impl SpecRecord {
    pub fn series_shortname(&self) -> Option<&str> {
        self.series.as_ref().map(|s| s.shortname.as_str())
    }

    /// The only place a record is projected to its summary form.
    pub fn summary(&self) -> SpecSummary {
        SpecSummary {
            shortname: self.shortname.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            nightly_url: self.nightly_url.clone(),
            organization: self.organization.to_string(),
            status: self.status.clone(),
            categories: self.categories.clone(),
        }
    }
}

/// A row from one of the CSS tables (property, at-rule, selector or value).
#[derive(Debug, Clone, PartialEq)]
pub struct CssEntry {
    pub name: String,
    pub kind: CssFeatureKind,
    pub href: Option<String>,
    /// Value grammar, e.g. "row | row-reverse | column | column-reverse"
    pub syntax: Option<String>,
    pub initial: Option<String>,
    pub inherited: Option<String>,
    pub applies_to: Option<String>,
}

/// An element defined by a markup specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEntry {
    pub name: String,
    /// DOM interface, e.g. "HTMLVideoElement"
    pub interface: Option<String>,
    pub href: Option<String>,
}

/// The four bundled collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Specifications,
    WebIdl,
    Css,
    Elements,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Specifications => "specifications",
            Self::WebIdl => "webidl",
            Self::Css => "css",
            Self::Elements => "elements",
        })
    }
}
