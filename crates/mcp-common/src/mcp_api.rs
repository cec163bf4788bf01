use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListSpecsParams {
    /// Standards body to filter by, e.g. "W3C", "WHATWG", "IETF".
    pub organization: Option<String>,
    /// Category tag to filter by, e.g. "browser".
    pub category: Option<String>,
    /// Keyword matched against shortnames and titles.
    pub keyword: Option<String>,
    /// Maximum number of specifications to return (default: 50, range: 1-500).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchSpecsParams {
    /// Free-text query, e.g. "service worker" or "fetch".
    pub query: String,
    /// Maximum number of results to return (default: 20, range: 1-100).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShortnameParams {
    /// Specification shortname or series name, e.g. "fetch" or "service-workers".
    pub shortname: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CssPropertiesParams {
    /// Restrict to specs whose identifier contains this text, e.g. "css-flexbox".
    pub spec: Option<String>,
    /// Exact property name, e.g. "flex-direction".
    pub property: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CssFeatureKind {
    Properties,
    Atrules,
    Selectors,
    Values,
}

impl CssFeatureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Atrules => "atrules",
            Self::Selectors => "selectors",
            Self::Values => "values",
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CssFeaturesParams {
    /// Which CSS table to list.
    pub kind: CssFeatureKind,
    /// Restrict to specs whose identifier contains this text, e.g. "css-color".
    pub spec: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct HtmlElementsParams {
    /// Exact spec shortname whose element table to use, e.g. "html" or "svg".
    pub spec: Option<String>,
    /// Element name to search for; angle brackets are ignored ("<video>" works).
    pub element: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PwaSpecsParams {
    /// Only return the core PWA specs (service workers, manifest, push, notifications).
    pub core_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecSummary {
    pub shortname: String,
    pub title: String,
    pub url: String,
    pub nightly_url: Option<String>,
    pub organization: String,
    pub status: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Shortname,
    Title,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecSearchResult {
    #[serde(flatten)]
    pub spec: SpecSummary,
    pub match_type: MatchType,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListSpecsResponse {
    /// Number of specifications matching the filters before the limit was applied.
    pub total: usize,
    pub specs: Vec<SpecSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchSpecsResponse {
    pub results: Vec<SpecSearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecDetailResponse {
    #[serde(flatten)]
    pub spec: SpecSummary,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub series: Option<String>,
    pub has_webidl: bool,
    /// `has_webidl` is unreliable because the WebIDL files failed to load.
    pub webidl_degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebIdlResponse {
    pub shortname: String,
    pub idl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CssEntryView {
    pub name: String,
    /// Spec identifier taken from the entry's reference URL, or "unknown".
    pub spec: String,
    pub syntax: Option<String>,
    pub initial: Option<String>,
    pub inherited: Option<String>,
    pub applies_to: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CssEntriesResponse {
    pub kind: CssFeatureKind,
    pub count: usize,
    pub entries: Vec<CssEntryView>,
    /// The CSS tables failed to load and an empty table is being served.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementView {
    pub name: String,
    pub spec: String,
    pub interface: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HtmlElementsResponse {
    pub count: usize,
    pub elements: Vec<ElementView>,
    /// The element tables failed to load and an empty table is being served.
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PwaSpecsResponse {
    pub count: usize,
    pub specs: Vec<SpecSummary>,
}

/// Dependency data is not computed; both lists are always empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpecDependenciesResponse {
    pub shortname: String,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    NotFound,
    AmbiguousMatch,
    ValidationFailure,
    LoadFailure,
    Internal,
}

/// Structured error body returned to the client when a tool call fails.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolErrorPayload {
    pub kind: ToolErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}
