/// Loading and validation of the bundled data package.
///
/// Layout under the data directory:
/// - `specs.json`: array of specification entries (browser-specs shape)
/// - `idl/<shortname>.idl`: WebIDL text per specification
/// - `css.json`: `properties`, `atrules`, `selectors` and `values` tables (webref shape)
/// - `elements/<shortname>.json`: `{ "elements": [...] }` per specification
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::model::{CssEntry, Dataset, ElementEntry, Organization, Series, SpecRecord};
use mcp_common::bundle;
use mcp_common::mcp_api::CssFeatureKind;

pub const SPECS_FILE: &str = "specs.json";
pub const IDL_DIR: &str = "idl";
pub const CSS_FILE: &str = "css.json";
pub const ELEMENTS_DIR: &str = "elements";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpec {
    shortname: String,
    title: String,
    url: String,
    organization: Organization,
    #[serde(default)]
    nightly: Option<RawVersion>,
    #[serde(default)]
    release: Option<RawVersion>,
    #[serde(default)]
    series: Option<RawSeries>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    url: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeries {
    shortname: String,
    current_specification: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCss {
    #[serde(default)]
    properties: Vec<RawCssEntry>,
    #[serde(default)]
    atrules: Vec<RawCssEntry>,
    #[serde(default)]
    selectors: Vec<RawCssEntry>,
    #[serde(default)]
    values: Vec<RawCssEntry>,
}

#[derive(Debug, Deserialize)]
struct RawCssEntry {
    name: String,
    href: Option<String>,
    value: Option<String>,
    initial: Option<String>,
    inherited: Option<String>,
    #[serde(rename = "appliesTo")]
    applies_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawElements {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    name: String,
    interface: Option<String>,
    href: Option<String>,
}

pub async fn load_specifications(data_path: &Path) -> Result<Vec<SpecRecord>, AppError> {
    let content = bundle::read_text(&data_path.join(SPECS_FILE)).await?;
    parse_specifications(&content)
}

pub async fn load_webidl(data_path: &Path) -> Result<BTreeMap<String, String>, AppError> {
    let files = bundle::read_text_dir(&data_path.join(IDL_DIR), "idl").await?;
    Ok(files.into_iter().collect())
}

pub async fn load_css(data_path: &Path) -> Result<Vec<CssEntry>, AppError> {
    let content = bundle::read_text(&data_path.join(CSS_FILE)).await?;
    parse_css(&content)
}

pub async fn load_elements(
    data_path: &Path,
) -> Result<BTreeMap<String, Vec<ElementEntry>>, AppError> {
    let files = bundle::read_json_dir::<RawElements>(&data_path.join(ELEMENTS_DIR)).await?;
    files
        .into_iter()
        .map(|(spec, raw)| {
            let elements = raw
                .elements
                .into_iter()
                .map(|e| {
                    let name = e.name.trim().to_string();
                    if name.is_empty() {
                        return Err(invalid(Dataset::Elements, format!("empty element name in {spec}")));
                    }
                    Ok(ElementEntry {
                        name,
                        interface: e.interface,
                        href: e.href,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, AppError>((spec, elements))
        })
        .collect()
}

/// Parses and validates the specification listing.
///
/// Every entry needs a non-empty shortname, title and URL, and shortnames must be unique
/// (compared case-insensitively). One bad entry rejects the whole listing.
pub fn parse_specifications(content: &str) -> Result<Vec<SpecRecord>, AppError> {
    let raw: Vec<RawSpec> = serde_json::from_str(content)
        .map_err(|e| invalid(Dataset::Specifications, e.to_string()))?;

    let mut seen = HashSet::new();
    let mut specs = Vec::with_capacity(raw.len());

    for (position, entry) in raw.into_iter().enumerate() {
        let shortname = entry.shortname.trim().to_string();
        let title = entry.title.trim().to_string();
        let url = entry.url.trim().to_string();

        for (field, value) in [("shortname", &shortname), ("title", &title), ("url", &url)] {
            if value.is_empty() {
                return Err(invalid(
                    Dataset::Specifications,
                    format!("entry {position} has an empty {field}"),
                ));
            }
        }
        if !seen.insert(shortname.to_lowercase()) {
            return Err(invalid(
                Dataset::Specifications,
                format!("duplicate shortname '{shortname}' at entry {position}"),
            ));
        }

        let nightly_url = entry.nightly.as_ref().and_then(|n| n.url.clone());
        let status = entry
            .release
            .as_ref()
            .and_then(|r| r.status.clone())
            .or_else(|| entry.nightly.as_ref().and_then(|n| n.status.clone()));
        let series = entry
            .series
            .filter(|s| !s.shortname.trim().is_empty())
            .map(|s| Series {
                shortname: s.shortname.trim().to_string(),
                current_specification: s.current_specification,
            });

        specs.push(SpecRecord {
            shortname,
            title,
            url,
            nightly_url,
            abstract_text: entry.abstract_text.filter(|a| !a.trim().is_empty()),
            organization: entry.organization,
            status,
            series,
            categories: entry.categories,
        });
    }

    Ok(specs)
}

/// Parses the merged CSS tables into one flat list, properties first.
pub fn parse_css(content: &str) -> Result<Vec<CssEntry>, AppError> {
    let raw: RawCss =
        serde_json::from_str(content).map_err(|e| invalid(Dataset::Css, e.to_string()))?;

    let tables = [
        (CssFeatureKind::Properties, raw.properties),
        (CssFeatureKind::Atrules, raw.atrules),
        (CssFeatureKind::Selectors, raw.selectors),
        (CssFeatureKind::Values, raw.values),
    ];

    let mut entries = Vec::new();
    for (kind, table) in tables {
        for e in table {
            if e.name.trim().is_empty() {
                return Err(invalid(
                    Dataset::Css,
                    format!("empty name in {} table", kind.as_str()),
                ));
            }
            entries.push(CssEntry {
                name: e.name,
                kind,
                href: e.href,
                syntax: e.value,
                initial: e.initial,
                inherited: e.inherited,
                applies_to: e.applies_to,
            });
        }
    }
    Ok(entries)
}

fn invalid(dataset: Dataset, message: String) -> AppError {
    AppError::InvalidData { dataset, message }
}
