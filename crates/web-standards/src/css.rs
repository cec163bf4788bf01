use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::cache::CssCollection;
use crate::model::CssEntry;
use mcp_common::mcp_api::{CssEntryView, CssFeatureKind};

pub const UNKNOWN_SPEC: &str = "unknown";

/// Last path segment before the fragment, e.g. `css-flexbox-1` in
/// `https://drafts.csswg.org/css-flexbox-1/#propdef-flex-direction`.
static SPEC_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/#]+)/#").expect("valid regex"));

pub fn spec_from_href(href: Option<&str>) -> &str {
    href.and_then(|h| SPEC_SEGMENT_RE.captures(h))
        .and_then(|caps| caps.get(1))
        .map_or(UNKNOWN_SPEC, |m| m.as_str())
}

/// Entries of one kind, optionally narrowed by spec identifier (substring) and by exact
/// name (case-insensitive), sorted by name.
pub fn css_entries(
    css: &CssCollection,
    kind: CssFeatureKind,
    spec_filter: Option<&str>,
    name: Option<&str>,
) -> Vec<CssEntryView> {
    let spec_filter = spec_filter.map(|s| s.trim().to_lowercase());
    let name = name.map(str::trim);

    let mut views: Vec<CssEntryView> = css
        .entries
        .iter()
        .filter(|e| e.kind == kind)
        .filter(|e| name.is_none_or(|n| e.name.eq_ignore_ascii_case(n)))
        .map(to_view)
        .filter(|v| {
            spec_filter
                .as_deref()
                .is_none_or(|f| v.spec.to_lowercase().contains(f))
        })
        .collect();

    views.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.spec.cmp(&b.spec)));
    views
}

/// Distinct spec identifiers appearing in one table, sorted.
pub fn spec_ids(css: &CssCollection, kind: CssFeatureKind) -> Vec<String> {
    css.entries
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| spec_from_href(e.href.as_deref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Entry names of one kind containing `name` (case-insensitive), sorted.
pub fn suggest_names(css: &CssCollection, kind: CssFeatureKind, name: &str, limit: usize) -> Vec<String> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    css.entries
        .iter()
        .filter(|e| e.kind == kind && e.name.to_lowercase().contains(&needle))
        .map(|e| e.name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn to_view(entry: &CssEntry) -> CssEntryView {
    CssEntryView {
        name: entry.name.clone(),
        spec: spec_from_href(entry.href.as_deref()).to_string(),
        syntax: entry.syntax.clone(),
        initial: entry.initial.clone(),
        inherited: entry.inherited.clone(),
        applies_to: entry.applies_to.clone(),
        href: entry.href.clone(),
    }
}
