use crate::cache::SpecIndex;
use mcp_common::mcp_api::SpecSummary;

/// Optional filters for browsing the listing. All comparisons ignore case.
#[derive(Debug, Default, Clone)]
pub struct SpecFilter {
    pub organization: Option<String>,
    pub category: Option<String>,
    /// Matched against shortname and title.
    pub keyword: Option<String>,
}

/// Matching specs in listing order, truncated to `limit`, with the untruncated count.
pub fn list_specs(index: &SpecIndex, filter: &SpecFilter, limit: usize) -> (usize, Vec<SpecSummary>) {
    let keyword = filter.keyword.as_deref().map(str::to_lowercase);

    let matching: Vec<_> = index
        .entries()
        .filter(|(spec, _)| {
            filter
                .organization
                .as_deref()
                .is_none_or(|org| spec.organization.as_str().eq_ignore_ascii_case(org))
        })
        .filter(|(spec, _)| {
            filter
                .category
                .as_deref()
                .is_none_or(|cat| spec.categories.iter().any(|c| c.eq_ignore_ascii_case(cat)))
        })
        .filter(|(_, keys)| {
            keyword
                .as_deref()
                .is_none_or(|k| keys.shortname.contains(k) || keys.title.contains(k))
        })
        .collect();

    let total = matching.len();
    let specs = matching
        .into_iter()
        .take(limit)
        .map(|(spec, _)| spec.summary())
        .collect();
    (total, specs)
}
