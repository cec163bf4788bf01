use std::sync::Arc;

use tracing::debug;

use crate::cache::{DatasetCache, SpecIndex, SpecKeys};
use crate::error::AppError;
use crate::resolver;
use mcp_common::mcp_api::{MatchType, SpecSearchResult};

/// Words of two characters or fewer are ignored by the word-overlap rules.
const MIN_WORD_LEN: usize = 3;

pub struct SearchEngine {
    cache: Arc<DatasetCache>,
}

impl SearchEngine {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self { cache }
    }

    /// Ranked search. A query that is exactly a shortname or series name puts that record
    /// first with score 100, even when the alias alone would only score as a substring.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SpecSearchResult>, AppError> {
        let index = self.cache.specifications().await?;
        let mut results = rank(&index, query, limit);

        if let Some(hit) = self.quick_resolve_by_shortname(query).await? {
            results.retain(|r| r.spec.shortname != hit.spec.shortname);
            results.insert(0, hit);
            results.truncate(limit);
        }

        debug!(query, limit, hits = results.len(), "spec search");
        Ok(results)
    }

    /// Exact shortname or series lookup, skipping scoring entirely.
    pub async fn quick_resolve_by_shortname(
        &self,
        shortname: &str,
    ) -> Result<Option<SpecSearchResult>, AppError> {
        let index = self.cache.specifications().await?;
        Ok(quick_resolve(&index, shortname))
    }
}

pub fn quick_resolve(index: &SpecIndex, shortname: &str) -> Option<SpecSearchResult> {
    resolver::resolve_exact(index, shortname).map(|spec| SpecSearchResult {
        spec: spec.summary(),
        match_type: MatchType::Shortname,
        score: 100.0,
    })
}

/// Scores every record against `query` and returns the best `limit` hits.
///
/// The sort is stable, so records with equal scores keep their listing order.
pub fn rank(index: &SpecIndex, query: &str, limit: usize) -> Vec<SpecSearchResult> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let words: Vec<&str> = query
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .collect();

    let mut results: Vec<SpecSearchResult> = index
        .entries()
        .filter_map(|(spec, keys)| {
            score(keys, &query, &words).map(|(score, match_type)| SpecSearchResult {
                spec: spec.summary(),
                match_type,
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);
    results
}

/// Shortname rules first, then title rules; the abstract is consulted only when neither
/// produced a score. `query` and `words` must already be lowercased.
fn score(keys: &SpecKeys, query: &str, words: &[&str]) -> Option<(f32, MatchType)> {
    let shortname = keys.shortname.as_str();
    if shortname == query {
        return Some((100.0, MatchType::Shortname));
    }
    if shortname.contains(query) {
        return Some((80.0, MatchType::Shortname));
    }
    if shortname.chars().count() > 3 && query.contains(shortname) {
        return Some((70.0, MatchType::Shortname));
    }

    let title = keys.title.as_str();
    if title == query {
        return Some((90.0, MatchType::Title));
    }
    if title.contains(query) {
        return Some((60.0, MatchType::Title));
    }
    if !words.is_empty() {
        let matched = count_present(words, title);
        if matched == words.len() {
            return Some((50.0, MatchType::Title));
        }
        if matched > 0 {
            return Some((30.0 + 20.0 * ratio(matched, words.len()), MatchType::Title));
        }
    }

    let text = keys.abstract_text.as_deref()?;
    if text.contains(query) {
        return Some((25.0, MatchType::Description));
    }
    if !words.is_empty() {
        let share = ratio(count_present(words, text), words.len());
        if share >= 0.5 {
            return Some((15.0 + 10.0 * share, MatchType::Description));
        }
    }
    None
}

fn count_present(words: &[&str], text: &str) -> usize {
    words.iter().filter(|w| text.contains(**w)).count()
}

fn ratio(matched: usize, total: usize) -> f32 {
    matched as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadFailurePolicy;
    use crate::test_support::{fixture_index, write_fixture_bundle};

    fn find<'a>(results: &'a [SpecSearchResult], shortname: &str) -> Option<&'a SpecSearchResult> {
        results.iter().find(|r| r.spec.shortname == shortname)
    }

    #[test]
    fn exact_shortname_scores_100() {
        let index = fixture_index();
        let results = rank(&index, "fetch", 20);
        assert_eq!(results[0].spec.shortname, "fetch");
        assert_eq!(results[0].score, 100.0);
        assert_eq!(results[0].match_type, MatchType::Shortname);
    }

    #[test]
    fn query_containing_shortname_scores_70() {
        let index = fixture_index();
        let results = rank(&index, "the fetch api specification", 20);
        let fetch = find(&results, "fetch").unwrap();
        assert_eq!(fetch.score, 70.0);
        assert_eq!(fetch.match_type, MatchType::Shortname);
    }

    #[test]
    fn short_shortnames_are_not_matched_inside_queries() {
        let index = fixture_index();
        // "dom" is only three characters, so the query-contains-shortname rule is skipped.
        let results = rank(&index, "random things", 20);
        assert!(find(&results, "dom").is_none());
    }

    #[test]
    fn shortname_and_title_rules() {
        let index = fixture_index();

        let results = rank(&index, "flexbox", 20);
        assert_eq!(find(&results, "css-flexbox-1").unwrap().score, 80.0);

        let results = rank(&index, "push api", 20);
        let push = find(&results, "push-api").unwrap();
        assert_eq!((push.score, push.match_type), (90.0, MatchType::Title));

        let results = rank(&index, "service worker", 20);
        let sw = find(&results, "service-workers-1").unwrap();
        assert_eq!((sw.score, sw.match_type), (60.0, MatchType::Title));
    }

    #[test]
    fn word_overlap_in_title() {
        let index = fixture_index();

        let results = rank(&index, "manifest application", 20);
        assert_eq!(find(&results, "appmanifest").unwrap().score, 50.0);

        // "layout" matches, "grid" does not: 30 + 20 * 1/2.
        let results = rank(&index, "grid layout", 20);
        let flexbox = find(&results, "css-flexbox-1").unwrap();
        assert_eq!((flexbox.score, flexbox.match_type), (40.0, MatchType::Title));
    }

    #[test]
    fn abstract_fallback() {
        let index = fixture_index();

        let results = rank(&index, "core markup language", 20);
        let html = find(&results, "html").unwrap();
        assert_eq!((html.score, html.match_type), (25.0, MatchType::Description));

        // "rendering" and "computation" found, "shaders" missing: 15 + 10 * 2/3.
        let results = rank(&index, "rendering computation shaders", 20);
        let gpu = find(&results, "webgpu").unwrap();
        assert_eq!(gpu.match_type, MatchType::Description);
        assert!((gpu.score - (15.0 + 10.0 * 2.0 / 3.0)).abs() < 1e-4);

        // Below half of the words: no match.
        let results = rank(&index, "rendering shaders pipelines", 20);
        assert!(find(&results, "webgpu").is_none());
    }

    #[test]
    fn results_are_sorted_and_limited() {
        let index = fixture_index();
        for query in ["service worker", "standard", "api", "css box"] {
            let results = rank(&index, query, 100);
            for pair in results.windows(2) {
                assert!(pair[0].score >= pair[1].score, "unsorted results for {query}");
            }
            for k in 0..4 {
                assert!(rank(&index, query, k).len() <= k);
            }
        }
        assert!(rank(&index, "fetch", 0).is_empty());

        let results = rank(&index, "service worker", 5);
        assert!(results.len() <= 5);
        assert!(matches!(results[0].match_type, MatchType::Shortname | MatchType::Title));
    }

    #[test]
    fn equal_scores_keep_listing_order() {
        let index = fixture_index();
        let results = rank(&index, "standard", 20);
        let order: Vec<&str> = results.iter().map(|r| r.spec.shortname.as_str()).collect();
        assert_eq!(order, vec!["fetch", "notifications", "html", "dom"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let index = fixture_index();
        for query in ["Service Worker", "the fetch api specification", "WebGPU"] {
            let lower = rank(&index, &query.to_lowercase(), 20);
            assert_eq!(rank(&index, query, 20), lower);
            assert_eq!(rank(&index, &query.to_uppercase(), 20), lower);
        }
    }

    #[test]
    fn blank_query_matches_nothing() {
        let index = fixture_index();
        assert!(rank(&index, "   ", 20).is_empty());
        assert!(rank(&index, "xyznonexistent123abc", 20).is_empty());
    }

    #[test]
    fn quick_resolve_uses_indices_only() {
        let index = fixture_index();
        for spec in index.all() {
            let hit = quick_resolve(&index, &spec.shortname).unwrap();
            assert_eq!(hit.spec, spec.summary());
            assert_eq!(hit.score, 100.0);
            assert_eq!(hit.match_type, MatchType::Shortname);
        }
        assert_eq!(
            quick_resolve(&index, "service-workers").unwrap().spec.shortname,
            "service-workers-2"
        );
        assert!(quick_resolve(&index, "workers").is_none());
    }

    #[tokio::test]
    async fn engine_reads_through_cache() {
        let dir = write_fixture_bundle();
        let cache = Arc::new(DatasetCache::new(dir.path(), LoadFailurePolicy::Fail));
        let engine = SearchEngine::new(Arc::clone(&cache));

        let results = engine.search("fetch", 20).await.unwrap();
        assert_eq!(results[0].spec.shortname, "fetch");
        assert_eq!(results.iter().filter(|r| r.spec.shortname == "fetch").count(), 1);

        // Both versions contain the alias; the series' current version is promoted.
        let results = engine.search("Service-Workers", 20).await.unwrap();
        assert_eq!(results[0].spec.shortname, "service-workers-2");
        assert_eq!(results[0].score, 100.0);
        assert_eq!(results[1].spec.shortname, "service-workers-1");
        assert_eq!(results[1].score, 80.0);
        assert_eq!(results.len(), 2);
        assert_eq!(engine.search("service-workers", 1).await.unwrap().len(), 1);
        let hit = engine.quick_resolve_by_shortname("fetch").await.unwrap().unwrap();
        assert_eq!(hit.score, 100.0);
        assert!(engine.quick_resolve_by_shortname("nope").await.unwrap().is_none());
    }
}
