/// Maps a free-form identifier to a single specification.
///
/// Resolution order, first hit wins:
/// 1. exact shortname
/// 2. exact series alias
/// 3. substring containment in either direction, scanning in listing order
///
/// Step 3 returns the first structural match, not the most relevant one: "css" resolves to
/// whichever CSS spec appears first in the listing.
use crate::cache::SpecIndex;
use crate::error::AppError;
use crate::model::SpecRecord;

pub const MAX_SUGGESTIONS: usize = 5;

pub fn resolve<'a>(index: &'a SpecIndex, identifier: &str) -> Option<&'a SpecRecord> {
    let key = normalize(identifier);
    if key.is_empty() {
        return None;
    }

    resolve_exact(index, &key).or_else(|| {
        index
            .entries()
            .find(|(_, keys)| key.contains(&keys.shortname) || keys.shortname.contains(&key))
            .map(|(spec, _)| spec)
    })
}

/// Index-only lookup (steps 1 and 2).
pub fn resolve_exact<'a>(index: &'a SpecIndex, identifier: &str) -> Option<&'a SpecRecord> {
    lookup_exact(index, &normalize(identifier))
}

/// Like `resolve`, but a miss becomes a `NotFound` error with suggestions.
pub fn resolve_or_suggest<'a>(
    index: &'a SpecIndex,
    identifier: &str,
) -> Result<&'a SpecRecord, AppError> {
    resolve(index, identifier).ok_or_else(|| {
        AppError::not_found(
            "specification",
            identifier.trim(),
            suggest(index, identifier, MAX_SUGGESTIONS),
        )
    })
}

/// Shortnames whose shortname or title contains the identifier, in listing order.
pub fn suggest(index: &SpecIndex, identifier: &str, limit: usize) -> Vec<String> {
    let key = normalize(identifier);
    if key.is_empty() {
        return Vec::new();
    }
    index
        .entries()
        .filter(|(_, keys)| keys.shortname.contains(&key) || keys.title.contains(&key))
        .map(|(spec, _)| spec.shortname.clone())
        .take(limit)
        .collect()
}

fn lookup_exact<'a>(index: &'a SpecIndex, key: &str) -> Option<&'a SpecRecord> {
    index.by_shortname(key).or_else(|| index.by_series(key))
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
