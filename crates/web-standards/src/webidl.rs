/// WebIDL lookup by spec identifier.
///
/// Exact key first, then keys overlapping the identifier as substrings in either
/// direction, so a versioned shortname such as "service-workers-1" finds IDL stored under
/// "service-workers". One overlap wins, several are ambiguous.
use crate::cache::WebIdlCollection;
use crate::error::AppError;
use crate::resolver::MAX_SUGGESTIONS;

pub fn lookup_webidl<'a>(
    idl: &'a WebIdlCollection,
    identifier: &str,
) -> Result<(&'a str, &'a str), AppError> {
    let key = identifier.trim().to_lowercase();

    if let Some((k, text)) = idl.blobs.get_key_value(&key) {
        return Ok((k.as_str(), text.as_str()));
    }

    let overlapping: Vec<(&String, &String)> = idl
        .blobs
        .iter()
        .filter(|(k, _)| {
            let k = k.to_lowercase();
            k.contains(&key) || key.contains(&k)
        })
        .collect();

    match *overlapping.as_slice() {
        [(k, text)] => return Ok((k.as_str(), text.as_str())),
        [] => {}
        _ => {
            return Err(AppError::AmbiguousMatch {
                what: "WebIDL entries",
                identifier: identifier.trim().to_string(),
                candidates: overlapping.iter().map(|(k, _)| (*k).clone()).collect(),
            })
        }
    }

    // Suggest keys sharing the identifier's leading segment ("css" for "css-foo").
    let stem = key.split('-').next().unwrap_or_default();
    let suggestions = idl
        .blobs
        .keys()
        .filter(|k| !stem.is_empty() && k.contains(stem))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect();
    Err(AppError::not_found("WebIDL", identifier.trim(), suggestions))
}

/// Whether any IDL is stored for the spec or its series.
pub fn has_webidl(idl: &WebIdlCollection, shortname: &str, series: Option<&str>) -> bool {
    idl.blobs.contains_key(shortname) || series.is_some_and(|s| idl.blobs.contains_key(s))
}
