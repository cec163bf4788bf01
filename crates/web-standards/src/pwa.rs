use crate::cache::{SpecIndex, SpecKeys};
use mcp_common::mcp_api::SpecSummary;

/// Shortnames (or series names) of specs relevant to Progressive Web Apps.
pub const PWA_SHORTNAMES: [&str; 20] = [
    "service-workers",
    "appmanifest",
    "push-api",
    "notifications",
    "background-sync",
    "periodic-background-sync",
    "background-fetch",
    "badging",
    "web-share",
    "web-share-target",
    "content-index",
    "storage",
    "indexeddb",
    "web-locks",
    "screen-wake-lock",
    "file-system-access",
    "payment-request",
    "credential-management",
    "contact-picker",
    "web-app-launch",
];

/// Title keywords that mark a spec as PWA-related even when its shortname is not listed.
pub const PWA_TITLE_KEYWORDS: [&str; 4] = [
    "progressive web app",
    "service worker",
    "web app manifest",
    "offline",
];

pub const PWA_CORE_SHORTNAMES: [&str; 4] =
    ["service-workers", "appmanifest", "push-api", "notifications"];

/// PWA-related specs: exact allow-list matches first, then the rest, each group by title.
pub fn pwa_specs(index: &SpecIndex, core_only: bool) -> Vec<SpecSummary> {
    let (allow, keywords): (&[&str], &[&str]) = if core_only {
        (&PWA_CORE_SHORTNAMES[..], &[][..])
    } else {
        (&PWA_SHORTNAMES[..], &PWA_TITLE_KEYWORDS[..])
    };

    let mut matched: Vec<(bool, &SpecKeys, SpecSummary)> = index
        .entries()
        .filter(|(_, keys)| {
            allow.iter().any(|name| {
                keys.shortname.contains(name)
                    || keys.series.as_deref().is_some_and(|s| s.contains(name))
            }) || keywords.iter().any(|k| keys.title.contains(k))
        })
        .map(|(spec, keys)| (is_exact(keys, allow), keys, spec.summary()))
        .collect();

    matched.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.title.cmp(&b.1.title)));
    matched.into_iter().map(|(_, _, summary)| summary).collect()
}

fn is_exact(keys: &SpecKeys, allow: &[&str]) -> bool {
    allow
        .iter()
        .any(|name| keys.shortname == *name || keys.series.as_deref() == Some(*name))
}
