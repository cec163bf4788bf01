use crate::cache::ElementCollection;
use crate::error::AppError;
use crate::model::ElementEntry;
use mcp_common::mcp_api::ElementView;

/// How many spec names an unknown-spec error lists.
const MAX_LISTED_SPECS: usize = 10;

/// Elements across all specs (or one exact spec), optionally narrowed by name.
///
/// The name query is case-insensitive, matches exactly or as a substring, and ignores
/// surrounding angle brackets, so `<video>` finds `video`.
pub fn html_elements(
    elements: &ElementCollection,
    spec: Option<&str>,
    element: Option<&str>,
) -> Result<Vec<ElementView>, AppError> {
    let tables: Vec<(&String, &Vec<ElementEntry>)> = match spec.map(str::trim) {
        Some(spec) => {
            let (key, table) = elements
                .by_spec
                .get_key_value(spec)
                .ok_or_else(|| unknown_spec(elements, spec))?;
            vec![(key, table)]
        }
        None => elements.by_spec.iter().collect(),
    };

    let query = element.map(normalize_element_query).filter(|q| !q.is_empty());

    Ok(tables
        .into_iter()
        .flat_map(|(spec, table)| table.iter().map(move |e| (spec, e)))
        .filter(|(_, e)| {
            query.as_deref().is_none_or(|q| {
                let name = e.name.to_lowercase();
                name == q || name.contains(q)
            })
        })
        .map(|(spec, e)| ElementView {
            name: e.name.clone(),
            spec: spec.clone(),
            interface: e.interface.clone(),
            href: e.href.clone(),
        })
        .collect())
}

fn normalize_element_query(element: &str) -> String {
    element
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim()
        .to_lowercase()
}

fn unknown_spec(elements: &ElementCollection, spec: &str) -> AppError {
    let mut listed: Vec<&str> = elements
        .by_spec
        .keys()
        .take(MAX_LISTED_SPECS)
        .map(String::as_str)
        .collect();
    if elements.by_spec.len() > MAX_LISTED_SPECS {
        listed.push("...");
    }
    let hint = if listed.is_empty() {
        "No element data is available".to_string()
    } else {
        format!("Available specs: {}", listed.join(", "))
    };

    AppError::NotFound {
        what: "element spec",
        identifier: spec.to_string(),
        suggestions: Vec::new(),
        hint: Some(hint),
    }
}
