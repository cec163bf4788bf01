use mcp_common::error::CommonError;
use mcp_common::mcp_api::{FieldViolation, ToolErrorKind, ToolErrorPayload};

use crate::model::Dataset;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid {dataset} data: {message}")]
    InvalidData { dataset: Dataset, message: String },

    /// The dataset failed to load earlier and an empty stand-in is being served.
    #[error("{dataset} data is unavailable: the dataset failed to load")]
    Unavailable { dataset: Dataset },

    #[error("{what} not found: '{identifier}'{}", describe_hint(.suggestions, .hint.as_deref()))]
    NotFound {
        what: &'static str,
        identifier: String,
        suggestions: Vec<String>,
        hint: Option<String>,
    },

    #[error("'{identifier}' matches multiple {what}: {}. Use an exact identifier", .candidates.join(", "))]
    AmbiguousMatch {
        what: &'static str,
        identifier: String,
        candidates: Vec<String>,
    },

    #[error("invalid arguments: {}", describe_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },
}

impl AppError {
    pub fn not_found(what: &'static str, identifier: &str, suggestions: Vec<String>) -> Self {
        Self::NotFound {
            what,
            identifier: identifier.to_string(),
            suggestions,
            hint: None,
        }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::NotFound { .. } => ToolErrorKind::NotFound,
            Self::AmbiguousMatch { .. } => ToolErrorKind::AmbiguousMatch,
            Self::Validation { .. } => ToolErrorKind::ValidationFailure,
            Self::Common(_) | Self::InvalidData { .. } | Self::Unavailable { .. } => {
                ToolErrorKind::LoadFailure
            }
            Self::Config(_) => ToolErrorKind::Internal,
        }
    }

    pub fn to_payload(&self) -> ToolErrorPayload {
        let (suggestions, candidates, violations) = match self {
            Self::NotFound { suggestions, .. } => (suggestions.clone(), Vec::new(), Vec::new()),
            Self::AmbiguousMatch { candidates, .. } => (Vec::new(), candidates.clone(), Vec::new()),
            Self::Validation { violations } => (Vec::new(), Vec::new(), violations.clone()),
            _ => (Vec::new(), Vec::new(), Vec::new()),
        };
        ToolErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
            suggestions,
            candidates,
            violations,
        }
    }

    /// Serialized payload handed back through the tool-call boundary.
    pub fn into_tool_error(self) -> String {
        serde_json::to_string(&self.to_payload()).unwrap_or_else(|_| self.to_string())
    }
}

fn describe_hint(suggestions: &[String], hint: Option<&str>) -> String {
    match (suggestions.is_empty(), hint) {
        (false, _) => format!(". Did you mean: {}?", suggestions.join(", ")),
        (true, Some(hint)) => format!(". {hint}"),
        (true, None) => String::new(),
    }
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
