//! Complexity and integration-focus presets.
//!
//! Presets are answer values, not catalog entries: the templating step
//! records them in the answers sidecar and the installer dispatcher reads
//! them back to decide which framework installers to run.

use std::fmt;
use std::str::FromStr;

use crate::domain::AnswerMap;

/// Answer value for the admin preset that installs every registered
/// framework, not just the focus selection.
pub const INSTALL_ALL_PRESET: &str = "(Admin) Install ALL packages";

/// Frameworks installed on every run regardless of focus. `uv` is the
/// package manager itself and is always bootstrapped first.
pub const BASELINE_FRAMEWORKS: &[&str] = &["uv", "ruff"];

/// High-level project focus, expanded into a framework selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationFocus {
    AiFirst,
    WebApi,
    DataProcessing,
    FullStack,
}

impl IntegrationFocus {
    pub const ALL: &'static [IntegrationFocus] = &[
        Self::AiFirst,
        Self::WebApi,
        Self::DataProcessing,
        Self::FullStack,
    ];

    /// The answer-file spelling of this focus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiFirst => "ai_first",
            Self::WebApi => "web_api",
            Self::DataProcessing => "data_processing",
            Self::FullStack => "full_stack",
        }
    }

    /// Frameworks this focus pulls in on top of [`BASELINE_FRAMEWORKS`].
    pub fn frameworks(&self) -> &'static [&'static str] {
        match self {
            Self::AiFirst => &["pydantic_ai", "crew_ai", "instructor", "fastapi"],
            Self::WebApi => &["fastapi", "litestar", "pydantic_ai"],
            Self::DataProcessing => &["polars", "duckdb", "pyarrow", "ibis"],
            Self::FullStack => &["fastapi", "pydantic_ai", "polars", "postgresql"],
        }
    }
}

impl fmt::Display for IntegrationFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai_first" => Ok(Self::AiFirst),
            "web_api" => Ok(Self::WebApi),
            "data_processing" => Ok(Self::DataProcessing),
            "full_stack" => Ok(Self::FullStack),
            other => Err(format!(
                "unknown integration focus '{other}' (expected one of: ai_first, web_api, data_processing, full_stack)"
            )),
        }
    }
}

/// Resolve the final framework list from the answers.
///
/// The admin preset selects every framework in `available`. Otherwise the
/// selection is [`BASELINE_FRAMEWORKS`] plus the focus expansion, filtered
/// to frameworks an installer actually exists for. The result is sorted
/// and deduplicated, so installation order is deterministic.
pub fn resolve_frameworks(answers: &AnswerMap, available: &[&str]) -> Vec<String> {
    let complexity = answers.get_str("complexity_preset").unwrap_or("");
    if complexity == INSTALL_ALL_PRESET {
        let mut all: Vec<String> = available.iter().map(|s| s.to_string()).collect();
        all.sort();
        return all;
    }

    let mut selected: Vec<&str> = BASELINE_FRAMEWORKS.to_vec();
    if let Some(focus) = answers
        .get_str("integration_focus")
        .and_then(|s| IntegrationFocus::from_str(s).ok())
    {
        selected.extend_from_slice(focus.frameworks());
    }

    let mut resolved: Vec<String> = selected
        .into_iter()
        .filter(|f| available.contains(f))
        .map(String::from)
        .collect();
    resolved.sort();
    resolved.dedup();
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    const AVAILABLE: &[&str] = &[
        "uv", "ruff", "fastapi", "litestar", "pydantic_ai", "crew_ai", "instructor", "polars",
        "duckdb", "pyarrow", "ibis", "postgresql",
    ];

    fn answers_with(pairs: &[(&str, &str)]) -> AnswerMap {
        let mut m = AnswerMap::new();
        for (k, v) in pairs {
            m.insert(*k, Value::String((*v).to_string()));
        }
        m
    }

    #[test]
    fn no_focus_resolves_to_baseline_only() {
        let resolved = resolve_frameworks(&answers_with(&[]), AVAILABLE);
        assert_eq!(resolved, vec!["ruff".to_string(), "uv".to_string()]);
    }

    #[test]
    fn admin_preset_selects_everything_available() {
        let answers = answers_with(&[("complexity_preset", INSTALL_ALL_PRESET)]);
        let resolved = resolve_frameworks(&answers, AVAILABLE);
        assert_eq!(resolved.len(), AVAILABLE.len());
        assert!(resolved.contains(&"postgresql".to_string()));
    }

    #[test]
    fn focus_expands_on_top_of_baseline() {
        let answers = answers_with(&[("integration_focus", "data_processing")]);
        let resolved = resolve_frameworks(&answers, AVAILABLE);
        for f in ["uv", "ruff", "polars", "duckdb", "pyarrow", "ibis"] {
            assert!(resolved.contains(&f.to_string()), "missing {f}");
        }
        assert!(!resolved.contains(&"fastapi".to_string()));
    }

    #[test]
    fn unavailable_frameworks_are_filtered_out() {
        let answers = answers_with(&[("integration_focus", "full_stack")]);
        let resolved = resolve_frameworks(&answers, &["uv", "ruff", "fastapi"]);
        assert_eq!(
            resolved,
            vec!["fastapi".to_string(), "ruff".to_string(), "uv".to_string()]
        );
    }

    #[test]
    fn unknown_focus_is_ignored() {
        let answers = answers_with(&[("integration_focus", "quantum")]);
        let resolved = resolve_frameworks(&answers, AVAILABLE);
        assert_eq!(resolved, vec!["ruff".to_string(), "uv".to_string()]);
    }

    #[test]
    fn focus_round_trips_through_from_str() {
        for focus in IntegrationFocus::ALL {
            assert_eq!(
                IntegrationFocus::from_str(focus.as_str()).ok(),
                Some(*focus)
            );
        }
    }
}
