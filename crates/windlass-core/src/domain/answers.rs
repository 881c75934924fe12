//! The rendered answers mapping and its sidecar file.
//!
//! Every engine run produces a key → value mapping (the "answers"): the
//! resolved template parameters. For overlay templates two runs happen and
//! their answers are merged - overlay keys win, base-only keys survive.
//!
//! The merged answers are persisted to [`ANSWERS_FILE`] at the project root.
//! Lifecycle: written by the renderer, read by the installer dispatcher,
//! deleted by cleanup. Single-threaded, never shared.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{CoreError, CoreResult};

/// Sidecar file the renderer writes at the project root.
pub const ANSWERS_FILE: &str = ".windlass-answers.yml";

/// Answers file the external templating engine leaves behind in the
/// destination directory. Read by the engine adapter, removed by cleanup.
pub const ENGINE_ANSWERS_FILE: &str = ".copier-answers.yml";

/// Key → YAML value mapping produced by filling a template's parameters.
///
/// Backed by a `BTreeMap` so serialization order is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerMap {
    values: BTreeMap<String, Value>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a plain string map (the data fed to the engine).
    pub fn from_strings(data: &BTreeMap<String, String>) -> Self {
        let values = data
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Self { values }
    }

    /// Parse from YAML text, as the engine writes it.
    pub fn from_yaml_str(text: &str) -> CoreResult<Self> {
        let values: BTreeMap<String, Value> = serde_yaml::from_str(text)?;
        Ok(Self { values })
    }

    /// Load from a sidecar file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::Answers {
                reason: format!("answers file not found at {}", path.display()),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Write to a sidecar file, filtering engine-private keys.
    ///
    /// Keys starting with `_` (e.g. `_src_path`, `_commit`) are internal to
    /// the engine and must not leak into the persisted answers.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let public: BTreeMap<&String, &Value> = self
            .values
            .iter()
            .filter(|(k, _)| !k.starts_with('_'))
            .collect();
        let text = serde_yaml::to_string(&public)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Merge an overlay's answers on top of this (base) map.
    ///
    /// Overlay entries override same-key base entries; base-only keys are
    /// preserved. Neither input is mutated.
    pub fn merged_with(&self, overlay: &AnswerMap) -> AnswerMap {
        let mut values = self.values.clone();
        for (k, v) in &overlay.values {
            values.insert(k.clone(), v.clone());
        }
        AnswerMap { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String view of a value, if it is a YAML string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Flatten to a string map for feeding back into an engine run.
    ///
    /// Non-string scalars are rendered with their YAML display form;
    /// sequences and mappings are skipped (the engine only takes scalars
    /// on its command line).
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .filter(|(k, _)| !k.starts_with('_'))
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
