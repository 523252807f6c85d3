//! Test fixtures for configuration files and the validation corpus

#![allow(dead_code)]

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Path to a config fixture under tests/fixtures/configs
pub fn config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/configs")
        .join(name)
}

/// Path to the validation corpus
pub fn validation_corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/validation_corpus.json")
}

/// Validation test case from validation_corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationTestCase {
    pub id: String,
    pub description: String,
    pub input: Map<String, Value>,
    #[serde(default)]
    pub strict: bool,
    pub expected: ValidationExpectation,
}

/// Expected validation outcome: (field, code) pairs in report order
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationExpectation {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<(String, String)>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationCorpus {
    pub test_cases: Vec<ValidationTestCase>,
}

impl ValidationCorpus {
    pub fn load() -> Result<Self, String> {
        let contents = std::fs::read_to_string(validation_corpus_path())
            .map_err(|e| format!("Failed to read corpus: {}", e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse corpus: {}", e))
    }
}
