use std::fs;
use std::path::{Path, PathBuf};

use sideonly::symbols::{load, LoadOptions, SymbolResult};

/// Get path to a test fixture in tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a test fixture from tests/fixtures/
pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Load a fixture graph with default options
pub fn load_graph(name: &str) -> SymbolResult {
    load(&load_fixture(name), &LoadOptions::default())
        .unwrap_or_else(|errors| panic!("Fixture {} failed to load: {:?}", name, errors))
}
