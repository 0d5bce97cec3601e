//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};

use quadmap::config::{Config, DisplayConfig, PathConfig, RenderConfig, ServerConfig, SinkKind};
use tempfile::TempDir;

/// Builds a Quadstick CSV export.
///
/// The header carries `name` as its last field, followed by the three
/// preamble records, then one record per `(input, output)` pair with the
/// output in the third column.
pub fn quadstick_csv(name: &str, rows: &[(&str, &str)]) -> String {
    let mut csv = format!("Quadstick,Profile,Version,{name}\n");
    csv.push_str("Input,Notes,Output,Extra\n");
    csv.push_str("Mouthpiece,,,\n");
    csv.push_str("Mapping,,,\n");
    for (input, output) in rows {
        csv.push_str(&format!("\"{input}\",,\"{output}\",\n"));
    }
    csv
}

/// The mapping used throughout the tests: two rows, then the
/// preferences section that ends the mapping.
pub fn sample_rows() -> Vec<(&'static str, &'static str)> {
    vec![
        ("A key", "mp_left_sip"),
        ("B key", "mp_center_puff_soft"),
        ("C key", "preferences"),
        ("D key", "mp_right_puff"),
    ]
}

/// Writes a CSV export into `dir` and returns its path.
pub fn write_csv(dir: &Path, filename: &str, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create directory");
    let path = dir.join(filename);
    fs::write(&path, quadstick_csv(name, rows)).expect("Failed to write CSV");
    path
}

/// `count` distinct rows, none of which ends the mapping.
pub fn many_rows(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("Key {i}"), "mp_triple_sip".to_string()))
        .collect()
}

/// Configuration rooted in `temp_dir`.
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        paths: PathConfig {
            sources_dir: temp_dir.path().join("sources"),
            output_dir: temp_dir.path().join("output"),
        },
        display: DisplayConfig {
            width: 400,
            height: 300,
            sink: SinkKind::Png,
        },
        render: RenderConfig::default(),
        server: ServerConfig::default(),
    }
}
