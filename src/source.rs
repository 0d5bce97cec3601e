//! Mapping sources.
//!
//! A source is a tabular export of Quadstick mappings. [`CsvDirectory`]
//! serves them from a folder of `.csv` files and stores uploaded ones.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::SOURCE_EXTENSION;
use crate::error::{QuadmapError, QuadmapResult};
use crate::layout::RawRow;

/// Records after the header that precede the mapping rows.
pub const PREAMBLE_RECORDS: usize = 3;

/// Column holding the input token.
pub const INPUT_COLUMN: usize = 0;

/// Column holding the output token.
pub const OUTPUT_COLUMN: usize = 2;

/// Rows of one source plus its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    /// Display name (the profile name embedded in the file)
    pub name: String,
    /// Rows in source order
    pub rows: Vec<RawRow>,
}

/// Catalog entry for a stored source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    /// File name within the catalog
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time (RFC 3339)
    pub modified: Option<String>,
}

/// Something that can produce mapping tables by identifier.
pub trait DataSource {
    /// Available source identifiers, sorted.
    fn list(&self) -> QuadmapResult<Vec<SourceEntry>>;

    /// Reads the table identified by `id`.
    fn load(&self, id: &str) -> QuadmapResult<SourceTable>;
}

/// Parses a Quadstick CSV export.
///
/// The last field of the header record is the display name. The next
/// [`PREAMBLE_RECORDS`] records are skipped; every later record yields a
/// row from columns [`INPUT_COLUMN`] and [`OUTPUT_COLUMN`]. Records where
/// both are empty are dropped.
pub fn parse_quadstick_csv<R: Read>(source_id: &str, reader: R) -> QuadmapResult<SourceTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| QuadmapError::source_data(source_id, e.to_string()))?,
        None => return Err(QuadmapError::source_data(source_id, "file is empty")),
    };
    let name = header
        .iter()
        .last()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(source_id)
        .to_string();

    let mut rows = Vec::new();
    for record in records.skip(PREAMBLE_RECORDS) {
        let record = record.map_err(|e| QuadmapError::source_data(source_id, e.to_string()))?;
        let input = record.get(INPUT_COLUMN).unwrap_or_default();
        let output = record.get(OUTPUT_COLUMN).unwrap_or_default();
        if input.is_empty() && output.is_empty() {
            continue;
        }
        rows.push(RawRow::new(input, output));
    }

    Ok(SourceTable { name, rows })
}

/// Reads a Quadstick CSV export from disk.
pub fn load_csv_file(path: &Path) -> QuadmapResult<SourceTable> {
    let source_id = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
    let file = fs::File::open(path)
        .map_err(|e| QuadmapError::source_data(&source_id, format!("{}: {e}", path.display())))?;

    let table = parse_quadstick_csv(&source_id, file)?;
    tracing::info!(
        "Loaded source {source_id} ({}, {} rows)",
        table.name,
        table.rows.len()
    );
    Ok(table)
}

/// Rejects names that could escape the catalog directory.
pub fn validate_filename(filename: &str) -> QuadmapResult<&str> {
    if filename.is_empty() {
        return Err(QuadmapError::source_data(filename, "file name cannot be empty"));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(QuadmapError::source_data(
            filename,
            "path traversal not allowed",
        ));
    }

    if filename.starts_with('.') {
        return Err(QuadmapError::source_data(filename, "hidden files not allowed"));
    }

    Ok(filename)
}

/// Returns true if `filename` carries the accepted source extension.
#[must_use]
pub fn has_source_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Reduces an uploaded file name to a safe basename.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything other
/// than ASCII letters, digits, `.`, `-` and `_` is removed along with
/// leading dots. Returns `None` if nothing usable is left.
#[must_use]
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = basename
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    (!cleaned.is_empty()).then_some(cleaned)
}

/// Directory of `.csv` sources.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    /// Creates a catalog rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Catalog directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if a source named `filename` exists.
    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        validate_filename(filename).is_ok() && self.root.join(filename).is_file()
    }

    /// Stores an uploaded source, returning the name it was stored under.
    ///
    /// Names without the source extension are rejected. An existing file
    /// with the same name is replaced.
    pub fn save_upload(&self, filename: &str, contents: &[u8]) -> QuadmapResult<String> {
        let stored = sanitize_filename(filename)
            .ok_or_else(|| QuadmapError::source_data(filename, "file name cannot be empty"))?;
        if !has_source_extension(&stored) {
            return Err(QuadmapError::source_data(
                filename,
                format!("only .{SOURCE_EXTENSION} files are accepted"),
            ));
        }

        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(&stored), contents)?;
        tracing::info!("Stored source {stored}");
        Ok(stored)
    }
}

impl DataSource for CsvDirectory {
    fn list(&self) -> QuadmapResult<Vec<SourceEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if filename.starts_with('.') || !has_source_extension(filename) {
                continue;
            }

            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .ok()
                .map(|time| DateTime::<Utc>::from(time).to_rfc3339());

            entries.push(SourceEntry {
                filename: filename.to_string(),
                size: metadata.len(),
                modified,
            });
        }

        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(entries)
    }

    fn load(&self, id: &str) -> QuadmapResult<SourceTable> {
        validate_filename(id)?;
        load_csv_file(&self.root.join(id))
    }
}
