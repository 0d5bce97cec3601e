//! Row layout.
//!
//! Turns raw `(input, output)` pairs into normalized rows and computes the
//! shared label column boundary that every row's glyph cluster starts from.

use serde::Serialize;

use crate::normalize::Normalizer;

/// Default label that ends the mapping section of a source table.
pub const DEFAULT_STOP_SENTINEL: &str = "preferences";

/// Pixels added to every measured label before it competes for the column width.
pub const LABEL_PADDING: u32 = 10;

/// A row exactly as the data source produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Input-side token (the command or key being mapped)
    pub input: String,
    /// Output-side token (the mouthpiece action or literal text)
    pub output: String,
}

impl RawRow {
    /// Creates a raw row.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A row after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    /// Canonical label text
    pub label: String,
    /// Button-state token or literal display text
    pub code: String,
}

/// A normalized row placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRow<'a> {
    /// Zero-based row index
    pub index: usize,
    /// Top edge of the row in canvas pixels
    pub y: u32,
    /// Shared x boundary between label and glyph cluster
    pub label_column_x: u32,
    /// The row content
    pub row: &'a NormalizedRow,
}

/// Layout tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Value (compared case-insensitively) that ends the mapping section
    pub stop_sentinel: String,
    /// Padding added to each measured label width
    pub label_padding: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            stop_sentinel: DEFAULT_STOP_SENTINEL.to_string(),
            label_padding: LABEL_PADDING,
        }
    }
}

/// Result of laying out a table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowLayout {
    /// Label column width, at most half the canvas width
    pub label_column_width: u32,
    /// Emitted rows in source order
    pub rows: Vec<NormalizedRow>,
}

impl RowLayout {
    /// Number of emitted rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no row was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Height the rows need when drawn at `row_height`.
    #[must_use]
    pub fn natural_height(&self, row_height: u32) -> u32 {
        u32::try_from(self.rows.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(row_height)
    }

    /// Positions every row at `index * row_height`.
    pub fn positioned(&self, row_height: u32) -> impl Iterator<Item = LayoutRow<'_>> {
        let label_column_x = self.label_column_width;
        self.rows.iter().enumerate().map(move |(index, row)| LayoutRow {
            index,
            y: u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(row_height),
            label_column_x,
            row,
        })
    }
}

/// Normalizes `rows` with `normalizer` and computes the label column.
///
/// Rows with an empty label or code are skipped. Processing stops at the
/// first row whose label or code equals the stop sentinel; that row is not
/// emitted. The column width is the widest padded label, capped at half of
/// `canvas_width`.
pub fn layout<I, F>(
    rows: I,
    normalizer: &Normalizer<'_>,
    measure_width: F,
    canvas_width: u32,
    options: &LayoutOptions,
) -> RowLayout
where
    I: IntoIterator<Item = RawRow>,
    F: Fn(&str) -> u32,
{
    let cap = canvas_width / 2;
    let sentinel = options.stop_sentinel.to_lowercase();
    let mut result = RowLayout::default();

    for raw in rows {
        let label = normalizer.label(&raw.input);
        let code = normalizer.code(&raw.output);
        if label.is_empty() || code.is_empty() {
            continue;
        }

        if label.to_lowercase() == sentinel || code.to_lowercase() == sentinel {
            tracing::debug!("Stop sentinel reached after {} rows", result.rows.len());
            break;
        }

        let width = measure_width(&label).saturating_add(options.label_padding);
        if width > result.label_column_width {
            result.label_column_width = width.min(cap);
        }

        result.rows.push(NormalizedRow { label, code });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer<'static> {
        Normalizer::builtin().unwrap()
    }

    fn char_width(text: &str) -> u32 {
        u32::try_from(text.chars().count()).unwrap() * 9
    }

    #[test]
    fn test_layout_scenario_stops_at_sentinel() {
        let rows = vec![
            RawRow::new("A key", "mp_left_sip"),
            RawRow::new("B key", "mp_center_puff_soft"),
            RawRow::new("C key", "preferences"),
            RawRow::new("D key", "mp_right_puff"),
        ];

        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].label, "A KEY");
        assert_eq!(result.rows[0].code, "mp_left_sip");
        assert_eq!(result.rows[1].label, "B KEY");
        assert_eq!(result.rows[1].code, "mp_center_puff_soft");
    }

    #[test]
    fn test_layout_stops_on_sentinel_label_case_insensitive() {
        let rows = vec![
            RawRow::new("a", "mp_left_sip"),
            RawRow::new("Preferences", "x"),
            RawRow::new("b", "mp_left_puff"),
        ];
        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_layout_skips_empty_fields() {
        let rows = vec![
            RawRow::new("", "mp_left_sip"),
            RawRow::new("a", "  "),
            RawRow::new("b", "mp_right_sip"),
        ];
        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].label, "B");
    }

    #[test]
    fn test_layout_custom_sentinel() {
        let options = LayoutOptions {
            stop_sentinel: "END".to_string(),
            ..LayoutOptions::default()
        };
        let rows = vec![
            RawRow::new("a", "mp_left_sip"),
            RawRow::new("preferences", "x"),
            RawRow::new("end", "x"),
            RawRow::new("b", "x"),
        ];
        let result = layout(rows, &normalizer(), char_width, 400, &options);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_label_column_width_tracks_longest_label() {
        let rows = vec![RawRow::new("ab", "x"), RawRow::new("abcd", "y"), RawRow::new("a", "z")];
        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());
        assert_eq!(result.label_column_width, 4 * 9 + LABEL_PADDING);
    }

    #[test]
    fn test_label_column_width_is_capped() {
        let rows = vec![RawRow::new("a very long label that never fits", "x")];
        let result = layout(rows, &normalizer(), char_width, 200, &LayoutOptions::default());
        assert_eq!(result.label_column_width, 100);
    }

    #[test]
    fn test_layout_preserves_order() {
        let rows: Vec<_> = (0..20)
            .map(|i| RawRow::new(format!("key {i}"), format!("out {i}")))
            .collect();
        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());
        for (i, row) in result.rows.iter().enumerate() {
            assert_eq!(row.label, format!("KEY {i}"));
        }
    }

    #[test]
    fn test_positioned_rows() {
        let rows = vec![RawRow::new("a", "x"), RawRow::new("b", "y")];
        let result = layout(rows, &normalizer(), char_width, 400, &LayoutOptions::default());
        let placed: Vec<_> = result.positioned(18).collect();
        assert_eq!(placed[1].y, 18);
        assert_eq!(placed[1].label_column_x, result.label_column_width);
        assert_eq!(result.natural_height(18), 36);
    }
}
