//! End-to-end rendering tests: CSV export to a pair of planes.

use std::fs;

use quadmap::button_state::{self, ButtonStateVector, CANONICAL_TABLE};
use quadmap::config::SinkKind;
use quadmap::display::{sink_for, BufferSink, DisplaySink, MemorySink, PngSink};
use quadmap::layout::{layout, LayoutOptions, RawRow};
use quadmap::normalize::Normalizer;
use quadmap::pipeline::Renderer;
use quadmap::render::{measure_text, FitPolicy, GlyphOutcome, RenderResources};
use quadmap::source::{load_csv_file, parse_quadstick_csv, SourceTable};
use tempfile::TempDir;

mod fixtures;
use fixtures::{many_rows, quadstick_csv, sample_rows, test_config, write_csv};

fn renderer() -> Renderer {
    Renderer::new(RenderResources::builtin(), 400, 300, LayoutOptions::default())
        .expect("built-in rules compile")
}

fn sample_table() -> SourceTable {
    parse_quadstick_csv("sample.csv", quadstick_csv("Sample", &sample_rows()).as_bytes())
        .expect("sample parses")
}

#[test]
fn test_canonical_tokens_survive_normalization() {
    let normalizer = Normalizer::builtin().unwrap();
    for (token, vector) in CANONICAL_TABLE {
        assert_eq!(button_state::decode(&normalizer.code(token)), Some(vector));
        assert_eq!(
            button_state::decode(&normalizer.code(&token.to_uppercase())),
            Some(vector),
            "{token}"
        );
    }
}

#[test]
fn test_normalization_is_idempotent_on_labels() {
    let normalizer = Normalizer::builtin().unwrap();
    for raw in ["kb_page_down", "Mouse Button 1", "control_delete", "A key", "num_lock"] {
        let once = normalizer.label(raw);
        assert_eq!(normalizer.label(&once), once, "{raw}");
    }
}

#[test]
fn test_scenario_stops_at_preferences() {
    let (frame, report) = renderer().render_table(&sample_table());

    assert_eq!(report.name, "Sample");
    assert_eq!(report.rows, 2);
    assert_eq!(frame.glyphs.len(), 2);

    let soft = ButtonStateVector::from_bits([0, 1, 0, 1, 1]);
    assert!(soft.soft);
    assert!(matches!(
        frame.glyphs[1],
        GlyphOutcome::Icon { vector, .. } if vector == soft
    ));
    assert!(matches!(
        frame.glyphs[0],
        GlyphOutcome::Icon { vector, .. } if vector == ButtonStateVector::from_bits([1, 0, 0, 0, 0])
    ));
}

#[test]
fn test_unknown_code_is_text_only() {
    let table = SourceTable {
        name: "Keys".to_string(),
        rows: vec![RawRow::new("Jump", "F13"), RawRow::new("Run", "mp_left_sip")],
    };
    let (frame, report) = renderer().render_table(&table);

    let origin_x = i32::try_from(report.label_column_width + 18).unwrap();
    assert_eq!(frame.glyphs[0], GlyphOutcome::TextOnly { x: origin_x });
    assert!(!frame.glyphs[1].is_text_only());
    assert!(frame.glyphs[1].next_x() > origin_x);
}

#[test]
fn test_overflow_is_downscaled_not_truncated() {
    let rows = many_rows(500);
    let table = SourceTable {
        name: "Big".to_string(),
        rows: rows.iter().map(|(i, o)| RawRow::new(i, o)).collect(),
    };
    let (frame, report) = renderer().render_table(&table);

    assert_eq!(report.rows, 500);
    assert_eq!(report.natural_height, 9000);
    assert_eq!(
        report.fit,
        FitPolicy::Downscaled {
            natural_height: 9000
        }
    );
    assert_eq!((frame.width(), frame.height()), (400, 300));
    assert_eq!(frame.glyphs.len(), 500);
}

#[test]
fn test_plane_dimensions_never_change_with_row_count() {
    let renderer = renderer();
    for count in [0, 1, 16, 17, 40] {
        let rows = many_rows(count);
        let table = SourceTable {
            name: "n".to_string(),
            rows: rows.iter().map(|(i, o)| RawRow::new(i, o)).collect(),
        };
        let (frame, _) = renderer.render_table(&table);
        assert_eq!((frame.width(), frame.height()), (400, 300), "{count} rows");
        assert_eq!(frame.fit.is_downscaled(), count * 18 > 300, "{count} rows");
    }
}

#[test]
fn test_label_column_width_bounds() {
    let resources = RenderResources::builtin();
    let rows = vec![
        RawRow::new("short", "mp_left_sip"),
        RawRow::new("a much longer label text", "mp_left_puff"),
    ];
    let result = layout(
        rows,
        &Normalizer::builtin().unwrap(),
        |text| measure_text(resources.body_font, text),
        400,
        &LayoutOptions::default(),
    );

    assert!(result.label_column_width <= 200);
    let longest = result
        .rows
        .iter()
        .map(|row| measure_text(resources.body_font, &row.label) + 10)
        .max()
        .unwrap();
    assert_eq!(result.label_column_width, longest.min(200));
}

#[test]
fn test_render_to_memory_sink() {
    let (frame, _) = renderer().render_table(&sample_table());
    let mut sink = MemorySink::new();
    let (primary, accent) = frame.into_planes();
    sink.display(primary, accent).unwrap();

    let (primary, accent) = sink.last().unwrap();
    assert!(primary.ink_count() > 0);
    assert!(accent.ink_count() > 0);
}

#[test]
fn test_render_csv_file_to_configured_sinks() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    let path = write_csv(
        &config.paths.sources_dir,
        "profile.csv",
        "Profile",
        &sample_rows(),
    );

    let table = load_csv_file(&path).unwrap();
    let renderer = Renderer::from_config(&config).unwrap();

    let (frame, _) = renderer.render_table(&table);
    let (primary, accent) = frame.into_planes();
    sink_for(&config).display(primary, accent).unwrap();
    assert!(config.paths.output_dir.join(PngSink::COMPOSITE).exists());

    config.display.sink = SinkKind::Buffer;
    let (frame, _) = renderer.render_table(&table);
    let (primary, accent) = frame.into_planes();
    sink_for(&config).display(primary, accent).unwrap();
    let buffer = fs::read(config.paths.output_dir.join(BufferSink::PRIMARY)).unwrap();
    assert_eq!(buffer.len(), 400 / 8 * 300);
}

#[test]
fn test_custom_sentinel_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.render.stop_sentinel = "Settings".to_string();

    let table = SourceTable {
        name: "n".to_string(),
        rows: vec![
            RawRow::new("A", "mp_left_sip"),
            RawRow::new("Preferences", "mp_left_sip"),
            RawRow::new("settings", "x"),
            RawRow::new("B", "mp_left_sip"),
        ],
    };
    let (_, report) = Renderer::from_config(&config).unwrap().render_table(&table);
    assert_eq!(report.rows, 2);
}
