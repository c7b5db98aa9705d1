use std::path::PathBuf;

use super::output::{write_outline, write_text_preview};
use super::run::{build_manifest, collect_warnings};
use crate::rubric::decode::{SourceEncoding, SourceFormat};
use crate::rubric::{RubricParser, RubricSource};

fn parser() -> RubricParser {
    RubricParser::new().expect("rubric patterns should compile")
}

#[test]
fn write_outline_renders_sections_ranges_and_guidance() {
    let parser = parser();
    let parsed = parser.parse(
        "Intro text.\n\nA) Clarity\nA1-A2) Shared\n2: full\n1: partial\nA1) Thesis (2 points)\nA2) Flow (2 points)\nNeeds transitions.\n1.1) Numbered (1)",
    );

    let mut buffer = Vec::new();
    write_outline(&mut buffer, &parser, &parsed).expect("render outline");
    let rendered = String::from_utf8(buffer).expect("utf-8 outline");

    assert_eq!(
        rendered,
        "Rubric context\n\
         \tIntro text.\n\
         \n\
         Section A — Clarity\n\
         A1–A2) Shared\n\
         A1 — Thesis\n\
         \t- 2: full\n\
         \t- 1: partial\n\
         \tMax points: 2\n\
         A2 — Flow\n\
         \tNeeds transitions.\n\
         \t- 2: full\n\
         \t- 1: partial\n\
         \tMax points: 2\n\
         \n\
         Section 1\n\
         1.1 — Numbered\n\
         \tMax points: 1\n\
         \n\
         Detected 3 rubric items across 2 sections.\n"
    );
}

#[test]
fn write_text_preview_truncates_by_characters() {
    let mut buffer = Vec::new();
    write_text_preview(&mut buffer, "ééééé trailing", 3).expect("render preview");
    let rendered = String::from_utf8(buffer).expect("utf-8 preview");

    assert_eq!(
        rendered,
        "No rubric items detected.\nExtracted text preview:\nééé\n"
    );
}

#[test]
fn write_text_preview_skips_empty_text() {
    let mut buffer = Vec::new();
    write_text_preview(&mut buffer, "  \n", 4000).expect("render preview");
    assert_eq!(
        String::from_utf8(buffer).expect("utf-8 preview"),
        "No rubric items detected.\n"
    );
}

#[test]
fn collect_warnings_flags_duplicates_and_orphan_ranges() {
    let parsed = parser().parse("B1-B3) Orphan range\nshared\nA1) First (1)\nA1) Again (1)");

    let warnings = collect_warnings(&parsed);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("A1"));
    assert!(warnings[1].contains("B1–B3) Orphan range"));
}

#[test]
fn build_manifest_counts_parsed_structure() {
    let text = "Intro\nmore intro\nA) Clarity\nA1) Thesis (2.5 points)\nA2) Flow (2 points)";
    let parsed = parser().parse(text);
    let source = RubricSource {
        path: PathBuf::from("rubric.txt"),
        format: SourceFormat::PlainText,
        encoding: SourceEncoding::Utf8,
        sha256: "0".repeat(64),
        text: text.to_string(),
    };

    let manifest = build_manifest(&source, &parsed, 1, Vec::new());
    assert_eq!(manifest.manifest_version, 1);
    assert_eq!(manifest.source.format, "text");
    assert_eq!(manifest.source.encoding, "utf-8");
    assert_eq!(manifest.counts.item_count, 2);
    assert_eq!(manifest.counts.section_count, 1);
    assert_eq!(manifest.counts.preamble_line_count, 2);
    assert_eq!(manifest.counts.total_possible_points, 4.5);
    assert!(manifest.warnings.is_empty());
}
