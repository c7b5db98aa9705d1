use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::output::{write_outline, write_text_preview};
use crate::cli::ParseArgs;
use crate::model::{ParseCounts, ParseManifest, ParsedRubric, SourceSummary};
use crate::rubric::{RtfDecoder, RubricParser, RubricSource, group_items, load_source};
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: ParseArgs) -> Result<()> {
    let decoder = RtfDecoder::new()?;
    let parser = RubricParser::new()?;
    let source = load_source(&args.rubric_path, &decoder)?;
    let parsed = parser.parse(&source.text);
    let section_group_count = group_items(&parsed.items).len();

    let warnings = collect_warnings(&parsed);
    for warning in &warnings {
        warn!(warning = %warning, "rubric parse warning");
    }

    info!(
        items = parsed.items.len(),
        sections = section_group_count,
        range_blocks = parsed.range_blocks.len(),
        inherited_scoring = parsed.inherited_scoring.len(),
        "parsed rubric"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = build_manifest(&source, &parsed, section_group_count, warnings);
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote parse manifest");
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &parsed)
            .context("failed to serialize parsed rubric json")?;
        writeln!(output)?;
    } else if parsed.items.is_empty() {
        warn!(
            path = %source.path.display(),
            "no rubric items detected; check the format or the extracted text preview"
        );
        write_text_preview(&mut output, &source.text, args.preview_chars)?;
    } else {
        write_outline(&mut output, &parser, &parsed)?;
    }
    output.flush()?;

    Ok(())
}

pub(super) fn collect_warnings(parsed: &ParsedRubric) -> Vec<String> {
    let mut warnings = Vec::new();

    for code in parsed.duplicate_codes() {
        warnings.push(format!(
            "item code {code} appears more than once; scores keyed by code will collide"
        ));
    }

    for block in &parsed.range_blocks {
        if !parsed.items.iter().any(|item| block.contains(&item.code)) {
            warnings.push(format!("range block {} matches no rubric item", block.header));
        }
    }

    warnings
}

pub(super) fn build_manifest(
    source: &RubricSource,
    parsed: &ParsedRubric,
    section_group_count: usize,
    warnings: Vec<String>,
) -> ParseManifest {
    let total_possible_points = parsed.items.iter().map(|item| item.max_points).sum::<f64>();

    ParseManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source: SourceSummary {
            path: source.path.display().to_string(),
            format: source.format.as_str().to_string(),
            encoding: source.encoding.as_str().to_string(),
            sha256: source.sha256.clone(),
            text_char_count: source.text.chars().count(),
        },
        counts: ParseCounts {
            item_count: parsed.items.len(),
            section_count: parsed.sections.len(),
            section_group_count,
            range_block_count: parsed.range_blocks.len(),
            inherited_scoring_count: parsed.inherited_scoring.len(),
            preamble_line_count: parsed.preamble.lines().count(),
            total_possible_points,
        },
        warnings,
    }
}
