use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ScoreArgs;
use crate::model::{RubricItem, ScoreSheet};
use crate::rubric::{
    RtfDecoder, RubricParser, format_report, load_source, score_totals, validate_scores,
};
use crate::util::{format_points, write_text_output};

pub fn run(args: ScoreArgs) -> Result<()> {
    let decoder = RtfDecoder::new()?;
    let parser = RubricParser::new()?;
    let source = load_source(&args.rubric_path, &decoder)?;
    let parsed = parser.parse(&source.text);

    if parsed.items.is_empty() {
        bail!(
            "no rubric items detected in {}; run `rubric parse` to inspect the extracted text",
            source.path.display()
        );
    }

    let entered = args
        .scores
        .as_deref()
        .map(load_score_sheet)
        .transpose()?;
    let sheet = build_score_sheet(&parsed.items, entered)?;

    let report = format_report(&parsed.items, &sheet);
    write_text_output(args.output.as_deref(), &report)?;

    let totals = score_totals(&parsed.items, &sheet);
    info!(
        items = parsed.items.len(),
        obtained = %format_points(totals.obtained),
        possible = %format_points(totals.possible),
        "scored rubric"
    );
    if let Some(output) = &args.output {
        info!(path = %output.display(), "wrote score report");
    }

    Ok(())
}

fn load_score_sheet(path: &Path) -> Result<ScoreSheet> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn build_score_sheet(items: &[RubricItem], entered: Option<ScoreSheet>) -> Result<ScoreSheet> {
    let mut sheet = ScoreSheet::full_marks(items);
    let Some(entered) = entered else {
        return Ok(sheet);
    };

    for warning in validate_scores(items, &entered)? {
        warn!(warning = %warning, "score sheet warning");
    }
    sheet.merge(entered);
    Ok(sheet)
}
