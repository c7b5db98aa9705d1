use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;

use crate::model::ParsedRubric;
use crate::rubric::{RubricParser, group_items, resolve_guidance};
use crate::util::format_points;

pub(super) fn write_outline<W: Write>(
    output: &mut W,
    parser: &RubricParser,
    parsed: &ParsedRubric,
) -> Result<()> {
    let groups = group_items(&parsed.items);

    if !parsed.preamble.is_empty() {
        writeln!(output, "Rubric context")?;
        for line in parsed.preamble.lines() {
            writeln!(output, "\t{line}")?;
        }
        writeln!(output)?;
    }

    for group in &groups {
        let title = parsed
            .sections
            .get(&group.key)
            .map(|value| value.trim())
            .unwrap_or("");
        if title.is_empty() {
            writeln!(output, "Section {}", group.key)?;
        } else {
            writeln!(output, "Section {} — {}", group.key, title)?;
        }

        let mut rendered_ranges = HashSet::<&str>::new();
        for item in &group.items {
            let guidance = resolve_guidance(parser, parsed, item);
            if let Some(header) = guidance.range_header {
                if rendered_ranges.insert(header) {
                    writeln!(output, "{header}")?;
                }
            }

            writeln!(output, "{} — {}", item.code, item.description)?;
            for line in guidance.details.lines() {
                writeln!(output, "\t{line}")?;
            }
            for bullet in &guidance.bullets {
                writeln!(output, "\t- {bullet}")?;
            }
            writeln!(output, "\tMax points: {}", format_points(item.max_points))?;
        }
        writeln!(output)?;
    }

    writeln!(
        output,
        "Detected {} rubric items across {} sections.",
        parsed.items.len(),
        groups.len()
    )?;
    Ok(())
}

pub(super) fn write_text_preview<W: Write>(
    output: &mut W,
    text: &str,
    preview_chars: usize,
) -> Result<()> {
    writeln!(output, "No rubric items detected.")?;
    if text.trim().is_empty() {
        return Ok(());
    }

    let preview = text.chars().take(preview_chars).collect::<String>();
    writeln!(output, "Extracted text preview:")?;
    writeln!(output, "{}", preview.trim_end())?;
    Ok(())
}
