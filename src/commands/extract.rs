use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::rubric::{RtfDecoder, load_source};
use crate::util::write_text_output;

pub fn run(args: ExtractArgs) -> Result<()> {
    let decoder = RtfDecoder::new()?;
    let source = load_source(&args.rubric_path, &decoder)?;

    if source.text.trim().is_empty() {
        warn!(path = %source.path.display(), "no text recovered from rubric source");
    }

    let mut text = source.text;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_text_output(args.output.as_deref(), &text)?;

    if let Some(output) = &args.output {
        info!(path = %output.display(), "wrote extracted text");
    }
    Ok(())
}
