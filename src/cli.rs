use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rubric",
    version,
    about = "Parse grading rubrics (.txt or .rtf) and build score reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Parse(ParseArgs),
    Score(ScoreArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    pub rubric_path: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    pub rubric_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = 4000)]
    pub preview_chars: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    pub rubric_path: PathBuf,

    #[arg(long)]
    pub scores: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
