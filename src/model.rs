use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricItem {
    pub code: String,
    pub description: String,
    pub max_points: f64,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBlock {
    pub start_code: String,
    pub end_code: String,
    pub header: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritedScoring {
    pub bullets: Vec<String>,
    pub rest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRubric {
    pub items: Vec<RubricItem>,
    pub sections: BTreeMap<String, String>,
    pub range_blocks: Vec<RangeBlock>,
    pub inherited_scoring: BTreeMap<String, InheritedScoring>,
    pub preamble: String,
}

impl ParsedRubric {
    pub fn duplicate_codes(&self) -> Vec<String> {
        let mut counts = BTreeMap::<&str, usize>::new();
        for item in &self.items {
            *counts.entry(item.code.as_str()).or_default() += 1;
        }

        let mut duplicates = Vec::<String>::new();
        for item in &self.items {
            if counts[item.code.as_str()] > 1 && !duplicates.contains(&item.code) {
                duplicates.push(item.code.clone());
            }
        }
        duplicates
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub explanations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: String,
    pub format: String,
    pub encoding: String,
    pub sha256: String,
    pub text_char_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseCounts {
    pub item_count: usize,
    pub section_count: usize,
    pub section_group_count: usize,
    pub range_block_count: usize,
    pub inherited_scoring_count: usize,
    pub preamble_line_count: usize,
    pub total_possible_points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: SourceSummary,
    pub counts: ParseCounts,
    pub warnings: Vec<String>,
}
