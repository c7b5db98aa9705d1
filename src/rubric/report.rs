use anyhow::{Result, bail};

use crate::model::{RubricItem, ScoreSheet};
use crate::util::format_points;

impl ScoreSheet {
    pub fn full_marks(items: &[RubricItem]) -> Self {
        let mut sheet = Self::default();
        for item in items {
            sheet.scores.insert(item.code.clone(), item.max_points);
            sheet.explanations.insert(item.code.clone(), String::new());
        }
        sheet
    }

    pub fn merge(&mut self, other: ScoreSheet) {
        self.scores.extend(other.scores);
        self.explanations.extend(other.explanations);
    }

    pub fn score_for(&self, code: &str) -> f64 {
        self.scores.get(code).copied().unwrap_or(0.0)
    }

    pub fn explanation_for(&self, code: &str) -> &str {
        self.explanations
            .get(code)
            .map(|value| value.trim())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTotals {
    pub obtained: f64,
    pub possible: f64,
}

pub fn score_totals(items: &[RubricItem], sheet: &ScoreSheet) -> ScoreTotals {
    ScoreTotals {
        obtained: items.iter().map(|item| sheet.score_for(&item.code)).sum(),
        possible: items.iter().map(|item| item.max_points).sum(),
    }
}

pub fn validate_scores(items: &[RubricItem], sheet: &ScoreSheet) -> Result<Vec<String>> {
    for item in items {
        let Some(&score) = sheet.scores.get(&item.code) else {
            continue;
        };
        if !score.is_finite() || score < 0.0 || score > item.max_points {
            bail!(
                "score {} for {} is outside 0..={}",
                score,
                item.code,
                format_points(item.max_points)
            );
        }
    }

    let mut warnings = Vec::new();
    let known = |code: &str| items.iter().any(|item| item.code == code);
    for code in sheet.scores.keys().chain(sheet.explanations.keys()) {
        if !known(code.as_str()) {
            let warning = format!("score sheet entry {code} does not match any rubric item");
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }
    }

    Ok(warnings)
}

pub fn format_report(items: &[RubricItem], sheet: &ScoreSheet) -> String {
    let totals = score_totals(items, sheet);
    let mut lines = vec![
        format!(
            "Total: {}/{}",
            format_points(totals.obtained),
            format_points(totals.possible)
        ),
        String::new(),
    ];

    for item in items {
        lines.push(format!(
            "{}: {}/{}",
            item.code,
            format_points(sheet.score_for(&item.code)),
            format_points(item.max_points)
        ));
        lines.push(format!("Explanation: {}", sheet.explanation_for(&item.code)));
        lines.push(String::new());
    }

    format!("{}\n", lines.join("\n").trim())
}
