use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::model::{InheritedScoring, ParsedRubric, RangeBlock, RubricItem};

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Item {
        code: String,
        description: String,
        max_points: f64,
    },
    Section {
        code: String,
        title: String,
    },
    Range {
        start_code: String,
        end_code: String,
        title: String,
    },
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBullets {
    pub bullets: Vec<String>,
    pub rest: String,
}

impl From<ScoreBullets> for InheritedScoring {
    fn from(value: ScoreBullets) -> Self {
        InheritedScoring {
            bullets: value.bullets,
            rest: value.rest,
        }
    }
}

#[derive(Debug)]
pub struct RubricParser {
    item_header: Regex,
    section_header: Regex,
    range_header: Regex,
    score_marker: Regex,
    score_line: Regex,
}

#[derive(Debug, Default)]
struct ParserState {
    preamble_lines: Vec<String>,
    seen_structure: bool,
    pending_lines: Vec<String>,
    pending_has_scores: bool,
    active_scoring: Option<InheritedScoring>,
}

impl ParserState {
    fn reset_grouping(&mut self) {
        self.pending_lines.clear();
        self.pending_has_scores = false;
        self.active_scoring = None;
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BodyStop {
    ItemOrSection,
    AnyHeader,
}

impl RubricParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item_header: Regex::new(
                r"^([A-Z][0-9]{1,3}|[0-9]+(?:\.[0-9]+)?)\)\s*(.+?)\s*\(([0-9]+(?:\.[0-9]+)?)(?:\s*points?)?\)\s*$",
            )
            .context("failed to compile item header regex")?,
            section_header: Regex::new(r"^([A-Z])\)\s*(.+)$")
                .context("failed to compile section header regex")?,
            range_header: Regex::new(
                r"^([A-Z]?[0-9]{1,3}(?:\.[0-9]{1,3})?)\s*[–-]\s*([A-Z]?[0-9]{1,3}(?:\.[0-9]{1,3})?)\)\s*(.+)$",
            )
            .context("failed to compile range header regex")?,
            score_marker: Regex::new(r"^-?\s*[0-9]+(?:\.[0-9]+)?\s*:\s*")
                .context("failed to compile score marker regex")?,
            score_line: Regex::new(r"^-?\s*([0-9]+(?:\.[0-9]+)?)\s*:\s*(.+)$")
                .context("failed to compile score line regex")?,
        })
    }

    pub fn classify(&self, line: &str) -> LineKind {
        if let Some(captures) = self.item_header.captures(line) {
            let code = captures[1].to_string();
            let description = captures[2].trim().to_string();
            let max_points = captures[3].parse::<f64>().unwrap_or(0.0);
            return LineKind::Item {
                code,
                description,
                max_points,
            };
        }

        if let Some(captures) = self.section_header.captures(line) {
            return LineKind::Section {
                code: captures[1].to_string(),
                title: captures[2].trim().to_string(),
            };
        }

        if let Some(captures) = self.range_header.captures(line) {
            let start_code = captures[1].to_string();
            let mut end_code = captures[2].to_string();
            if let Some(letter) = leading_uppercase(&start_code) {
                if leading_uppercase(&end_code).is_none() {
                    end_code = format!("{letter}{end_code}");
                }
            }
            return LineKind::Range {
                start_code,
                end_code,
                title: captures[3].trim().to_string(),
            };
        }

        LineKind::Plain
    }

    pub fn is_score_line(&self, line: &str) -> bool {
        self.score_marker.is_match(line.trim())
    }

    pub fn extract_score_bullets(&self, text: &str) -> ScoreBullets {
        if text.is_empty() {
            return ScoreBullets::default();
        }

        let mut bullets = Vec::new();
        let mut rest_lines = Vec::new();
        for line in split_lines(text) {
            match self.score_line.captures(line.trim()) {
                Some(captures) => {
                    bullets.push(format!("{}: {}", &captures[1], captures[2].trim()));
                }
                None => rest_lines.push(line),
            }
        }

        let rest = rest_lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<&str>>()
            .join("\n")
            .trim()
            .to_string();

        ScoreBullets { bullets, rest }
    }

    pub fn parse(&self, text: &str) -> ParsedRubric {
        let lines = split_lines(text)
            .into_iter()
            .map(str::trim_end)
            .collect::<Vec<&str>>();

        let mut parsed = ParsedRubric::default();
        let mut state = ParserState::default();
        let mut index = 0usize;

        while index < lines.len() {
            let line = lines[index].trim();
            if line.is_empty() {
                index += 1;
                continue;
            }

            match self.classify(line) {
                LineKind::Section { code, title } => {
                    parsed.sections.insert(code, title);
                    state.seen_structure = true;
                    state.reset_grouping();
                    index += 1;
                }
                LineKind::Range {
                    start_code,
                    end_code,
                    title,
                } => {
                    let header = format!("{start_code}–{end_code}) {title}");
                    state.seen_structure = true;
                    let details = self.consume_body(&lines, &mut index, BodyStop::AnyHeader);
                    parsed.range_blocks.push(RangeBlock {
                        start_code,
                        end_code,
                        header,
                        details,
                    });
                    state.reset_grouping();
                }
                LineKind::Item {
                    code,
                    description,
                    max_points,
                } => {
                    state.seen_structure = true;
                    if state.pending_has_scores {
                        let group_text = state.pending_lines.join("\n");
                        let scoring: InheritedScoring =
                            self.extract_score_bullets(group_text.trim()).into();
                        state.active_scoring = Some(scoring);
                        state.pending_lines.clear();
                        state.pending_has_scores = false;
                    }

                    let details = self.consume_body(&lines, &mut index, BodyStop::ItemOrSection);
                    if let Some(scoring) = state.active_scoring.as_ref() {
                        if !scoring.bullets.is_empty() || !scoring.rest.is_empty() {
                            parsed.inherited_scoring.insert(code.clone(), scoring.clone());
                        }
                    }
                    parsed.items.push(RubricItem {
                        code,
                        description,
                        max_points,
                        details,
                    });
                }
                LineKind::Plain => {
                    if state.seen_structure {
                        if self.is_score_line(line) {
                            state.pending_has_scores = true;
                        }
                        state.pending_lines.push(line.to_string());
                    } else {
                        state.preamble_lines.push(line.to_string());
                    }
                    index += 1;
                }
            }
        }

        parsed.preamble = state.preamble_lines.join("\n").trim().to_string();

        debug!(
            items = parsed.items.len(),
            sections = parsed.sections.len(),
            range_blocks = parsed.range_blocks.len(),
            inherited = parsed.inherited_scoring.len(),
            "parsed rubric text"
        );

        parsed
    }

    fn consume_body(&self, lines: &[&str], index: &mut usize, stop: BodyStop) -> String {
        let mut body = Vec::<&str>::new();
        *index += 1;

        while *index < lines.len() {
            let peek = lines[*index].trim();
            if peek.is_empty() {
                *index += 1;
                continue;
            }
            if self.stops_body(peek, stop) {
                break;
            }
            body.push(peek);
            *index += 1;
        }

        body.join("\n").trim().to_string()
    }

    fn stops_body(&self, line: &str, stop: BodyStop) -> bool {
        if self.item_header.is_match(line) || self.section_header.is_match(line) {
            return true;
        }
        stop == BodyStop::AnyHeader && self.range_header.is_match(line)
    }
}

pub fn leading_uppercase(code: &str) -> Option<char> {
    code.chars().next().filter(char::is_ascii_uppercase)
}

pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let is_break = matches!(
            ch,
            '\n' | '\r'
                | '\u{0b}'
                | '\u{0c}'
                | '\u{1c}'
                | '\u{1d}'
                | '\u{1e}'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        );
        if !is_break {
            continue;
        }

        lines.push(&text[start..offset]);
        let mut next_start = offset + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(lf_offset, '\n')) = chars.peek() {
                chars.next();
                next_start = lf_offset + 1;
            }
        }
        start = next_start;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
