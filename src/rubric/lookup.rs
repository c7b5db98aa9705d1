use crate::model::{ParsedRubric, RangeBlock, RubricItem};

use super::parser::{RubricParser, leading_uppercase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeParts {
    pub key: String,
    pub number: u64,
}

#[derive(Debug, Clone)]
pub struct SectionGroup<'a> {
    pub key: String,
    pub items: Vec<&'a RubricItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guidance<'a> {
    pub range_header: Option<&'a str>,
    pub bullets: Vec<String>,
    pub details: String,
}

pub fn section_key(code: &str) -> String {
    if let Some(letter) = leading_uppercase(code) {
        return letter.to_string();
    }
    match code.split_once('.') {
        Some((section, _)) => section.to_string(),
        None => code.to_string(),
    }
}

pub fn code_parts(code: &str) -> CodeParts {
    if let Some(letter) = leading_uppercase(code) {
        return CodeParts {
            key: letter.to_string(),
            number: parse_digits(&code[letter.len_utf8()..]),
        };
    }

    if let Some((section, rest)) = code.split_once('.') {
        return CodeParts {
            key: section.to_string(),
            number: parse_digits(rest),
        };
    }

    let digits = ascii_digits(code);
    CodeParts {
        key: if digits.is_empty() {
            code.to_string()
        } else {
            digits
        },
        number: 0,
    }
}

fn ascii_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn parse_digits(value: &str) -> u64 {
    let digits = ascii_digits(value);
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

impl RangeBlock {
    pub fn contains(&self, code: &str) -> bool {
        let item = code_parts(code);
        let start = code_parts(&self.start_code);
        let end = code_parts(&self.end_code);

        if item.key != start.key || item.key != end.key {
            return false;
        }
        start.number <= item.number && item.number <= end.number
    }
}

pub fn find_range_block<'a>(range_blocks: &'a [RangeBlock], code: &str) -> Option<&'a RangeBlock> {
    range_blocks.iter().find(|block| block.contains(code))
}

pub fn group_items(items: &[RubricItem]) -> Vec<SectionGroup<'_>> {
    let mut groups = Vec::<SectionGroup<'_>>::new();

    for item in items {
        let key = section_key(&item.code);
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(SectionGroup {
                key,
                items: vec![item],
            }),
        }
    }

    groups
}

pub fn resolve_guidance<'a>(
    parser: &RubricParser,
    parsed: &'a ParsedRubric,
    item: &RubricItem,
) -> Guidance<'a> {
    let own = parser.extract_score_bullets(&item.details);
    let block = find_range_block(&parsed.range_blocks, &item.code);
    let range = block
        .map(|block| parser.extract_score_bullets(&block.details))
        .unwrap_or_default();
    let inherited = parsed.inherited_scoring.get(&item.code);

    let bullets = [Some(&own.bullets), Some(&range.bullets), inherited.map(|value| &value.bullets)]
        .into_iter()
        .flatten()
        .find(|bullets| !bullets.is_empty())
        .cloned()
        .unwrap_or_default();

    let details = [Some(&own.rest), Some(&range.rest), inherited.map(|value| &value.rest)]
        .into_iter()
        .flatten()
        .find(|rest| !rest.is_empty())
        .cloned()
        .unwrap_or_default();

    Guidance {
        range_header: block.map(|block| block.header.as_str()),
        bullets,
        details,
    }
}
