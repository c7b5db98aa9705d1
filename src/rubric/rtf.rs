use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use regex::{Captures, Regex};

use super::decode::is_undefined_windows_1252;

// Pass order matters: escapes resolve before control words are stripped.
#[derive(Debug)]
pub struct RtfDecoder {
    escaped_newline: Regex,
    paragraph_break: Regex,
    unicode_escape: Regex,
    hex_escape: Regex,
    control_word: Regex,
    group_delimiter: Regex,
    horizontal_space: Regex,
    blank_line_run: Regex,
}

impl RtfDecoder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            escaped_newline: Regex::new(r"\\\r?\n")
                .context("failed to compile escaped newline regex")?,
            paragraph_break: Regex::new(r"\\(?:pard|par|line)\b")
                .context("failed to compile paragraph break regex")?,
            unicode_escape: Regex::new(r"\\u(-?[0-9]+)\??(?:\\u(-?[0-9]+)\??)?")
                .context("failed to compile unicode escape regex")?,
            hex_escape: Regex::new(r"\\'([0-9a-fA-F]{2})")
                .context("failed to compile hex escape regex")?,
            control_word: Regex::new(r"\\[a-zA-Z]+-?[0-9]* ?")
                .context("failed to compile control word regex")?,
            group_delimiter: Regex::new(r"[{}]").context("failed to compile group regex")?,
            horizontal_space: Regex::new(r"[ \t]+")
                .context("failed to compile horizontal whitespace regex")?,
            blank_line_run: Regex::new(r"\n{3,}").context("failed to compile blank line regex")?,
        })
    }

    pub fn to_text(&self, rtf: &str) -> String {
        let text = self.escaped_newline.replace_all(rtf, "\n");
        let text = self.paragraph_break.replace_all(&text, "\n");
        let text = self
            .unicode_escape
            .replace_all(&text, |captures: &Captures<'_>| {
                decode_unicode_escapes(&captures[1], captures.get(2).map(|m| m.as_str()))
            });
        let text = self
            .hex_escape
            .replace_all(&text, |captures: &Captures<'_>| decode_hex_escape(&captures[1]));
        let text = self.control_word.replace_all(&text, "");
        let text = self.group_delimiter.replace_all(&text, "");
        let text = self.horizontal_space.replace_all(&text, " ");
        let text = self.blank_line_run.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

fn escape_code_point(digits: &str) -> Option<i64> {
    let value = digits.parse::<i64>().ok()?;
    Some(if value < 0 { value + 65536 } else { value })
}

fn decode_unicode_escapes(first: &str, second: Option<&str>) -> String {
    if let Some(second) = second {
        let high = escape_code_point(first).and_then(|value| u16::try_from(value).ok());
        let low = escape_code_point(second).and_then(|value| u16::try_from(value).ok());
        if let (Some(high), Some(low)) = (high, low) {
            if let Some(Ok(character)) = char::decode_utf16([high, low]).next() {
                if u32::from(character) > 0xFFFF {
                    return character.to_string();
                }
            }
        }
    }

    let mut text = decode_unicode_escape(first);
    if let Some(second) = second {
        text.push_str(&decode_unicode_escape(second));
    }
    text
}

fn decode_unicode_escape(digits: &str) -> String {
    escape_code_point(digits)
        .and_then(|value| u32::try_from(value).ok())
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_default()
}

fn decode_hex_escape(hex: &str) -> String {
    let Ok(byte) = u8::from_str_radix(hex, 16) else {
        return String::new();
    };
    if is_undefined_windows_1252(byte) {
        return String::new();
    }

    let bytes = [byte];
    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        return String::new();
    }
    text.into_owned()
}
