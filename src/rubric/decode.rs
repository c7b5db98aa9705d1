use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use tracing::{debug, info};

use super::rtf::RtfDecoder;
use crate::util::sha256_bytes;

const UTF8_BOM: char = '\u{feff}';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourceEncoding {
    Utf8,
    Windows1252,
    Latin1,
    Utf8Lossy,
}

impl SourceEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "windows-1252",
            Self::Latin1 => "latin-1",
            Self::Utf8Lossy => "utf-8-lossy",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourceFormat {
    Rtf,
    PlainText,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_rtf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("rtf"))
            .unwrap_or(false);

        if is_rtf { Self::Rtf } else { Self::PlainText }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rtf => "rtf",
            Self::PlainText => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RubricSource {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub encoding: SourceEncoding,
    pub sha256: String,
    pub text: String,
}

pub fn load_source(path: &Path, decoder: &RtfDecoder) -> Result<RubricSource> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let sha256 = sha256_bytes(&raw);
    let (content, encoding) = decode_bytes(&raw);
    let format = SourceFormat::from_path(path);

    let text = match format {
        SourceFormat::Rtf => decoder.to_text(&content),
        SourceFormat::PlainText => content,
    };

    info!(
        path = %path.display(),
        format = format.as_str(),
        encoding = encoding.as_str(),
        bytes = raw.len(),
        "loaded rubric source"
    );

    Ok(RubricSource {
        path: path.to_path_buf(),
        format,
        encoding,
        sha256,
        text,
    })
}

type ByteDecoder = fn(&[u8]) -> Option<String>;

const DECODE_ORDER: [(SourceEncoding, ByteDecoder); 3] = [
    (SourceEncoding::Utf8, decode_utf8_strict),
    (SourceEncoding::Windows1252, decode_windows_1252_strict),
    (SourceEncoding::Latin1, decode_latin1),
];

pub fn decode_bytes(raw: &[u8]) -> (String, SourceEncoding) {
    let (text, encoding) = DECODE_ORDER
        .iter()
        .find_map(|(encoding, decode)| decode(raw).map(|text| (text, *encoding)))
        .unwrap_or_else(|| {
            (
                String::from_utf8_lossy(raw).into_owned(),
                SourceEncoding::Utf8Lossy,
            )
        });

    debug!(encoding = encoding.as_str(), "decoded source bytes");

    match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => (stripped.to_string(), encoding),
        None => (text, encoding),
    }
}

pub fn is_undefined_windows_1252(byte: u8) -> bool {
    matches!(byte, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D)
}

fn decode_utf8_strict(raw: &[u8]) -> Option<String> {
    std::str::from_utf8(raw).ok().map(ToOwned::to_owned)
}

fn decode_windows_1252_strict(raw: &[u8]) -> Option<String> {
    if raw.iter().copied().any(is_undefined_windows_1252) {
        return None;
    }

    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(raw);
    if had_errors {
        return None;
    }
    Some(text.into_owned())
}

fn decode_latin1(raw: &[u8]) -> Option<String> {
    Some(raw.iter().map(|&byte| char::from(byte)).collect())
}
