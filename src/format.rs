//! Byte-level format detection
//!
//! Picks a text decoding and a field delimiter before any structural parsing:
//! - byte-order marks first (UTF-8, UTF-16 LE/BE)
//! - otherwise an ordered list of candidate encodings
//! - delimiter by a consistency sniff over a leading sample, falling back to
//!   raw counts in the first line

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::debug;

use crate::error::IngestError;

/// Candidate delimiters in preference order
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Encodings tried when no byte-order mark is present, in order
pub const ENCODING_CANDIDATES: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
    TextEncoding::Iso8859_1,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Printable Latin-1: C1 control bytes are treated as undecodable
    Latin1,
    Windows1252,
    /// Full byte-to-codepoint mapping
    Iso8859_1,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        // Text exports never carry NUL; its presence means binary or UTF-16 without BOM
        if bytes.contains(&0) {
            return None;
        }
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 => {
                if bytes.iter().any(|b| (0x80..=0x9f).contains(b)) {
                    return None;
                }
                Some(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Iso8859_1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Decoded text plus the detected layout
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFormat {
    pub text: String,
    pub encoding: &'static str,
    pub delimiter: u8,
}

/// Sampling limits for the delimiter sniff
#[derive(Debug, Clone, Copy)]
pub struct SniffOptions {
    pub sample_bytes: usize,
    pub sample_lines: usize,
}

impl Default for SniffOptions {
    fn default() -> Self {
        Self {
            sample_bytes: 4096,
            sample_lines: 5,
        }
    }
}

/// Decode bytes and choose a delimiter
pub fn detect_format(bytes: &[u8], options: SniffOptions) -> Result<DetectedFormat, IngestError> {
    let (text, encoding) = decode_bytes(bytes)?;
    let delimiter = detect_delimiter(&text, options);
    debug!(
        encoding,
        delimiter = %(delimiter as char).escape_default(),
        "Detected file format"
    );
    Ok(DetectedFormat {
        text,
        encoding,
        delimiter,
    })
}

/// Decode bytes, honouring byte-order marks first
pub fn decode_bytes(bytes: &[u8]) -> Result<(String, &'static str), IngestError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) =
            encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        {
            return Ok((text.into_owned(), encoding.name()));
        }
        debug!(
            encoding = encoding.name(),
            "Byte-order mark present but content does not decode; trying candidates"
        );
    }

    ENCODING_CANDIDATES
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (text, enc.label())))
        .ok_or(IngestError::Decoding)
}

/// Choose a delimiter: consistency sniff first, raw first-line counts second
pub fn detect_delimiter(text: &str, options: SniffOptions) -> u8 {
    let sample = leading_sample(text, options);
    sniff_delimiter(&sample).unwrap_or_else(|| count_first_line(text))
}

fn leading_sample(text: &str, options: SniffOptions) -> Vec<&str> {
    let mut end = text.len().min(options.sample_bytes);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let truncated = end < text.len();
    let mut lines: Vec<&str> = text[..end].lines().collect();
    // Drop a partial trailing line unless it is the only one
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .take(options.sample_lines)
        .collect()
}

/// A candidate wins when it appears the same non-zero number of times on every
/// sampled line; the highest such count wins, earlier candidates on ties.
fn sniff_delimiter(lines: &[&str]) -> Option<u8> {
    if lines.is_empty() {
        return None;
    }
    let mut best: Option<(u8, usize)> = None;
    for &candidate in &DELIMITER_CANDIDATES {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .collect();
        let first = counts[0];
        if first == 0 || counts.iter().any(|&c| c != first) {
            continue;
        }
        if best.map_or(true, |(_, n)| first > n) {
            best = Some((candidate, first));
        }
    }
    best.map(|(d, _)| d)
}

fn count_first_line(text: &str) -> u8 {
    let first = text.lines().next().unwrap_or("");
    let mut best = (b',', 0usize);
    for &candidate in &DELIMITER_CANDIDATES {
        let n = first.bytes().filter(|&b| b == candidate).count();
        if n > best.1 {
            best = (candidate, n);
        }
    }
    best.0
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFathlete,height\nA1,30\n";
        let (text, encoding) = decode_bytes(bytes).unwrap();
        assert_eq!(encoding, "UTF-8");
        assert!(text.starts_with("athlete"));
    }

    #[test]
    fn test_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "a;b\n1;2\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let format = detect_format(&bytes, SniffOptions::default()).unwrap();
        assert_eq!(format.encoding, "UTF-16LE");
        assert_eq!(format.text, "a;b\n1;2\n");
        assert_eq!(format.delimiter, b';');
    }

    #[test]
    fn test_latin1_fallback() {
        // "Altura salto" with an accented character encoded as Latin-1
        let bytes = b"Atleta;Altura (cm)\nJos\xe9;35,2\n";
        let (text, encoding) = decode_bytes(bytes).unwrap();
        assert_eq!(encoding, "latin-1");
        assert!(text.contains("José"));
    }

    #[test]
    fn test_windows_1252_for_c1_bytes() {
        // 0x80 is the euro sign in Windows-1252 and a control byte in Latin-1
        let bytes = b"note\n\x80 5\n";
        let (text, encoding) = decode_bytes(bytes).unwrap();
        assert_eq!(encoding, "windows-1252");
        assert!(text.contains('€'));
    }

    #[test]
    fn test_binary_content_fails() {
        let bytes = b"PK\x03\x04\x00\x00binary";
        assert!(matches!(decode_bytes(bytes), Err(IngestError::Decoding)));
    }

    #[test]
    fn test_sniff_prefers_consistent_delimiter() {
        // Commas appear as decimal marks, semicolons are the real separator
        let text = "name;height;time\nA;31,5;0,51\nB;29,0;0,49\n";
        assert_eq!(detect_delimiter(text, SniffOptions::default()), b';');
    }

    #[test]
    fn test_sniff_tab_and_pipe() {
        assert_eq!(
            detect_delimiter("a\tb\tc\n1\t2\t3\n", SniffOptions::default()),
            b'\t'
        );
        assert_eq!(
            detect_delimiter("a|b\n1|2\n", SniffOptions::default()),
            b'|'
        );
    }

    #[test]
    fn test_fallback_counts_first_line() {
        // Inconsistent counts defeat the sniff; the first line has more semicolons
        let text = "a;b;c|d\n1|2|3\n";
        assert_eq!(detect_delimiter(text, SniffOptions::default()), b';');
    }

    #[test]
    fn test_default_is_comma() {
        assert_eq!(detect_delimiter("single_column\n", SniffOptions::default()), b',');
        assert_eq!(detect_delimiter("", SniffOptions::default()), b',');
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        let text = "name,notes\n\"Smith, J\",ok\n\"Doe, A\",ok\n";
        assert_eq!(detect_delimiter(text, SniffOptions::default()), b',');
    }
}
