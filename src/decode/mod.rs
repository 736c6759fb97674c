pub mod classify;
mod parser;
mod scan;
pub mod validation;

use std::borrow::Cow;

use memchr::memmem;

use crate::types::Document;
use crate::{Error, ParseOptions, Result};

/// A parsed document together with the lines the scan passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub document: Document,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a header nor a `key: value` line.
    Unrecognized,
    /// Stray text between the rows of an array block.
    NoiseInBlock,
}

pub fn parse_detailed(input: &str, options: &ParseOptions) -> Result<Parsed> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let input = normalize_input(input, options);
    let scan = scan::scan_lines(&input);
    log::debug!(
        "scanning {} lines ({} non-blank)",
        scan.total,
        scan.lines.len()
    );
    parser::parse_scan(&scan)
}

pub fn parse(input: &str, options: &ParseOptions) -> Result<Document> {
    parse_detailed(input, options).map(|parsed| parsed.document)
}

fn normalize_input<'a>(input: &'a str, options: &ParseOptions) -> Cow<'a, str> {
    if options.unescape_newlines && memmem::find(input.as_bytes(), b"\\n").is_some() {
        Cow::Owned(input.replace("\\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t\r\n")]
    fn test_blank_input_is_rejected(#[case] input: &str) {
        assert_eq!(
            parse(input, &ParseOptions::default()),
            Err(Error::EmptyInput)
        );
    }

    #[rstest::rstest]
    fn test_escaped_newlines_only_when_enabled() {
        let input = "local: Room A\\nobjetivo: Plan";

        let plain = parse(input, &ParseOptions::default()).unwrap();
        assert_eq!(plain.scalar("local"), Some("Room A\\nobjetivo: Plan"));

        let options = ParseOptions::new().with_unescape_newlines(true);
        let unescaped = parse(input, &options).unwrap();
        assert_eq!(unescaped.scalar("local"), Some("Room A"));
        assert_eq!(unescaped.scalar("objetivo"), Some("Plan"));
    }

    #[rstest::rstest]
    fn test_line_numbers_count_blank_lines() {
        let err = parse(
            "local: Room A\n\n\npontos[1]{item,topico}:\n\n1",
            &ParseOptions::default(),
        );
        // "1" has no comma: it is noise, so the block runs dry.
        assert_eq!(
            err,
            Err(Error::InsufficientRows {
                array: "pontos".to_string(),
                expected: 1,
                found: 0
            })
        );

        let parsed = parse_detailed("\n\nnoise here", &ParseOptions::default()).unwrap();
        assert_eq!(parsed.skipped[0].line, 3);
        assert!(parsed.document.is_empty());
    }
}
