use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::types::{ArrayBlock, Document, Record, Value};
use crate::{Error, Result};

use super::classify::{classify_line, is_data_row, is_index, Header, LineKind};
use super::scan::{ScanLine, ScanResult};
use super::{Parsed, SkipReason, SkippedLine};

type TokenBuf<'a> = SmallVec<[&'a str; 8]>;

pub fn parse_scan(scan: &ScanResult<'_>) -> Result<Parsed> {
    let mut parser = LineParser::new(&scan.lines);
    parser.parse_document()?;
    Ok(Parsed {
        document: parser.document,
        skipped: parser.skipped,
    })
}

struct LineParser<'s, 'a> {
    lines: &'s [ScanLine<'a>],
    idx: usize,
    document: Document,
    skipped: Vec<SkippedLine>,
}

impl<'s, 'a> LineParser<'s, 'a> {
    fn new(lines: &'s [ScanLine<'a>]) -> Self {
        Self {
            lines,
            idx: 0,
            document: Document::new(),
            skipped: Vec::new(),
        }
    }

    fn parse_document(&mut self) -> Result<()> {
        while let Some(line) = self.lines.get(self.idx).copied() {
            match classify_line(line.content) {
                LineKind::ArrayHeader(header) => {
                    self.idx += 1;
                    let block = self.parse_array_block(&header)?;
                    log::debug!(
                        "array '{}' parsed with {} rows (line {})",
                        header.name,
                        block.len(),
                        line.number
                    );
                    self.store(header.name, Value::Array(block), line.number);
                }
                LineKind::Scalar { key, value } => {
                    self.idx += 1;
                    self.store(key, Value::Scalar(value.to_string()), line.number);
                }
                LineKind::MalformedHeader => return Err(malformed_header(&line)),
                LineKind::Unrecognized => {
                    self.idx += 1;
                    self.skip(&line, SkipReason::Unrecognized);
                }
            }
        }
        Ok(())
    }

    fn parse_array_block(&mut self, header: &Header<'_>) -> Result<ArrayBlock> {
        let fields: Vec<SmolStr> = header.fields.iter().map(|field| SmolStr::new(field)).collect();
        // The declared count is untrusted; never reserve more than the lines left.
        let remaining = self.lines.len() - self.idx;
        let mut block = ArrayBlock::with_capacity(fields, header.len.min(remaining));
        let mut tokens = TokenBuf::new();

        while block.len() < header.len {
            let Some(line) = self.lines.get(self.idx).copied() else {
                break;
            };
            if is_block_row(line.content, block.fields().len()) {
                split_row_into(line.content, block.fields().len(), &mut tokens);
                if tokens.len() != block.fields().len() {
                    return Err(Error::MalformedRow {
                        array: header.name.to_string(),
                        line: line.number,
                        expected: block.fields().len(),
                        actual: tokens.len(),
                        raw: line.content.to_string(),
                    });
                }
                log::trace!("array '{}' row on line {}", header.name, line.number);
                let record =
                    Record::from_aligned(block.fields(), tokens.iter().map(|token| token.to_string()));
                block.push_record(record);
                self.idx += 1;
                continue;
            }
            match classify_line(line.content) {
                LineKind::ArrayHeader(_) | LineKind::Scalar { .. } => break,
                LineKind::MalformedHeader => return Err(malformed_header(&line)),
                LineKind::Unrecognized => {
                    self.idx += 1;
                    self.skip(&line, SkipReason::NoiseInBlock);
                }
            }
        }

        if block.len() < header.len {
            return Err(Error::InsufficientRows {
                array: header.name.to_string(),
                expected: header.len,
                found: block.len(),
            });
        }
        Ok(block)
    }

    fn store(&mut self, key: &str, value: Value, line: usize) {
        if self.document.insert(key, value).is_some() {
            log::warn!("'{key}' on line {line} overwrites an earlier value");
        }
    }

    fn skip(&mut self, line: &ScanLine<'_>, reason: SkipReason) {
        log::debug!("skipping line {} ({reason:?}): {}", line.number, line.content);
        self.skipped.push(SkippedLine {
            line: line.number,
            text: line.content.to_string(),
            reason,
        });
    }
}

/// A single-field block has no separator after the index, so a bare index
/// counts as a row there.
fn is_block_row(line: &str, width: usize) -> bool {
    is_data_row(line) || (width == 1 && is_index(line))
}

/// Splits a data row into at most `width` trimmed values; the last value keeps
/// any remaining commas.
fn split_row_into<'c>(row: &'c str, width: usize, out: &mut TokenBuf<'c>) {
    out.clear();
    out.extend(row.splitn(width, ',').map(str::trim));
}

fn malformed_header(line: &ScanLine<'_>) -> Error {
    Error::MalformedArrayHeader {
        line: line.number,
        raw: line.content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::scan::scan_lines;

    fn parse(input: &str) -> Result<Parsed> {
        parse_scan(&scan_lines(input))
    }

    #[rstest::rstest]
    fn test_split_row_keeps_commas_in_last_column() {
        let mut tokens = TokenBuf::new();
        split_row_into("1,Buy milk,Alice,soon, maybe later", 4, &mut tokens);
        assert_eq!(
            tokens.as_slice(),
            ["1", "Buy milk", "Alice", "soon, maybe later"]
        );
        split_row_into("1, Alice ", 2, &mut tokens);
        assert_eq!(tokens.as_slice(), ["1", "Alice"]);
    }

    #[rstest::rstest]
    fn test_noise_inside_block_is_not_a_row_attempt() {
        let parsed = parse("pontos[2]{item,topico}:\n1,First\n~~ stray ~~\n2,Second").unwrap();
        let block = parsed.document.array("pontos").unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 3);
        assert_eq!(parsed.skipped[0].reason, SkipReason::NoiseInBlock);
    }

    #[rstest::rstest]
    fn test_block_stops_exactly_at_declared_count() {
        let parsed = parse("pontos[1]{item,topico}:\n1,First\n2,Second").unwrap();
        assert_eq!(parsed.document.array("pontos").unwrap().len(), 1);
        // The surplus row has no colon, so it is skipped at top level.
        assert_eq!(parsed.skipped[0].reason, SkipReason::Unrecognized);
        assert_eq!(parsed.skipped[0].text, "2,Second");
    }

    #[rstest::rstest]
    fn test_zero_length_block_consumes_nothing() {
        let parsed = parse("pontos[0]{item,topico}:\nlocal: Room A").unwrap();
        assert!(parsed.document.array("pontos").unwrap().is_empty());
        assert_eq!(parsed.document.scalar("local"), Some("Room A"));
    }

    #[rstest::rstest]
    fn test_malformed_header_inside_block_fails() {
        let err = parse("pontos[2]{item,topico}:\n1,First\nfoo[1]{a b}:").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedArrayHeader {
                line: 3,
                raw: "foo[1]{a b}:".to_string()
            }
        );
    }

    #[rstest::rstest]
    fn test_huge_declared_count_runs_dry_without_reserving() {
        let err = parse("pontos[100000000000000000]{item,topico}:\n1,x").unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientRows {
                array: "pontos".to_string(),
                expected: 100_000_000_000_000_000,
                found: 1
            }
        );
        let max = format!("pontos[{}]{{item}}:\n1", usize::MAX);
        assert!(matches!(
            parse(&max),
            Err(Error::InsufficientRows { found: 1, .. })
        ));
    }

    #[rstest::rstest]
    fn test_bare_index_is_a_row_only_for_single_field_blocks() {
        let parsed = parse("lista[2]{num}:\n1\n2").unwrap();
        let block = parsed.document.array("lista").unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(block.records()[1].get("num"), Some("2"));

        let err = parse("pontos[1]{item,topico}:\n1").unwrap_err();
        assert!(matches!(err, Error::InsufficientRows { found: 0, .. }));
    }

    #[rstest::rstest]
    fn test_later_array_replaces_scalar_of_same_name() {
        let parsed = parse("pontos: none\npontos[1]{item,topico}:\n1,First").unwrap();
        assert!(parsed.document.array("pontos").is_some());
        assert_eq!(parsed.document.len(), 1);
    }
}
