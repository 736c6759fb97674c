use memchr::memchr_iter;

/// A physical input line with surrounding whitespace removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanLine<'a> {
    /// 1-based line number in the input.
    pub number: usize,
    pub content: &'a str,
}

#[derive(Debug)]
pub struct ScanResult<'a> {
    /// Non-blank lines only, in input order.
    pub lines: Vec<ScanLine<'a>>,
    pub total: usize,
}

pub fn scan_lines(input: &str) -> ScanResult<'_> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 0;
    for idx in memchr_iter(b'\n', bytes) {
        number += 1;
        push_line(&mut lines, &input[start..idx], number);
        start = idx + 1;
    }
    number += 1;
    push_line(&mut lines, &input[start..], number);

    ScanResult {
        lines,
        total: number,
    }
}

fn push_line<'a>(lines: &mut Vec<ScanLine<'a>>, raw: &'a str, number: usize) {
    let content = raw.trim();
    if !content.is_empty() {
        lines.push(ScanLine { number, content });
    }
}
