use memchr::memchr;
use smallvec::SmallVec;

pub type FieldBuf<'a> = SmallVec<[&'a str; 8]>;

/// What a single trimmed, non-blank line holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    ArrayHeader(Header<'a>),
    /// Starts like `name[N]` but does not complete the header grammar.
    MalformedHeader,
    Scalar {
        key: &'a str,
        value: &'a str,
    },
    Unrecognized,
}

/// `name[len]{field,...}:` with any number of braces on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub len: usize,
    pub fields: FieldBuf<'a>,
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    match parse_header(line) {
        HeaderMatch::Header(header) => LineKind::ArrayHeader(header),
        HeaderMatch::Malformed => LineKind::MalformedHeader,
        HeaderMatch::NotHeader => match split_scalar(line) {
            Some((key, value)) => LineKind::Scalar { key, value },
            None => LineKind::Unrecognized,
        },
    }
}

/// `digits ','` at the start of the line.
pub fn is_data_row(line: &str) -> bool {
    let digits = leading_digits(line.as_bytes());
    digits > 0 && line.as_bytes().get(digits) == Some(&b',')
}

/// A non-empty run of ASCII digits and nothing else.
pub(crate) fn is_index(text: &str) -> bool {
    !text.is_empty() && leading_digits(text.as_bytes()) == text.len()
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(text: &str) -> bool {
    !text.is_empty() && identifier_len(text.as_bytes()) == text.len()
}

enum HeaderMatch<'a> {
    NotHeader,
    Malformed,
    Header(Header<'a>),
}

fn parse_header(line: &str) -> HeaderMatch<'_> {
    let bytes = line.as_bytes();
    let name_end = identifier_len(bytes);
    if name_end == 0 || bytes.get(name_end) != Some(&b'[') {
        return HeaderMatch::NotHeader;
    }
    let digits_start = name_end + 1;
    let digits = leading_digits(&bytes[digits_start..]);
    let digits_end = digits_start + digits;
    if digits == 0 || bytes.get(digits_end) != Some(&b']') {
        return HeaderMatch::NotHeader;
    }

    // From here on the line reads as an array header.
    let Ok(len) = line[digits_start..digits_end].parse::<usize>() else {
        return HeaderMatch::Malformed;
    };
    let mut idx = digits_end + 1;
    let open_start = idx;
    while bytes.get(idx) == Some(&b'{') {
        idx += 1;
    }
    if idx == open_start {
        return HeaderMatch::Malformed;
    }
    let list_start = idx;
    let Some(list_len) = memchr(b'}', &bytes[list_start..]) else {
        return HeaderMatch::Malformed;
    };
    let list_end = list_start + list_len;
    idx = list_end;
    while bytes.get(idx) == Some(&b'}') {
        idx += 1;
    }
    if bytes.get(idx) != Some(&b':') {
        return HeaderMatch::Malformed;
    }

    let mut fields = FieldBuf::new();
    for field in line[list_start..list_end].split(',') {
        let field = field.trim();
        if !is_identifier(field) {
            return HeaderMatch::Malformed;
        }
        fields.push(field);
    }

    HeaderMatch::Header(Header {
        name: &line[..name_end],
        len,
        fields,
    })
}

fn split_scalar(line: &str) -> Option<(&str, &str)> {
    let idx = memchr(b':', line.as_bytes())?;
    Some((line[..idx].trim(), line[idx + 1..].trim()))
}

fn identifier_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(&byte) if byte.is_ascii_alphabetic() || byte == b'_' => {}
        _ => return 0,
    }
    bytes
        .iter()
        .take_while(|&&byte| byte.is_ascii_alphanumeric() || byte == b'_')
        .count()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn header(line: &str) -> Header<'_> {
        match classify_line(line) {
            LineKind::ArrayHeader(header) => header,
            other => panic!("expected header for {line:?}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("pontos[2]{item,topico}:")]
    #[case("pontos[2]{{item,topico}}:")]
    #[case("pontos[2]{{item,topico}:")]
    #[case("pontos[2]{item,topico}}}:")]
    #[case("pontos[2]{ item , topico }:")]
    fn test_brace_counts_are_independent(#[case] line: &str) {
        let header = header(line);
        assert_eq!(header.name, "pontos");
        assert_eq!(header.len, 2);
        assert_eq!(header.fields.as_slice(), ["item", "topico"]);
    }

    #[rstest]
    #[case("pontos[2]{item,topico}")]
    #[case("pontos[2]:")]
    #[case("pontos[2]{}:")]
    #[case("pontos[2]{item,,topico}:")]
    #[case("pontos[2]{item topico}:")]
    #[case("pontos[2]{item,topico} :")]
    #[case("pontos[99999999999999999999999]{item}:")]
    fn test_malformed_headers(#[case] line: &str) {
        assert_eq!(classify_line(line), LineKind::MalformedHeader);
    }

    #[rstest]
    #[case("local: Room A", "local", "Room A")]
    #[case("data_horario: 01/01/2025 - 10:00", "data_horario", "01/01/2025 - 10:00")]
    #[case("link:https://example.com/a", "link", "https://example.com/a")]
    #[case("objetivo: Review item [1] of plan", "objetivo", "Review item [1] of plan")]
    #[case("pontos []: x", "pontos []", "x")]
    #[case(": orphan", "", "orphan")]
    fn test_scalars(#[case] line: &str, #[case] key: &str, #[case] value: &str) {
        assert_eq!(classify_line(line), LineKind::Scalar { key, value });
    }

    #[rstest]
    #[case("just some words")]
    #[case("1,Alice")]
    #[case("---")]
    fn test_unrecognized(#[case] line: &str) {
        assert_eq!(classify_line(line), LineKind::Unrecognized);
    }

    #[rstest]
    #[case("1,Alice", true)]
    #[case("12,a,b", true)]
    #[case("1,", true)]
    #[case("1 ,Alice", false)]
    #[case(",Alice", false)]
    #[case("a1,b", false)]
    fn test_data_row_marker(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_data_row(line), expected);
    }

    #[rstest]
    #[case("1", true)]
    #[case("042", true)]
    #[case("", false)]
    #[case("1a", false)]
    #[case("-1", false)]
    fn test_index_text(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_index(text), expected);
    }

    #[rstest]
    fn test_trailing_text_after_header_colon_is_ignored() {
        let header = header("participantes[0]{num,nome}: none");
        assert_eq!(header.len, 0);
        assert_eq!(header.fields.len(), 2);
    }
}
