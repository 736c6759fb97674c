use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    MalformedArrayHeader,
    MalformedRow,
    InsufficientRows,
    MissingRequiredFields,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::MalformedArrayHeader => "malformed_array_header",
            ErrorKind::MalformedRow => "malformed_row",
            ErrorKind::InsufficientRows => "insufficient_rows",
            ErrorKind::MissingRequiredFields => "missing_required_fields",
        }
    }

    /// Structural errors abort a parse; completeness errors come from validation.
    pub fn is_structural(self) -> bool {
        !matches!(self, ErrorKind::MissingRequiredFields)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("input is empty")]
    EmptyInput,

    #[error("malformed array header on line {line}: {raw}")]
    MalformedArrayHeader { line: usize, raw: String },

    #[error(
        "array '{array}' row on line {line} has {actual} values, expected {expected}: {raw}"
    )]
    MalformedRow {
        array: String,
        line: usize,
        expected: usize,
        actual: usize,
        raw: String,
    },

    #[error("array '{array}' declares {expected} rows but only {found} were found")]
    InsufficientRows {
        array: String,
        expected: usize,
        found: usize,
    },

    #[error("missing required fields: {}", .names.join(", "))]
    MissingRequiredFields { names: Vec<String> },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput => ErrorKind::EmptyInput,
            Error::MalformedArrayHeader { .. } => ErrorKind::MalformedArrayHeader,
            Error::MalformedRow { .. } => ErrorKind::MalformedRow,
            Error::InsufficientRows { .. } => ErrorKind::InsufficientRows,
            Error::MissingRequiredFields { .. } => ErrorKind::MissingRequiredFields,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Error::MalformedArrayHeader { line, .. } | Error::MalformedRow { line, .. } => {
                Some(Location { line: *line })
            }
            _ => None,
        }
    }

    /// Flattens the error into the structure handed to the repair step.
    pub fn report(&self) -> ErrorReport {
        let mut report = ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            line: self.location().map(|location| location.line),
            array: None,
            expected: None,
            actual: None,
            raw_line: None,
            missing: Vec::new(),
        };
        match self {
            Error::EmptyInput => {}
            Error::MalformedArrayHeader { raw, .. } => {
                report.raw_line = Some(raw.clone());
            }
            Error::MalformedRow {
                array,
                expected,
                actual,
                raw,
                ..
            } => {
                report.array = Some(array.clone());
                report.expected = Some(*expected);
                report.actual = Some(*actual);
                report.raw_line = Some(raw.clone());
            }
            Error::InsufficientRows {
                array,
                expected,
                found,
            } => {
                report.array = Some(array.clone());
                report.expected = Some(*expected);
                report.actual = Some(*found);
            }
            Error::MissingRequiredFields { names } => {
                report.missing = names.clone();
            }
        }
        report
    }
}

/// A row handed to [`ArrayBlock::try_push_row`](crate::ArrayBlock::try_push_row)
/// that does not line up with the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row has {actual} values, expected {expected}")]
pub struct RowWidthError {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_line: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}
