use std::fmt;

use super::parser::MAX_IDENT_LEN;
use super::syntax::Span;
use crate::program::SymKind;

/// Parse failure, carrying enough of the source to be rendered with
/// context later.
#[derive(Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    /// Filled in by the loader once the file's path is known.
    pub path: String,
    pub span: Span,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug)]
pub enum ParseErrorKind {
    /// Malformed input (from the grammar).
    Syntax { message: String },
    /// The same `(ident, kind)` defined twice in one file.
    DuplicateSymbol { kind: SymKind, ident: String },
}

impl ParseError {
    pub fn syntax(source: &str, span: Span, line: usize, col: usize, message: String) -> Self {
        Self {
            kind: ParseErrorKind::Syntax { message },
            source: source.to_string(),
            path: String::new(),
            span,
            line,
            col,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Syntax { message } => f.write_str(message),
            ParseErrorKind::DuplicateSymbol { kind, ident } => {
                write!(f, "{kind} `{ident}` is defined more than once in this file")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}:{}: {}", self.line, self.col, self.kind)
        } else {
            write!(f, "{}:{}:{}: {}", self.path, self.line, self.col, self.kind)
        }
    }
}

impl std::error::Error for ParseError {}

/// Non-fatal findings the parser reports alongside the instruction
/// stream; the CLI relays them to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Identifier longer than [`MAX_IDENT_LEN`]; it was truncated.
    TruncatedIdent { ident: String },
    /// Numeric literal above the 16-bit range; it was saturated.
    SaturatedLiteral { text: String },
    /// The file doesn't end with a newline.
    NoFinalNewline,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TruncatedIdent { ident } => write!(
                f,
                "`{ident}` is too long to be an identifier; \
                 keeping the first {MAX_IDENT_LEN} characters"
            ),
            Warning::SaturatedLiteral { text } => write!(
                f,
                "number {text} exceeds the maximum 16-bit value 65535; using 65535"
            ),
            Warning::NoFinalNewline => f.write_str("file doesn't end with a newline character"),
        }
    }
}
