//! Line scanner for Gherkin feature documents.
//!
//! The scanner classifies each physical line of a document into an ordered
//! stream of [`Token`]s carrying a kind, a keyword part, a text part and (for
//! tag lines and table rows) item spans. It is deliberately lexical: it does
//! not validate document structure, it only classifies lines so the formatter
//! can re-render them. Doc-string fences are tracked so that content between
//! them is never mistaken for steps or tables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod dialect;

pub use dialect::Dialect;

/// Closed enumeration of line classifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    FeatureLine,
    BackgroundLine,
    ScenarioLine,
    RuleLine,
    StepLine,
    ExamplesLine,
    TagLine,
    Comment,
    DocStringSeparator,
    TableRow,
    Other,
    Empty,
}

/// One classified line of the source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Keyword part. Header keywords carry no colon; step keywords keep
    /// their trailing space; doc-string separators carry the fence itself.
    pub keyword: String,
    pub text: String,
    /// Item spans for tag lines (individual `@name` labels) and table rows
    /// (unescaped cell text).
    pub items: Vec<String>,
}

impl Token {
    fn new(kind: TokenKind, keyword: &str, text: &str) -> Self {
        Self {
            kind,
            keyword: keyword.to_string(),
            text: text.to_string(),
            items: Vec::new(),
        }
    }

    fn with_items(kind: TokenKind, keyword: &str, text: &str, items: Vec<String>) -> Self {
        Self {
            kind,
            keyword: keyword.to_string(),
            text: text.to_string(),
            items,
        }
    }
}

/// Failures surfaced while obtaining the token stream.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Read and scan the document at `path`.
pub fn parse_file(path: &Path, dialect: &Dialect) -> Result<Vec<Token>, ParseError> {
    let contents = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(scan(&contents, dialect))
}

/// Scan in-memory document text into a token stream. Scanning never fails:
/// unclassifiable lines become [`TokenKind::Other`].
pub fn scan(contents: &str, dialect: &Dialect) -> Vec<Token> {
    let mut tokens = Vec::new();
    // Open doc-string fence, if any: (fence token, indent width).
    let mut open_fence: Option<(&'static str, usize)> = None;

    for raw in contents.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some((fence, fence_indent)) = open_fence {
            if trimmed.trim_end() == fence {
                tokens.push(Token::new(TokenKind::DocStringSeparator, fence, ""));
                open_fence = None;
            } else {
                tokens.push(Token::new(
                    TokenKind::Other,
                    "",
                    dedent(line, fence_indent),
                ));
            }
            continue;
        }

        if trimmed.is_empty() {
            tokens.push(Token::new(TokenKind::Empty, "", ""));
        } else if let Some(fence) = match_fence(trimmed) {
            let content_type = trimmed[fence.len()..].trim();
            tokens.push(Token::new(TokenKind::DocStringSeparator, fence, content_type));
            open_fence = Some((fence, indent));
        } else if trimmed.starts_with('#') {
            tokens.push(Token::new(TokenKind::Comment, "", line));
        } else if trimmed.starts_with('@') {
            let items = trimmed.split_whitespace().map(str::to_string).collect();
            tokens.push(Token::with_items(TokenKind::TagLine, "", trimmed, items));
        } else if trimmed.starts_with('|') {
            let items = split_table_cells(trimmed);
            tokens.push(Token::with_items(TokenKind::TableRow, "|", trimmed, items));
        } else if let Some((kind, keyword, text)) = dialect.match_header(trimmed) {
            tokens.push(Token::new(kind, keyword, text));
        } else if let Some((keyword, text)) = dialect.match_step(trimmed) {
            tokens.push(Token::new(TokenKind::StepLine, keyword, text));
        } else {
            tokens.push(Token::new(TokenKind::Other, "", line));
        }
    }

    tokens
}

fn match_fence(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("\"\"\"") {
        Some("\"\"\"")
    } else if trimmed.starts_with("```") {
        Some("```")
    } else {
        None
    }
}

/// Strip up to `width` leading spaces, preserving deeper indentation inside
/// the doc-string.
fn dedent(line: &str, width: usize) -> &str {
    let mut stripped = 0;
    for (idx, ch) in line.char_indices() {
        if ch != ' ' || stripped == width {
            return &line[idx..];
        }
        stripped += 1;
    }
    &line[line.len()..]
}

/// Split a table row into unescaped, trimmed cell texts. Supports the
/// `\|`, `\\` and `\n` escape sequences inside cells; content after the
/// closing pipe is discarded.
fn split_table_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = row.char_indices();

    // Skip the opening pipe.
    chars.next();

    let mut escaped = false;
    let mut closed = true;

    for (_, ch) in chars {
        if escaped {
            match ch {
                '|' => current.push('|'),
                'n' => current.push('\n'),
                '\\' => current.push('\\'),
                other => {
                    current.push('\\');
                    current.push(other);
                }
            }
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '|' {
            cells.push(current.trim().to_string());
            current.clear();
            closed = true;
        } else {
            current.push(ch);
            closed = false;
        }
    }

    // An unterminated final cell still counts; trailing junk after the
    // closing pipe does not.
    if !closed && !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}
