//! Error types for the DTD pipeline.
//!
//! Every stage reports failures as values. Scanner and parser errors carry
//! the position within the stream that produced them, which may be an
//! expanded entity rather than the top-level input.

use std::fmt;
use std::io;

/// A failure in the character or token layer of the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    /// Identifier of the stream the error occurred in (file name or entity id).
    pub identifier: String,
    pub line: u32,
    pub column: u32,
}

impl ScanError {
    pub fn new(message: impl Into<String>, identifier: impl Into<String>, line: u32, column: u32) -> Self {
        ScanError {
            message: message.into(),
            identifier: identifier.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at [{}] line {}, column {}",
            self.message, self.identifier, self.line, self.column
        )
    }
}

impl std::error::Error for ScanError {}

/// A failure while parsing declarations out of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Propagated scanner failure.
    Scan(ScanError),
    /// The token stream did not form a valid declaration.
    Syntax {
        message: String,
        identifier: String,
        line: u32,
        column: u32,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Scan(err) => write!(f, "Scan error: {}", err),
            ParseError::Syntax {
                message,
                identifier,
                line,
                column,
            } => write!(
                f,
                "Syntax error: {} at [{}] line {}, column {}",
                message, identifier, line, column
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Scan(err) => Some(err),
            ParseError::Syntax { .. } => None,
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError::Scan(err)
    }
}

/// A content model that failed to compile into a pattern.
#[derive(Debug)]
pub enum CompileError {
    Pattern { element: String, source: regex::Error },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Pattern { element, source } => {
                write!(f, "Bad pattern for element {}: {}", element, source)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Pattern { source, .. } => Some(source),
        }
    }
}

/// A grammar cache that could not be read back.
///
/// Any failure abandons the whole table; callers fall back to re-parsing
/// the DTD source.
#[derive(Debug)]
pub enum CacheError {
    Io(io::Error),
    Pattern { element: String, source: regex::Error },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(err) => write!(f, "Cache read failed: {}", err),
            CacheError::Pattern { element, source } => {
                write!(f, "Cached pattern for element {} is invalid: {}", element, source)
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(err) => Some(err),
            CacheError::Pattern { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::Io(err)
    }
}

/// Top-level error for whole-pipeline entry points and the CLI.
#[derive(Debug)]
pub enum DtdError {
    Parse(ParseError),
    Compile(CompileError),
    Cache(CacheError),
    Io(io::Error),
}

impl fmt::Display for DtdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DtdError::Parse(err) => write!(f, "{}", err),
            DtdError::Compile(err) => write!(f, "{}", err),
            DtdError::Cache(err) => write!(f, "{}", err),
            DtdError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DtdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DtdError::Parse(err) => Some(err),
            DtdError::Compile(err) => Some(err),
            DtdError::Cache(err) => Some(err),
            DtdError::Io(err) => Some(err),
        }
    }
}

impl From<ParseError> for DtdError {
    fn from(err: ParseError) -> Self {
        DtdError::Parse(err)
    }
}

impl From<CompileError> for DtdError {
    fn from(err: CompileError) -> Self {
        DtdError::Compile(err)
    }
}

impl From<CacheError> for DtdError {
    fn from(err: CacheError) -> Self {
        DtdError::Cache(err)
    }
}

impl From<io::Error> for DtdError {
    fn from(err: io::Error) -> Self {
        DtdError::Io(err)
    }
}
