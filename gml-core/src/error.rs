//! Typed error handling for gml.
//!
//! Every failure in the pipeline is fatal. Errors carry enough context
//! (path, line, declaration name) to produce a single-line diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gml operations.
#[derive(Error, Debug)]
pub enum GmlError {
    /// Missing or invalid configuration (flags, environment, gml.toml)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The input file does not exist
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The input file exists but could not be read
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Syntax error when parsing the input source
    #[error("parse error in {path}{}: {message}", location(.line, .column))]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// A commented declaration has no simple type annotation
    #[error(
        "cannot classify declaration `{name}` at line {line}: type `{found}` is not a simple type name"
    )]
    UnclassifiableDeclaration {
        name: String,
        line: usize,
        found: String,
    },

    /// A commented `static` of the requested type; generated constants can
    /// only refer to `const` items
    #[error("declaration `{name}` at line {line} is a `static`; only `const` items can be listed")]
    StaticDeclaration { name: String, line: usize },

    /// No commented declaration of the requested type
    #[error("no commented declarations of type `{type_name}` found ({scanned} commented declarations scanned)")]
    NoDeclarationsFound { type_name: String, scanned: usize },

    /// Template execution failed
    #[error("render error: {message}")]
    Render { message: String },

    /// Rendered text is not valid Rust
    #[error("generated source is malformed{}: {message}", location(.line, .column))]
    MalformedOutput {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// Writing the generated file failed
    #[error("failed to write {path}: {message}")]
    OutputWrite {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(l), Some(c)) => format!(" at {}:{}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}

impl GmlError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    ///
    /// `NotFound` maps to [`GmlError::InputNotFound`].
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::InputNotFound { path };
        }
        Self::Io {
            path,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a malformed-output error with optional location.
    pub fn malformed(message: impl Into<String>, line: Option<usize>, column: Option<usize>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an output write error.
    pub fn output_write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Short stable name of the error kind, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::InputNotFound { .. } => "input_not_found",
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
            Self::UnclassifiableDeclaration { .. } => "unclassifiable_declaration",
            Self::StaticDeclaration { .. } => "static_declaration",
            Self::NoDeclarationsFound { .. } => "no_declarations_found",
            Self::Render { .. } => "render",
            Self::MalformedOutput { .. } => "malformed_output",
            Self::OutputWrite { .. } => "output_write",
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::InputNotFound { path } => Some(path),
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::OutputWrite { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for gml results.
pub type GmlResult<T> = Result<T, GmlError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add input path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> GmlResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> GmlResult<T> {
        self.map_err(|e| GmlError::io(path, e))
    }
}
