//!
//! Unified, `miette`-based diagnostics for the scanner.
//!
//! # Overview
//!
//! Every fatal condition the scanner or its helpers can raise is a [`ScanError`].
//! Soft conditions (no match, redefinition, popping an empty macro stack) are never
//! errors; they surface as `Option`/`bool` results on the scanning operations.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(InvalidPattern, "bad pattern {}", pat)`
//!
//! - **Use `err_ctx!` for errors that point into a buffer.**
//!   - `err_ctx!(Syntax, "Unterminated string", src, span, line)`
//!   - `err_ctx!(MacroCycle, msg, src, span, line, help)`
//!
//! The macros build the `ErrorContext` for you; never assemble one by hand unless
//! you need a combination no macro arm covers.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// Convenience alias for results carrying a [`ScanError`].
pub type ScanResult<T> = Result<T, ScanError>;

/// Byte range into the buffer an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Type-safe error classification corresponding to the `ScanError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A macro key re-entered the active expansion stack.
    MacroCycle,
    /// A caller-supplied pattern failed to compile.
    InvalidPattern,
    /// Malformed MML at the scanner level.
    Syntax,
    /// Reading an input file failed.
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MacroCycle => "MacroCycle",
            ErrorType::InvalidPattern => "InvalidPattern",
            ErrorType::Syntax => "Syntax",
            ErrorType::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The buffer the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span within `source` (if any).
    pub span: Option<Span>,
    /// 1-based line within the active buffer.
    pub line: Option<usize>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Unified error type for every fatal scanner failure.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Infinite replacement macro substitution: {message}")]
    MacroCycle {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Invalid pattern: {message}")]
    InvalidPattern {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl ScanError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            ScanError::MacroCycle { ctx, .. } => ctx,
            ScanError::InvalidPattern { ctx, .. } => ctx,
            ScanError::Syntax { ctx, .. } => ctx,
            ScanError::Io { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            ScanError::MacroCycle { message, .. } => message,
            ScanError::InvalidPattern { message, .. } => message,
            ScanError::Syntax { message, .. } => message,
            ScanError::Io { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ScanError::MacroCycle { .. } => ErrorType::MacroCycle,
            ScanError::InvalidPattern { .. } => ErrorType::InvalidPattern,
            ScanError::Syntax { .. } => ErrorType::Syntax,
            ScanError::Io { .. } => ErrorType::Io,
        }
    }

    /// Line the error was raised on, relative to the buffer active at the time.
    pub fn line(&self) -> Option<usize> {
        self.get_ctx().line
    }

    /// Attaches an underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let slot = match &mut self {
            ScanError::MacroCycle { source, .. } => source,
            ScanError::InvalidPattern { source, .. } => source,
            ScanError::Syntax { source, .. } => source,
            ScanError::Io { source, .. } => source,
        };
        *slot = Some(Box::new(cause));
        self
    }

    /// Renames the attached source, e.g. to the file the text was read from.
    pub fn with_source_name(mut self, name: &str) -> Self {
        let ctx = match &mut self {
            ScanError::MacroCycle { ctx, .. } => ctx,
            ScanError::InvalidPattern { ctx, .. } => ctx,
            ScanError::Syntax { ctx, .. } => ctx,
            ScanError::Io { ctx, .. } => ctx,
        };
        if let Some(src) = ctx.source.take() {
            ctx.source = Some(to_named_source(name, src.inner()));
        }
        self
    }
}

impl Diagnostic for ScanError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("amkscan::{}", self.error_type())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // A span without a source has nothing to render against.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = span.end.saturating_sub(span.start);
        let text = match ctx.line {
            Some(line) => format!("line {}: {}", line, self.message()),
            None => self.message().to_string(),
        };
        let label = LabeledSpan::new(Some(text), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts buffer text into a shareable `NamedSource` for error contexts.
pub fn to_named_source<S: AsRef<str>>(name: &str, text: S) -> SourceArc {
    Arc::new(NamedSource::new(name, text.as_ref().to_string()))
}

/// Constructs a `ScanError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    // Message with 2 format arguments
    ($variant:ident, $msg:expr, $arg1:expr, $arg2:expr) => {
        $crate::ScanError::$variant {
            message: format!($msg, $arg1, $arg2),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    // Message with a single format argument
    ($variant:ident, $msg:expr, $arg:expr) => {
        $crate::ScanError::$variant {
            message: format!($msg, $arg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    // Message only
    ($variant:ident, $msg:expr) => {
        $crate::ScanError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `ScanError` variant pointing into a buffer.
///
/// `$src` is a `&SourceArc`, `$span` a `Span`, `$line` the 1-based line.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, line, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $line:expr, $help:expr) => {
        $crate::ScanError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                line: Some($line),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, src, span, line
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $line:expr) => {
        $crate::ScanError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                line: Some($line),
                help: None,
            },
            source: None,
        }
    };
}
