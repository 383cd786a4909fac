use miette::{Diagnostic, SourceSpan};
use oxc_span::Span;
use thiserror::Error;

/// Result type for desugaring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for conditional declaration desugaring
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(condlet::io_error))]
    Io(String),

    #[error("Invalid binding in condition: {message}")]
    #[diagnostic(
        code(condlet::invalid_binding),
        help("a conditional declaration binds exactly one identifier with let or const")
    )]
    InvalidBinding {
        message: String,
        #[label("this binding")]
        span: SourceSpan,
    },

    #[error("Conditional declaration used where its completion value is observed")]
    #[diagnostic(
        code(condlet::unsupported_context),
        help("desugaring here would change the value of the enclosing script")
    )]
    UnsupportedContext {
        #[label("completion value taken from here")]
        span: SourceSpan,
    },

    #[error("Assignment to constant binding `{name}`")]
    #[diagnostic(code(condlet::const_reassignment))]
    ConstReassignment {
        name: String,
        #[label("assigned here")]
        span: SourceSpan,
    },

    #[error("Malformed conditional: {message}")]
    #[diagnostic(code(condlet::malformed_conditional))]
    MalformedConditional {
        message: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(condlet::parse_error))]
    Parse { message: String },

    #[error("Invalid request: {message}")]
    #[diagnostic(code(condlet::invalid_request))]
    Request { message: String },
}

impl Error {
    /// Create an invalid binding error pointing at an AST span
    pub fn invalid_binding(message: impl Into<String>, span: Span) -> Self {
        Error::InvalidBinding {
            message: message.into(),
            span: source_span(span),
        }
    }

    /// Create a malformed conditional error pointing at an AST span
    pub fn malformed(message: impl Into<String>, span: Span) -> Self {
        Error::MalformedConditional {
            message: message.into(),
            span: source_span(span),
        }
    }

    /// Source span of the offending node, if the error has one
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Error::InvalidBinding { span, .. }
            | Error::UnsupportedContext { span }
            | Error::ConstReassignment { span, .. }
            | Error::MalformedConditional { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Convert an oxc span into a miette label span
pub(crate) fn source_span(span: Span) -> SourceSpan {
    SourceSpan::from((span.start as usize, span.size() as usize))
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Request {
            message: err.to_string(),
        }
    }
}
