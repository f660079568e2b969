use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::markup::Rule;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("no markup document at {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("malformed markup at line {line}, column {column}: {message}")]
    MalformedMarkup {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("markup document has no root element")]
    NoRootElement,

    #[error("malformed directive {name}=\"{value}\" on <{element}> at line {line}: expected `<item> of <collection>` or `<item> in <collection>`")]
    MalformedDirective {
        element: String,
        name: String,
        value: String,
        line: usize,
    },

    #[error("<{element}> at line {line} carries both _if and _foreach; split it into nested elements")]
    ConflictingDirectives { element: String, line: usize },

    #[error("invalid host type path `{host}`")]
    InvalidHost { host: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Errors after which the build carries on without generating code for
    /// the template.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CompileError::TemplateNotFound { .. }
                | CompileError::MalformedMarkup { .. }
                | CompileError::NoRootElement
        )
    }
}

impl From<pest::error::Error<Rule>> for CompileError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        CompileError::MalformedMarkup {
            line,
            column,
            message: err.variant.message().into_owned(),
        }
    }
}

/// A non-fatal finding reported while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
