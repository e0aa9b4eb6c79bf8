//! Syntax diagnostics

use base::span::Span;

use crate::{
    syntax::cst::{lex::LexError, ParseError},
    util::diag,
};

impl diag::Diagnostic for LexError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedString { .. } => "E0000",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        self.to_string()
    }

    fn reason(&self) -> String {
        "missing closing `\"`".to_string()
    }

    fn span(&self) -> Span {
        LexError::span(self)
    }
}

impl diag::Diagnostic for ParseError {
    fn code(&self) -> &'static str {
        match self {
            ParseError::LexError { err } => err.code(),
            ParseError::UnexpectedToken { .. } => "E0010",
            ParseError::UnexpectedEof { .. } => "E0011",
            ParseError::UnclosedParentheses { .. } => "E0012",
            ParseError::UnmatchedRParen { .. } => "E0013",
            ParseError::WrongArity { .. } => "E0014",
        }
    }

    fn severity(&self) -> diag::Severity {
        diag::Severity::Error
    }

    fn msg(&self) -> String {
        self.to_string()
    }

    fn reason(&self) -> String {
        self.simple_message()
    }

    fn span(&self) -> Span {
        ParseError::span(self)
    }
}
