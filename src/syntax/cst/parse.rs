//! Tree of tokens
//!
//! # Implementation rules
//!
//! - Parse function users are responsible for bumping trivia. Parse functions do not call
//! `maybe_bump_ws` at the beginning.
//! - `Body` nodes never start or end with trivia; trailing trivia is bumped into the enclosing
//! list.

use std::fmt;

use base::span::Span;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use thiserror::Error;

use crate::syntax::cst::{
    lex::{LexError, Token},
    SyntaxKind, SyntaxNode,
};

/// Parse / lexing error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{err}")]
    LexError { err: LexError },
    #[error("expected {expected}, found `{found:?}` while parsing {ctx}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        ctx: ErrorContext,
    },
    #[error("expected {expected}, found EoF while parsing {ctx}")]
    UnexpectedEof {
        expected: &'static str,
        at: Span,
        ctx: ErrorContext,
    },
    #[error("unclosed parentheses")]
    UnclosedParentheses { span: Span },
    #[error("unmatched `)`")]
    UnmatchedRParen { span: Span },
    #[error("`{form}` takes {expected} form(s), found {found}")]
    WrongArity {
        form: &'static str,
        expected: usize,
        found: usize,
        span: Span,
    },
}

impl ParseError {
    /// Source span the error is reported at
    pub fn span(&self) -> Span {
        match self {
            ParseError::LexError { err } => err.span(),
            ParseError::UnexpectedToken { found, .. } => found.span,
            ParseError::UnexpectedEof { at, .. } => *at,
            ParseError::UnclosedParentheses { span } => *span,
            ParseError::UnmatchedRParen { span } => *span,
            ParseError::WrongArity { span, .. } => *span,
        }
    }

    /// Returns a simplified error message, useful when quoting source text.
    pub fn simple_message(&self) -> String {
        match self {
            ParseError::LexError { err } => err.to_string(),
            ParseError::UnexpectedToken { expected, .. } => format!("expected {expected}"),
            ParseError::UnexpectedEof { expected, .. } => format!("expected {expected}"),
            ParseError::UnclosedParentheses { .. } => "unclosed parentheses".to_string(),
            ParseError::UnmatchedRParen { .. } => "unmatched `)`".to_string(),
            ParseError::WrongArity { expected, .. } => format!("expected {expected} form(s)"),
        }
    }
}

/// Surrounding context of a [`ParseError`], e.g., "while parsing a procedure"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    /// Top-level form
    File,
    /// While parsing a list
    List {
        /// Span of the `(`
        l_paren_span: Span,
    },
    /// While parsing a procedure
    Proc {
        /// Span of the `proc` keyword
        proc_span: Span,
    },
    /// While parsing a parameter list
    Params,
    /// While parsing a `let` form
    Let {
        /// Span of the `let` identifier
        let_span: Span,
    },
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorContext::File => "file",
            ErrorContext::List { .. } => "list",
            ErrorContext::Proc { .. } => "procedure",
            ErrorContext::Params => "parameters",
            ErrorContext::Let { .. } => "let",
        };
        f.write_str(s)
    }
}

/// Creates a CST
pub fn parse(src: &str, tks: &[Token]) -> (SyntaxNode, Vec<ParseError>) {
    let pcx = ParseContext { src, tks };
    let parser = ParseState::new();
    let (root, errs) = parser.run(&pcx);
    (SyntaxNode::new_root(root), errs)
}

/// Referred to as `pcx`
#[derive(Debug, Clone)]
struct ParseContext<'s, 't> {
    src: &'s str,
    tks: &'t [Token],
}

impl<'s, 't> ParseContext<'s, 't> {
    fn eof_span(&self) -> Span {
        Span::from(self.src.len(), self.src.len())
    }
}

#[derive(Debug)]
struct ParseState {
    /// Index of the next token
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errs: Vec<ParseError>,
}

impl ParseState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errs: vec![],
        }
    }

    pub fn run(mut self, pcx: &ParseContext) -> (GreenNode, Vec<ParseError>) {
        self.builder.start_node(SyntaxKind::ROOT.into());

        self.maybe_bump_ws(pcx);
        while self.peek(pcx).is_some() {
            self.bump_form(pcx, ErrorContext::File);
            self.maybe_bump_ws(pcx);
        }

        self.builder.finish_node();

        (self.builder.finish(), self.errs)
    }
}

/// Helpers
impl ParseState {
    fn peek<'pcx>(&self, pcx: &'pcx ParseContext) -> Option<&'pcx Token> {
        pcx.tks.get(self.pos)
    }

    /// Peeks the next token that is not trivia
    fn peek_non_trivia<'pcx>(&self, pcx: &'pcx ParseContext) -> Option<&'pcx Token> {
        pcx.tks[self.pos.min(pcx.tks.len())..]
            .iter()
            .find(|tk| !tk.kind.is_trivia())
    }

    /// Consume the next element as a token
    fn bump<'pcx>(&mut self, pcx: &'pcx ParseContext) -> &'pcx Token {
        let tk = &pcx.tks[self.pos];
        self.builder.token(tk.kind.into(), tk.slice(pcx.src));
        self.pos += 1;
        tk
    }

    fn bump_kind<'pcx>(&mut self, pcx: &'pcx ParseContext, kind: SyntaxKind) -> &'pcx Token {
        assert_eq!(self.peek(pcx).map(|t| t.kind), Some(kind));
        self.bump(pcx)
    }

    fn maybe_bump_kind(&mut self, pcx: &ParseContext, kind: SyntaxKind) -> Option<()> {
        let top = self.peek(pcx)?;
        if top.kind == kind {
            self.bump(pcx);
            Some(())
        } else {
            None
        }
    }

    fn maybe_bump_ws(&mut self, pcx: &ParseContext) -> Option<()> {
        let mut res = false;
        while self.peek(pcx).map_or(false, |tk| tk.kind.is_trivia()) {
            self.bump(pcx);
            res = true;
        }
        res.then_some(())
    }

    /// Wraps a single token into a node
    fn bump_as_node(&mut self, pcx: &ParseContext, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
        self.bump(pcx);
        self.builder.finish_node();
    }

    /// Bumps forms until the next non-trivia token is `)` or EoF. Returns the number of forms.
    fn bump_forms_until_rparen(&mut self, pcx: &ParseContext, ctx: ErrorContext) -> usize {
        let mut n = 0;
        loop {
            match self.peek_non_trivia(pcx) {
                None => return n,
                Some(tk) if tk.kind == SyntaxKind::RParen => return n,
                Some(_) => {}
            }

            if n > 0 {
                self.maybe_bump_ws(pcx);
            }
            self.bump_form(pcx, ctx);
            n += 1;
        }
    }

    /// Bumps the closing `)` of a list that started at `start`
    fn bump_rparen_or_report(&mut self, pcx: &ParseContext, start: Span) {
        self.maybe_bump_ws(pcx);
        if self.maybe_bump_kind(pcx, SyntaxKind::RParen).is_none() {
            self.errs.push(ParseError::UnclosedParentheses {
                span: Span {
                    start: start.start,
                    end: pcx.src.len().into(),
                },
            });
        }
    }

    fn report_unexpected(&mut self, pcx: &ParseContext, expected: &'static str, ctx: ErrorContext) {
        let err = match self.peek(pcx) {
            Some(found) => ParseError::UnexpectedToken {
                expected,
                found: *found,
                ctx,
            },
            None => ParseError::UnexpectedEof {
                expected,
                at: pcx.eof_span(),
                ctx,
            },
        };
        self.errs.push(err);
    }
}

/// High-level syntax items
impl ParseState {
    /// form → list | atom
    fn bump_form(&mut self, pcx: &ParseContext, ctx: ErrorContext) {
        let tk = match self.peek(pcx) {
            Some(tk) => *tk,
            None => return,
        };

        match tk.kind {
            SyntaxKind::LParen => self.bump_list(pcx),
            SyntaxKind::Ident => self.bump_as_node(pcx, SyntaxKind::Path),
            kind if kind.is_literal_token() => self.bump_as_node(pcx, SyntaxKind::Literal),
            SyntaxKind::RParen => {
                self.errs.push(ParseError::UnmatchedRParen { span: tk.span });
                self.bump_as_node(pcx, SyntaxKind::Error);
            }
            _ => {
                self.report_unexpected(pcx, "form", ctx);
                self.bump_as_node(pcx, SyntaxKind::Error);
            }
        }
    }

    /// list → DefProc | Let | Do | Call
    fn bump_list(&mut self, pcx: &ParseContext) {
        // We don't know the node kind yet, so let's wrap the tokens later
        let checkpoint = self.builder.checkpoint();

        let l_paren = *self.bump_kind(pcx, SyntaxKind::LParen);
        let ctx = ErrorContext::List {
            l_paren_span: l_paren.span,
        };
        self.maybe_bump_ws(pcx);

        let peek = match self.peek(pcx) {
            Some(tk) => *tk,
            None => {
                self.errs.push(ParseError::UnclosedParentheses {
                    span: Span::from(l_paren.span.start, pcx.src.len()),
                });
                self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
                self.builder.finish_node();
                return;
            }
        };

        if peek.kind != SyntaxKind::Ident {
            self.report_unexpected(pcx, "<call or special form>", ctx);
            self.builder.start_node_at(checkpoint, SyntaxKind::Error.into());
            self.bump_forms_until_rparen(pcx, ctx);
            self.bump_rparen_or_report(pcx, l_paren.span);
            self.builder.finish_node();
            return;
        }

        match peek.slice(pcx.src) {
            "proc" => self.bump_list_proc(pcx, checkpoint, l_paren.span),
            "let" => self.bump_list_let(pcx, checkpoint, l_paren.span),
            "do" => self.bump_list_do(pcx, checkpoint, l_paren.span),
            _ => self.bump_list_call(pcx, checkpoint, l_paren.span),
        }
    }

    /// list-proc → "proc" Name Params Body ")"
    fn bump_list_proc(&mut self, pcx: &ParseContext, checkpoint: Checkpoint, l_paren: Span) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::DefProc.into());

        let proc_tk = *self.bump_kind(pcx, SyntaxKind::Ident);
        let ctx = ErrorContext::Proc {
            proc_span: proc_tk.span,
        };

        self.maybe_bump_ws(pcx);
        self.maybe_bump_name(pcx, ctx);

        self.maybe_bump_ws(pcx);
        self.maybe_bump_params(pcx);

        self.maybe_bump_ws(pcx);
        self.builder.start_node(SyntaxKind::Body.into());
        self.bump_forms_until_rparen(pcx, ctx);
        self.builder.finish_node();

        self.bump_rparen_or_report(pcx, l_paren);
        self.builder.finish_node();
    }

    /// Name → Ident
    fn maybe_bump_name(&mut self, pcx: &ParseContext, ctx: ErrorContext) {
        match self.peek(pcx) {
            Some(tk) if tk.kind == SyntaxKind::Ident => self.bump_as_node(pcx, SyntaxKind::Name),
            _ => self.report_unexpected(pcx, "name", ctx),
        }
    }

    /// Params → "(" Param* ")"
    fn maybe_bump_params(&mut self, pcx: &ParseContext) {
        let l_paren = match self.peek(pcx) {
            Some(tk) if tk.kind == SyntaxKind::LParen => *tk,
            _ => {
                self.report_unexpected(pcx, "parameter list", ErrorContext::Params);
                return;
            }
        };

        self.builder.start_node(SyntaxKind::Params.into());
        self.bump(pcx);

        loop {
            self.maybe_bump_ws(pcx);
            let tk = match self.peek(pcx) {
                Some(tk) => *tk,
                None => break,
            };

            match tk.kind {
                SyntaxKind::RParen => break,
                SyntaxKind::Ident => self.bump_as_node(pcx, SyntaxKind::Param),
                _ => {
                    self.report_unexpected(pcx, "parameter", ErrorContext::Params);
                    if tk.kind == SyntaxKind::LParen {
                        // keep nesting balanced
                        self.builder.start_node(SyntaxKind::Error.into());
                        self.bump_list(pcx);
                        self.builder.finish_node();
                    } else {
                        self.bump_as_node(pcx, SyntaxKind::Error);
                    }
                }
            }
        }

        self.bump_rparen_or_report(pcx, l_paren.span);
        self.builder.finish_node();
    }

    /// list-let → "let" Name form ")"
    fn bump_list_let(&mut self, pcx: &ParseContext, checkpoint: Checkpoint, l_paren: Span) {
        self.builder.start_node_at(checkpoint, SyntaxKind::Let.into());

        let let_tk = *self.bump_kind(pcx, SyntaxKind::Ident);
        let ctx = ErrorContext::Let {
            let_span: let_tk.span,
        };

        self.maybe_bump_ws(pcx);
        self.maybe_bump_name(pcx, ctx);

        self.maybe_bump_ws(pcx);
        let n = self.bump_forms_until_rparen(pcx, ctx);
        if n != 1 {
            self.errs.push(ParseError::WrongArity {
                form: "let",
                expected: 1,
                found: n,
                span: let_tk.span,
            });
        }

        self.bump_rparen_or_report(pcx, l_paren);
        self.builder.finish_node();
    }

    /// list-do → "do" Body ")"
    fn bump_list_do(&mut self, pcx: &ParseContext, checkpoint: Checkpoint, l_paren: Span) {
        self.builder.start_node_at(checkpoint, SyntaxKind::Do.into());

        self.bump_kind(pcx, SyntaxKind::Ident);
        let ctx = ErrorContext::List {
            l_paren_span: l_paren,
        };

        self.maybe_bump_ws(pcx);
        self.builder.start_node(SyntaxKind::Body.into());
        self.bump_forms_until_rparen(pcx, ctx);
        self.builder.finish_node();

        self.bump_rparen_or_report(pcx, l_paren);
        self.builder.finish_node();
    }

    /// list-call → Path form* ")"
    fn bump_list_call(&mut self, pcx: &ParseContext, checkpoint: Checkpoint, l_paren: Span) {
        self.builder.start_node_at(checkpoint, SyntaxKind::Call.into());

        self.bump_as_node(pcx, SyntaxKind::Path);
        let ctx = ErrorContext::List {
            l_paren_span: l_paren,
        };

        self.maybe_bump_ws(pcx);
        self.bump_forms_until_rparen(pcx, ctx);

        self.bump_rparen_or_report(pcx, l_paren);
        self.builder.finish_node();
    }
}
