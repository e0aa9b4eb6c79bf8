//! Lexer / tokenizer

use base::span::Span;
use thiserror::Error;

use crate::syntax::cst::SyntaxKind;

/// Text span with syntactic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl Token {
    pub fn slice<'s>(&self, src: &'s str) -> &'s str {
        self.span.slice(src)
    }
}

/// Lexical error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span } => *span,
        }
    }
}

/// Converts text into tokens. It doesn't fail even if the given text has wrong syntax.
pub fn from_str(src: &str) -> (Vec<Token>, Vec<LexError>) {
    let lex = Lexer {
        src,
        sp: Span::from(0u32, 0u32),
        tks: vec![],
        errs: vec![],
    };
    lex.run()
}

/// Stateful lexer that converts given string into simple [`Token`] s
#[derive(Debug)]
struct Lexer<'s> {
    /// Scanned as bytes. Every delimiter is ASCII, and non-ASCII bytes only ever appear inside
    /// identifiers, strings and comments, so token boundaries stay on `char` boundaries.
    src: &'s str,
    sp: Span,
    tks: Vec<Token>,
    errs: Vec<LexError>,
}

/// "Whitespace" = trivia
fn is_ws(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\t' | b'\r')
}

/// Single-character-delimited token
fn is_symbol(c: u8) -> bool {
    matches!(c, b'(' | b')')
}

/// [0-9]
fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// [0-9] | . | _
fn is_num_body(c: u8) -> bool {
    c.is_ascii_digit() || matches!(c, b'.' | b'_')
}

fn is_ident_body(c: u8) -> bool {
    !(is_ws(c) || is_symbol(c) || c == b'"' || c == b';')
}

/// Lexing utilities
impl<'s> Lexer<'s> {
    fn bytes(&self) -> &'s [u8] {
        self.src.as_bytes()
    }

    fn peek_n(&self, n: usize) -> Option<u8> {
        self.bytes().get(self.sp.end.into_usize() + n).copied()
    }

    fn consume_span_as(&mut self, kind: SyntaxKind) -> Token {
        let span = self.sp;
        self.sp.start = self.sp.end;
        Token { kind, span }
    }

    /// Consumes a byte if it satisfies the predicate
    fn advance_if(&mut self, p: impl Fn(u8) -> bool) -> Option<()> {
        let peek = self.peek_n(0)?;
        if p(peek) {
            self.sp.end += 1u32;
            Some(())
        } else {
            None
        }
    }

    /// The predicate returns if we should continue scanning reading a byte
    fn advance_while(&mut self, p: impl Fn(u8) -> bool) {
        while let Some(peek) = self.peek_n(0) {
            if !p(peek) {
                return;
            }
            self.sp.end += 1u32;
        }
    }
}

macro_rules! apply_syntax {
    ($obj:ident, $($syn:tt),* $(,)?) => {
        $(
            if let Some(tk) = $obj.$syn() {
                $obj.tks.push(tk);
                return;
            }
        )*
    };
}

impl<'s> Lexer<'s> {
    pub fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while self.sp.start.into_usize() < self.src.len() {
            self.process_forward();
        }

        (self.tks, self.errs)
    }

    /// Processes one token and stores it in `self.tks`
    fn process_forward(&mut self) {
        apply_syntax!(
            self,
            lex_one_byte,
            lex_comment,
            lex_ws,
            lex_num,
            lex_str,
            lex_ident_or_kwd
        );

        // every byte is accepted by `lex_ident_or_kwd` at least
        unreachable!("lex error at span {:?}", self.sp);
    }
}

/// Grammers (&mut self → Option<Token>)
impl<'s> Lexer<'s> {
    /// `(` | `)`
    fn lex_one_byte(&mut self) -> Option<Token> {
        let kind = match self.peek_n(0)? {
            b'(' => SyntaxKind::LParen,
            b')' => SyntaxKind::RParen,
            _ => return None,
        };

        self.sp.end += 1u32;
        Some(self.consume_span_as(kind))
    }

    /// Trivia
    fn lex_ws(&mut self) -> Option<Token> {
        self.advance_if(is_ws)?;
        self.advance_while(is_ws);
        Some(self.consume_span_as(SyntaxKind::Ws))
    }

    /// `;` until the end of the line (the newline is not included)
    fn lex_comment(&mut self) -> Option<Token> {
        self.advance_if(|b| b == b';')?;
        self.advance_while(|b| b != b'\n');
        Some(self.consume_span_as(SyntaxKind::Comment))
    }

    /// `-`?[0-9]<num>*
    fn lex_num(&mut self) -> Option<Token> {
        let start = match self.peek_n(0)? {
            b'-' => 1,
            _ => 0,
        };

        if !self.peek_n(start).map_or(false, is_digit) {
            return None;
        }

        self.sp.end += (start + 1) as u32;
        self.advance_while(is_num_body);
        Some(self.consume_span_as(SyntaxKind::Num))
    }

    /// "[^"]*"
    fn lex_str(&mut self) -> Option<Token> {
        self.advance_if(|b| b == b'"')?;
        self.advance_while(|b| b != b'"');
        if self.advance_if(|b| b == b'"').is_none() {
            self.errs.push(LexError::UnterminatedString {
                span: Span::from(self.sp.start, self.src.len()),
            });
            // No early return; allow non-terminated string at EoF
        }

        Some(self.consume_span_as(SyntaxKind::Str))
    }

    /// [^<ws>()";]+
    fn lex_ident_or_kwd(&mut self) -> Option<Token> {
        self.advance_if(is_ident_body)?;
        self.advance_while(is_ident_body);
        let mut tk = self.consume_span_as(SyntaxKind::Ident);

        if let Some(kind) = to_kwd(tk.slice(self.src)) {
            tk.kind = kind;
        }

        return Some(tk);

        fn to_kwd(kwd: &str) -> Option<SyntaxKind> {
            Some(match kwd {
                // literals are recognized
                "true" => SyntaxKind::True,
                "false" => SyntaxKind::False,
                "nil" => SyntaxKind::Nil,

                // REMARK: special form keywords (`proc`, `let`, `do`) are identifiers to the lexer
                _ => return None,
            })
        }
    }
}
