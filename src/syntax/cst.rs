//! Concrete syntax tree
//!
//! `cst` is powered by [`rowan`]. It manages lossless structure of text, represented as a tree
//! (node) of untyped, homogeneous tokens. The PSI layer overlays typed behavior on these nodes.

pub mod lex;

mod parse;

#[doc(inline)]
pub use parse::{parse, ErrorContext, ParseError};

/// Lexes and parses `src` into a CST. Never fails; errors are reported next to the tree.
pub fn parse_str(src: &str) -> (SyntaxNode, Vec<ParseError>) {
    let (tks, lex_errs) = lex::from_str(src);
    let (root, mut errs) = parse::parse(src, &tks);

    let mut all = lex_errs
        .into_iter()
        .map(|err| ParseError::LexError { err })
        .collect::<Vec<_>>();
    all.append(&mut errs);

    (root, all)
}

/// Bridge to [`rowan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lang {}

impl rowan::Language for Lang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ROOT as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Subtree. View to green tree (red tree) in words of "red-green tree"
pub type SyntaxNode = rowan::SyntaxNode<Lang>;

/// Leaf. View to green token (red token) in words of "red-green tree"
pub type SyntaxToken = rowan::SyntaxToken<Lang>;

/// Subtree or leaf: [`SyntaxNode`] | [`SyntaxToken`]
pub type SyntaxElement = rowan::SyntaxElement<Lang>;

pub use rowan::{TextRange, TextSize};

/// Syntactic kind of a tree element (a token or a node)
///
/// The `SyntaxKind` is shared by the lexer and the parser. It doubles as the runtime type tag of
/// PSI elements: every PSI variant is selected by the kind of its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ----------------------------------------
    // Tokens
    // ----------------------------------------
    Ws,
    /// `;` until the end of the line
    Comment,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// String token, including the enclosures
    Str,
    /// Number token
    Num,
    /// `true`
    True,
    /// `false`
    False,
    /// `nil`
    Nil,
    Ident,
    // ----------------------------------------
    // Compositors (parser only, not used by lexer)
    // ----------------------------------------
    /// Literal node
    Literal,
    /// Name reference
    Path,
    /// Name of a declaration (`proc` or `let`)
    Name,
    /// A single procedure parameter
    Param,
    /// Procedure parameter list
    Params,
    /// Sequence of forms: procedure body or `do` body
    Body,
    /// `(proc name (params) body..)`
    DefProc,
    /// `(let name form)`
    Let,
    /// `(do body..)`
    Do,
    /// `(callee args..)`
    Call,
    /// Tokens that could not be parsed into a form
    Error,
    // ----------------------------------------
    // composite node
    /// Beginning of text
    ROOT,
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Ws | SyntaxKind::Comment)
    }

    /// Nodes that can appear where a form is expected
    #[inline]
    pub fn is_form(self) -> bool {
        matches!(
            self,
            SyntaxKind::Literal
                | SyntaxKind::Path
                | SyntaxKind::DefProc
                | SyntaxKind::Let
                | SyntaxKind::Do
                | SyntaxKind::Call
        )
    }

    #[inline]
    pub fn is_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::Num
                | SyntaxKind::Str
                | SyntaxKind::True
                | SyntaxKind::False
                | SyntaxKind::Nil
        )
    }
}
