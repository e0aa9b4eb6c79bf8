//! Syntax tree (source code → tokens → CST)

pub mod cst;
pub mod syn_diag;

#[doc(inline)]
pub use cst::{parse_str, Lang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
