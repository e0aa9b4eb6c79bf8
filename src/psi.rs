/*!
Program structure interface: typed behavior overlaid on CST nodes

Every node of a parsed file is exposed as a [`Psi`] element. [`PsiElement`] supplies a default for
every operation a node supports, and each variant overrides only what differs:

* Tree navigation, text, validity, host queries (`manager`, `project`, `containing_file`) walk the
  parent chain up to the [`File`] root, which answers them from the host.
* Mutation is rejected with [`PsiError::UnsupportedOperation`] unless the variant implements it.
* References and declarations drive name resolution (see [`crate::resolve`]).

# Tree storage

Elements don't own the tree. A [`RawElement`] is a [`rowan`] red node plus a weak handle to the
file that owns it. Parents are found through the red tree, never stored.
*/

mod decl;
mod element;
mod factory;
mod file;
mod mutate;
mod nodes;
mod raw;

pub mod reference;
pub mod visit;

use thiserror::Error;

use crate::syntax::SyntaxKind;

pub use self::{
    decl::ItemPresentation,
    element::{PsiElement, PsiElementExt},
    factory::ElementFactory,
    nodes::{
        Block, Call, DefProc, Do, ErrorElement, File, Let, Literal, Name, Param, Params, Path, Psi,
        PsiNode,
    },
    raw::{FileCtx, RawElement},
    reference::PsiReference,
    visit::PsiVisitor,
};

/// Errors of PSI operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PsiError {
    /// A mutation attempted on a variant that doesn't support it
    #[error("`{op}` is not supported by {type_name}")]
    UnsupportedOperation {
        type_name: &'static str,
        op: &'static str,
    },
    /// A detached element was asked for its file, manager or project
    #[error("invalid element access: {kind:?} `{text}` is not attached to a live file")]
    InvalidElementAccess { kind: SyntaxKind, text: String },
    /// A supported operation that can't be applied to the given arguments
    #[error("incorrect operation: {0}")]
    IncorrectOperation(String),
}

pub type Result<T, E = PsiError> = std::result::Result<T, E>;

impl PsiError {
    pub(crate) fn unsupported(type_name: &'static str, op: &'static str) -> Self {
        log::debug!("unsupported `{op}` on {type_name}");
        Self::UnsupportedOperation { type_name, op }
    }

    pub(crate) fn invalid_access(kind: SyntaxKind, text: &str) -> Self {
        const MAX_LEN: usize = 40;

        let text = match text.char_indices().nth(MAX_LEN) {
            Some((i, _)) => format!("{}..", &text[..i]),
            None => text.to_string(),
        };

        Self::InvalidElementAccess { kind, text }
    }

    pub(crate) fn incorrect(msg: impl Into<String>) -> Self {
        Self::IncorrectOperation(msg.into())
    }
}
