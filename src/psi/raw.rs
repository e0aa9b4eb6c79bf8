//! Position of an element in externally-owned tree storage

use std::{
    hash::{Hash, Hasher},
    rc::Weak,
};

use derivative::Derivative;

use crate::{
    host::{FileId, PsiManager},
    psi::Psi,
    syntax::SyntaxNode,
};

/// Handle from a tree back to the file that owns it
///
/// `stamp` identifies the tree generation: the host bumps it when the file is re-parsed, which
/// makes every element of the old tree invalid.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq, Eq)]
pub struct FileCtx {
    #[derivative(Debug = "ignore", PartialEq(compare_with = "Weak::ptr_eq"))]
    pub(crate) manager: Weak<PsiManager>,
    pub(crate) file: FileId,
    pub(crate) stamp: u32,
}

/// A syntax node and the file context it was reached from
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct RawElement {
    syn: SyntaxNode,
    #[derivative(Debug = "ignore")]
    ctx: Option<FileCtx>,
}

/// Identity of a syntax node across trees
///
/// Rowan compares nodes by green node and offset, so a detached copy equals its original until
/// the roots are compared too.
pub(crate) fn same_node(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    a == b && a.ancestors().last() == b.ancestors().last()
}

impl PartialEq for RawElement {
    fn eq(&self, other: &Self) -> bool {
        self.ctx == other.ctx && same_node(&self.syn, &other.syn)
    }
}

impl Eq for RawElement {}

impl Hash for RawElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.syn.hash(state)
    }
}

impl RawElement {
    pub fn new(syn: SyntaxNode, ctx: Option<FileCtx>) -> Self {
        Self { syn, ctx }
    }

    /// Element without a file, e.g., a fragment built by the element factory
    pub fn detached(syn: SyntaxNode) -> Self {
        Self { syn, ctx: None }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.syn
    }

    pub fn ctx(&self) -> Option<&FileCtx> {
        self.ctx.as_ref()
    }

    /// Is `self` inside the subtree of `root`, including `root` itself?
    pub(crate) fn is_within(&self, root: &RawElement) -> bool {
        let mut ancestors = self.syn.ancestors();
        self.ctx == root.ctx && ancestors.any(|node| same_node(&node, &root.syn))
    }

    /// Is `self` a child of `parent` in the same tree?
    pub(crate) fn is_child_of(&self, parent: &RawElement) -> bool {
        self.syn
            .parent()
            .map_or(false, |p| self.ctx == parent.ctx && same_node(&p, &parent.syn))
    }

    /// Wraps another node of the same tree
    pub(crate) fn wrap(&self, syn: SyntaxNode) -> Psi {
        Psi::from_raw(Self::new(syn, self.ctx.clone()))
    }

    pub fn parent(&self) -> Option<Psi> {
        self.syn.parent().map(|p| self.wrap(p))
    }

    pub fn first_child(&self) -> Option<Psi> {
        self.syn.first_child().map(|c| self.wrap(c))
    }

    pub fn next_sibling(&self) -> Option<Psi> {
        self.syn.next_sibling().map(|s| self.wrap(s))
    }

    pub fn prev_sibling(&self) -> Option<Psi> {
        self.syn.prev_sibling().map(|s| self.wrap(s))
    }

    /// Child nodes in sibling order. Tokens are not elements.
    pub fn children(&self) -> impl Iterator<Item = Psi> + '_ {
        self.syn.children().map(|c| self.wrap(c))
    }
}
