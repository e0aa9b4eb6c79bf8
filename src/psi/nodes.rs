//! PSI variants, one per node kind

use std::ops;

use crate::{
    psi::{
        mutate::{self, Container},
        reference::PsiReference,
        PsiElement, PsiElementExt, PsiVisitor, RawElement, Result,
    },
    resolve::{ResolveState, ScopeProcessor},
    syntax::{SyntaxKind, SyntaxToken},
};

/// Typed element selected by the kind of its node
pub trait PsiNode: PsiElement + Sized {
    const KIND: SyntaxKind;

    fn can_cast(kind: SyntaxKind) -> bool {
        kind == Self::KIND
    }

    fn cast(psi: Psi) -> Option<Self>;
}

macro_rules! def_psi {
    (
        $(
            $( #[$meta:meta] )*
            $ty:ident: $kind:ident ;
        )*
    ) => {
        $(
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            $( #[$meta] )*
            pub struct $ty {
                pub(crate) raw: RawElement,
            }

            impl PsiNode for $ty {
                const KIND: SyntaxKind = SyntaxKind::$kind;

                fn cast(psi: Psi) -> Option<Self> {
                    match psi {
                        Psi::$ty(x) => Some(x),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Psi {
                fn from(x: $ty) -> Self {
                    Self::$ty(x)
                }
            }
        )*

        /// Element of any variant
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Psi {
            $( $ty($ty), )*
        }

        impl Psi {
            /// Selects the variant by the kind of the node
            pub fn from_raw(raw: RawElement) -> Self {
                match raw.syntax().kind() {
                    $( SyntaxKind::$kind => Self::$ty($ty { raw }), )*
                    // tokens are never wrapped; treat a stray one as an error node
                    _ => Self::ErrorElement(ErrorElement { raw }),
                }
            }
        }

        impl ops::Deref for Psi {
            type Target = dyn PsiElement;

            fn deref(&self) -> &Self::Target {
                match self {
                    $( Self::$ty(x) => x, )*
                }
            }
        }
    };
}

/// Implements the required methods of [`PsiElement`]
macro_rules! base_methods {
    ($ty:ident) => {
        fn raw(&self) -> &RawElement {
            &self.raw
        }

        fn type_name(&self) -> &'static str {
            stringify!($ty)
        }
    };
}

pub(crate) use base_methods;

def_psi! {
    /// Root of a file tree
    File: ROOT;
    /// `(proc name (params) body..)`
    DefProc: DefProc;
    /// `(let name form)`
    Let: Let;
    /// `(do body..)`
    Do: Do;
    /// `(callee args..)`
    Call: Call;
    /// Name reference
    Path: Path;
    Literal: Literal;
    /// Name of a `proc` or `let`
    Name: Name;
    Params: Params;
    Param: Param;
    /// Sequence of forms
    Block: Body;
    /// Unparsable tokens
    ErrorElement: Error;
}

impl Psi {
    pub fn cast<N: PsiNode>(self) -> Option<N> {
        N::cast(self)
    }
}

/// Identifier token of a single-token node
fn ident(raw: &RawElement) -> Option<SyntaxToken> {
    raw.syntax()
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|tk| tk.kind() == SyntaxKind::Ident)
}

impl Path {
    pub fn ident(&self) -> Option<SyntaxToken> {
        self::ident(&self.raw)
    }
}

impl PsiElement for Path {
    base_methods!(Path);

    fn name(&self) -> Option<String> {
        self.ident().map(|tk| tk.text().to_string())
    }

    fn reference(&self) -> Option<PsiReference> {
        let ident = self.ident()?;
        let range = ident.text_range() - self.text_range().start();
        Some(PsiReference::new(self.to_psi(), range))
    }

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_path(self);
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.raw
            .syntax()
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|tk| tk.kind().is_literal_token())
    }
}

impl PsiElement for Literal {
    base_methods!(Literal);

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_literal(self);
    }
}

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        self::ident(&self.raw)
    }
}

impl PsiElement for Name {
    base_methods!(Name);
}

impl Params {
    pub fn params(&self) -> Vec<Param> {
        self.find_children_by_kind()
    }
}

impl PsiElement for Params {
    base_methods!(Params);
}

impl PsiElement for ErrorElement {
    base_methods!(ErrorElement);
}

impl Call {
    pub fn callee(&self) -> Option<Path> {
        self.find_child_by_kind()
    }

    /// Forms after the callee
    pub fn args(&self) -> Vec<Psi> {
        self.raw
            .children()
            .skip(1)
            .filter(|c| c.kind().is_form())
            .collect()
    }
}

impl PsiElement for Call {
    base_methods!(Call);

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_call(self);
    }

    fn check_delete(&self) -> Result<()> {
        mutate::check_delete(self)
    }

    fn delete(&self) -> Result<()> {
        mutate::delete(self)
    }

    fn replace(&self, new_element: &dyn PsiElement) -> Result<Psi> {
        mutate::replace(self, new_element)
    }
}

impl Do {
    pub fn body(&self) -> Option<Block> {
        self.find_child_by_kind()
    }
}

impl PsiElement for Do {
    base_methods!(Do);

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_do(self);
    }

    fn check_delete(&self) -> Result<()> {
        mutate::check_delete(self)
    }

    fn delete(&self) -> Result<()> {
        mutate::delete(self)
    }

    fn replace(&self, new_element: &dyn PsiElement) -> Result<Psi> {
        mutate::replace(self, new_element)
    }
}

impl Block {
    pub fn forms(&self) -> Vec<Psi> {
        self.raw.children().filter(|c| c.kind().is_form()).collect()
    }
}

/// Offers the declarations of the forms preceding `last_parent` (nearest first), then every
/// procedure from `last_parent` on, so that procedures are visible in their whole sequence
pub(super) fn process_forms(
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
    last_parent: &Psi,
    place: &Psi,
) -> bool {
    let mut child = last_parent.prev_sibling();
    while let Some(c) = child {
        if !c.process_declarations(processor, state, None, place) {
            return false;
        }
        child = c.prev_sibling();
    }

    let mut child = Some(last_parent.clone());
    while let Some(c) = child {
        if c.kind() == SyntaxKind::DefProc && !processor.execute(&c, state) {
            return false;
        }
        child = c.next_sibling();
    }

    true
}

impl Container for Block {
    const SEPARATOR: &'static str = " ";
}

impl PsiElement for Block {
    base_methods!(Block);

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_block(self);
    }

    /// Same as the file: preceding forms, then the procedures from `last_parent` on
    fn process_declarations(
        &self,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
        last_parent: Option<&Psi>,
        place: &Psi,
    ) -> bool {
        match last_parent {
            Some(lp) => self::process_forms(processor, state, lp, place),
            // a block scanned from outside leaks nothing
            None => true,
        }
    }

    fn check_add(&self, element: &dyn PsiElement) -> Result<()> {
        mutate::check_add(self, element)
    }

    fn add(&self, element: &dyn PsiElement) -> Result<Psi> {
        mutate::add(self, element)
    }

    fn add_before(&self, element: &dyn PsiElement, anchor: Option<&dyn PsiElement>) -> Result<Psi> {
        mutate::add_before(self, element, anchor)
    }

    fn add_after(&self, element: &dyn PsiElement, anchor: Option<&dyn PsiElement>) -> Result<Psi> {
        mutate::add_after(self, element, anchor)
    }

    fn add_range(&self, first: &dyn PsiElement, last: &dyn PsiElement) -> Result<Psi> {
        mutate::add_range_before(self, first, last, None)
    }

    fn add_range_before(
        &self,
        first: &dyn PsiElement,
        last: &dyn PsiElement,
        anchor: Option<&dyn PsiElement>,
    ) -> Result<Psi> {
        mutate::add_range_before(self, first, last, anchor)
    }

    fn add_range_after(
        &self,
        first: &dyn PsiElement,
        last: &dyn PsiElement,
        anchor: Option<&dyn PsiElement>,
    ) -> Result<Psi> {
        mutate::add_range_after(self, first, last, anchor)
    }

    fn delete_child_range(&self, first: &dyn PsiElement, last: &dyn PsiElement) -> Result<()> {
        mutate::delete_child_range(self, first, last)
    }
}
