//! Visitor over PSI variants

use crate::psi::{Block, Call, DefProc, Do, File, Let, Literal, Path, Psi, PsiElement};

/// Double-dispatch target of [`PsiElement::accept`]
///
/// Every typed method falls back to [`visit_element`](Self::visit_element).
pub trait PsiVisitor {
    fn visit_element(&mut self, element: &Psi);

    fn visit_file(&mut self, file: &File) {
        self.visit_element(&file.to_psi());
    }

    fn visit_proc(&mut self, proc: &DefProc) {
        self.visit_element(&proc.to_psi());
    }

    fn visit_let(&mut self, let_: &Let) {
        self.visit_element(&let_.to_psi());
    }

    fn visit_do(&mut self, do_: &Do) {
        self.visit_element(&do_.to_psi());
    }

    fn visit_call(&mut self, call: &Call) {
        self.visit_element(&call.to_psi());
    }

    fn visit_path(&mut self, path: &Path) {
        self.visit_element(&path.to_psi());
    }

    fn visit_literal(&mut self, lit: &Literal) {
        self.visit_element(&lit.to_psi());
    }

    fn visit_block(&mut self, block: &Block) {
        self.visit_element(&block.to_psi());
    }
}

/// Visits `element` and then its descendants in preorder
pub fn walk(element: &dyn PsiElement, visitor: &mut dyn PsiVisitor) {
    element.accept(visitor);

    let mut child = element.first_child();
    while let Some(c) = child {
        self::walk(&*c, visitor);
        child = c.next_sibling();
    }
}
