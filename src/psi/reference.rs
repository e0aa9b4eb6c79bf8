//! References from a name occurrence to its declaration

use rowan::{TextRange, TextSize};

use crate::{
    psi::{Psi, PsiElement},
    resolve::{self, ResolveResult},
};

/// A reference held by an element
///
/// `range` is relative to the start of the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsiReference {
    element: Psi,
    range: TextRange,
}

impl PsiReference {
    pub fn new(element: Psi, range: TextRange) -> Self {
        Self { element, range }
    }

    pub fn element(&self) -> &Psi {
        &self.element
    }

    pub fn range_in_element(&self) -> TextRange {
        self.range
    }

    /// Range in the file
    pub fn absolute_range(&self) -> TextRange {
        self.range + self.element.text_range().start()
    }

    /// The referenced name
    pub fn canonical_text(&self) -> String {
        let text = self.element.text();
        let (start, end) = (
            usize::from(self.range.start()),
            usize::from(self.range.end()),
        );
        text.get(start..end).unwrap_or_default().to_string()
    }

    /// Nearest visible declaration of the name
    pub fn resolve(&self) -> Option<Psi> {
        self.resolve_result().map(|r| r.element)
    }

    pub fn resolve_result(&self) -> Option<ResolveResult> {
        resolve::resolve(&self.element, &self.canonical_text())
    }

    /// Declarations visible from the reference, e.g., for completion
    pub fn variants(&self) -> Vec<Psi> {
        resolve::visible_declarations(&self.element)
    }

    pub fn is_reference_to(&self, element: &dyn PsiElement) -> bool {
        self.resolve()
            .map_or(false, |target| target.raw() == element.raw())
    }
}

/// The element's own reference followed by those of its direct children
pub fn references(element: &dyn PsiElement) -> Vec<PsiReference> {
    let mut refs = element.reference().into_iter().collect::<Vec<_>>();
    refs.extend(element.children().iter().filter_map(|c| c.reference()));
    refs
}

/// Reference of the innermost element at `offset` (relative to `element`) whose reference range
/// contains it. Range ends are inclusive, so a caret right after a name finds it.
pub fn find_reference_at(element: &dyn PsiElement, offset: TextSize) -> Option<PsiReference> {
    let range = element.text_range();
    let abs = range.start().checked_add(offset)?;
    if !range.contains_inclusive(abs) {
        return None;
    }

    let root = element.syntax();
    for tk in root.token_at_offset(abs) {
        // neighbors outside of the element
        if !range.contains_range(tk.text_range()) {
            continue;
        }
        let start = match tk.parent() {
            Some(x) => x,
            None => continue,
        };
        for node in start.ancestors() {
            let psi = element.raw().wrap(node.clone());
            if let Some(rf) = psi.reference() {
                if rf.absolute_range().contains_inclusive(abs) {
                    return Some(rf);
                }
            }
            if node == *root {
                break;
            }
        }
    }

    None
}
