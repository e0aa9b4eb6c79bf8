//! The base element contract and its defaults

use std::{fmt, rc::Rc};

use crate::{
    host::{EditSource, FileStatus, GlobalSearchScope, Project, PsiManager, SearchScope},
    psi::{
        reference, File, ItemPresentation, Psi, PsiError, PsiNode, PsiReference, PsiVisitor,
        RawElement, Result,
    },
    resolve::{ResolveState, ScopeProcessor},
    syntax::{SyntaxKind, SyntaxNode},
};

use rowan::{TextRange, TextSize};

/// A node of the program structure
///
/// Implementors provide [`raw`](Self::raw) and [`type_name`](Self::type_name); every other
/// operation has a default that concrete variants override when they behave differently.
pub trait PsiElement: fmt::Debug {
    fn raw(&self) -> &RawElement;

    /// Name of the concrete variant, reported by [`PsiError::UnsupportedOperation`]
    fn type_name(&self) -> &'static str;

    fn syntax(&self) -> &SyntaxNode {
        self.raw().syntax()
    }

    /// Runtime type tag of the element
    fn kind(&self) -> SyntaxKind {
        self.syntax().kind()
    }

    fn to_psi(&self) -> Psi {
        Psi::from_raw(self.raw().clone())
    }

    fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }

    /// Offset the element is identified by, e.g., the start of a declaration's name
    fn text_offset(&self) -> TextSize {
        self.text_range().start()
    }

    // ----------------------------------------
    // Tree navigation
    // ----------------------------------------

    fn parent(&self) -> Option<Psi> {
        self.raw().parent()
    }

    fn first_child(&self) -> Option<Psi> {
        self.raw().first_child()
    }

    fn next_sibling(&self) -> Option<Psi> {
        self.raw().next_sibling()
    }

    fn prev_sibling(&self) -> Option<Psi> {
        self.raw().prev_sibling()
    }

    fn children(&self) -> Vec<Psi> {
        self.raw().children().collect()
    }

    /// Element the scope walk continues to
    fn context(&self) -> Option<Psi> {
        self.parent()
    }

    // ----------------------------------------
    // Mutation
    // ----------------------------------------

    /// Adds a copy of `element` as the last child. Returns the added element.
    fn add(&self, element: &dyn PsiElement) -> Result<Psi> {
        let _ = element;
        Err(PsiError::unsupported(self.type_name(), "add"))
    }

    /// Adds a copy of `element` before `anchor`, or as the last child if `anchor` is `None`
    fn add_before(&self, element: &dyn PsiElement, anchor: Option<&dyn PsiElement>) -> Result<Psi> {
        let _ = (element, anchor);
        Err(PsiError::unsupported(self.type_name(), "add_before"))
    }

    /// Adds a copy of `element` after `anchor`, or as the first child if `anchor` is `None`
    fn add_after(&self, element: &dyn PsiElement, anchor: Option<&dyn PsiElement>) -> Result<Psi> {
        let _ = (element, anchor);
        Err(PsiError::unsupported(self.type_name(), "add_after"))
    }

    /// Checks if `element` can be added to this element
    fn check_add(&self, element: &dyn PsiElement) -> Result<()> {
        let _ = element;
        Err(PsiError::unsupported(self.type_name(), "check_add"))
    }

    /// Adds copies of the siblings `first..=last` as the last children. Returns the first one.
    fn add_range(&self, first: &dyn PsiElement, last: &dyn PsiElement) -> Result<Psi> {
        let _ = (first, last);
        Err(PsiError::unsupported(self.type_name(), "add_range"))
    }

    fn add_range_before(
        &self,
        first: &dyn PsiElement,
        last: &dyn PsiElement,
        anchor: Option<&dyn PsiElement>,
    ) -> Result<Psi> {
        let _ = (first, last, anchor);
        Err(PsiError::unsupported(self.type_name(), "add_range_before"))
    }

    fn add_range_after(
        &self,
        first: &dyn PsiElement,
        last: &dyn PsiElement,
        anchor: Option<&dyn PsiElement>,
    ) -> Result<Psi> {
        let _ = (first, last, anchor);
        Err(PsiError::unsupported(self.type_name(), "add_range_after"))
    }

    /// Removes this element from the tree. It becomes invalid.
    fn delete(&self) -> Result<()> {
        Err(PsiError::unsupported(self.type_name(), "delete"))
    }

    fn check_delete(&self) -> Result<()> {
        Err(PsiError::unsupported(self.type_name(), "check_delete"))
    }

    /// Removes the children `first..=last`
    fn delete_child_range(&self, first: &dyn PsiElement, last: &dyn PsiElement) -> Result<()> {
        let _ = (first, last);
        Err(PsiError::unsupported(self.type_name(), "delete_child_range"))
    }

    /// Puts a copy of `new_element` in place of this element. Returns the inserted element.
    fn replace(&self, new_element: &dyn PsiElement) -> Result<Psi> {
        let _ = new_element;
        Err(PsiError::unsupported(self.type_name(), "replace"))
    }

    /// Duplicates the subtree as a detached element
    ///
    /// The copy shares the immutable green tree with the original, so it is cheap. It has no
    /// parent and no file: it is not valid, and host queries on it fail.
    fn copy(&self) -> Psi {
        let syn = self.syntax().clone_subtree().clone_for_update();
        Psi::from_raw(RawElement::detached(syn))
    }

    // ----------------------------------------
    // References and declarations
    // ----------------------------------------

    fn reference(&self) -> Option<PsiReference> {
        None
    }

    fn references(&self) -> Vec<PsiReference> {
        reference::references(&*self.to_psi())
    }

    /// Reference at `offset`, relative to the start of this element
    fn find_reference_at(&self, offset: TextSize) -> Option<PsiReference> {
        reference::find_reference_at(&*self.to_psi(), offset)
    }

    /// Feeds the declarations this element contributes to `processor`. Returns `false` to stop
    /// the scope walk.
    ///
    /// `last_parent` is the child the walk came up from, or `None` when the element is scanned as
    /// a sibling of the place.
    fn process_declarations(
        &self,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
        last_parent: Option<&Psi>,
        place: &Psi,
    ) -> bool {
        let _ = (processor, state, last_parent, place);
        true
    }

    fn name(&self) -> Option<String> {
        None
    }

    fn presentation(&self) -> Option<ItemPresentation> {
        None
    }

    // ----------------------------------------
    // Host
    // ----------------------------------------

    fn manager(&self) -> Result<Rc<PsiManager>> {
        match self.parent() {
            Some(parent) => parent.manager(),
            None => Err(PsiError::invalid_access(self.kind(), &self.text())),
        }
    }

    fn project(&self) -> Result<Rc<Project>> {
        Ok(self.manager()?.project())
    }

    fn containing_file(&self) -> Result<File> {
        match self.parent() {
            Some(parent) => parent.containing_file(),
            None => Err(PsiError::invalid_access(self.kind(), &self.text())),
        }
    }

    fn resolve_scope(&self) -> Result<GlobalSearchScope> {
        let manager = self.manager()?;
        let scope = manager.file_manager().resolve_scope(&*self.to_psi());
        scope
    }

    fn use_scope(&self) -> Result<SearchScope> {
        let manager = self.manager()?;
        let scope = manager.search_helper().use_scope(&*self.to_psi());
        scope
    }

    fn file_status(&self) -> FileStatus {
        if !self.is_physical() {
            return FileStatus::NotChanged;
        }

        let vfile = match self.containing_file() {
            Ok(file) => file.virtual_file(),
            Err(_) => None,
        };

        match (vfile, self.project()) {
            (Some(vfile), Ok(project)) => project.file_status_manager().status(vfile),
            _ => FileStatus::NotChanged,
        }
    }

    // ----------------------------------------
    // Validity
    // ----------------------------------------

    fn is_valid(&self) -> bool {
        self.parent().map_or(false, |p| p.is_valid())
    }

    fn is_writable(&self) -> bool {
        self.parent().map_or(false, |p| p.is_writable())
    }

    fn is_physical(&self) -> bool {
        self.parent().map_or(false, |p| p.is_physical())
    }

    // ----------------------------------------
    // Navigation
    // ----------------------------------------

    fn navigation_element(&self) -> Psi {
        self.to_psi()
    }

    fn original_element(&self) -> Psi {
        self.to_psi()
    }

    fn navigate(&self, request_focus: bool) {
        if let Some(descriptor) = EditSource::descriptor(&*self.to_psi()) {
            descriptor.navigate(request_focus);
        }
    }

    fn can_navigate(&self) -> bool {
        true
    }

    fn can_navigate_to_source(&self) -> bool {
        EditSource::descriptor(&*self.to_psi()).map_or(false, |d| d.can_navigate_to_source())
    }

    // ----------------------------------------
    // Text and visitors
    // ----------------------------------------

    /// Case-sensitive comparison of the element's text
    fn text_matches(&self, text: &str) -> bool {
        self.syntax().text() == text
    }

    fn text_matches_element(&self, element: &dyn PsiElement) -> bool {
        self.syntax().text() == element.syntax().text()
    }

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_element(&self.to_psi());
    }

    /// Feeds each child to the visitor, left to right
    fn accept_children(&self, visitor: &mut dyn PsiVisitor) {
        let mut child = self.first_child();
        while let Some(c) = child {
            c.accept(visitor);
            child = c.next_sibling();
        }
    }
}

/// Child lookup by runtime type tag
pub trait PsiElementExt: PsiElement {
    /// Children of variant `N` in sibling order
    fn find_children_by_kind<N: PsiNode>(&self) -> Vec<N> {
        self.raw().children().filter_map(N::cast).collect()
    }

    /// First child of variant `N` in sibling order
    fn find_child_by_kind<N: PsiNode>(&self) -> Option<N> {
        self.raw().children().find_map(N::cast)
    }

    /// First child of variant `N`. Panics if there's none: the tree is malformed.
    fn find_not_null_child_by_kind<N: PsiNode>(&self) -> N {
        match self.find_child_by_kind::<N>() {
            Some(child) => child,
            None => {
                log::error!("missing {:?} child in {}", N::KIND, self.type_name());
                panic!(
                    "missing {:?} child in {}: `{}`",
                    N::KIND,
                    self.type_name(),
                    self.text()
                )
            }
        }
    }
}

impl<T: PsiElement + ?Sized> PsiElementExt for T {}
