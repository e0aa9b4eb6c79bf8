//! File root: the element that answers host queries for its tree

use std::rc::Rc;

use base::vfs::VirtualFileId;

use crate::{
    host::{FileId, PsiManager},
    psi::{
        mutate::{self, Container},
        nodes::{self, base_methods},
        File, Psi, PsiElement, PsiError, PsiVisitor, RawElement, Result,
    },
    resolve::{ResolveState, ScopeProcessor},
};

impl File {
    /// Host handle of the file, if the tree is attached to one
    pub fn file_id(&self) -> Option<FileId> {
        self.raw.ctx().map(|ctx| ctx.file)
    }

    /// Backing virtual file. Light files have none.
    pub fn virtual_file(&self) -> Option<VirtualFileId> {
        let ctx = self.raw.ctx()?;
        ctx.manager.upgrade()?.virtual_file(ctx.file)
    }

    /// Top-level forms
    pub fn forms(&self) -> Vec<Psi> {
        self.raw.children().filter(|c| c.kind().is_form()).collect()
    }
}

impl Container for File {
    const SEPARATOR: &'static str = "\n";
}

impl PsiElement for File {
    base_methods!(File);

    fn parent(&self) -> Option<Psi> {
        None
    }

    fn context(&self) -> Option<Psi> {
        None
    }

    fn manager(&self) -> Result<Rc<PsiManager>> {
        self.raw
            .ctx()
            .and_then(|ctx| ctx.manager.upgrade())
            .ok_or_else(|| PsiError::invalid_access(self.kind(), &self.text()))
    }

    fn containing_file(&self) -> Result<File> {
        Ok(self.clone())
    }

    fn name(&self) -> Option<String> {
        let ctx = self.raw.ctx()?;
        ctx.manager.upgrade()?.file_name(ctx.file)
    }

    /// The tree is the current parse of a live file
    fn is_valid(&self) -> bool {
        match self.raw.ctx() {
            Some(ctx) => ctx
                .manager
                .upgrade()
                .map_or(false, |m| m.is_current(ctx.file, ctx.stamp)),
            None => false,
        }
    }

    fn is_writable(&self) -> bool {
        match self.raw.ctx() {
            Some(ctx) if self.is_valid() => ctx
                .manager
                .upgrade()
                .map_or(false, |m| m.is_file_writable(ctx.file)),
            _ => false,
        }
    }

    /// Backed by a virtual file
    fn is_physical(&self) -> bool {
        self.virtual_file().is_some()
    }

    /// Offers the forms preceding `last_parent` (nearest first), then every procedure from
    /// `last_parent` on. Procedures are visible in the whole file.
    fn process_declarations(
        &self,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
        last_parent: Option<&Psi>,
        place: &Psi,
    ) -> bool {
        match last_parent {
            Some(lp) => nodes::process_forms(processor, state, lp, place),
            None => true,
        }
    }

    fn accept(&self, visitor: &mut dyn PsiVisitor) {
        visitor.visit_file(self);
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
