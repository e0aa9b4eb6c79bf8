//! Search scopes and the services computing them

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    host::{FileId, PsiManager},
    psi::{visit, Psi, PsiElement, PsiError, PsiReference, PsiVisitor, Result},
    syntax::SyntaxKind,
};

/// A set of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSearchScope {
    files: FxHashSet<FileId>,
}

impl GlobalSearchScope {
    pub fn contains_file(&self, file: FileId) -> bool {
        self.files.contains(&file)
    }

    /// The element lives in one of the files
    pub fn contains(&self, element: &dyn PsiElement) -> bool {
        element
            .containing_file()
            .ok()
            .and_then(|f| f.file_id())
            .map_or(false, |id| self.contains_file(id))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Where an element can be used from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    Global(GlobalSearchScope),
    /// Subtrees of the elements
    Local(SmallVec<[Psi; 1]>),
}

impl SearchScope {
    pub fn contains(&self, element: &dyn PsiElement) -> bool {
        match self {
            Self::Global(scope) => scope.contains(element),
            Self::Local(roots) => roots.iter().any(|r| element.raw().is_within(r.raw())),
        }
    }
}

/// Computes resolve scopes
#[derive(Debug, Clone, Copy)]
pub struct FileManager<'a> {
    manager: &'a PsiManager,
}

impl<'a> FileManager<'a> {
    pub(crate) fn new(manager: &'a PsiManager) -> Self {
        Self { manager }
    }

    /// Files the element's references can resolve into: every live physical file for a physical
    /// element, otherwise its own file
    pub fn resolve_scope(&self, element: &dyn PsiElement) -> Result<GlobalSearchScope> {
        let file = element.containing_file()?;
        let id = file
            .file_id()
            .ok_or_else(|| PsiError::invalid_access(element.kind(), &element.text()))?;

        let files = if file.is_physical() {
            self.manager
                .files()
                .iter()
                .filter(|f| f.is_physical())
                .filter_map(|f| f.file_id())
                .collect()
        } else {
            [id].into_iter().collect()
        };

        Ok(GlobalSearchScope { files })
    }
}

/// Computes use scopes and finds usages
#[derive(Debug, Clone, Copy)]
pub struct SearchHelper<'a> {
    manager: &'a PsiManager,
}

impl<'a> SearchHelper<'a> {
    pub(crate) fn new(manager: &'a PsiManager) -> Self {
        Self { manager }
    }

    /// Parameters and `let`s inside a procedure are local to it
    pub fn use_scope(&self, element: &dyn PsiElement) -> Result<SearchScope> {
        if matches!(element.kind(), SyntaxKind::Param | SyntaxKind::Let) {
            let mut parent = element.parent();
            while let Some(p) = parent {
                if p.kind() == SyntaxKind::DefProc {
                    return Ok(SearchScope::Local(smallvec::smallvec![p]));
                }
                parent = p.parent();
            }
        }

        let scope = self.manager.file_manager().resolve_scope(element)?;
        Ok(SearchScope::Global(scope))
    }

    /// References resolving to `target` within its use scope
    pub fn find_references(&self, target: &dyn PsiElement) -> Result<Vec<PsiReference>> {
        let scope = self.use_scope(target)?;

        let roots: Vec<Psi> = match &scope {
            SearchScope::Global(global) => self
                .manager
                .files()
                .into_iter()
                .filter(|f| f.file_id().map_or(false, |id| global.contains_file(id)))
                .map(Psi::from)
                .collect(),
            SearchScope::Local(roots) => roots.to_vec(),
        };

        let mut collector = RefCollector {
            target: target.to_psi(),
            refs: vec![],
        };
        for root in &roots {
            visit::walk(&**root, &mut collector);
        }

        log::debug!(
            "{} reference(s) to {:?}",
            collector.refs.len(),
            target.name()
        );
        Ok(collector.refs)
    }
}

struct RefCollector {
    target: Psi,
    refs: Vec<PsiReference>,
}

impl PsiVisitor for RefCollector {
    fn visit_element(&mut self, element: &Psi) {
        if let Some(rf) = element.reference() {
            if rf.is_reference_to(&*self.target) {
                self.refs.push(rf);
            }
        }
    }
}
