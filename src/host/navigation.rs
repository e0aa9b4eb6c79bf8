//! Navigation requests from elements to an editor

use std::rc::{Rc, Weak};

use base::vfs::VirtualFileId;
use camino::Utf8PathBuf;
use rowan::TextSize;

use crate::{host::PsiManager, psi::PsiElement};

/// Where a navigation request points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub path: Utf8PathBuf,
    pub vfile: VirtualFileId,
    pub offset: TextSize,
}

/// Sink of navigation requests, e.g., an editor
pub trait Navigator {
    fn navigate(&mut self, target: &NavigationTarget, request_focus: bool);
}

/// Default navigator that only logs requests
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, target: &NavigationTarget, request_focus: bool) {
        log::info!(
            "navigate to {}@{:?} (focus: {})",
            target.path,
            target.offset,
            request_focus
        );
    }
}

/// Navigatable location of an element in a physical file
#[derive(Debug, Clone)]
pub struct NavigationDescriptor {
    manager: Weak<PsiManager>,
    target: NavigationTarget,
}

impl NavigationDescriptor {
    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }

    /// Forwards the request to the manager's [`Navigator`]
    pub fn navigate(&self, request_focus: bool) {
        if let Some(manager) = self.manager.upgrade() {
            manager.navigate(&self.target, request_focus);
        }
    }

    /// The target file still exists
    pub fn can_navigate_to_source(&self) -> bool {
        self.manager
            .upgrade()
            .map_or(false, |m| m.vfs().exists(self.target.vfile))
    }

    /// Location in LSP terms. Relative paths are resolved against the project directory.
    #[cfg(feature = "lsp-types")]
    pub fn to_lsp_location(&self) -> Option<lsp_types::Location> {
        use base::{ln::LineTable, span::Offset};

        let manager = self.manager.upgrade()?;
        let ln_tbl = {
            let vfs = manager.vfs();
            let ln_tbl = LineTable::new(&vfs.file(self.target.vfile)?.text);
            ln_tbl
        };

        let pos = ln_tbl.line_column(Offset::from(self.target.offset));
        let pos = crate::util::diag::diag_lsp::ln_col_to_lsp_position(pos);

        let path = manager.project().base_dir().join(&self.target.path);
        let uri = lsp_types::Url::from_file_path(path.as_std_path()).ok()?;

        Some(lsp_types::Location {
            uri,
            range: lsp_types::Range {
                start: pos,
                end: pos,
            },
        })
    }
}

/// Resolves elements to navigation descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct EditSource;

impl EditSource {
    /// Descriptor of the element's navigation element, if it lives in a physical file
    pub fn descriptor(element: &dyn PsiElement) -> Option<NavigationDescriptor> {
        let nav = element.navigation_element();
        let file = nav.containing_file().ok()?;
        let vfile = file.virtual_file()?;
        let manager: Rc<PsiManager> = file.manager().ok()?;

        let path = manager.vfs().path(vfile)?.to_path_buf();
        let target = NavigationTarget {
            path,
            vfile,
            offset: nav.text_offset(),
        };

        Some(NavigationDescriptor {
            manager: Rc::downgrade(&manager),
            target,
        })
    }
}
