/*!
Tree host: project, PSI manager and the services elements query

The [`PsiManager`] owns every file tree. Elements reach it through a weak handle stored in their
[`FileCtx`], so dropping the manager invalidates every element it handed out.
*/

mod file_status;
mod navigation;
mod scope;

use std::{
    cell::{Ref, RefCell},
    rc::{Rc, Weak},
};

use base::vfs::{Vfs, VirtualFileId};
use camino::{Utf8Path, Utf8PathBuf};
use derivative::Derivative;
use la_arena::{Arena, Idx};

use crate::{
    psi::{File, FileCtx, RawElement},
    syntax::{self, cst::ParseError, SyntaxNode},
};

pub use self::{
    file_status::{FileStatus, FileStatusManager},
    navigation::{EditSource, LogNavigator, NavigationDescriptor, NavigationTarget, Navigator},
    scope::{FileManager, GlobalSearchScope, SearchHelper, SearchScope},
};

/// A set of files and the services shared by them
#[derive(Debug)]
pub struct Project {
    name: String,
    base_dir: Utf8PathBuf,
    file_status_manager: FileStatusManager,
}

impl Project {
    pub fn new(name: impl Into<String>, base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            base_dir: base_dir.into(),
            file_status_manager: FileStatusManager::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    pub fn file_status_manager(&self) -> &FileStatusManager {
        &self.file_status_manager
    }
}

pub type FileId = Idx<FileData>;

/// A parsed file registered to the manager
#[derive(Debug)]
pub struct FileData {
    name: String,
    /// `None` for light files
    vfile: Option<VirtualFileId>,
    root: SyntaxNode,
    errs: Vec<ParseError>,
    /// Bumped on every re-parse
    stamp: u32,
    removed: bool,
}

impl FileData {
    fn is_light(&self) -> bool {
        self.vfile.is_none()
    }
}

/// Parses `text`. Trees of files that can be edited are mutable.
fn parse(text: &str, mutable: bool) -> (SyntaxNode, Vec<ParseError>) {
    let (root, errs) = syntax::parse_str(text);
    let root = if mutable {
        root.clone_for_update()
    } else {
        root
    };
    (root, errs)
}

/// Owner of file trees
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PsiManager {
    #[derivative(Debug = "ignore")]
    this: Weak<PsiManager>,
    project: Rc<Project>,
    vfs: RefCell<Vfs>,
    files: RefCell<Arena<FileData>>,
    #[derivative(Debug = "ignore")]
    navigator: RefCell<Box<dyn Navigator>>,
}

impl PsiManager {
    pub fn new(project: Project) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            project: Rc::new(project),
            vfs: RefCell::new(Vfs::default()),
            files: RefCell::new(Arena::default()),
            navigator: RefCell::new(Box::new(LogNavigator)),
        })
    }

    pub fn project(&self) -> Rc<Project> {
        Rc::clone(&self.project)
    }

    pub fn vfs(&self) -> Ref<'_, Vfs> {
        self.vfs.borrow()
    }

    /// Replaces the sink of navigation requests
    pub fn set_navigator(&self, navigator: Box<dyn Navigator>) {
        *self.navigator.borrow_mut() = navigator;
    }

    pub fn file_manager(&self) -> FileManager<'_> {
        FileManager::new(self)
    }

    pub fn search_helper(&self) -> SearchHelper<'_> {
        SearchHelper::new(self)
    }

    /// Adds a physical file backed by the virtual file at `path`. Adding a registered path
    /// replaces its text.
    pub fn add_file(
        &self,
        path: impl Into<Utf8PathBuf>,
        text: impl Into<String>,
        writable: bool,
    ) -> FileId {
        let path = path.into();
        let text = text.into();

        if let Some(id) = self.find_file_id(&path) {
            self.vfs.borrow_mut().set(path, text.clone(), writable);
            self.set_text(id, text);
            return id;
        }

        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        let (root, errs) = self::parse(&text, writable);
        let vfile = self.vfs.borrow_mut().set(path, text, writable);

        log::debug!("add file `{}` ({} parse errors)", name, errs.len());
        self.files.borrow_mut().alloc(FileData {
            name,
            vfile: Some(vfile),
            root,
            errs,
            stamp: 0,
            removed: false,
        })
    }

    /// Adds an in-memory file. Light files are writable and not physical.
    pub fn add_light_file(&self, name: impl Into<String>, text: impl Into<String>) -> FileId {
        let name = name.into();
        let (root, errs) = self::parse(&text.into(), true);

        log::debug!("add light file `{}`", name);
        self.files.borrow_mut().alloc(FileData {
            name,
            vfile: None,
            root,
            errs,
            stamp: 0,
            removed: false,
        })
    }

    /// Re-parses the file. Elements of the old tree become invalid.
    pub fn set_text(&self, id: FileId, text: impl Into<String>) {
        let text = text.into();

        let vfile = match self.with_data(id, |data| (data.vfile, data.removed)) {
            Some((vfile, false)) => vfile,
            _ => return,
        };

        let mutable = match vfile {
            Some(vfile) => {
                let mut vfs = self.vfs.borrow_mut();
                vfs.set_text(vfile, text.clone());
                vfs.file(vfile).map_or(false, |f| f.writable)
            }
            None => true,
        };

        let (root, errs) = self::parse(&text, mutable);
        let mut files = self.files.borrow_mut();
        let data = &mut files[id];
        data.root = root;
        data.errs = errs;
        data.stamp += 1;
        log::debug!("re-parsed `{}` (stamp {})", data.name, data.stamp);
    }

    /// Writes the text of an edited tree back to its virtual file and refreshes the parse
    /// errors. The tree stays current.
    pub(crate) fn commit_tree(&self, id: FileId) {
        let data = self.with_live_data(id, |data| (data.root.text().to_string(), data.vfile));
        let (text, vfile) = match data {
            Some(x) => x,
            None => return,
        };

        let (_, errs) = syntax::parse_str(&text);
        if let Some(vfile) = vfile {
            self.vfs.borrow_mut().set_text(vfile, text);
        }

        let mut files = self.files.borrow_mut();
        let data = &mut files[id];
        data.errs = errs;
        log::trace!(
            "committed `{}` ({} parse errors)",
            data.name,
            data.errs.len()
        );
    }

    /// Unregisters the file and deletes its virtual file
    pub fn remove_file(&self, id: FileId) {
        let vfile = match self.with_data(id, |data| data.vfile) {
            Some(vfile) => vfile,
            None => return,
        };

        if let Some(vfile) = vfile {
            self.vfs.borrow_mut().delete(vfile);
        }

        let mut files = self.files.borrow_mut();
        let data = &mut files[id];
        data.removed = true;
        data.stamp += 1;
        log::debug!("removed `{}`", data.name);
    }

    /// Root element of the current tree of the file
    pub fn file(&self, id: FileId) -> Option<File> {
        let (root, stamp) = self.with_live_data(id, |data| (data.root.clone(), data.stamp))?;
        let ctx = FileCtx {
            manager: self.this.clone(),
            file: id,
            stamp,
        };

        Some(File {
            raw: RawElement::new(root, Some(ctx)),
        })
    }

    /// Every live file in registration order
    pub fn files(&self) -> Vec<File> {
        let ids = self
            .files
            .borrow()
            .iter()
            .filter(|(_, data)| !data.removed)
            .map(|(id, _)| id)
            .collect::<Vec<_>>();

        ids.into_iter().filter_map(|id| self.file(id)).collect()
    }

    pub fn find_file(&self, path: &Utf8Path) -> Option<File> {
        self.find_file_id(path).and_then(|id| self.file(id))
    }

    pub fn parse_errors(&self, id: FileId) -> Vec<ParseError> {
        self.with_live_data(id, |data| data.errs.clone())
            .unwrap_or_default()
    }

    /// Source text of the file's current tree
    pub fn text(&self, id: FileId) -> Option<String> {
        self.with_live_data(id, |data| data.root.text().to_string())
    }

    fn find_file_id(&self, path: &Utf8Path) -> Option<FileId> {
        let vfile = self.vfs.borrow().get(path)?;
        self.files
            .borrow()
            .iter()
            .find(|(_, data)| !data.removed && data.vfile == Some(vfile))
            .map(|(id, _)| id)
    }

    /// Runs `f` on the file data, or returns `None` for an id out of the arena's range. Ids are
    /// not tagged with their manager.
    fn with_data<T>(&self, id: FileId, f: impl FnOnce(&FileData) -> T) -> Option<T> {
        let files = self.files.borrow();
        let raw = u32::from(id.into_raw()) as usize;
        if raw < files.len() {
            Some(f(&files[id]))
        } else {
            None
        }
    }

    fn with_live_data<T>(&self, id: FileId, f: impl FnOnce(&FileData) -> T) -> Option<T> {
        self.with_data(id, |data| if data.removed { None } else { Some(f(data)) })
            .flatten()
    }

    // ----------------------------------------
    // Element queries
    // ----------------------------------------

    /// Whether a tree of `stamp` is the current tree of a live file
    pub(crate) fn is_current(&self, id: FileId, stamp: u32) -> bool {
        self.with_live_data(id, |data| data.stamp == stamp)
            .unwrap_or(false)
    }

    pub(crate) fn file_name(&self, id: FileId) -> Option<String> {
        self.with_live_data(id, |data| data.name.clone())
    }

    pub(crate) fn virtual_file(&self, id: FileId) -> Option<VirtualFileId> {
        self.with_live_data(id, |data| data.vfile).flatten()
    }

    pub(crate) fn is_file_writable(&self, id: FileId) -> bool {
        let vfile = match self.with_live_data(id, |data| (data.is_light(), data.vfile)) {
            Some((true, _)) => return true,
            Some((false, vfile)) => vfile,
            None => return false,
        };

        vfile.map_or(false, |vfile| {
            self.vfs.borrow().file(vfile).map_or(false, |f| f.writable)
        })
    }

    pub(crate) fn navigate(&self, target: &NavigationTarget, request_focus: bool) {
        self.navigator.borrow_mut().navigate(target, request_focus);
    }
}
