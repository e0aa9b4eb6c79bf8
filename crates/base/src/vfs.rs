/*!
Virtual file system: in-memory file contents addressed by interned paths
*/

use std::hash::BuildHasherDefault;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use rustc_hash::FxHasher;
use typed_index_collections::TiVec;

/// Interned path of a virtual file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualFileId {
    raw: u32,
}

impl From<usize> for VirtualFileId {
    fn from(x: usize) -> Self {
        assert!(x < u32::MAX as usize);
        Self { raw: x as u32 }
    }
}

impl From<VirtualFileId> for usize {
    fn from(id: VirtualFileId) -> usize {
        id.raw as usize
    }
}

/// Contents of a virtual file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub text: String,
    pub writable: bool,
    /// Set when the file was deleted. Ids are never reused.
    pub deleted: bool,
}

/// Insert-only map of `Utf8PathBuf` and [`VirtualFile`]
#[derive(Debug, Default)]
pub struct Vfs {
    paths: IndexSet<Utf8PathBuf, BuildHasherDefault<FxHasher>>,
    files: TiVec<VirtualFileId, VirtualFile>,
}

impl Vfs {
    /// Get the id corresponding to `path`.
    ///
    /// If `path` does not exists in `self`, returns [`None`].
    pub fn get(&self, path: &Utf8Path) -> Option<VirtualFileId> {
        self.paths.get_index_of(path).map(VirtualFileId::from)
    }

    /// Creates or overwrites the file at `path`
    pub fn set(&mut self, path: Utf8PathBuf, text: String, writable: bool) -> VirtualFileId {
        let (raw, added) = self.paths.insert_full(path);
        let file = VirtualFile {
            text,
            writable,
            deleted: false,
        };

        if added {
            self.files.push(file);
        } else {
            self.files[VirtualFileId::from(raw)] = file;
        }

        VirtualFileId::from(raw)
    }

    pub fn set_text(&mut self, id: VirtualFileId, text: String) {
        if let Some(file) = self.files.get_mut(id) {
            file.text = text;
        }
    }

    pub fn delete(&mut self, id: VirtualFileId) {
        if let Some(file) = self.files.get_mut(id) {
            file.deleted = true;
        }
    }

    /// Returns the file if it exists and is not deleted
    pub fn file(&self, id: VirtualFileId) -> Option<&VirtualFile> {
        self.files.get(id).filter(|f| !f.deleted)
    }

    pub fn exists(&self, id: VirtualFileId) -> bool {
        self.file(id).is_some()
    }

    pub fn path(&self, id: VirtualFileId) -> Option<&Utf8Path> {
        self.paths.get_index(usize::from(id)).map(|p| p.as_path())
    }
}
