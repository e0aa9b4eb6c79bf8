use std::cell::RefCell;

use base::vfs::VirtualFileId;
use rustc_hash::FxHashMap;

/// Version-control status of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileStatus {
    #[default]
    NotChanged,
    Modified,
    Added,
    Deleted,
    Unknown,
    Ignored,
    MergedWithConflicts,
}

/// Status per virtual file. Files without an entry are [`FileStatus::NotChanged`].
#[derive(Debug, Default)]
pub struct FileStatusManager {
    map: RefCell<FxHashMap<VirtualFileId, FileStatus>>,
}

impl FileStatusManager {
    pub fn status(&self, vfile: VirtualFileId) -> FileStatus {
        self.map.borrow().get(&vfile).copied().unwrap_or_default()
    }

    pub fn set_status(&self, vfile: VirtualFileId, status: FileStatus) {
        log::trace!("status of {:?}: {:?}", vfile, status);
        self.map.borrow_mut().insert(vfile, status);
    }
}
