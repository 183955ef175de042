//! Shell items as owned absolute ID lists.

use std::fmt;
use std::path::Path;
use std::ptr;

use shell_menu_core::{Result, SelectionItem};
use windows::Win32::UI::Shell::{Common::ITEMIDLIST, ILFindLastID, ILFree, SHParseDisplayName};
use windows::core::PCWSTR;

use crate::util::{encode_wide, native};

/// A file, folder or virtual shell object, addressed by an absolute PIDL it owns.
pub struct ShellItem {
    pidl: *mut ITEMIDLIST,
}

impl ShellItem {
    /// Resolve a file system path (or any other parsing name) to a shell item.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let name = encode_wide(path.as_ref());
        let mut pidl = ptr::null_mut();
        unsafe { SHParseDisplayName(PCWSTR(name.as_ptr()), None, &mut pidl, 0, None) }
            .map_err(native("SHParseDisplayName"))?;
        Ok(Self { pidl })
    }

    /// Take ownership of an absolute PIDL.
    ///
    /// # Safety
    /// `pidl` must be a valid absolute ID list allocated with the COM task allocator, and must
    /// not be freed by anyone else.
    pub unsafe fn from_raw(pidl: *mut ITEMIDLIST) -> Self {
        Self { pidl }
    }

    pub fn as_ptr(&self) -> *const ITEMIDLIST {
        self.pidl
    }

    /// The item's ID relative to its parent folder. Borrowed from the absolute list.
    pub(crate) fn child_id(&self) -> *const ITEMIDLIST {
        unsafe { ILFindLastID(self.pidl) }
    }
}

impl SelectionItem for ShellItem {
    /// Bytes of the absolute list up to, not including, the last ID.
    type ParentKey = Vec<u8>;

    fn parent_key(&self) -> Vec<u8> {
        let start = self.pidl as *const u8;
        let len = self.child_id() as usize - start as usize;
        unsafe { std::slice::from_raw_parts(start, len) }.to_vec()
    }
}

impl fmt::Debug for ShellItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellItem").field("pidl", &self.pidl).finish()
    }
}

impl Drop for ShellItem {
    fn drop(&mut self) {
        if !self.pidl.is_null() {
            unsafe { ILFree(Some(self.pidl as *const _)) };
        }
    }
}
