//! Native menu abstraction and the pass that strips stale shell entries from it.

use std::fmt;

use crate::command::{CommandId, CommandOffset};
use crate::error::Result;

/// One top-level entry of a native menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntryInfo<S> {
    /// Command identifier of the entry. Meaningless for most submenu entries.
    pub id: u32,
    /// Handle of the entry's submenu, if it opens one.
    pub submenu: Option<S>,
}

/// Private tag written into the user data of application-owned submenus.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct MenuMarker(usize);

impl MenuMarker {
    pub const DEFAULT: Self = Self(0xAB);

    pub const fn into_raw(self) -> usize {
        self.0
    }

    pub const fn from_raw(tag: usize) -> Self {
        Self(tag)
    }
}

impl Default for MenuMarker {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for MenuMarker {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "{:#x}", self.0)
    }
}

/// A native menu the shell can populate.
///
/// Positions are zero-based indices into the menu's top-level entries.
pub trait NativeMenu {
    /// Handle of a submenu.
    type Submenu: Copy + fmt::Debug;

    fn entry_count(&self) -> Result<usize>;

    fn entry(&self, position: usize) -> Result<MenuEntryInfo<Self::Submenu>>;

    /// Submenus the application itself added to this menu.
    fn application_submenus(&self) -> Vec<Self::Submenu>;

    fn submenu_tag(&self, submenu: Self::Submenu) -> Result<usize>;

    fn set_submenu_tag(&mut self, submenu: Self::Submenu, tag: usize) -> Result<()>;

    fn remove_entry(&mut self, position: usize) -> Result<()>;
}

/// Remove every shell-inserted top-level entry from `menu`, returning how many were removed.
///
/// Application submenus are tagged with `marker` first. A leaf entry counts as shell-origin
/// when its identifier is in the shell's range, a submenu entry when its tag is not `marker`.
/// An application leaf whose identifier is at or above `offset` is therefore removed too.
pub fn strip_shell_entries<M>(menu: &mut M, offset: CommandOffset, marker: MenuMarker) -> Result<usize>
where
    M: NativeMenu + ?Sized,
{
    for submenu in menu.application_submenus() {
        menu.set_submenu_tag(submenu, marker.into_raw())?;
    }

    let count = menu.entry_count()?;
    let mut shell_positions = Vec::new();
    for position in 0..count {
        let entry = menu.entry(position)?;
        let from_shell = match entry.submenu {
            None => offset.contains(CommandId::from_raw(entry.id)),
            Some(submenu) => menu.submenu_tag(submenu)? != marker.into_raw(),
        };
        if from_shell {
            shell_positions.push(position);
        }
    }

    // Back to front, so pending positions stay valid.
    for &position in shell_positions.iter().rev() {
        menu.remove_entry(position)?;
    }

    Ok(shell_positions.len())
}
