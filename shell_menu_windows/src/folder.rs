use shell_menu_core::{ParentContainer, Result, Selection};
use tracing::trace;
use windows::Win32::{
    Foundation::HWND,
    UI::Shell::{Common::ITEMIDLIST, IContextMenu, IShellFolder, SHBindToParent},
};

use crate::handler::ShellMenuHandler;
use crate::item::ShellItem;
use crate::util::native;

/// The folder that holds a selection, bound on demand through the first item's absolute ID list.
#[derive(Debug, Clone, Copy)]
pub struct ParentFolder {
    owner: HWND,
}

impl ParentFolder {
    /// `owner` parents UI the folder or its context-menu object shows.
    pub fn new(owner: HWND) -> Self {
        Self { owner }
    }
}

impl ParentContainer<ShellItem> for ParentFolder {
    type Handler = ShellMenuHandler;

    fn context_menu_for(&self, selection: &Selection<ShellItem>) -> Result<ShellMenuHandler> {
        let folder: IShellFolder = unsafe { SHBindToParent(selection.first().as_ptr(), None) }
            .map_err(native("SHBindToParent"))?;

        let children: Vec<*const ITEMIDLIST> = selection.iter().map(ShellItem::child_id).collect();
        trace!(children = children.len(), "Requesting context menu from parent folder");

        let context_menu: IContextMenu =
            unsafe { folder.GetUIObjectOf(self.owner, &children, None) }
                .map_err(native("IShellFolder::GetUIObjectOf"))?;

        Ok(ShellMenuHandler::new(context_menu, self.owner))
    }
}
