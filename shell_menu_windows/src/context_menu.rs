//! The shell context menu of a selection, ready to be merged into a window's menus.

use std::path::Path;
use std::rc::Rc;

use rwh_06::{HasWindowHandle, RawWindowHandle};
use shell_menu_core::{
    BridgeAttributes, Error, MenuBridge, MessageOutcome, Ordinal, Result, Verb, WindowMessage,
};
#[cfg(feature = "popup")]
use shell_menu_core::PhysicalPosition;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Shell::IContextMenu;

use crate::folder::ParentFolder;
use crate::handler::ShellMenuHandler;
use crate::item::ShellItem;
use crate::menu::Win32Menu;
use crate::relay::{RelayAttributes, RelayWindow, ShellBridge};

/// Resolve the Win32 handle of a window.
pub fn hwnd_for_window(window: &impl HasWindowHandle) -> Result<HWND> {
    let handle = window
        .window_handle()
        .map_err(|_| Error::WindowHandle("unavailable"))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut _)),
        _ => Err(Error::WindowHandle("invalid window handle type, expected Win32")),
    }
}

/// The shell context menu of a set of items sharing one parent folder.
///
/// Must be created and used on the thread that owns `owner`, with COM initialized as
/// single-threaded apartment.
#[derive(Debug)]
pub struct ShellContextMenu {
    relay: RelayWindow,
    bridge: Rc<ShellBridge>,
}

impl ShellContextMenu {
    pub fn new(
        items: impl IntoIterator<Item = ShellItem>,
        owner: HWND,
        attributes: BridgeAttributes,
    ) -> Result<Self> {
        Self::with_relay_attributes(items, owner, attributes, &RelayAttributes::default())
    }

    pub fn with_relay_attributes(
        items: impl IntoIterator<Item = ShellItem>,
        owner: HWND,
        attributes: BridgeAttributes,
        relay: &RelayAttributes,
    ) -> Result<Self> {
        let bridge = Rc::new(MenuBridge::for_selection(
            items,
            &ParentFolder::new(owner),
            attributes,
        )?);
        let relay = RelayWindow::new(Rc::downgrade(&bridge), relay)?;
        Ok(Self { relay, bridge })
    }

    /// The context menu of a single item, with default attributes.
    pub fn for_item(item: ShellItem, owner: HWND) -> Result<Self> {
        Self::new([item], owner, BridgeAttributes::default())
    }

    /// Resolve `paths` and build their context menu with default attributes.
    pub fn for_paths<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
        owner: HWND,
    ) -> Result<Self> {
        let items = paths
            .into_iter()
            .map(ShellItem::from_path)
            .collect::<Result<Vec<_>>>()?;
        Self::new(items, owner, BridgeAttributes::default())
    }

    pub fn bridge(&self) -> &MenuBridge<ShellMenuHandler> {
        &self.bridge
    }

    /// The underlying `IContextMenu`.
    pub fn context_menu(&self) -> &IContextMenu {
        self.bridge.handler().context_menu()
    }

    /// The hidden window that receives the shell's menu messages.
    pub fn relay_hwnd(&self) -> HWND {
        self.relay.hwnd()
    }

    /// Strip stale shell entries from `menu`, then let the shell insert its commands at the top.
    pub fn populate(&self, menu: &mut Win32Menu) -> Result<u32> {
        self.bridge.populate(menu)
    }

    pub fn invoke_verb(&self, verb: Verb) -> Result<()> {
        self.bridge.invoke_verb(verb)
    }

    pub fn invoke_copy(&self) -> Result<()> {
        self.bridge.invoke_copy()
    }

    pub fn invoke_cut(&self) -> Result<()> {
        self.bridge.invoke_cut()
    }

    pub fn invoke_paste(&self) -> Result<()> {
        self.bridge.invoke_paste()
    }

    pub fn invoke_rename(&self) -> Result<()> {
        self.bridge.invoke_rename()
    }

    /// Delete the items. Cancelling the confirmation is not an error.
    pub fn invoke_delete(&self) -> Result<()> {
        self.bridge.invoke_delete()
    }

    pub fn invoke_command(&self, ordinal: Ordinal) -> Result<()> {
        self.bridge.invoke_command(ordinal)
    }

    pub fn command_verb(&self, ordinal: Ordinal) -> Result<Option<String>> {
        self.bridge.command_verb(ordinal)
    }

    pub fn command_help_text(&self, ordinal: Ordinal) -> Result<Option<String>> {
        self.bridge.command_help_text(ordinal)
    }

    /// Show the menu at `position`, relative to the client area of `anchor`, and run the
    /// chosen command.
    ///
    /// Blocks until the menu is dismissed.
    #[cfg(feature = "popup")]
    pub fn show_popup(&self, anchor: HWND, position: PhysicalPosition<i32>) -> Result<Option<Ordinal>> {
        self.bridge.show_popup(&self.relay, &anchor, position)
    }

    /// Offer a message received by the host's window procedure.
    ///
    /// Returns the value the window procedure must return, or `None` if the host should carry
    /// on with its own handling.
    pub fn handle_menu_message(
        &self,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<LRESULT> {
        match self
            .bridge
            .handle_menu_message(&WindowMessage::new(msg, wparam.0, lparam.0))
        {
            MessageOutcome::Handled { result } => Some(LRESULT(result)),
            MessageOutcome::NotHandled => None,
        }
    }
}
