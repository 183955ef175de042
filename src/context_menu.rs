use std::path::Path;

use dpi::PhysicalPosition;
use rwh_06::HasWindowHandle;
use shell_menu_core::{BridgeAttributes, Ordinal, Result};
use shell_menu_windows::{hwnd_for_window, ShellContextMenu, ShellItem};
use tracing::debug;

/// Manager for showing the shell context menu of files on windows.
///
/// # Example
///
/// ```ignore
/// use shell_menu::ShellMenuManager;
///
/// let menu_manager = ShellMenuManager::new();
///
/// if let Some(ordinal) = menu_manager.show(&window, ["C:\\Windows\\notepad.exe"], position)? {
///     println!("Ran shell command {:?}", ordinal);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShellMenuManager {
    attributes: BridgeAttributes,
}

impl ShellMenuManager {
    /// Create a new shell menu manager with default bridge attributes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(attributes: BridgeAttributes) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &BridgeAttributes {
        &self.attributes
    }

    /// Show the shell context menu of `paths` at the given position relative to a window.
    ///
    /// The position is in physical pixels relative to the window's content area (top-left origin).
    /// All paths must live in the same folder. Returns the ordinal of the command that was run,
    /// or `None` if the menu was dismissed.
    pub fn show<P: AsRef<Path>>(
        &self,
        window: &impl HasWindowHandle,
        paths: impl IntoIterator<Item = P>,
        position: PhysicalPosition<i32>,
    ) -> Result<Option<Ordinal>> {
        let hwnd = hwnd_for_window(window)?;
        let items = paths
            .into_iter()
            .map(ShellItem::from_path)
            .collect::<Result<Vec<_>>>()?;
        debug!(items = items.len(), ?position, "Showing shell context menu");

        let menu = ShellContextMenu::new(items, hwnd, self.attributes.clone())?;
        menu.show_popup(hwnd, position)
    }
}
