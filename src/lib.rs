//! The Windows shell context menu, hosted in your own windows and menus.
//!
//! Platform-independent types come from `shell_menu_core`. On Windows the `IContextMenu`
//! backend is re-exported as well, and with the `popup` feature a [`ShellMenuManager`] shows
//! the menu for any window that implements `HasWindowHandle`.

pub use shell_menu_core::*;

#[cfg(target_os = "windows")]
pub use shell_menu_windows as windows;
#[cfg(target_os = "windows")]
pub use shell_menu_windows::{
    hwnd_for_window, ParentFolder, RelayAttributes, ShellContextMenu, ShellItem,
    ShellMenuHandler, Win32Menu,
};

#[cfg(all(feature = "popup", target_os = "windows"))]
mod context_menu;
#[cfg(all(feature = "popup", target_os = "windows"))]
pub use context_menu::ShellMenuManager;
