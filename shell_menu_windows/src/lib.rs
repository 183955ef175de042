#![cfg(target_os = "windows")]

//! Windows backend: the shell's `IContextMenu` family behind the bridge traits.

pub mod context_menu;
mod folder;
mod handler;
mod item;
mod menu;
mod relay;
mod util;

pub use context_menu::{hwnd_for_window, ShellContextMenu};
pub use folder::ParentFolder;
pub use handler::ShellMenuHandler;
pub use item::ShellItem;
pub use menu::Win32Menu;
pub use relay::RelayAttributes;
