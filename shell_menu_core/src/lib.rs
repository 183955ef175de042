//! Platform-independent half of the shell context menu bridge.
//!
//! The bridge itself ([`MenuBridge`]) only talks to traits: a [`NativeMenu`] it populates, a
//! [`ContextMenuHandler`] that stands for the shell's context-menu object, a
//! [`ParentContainer`] that produces that object for a [`Selection`], and, with the `popup`
//! feature, a [`PopupHost`] that can track a transient menu. Platform crates implement them.

pub mod bridge;
pub mod command;
pub mod error;
pub mod handler;
pub mod menu;
pub mod message;
pub mod selection;
pub mod verb;

#[cfg(test)]
mod testing;

#[cfg(feature = "popup")]
pub use bridge::PopupHost;
pub use bridge::{BridgeAttributes, MenuBridge, LAST_MENU_ID};
pub use command::{CommandId, CommandOffset, Ordinal, QueryFlags, ShowState};
pub use error::{Error, Result};
pub use handler::{
    CommandStringKind, ContextMenuHandler, InvokeRequest, InvokeTarget, MessageCapability,
    QueryRequest,
};
pub use menu::{strip_shell_entries, MenuEntryInfo, MenuMarker, NativeMenu};
pub use message::{ForwardPolicy, MessageOutcome, WindowMessage};
pub use selection::{ParentContainer, Selection, SelectionItem};
pub use verb::Verb;

pub use dpi::PhysicalPosition;
