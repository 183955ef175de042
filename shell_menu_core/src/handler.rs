//! The externally owned context-menu object, seen through the capabilities a bridge uses.

use crate::command::{CommandId, CommandOffset, Ordinal, QueryFlags, ShowState};
use crate::error::Result;
use crate::menu::NativeMenu;
use crate::message::WindowMessage;
use crate::verb::Verb;

/// Optional message-handling capability of a context-menu object.
///
/// Each level widens the previous one: `Basic` can take menu messages, `Extended` can also
/// hand back a result value for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageCapability {
    None,
    Basic,
    Extended,
}

/// Arguments of one enumeration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRequest {
    /// Position at which the shell inserts its entries.
    pub index: u32,
    /// The first identifier the shell may assign.
    pub first: CommandOffset,
    /// The last identifier the shell may assign.
    pub last_command_id: u32,
    pub flags: QueryFlags,
}

/// What an invoke request names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeTarget {
    /// A verb, independent of any populated menu.
    Verb(Verb),
    /// A command from the last population pass. `command_id` is always `offset + ordinal`.
    Command { ordinal: Ordinal, command_id: CommandId },
}

/// A request to execute a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub target: InvokeTarget,
    pub show: ShowState,
}

/// Which string [`ContextMenuHandler::command_string`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStringKind {
    /// The language-independent verb of a command.
    Verb,
    /// The status-bar help text of a command.
    HelpText,
}

/// A context-menu object for one selection.
pub trait ContextMenuHandler {
    /// The menu type this object can enumerate into.
    type Menu: NativeMenu;

    /// The widest message-handling capability the object supports.
    fn capability(&self) -> MessageCapability;

    /// Insert the object's commands into `menu`. Returns how many identifiers were used.
    fn query_context_menu(&self, menu: &mut Self::Menu, request: &QueryRequest) -> Result<u32>;

    /// Execute a command, through the widest interface available.
    fn invoke(&self, request: &InvokeRequest) -> Result<()>;

    /// Hand a window message to the `Basic` capability.
    fn handle_menu_msg(&self, message: &WindowMessage) -> Result<()>;

    /// Hand a window message to the `Extended` capability and return its result.
    fn handle_menu_msg2(&self, message: &WindowMessage) -> Result<isize>;

    /// Look up a string attached to a populated command. `None` when the command has none.
    fn command_string(&self, ordinal: Ordinal, kind: CommandStringKind) -> Result<Option<String>>;
}
