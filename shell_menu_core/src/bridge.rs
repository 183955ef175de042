//! The menu bridge: mediates between a native menu and a shell context-menu object.

use std::cell::Cell;
use std::fmt;

#[cfg(feature = "popup")]
use dpi::PhysicalPosition;
use tracing::{debug, trace, warn};

use crate::command::{CommandId, CommandOffset, Ordinal, QueryFlags, ShowState};
use crate::error::{Error, Result};
use crate::handler::{
    CommandStringKind, ContextMenuHandler, InvokeRequest, InvokeTarget, MessageCapability,
    QueryRequest,
};
use crate::menu::{strip_shell_entries, MenuMarker};
use crate::message::{ForwardPolicy, MessageOutcome, WindowMessage};
use crate::selection::{ParentContainer, Selection, SelectionItem};
use crate::verb::Verb;

/// Highest identifier a menu item can carry.
pub const LAST_MENU_ID: u32 = 0xFFFF;

/// Configuration of a [`MenuBridge`].
#[derive(Debug, Clone)]
pub struct BridgeAttributes {
    /// First identifier handed to the shell. Defaults to `0x8000`.
    pub command_offset: CommandOffset,
    /// Last identifier handed to the shell. Defaults to `0xFFFF`.
    pub last_command_id: u32,
    /// Tag written on application submenus before each population pass.
    pub marker: MenuMarker,
    /// Flags for the enumeration pass. Defaults to [`QueryFlags::EXPLORE`].
    pub query_flags: QueryFlags,
    /// Show state for windows opened by invoked commands.
    pub show_state: ShowState,
    /// Which relayed messages reach the extended handler.
    pub forward_policy: ForwardPolicy,
}

impl Default for BridgeAttributes {
    fn default() -> Self {
        Self {
            command_offset: CommandOffset::DEFAULT,
            last_command_id: LAST_MENU_ID,
            marker: MenuMarker::DEFAULT,
            query_flags: QueryFlags::EXPLORE,
            show_state: ShowState::Normal,
            forward_policy: ForwardPolicy::All,
        }
    }
}

impl BridgeAttributes {
    /// Set the first identifier handed to the shell.
    ///
    /// Application menu items must use identifiers below it.
    pub fn with_command_offset(mut self, offset: CommandOffset) -> Self {
        self.command_offset = offset;
        self
    }

    /// Set the last identifier handed to the shell.
    pub fn with_last_command_id(mut self, last: u32) -> Self {
        self.last_command_id = last;
        self
    }

    /// Set the tag used to recognise application submenus.
    pub fn with_marker(mut self, marker: MenuMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Set the enumeration flags.
    pub fn with_query_flags(mut self, flags: QueryFlags) -> Self {
        self.query_flags = flags;
        self
    }

    /// Set the show state for invoked commands.
    pub fn with_show_state(mut self, show_state: ShowState) -> Self {
        self.show_state = show_state;
        self
    }

    /// Set which relayed messages are offered to the extended handler.
    pub fn with_forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.forward_policy = policy;
        self
    }

    /// Check that the shell range is non-empty, starts above zero and fits in a menu identifier.
    pub fn validate(&self) -> Result<()> {
        let first = self.command_offset.first();
        let last = self.last_command_id;
        if first == 0 || first > last || last > LAST_MENU_ID {
            return Err(Error::InvalidCommandRange { first, last });
        }
        Ok(())
    }
}

/// Shows a transient popup menu and reports what the user picked.
#[cfg(feature = "popup")]
pub trait PopupHost {
    type Menu: crate::menu::NativeMenu;

    /// What the popup position is relative to.
    type Anchor: ?Sized;

    fn create_popup(&self) -> Result<Self::Menu>;

    /// Display `menu` at `position` relative to `anchor` and block until it is dismissed.
    ///
    /// Returns the identifier of the chosen entry, or `None` if the menu was dismissed.
    fn track_popup(
        &self,
        menu: &Self::Menu,
        anchor: &Self::Anchor,
        position: PhysicalPosition<i32>,
    ) -> Result<Option<CommandId>>;
}

/// Mediates between a native menu and the context-menu object of one selection.
///
/// The bridge is bound to its selection for its whole lifetime. All calls must happen on the
/// thread that owns the host window.
pub struct MenuBridge<H> {
    handler: H,
    capability: MessageCapability,
    attributes: BridgeAttributes,
    populated: Cell<bool>,
}

impl<H> fmt::Debug for MenuBridge<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBridge")
            .field("capability", &self.capability)
            .field("attributes", &self.attributes)
            .field("populated", &self.populated.get())
            .finish_non_exhaustive()
    }
}

impl<H: ContextMenuHandler> MenuBridge<H> {
    /// Wrap a context-menu object that was already obtained for a selection.
    ///
    /// Fails if the attributes describe an unusable identifier range.
    pub fn new(handler: H, attributes: BridgeAttributes) -> Result<Self> {
        attributes.validate()?;
        let capability = handler.capability();
        debug!(?capability, offset = ?attributes.command_offset, "Creating menu bridge");

        Ok(Self {
            handler,
            capability,
            attributes,
            populated: Cell::new(false),
        })
    }

    /// Validate `items` and ask `container` for their context-menu object.
    pub fn for_selection<I, C>(
        items: impl IntoIterator<Item = I>,
        container: &C,
        attributes: BridgeAttributes,
    ) -> Result<Self>
    where
        I: SelectionItem,
        C: ParentContainer<I, Handler = H>,
    {
        attributes.validate()?;
        let selection = Selection::new(items)?;
        debug!(items = selection.len(), "Resolving context menu for selection");
        let handler = container.context_menu_for(&selection)?;
        Self::new(handler, attributes)
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn capability(&self) -> MessageCapability {
        self.capability
    }

    pub fn attributes(&self) -> &BridgeAttributes {
        &self.attributes
    }

    /// Whether [`MenuBridge::populate`] has succeeded at least once.
    pub fn is_populated(&self) -> bool {
        self.populated.get()
    }

    /// Strip stale shell entries from `menu`, then let the shell insert its commands.
    ///
    /// Safe to call repeatedly on the same menu. Returns the number of identifiers the shell used.
    pub fn populate(&self, menu: &mut H::Menu) -> Result<u32> {
        let removed =
            strip_shell_entries(menu, self.attributes.command_offset, self.attributes.marker)?;

        let request = QueryRequest {
            index: 0,
            first: self.attributes.command_offset,
            last_command_id: self.attributes.last_command_id,
            flags: self.attributes.query_flags,
        };
        let added = self.handler.query_context_menu(menu, &request)?;
        self.populated.set(true);

        debug!(removed, added, "Populated menu with shell commands");
        Ok(added)
    }

    /// Execute a shell verb such as `"properties"` for the selection.
    pub fn invoke_verb(&self, verb: Verb) -> Result<()> {
        debug!(%verb, "Invoking verb");
        self.handler.invoke(&InvokeRequest {
            target: InvokeTarget::Verb(verb),
            show: self.attributes.show_state,
        })
    }

    pub fn invoke_copy(&self) -> Result<()> {
        self.invoke_verb(Verb::Copy)
    }

    pub fn invoke_cut(&self) -> Result<()> {
        self.invoke_verb(Verb::Cut)
    }

    pub fn invoke_paste(&self) -> Result<()> {
        self.invoke_verb(Verb::Paste)
    }

    pub fn invoke_rename(&self) -> Result<()> {
        self.invoke_verb(Verb::Rename)
    }

    /// Delete the selection.
    ///
    /// The user cancelling the confirmation dialog or the copy engine is not an error.
    pub fn invoke_delete(&self) -> Result<()> {
        match self.invoke_verb(Verb::Delete) {
            Err(err) if err.is_user_cancelled() => {
                debug!(%err, "Delete cancelled by the user");
                Ok(())
            }
            other => other,
        }
    }

    /// Execute the command with the given ordinal from the last population pass.
    pub fn invoke_command(&self, ordinal: Ordinal) -> Result<()> {
        let command_id = self.attributes.command_offset.command_id(ordinal)?;
        debug!(?ordinal, ?command_id, "Invoking command");
        self.handler.invoke(&InvokeRequest {
            target: InvokeTarget::Command {
                ordinal,
                command_id,
            },
            show: self.attributes.show_state,
        })
    }

    /// The language-independent verb of a populated command.
    pub fn command_verb(&self, ordinal: Ordinal) -> Result<Option<String>> {
        self.handler.command_string(ordinal, CommandStringKind::Verb)
    }

    /// The help text of a populated command.
    pub fn command_help_text(&self, ordinal: Ordinal) -> Result<Option<String>> {
        self.handler.command_string(ordinal, CommandStringKind::HelpText)
    }

    /// Give the bridge a window message before the host's own handling.
    ///
    /// A `WM_COMMAND` for a shell identifier invokes that command. Any other message is offered
    /// to the widest message-handling capability, if the forward policy admits it. Failures are
    /// never returned: they only turn the outcome into [`MessageOutcome::NotHandled`].
    pub fn handle_menu_message(&self, message: &WindowMessage) -> MessageOutcome {
        if let Some(raw) = message.command_id() {
            let id = CommandId::from_raw(raw);
            if let Some(ordinal) = self.attributes.command_offset.ordinal(id) {
                if let Err(err) = self.invoke_command(ordinal) {
                    warn!(%err, ?id, "Shell command failed");
                }
                return MessageOutcome::Handled { result: 0 };
            }
        }

        if !self.attributes.forward_policy.admits(message) {
            return MessageOutcome::NotHandled;
        }

        let forwarded = match self.capability {
            MessageCapability::Extended => self.handler.handle_menu_msg2(message),
            MessageCapability::Basic => self.handler.handle_menu_msg(message).map(|()| 0),
            MessageCapability::None => return MessageOutcome::NotHandled,
        };

        match forwarded {
            Ok(result) => {
                trace!(message = message.id, result, "Forwarded menu message");
                MessageOutcome::Handled { result }
            }
            Err(err) => {
                debug!(message = message.id, %err, "Menu message not handled");
                MessageOutcome::NotHandled
            }
        }
    }
}

#[cfg(feature = "popup")]
impl<H: ContextMenuHandler> MenuBridge<H> {
    /// Show the shell menu as a popup at `position` relative to `anchor` and run the chosen
    /// command.
    ///
    /// Blocks until the menu is dismissed. Returns the ordinal that was invoked, if any.
    pub fn show_popup<P>(
        &self,
        host: &P,
        anchor: &P::Anchor,
        position: PhysicalPosition<i32>,
    ) -> Result<Option<Ordinal>>
    where
        P: PopupHost<Menu = H::Menu>,
    {
        let mut menu = host.create_popup()?;
        self.populate(&mut menu)?;

        let Some(id) = host.track_popup(&menu, anchor, position)? else {
            trace!("Popup menu dismissed");
            return Ok(None);
        };

        let Some(ordinal) = self.attributes.command_offset.ordinal(id) else {
            warn!(?id, "Popup returned an identifier outside the shell range");
            return Ok(None);
        };

        self.invoke_command(ordinal)?;
        Ok(Some(ordinal))
    }
}
