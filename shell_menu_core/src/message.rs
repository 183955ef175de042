//! Window messages the host relays to a bridge.

pub const WM_DRAWITEM: u32 = 0x002B;
pub const WM_MEASUREITEM: u32 = 0x002C;
pub const WM_COMMAND: u32 = 0x0111;
pub const WM_INITMENUPOPUP: u32 = 0x0117;
pub const WM_MENUSELECT: u32 = 0x011F;
pub const WM_MENUCHAR: u32 = 0x0120;

/// A window message as received by a window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMessage {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl WindowMessage {
    pub const fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self { id, wparam, lparam }
    }

    /// A `WM_COMMAND` for a menu item, as sent when the user picks it.
    pub const fn menu_command(command_id: u32) -> Self {
        Self::new(WM_COMMAND, (command_id & 0xFFFF) as usize, 0)
    }

    /// The menu item identifier carried by a `WM_COMMAND`, or `None` for any other message.
    pub const fn command_id(&self) -> Option<u32> {
        if self.id == WM_COMMAND {
            Some((self.wparam & 0xFFFF) as u32)
        } else {
            None
        }
    }

    /// Whether the shell's extended handler has a use for this message.
    pub const fn is_menu_message(&self) -> bool {
        matches!(
            self.id,
            WM_INITMENUPOPUP | WM_DRAWITEM | WM_MEASUREITEM | WM_MENUCHAR | WM_MENUSELECT
        )
    }
}

/// What the bridge did with a relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The message was consumed. `result` must be returned from the window procedure.
    Handled { result: isize },
    /// The host must continue with its own default processing.
    NotHandled,
}

impl MessageOutcome {
    pub const fn is_handled(&self) -> bool {
        matches!(self, MessageOutcome::Handled { .. })
    }

    pub const fn result(&self) -> Option<isize> {
        match self {
            MessageOutcome::Handled { result } => Some(*result),
            MessageOutcome::NotHandled => None,
        }
    }
}

/// Which messages are offered to the context menu's extended handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardPolicy {
    /// Every message the host relays.
    #[default]
    All,
    /// Only the owner-draw, popup-init, menu-char and menu-select messages.
    MenuMessages,
}

impl ForwardPolicy {
    pub const fn admits(self, message: &WindowMessage) -> bool {
        match self {
            ForwardPolicy::All => true,
            ForwardPolicy::MenuMessages => message.is_menu_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WM_PAINT: u32 = 0x000F;

    #[test]
    fn command_id_is_the_low_word() {
        let message = WindowMessage::new(WM_COMMAND, 0x0001_8003, 0);
        assert_eq!(message.command_id(), Some(0x8003));
        assert_eq!(WindowMessage::new(WM_PAINT, 0x8003, 0).command_id(), None);
    }

    #[test]
    fn menu_messages_policy_filters() {
        let paint = WindowMessage::new(WM_PAINT, 0, 0);
        let draw = WindowMessage::new(WM_DRAWITEM, 0, 0);

        assert!(ForwardPolicy::All.admits(&paint));
        assert!(!ForwardPolicy::MenuMessages.admits(&paint));
        assert!(ForwardPolicy::MenuMessages.admits(&draw));
    }
}
