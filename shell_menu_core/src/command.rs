//! Command identifier space shared between the host's menu items and the shell's.
//!
//! The shell numbers the commands it inserts from a base identifier chosen by the caller.
//! Everything at or above that base belongs to the shell, everything below it belongs to the
//! application.

use std::fmt;
use std::ops::BitOr;

use crate::error::{Error, Result};

/// Zero-based index of a command within one population pass.
///
/// Ordinals are only stable until the menu is populated again.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(u32);

impl Ordinal {
    /// Convert the `Ordinal` into the underlying integer.
    pub const fn into_raw(self) -> u32 {
        self.0
    }

    /// Construct an `Ordinal` from the underlying integer.
    pub const fn from_raw(ordinal: u32) -> Self {
        Self(ordinal)
    }
}

impl fmt::Debug for Ordinal {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmtr)
    }
}

/// Raw identifier of a menu item, as found in `WM_COMMAND` or returned by a tracked popup.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(u32);

impl CommandId {
    /// Convert the `CommandId` into the underlying integer.
    pub const fn into_raw(self) -> u32 {
        self.0
    }

    /// Construct a `CommandId` from the underlying integer.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for CommandId {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "{:#x}", self.0)
    }
}

/// First identifier reserved for shell commands.
///
/// `command_id = offset + ordinal` when populating and `ordinal = command_id - offset` when a
/// selection comes back. Each bridge owns its own offset so that bridges for nested menus can
/// be given disjoint ranges.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct CommandOffset(u32);

impl CommandOffset {
    /// `0x8000`, leaving the lower half of the 16-bit `WM_COMMAND` range to the application.
    pub const DEFAULT: Self = Self(0x8000);

    pub const fn new(first: u32) -> Self {
        Self(first)
    }

    /// The first shell command identifier.
    pub const fn first(self) -> u32 {
        self.0
    }

    /// Whether `id` lies in the shell's range.
    pub const fn contains(self, id: CommandId) -> bool {
        id.0 >= self.0
    }

    /// Identifier the shell assigned to `ordinal`.
    pub fn command_id(self, ordinal: Ordinal) -> Result<CommandId> {
        self.0
            .checked_add(ordinal.0)
            .map(CommandId)
            .ok_or(Error::OrdinalOutOfRange {
                ordinal: ordinal.0,
                offset: self.0,
            })
    }

    /// Ordinal of a shell command, or `None` for an application identifier.
    pub fn ordinal(self, id: CommandId) -> Option<Ordinal> {
        id.0.checked_sub(self.0).map(Ordinal)
    }
}

impl Default for CommandOffset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for CommandOffset {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "{:#x}", self.0)
    }
}

/// Flags passed to the shell when it enumerates its commands (`CMF_*`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryFlags(u32);

impl QueryFlags {
    pub const NORMAL: Self = Self(0x0000);
    pub const DEFAULT_ONLY: Self = Self(0x0001);
    pub const VERBS_ONLY: Self = Self(0x0002);
    /// Entries appropriate for browsing a folder rather than for a drag-drop target.
    pub const EXPLORE: Self = Self(0x0004);
    pub const NO_VERBS: Self = Self(0x0008);
    pub const CAN_RENAME: Self = Self(0x0010);
    pub const NO_DEFAULT: Self = Self(0x0020);
    pub const EXTENDED_VERBS: Self = Self(0x0100);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for QueryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for QueryFlags {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "QueryFlags({:#x})", self.0)
    }
}

/// How a window opened by an invoked command should be shown (`SW_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowState {
    Hide,
    #[default]
    Normal,
    Minimized,
    Maximized,
    NoActivate,
}

impl ShowState {
    pub const fn as_raw(self) -> i32 {
        match self {
            ShowState::Hide => 0,
            ShowState::Normal => 1,
            ShowState::Minimized => 2,
            ShowState::Maximized => 3,
            ShowState::NoActivate => 4,
        }
    }
}
