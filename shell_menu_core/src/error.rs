//! Error type shared by the core and the platform backends.

use std::fmt;

/// `HRESULT_FROM_WIN32(ERROR_CANCELLED)`: the user dismissed a confirmation dialog.
pub const E_CANCELLED: i32 = 0x8007_04C7_u32 as i32;

/// `COPYENGINE_E_USER_CANCELLED`: the user cancelled a shell copy engine operation.
pub const COPYENGINE_E_USER_CANCELLED: i32 = 0x8027_0000_u32 as i32;

/// Result alias used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by a menu bridge or its platform backend.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No items were supplied.
    #[error("selection is empty")]
    EmptySelection,

    /// The item at `position` does not live in the same parent container as the first item.
    #[error("item at position {position} does not share the parent of the first item")]
    MixedParents {
        /// Zero-based position of the first offending item.
        position: usize,
    },

    /// A verb was empty or contained an interior NUL.
    #[error("invalid verb {0:?}")]
    InvalidVerb(String),

    /// `offset + ordinal` does not fit in a command identifier.
    #[error("ordinal {ordinal} does not fit above command offset {offset:#x}")]
    OrdinalOutOfRange { ordinal: u32, offset: u32 },

    /// The shell's identifier range is empty or leaves the 16-bit menu identifier space.
    #[error("invalid shell command range {first:#x}..={last:#x}")]
    InvalidCommandRange { first: u32, last: u32 },

    /// A native call failed. `code` is the raw `HRESULT`.
    #[error("{context} failed ({}): {message}", NativeCode(*.code))]
    Native {
        context: &'static str,
        code: i32,
        message: String,
    },

    /// The context-menu object lacks the capability a call needs.
    #[error("{0} is not supported by this context menu")]
    Unsupported(&'static str),

    /// The host window has no usable Win32 handle.
    #[error("window handle: {0}")]
    WindowHandle(&'static str),
}

impl Error {
    /// Build a [`Error::Native`] from a failing call.
    pub fn native(context: &'static str, code: i32, message: impl Into<String>) -> Self {
        Error::Native {
            context,
            code,
            message: message.into(),
        }
    }

    /// The raw `HRESULT` of a native failure.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this failure only means the user cancelled the operation.
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self.code(), Some(E_CANCELLED | COPYENGINE_E_USER_CANCELLED))
    }
}

struct NativeCode(i32);

impl fmt::Display for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0 as u32)
    }
}
