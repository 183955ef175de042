use std::ffi::CString;

use shell_menu_core::{
    CommandStringKind, ContextMenuHandler, Error, InvokeRequest, InvokeTarget, MessageCapability,
    Ordinal, QueryRequest, Result, WindowMessage,
};
use tracing::trace;
use windows::Win32::{
    Foundation::{E_FAIL, E_INVALIDARG, E_NOTIMPL, HWND, LPARAM, LRESULT, WPARAM},
    UI::Shell::{
        CMINVOKECOMMANDINFO, CMINVOKECOMMANDINFOEX, GCS_HELPTEXTW, GCS_VERBW, IContextMenu,
        IContextMenu2, IContextMenu3,
    },
};
use windows::core::{Interface, PCSTR, PCWSTR, PSTR};

use crate::menu::Win32Menu;
use crate::util::{decode_wide, encode_wide, native};

/// `lpVerbW` of `CMINVOKECOMMANDINFOEX` is valid.
const CMIC_MASK_UNICODE: u32 = 0x0000_4000;

const COMMAND_STRING_CAPACITY: usize = 260;

enum Extension {
    Plain,
    Basic(IContextMenu2),
    Extended(IContextMenu3),
}

/// The shell's context-menu object for one selection.
///
/// Probes for `IContextMenu3` first and `IContextMenu2` second, and keeps whichever it found
/// alongside the base interface.
pub struct ShellMenuHandler {
    context_menu: IContextMenu,
    extension: Extension,
    owner: HWND,
}

impl ShellMenuHandler {
    /// Wrap `context_menu`. `owner` parents any UI its commands show.
    pub fn new(context_menu: IContextMenu, owner: HWND) -> Self {
        let extension = if let Ok(menu3) = context_menu.cast::<IContextMenu3>() {
            Extension::Extended(menu3)
        } else if let Ok(menu2) = context_menu.cast::<IContextMenu2>() {
            Extension::Basic(menu2)
        } else {
            Extension::Plain
        };

        Self {
            context_menu,
            extension,
            owner,
        }
    }

    pub fn context_menu(&self) -> &IContextMenu {
        &self.context_menu
    }

    pub fn owner(&self) -> HWND {
        self.owner
    }

    fn invoke_verb(&self, verb: &str, show: i32) -> Result<()> {
        let ansi = CString::new(verb).map_err(|_| Error::InvalidVerb(verb.to_string()))?;
        let wide = encode_wide(verb);
        let info = CMINVOKECOMMANDINFOEX {
            cbSize: size_of::<CMINVOKECOMMANDINFOEX>() as u32,
            fMask: CMIC_MASK_UNICODE,
            hwnd: self.owner,
            lpVerb: PCSTR(ansi.as_ptr() as *const u8),
            lpVerbW: PCWSTR(wide.as_ptr()),
            nShow: show,
            ..Default::default()
        };

        unsafe {
            self.context_menu
                .InvokeCommand(&info as *const CMINVOKECOMMANDINFOEX as *const CMINVOKECOMMANDINFO)
        }
        .map_err(native("IContextMenu::InvokeCommand"))
    }

    fn invoke_ordinal(&self, ordinal: Ordinal, show: i32) -> Result<()> {
        let info = CMINVOKECOMMANDINFO {
            cbSize: size_of::<CMINVOKECOMMANDINFO>() as u32,
            hwnd: self.owner,
            // MAKEINTRESOURCEA
            lpVerb: PCSTR(ordinal.into_raw() as usize as *const u8),
            nShow: show,
            ..Default::default()
        };

        let result = unsafe {
            match &self.extension {
                Extension::Extended(menu3) => menu3.InvokeCommand(&info),
                Extension::Basic(menu2) => menu2.InvokeCommand(&info),
                Extension::Plain => self.context_menu.InvokeCommand(&info),
            }
        };
        result.map_err(native("IContextMenu::InvokeCommand"))
    }
}

impl ContextMenuHandler for ShellMenuHandler {
    type Menu = Win32Menu;

    fn capability(&self) -> MessageCapability {
        match self.extension {
            Extension::Plain => MessageCapability::None,
            Extension::Basic(_) => MessageCapability::Basic,
            Extension::Extended(_) => MessageCapability::Extended,
        }
    }

    fn query_context_menu(&self, menu: &mut Win32Menu, request: &QueryRequest) -> Result<u32> {
        // Called through the vtable: the success code carries the number of identifiers used.
        let hresult = unsafe {
            (Interface::vtable(&self.context_menu).QueryContextMenu)(
                Interface::as_raw(&self.context_menu),
                menu.hmenu(),
                request.index,
                request.first.first(),
                request.last_command_id,
                request.flags.bits(),
            )
        };
        hresult.ok().map_err(native("IContextMenu::QueryContextMenu"))?;
        Ok((hresult.0 & 0xFFFF) as u32)
    }

    fn invoke(&self, request: &InvokeRequest) -> Result<()> {
        let show = request.show.as_raw();
        match &request.target {
            InvokeTarget::Verb(verb) => self.invoke_verb(verb.as_str(), show),
            InvokeTarget::Command { ordinal, .. } => self.invoke_ordinal(*ordinal, show),
        }
    }

    fn handle_menu_msg(&self, message: &WindowMessage) -> Result<()> {
        let menu2: &IContextMenu2 = match &self.extension {
            Extension::Extended(menu3) => menu3,
            Extension::Basic(menu2) => menu2,
            Extension::Plain => return Err(Error::Unsupported("IContextMenu2")),
        };
        unsafe {
            menu2.HandleMenuMsg(
                message.id,
                WPARAM(message.wparam),
                LPARAM(message.lparam),
            )
        }
        .map_err(native("IContextMenu2::HandleMenuMsg"))
    }

    fn handle_menu_msg2(&self, message: &WindowMessage) -> Result<isize> {
        let Extension::Extended(menu3) = &self.extension else {
            return Err(Error::Unsupported("IContextMenu3"));
        };
        let mut result = LRESULT(0);
        unsafe {
            menu3.HandleMenuMsg2(
                message.id,
                WPARAM(message.wparam),
                LPARAM(message.lparam),
                Some(&mut result),
            )
        }
        .map_err(native("IContextMenu3::HandleMenuMsg2"))?;
        Ok(result.0)
    }

    fn command_string(&self, ordinal: Ordinal, kind: CommandStringKind) -> Result<Option<String>> {
        let flags = match kind {
            CommandStringKind::Verb => GCS_VERBW,
            CommandStringKind::HelpText => GCS_HELPTEXTW,
        };
        let mut buffer = [0u16; COMMAND_STRING_CAPACITY];

        let result = unsafe {
            self.context_menu.GetCommandString(
                ordinal.into_raw() as usize,
                flags,
                None,
                PSTR(buffer.as_mut_ptr() as *mut u8),
                buffer.len() as u32,
            )
        };

        match result {
            Ok(()) => {
                let string = decode_wide(&buffer).to_string_lossy().into_owned();
                Ok((!string.is_empty()).then_some(string))
            }
            // What handlers answer for commands that carry no such string.
            Err(err) if [E_NOTIMPL, E_INVALIDARG, E_FAIL].contains(&err.code()) => {
                trace!(?ordinal, ?kind, code = err.code().0, "No command string");
                Ok(None)
            }
            Err(err) => Err(native("IContextMenu::GetCommandString")(err)),
        }
    }
}
