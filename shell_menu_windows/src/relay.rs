//! Hidden window that routes the shell's menu messages back into a bridge.

use std::cell::Cell;
use std::rc::Weak;

use shell_menu_core::{MenuBridge, MessageOutcome, Result, WindowMessage};
use tracing::{trace, warn};
use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT, WPARAM},
    UI::WindowsAndMessaging::{
        CREATESTRUCTW, CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA,
        RegisterClassExW, WM_NCCREATE, WM_NCDESTROY, WNDCLASSEXW, WS_EX_TOOLWINDOW, WS_POPUP,
    },
};
use windows::core::PCWSTR;

use crate::handler::ShellMenuHandler;
use crate::util::{self, encode_wide, native};

pub(crate) type ShellBridge = MenuBridge<ShellMenuHandler>;

/// Attributes of the relay window.
#[derive(Debug, Clone)]
pub struct RelayAttributes {
    /// The relay window class name.
    ///
    /// WARNING: changing this after the first relay was created has no effect on the window
    /// procedure already registered under the old name.
    pub class_name: String,
}

impl Default for RelayAttributes {
    fn default() -> Self {
        Self {
            class_name: "ShellMenuRelay".to_string(),
        }
    }
}

impl RelayAttributes {
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

struct RelayInitData {
    bridge: Weak<ShellBridge>,
}

struct RelayWindowData {
    userdata_removed: Cell<bool>,
    recurse_depth: Cell<u32>,
    bridge: Weak<ShellBridge>,
}

/// A never-shown top-level window owning the shell's popup menus.
///
/// Owner-drawn shell submenus send their drawing and initialization messages here. Only a weak
/// reference to the bridge is kept: once the bridge is gone, messages fall through to the
/// default procedure.
#[derive(Debug)]
pub(crate) struct RelayWindow {
    hwnd: HWND,
}

impl RelayWindow {
    pub(crate) fn new(bridge: Weak<ShellBridge>, attr: &RelayAttributes) -> Result<Self> {
        let class_name = encode_wide(&attr.class_name);
        let instance = util::get_instance_handle();

        let class = WNDCLASSEXW {
            cbSize: size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(relay_window_callback),
            hInstance: instance,
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        // Register the window class (ignore errors for duplicate registration)
        unsafe { RegisterClassExW(&class) };

        let mut initdata = RelayInitData { bridge };

        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR::null(),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                Some(instance),
                Some(&mut initdata as *mut RelayInitData as *const _),
            )
        }
        .map_err(native("CreateWindowExW"))?;

        trace!(?hwnd, "Created relay window");
        Ok(Self { hwnd })
    }

    #[inline]
    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl Drop for RelayWindow {
    fn drop(&mut self) {
        if let Err(err) = unsafe { DestroyWindow(self.hwnd) } {
            warn!(%err, "Failed to destroy relay window");
        }
    }
}

unsafe extern "system" fn relay_window_callback(
    window: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let userdata = unsafe { util::get_window_long(window, GWLP_USERDATA) };

    let userdata_ptr = match (userdata, msg) {
        (0, WM_NCCREATE) => {
            let createstruct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
            let initdata = unsafe { &*(createstruct.lpCreateParams as *const RelayInitData) };
            let data = Box::new(RelayWindowData {
                userdata_removed: Cell::new(false),
                recurse_depth: Cell::new(0),
                bridge: initdata.bridge.clone(),
            });
            unsafe {
                util::set_window_long(window, GWLP_USERDATA, Box::into_raw(data) as isize);
                return DefWindowProcW(window, msg, wparam, lparam);
            }
        }
        (0, _) => return unsafe { DefWindowProcW(window, msg, wparam, lparam) },
        _ => userdata as *mut RelayWindowData,
    };

    let (result, userdata_removed, recurse_depth) = {
        let userdata = unsafe { &*userdata_ptr };

        userdata.recurse_depth.set(userdata.recurse_depth.get() + 1);

        let result = unsafe { relay_window_callback_inner(window, msg, wparam, lparam, userdata) };

        let userdata_removed = userdata.userdata_removed.get();
        let recurse_depth = userdata.recurse_depth.get() - 1;
        userdata.recurse_depth.set(recurse_depth);

        (result, userdata_removed, recurse_depth)
    };

    if userdata_removed && recurse_depth == 0 {
        drop(unsafe { Box::from_raw(userdata_ptr) });
    }

    result
}

unsafe fn relay_window_callback_inner(
    window: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    userdata: &RelayWindowData,
) -> LRESULT {
    if msg == WM_NCDESTROY {
        unsafe { util::set_window_long(window, GWLP_USERDATA, 0) };
        userdata.userdata_removed.set(true);
        return unsafe { DefWindowProcW(window, msg, wparam, lparam) };
    }

    let message = WindowMessage::new(msg, wparam.0, lparam.0);
    // The relay only ever owns menus: window management messages stay with the default procedure.
    if message.is_menu_message() || message.command_id().is_some() {
        if let Some(bridge) = userdata.bridge.upgrade() {
            if let MessageOutcome::Handled { result } = bridge.handle_menu_message(&message) {
                return LRESULT(result);
            }
        }
    }

    unsafe { DefWindowProcW(window, msg, wparam, lparam) }
}

#[cfg(feature = "popup")]
mod popup {
    use shell_menu_core::{CommandId, PhysicalPosition, PopupHost, Result};
    use tracing::debug;
    use windows::Win32::{
        Foundation::{HWND, LPARAM, POINT, WPARAM},
        Graphics::Gdi::ClientToScreen,
        UI::WindowsAndMessaging::{
            PostMessageW, SetForegroundWindow, TPM_RETURNCMD, TPM_RIGHTBUTTON, TrackPopupMenuEx,
            WM_NULL,
        },
    };

    use super::RelayWindow;
    use crate::menu::Win32Menu;
    use crate::util::native;

    impl PopupHost for RelayWindow {
        type Menu = Win32Menu;
        /// The window whose client area the popup position is relative to.
        type Anchor = HWND;

        fn create_popup(&self) -> Result<Win32Menu> {
            Win32Menu::new_popup()
        }

        fn track_popup(
            &self,
            menu: &Win32Menu,
            anchor: &HWND,
            position: PhysicalPosition<i32>,
        ) -> Result<Option<CommandId>> {
            let mut point = POINT {
                x: position.x,
                y: position.y,
            };
            unsafe { ClientToScreen(*anchor, &mut point) }
                .ok()
                .map_err(native("ClientToScreen"))?;

            // The owner must be foreground, or the menu will not close when clicking elsewhere.
            let selected = unsafe {
                let _ = SetForegroundWindow(self.hwnd());
                let selected = TrackPopupMenuEx(
                    menu.hmenu(),
                    (TPM_RETURNCMD | TPM_RIGHTBUTTON).0,
                    point.x,
                    point.y,
                    self.hwnd(),
                    None,
                );
                let _ = PostMessageW(Some(self.hwnd()), WM_NULL, WPARAM(0), LPARAM(0));
                selected
            };

            debug!(x = point.x, y = point.y, selected = selected.0, "Popup menu closed");
            Ok((selected.0 > 0).then(|| CommandId::from_raw(selected.0 as u32)))
        }
    }
}
