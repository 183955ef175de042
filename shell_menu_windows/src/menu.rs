use shell_menu_core::{MenuEntryInfo, NativeMenu, Result};
use tracing::warn;
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DeleteMenu, DestroyMenu, GetMenuInfo, GetMenuItemCount,
    GetMenuItemInfoW, HMENU, MENUINFO, MENUITEMINFOW, MF_BYPOSITION, MF_POPUP, MF_SEPARATOR,
    MF_STRING, MIIM_ID, MIIM_SUBMENU, MIM_MENUDATA, SetMenuInfo,
};
use windows::core::PCWSTR;

use crate::util::{encode_wide, native};

/// A Win32 menu the shell can populate.
///
/// Remembers the submenus appended through it, so a population pass can tell them apart from
/// the shell's own.
#[derive(Debug)]
pub struct Win32Menu {
    hmenu: HMENU,
    owned: bool,
    application_submenus: Vec<HMENU>,
}

impl Win32Menu {
    /// Create an empty popup menu, destroyed when dropped.
    pub fn new_popup() -> Result<Self> {
        let hmenu = unsafe { CreatePopupMenu() }.map_err(native("CreatePopupMenu"))?;
        Ok(Self {
            hmenu,
            owned: true,
            application_submenus: Vec::new(),
        })
    }

    /// Borrow a menu owned by someone else, such as a window's menu bar.
    ///
    /// Every submenu already attached to `hmenu` is adopted as the application's, so wrap the
    /// menu before the shell populates it.
    ///
    /// # Safety
    /// `hmenu` must stay a valid menu for the lifetime of the returned value.
    pub unsafe fn from_raw(hmenu: HMENU) -> Result<Self> {
        let mut menu = Self {
            hmenu,
            owned: false,
            application_submenus: Vec::new(),
        };
        for position in 0..menu.entry_count()? {
            if let Some(submenu) = menu.entry(position)?.submenu {
                menu.adopt_submenu(submenu);
            }
        }
        Ok(menu)
    }

    pub fn hmenu(&self) -> HMENU {
        self.hmenu
    }

    pub fn append_item(&mut self, id: u32, label: &str) -> Result<()> {
        let label = encode_wide(label);
        unsafe { AppendMenuW(self.hmenu, MF_STRING, id as usize, PCWSTR(label.as_ptr())) }
            .map_err(native("AppendMenuW"))
    }

    pub fn append_separator(&mut self) -> Result<()> {
        unsafe { AppendMenuW(self.hmenu, MF_SEPARATOR, 0, PCWSTR::null()) }
            .map_err(native("AppendMenuW"))
    }

    /// Append `submenu` under `label`. The submenu is destroyed together with this menu.
    pub fn append_submenu(&mut self, label: &str, mut submenu: Win32Menu) -> Result<HMENU> {
        let label = encode_wide(label);
        unsafe {
            AppendMenuW(
                self.hmenu,
                MF_STRING | MF_POPUP,
                submenu.hmenu.0 as usize,
                PCWSTR(label.as_ptr()),
            )
        }
        .map_err(native("AppendMenuW"))?;

        submenu.owned = false;
        self.application_submenus.push(submenu.hmenu);
        Ok(submenu.hmenu)
    }

    /// Record a submenu the application attached without going through this wrapper.
    pub fn adopt_submenu(&mut self, submenu: HMENU) {
        if !self.application_submenus.contains(&submenu) {
            self.application_submenus.push(submenu);
        }
    }
}

impl NativeMenu for Win32Menu {
    type Submenu = HMENU;

    fn entry_count(&self) -> Result<usize> {
        let count = unsafe { GetMenuItemCount(Some(self.hmenu)) };
        if count < 0 {
            return Err(native("GetMenuItemCount")(windows::core::Error::from_win32()));
        }
        Ok(count as usize)
    }

    fn entry(&self, position: usize) -> Result<MenuEntryInfo<HMENU>> {
        let mut info = MENUITEMINFOW {
            cbSize: size_of::<MENUITEMINFOW>() as u32,
            fMask: MIIM_ID | MIIM_SUBMENU,
            ..Default::default()
        };
        unsafe { GetMenuItemInfoW(self.hmenu, position as u32, true, &mut info) }
            .map_err(native("GetMenuItemInfoW"))?;

        Ok(MenuEntryInfo {
            id: info.wID,
            submenu: (!info.hSubMenu.0.is_null()).then_some(info.hSubMenu),
        })
    }

    fn application_submenus(&self) -> Vec<HMENU> {
        self.application_submenus.clone()
    }

    fn submenu_tag(&self, submenu: HMENU) -> Result<usize> {
        let mut info = MENUINFO {
            cbSize: size_of::<MENUINFO>() as u32,
            fMask: MIM_MENUDATA,
            ..Default::default()
        };
        unsafe { GetMenuInfo(submenu, &mut info) }.map_err(native("GetMenuInfo"))?;
        Ok(info.dwMenuData)
    }

    fn set_submenu_tag(&mut self, submenu: HMENU, tag: usize) -> Result<()> {
        let info = MENUINFO {
            cbSize: size_of::<MENUINFO>() as u32,
            fMask: MIM_MENUDATA,
            dwMenuData: tag,
            ..Default::default()
        };
        unsafe { SetMenuInfo(submenu, &info) }.map_err(native("SetMenuInfo"))
    }

    fn remove_entry(&mut self, position: usize) -> Result<()> {
        let removed = self.entry(position)?;
        unsafe { DeleteMenu(self.hmenu, position as u32, MF_BYPOSITION) }
            .map_err(native("DeleteMenu"))?;
        if let Some(submenu) = removed.submenu {
            self.application_submenus.retain(|kept| *kept != submenu);
        }
        Ok(())
    }
}

impl Drop for Win32Menu {
    fn drop(&mut self) {
        if self.owned {
            if let Err(err) = unsafe { DestroyMenu(self.hmenu) } {
                warn!(%err, "Failed to destroy popup menu");
            }
        }
    }
}
