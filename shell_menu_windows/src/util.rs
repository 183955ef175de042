use std::{
    ffi::{OsStr, OsString},
    iter::once,
    os::windows::ffi::{OsStrExt as _, OsStringExt as _},
};

use shell_menu_core::Error;
use windows::Win32::{
    Foundation::{HINSTANCE, HWND},
    System::SystemServices::IMAGE_DOS_HEADER,
    UI::WindowsAndMessaging::WINDOW_LONG_PTR_INDEX,
};

pub fn get_instance_handle() -> HINSTANCE {
    // Gets the instance handle by taking the address of the
    // pseudo-variable created by the microsoft linker:
    // https://devblogs.microsoft.com/oldnewthing/20041025-00/?p=37483

    // This is preferred over GetModuleHandle(NULL) because it also works in DLLs:
    // https://stackoverflow.com/questions/21718027/getmodulehandlenull-vs-hinstance

    unsafe extern "C" {
        static __ImageBase: IMAGE_DOS_HEADER;
    }

    HINSTANCE(unsafe { &__ImageBase as *const IMAGE_DOS_HEADER as *mut _ })
}

#[inline(always)]
pub(crate) unsafe fn get_window_long(hwnd: HWND, nindex: WINDOW_LONG_PTR_INDEX) -> isize {
    #[cfg(target_pointer_width = "64")]
    return unsafe { windows::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, nindex) };
    #[cfg(target_pointer_width = "32")]
    return unsafe {
        windows::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, nindex) as isize
    };
}

#[inline(always)]
pub(crate) unsafe fn set_window_long(
    hwnd: HWND,
    nindex: WINDOW_LONG_PTR_INDEX,
    dwnewlong: isize,
) -> isize {
    #[cfg(target_pointer_width = "64")]
    return unsafe {
        windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, nindex, dwnewlong)
    };
    #[cfg(target_pointer_width = "32")]
    return unsafe {
        windows::Win32::UI::WindowsAndMessaging::SetWindowLongW(hwnd, nindex, dwnewlong as i32)
            as isize
    };
}

pub fn encode_wide(string: impl AsRef<OsStr>) -> Vec<u16> {
    string.as_ref().encode_wide().chain(once(0)).collect()
}

pub fn decode_wide(mut wide_c_string: &[u16]) -> OsString {
    if let Some(null_pos) = wide_c_string.iter().position(|c| *c == 0) {
        wide_c_string = &wide_c_string[..null_pos];
    }

    OsString::from_wide(wide_c_string)
}

/// Turn a failed Win32/COM call into the workspace error, keeping its `HRESULT`.
pub(crate) fn native(context: &'static str) -> impl FnOnce(windows::core::Error) -> Error {
    move |err| Error::native(context, err.code().0, err.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_round_trip() {
        let wide = encode_wide("Eigenschaften");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(decode_wide(&wide), OsString::from("Eigenschaften"));
    }

    #[test]
    fn decode_stops_at_first_nul() {
        let buffer = [b'c' as u16, b'u' as u16, b't' as u16, 0, b'x' as u16];
        assert_eq!(decode_wide(&buffer), OsString::from("cut"));
    }

    #[test]
    fn native_errors_keep_their_code() {
        let access_denied = windows::core::HRESULT(0x8007_0005_u32 as i32);
        let err = native("DeleteMenu")(windows::core::Error::from_hresult(access_denied));
        assert_eq!(err.code(), Some(0x8007_0005_u32 as i32));
    }
}
