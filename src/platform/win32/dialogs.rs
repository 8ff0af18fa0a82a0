// ── Error alert ───────────────────────────────────────────────────────────────
//
// Thin wrappers around MessageBoxW and FormatMessageW used by
// `display_error` and by `main()` when startup fails.

#![allow(unsafe_code)]

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::HWND,
        System::Diagnostics::Debug::{
            FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
        },
        UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK, MB_SYSTEMMODAL},
    },
};

use super::last_error;
use crate::error::Result;

/// Room for the longest system message text, in `WCHAR`s.
const MESSAGE_BUF_LEN: usize = 1_024;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Show a system-modal error alert with `title` and `message`.
pub fn show_error_dialog(title: &str, message: &str) -> Result<()> {
    let msg_wide = to_wide(message);
    let title_wide = to_wide(title);

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    let pressed = unsafe {
        MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR | MB_SYSTEMMODAL,
        )
    };

    if pressed.0 == 0 {
        return Err(last_error("MessageBoxW"));
    }
    Ok(())
}

/// System text for `code`, with the trailing line break removed.
pub fn format_error(code: u32) -> Option<String> {
    let mut buf = vec![0u16; MESSAGE_BUF_LEN];

    // SAFETY: buf is writable for MESSAGE_BUF_LEN WCHARs, which is the size
    // passed; no source or insert arguments are used.
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            None,
            code,
            0,
            PWSTR(buf.as_mut_ptr()),
            MESSAGE_BUF_LEN as u32,
            None,
        )
    };

    if len == 0 {
        return None;
    }

    let text = String::from_utf16_lossy(&buf[..len as usize]);
    Some(text.trim_end().to_owned())
}
