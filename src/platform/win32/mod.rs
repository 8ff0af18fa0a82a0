// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use windows::Win32::Foundation::GetLastError;

use crate::error::{hresult_from_win32, SplashError};

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // error alert and system message text
pub mod dpi; // per-monitor DPI and work-area lookup
pub mod resources; // configuration record and bitmap resources
pub mod window; // splash window class, WndProc, message loop

pub use resources::GdiBitmap;
pub use window::{Win32Platform, WindowHandle};

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `SplashError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(crate) fn last_error(function: &'static str) -> SplashError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    SplashError::Win32 {
        function,
        code: hresult_from_win32(code.0 as i32),
    }
}

/// Name a `windows::core::Error` after the function that produced it.
pub(crate) fn win32_error(function: &'static str, e: windows::core::Error) -> SplashError {
    SplashError::Win32 {
        function,
        code: e.code().0 as u32,
    }
}
