// ── DPI and monitor lookup ────────────────────────────────────────────────────
//
// The process runs Per-Monitor v2 aware, so every splash window is sized for
// the monitor it lands on.  Placement asks for the nearest monitor's work
// area and effective DPI; the window procedure asks for the window's own DPI
// at WM_NCCREATE.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{HWND, POINT},
    Graphics::Gdi::{GetMonitorInfoW, MonitorFromPoint, MONITORINFO, MONITOR_DEFAULTTONEAREST},
    UI::HiDpi::{
        GetDpiForMonitor, GetDpiForWindow, SetProcessDpiAwarenessContext,
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, MDT_EFFECTIVE_DPI,
    },
};

use super::{last_error, win32_error};
use crate::error::{Result, SplashError};
use crate::placement::{Monitor, Point, Rect, DEFAULT_DPI};

/// Make the process Per-Monitor v2 DPI aware.
///
/// Call once, before the first splash window exists.
pub fn init() {
    // SAFETY: no pointers are involved; the call fails without side effects
    // when the awareness was already set (by a manifest or an earlier call).
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// DPI of the monitor `hwnd` is on, or [`DEFAULT_DPI`] if it cannot be read.
pub(crate) fn for_window(hwnd: HWND) -> u32 {
    // SAFETY: GetDpiForWindow returns 0 for an invalid handle instead of
    // faulting.
    match unsafe { GetDpiForWindow(hwnd) } {
        0 => DEFAULT_DPI,
        dpi => dpi,
    }
}

/// Work area and effective DPI of the monitor nearest to `point`.
pub(crate) fn monitor_at(point: Point) -> Result<Monitor> {
    // SAFETY: MonitorFromPoint takes the point by value and has no other
    // preconditions.
    let hmonitor =
        unsafe { MonitorFromPoint(POINT { x: point.x, y: point.y }, MONITOR_DEFAULTTONEAREST) };
    if hmonitor.is_invalid() {
        return Err(SplashError::NoMonitor { x: point.x, y: point.y });
    }

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    // SAFETY: hmonitor was just returned by MonitorFromPoint; info is a valid
    // MONITORINFO with cbSize set, as the API requires.
    if !unsafe { GetMonitorInfoW(hmonitor, &mut info) }.as_bool() {
        return Err(last_error("GetMonitorInfoW"));
    }

    let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
    // SAFETY: both out-pointers refer to live locals.
    unsafe { GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) }
        .map_err(|e| win32_error("GetDpiForMonitor", e))?;

    let work = info.rcWork;
    Ok(Monitor {
        work_area: Rect::new(work.left, work.top, work.right, work.bottom),
        dpi: dpi_x,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
