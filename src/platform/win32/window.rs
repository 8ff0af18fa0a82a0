// ── Splash window ─────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register / unregister the splash window class.
//   • Create the borderless tool window and attach its state.
//   • Run the Win32 message loop.
//   • Translate WM_* messages for `SplashWindowState::handle` and carry out
//     the returned effects.
//
// The state cell is owned by the splash thread (see `lifecycle`).  Its
// address travels through CreateWindowExW's lpParam and lives in
// GWLP_USERDATA from WM_NCCREATE until WM_NCDESTROY.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::{
            CreateCompatibleDC, DeleteDC, SelectObject, SetStretchBltMode, StretchBlt, HALFTONE,
            HDC, HGDIOBJ, SRCCOPY,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetCursorPos,
            GetMessageW, GetWindowLongPtrW, IsDialogMessageW, IsWindow, LoadCursorW,
            PostMessageW, PostQuitMessage, RegisterClassW, SetWindowLongPtrW, SetWindowPos,
            TranslateMessage, UnregisterClassW, CREATESTRUCTW, CW_USEDEFAULT, GWLP_USERDATA,
            IDC_ARROW, HMENU, MSG, SWP_NOACTIVATE, SWP_NOZORDER, WM_CLOSE, WM_DPICHANGED, WM_ENTERIDLE,
            WM_ERASEBKGND, WM_MOVING, WM_NCCREATE, WM_NCDESTROY, WM_NCHITTEST, WNDCLASSW,
            WS_EX_TOOLWINDOW, WS_POPUP, WS_VISIBLE,
        },
    },
};

use super::{dialogs, dpi, last_error, resources, win32_error, GdiBitmap};
use crate::error::Result;
use crate::placement::{Monitor, Placement, Point, Rect, Size};
use crate::platform::{SplashPlatform, StateCell};
use crate::procedure::{Disposition, Effect, Message, Response};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register the splash window class.
const CLASS_NAME: PCWSTR = w!("SplashScreenWindow");

type SplashCell = StateCell<Win32Platform>;

/// A window handle that can cross threads (and processes, as a number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub fn from_hwnd(hwnd: HWND) -> Self {
        Self(hwnd.0 as isize)
    }

    /// Rebuild a handle received as a number, e.g. on the command line.
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> isize {
        self.0
    }

    pub fn hwnd(self) -> HWND {
        HWND(self.0 as *mut c_void)
    }
}

// ── Platform ──────────────────────────────────────────────────────────────────

/// The Win32 window system, resolving resources from one module.
#[derive(Debug, Clone, Copy)]
pub struct Win32Platform {
    // HINSTANCE as an integer so the platform can be sent to the splash thread.
    instance: isize,
}

impl Win32Platform {
    /// Use the resources of the running executable.
    pub fn current_module() -> Result<Self> {
        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
        // always valid for the process lifetime.
        let hmodule =
            unsafe { GetModuleHandleW(None) }.map_err(|e| win32_error("GetModuleHandleW", e))?;
        Ok(Self {
            instance: hmodule.0 as isize,
        })
    }

    /// Use the resources of an already loaded module.
    pub fn from_instance(instance: HINSTANCE) -> Self {
        Self {
            instance: instance.0 as isize,
        }
    }

    fn instance(&self) -> HINSTANCE {
        HINSTANCE(self.instance as *mut c_void)
    }
}

impl SplashPlatform for Win32Platform {
    type Window = WindowHandle;
    type Bitmap = GdiBitmap;

    fn load_configuration_record(&self, id: u16) -> Result<Vec<u8>> {
        resources::read_rcdata(self.instance(), id)
    }

    fn load_bitmap(&self, resource_id: u16) -> Result<(GdiBitmap, Size)> {
        resources::load_bitmap(self.instance(), resource_id)
    }

    fn cursor_position(&self) -> Option<Point> {
        let mut pt = POINT::default();
        // SAFETY: pt is a valid out-pointer for the duration of the call.
        unsafe { GetCursorPos(&mut pt) }
            .ok()
            .map(|()| Point::new(pt.x, pt.y))
    }

    fn monitor_at(&self, point: Point) -> Result<Monitor> {
        dpi::monitor_at(point)
    }

    fn is_window(&self, window: WindowHandle) -> bool {
        // SAFETY: IsWindow accepts any value, including stale handles.
        unsafe { IsWindow(window.hwnd()) }.as_bool()
    }

    fn register_class(&self) -> Result<()> {
        // SAFETY: LoadCursorW with IDC_ARROW loads a built-in cursor that
        // exists on all Windows versions.
        let cursor =
            unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(|e| win32_error("LoadCursorW", e))?;

        let wndclass = WNDCLASSW {
            lpfnWndProc: Some(wnd_proc),
            hInstance: self.instance(),
            hCursor: cursor,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };

        // SAFETY: wndclass is fully initialised with valid handles;
        // CLASS_NAME is a valid null-terminated UTF-16 string literal.
        let atom = unsafe { RegisterClassW(&wndclass) };
        if atom == 0 {
            return Err(last_error("RegisterClassW"));
        }

        Ok(())
    }

    fn unregister_class(&self) {
        // SAFETY: every window of the class has been destroyed by the time the
        // splash thread tears down.
        if let Err(e) = unsafe { UnregisterClassW(CLASS_NAME, self.instance()) } {
            log::warn!("UnregisterClassW failed: {e}");
        }
    }

    fn create_window(
        &self,
        caption: Option<&str>,
        placement: Placement,
        cell: &SplashCell,
    ) -> Result<WindowHandle> {
        let (x, y) = match placement {
            Placement::At(origin) => (origin.x, origin.y),
            Placement::SystemDefault => (CW_USEDEFAULT, CW_USEDEFAULT),
        };
        // Released before CreateWindowExW: WM_NCCREATE borrows the cell.
        let size = cell.borrow().current_size();

        let caption_wide: Option<Vec<u16>> =
            caption.map(|c| c.encode_utf16().chain(std::iter::once(0)).collect());
        let caption_ptr = caption_wide
            .as_ref()
            .map_or(PCWSTR::null(), |c| PCWSTR(c.as_ptr()));

        // SAFETY: CLASS_NAME was registered by this thread; caption_wide outlives
        // the call; the cell pointer stays valid until the splash thread's
        // teardown, which destroys the window first.
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_TOOLWINDOW,
                CLASS_NAME,
                caption_ptr,
                WS_POPUP | WS_VISIBLE,
                x,
                y,
                size.cx,
                size.cy,
                HWND::default(),
                HMENU::default(),
                self.instance(),
                Some(cell as *const SplashCell as *const c_void),
            )
        }
        .map_err(|e| win32_error("CreateWindowExW", e))?;

        Ok(WindowHandle::from_hwnd(hwnd))
    }

    fn pump_messages(&self, cell: &SplashCell) -> Result<()> {
        let splash = cell
            .borrow()
            .window()
            .map(WindowHandle::hwnd)
            .unwrap_or_default();
        let mut msg = MSG::default();

        loop {
            // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
            // messages for all windows on this thread; 0,0 filter accepts all.
            let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

            match ret.0 {
                // GetMessageW returns -1 on error.
                -1 => return Err(last_error("GetMessageW")),
                // Returns 0 when WM_QUIT is retrieved.
                0 => break,
                _ => unsafe {
                    // SAFETY: msg was populated by a successful GetMessageW call.
                    if !IsDialogMessageW(splash, &msg).as_bool() {
                        let _ = TranslateMessage(&msg);
                        DispatchMessageW(&msg);
                    }
                },
            }
        }

        Ok(())
    }

    fn destroy_window(&self, window: WindowHandle) {
        // SAFETY: only called on the thread that created the window.
        if let Err(e) = unsafe { DestroyWindow(window.hwnd()) } {
            log::warn!("DestroyWindow failed: {e}");
        }
    }

    fn post_close(&self, window: WindowHandle) {
        if let Err(e) = request_close(window) {
            log::warn!("failed to close splash window {window:?}: {e}");
        }
    }

    fn format_error(&self, code: u32) -> Option<String> {
        dialogs::format_error(code)
    }

    fn show_error_dialog(&self, title: &str, message: &str) -> Result<()> {
        dialogs::show_error_dialog(title, message)
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call.  A panic must not unwind out of here, so the state is
// only ever try-borrowed.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let cell = if msg == WM_NCCREATE {
        // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW whose
        // lpCreateParams is the cell passed to CreateWindowExW.
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        let cell = create.lpCreateParams as *const SplashCell;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, cell as isize);
        cell
    } else {
        GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const SplashCell
    };

    // Messages before WM_NCCREATE or after WM_NCDESTROY.
    if cell.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
    // SAFETY: the pointer was stored at WM_NCCREATE and is cleared at
    // WM_NCDESTROY; the splash thread keeps the cell alive in between.
    let cell = &*cell;

    let Some(message) = translate(hwnd, msg, wparam, lparam) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    let response = match cell.try_borrow_mut() {
        Ok(mut state) => state.handle(message),
        Err(_) => return DefWindowProcW(hwnd, msg, wparam, lparam),
    };

    respond(cell, hwnd, msg, wparam, lparam, response)
}

/// Map the WM_* messages the splash window cares about.
unsafe fn translate(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<Message<WindowHandle>> {
    let message = match msg {
        WM_NCCREATE => {
            // SAFETY: see wnd_proc.
            let create = &*(lparam.0 as *const CREATESTRUCTW);
            Message::NcCreate {
                window: WindowHandle::from_hwnd(hwnd),
                dpi: dpi::for_window(hwnd),
                origin: Point::new(create.x, create.y),
            }
        }
        WM_ERASEBKGND => Message::EraseBackground,
        WM_NCHITTEST => Message::HitTest,
        WM_DPICHANGED => {
            // HIWORD(wparam) is the Y-axis DPI; X and Y are always equal.
            // SAFETY: for WM_DPICHANGED lparam points at the suggested RECT.
            let suggested: RECT = *(lparam.0 as *const RECT);
            Message::DpiChanged {
                dpi: ((wparam.0 >> 16) & 0xFFFF) as u32,
                suggested: Rect::new(
                    suggested.left,
                    suggested.top,
                    suggested.right,
                    suggested.bottom,
                ),
            }
        }
        WM_ENTERIDLE => Message::EnterIdle,
        WM_MOVING => Message::Moving,
        WM_CLOSE => Message::Close,
        WM_NCDESTROY => Message::NcDestroy,
        _ => return None,
    };
    Some(message)
}

/// Run default processing if asked, then carry out the effects in order.
unsafe fn respond(
    cell: &SplashCell,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    response: Response<WindowHandle>,
) -> LRESULT {
    let result = match response.disposition {
        Disposition::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
        Disposition::Handled(value) => LRESULT(value),
    };

    for effect in response.effects {
        match effect {
            Effect::Reposition { origin, size } => {
                if let Err(e) = reposition(hwnd, origin, size) {
                    log::warn!("failed to rescale splash window: {e}");
                }
            }
            Effect::Paint { source, target } => {
                if let Ok(state) = cell.try_borrow() {
                    // SAFETY: for WM_ERASEBKGND wparam is the window's HDC.
                    paint(HDC(wparam.0 as *mut c_void), state.bitmap(), source, target);
                }
            }
            Effect::PostClose(previous) => {
                if let Err(e) = request_close(previous) {
                    log::warn!("failed to close previous splash window {previous:?}: {e}");
                }
            }
            Effect::Detach => {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            }
            Effect::Quit => PostQuitMessage(0),
        }
    }

    result
}

/// Move and resize `hwnd` without activating it or changing its z-order.
fn reposition(hwnd: HWND, origin: Point, size: Size) -> Result<()> {
    // SAFETY: SetWindowPos validates the handle and fails on a stale one.
    unsafe {
        SetWindowPos(
            hwnd,
            HWND::default(),
            origin.x,
            origin.y,
            size.cx,
            size.cy,
            SWP_NOACTIVATE | SWP_NOZORDER,
        )
    }
    .map_err(|e| win32_error("SetWindowPos", e))
}

/// Post `WM_CLOSE` to a window owned by any thread or process.
fn request_close(window: WindowHandle) -> Result<()> {
    // SAFETY: posting to a stale or foreign handle fails cleanly.
    unsafe { PostMessageW(window.hwnd(), WM_CLOSE, WPARAM(0), LPARAM(0)) }
        .map_err(|e| win32_error("PostMessageW", e))
}

/// Stretch the bitmap from its logical size over the window's current size.
unsafe fn paint(hdc: HDC, bitmap: &GdiBitmap, source: Size, target: Size) {
    // SAFETY: hdc is valid for the duration of WM_ERASEBKGND; the memory DC is
    // created, used and deleted here, with the original bitmap reselected
    // before deletion so the splash bitmap is never left selected.
    let mem = CreateCompatibleDC(hdc);
    let original = SelectObject(mem, HGDIOBJ(bitmap.handle().0));
    SetStretchBltMode(hdc, HALFTONE);
    let _ = StretchBlt(
        hdc, 0, 0, target.cx, target.cy, mem, 0, 0, source.cx, source.cy, SRCCOPY,
    );
    SelectObject(mem, original);
    let _ = DeleteDC(mem);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
