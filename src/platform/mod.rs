// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the splash lifecycle uses to talk to the
// OS.  No `unsafe` lives here; all Win32 FFI is confined to the `win32`
// sub-module and never leaks outward.

use std::cell::RefCell;
use std::fmt;

use crate::error::Result;
use crate::placement::{Monitor, Placement, Point, Size};
use crate::state::SplashWindowState;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod testing;

/// The splash state as shared between the splash thread and the window
/// procedure.  Borrows are never held across a call back into the OS.
pub type StateCell<P> =
    RefCell<SplashWindowState<<P as SplashPlatform>::Window, <P as SplashPlatform>::Bitmap>>;

/// Everything the splash lifecycle needs from the host window system.
///
/// A value is cloned into each splash thread.  Unless noted, methods are
/// called on that thread.
pub trait SplashPlatform: Clone + Send + 'static {
    /// Identity of an OS window.
    type Window: Copy + Eq + fmt::Debug + Send + 'static;

    /// An owned bitmap.  Dropping it releases the OS object.
    type Bitmap;

    /// Read the raw configuration record with resource id `id`.
    ///
    /// Called on the requesting thread.
    fn load_configuration_record(&self, id: u16) -> Result<Vec<u8>>;

    /// Load a bitmap resource and report its natural size.
    fn load_bitmap(&self, resource_id: u16) -> Result<(Self::Bitmap, Size)>;

    /// Current mouse position, if it can be read.
    fn cursor_position(&self) -> Option<Point>;

    /// Work area and DPI of the monitor containing `point`.
    fn monitor_at(&self, point: Point) -> Result<Monitor>;

    /// `true` if `window` still refers to an existing window.
    fn is_window(&self, window: Self::Window) -> bool;

    /// Register the splash window class.
    fn register_class(&self) -> Result<()>;

    /// Undo [`register_class`](Self::register_class).
    fn unregister_class(&self);

    /// Create the splash window.
    ///
    /// The new window must deliver `Message::NcCreate` to the state in
    /// `cell` before this returns, and route its later messages to it.
    fn create_window(
        &self,
        caption: Option<&str>,
        placement: Placement,
        cell: &StateCell<Self>,
    ) -> Result<Self::Window>;

    /// Dispatch messages until the splash window's `Effect::Quit`.
    fn pump_messages(&self, cell: &StateCell<Self>) -> Result<()>;

    /// Destroy a window owned by the calling thread.
    fn destroy_window(&self, window: Self::Window);

    /// Ask a window, possibly owned by another thread or process, to close.
    fn post_close(&self, window: Self::Window);

    /// System text for an HRESULT, if there is one.
    ///
    /// May be called from any thread.
    fn format_error(&self, code: u32) -> Option<String>;

    /// Show a modal error alert.
    ///
    /// May be called from any thread.
    fn show_error_dialog(&self, title: &str, message: &str) -> Result<()>;
}
