// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! A borderless, DPI-aware splash window shown while a host application
//! starts up, with hand-off from a splash window shown by an earlier process.
//!
//! The lifecycle, placement and window procedure are platform-neutral and
//! talk to the OS through [`SplashPlatform`].  On Windows,
//! [`platform::win32::Win32Platform`] provides the real implementation.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod placement;
pub mod platform;
pub mod procedure;
pub mod settings;
pub mod state;

pub use config::{SplashConfiguration, SplashType};
pub use error::{Result, SplashError};
pub use lifecycle::{create_splash_window, display_error, DisplayMode};
pub use placement::{Monitor, Placement, Point, Rect, Size};
pub use platform::SplashPlatform;
pub use settings::Settings;
pub use state::{SplashWindowState, WindowPhase};
