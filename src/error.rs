// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in the crate return `error::Result<T>`.  None of
// these errors crash the host: configuration and resource failures abort the
// splash window only, and placement failures never leave `placement`.

use thiserror::Error;

/// `HRESULT_FROM_WIN32(ERROR_INVALID_DATA)`.
pub const E_INVALIDDATA: u32 = 0x8007_000D;

/// Generic failure `HRESULT`.
pub const E_FAIL: u32 = 0x8000_4005;

/// Every error the splash screen can produce.
#[derive(Debug, Error)]
pub enum SplashError {
    /// The configuration resource could not be found or read.
    #[error("failed to read splash screen configuration resource {resource_id} (error {code:#010x})")]
    ConfigurationMissing { resource_id: u16, code: u32 },

    /// The configuration resource exists but has the wrong length.
    #[error("splash screen configuration resource is {actual} bytes, expected {expected}")]
    ConfigurationSize { expected: usize, actual: usize },

    /// The configuration discriminant is not a known splash screen type.
    #[error("invalid splash screen type: {0}")]
    InvalidConfiguration(u32),

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// No monitor could be resolved for a screen point.
    #[error("no monitor at ({x}, {y})")]
    NoMonitor { x: i32, y: i32 },

    /// The splash screen thread could not be started.
    #[error("failed to create splash screen thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file of the `splashscreen` binary is malformed.
    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),
}

impl SplashError {
    /// An HRESULT-style code for this error, suitable for
    /// [`display_error`](crate::display_error).
    pub fn code(&self) -> u32 {
        match self {
            Self::ConfigurationMissing { code, .. } | Self::Win32 { code, .. } => *code,
            Self::ConfigurationSize { .. } | Self::InvalidConfiguration(_) | Self::Settings(_) => {
                E_INVALIDDATA
            }
            Self::NoMonitor { .. } => E_FAIL,
            Self::ThreadSpawn(e) | Self::Io(e) => e
                .raw_os_error()
                .map(hresult_from_win32)
                .unwrap_or(E_FAIL),
        }
    }

    /// `true` for failures of the configuration record itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing { .. }
                | Self::ConfigurationSize { .. }
                | Self::InvalidConfiguration(_)
        )
    }
}

/// Map a Win32 error code onto the `FACILITY_WIN32` HRESULT space.
///
/// Values that already look like HRESULTs (or zero) pass through unchanged.
pub fn hresult_from_win32(code: i32) -> u32 {
    let code = code as u32;
    if code as i32 <= 0 {
        code
    } else {
        (code & 0x0000_FFFF) | 0x8007_0000
    }
}

// Convert a windows-crate error (HRESULT) directly into a SplashError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for SplashError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SplashError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
