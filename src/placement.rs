// ── Geometry, DPI scaling and window placement ────────────────────────────────
//
// Pure Rust; the monitor lookup itself is supplied by the caller so this
// module can be exercised without a window system.

use crate::{error::SplashError, state::SplashWindowState};

/// DPI at which bitmaps are authored (100 % scaling).
pub const DEFAULT_DPI: u32 = 96;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

impl Size {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Scale a size authored at [`DEFAULT_DPI`] to `dpi`.
    pub fn scaled(self, dpi: u32) -> Self {
        Self {
            cx: scale(self.cx, dpi),
            cy: scale(self.cy, dpi),
        }
    }
}

/// Screen rectangle, right/bottom exclusive (Win32 `RECT` semantics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Top-left corner that centers `size` in this rectangle.
    ///
    /// A size larger than the rectangle overhangs evenly on both sides.
    pub fn center(&self, size: Size) -> Point {
        Point::new(
            self.left + (self.width() - size.cx) / 2,
            self.top + (self.height() - size.cy) / 2,
        )
    }
}

/// What the monitor resolver reports for a screen point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Monitor area minus the taskbar and other reserved UI.
    pub work_area: Rect,
    pub dpi: u32,
}

/// Where the splash window should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-left corner of the window, centered on the resolved monitor.
    At(Point),
    /// Let the window system pick (`CW_USEDEFAULT`).
    SystemDefault,
}

/// Scale a pixel value defined at 96 DPI to `dpi`.
///
/// Rounds to nearest, half away from zero, the same as `MulDiv(px, dpi, 96)`.
pub fn scale(px: i32, dpi: u32) -> i32 {
    let num = i64::from(px) * i64::from(dpi);
    let base = i64::from(DEFAULT_DPI);
    let half = if num < 0 { -base / 2 } else { base / 2 };
    ((num + half) / base) as i32
}

/// Resolve the creation placement for `state`.
///
/// Uses the monitor under `cursor` (or the origin if the cursor position is
/// unknown).  On success the state is rescaled to that monitor's DPI and the
/// window is centered in its work area.  A failed lookup is logged and
/// degrades to [`Placement::SystemDefault`]; it never fails the caller.
pub fn resolve<W, B, F>(
    cursor: Option<Point>,
    monitor_at: F,
    state: &mut SplashWindowState<W, B>,
) -> Placement
where
    W: Copy + Eq,
    F: FnOnce(Point) -> crate::error::Result<Monitor>,
{
    let point = cursor.unwrap_or_default();

    match monitor_at(point) {
        Ok(monitor) => {
            if monitor.dpi != state.current_dpi() {
                state.apply_dpi(monitor.dpi);
            }
            Placement::At(monitor.work_area.center(state.current_size()))
        }
        Err(SplashError::NoMonitor { x, y }) => {
            log::warn!("no monitor at ({x}, {y}); using default splash screen placement");
            Placement::SystemDefault
        }
        Err(e) => {
            log::warn!("monitor lookup failed: {e}; using default splash screen placement");
            Placement::SystemDefault
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
