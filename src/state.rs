// ── Splash window state ───────────────────────────────────────────────────────
//
// One `SplashWindowState` exists per splash window.  It is created on the
// splash thread, lent to the window procedure through the window's
// per-instance slot, and dropped when the thread exits.  Dropping it releases
// the bitmap.

use crate::placement::{Point, Size, DEFAULT_DPI};
use crate::procedure::Effect;

/// Where a splash window is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    /// No OS window exists yet.
    Uncreated,
    /// The window exists but has not painted.
    Created,
    /// The window has painted at least once.
    Active,
    /// A close request was accepted; destruction is under way.
    Closing,
    /// The window is gone.  Terminal.
    Destroyed,
}

impl WindowPhase {
    /// `true` while the OS window exists and is not being torn down.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Created | Self::Active)
    }
}

/// Live record for one splash window.
///
/// `W` is the window identity, `B` the owned bitmap.  The previous window is
/// held by identity only; its lifetime belongs to whoever created it.
#[derive(Debug)]
pub struct SplashWindowState<W, B> {
    bitmap: B,
    logical_size: Size,
    current_size: Size,
    current_dpi: u32,
    window: Option<W>,
    previous: Option<W>,
    phase: WindowPhase,
}

impl<W: Copy + Eq, B> SplashWindowState<W, B> {
    /// A state at [`DEFAULT_DPI`] for a bitmap of `logical_size`.
    pub fn new(bitmap: B, logical_size: Size, previous: Option<W>) -> Self {
        Self {
            bitmap,
            logical_size,
            current_size: logical_size,
            current_dpi: DEFAULT_DPI,
            window: None,
            previous,
            phase: WindowPhase::Uncreated,
        }
    }

    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    pub fn logical_size(&self) -> Size {
        self.logical_size
    }

    pub fn current_size(&self) -> Size {
        self.current_size
    }

    pub fn current_dpi(&self) -> u32 {
        self.current_dpi
    }

    pub fn window(&self) -> Option<W> {
        self.window
    }

    pub fn previous(&self) -> Option<W> {
        self.previous
    }

    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    /// Record `dpi` and recompute the on-screen size from the logical size.
    ///
    /// Returns `true` when the DPI actually changed.
    pub fn apply_dpi(&mut self, dpi: u32) -> bool {
        let changed = dpi != self.current_dpi;
        self.current_dpi = dpi;
        self.current_size = self.logical_size.scaled(dpi);
        changed
    }

    /// Apply `dpi` and, if the window exists, produce the move/resize that
    /// puts it at `origin` with the new size.
    pub(crate) fn rescale(&mut self, dpi: u32, origin: Point) -> Option<Effect<W>> {
        self.apply_dpi(dpi);
        self.window.map(|_| Effect::Reposition {
            origin,
            size: self.current_size,
        })
    }

    /// Tie this state to its OS window.  Only the first call has any effect.
    pub(crate) fn attach(&mut self, window: W) -> bool {
        if self.window.is_some() {
            return false;
        }
        self.window = Some(window);
        self.phase = WindowPhase::Created;
        true
    }

    pub(crate) fn set_phase(&mut self, phase: WindowPhase) {
        self.phase = phase;
    }

    /// Read-and-clear the previous window.  Yields it at most once.
    pub fn take_previous(&mut self) -> Option<W> {
        self.previous.take()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
