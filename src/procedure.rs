// ── Window procedure ──────────────────────────────────────────────────────────
//
// The splash window's message handling, expressed as a pure state machine.
// The platform translates OS messages into `Message`, calls
// `SplashWindowState::handle`, then carries out the returned `Response`
// after the state borrow has ended.  Nothing in here touches the OS, so the
// transitions can be driven by synthetic message sequences.
//
//   Uncreated ──NcCreate──▶ Created ──EraseBackground──▶ Active
//        Created | Active ──Close──▶ Closing ──NcDestroy──▶ Destroyed

use crate::placement::{Point, Rect, Size};
use crate::state::{SplashWindowState, WindowPhase};

/// `HTCAPTION`: the hit-test answer that makes any pixel a drag handle.
pub const HT_CAPTION: isize = 2;

/// The messages the splash window reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<W> {
    /// First message a new window receives (`WM_NCCREATE`).
    NcCreate {
        window: W,
        /// DPI of the monitor the window is being created on.
        dpi: u32,
        /// Position the window is being created at.
        origin: Point,
    },
    /// `WM_ERASEBKGND`: the whole client area is drawn from the bitmap.
    EraseBackground,
    /// `WM_NCHITTEST`.
    HitTest,
    /// `WM_DPICHANGED` with the rectangle suggested by the system.
    DpiChanged { dpi: u32, suggested: Rect },
    /// `WM_ENTERIDLE`.
    EnterIdle,
    /// `WM_MOVING`.
    Moving,
    /// `WM_CLOSE`.
    Close,
    /// `WM_NCDESTROY`, the last message a window receives.
    NcDestroy,
}

/// Whether the platform's default handling runs, or a value is returned as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Run the default window procedure first, then apply the effects and
    /// return its result.
    Default,
    /// Apply the effects and return this value.
    Handled(isize),
}

/// Something the platform must do on the procedure's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect<W> {
    /// Move and resize the splash window.
    Reposition { origin: Point, size: Size },
    /// Stretch the bitmap from `source` into a `target` rectangle at (0, 0)
    /// with a smoothing filter.
    Paint { source: Size, target: Size },
    /// Post a close request to another window.
    PostClose(W),
    /// Clear the window's per-instance state slot.
    Detach,
    /// End the splash thread's message loop.
    Quit,
}

/// What to do in answer to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<W> {
    pub disposition: Disposition,
    pub effects: Vec<Effect<W>>,
}

impl<W> Response<W> {
    fn default_handling() -> Self {
        Self {
            disposition: Disposition::Default,
            effects: Vec::new(),
        }
    }

    fn handled(value: isize) -> Self {
        Self {
            disposition: Disposition::Handled(value),
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect<W>) -> Self {
        self.effects.push(effect);
        self
    }

    fn with_opt(self, effect: Option<Effect<W>>) -> Self {
        match effect {
            Some(effect) => self.with(effect),
            None => self,
        }
    }
}

impl<W: Copy + Eq, B> SplashWindowState<W, B> {
    /// Handle one window message.
    pub fn handle(&mut self, message: Message<W>) -> Response<W> {
        match message {
            Message::NcCreate { window, dpi, origin } => self.on_nc_create(window, dpi, origin),

            Message::EraseBackground if self.phase().is_live() => {
                self.set_phase(WindowPhase::Active);
                Response::handled(1).with(Effect::Paint {
                    source: self.logical_size(),
                    target: self.current_size(),
                })
            }

            // No title bar: the whole window drags.
            Message::HitTest => Response::handled(HT_CAPTION),

            Message::DpiChanged { dpi, suggested } if self.phase().is_live() => {
                if dpi == self.current_dpi() {
                    return Response::default_handling();
                }
                let reposition = self.rescale(dpi, suggested.origin());
                Response::handled(0).with_opt(reposition)
            }

            // Close the old splash screen only once this one has painted, so
            // there is no visible gap between the two.
            Message::EnterIdle | Message::Moving if self.phase() == WindowPhase::Active => {
                let handoff = self.take_previous().map(Effect::PostClose);
                Response::default_handling().with_opt(handoff)
            }

            Message::Close if self.phase().is_live() => {
                self.set_phase(WindowPhase::Closing);
                Response::default_handling()
            }

            Message::NcDestroy if self.window().is_some() && self.phase() != WindowPhase::Destroyed => {
                self.set_phase(WindowPhase::Destroyed);
                Response::default_handling()
                    .with(Effect::Detach)
                    .with(Effect::Quit)
            }

            _ => Response::default_handling(),
        }
    }

    fn on_nc_create(&mut self, window: W, dpi: u32, origin: Point) -> Response<W> {
        if !self.attach(window) {
            return Response::default_handling();
        }
        if dpi == self.current_dpi() {
            return Response::default_handling();
        }
        let reposition = self.rescale(dpi, origin);
        Response::default_handling().with_opt(reposition)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    type State = SplashWindowState<u32, ()>;

    const WINDOW: u32 = 10;
    const PREVIOUS: u32 = 3;

    fn create(state: &mut State, dpi: u32) -> Response<u32> {
        state.handle(Message::NcCreate {
            window: WINDOW,
            dpi,
            origin: Point::new(100, 50),
        })
    }

    fn active(previous: Option<u32>) -> State {
        let mut s = State::new((), Size::new(400, 300), previous);
        create(&mut s, 96);
        s.handle(Message::EraseBackground);
        s
    }

    #[test]
    fn nc_create_attaches_without_rescale_at_same_dpi() {
        let mut s = State::new((), Size::new(400, 300), None);
        let r = create(&mut s, 96);
        assert_eq!(r, Response { disposition: Disposition::Default, effects: vec![] });
        assert_eq!(s.window(), Some(WINDOW));
        assert_eq!(s.phase(), WindowPhase::Created);
    }

    #[test]
    fn nc_create_rescales_on_different_dpi() {
        let mut s = State::new((), Size::new(400, 300), None);
        let r = create(&mut s, 144);
        assert_eq!(r.disposition, Disposition::Default);
        assert_eq!(
            r.effects,
            vec![Effect::Reposition { origin: Point::new(100, 50), size: Size::new(600, 450) }]
        );
        assert_eq!(s.current_dpi(), 144);
    }

    #[test]
    fn second_nc_create_is_ignored() {
        let mut s = State::new((), Size::new(400, 300), None);
        create(&mut s, 96);
        let r = s.handle(Message::NcCreate { window: 99, dpi: 192, origin: Point::default() });
        assert!(r.effects.is_empty());
        assert_eq!(s.window(), Some(WINDOW));
        assert_eq!(s.current_dpi(), 96);
    }

    #[test]
    fn erase_background_paints_and_activates() {
        let mut s = State::new((), Size::new(400, 300), None);
        create(&mut s, 144);
        let r = s.handle(Message::EraseBackground);
        assert_eq!(r.disposition, Disposition::Handled(1));
        assert_eq!(
            r.effects,
            vec![Effect::Paint { source: Size::new(400, 300), target: Size::new(600, 450) }]
        );
        assert_eq!(s.phase(), WindowPhase::Active);
    }

    #[test]
    fn erase_before_creation_is_default() {
        let mut s = State::new((), Size::new(400, 300), None);
        let r = s.handle(Message::EraseBackground);
        assert_eq!(r.disposition, Disposition::Default);
        assert_eq!(s.phase(), WindowPhase::Uncreated);
    }

    #[test]
    fn hit_test_is_caption_everywhere() {
        let mut s = State::new((), Size::new(1, 1), None);
        assert_eq!(s.handle(Message::HitTest).disposition, Disposition::Handled(HT_CAPTION));
        let mut s = active(None);
        assert_eq!(s.handle(Message::HitTest).disposition, Disposition::Handled(HT_CAPTION));
    }

    #[test]
    fn dpi_change_repositions_to_suggested_origin() {
        let mut s = active(None);
        let r = s.handle(Message::DpiChanged {
            dpi: 144,
            suggested: Rect::new(2000, 100, 2600, 550),
        });
        assert_eq!(r.disposition, Disposition::Handled(0));
        assert_eq!(
            r.effects,
            vec![Effect::Reposition { origin: Point::new(2000, 100), size: Size::new(600, 450) }]
        );
    }

    #[test]
    fn unchanged_dpi_is_not_handled() {
        let mut s = active(None);
        let r = s.handle(Message::DpiChanged { dpi: 96, suggested: Rect::default() });
        assert_eq!(r, Response { disposition: Disposition::Default, effects: vec![] });
    }

    #[test]
    fn dpi_round_trip_restores_logical_size() {
        let mut s = active(None);
        for dpi in [120, 144, 168, 192, 120, 96] {
            s.handle(Message::DpiChanged { dpi, suggested: Rect::default() });
        }
        assert_eq!(s.current_size(), Size::new(400, 300));
    }

    #[test]
    fn handoff_closes_previous_exactly_once() {
        let mut s = active(Some(PREVIOUS));
        let mut closes = 0;
        for i in 0..20 {
            let msg = if i % 2 == 0 { Message::Moving } else { Message::EnterIdle };
            let r = s.handle(msg);
            assert_eq!(r.disposition, Disposition::Default);
            closes += r
                .effects
                .iter()
                .filter(|e| **e == Effect::PostClose(PREVIOUS))
                .count();
        }
        assert_eq!(closes, 1);
        assert_eq!(s.previous(), None);
    }

    #[test]
    fn handoff_waits_for_first_paint() {
        let mut s = State::new((), Size::new(400, 300), Some(PREVIOUS));
        create(&mut s, 96);
        assert!(s.handle(Message::Moving).effects.is_empty());
        assert_eq!(s.previous(), Some(PREVIOUS));

        s.handle(Message::EraseBackground);
        assert_eq!(s.handle(Message::EnterIdle).effects, vec![Effect::PostClose(PREVIOUS)]);
    }

    #[test]
    fn close_then_destroy_quits_the_loop() {
        let mut s = active(None);
        assert_eq!(s.handle(Message::Close).disposition, Disposition::Default);
        assert_eq!(s.phase(), WindowPhase::Closing);

        let r = s.handle(Message::NcDestroy);
        assert_eq!(r.disposition, Disposition::Default);
        assert_eq!(r.effects, vec![Effect::Detach, Effect::Quit]);
        assert_eq!(s.phase(), WindowPhase::Destroyed);
    }

    #[test]
    fn destroy_without_close_still_quits() {
        let mut s = active(None);
        assert_eq!(s.handle(Message::NcDestroy).effects, vec![Effect::Detach, Effect::Quit]);
    }

    #[test]
    fn destroyed_window_ignores_everything_but_hit_test() {
        let mut s = active(Some(PREVIOUS));
        s.handle(Message::NcDestroy);
        for msg in [
            Message::EraseBackground,
            Message::Moving,
            Message::EnterIdle,
            Message::Close,
            Message::NcDestroy,
            Message::DpiChanged { dpi: 192, suggested: Rect::default() },
        ] {
            assert!(s.handle(msg).effects.is_empty(), "{msg:?}");
        }
        assert_eq!(s.phase(), WindowPhase::Destroyed);
        // The handoff never happened, so the previous window is still held
        // for the thread's teardown to close.
        assert_eq!(s.previous(), Some(PREVIOUS));
    }
}
