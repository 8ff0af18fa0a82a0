// ── Splash screen lifecycle ───────────────────────────────────────────────────
//
// `create_splash_window` reads the configuration on the caller's thread, then
// hands the whole window lifetime to a dedicated splash thread:
//
//   register class → load bitmap → place → create window → "initialized"
//     → pump messages until destroyed → teardown → "exited"
//
// The caller blocks only until the first of "initialized" / "exited".

use std::cell::RefCell;
use std::str::FromStr;
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{SplashConfiguration, SplashType, CONFIGURATION_RESOURCE_ID};
use crate::error::{Result, SplashError};
use crate::placement::{self, Size};
use crate::platform::{SplashPlatform, StateCell};
use crate::state::{SplashWindowState, WindowPhase};

/// Name given to every splash thread.
pub const THREAD_NAME: &str = "splash-screen";

// ── Display mode ──────────────────────────────────────────────────────────────

/// How much UI the host is allowed to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Unknown,
    /// Another process owns the UI.
    Embedded,
    /// Fully silent.
    None,
    /// Progress only, no prompts.
    Passive,
    Full,
}

impl DisplayMode {
    /// `false` for the modes in which no dialog may be shown.
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::Embedded | Self::None | Self::Passive)
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "embedded" => Ok(Self::Embedded),
            "none" => Ok(Self::None),
            "passive" => Ok(Self::Passive),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown display mode {other:?} (expected unknown, embedded, none, passive or full)"
            )),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Show the host's splash screen on a new thread.
///
/// `previous` is a splash window shown earlier (typically by a bootstrap
/// process); once the new window has painted it is asked to close.
///
/// Returns `Ok(None)` when the configuration disables the splash screen or
/// when the splash thread fails to produce a window; the failure is logged
/// and the host carries on without one.  Configuration errors are returned.
/// The window belongs to the splash thread, which runs until it is destroyed.
pub fn create_splash_window<P: SplashPlatform>(
    platform: &P,
    caption: Option<&str>,
    previous: Option<P::Window>,
) -> Result<Option<P::Window>> {
    launch(platform, caption, previous).map(|(window, _)| window)
}

/// Report `code` to the user.
///
/// The message is always logged.  The modal alert is skipped (and the call
/// succeeds) when `display` forbids UI.
pub fn display_error<P: SplashPlatform>(
    platform: &P,
    display: DisplayMode,
    host_name: &str,
    code: u32,
) -> Result<()> {
    let message = platform
        .format_error(code)
        .unwrap_or_else(|| format!("Error {code:#010x}"));

    log::info!("error message displayed because: {message}");

    if !display.is_interactive() {
        return Ok(());
    }

    platform.show_error_dialog(host_name, &message)
}

// ── Splash thread ─────────────────────────────────────────────────────────────

/// Raised by the splash thread; the requester takes whichever comes first.
enum Signal<W> {
    Initialized(W),
    Exited,
}

/// Sends `Signal::Exited` when the splash thread ends, however it ends.
struct ExitSignal<W>(SyncSender<Signal<W>>);

impl<W> Drop for ExitSignal<W> {
    fn drop(&mut self) {
        // The requester may already be gone; nothing to do then.
        let _ = self.0.try_send(Signal::Exited);
    }
}

/// [`create_splash_window`], also returning the splash thread's handle.
pub(crate) fn launch<P: SplashPlatform>(
    platform: &P,
    caption: Option<&str>,
    previous: Option<P::Window>,
) -> Result<(Option<P::Window>, Option<JoinHandle<()>>)> {
    let record = platform.load_configuration_record(CONFIGURATION_RESOURCE_ID)?;
    let configuration = SplashConfiguration::from_record(&record)?;

    let resource_id = match configuration.splash_type()? {
        SplashType::None => {
            log::debug!("splash screen disabled by configuration");
            return Ok((None, None));
        }
        SplashType::BitmapResource(id) => id,
    };

    // Room for both signals so the splash thread never blocks on them.
    let (tx, rx) = mpsc::sync_channel(2);
    let worker = platform.clone();
    let caption = caption.map(str::to_owned);

    let handle = thread::Builder::new()
        .name(THREAD_NAME.to_owned())
        .spawn(move || {
            let exited = ExitSignal(tx);
            if let Err(e) = run(&worker, caption.as_deref(), resource_id, previous, &exited.0) {
                log::error!("splash screen failed: {e}");
            }
        })
        .map_err(SplashError::ThreadSpawn)?;

    // Either signal releases us; a closed channel means the thread is gone.
    let window = match rx.recv() {
        Ok(Signal::Initialized(window)) => Some(window),
        Ok(Signal::Exited) | Err(_) => None,
    };

    Ok((window, Some(handle)))
}

/// Body of the splash thread.  Every exit path goes through `Teardown`.
fn run<P: SplashPlatform>(
    platform: &P,
    caption: Option<&str>,
    resource_id: u16,
    previous: Option<P::Window>,
    signal: &SyncSender<Signal<P::Window>>,
) -> Result<()> {
    let t0 = Instant::now();

    let previous = previous.filter(|&window| platform.is_window(window));
    let mut teardown = Teardown::new(platform, previous);

    platform.register_class()?;
    teardown.class_registered = true;

    let (bitmap, size) = platform.load_bitmap(resource_id)?;
    let cell = teardown.adopt(bitmap, size);

    let placement = placement::resolve(
        platform.cursor_position(),
        |point| platform.monitor_at(point),
        &mut *cell.borrow_mut(),
    );

    let window = platform.create_window(caption, placement, cell)?;

    log::debug!(
        "splash window {window:?} visible in {:.1} ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );
    let _ = signal.try_send(Signal::Initialized(window));

    platform.pump_messages(cell)
}

/// Releases everything the splash thread acquired, in reverse order, when it
/// goes out of scope.
struct Teardown<'a, P: SplashPlatform> {
    platform: &'a P,
    class_registered: bool,
    /// Held here until the state exists, then moved into it.
    previous: Option<P::Window>,
    state: Option<StateCell<P>>,
}

impl<'a, P: SplashPlatform> Teardown<'a, P> {
    fn new(platform: &'a P, previous: Option<P::Window>) -> Self {
        Self {
            platform,
            class_registered: false,
            previous,
            state: None,
        }
    }

    /// Take ownership of the bitmap and build the window state around it.
    fn adopt(&mut self, bitmap: P::Bitmap, size: Size) -> &StateCell<P> {
        let state = SplashWindowState::new(bitmap, size, self.previous.take());
        self.state.insert(RefCell::new(state))
    }
}

impl<P: SplashPlatform> Drop for Teardown<'_, P> {
    fn drop(&mut self) {
        if let Some(cell) = &self.state {
            let live = {
                let state = cell.borrow();
                state
                    .window()
                    .filter(|_| state.phase() != WindowPhase::Destroyed)
            };
            if let Some(window) = live {
                self.platform.destroy_window(window);
            }
        }

        if self.class_registered {
            self.platform.unregister_class();
        }

        // Dropping the state releases the bitmap.
        let previous = match self.state.take() {
            Some(cell) => cell.into_inner().take_previous(),
            None => self.previous.take(),
        };

        // The handoff never happened; close the old splash screen now.
        if let Some(previous) = previous {
            self.platform.post_close(previous);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
