// ── Safety policy ────────────────────────────────────────────────────────────
// The binary only drives the library; all FFI lives in `platform::win32`.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;

use splashscreen::{DisplayMode, Settings, SplashError};

#[derive(Parser)]
#[command(name = "splashscreen")]
#[command(about = "Show the bundled splash screen while a host starts up", long_about = None)]
struct Cli {
    /// Window caption (not drawn; visible to accessibility tools).
    #[arg(long)]
    caption: Option<String>,

    /// JSON settings file.  Flags given on the command line take precedence.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// UI level: unknown, embedded, none, passive or full.
    #[arg(long, value_name = "MODE")]
    display: Option<DisplayMode>,

    /// Milliseconds to keep the splash screen up.
    #[arg(long, value_name = "MS")]
    hold_ms: Option<u64>,

    /// Handle of a splash window shown by a bootstrap process.  It is closed
    /// once this one has painted.
    #[arg(long, value_name = "HANDLE")]
    previous_window: Option<isize>,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Debug
    /// - `-vv`: Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// The settings file (or defaults) with command-line flags applied.
    fn settings(&self) -> splashscreen::Result<Settings> {
        let settings = match &self.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(self.apply(settings))
    }

    /// Defaults with command-line flags applied, for reporting a settings
    /// file that could not be read.
    fn fallback_settings(&self) -> Settings {
        self.apply(Settings::default())
    }

    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(caption) = &self.caption {
            settings.caption = Some(caption.clone());
        }
        if let Some(display) = self.display {
            settings.display = display;
        }
        if let Some(hold_ms) = self.hold_ms {
            settings.hold_ms = hold_ms;
        }
        settings
    }
}

/// Log line for a startup failure.
fn describe(e: &SplashError) -> String {
    if e.is_configuration() {
        format!("splash screen configuration is unusable: {e}")
    } else {
        format!("splash screen failed: {e}")
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            report(&cli.fallback_settings(), e.code());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&settings, cli.previous_window) {
        log::error!("{}", describe(&e));
        report(&settings, e.code());
        std::process::exit(1);
    }
}

// ── Windows ───────────────────────────────────────────────────────────────────

#[cfg(windows)]
fn run(settings: &Settings, previous_window: Option<isize>) -> splashscreen::Result<()> {
    use std::time::{Duration, Instant};

    use splashscreen::platform::win32::{dpi, WindowHandle, Win32Platform};
    use splashscreen::SplashPlatform;

    /// Upper bound on waiting for the splash thread to take its window down.
    const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);
    const POLL_INTERVAL: Duration = Duration::from_millis(20);

    // Must precede window creation.
    dpi::init();

    let platform = Win32Platform::current_module()?;
    let previous = previous_window.map(WindowHandle::from_raw);

    let Some(window) =
        splashscreen::create_splash_window(&platform, settings.caption.as_deref(), previous)?
    else {
        log::info!("no splash screen shown");
        return Ok(());
    };

    log::info!("splash window {:#x} shown", window.as_raw());
    std::thread::sleep(Duration::from_millis(settings.hold_ms));

    platform.post_close(window);
    let deadline = Instant::now() + CLOSE_TIMEOUT;
    while platform.is_window(window) && Instant::now() < deadline {
        std::thread::sleep(POLL_INTERVAL);
    }

    Ok(())
}

#[cfg(windows)]
fn report(settings: &Settings, code: u32) {
    use splashscreen::platform::win32::Win32Platform;

    let platform = match Win32Platform::current_module() {
        Ok(platform) => platform,
        Err(e) => {
            log::error!("cannot report error {code:#010x}: {e}");
            return;
        }
    };
    if let Err(e) =
        splashscreen::display_error(&platform, settings.display, &settings.host_name, code)
    {
        log::error!("failed to show error dialog: {e}");
    }
}

// ── Other targets ─────────────────────────────────────────────────────────────

#[cfg(not(windows))]
fn run(_settings: &Settings, _previous_window: Option<isize>) -> splashscreen::Result<()> {
    Err(SplashError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "the splash screen requires Windows",
    )))
}

#[cfg(not(windows))]
fn report(_settings: &Settings, _code: u32) {}

// ── Tests ─────────────────────────────────────────────────────────────────────
