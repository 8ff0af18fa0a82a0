// ── Scripted platform for tests ───────────────────────────────────────────────
//
// Stands in for the window system: serves canned resources and monitor data,
// feeds a fixed message sequence through the window procedure, and records
// every call it receives so tests can check order and multiplicity.

use std::sync::{Arc, Mutex};

use crate::config::{SplashConfiguration, TYPE_BITMAP_RESOURCE};
use crate::error::{Result, SplashError};
use crate::placement::{Monitor, Placement, Point, Rect, Size, DEFAULT_DPI};
use crate::platform::{SplashPlatform, StateCell};
use crate::procedure::{Effect, Message, Response};

/// Identity every scripted splash window gets.
pub(crate) const SPLASH_WINDOW: u32 = 100;

/// One observable interaction with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    LoadConfiguration(u16),
    LoadBitmap(u16),
    RegisterClass,
    UnregisterClass,
    CreateWindow {
        caption: Option<String>,
        placement: Placement,
        size: Size,
    },
    PumpStarted,
    Reposition { origin: Point, size: Size },
    Paint { source: Size, target: Size },
    PostClose(u32),
    Destroy(u32),
    BitmapReleased,
    DialogShown { title: String, message: String },
}

/// How the scripted platform behaves.
pub(crate) struct Scenario {
    /// Configuration record bytes, or `None` for a missing resource.
    pub(crate) record: Option<Vec<u8>>,
    /// Natural bitmap size, or `None` if the bitmap fails to load.
    pub(crate) bitmap: Option<Size>,
    pub(crate) cursor: Option<Point>,
    /// Monitor under every point, or `None` if the lookup fails.
    pub(crate) monitor: Option<Monitor>,
    /// Windows that `is_window` reports as alive.
    pub(crate) live_windows: Vec<u32>,
    pub(crate) fail_register: bool,
    /// The splash thread panics while loading the bitmap.
    pub(crate) panic_bitmap: bool,
    pub(crate) fail_create: bool,
    pub(crate) fail_pump: bool,
    /// Messages delivered after creation.  The host then closes the window.
    pub(crate) messages: Vec<Message<u32>>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            record: Some(SplashConfiguration::new(TYPE_BITMAP_RESOURCE, 7).to_record().to_vec()),
            bitmap: Some(Size::new(400, 300)),
            cursor: Some(Point::new(10, 10)),
            monitor: Some(Monitor {
                work_area: Rect::new(0, 0, 1920, 1080),
                dpi: DEFAULT_DPI,
            }),
            live_windows: Vec::new(),
            fail_register: false,
            panic_bitmap: false,
            fail_create: false,
            fail_pump: false,
            messages: vec![Message::EraseBackground],
        }
    }
}

impl Scenario {
    pub(crate) fn into_platform(self) -> ScriptedPlatform {
        ScriptedPlatform {
            inner: Arc::new(Inner {
                scenario: self,
                calls: Mutex::new(Vec::new()),
            }),
        }
    }
}

struct Inner {
    scenario: Scenario,
    calls: Mutex<Vec<Call>>,
}

#[derive(Clone)]
pub(crate) struct ScriptedPlatform {
    inner: Arc<Inner>,
}

/// Records its own release.
pub(crate) struct TestBitmap {
    platform: ScriptedPlatform,
}

impl Drop for TestBitmap {
    fn drop(&mut self) {
        self.platform.record(Call::BitmapReleased);
    }
}

impl ScriptedPlatform {
    /// Everything recorded so far, in order.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.inner.calls.lock().unwrap().push(call);
    }

    fn scenario(&self) -> &Scenario {
        &self.inner.scenario
    }

    /// Carry out a response the way the Win32 layer would.  Returns `true`
    /// when the message loop should end.
    fn apply(&self, response: Response<u32>) -> bool {
        let mut quit = false;
        for effect in response.effects {
            match effect {
                Effect::Reposition { origin, size } => self.record(Call::Reposition { origin, size }),
                Effect::Paint { source, target } => self.record(Call::Paint { source, target }),
                Effect::PostClose(window) => self.post_close(window),
                Effect::Detach => {}
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    fn dispatch(&self, cell: &StateCell<Self>, message: Message<u32>) -> bool {
        let response = cell.borrow_mut().handle(message);
        self.apply(response)
    }
}

impl SplashPlatform for ScriptedPlatform {
    type Window = u32;
    type Bitmap = TestBitmap;

    fn load_configuration_record(&self, id: u16) -> Result<Vec<u8>> {
        self.record(Call::LoadConfiguration(id));
        self.scenario()
            .record
            .clone()
            .ok_or(SplashError::ConfigurationMissing { resource_id: id, code: 0x8007_0716 })
    }

    fn load_bitmap(&self, resource_id: u16) -> Result<(TestBitmap, Size)> {
        self.record(Call::LoadBitmap(resource_id));
        if self.scenario().panic_bitmap {
            panic!("bitmap resource {resource_id} is corrupt");
        }
        let size = self.scenario().bitmap.ok_or(SplashError::Win32 {
            function: "LoadBitmapW",
            code: 0x8007_0716,
        })?;
        Ok((TestBitmap { platform: self.clone() }, size))
    }

    fn cursor_position(&self) -> Option<Point> {
        self.scenario().cursor
    }

    fn monitor_at(&self, point: Point) -> Result<Monitor> {
        self.scenario()
            .monitor
            .ok_or(SplashError::NoMonitor { x: point.x, y: point.y })
    }

    fn is_window(&self, window: u32) -> bool {
        self.scenario().live_windows.contains(&window)
    }

    fn register_class(&self) -> Result<()> {
        if self.scenario().fail_register {
            return Err(SplashError::Win32 { function: "RegisterClassW", code: 0x8007_0582 });
        }
        self.record(Call::RegisterClass);
        Ok(())
    }

    fn unregister_class(&self) {
        self.record(Call::UnregisterClass);
    }

    fn create_window(
        &self,
        caption: Option<&str>,
        placement: Placement,
        cell: &StateCell<Self>,
    ) -> Result<u32> {
        if self.scenario().fail_create {
            return Err(SplashError::Win32 { function: "CreateWindowExW", code: 0x8007_0578 });
        }

        let size = cell.borrow().current_size();
        self.record(Call::CreateWindow {
            caption: caption.map(str::to_owned),
            placement,
            size,
        });

        // The window lands on the resolved monitor, or the primary one.
        let dpi = self.scenario().monitor.map_or(DEFAULT_DPI, |m| m.dpi);
        let origin = match placement {
            Placement::At(origin) => origin,
            Placement::SystemDefault => Point::default(),
        };
        self.dispatch(cell, Message::NcCreate { window: SPLASH_WINDOW, dpi, origin });

        Ok(SPLASH_WINDOW)
    }

    fn pump_messages(&self, cell: &StateCell<Self>) -> Result<()> {
        self.record(Call::PumpStarted);
        if self.scenario().fail_pump {
            return Err(SplashError::Win32 { function: "GetMessageW", code: 0x8000_FFFF });
        }

        let closing = [Message::Close, Message::NcDestroy];
        for &message in self.scenario().messages.iter().chain(closing.iter()) {
            if self.dispatch(cell, message) {
                break;
            }
        }
        Ok(())
    }

    fn destroy_window(&self, window: u32) {
        self.record(Call::Destroy(window));
    }

    fn post_close(&self, window: u32) {
        self.record(Call::PostClose(window));
    }

    fn format_error(&self, code: u32) -> Option<String> {
        (code == 0x8007_0005).then(|| "Access is denied.".to_owned())
    }

    fn show_error_dialog(&self, title: &str, message: &str) -> Result<()> {
        self.record(Call::DialogShown {
            title: title.to_owned(),
            message: message.to_owned(),
        });
        Ok(())
    }
}
