//! Browser bindings: the real DOM, `sessionStorage` and `performance.now()`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element as DomElement, Performance, Storage};

use crate::clock::{Clock, TimerGeneration};
use crate::config::IntroConfig;
use crate::host::{IntroHost, is_document_ready};
use crate::markup::Element;
use crate::overlay::IntroOverlay;
use crate::session::{SessionStore, StoreError};
use crate::surface::{Mounted, Surface};

type WebHost = IntroHost<DomSurface, BrowserSessionStore, PerformanceClock>;

thread_local! {
    static HOST: RefCell<Option<WebHost>> = const { RefCell::new(None) };
}

pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Surface for DomSurface {
    type Handle = DomElement;

    fn mount(&mut self, root: &Element, particles_id: &str) -> Option<Mounted<DomElement>> {
        let body = self.document.body()?;
        body.insert_adjacent_html("afterbegin", &root.to_html()).ok()?;
        let root = body.first_element_child()?;
        let particles = root
            .query_selector(&format!("#{particles_id}"))
            .ok()
            .flatten();
        Some(Mounted { root, particles })
    }

    fn append(&mut self, parent: &DomElement, child: &Element) {
        let _ = parent.insert_adjacent_html("beforeend", &child.to_html());
    }

    fn add_class(&mut self, node: &DomElement, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn detach(&mut self, node: &DomElement) -> bool {
        if node.parent_node().is_none() {
            return false;
        }
        node.remove();
        true
    }

    fn is_attached(&self, node: &DomElement) -> bool {
        node.is_connected()
    }
}

pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new(window: &web_sys::Window) -> Self {
        // Throws when storage is disabled, e.g. some private browsing modes
        Self {
            storage: window.session_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("window.sessionStorage is not accessible".into()))
    }
}

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StoreError::Unavailable(js_reason(err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Rejected {
                key: key.to_string(),
                reason: js_reason(err),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Unavailable(js_reason(err)))
    }
}

pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        let millis = match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        };
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }
}

fn with_host<T>(f: impl FnOnce(&mut WebHost) -> T) -> Option<T> {
    HOST.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let window = web_sys::window()?;
            let document = window.document()?;
            // Math.random stands in for an OS entropy source
            let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
            *slot = Some(IntroHost::new(
                IntroConfig::default(),
                DomSurface::new(document),
                BrowserSessionStore::new(&window),
                PerformanceClock {
                    performance: window.performance(),
                },
                seed,
            ));
        }
        slot.as_mut().map(f)
    })
}

struct Tracked {
    overlay: RefCell<IntroOverlay<DomSurface>>,
    timers: TimerGeneration,
}

/// Handle returned to JavaScript by [`show_intro`].
#[wasm_bindgen]
pub struct IntroHandle {
    tracked: Rc<Tracked>,
}

#[wasm_bindgen]
impl IntroHandle {
    #[wasm_bindgen(js_name = hideManual)]
    pub fn hide_manual(&self) {
        with_host(|host| host.hide_manual(&mut self.tracked.overlay.borrow_mut()));
        // The removal may be due before the pending timeout
        schedule(self.tracked.clone());
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.tracked.overlay.borrow().is_visible()
    }
}

// Re-arms after every poll. Only the most recently armed timeout polls, a
// superseded one fires as a no-op.
fn schedule(tracked: Rc<Tracked>) {
    let token = tracked.timers.arm();
    let Some(deadline) = tracked.overlay.borrow().next_deadline() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let now = with_host(|host| host.clock.now()).unwrap_or_default();
    let delay = deadline.saturating_sub(now).as_millis().min(i32::MAX as u128) as i32;

    let callback = Closure::once_into_js(move || {
        if !tracked.timers.is_current(token) {
            return;
        }
        with_host(|host| host.poll(&mut tracked.overlay.borrow_mut()));
        schedule(tracked);
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay);
}

fn track(overlay: IntroOverlay<DomSurface>) -> IntroHandle {
    let tracked = Rc::new(Tracked {
        overlay: RefCell::new(overlay),
        timers: TimerGeneration::default(),
    });
    schedule(tracked.clone());
    IntroHandle { tracked }
}

/// Shows the intro again, regardless of the session flag.
#[wasm_bindgen(js_name = showIntro)]
pub fn show_intro() -> Option<IntroHandle> {
    with_host(|host| host.show_intro()).map(track)
}

fn page_ready() {
    if let Some(overlay) = with_host(|host| host.page_ready()).flatten() {
        track(overlay);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if is_document_ready(&document.ready_state()) {
        page_ready();
        return;
    }

    let callback = Closure::once_into_js(page_ready);
    let _ = document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref());
}
