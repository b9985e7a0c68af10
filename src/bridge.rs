//! Browser glue: DOM listeners, the fade timer and the screenshot download.
//!
//! [`ViewerSession`] owns one [`SessionCore`] plus every subscription it
//! makes. Listeners are RAII handles that detach on drop, so unmounting the
//! session (or dropping it) leaves nothing attached to the canvas, the window
//! or the document. Document-level move/up/cancel listeners exist only while
//! a drag is in progress.
//!
//! A closure must not be freed while it runs, so listeners and timers retired
//! from inside their own callbacks are detached immediately and dropped on the
//! next turn of the event loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlAnchorElement, HtmlCanvasElement, Window};

use crate::asset::{AssetLoader, AssetSource, SceneGraph};
use crate::camera::PerspectiveCamera;
use crate::capture::Renderer;
use crate::config::ViewerConfig;
use crate::consts::FADE_INTERVAL_MS;
use crate::error::ViewerError;
use crate::input::{Capabilities, Point, PointerEvent, PointerPhase, WheelDelta};
use crate::light::{LightState, LightingRig};
use crate::motion::ObjectTransform;
use crate::session::{Action, SessionCore};

/// Install the console logger and panic hook. Call once at startup.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already installed: {e}")));
    }
}

/// Callbacks into the host page.
#[derive(Default)]
pub struct HostCallbacks {
    /// Fires once per asset, after any fade-in.
    pub on_model_loaded: Option<Box<dyn FnMut()>>,
    /// Receives the bulb state as camelCase JSON.
    pub on_light_changed: Option<Box<dyn FnMut(&str)>>,
    /// Ask the host render loop for another frame.
    pub request_frame: Option<Box<dyn FnMut()>>,
}

/// An attached DOM event listener; detaches on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
    attached: bool,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, ViewerError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| ViewerError::host(kind, &e))?;
        Ok(Self { target: target.clone(), kind, callback, attached: true })
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(e) = self.target.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref()) {
            log::warn!("failed to detach {} listener: {e:?}", self.kind);
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Free `value` after the current callback has returned.
fn drop_later<T: 'static>(value: T) {
    Timeout::new(0, move || drop(value)).forget();
}

#[derive(Debug, Clone, Copy)]
enum Route {
    Down,
    Move,
    Up,
    Cancel,
    Hover,
}

impl Route {
    fn phase(self) -> PointerPhase {
        match self {
            Self::Down => PointerPhase::Down,
            Self::Move | Self::Hover => PointerPhase::Move,
            Self::Up => PointerPhase::Up,
            Self::Cancel => PointerPhase::Cancel,
        }
    }
}

struct Inner {
    core: SessionCore,
    canvas: HtmlCanvasElement,
    renderer: Box<dyn Renderer>,
    drag_listeners: Vec<Listener>,
    fade: Option<Interval>,
}

impl Inner {
    fn normalize(&self, ev: &web_sys::PointerEvent, phase: PointerPhase) -> Option<PointerEvent> {
        let rect = self.canvas.get_bounding_client_rect();
        PointerEvent::from_raw(
            phase,
            ev.pointer_id(),
            Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
            Point::new(rect.left(), rect.top()),
            &ev.pointer_type(),
        )
    }
}

struct Shared {
    inner: RefCell<Inner>,
    callbacks: RefCell<HostCallbacks>,
}

/// One mounted viewer.
pub struct ViewerSession {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

impl ViewerSession {
    /// Bind a viewer to `canvas` and start listening for input.
    ///
    /// # Errors
    ///
    /// [`ViewerError::InvalidConfig`] for bad options, [`ViewerError::Host`]
    /// when the browser refuses a listener.
    pub fn mount(
        canvas: HtmlCanvasElement,
        config: ViewerConfig,
        renderer: Box<dyn Renderer>,
        callbacks: HostCallbacks,
    ) -> Result<Self, ViewerError> {
        let window = web_sys::window().ok_or_else(|| ViewerError::Host("no window".into()))?;
        let capabilities = detect_capabilities(&window);
        let (width, height) = (config.width, config.height);
        let core = SessionCore::new(config, capabilities)?;

        let shared = Rc::new(Shared {
            inner: RefCell::new(Inner { core, canvas: canvas.clone(), renderer, drag_listeners: Vec::new(), fade: None }),
            callbacks: RefCell::new(callbacks),
        });

        let mut listeners = vec![pointer_listener(&shared, canvas.as_ref(), "pointerdown", false, Route::Down)?];
        let weak = Rc::downgrade(&shared);
        listeners.push(Listener::attach(canvas.as_ref(), "wheel", false, move |ev| on_wheel(&weak, &ev))?);
        if !capabilities.touch {
            listeners.push(pointer_listener(&shared, window.as_ref(), "pointermove", true, Route::Hover)?);
        }

        log::info!("viewer mounted ({width}x{height}, touch: {})", capabilities.touch);
        Ok(Self { shared, listeners })
    }

    /// Load `url` through `loader`.
    ///
    /// # Errors
    ///
    /// The format or loader error; the placeholder stays up.
    pub fn load(&self, url: &str, loader: &mut dyn AssetLoader) -> Result<(), ViewerError> {
        let actions = self.shared.inner.borrow_mut().core.load_asset(url, loader)?;
        dispatch(&self.shared, actions, None);
        Ok(())
    }

    /// Hand over content a host-side loader produced asynchronously.
    pub fn install(&self, source: AssetSource, scene: Box<dyn SceneGraph>) {
        let actions = self.shared.inner.borrow_mut().core.install_asset(source, scene);
        dispatch(&self.shared, actions, None);
    }

    /// Advance one frame; call from the host's render loop.
    pub fn tick(&self, dt: f64) -> bool {
        self.shared.inner.borrow_mut().core.tick(dt)
    }

    pub fn resize(&self, width: f64, height: f64) {
        let actions = self.shared.inner.borrow_mut().core.resize(width, height);
        dispatch(&self.shared, actions, None);
    }

    /// Render a clean frame and download it.
    ///
    /// # Errors
    ///
    /// Render, encode or download failures. Renderer flags are restored first.
    pub fn capture_screenshot(&self) -> Result<(), ViewerError> {
        let shot = {
            let mut guard = self.shared.inner.borrow_mut();
            let inner = &mut *guard;
            inner.core.capture(inner.renderer.as_mut())?
        };
        download(&shot.data_url, shot.file_name)
    }

    #[must_use]
    pub fn transform(&self) -> Option<ObjectTransform> {
        self.shared.inner.borrow().core.transform()
    }

    #[must_use]
    pub fn camera(&self) -> PerspectiveCamera {
        self.shared.inner.borrow().core.camera
    }

    #[must_use]
    pub fn lighting(&self) -> LightingRig {
        self.shared.inner.borrow().core.lighting()
    }

    #[must_use]
    pub fn light_state(&self) -> LightState {
        self.shared.inner.borrow().core.light_state()
    }

    #[must_use]
    pub fn light_label(&self) -> &'static str {
        self.shared.inner.borrow().core.light_label()
    }

    #[must_use]
    pub fn placeholder_visible(&self) -> bool {
        self.shared.inner.borrow().core.placeholder_visible()
    }

    /// Detach every listener and stop the fade timer.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        let Ok(mut inner) = self.shared.inner.try_borrow_mut() else {
            log::warn!("teardown while the session is busy");
            return;
        };
        inner.core.teardown();
        let mut drag = std::mem::take(&mut inner.drag_listeners);
        if !drag.is_empty() {
            for listener in &mut drag {
                listener.detach();
            }
            drop_later(drag);
        }
        if let Some(fade) = inner.fade.take() {
            drop_later(fade);
        }
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn detect_capabilities(window: &Window) -> Capabilities {
    let touch_points = window.navigator().max_touch_points() > 0;
    let touch_events = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    Capabilities { touch: touch_points || touch_events }
}

fn pointer_listener(
    shared: &Rc<Shared>,
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    route: Route,
) -> Result<Listener, ViewerError> {
    let weak = Rc::downgrade(shared);
    Listener::attach(target, kind, passive, move |ev| on_pointer(&weak, route, &ev))
}

fn on_pointer(shared: &Weak<Shared>, route: Route, event: &Event) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(ev) = event.dyn_ref::<web_sys::PointerEvent>() else {
        return;
    };
    let actions = {
        let Ok(mut inner) = shared.inner.try_borrow_mut() else {
            log::warn!("dropped re-entrant {route:?} event");
            return;
        };
        let Some(pointer) = inner.normalize(ev, route.phase()) else {
            return;
        };
        match route {
            Route::Down => inner.core.on_pointer_down(&pointer),
            Route::Move => inner.core.on_pointer_move(&pointer),
            Route::Up => inner.core.on_pointer_up(&pointer),
            Route::Cancel => inner.core.on_pointer_cancel(&pointer),
            Route::Hover => inner.core.on_hover(&pointer),
        }
    };
    dispatch(&shared, actions, Some(event));
}

fn on_wheel(shared: &Weak<Shared>, event: &Event) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(ev) = event.dyn_ref::<web_sys::WheelEvent>() else {
        return;
    };
    let actions = {
        let Ok(mut inner) = shared.inner.try_borrow_mut() else {
            return;
        };
        inner.core.on_wheel(WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() })
    };
    dispatch(&shared, actions, Some(event));
}

/// Carry out session actions. Must run with `inner` unborrowed.
fn dispatch(shared: &Rc<Shared>, actions: Vec<Action>, event: Option<&Event>) {
    let mut render = false;
    for action in actions {
        match action {
            Action::RenderNeeded => render = true,
            Action::PreventDefault => {
                if let Some(ev) = event {
                    ev.prevent_default();
                }
            }
            Action::CapturePointer(id) => {
                let inner = shared.inner.borrow();
                if let Err(e) = inner.canvas.set_pointer_capture(id) {
                    log::warn!("pointer capture failed for {id}: {e:?}");
                }
            }
            Action::SetCursor(cursor) => {
                let inner = shared.inner.borrow();
                if let Err(e) = inner.canvas.style().set_property("cursor", cursor) {
                    log::warn!("failed to set cursor: {e:?}");
                }
            }
            Action::BeginDrag => begin_drag(shared),
            Action::EndDrag => end_drag(shared),
            Action::StartFade => start_fade(shared),
            Action::LightChanged(state) => {
                if let Some(cb) = shared.callbacks.borrow_mut().on_light_changed.as_mut() {
                    match state.to_json() {
                        Ok(json) => cb(&json),
                        Err(e) => log::error!("{e}"),
                    }
                }
            }
            Action::ModelLoaded => {
                if let Some(cb) = shared.callbacks.borrow_mut().on_model_loaded.as_mut() {
                    cb();
                }
            }
        }
    }
    if render {
        if let Some(cb) = shared.callbacks.borrow_mut().request_frame.as_mut() {
            cb();
        }
    }
}

fn begin_drag(shared: &Rc<Shared>) {
    if !shared.inner.borrow().drag_listeners.is_empty() {
        return;
    }
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("no document for drag listeners");
        return;
    };
    let target: &EventTarget = document.as_ref();
    let attached = [("pointermove", false, Route::Move), ("pointerup", true, Route::Up), ("pointercancel", true, Route::Cancel)]
        .into_iter()
        .map(|(kind, passive, route)| pointer_listener(shared, target, kind, passive, route))
        .collect::<Result<Vec<_>, _>>();
    match attached {
        Ok(listeners) => shared.inner.borrow_mut().drag_listeners = listeners,
        Err(e) => log::error!("failed to attach drag listeners: {e}"),
    }
}

fn end_drag(shared: &Rc<Shared>) {
    let mut listeners = std::mem::take(&mut shared.inner.borrow_mut().drag_listeners);
    for listener in &mut listeners {
        listener.detach();
    }
    drop_later(listeners);
}

fn start_fade(shared: &Rc<Shared>) {
    let weak = Rc::downgrade(shared);
    let interval = Interval::new(FADE_INTERVAL_MS, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let (actions, fading) = {
            let Ok(mut inner) = shared.inner.try_borrow_mut() else {
                return;
            };
            let actions = inner.core.advance_fade();
            (actions, inner.core.is_fading())
        };
        dispatch(&shared, actions, None);
        if !fading {
            if let Some(done) = shared.inner.borrow_mut().fade.take() {
                drop_later(done);
            }
        }
    });
    if let Some(previous) = shared.inner.borrow_mut().fade.replace(interval) {
        drop_later(previous);
    }
}

fn download(data_url: &str, file_name: &str) -> Result<(), ViewerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ViewerError::Host("no document".into()))?;
    let anchor = document
        .create_element("a")
        .map_err(|e| ViewerError::host("create anchor", &e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| ViewerError::host("anchor cast", e.as_ref()))?;
    anchor.set_download(file_name);
    anchor.set_href(data_url);
    anchor.click();
    log::info!("downloaded {file_name}");
    Ok(())
}
