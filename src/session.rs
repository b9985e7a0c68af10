use glam::DVec3;

use crate::asset::{AssetLoader, AssetSource, LoadedAsset, SceneGraph};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::capture::{self, Capture, Renderer};
use crate::config::ViewerConfig;
use crate::consts::{FADE_STEP, WHEEL_ZOOM_SCALE};
use crate::error::ViewerError;
use crate::gesture::{Gesture, GestureClassifier, GestureMode};
use crate::geometry::Ray;
use crate::input::{Capabilities, PointerEvent, PointerId, PointerPhase, WheelDelta};
use crate::light::{LightController, LightEvent, LightState, LightingRig};
use crate::motion::{MotionBlender, ObjectTransform};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Actions returned from session handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    /// Route further events of this pointer to the canvas.
    CapturePointer(PointerId),
    /// Call `preventDefault()` on the event being handled.
    PreventDefault,
    /// Attach document-level move/up/cancel listeners.
    BeginDrag,
    /// Remove the document-level listeners attached by `BeginDrag`.
    EndDrag,
    LightChanged(LightState),
    SetCursor(&'static str),
    /// The current asset is fully shown; fire `onModelLoaded`.
    ModelLoaded,
    /// Start the fade-in timer, replacing any running one.
    StartFade,
}

/// Opacity ramp for a freshly loaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FadeIn {
    opacity: f64,
}

impl FadeIn {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Advance one tick. Returns true once fully opaque.
    pub fn step(&mut self) -> bool {
        self.opacity = (self.opacity + FADE_STEP).min(1.0);
        if self.opacity >= 1.0 - 1e-9 {
            self.opacity = 1.0;
        }
        self.opacity >= 1.0
    }
}

/// Session state: everything one viewer instance needs except the browser.
///
/// Separated from [`crate::bridge::ViewerSession`] so it can be tested
/// without WASM/browser dependencies.
pub struct SessionCore {
    pub config: ViewerConfig,
    pub capabilities: Capabilities,
    pub viewport: Viewport,
    pub camera: PerspectiveCamera,
    pub gestures: GestureClassifier,
    pub motion: MotionBlender,
    pub light: LightController,
    asset: Option<LoadedAsset>,
    fade: Option<FadeIn>,
    notified: bool,
    dragging: bool,
    torn_down: bool,
}

impl SessionCore {
    /// # Errors
    ///
    /// [`ViewerError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: ViewerConfig, capabilities: Capabilities) -> Result<Self, ViewerError> {
        config.validate()?;
        let viewport = config.viewport();
        let camera = PerspectiveCamera::new(viewport.aspect(), config.initial_distance());
        let motion = MotionBlender::new(config.initial_orientation(), config.offset_ndc(&viewport), config.auto_rotate());
        Ok(Self {
            config,
            capabilities,
            viewport,
            camera,
            gestures: GestureClassifier::new(),
            motion,
            light: LightController::default(),
            asset: None,
            fade: None,
            notified: false,
            dragging: false,
            torn_down: false,
        })
    }

    // --- Asset lifecycle ---

    /// Resolve `url`, load it through `loader` and install the result.
    ///
    /// Loading the URL that is already shown is a no-op.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnsupportedFormat`] or the loader's error. Either way the
    /// previous asset is gone and the placeholder stays up.
    pub fn load_asset(&mut self, url: &str, loader: &mut dyn AssetLoader) -> Result<Vec<Action>, ViewerError> {
        if self.torn_down {
            return Ok(Vec::new());
        }
        if self.asset.as_ref().is_some_and(|a| a.source.url() == url) {
            return Ok(Vec::new());
        }
        self.asset = None;
        self.fade = None;

        let source = AssetSource::from_url(url).inspect_err(|e| log::error!("{e}"))?;
        log::info!("loading {} asset {}", source.format(), source.url());
        let scene = loader.load(&source).inspect_err(|e| log::error!("{url}: {e}"))?;
        Ok(self.install_asset(source, scene))
    }

    /// Normalize freshly loaded content and make it the current asset.
    pub fn install_asset(&mut self, source: AssetSource, scene: Box<dyn SceneGraph>) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let mut asset = LoadedAsset::normalize(source, scene);
        let fade_in = self.config.fade_in;
        asset.for_each_mesh(&mut |m| {
            m.cast_shadow = true;
            m.receive_shadow = true;
            if fade_in {
                m.transparent = true;
                m.opacity = 0.0;
            }
        });

        self.motion.reset_orientation(self.config.initial_orientation());
        self.motion.set_pivot(DVec3::ZERO);
        self.camera.target = DVec3::ZERO;

        if self.config.auto_frame {
            let limits = self.config.zoom_limits();
            match asset.frame_sphere() {
                Some(sphere) => {
                    if let Some(d) = self.camera.frame_sphere(&sphere, &limits) {
                        log::debug!("auto-framed at distance {d:.3}");
                    }
                }
                None => {
                    log::warn!("degenerate bounds for {}, using default zoom", asset.source.url());
                    self.camera.set_distance(self.config.initial_distance(), &limits);
                }
            }
        }

        log::info!("loaded {} ({:?})", asset.source.url(), asset.sphere);
        self.asset = Some(asset);
        self.notified = false;

        let mut actions = vec![Action::RenderNeeded];
        if fade_in {
            self.fade = Some(FadeIn::new());
            actions.push(Action::StartFade);
        } else {
            actions.extend(self.notify_loaded());
        }
        actions
    }

    /// One fade-in timer tick.
    pub fn advance_fade(&mut self) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let Some(fade) = self.fade.as_mut() else {
            return Vec::new();
        };
        let finished = fade.step();
        let opacity = fade.opacity();
        if let Some(asset) = self.asset.as_mut() {
            asset.for_each_mesh(&mut |m| m.opacity = opacity);
        }
        let mut actions = vec![Action::RenderNeeded];
        if finished {
            self.fade = None;
            actions.extend(self.notify_loaded());
        }
        actions
    }

    fn notify_loaded(&mut self) -> Option<Action> {
        if self.notified || self.asset.is_none() {
            return None;
        }
        self.notified = true;
        Some(Action::ModelLoaded)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.config.show_light_bulb && !self.gestures.is_active() {
            let ray = self.pick_ray(event);
            if self.light.pointer_down(event.id, &ray) {
                actions.push(Action::CapturePointer(event.id));
                actions.push(Action::RenderNeeded);
                self.sync_drag(&mut actions);
                return actions;
            }
        }
        self.classify(event, &mut actions);
        actions
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.light.owns_pointer(event.id) {
            let ray = self.pick_ray(event);
            if let Some(LightEvent::Moved(_)) = self.light.pointer_move(event.id, &ray) {
                actions.push(Action::LightChanged(self.light.state()));
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        self.classify(event, &mut actions);
        actions
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.light.owns_pointer(event.id) {
            if event.phase == PointerPhase::Cancel {
                self.light.pointer_cancel(event.id);
            } else if let Some(LightEvent::Toggled(on)) = self.light.pointer_up(event.id) {
                log::info!("light bulb {}", if on { "on" } else { "off" });
                actions.push(Action::LightChanged(self.light.state()));
            }
            actions.push(Action::RenderNeeded);
            self.sync_drag(&mut actions);
            return actions;
        }
        self.classify(event, &mut actions);
        actions
    }

    pub fn on_pointer_cancel(&mut self, event: &PointerEvent) -> Vec<Action> {
        let cancel = PointerEvent { phase: PointerPhase::Cancel, ..*event };
        self.on_pointer_up(&cancel)
    }

    /// Window-level mouse or pen movement: drives parallax, hover tilt and bulb hover.
    pub fn on_hover(&mut self, event: &PointerEvent) -> Vec<Action> {
        if self.torn_down || self.capabilities.touch || event.device.is_touch() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let parallax = self.config.enable_mouse_parallax;
        let hover = self.config.enable_hover_rotation;
        if parallax || hover {
            self.motion.set_pointer_targets(self.viewport.normalized(event.position), parallax, hover);
            actions.push(Action::RenderNeeded);
        }
        if self.config.show_light_bulb && !self.light.is_dragging() {
            let ray = self.pick_ray(event);
            if self.light.hover(&ray) {
                actions.push(Action::SetCursor(if self.light.is_hovered() { "pointer" } else { "default" }));
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    /// Wheel dolly: one notch scales the camera distance by a fixed factor.
    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        if self.torn_down || !self.config.enable_manual_zoom || delta.dy == 0.0 {
            return Vec::new();
        }
        let scale = if delta.dy < 0.0 { WHEEL_ZOOM_SCALE } else { 1.0 / WHEEL_ZOOM_SCALE };
        let limits = self.config.zoom_limits();
        self.camera.set_distance(self.camera.distance() * scale, &limits);
        vec![Action::PreventDefault, Action::RenderNeeded]
    }

    fn classify(&mut self, event: &PointerEvent, actions: &mut Vec<Action>) {
        if !self.capabilities.accepts(event.device) {
            return;
        }
        let policy = self.config.gesture_policy();
        let limits = policy.limits;
        let before = self.gestures.mode();
        for gesture in self.gestures.handle(event, &policy, self.camera.distance()) {
            match gesture {
                Gesture::Rotate(delta) => {
                    self.motion.apply_drag(delta);
                    actions.push(Action::RenderNeeded);
                }
                Gesture::Zoom(distance) => {
                    self.camera.set_distance(distance, &limits);
                    actions.push(Action::RenderNeeded);
                }
                Gesture::CapturePointer(id) => actions.push(Action::CapturePointer(id)),
                Gesture::PreventDefault => actions.push(Action::PreventDefault),
            }
        }
        // A pinch ends the rotate it interrupts; its last sample must not fling.
        if before != GestureMode::Pinch && self.gestures.mode() == GestureMode::Pinch {
            self.motion.stop_inertia();
        }
        self.sync_drag(actions);
    }

    /// Keep document listeners attached exactly while something is pressed.
    fn sync_drag(&mut self, actions: &mut Vec<Action>) {
        let pressed = self.gestures.is_active() || self.light.is_dragging();
        if pressed && !self.dragging {
            actions.push(Action::BeginDrag);
        } else if !pressed && self.dragging {
            actions.push(Action::EndDrag);
        }
        self.dragging = pressed;
    }

    fn pick_ray(&self, event: &PointerEvent) -> Ray {
        self.camera.ray_through(self.viewport.to_ndc(event.position))
    }

    // --- Frame loop ---

    /// Advance one rendered frame by `dt` seconds. Returns whether another
    /// frame is needed; with no asset loaded there is nothing to animate.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.torn_down || self.asset.is_none() {
            return false;
        }
        let holding = matches!(self.gestures.mode(), GestureMode::Rotate | GestureMode::Pinch);
        let moving = self.motion.tick(dt, &self.camera, holding);
        moving || self.fade.is_some()
    }

    // --- Output ---

    /// Render and encode one clean frame.
    ///
    /// # Errors
    ///
    /// The renderer's failure, after its flags have been restored, or
    /// [`ViewerError::Host`] once torn down.
    pub fn capture<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<Capture, ViewerError> {
        if self.torn_down {
            return Err(ViewerError::Host("session torn down".into()));
        }
        capture::capture(renderer).inspect_err(|e| log::error!("capture failed: {e}"))
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(&self.viewport);
        self.motion.set_offset_ndc(self.config.offset_ndc(&self.viewport));
        vec![Action::RenderNeeded]
    }

    /// Stop everything. Later calls are no-ops.
    pub fn teardown(&mut self) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        self.torn_down = true;
        self.fade = None;
        self.gestures.reset();
        let mut actions = Vec::new();
        if self.dragging {
            self.dragging = false;
            actions.push(Action::EndDrag);
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    #[must_use]
    pub fn asset(&self) -> Option<&LoadedAsset> {
        self.asset.as_ref()
    }

    /// Whether the host should still show its loading placeholder.
    #[must_use]
    pub fn placeholder_visible(&self) -> bool {
        self.asset.is_none()
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Object placement for the renderer, once an asset is loaded.
    #[must_use]
    pub fn transform(&self) -> Option<ObjectTransform> {
        self.asset.as_ref().map(|a| self.motion.transform(a.normalization))
    }

    /// Lighting rig as it should be rendered right now.
    #[must_use]
    pub fn lighting(&self) -> LightingRig {
        self.config.lighting_rig().effective(self.light.state().is_on)
    }

    #[must_use]
    pub fn light_state(&self) -> LightState {
        self.light.state()
    }

    #[must_use]
    pub fn light_label(&self) -> &'static str {
        self.light.label()
    }
}
