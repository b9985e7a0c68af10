//! Shared numeric constants for the viewer crate.

// ── Gestures ────────────────────────────────────────────────────

/// Per-axis travel in CSS pixels before a single touch commits to a gesture.
pub const DECIDE_PX: f64 = 8.0;

/// Radians of rotation per pixel of pointer travel.
pub const ROTATE_SPEED: f64 = 0.005;

// ── Motion ──────────────────────────────────────────────────────

/// Per-frame multiplier applied to the post-release drag velocity.
pub const INERTIA_DAMPING: f64 = 0.925;

/// Velocity magnitude (radians/frame) below which inertia stops.
pub const VELOCITY_EPSILON: f64 = 1e-4;

/// Per-axis distance under which an eased value counts as settled.
pub const SETTLE_EPSILON: f64 = 1e-4;

/// Maximum parallax offset in normalized device coordinates.
pub const PARALLAX_MAG: f64 = 0.05;

/// Fraction of the remaining parallax distance covered each frame.
pub const PARALLAX_EASE: f64 = 0.12;

/// Maximum hover tilt (6°) in radians.
pub const HOVER_MAG: f64 = 6.0 * std::f64::consts::PI / 180.0;

/// Fraction of the remaining hover distance covered each frame.
pub const HOVER_EASE: f64 = 0.15;

// ── Camera ──────────────────────────────────────────────────────

/// Vertical field of view of the viewer camera, in degrees.
pub const DEFAULT_FOV_DEG: f64 = 50.0;

/// Near plane before any auto-framing.
pub const DEFAULT_NEAR: f64 = 0.01;

/// Far plane before any auto-framing.
pub const DEFAULT_FAR: f64 = 100.0;

/// Extra room around the bounding sphere when auto-framing.
pub const FRAME_MARGIN: f64 = 1.2;

/// Near = d / ratio, far = d × ratio after auto-framing at distance d.
pub const CLIP_RATIO: f64 = 10.0;

/// Bounding sphere radius at or below which an asset is degenerate.
pub const DEGENERATE_RADIUS: f64 = 1e-9;

/// Camera distance multiplier per wheel notch toward the object.
pub const WHEEL_ZOOM_SCALE: f64 = 0.95;

// ── Asset lifecycle ─────────────────────────────────────────────

/// Opacity gained per fade-in tick.
pub const FADE_STEP: f64 = 0.05;

/// Fade-in tick interval in milliseconds.
pub const FADE_INTERVAL_MS: u32 = 16;

// ── Light bulb ──────────────────────────────────────────────────

/// Initial world position of the draggable light bulb.
pub const LIGHT_DEFAULT_POSITION: [f64; 3] = [3.0, 2.0, 3.0];

/// World height of the plane the bulb is dragged across.
pub const LIGHT_PLANE_Y: f64 = 0.0;

/// Height of the bulb's pick sphere center above the light position.
pub const LIGHT_HIT_CENTER_Y: f64 = 0.25;

/// Radius of the bulb's pick sphere (base plus glass).
pub const LIGHT_HIT_RADIUS: f64 = 0.55;

/// Key light intensity while the bulb is switched off.
pub const DIMMED_KEY_INTENSITY: f64 = 0.2;

/// Fill light intensity while the bulb is switched off.
pub const DIMMED_FILL_INTENSITY: f64 = 0.1;

/// Rim light intensity while the bulb is switched off.
pub const DIMMED_RIM_INTENSITY: f64 = 0.1;

// ── Capture ─────────────────────────────────────────────────────

/// File name offered for downloaded screenshots.
pub const CAPTURE_FILE_NAME: &str = "model.png";

/// Image encoding requested from the renderer.
pub const CAPTURE_MIME: &str = "image/png";
