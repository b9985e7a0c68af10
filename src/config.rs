//! Host-facing viewer options.
//!
//! The host passes a JSON object whose keys mirror the viewer's public props.
//! Every key is optional; missing keys take the defaults below. Derived values
//! (zoom limits, initial camera distance, gesture policy, lighting rig) are
//! computed here so the rest of the crate never re-reads raw options.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use glam::DVec2;
use serde::Deserialize;

use crate::camera::{Viewport, ZoomLimits};
use crate::error::ViewerError;
use crate::gesture::GesturePolicy;
use crate::light::LightingRig;
use crate::motion::Orientation;

/// Environment preset value that disables image-based lighting.
const NO_ENVIRONMENT: &str = "none";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    /// Horizontal screen offset of the object in CSS pixels (`+x` right).
    #[serde(alias = "modelXOffset")]
    pub model_offset_x: f64,
    /// Vertical screen offset of the object in CSS pixels (`+y` down).
    #[serde(alias = "modelYOffset")]
    pub model_offset_y: f64,
    /// Initial yaw in degrees.
    pub default_rotation_x: f64,
    /// Initial pitch in degrees.
    pub default_rotation_y: f64,
    pub default_zoom: f64,
    pub min_zoom_distance: f64,
    pub max_zoom_distance: f64,
    pub enable_mouse_parallax: bool,
    pub enable_manual_rotation: bool,
    pub enable_hover_rotation: bool,
    pub enable_manual_zoom: bool,
    pub ambient_intensity: f64,
    pub key_light_intensity: f64,
    pub fill_light_intensity: f64,
    pub rim_light_intensity: f64,
    pub environment_preset: String,
    pub auto_frame: bool,
    pub placeholder_src: Option<String>,
    pub show_screenshot_button: bool,
    pub show_light_bulb: bool,
    pub fade_in: bool,
    pub auto_rotate: bool,
    /// Autorotation speed in radians per second.
    pub auto_rotate_speed: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            model_offset_x: 0.0,
            model_offset_y: 0.0,
            default_rotation_x: -50.0,
            default_rotation_y: 20.0,
            default_zoom: 0.5,
            min_zoom_distance: 0.5,
            max_zoom_distance: 10.0,
            enable_mouse_parallax: true,
            enable_manual_rotation: true,
            enable_hover_rotation: true,
            enable_manual_zoom: true,
            ambient_intensity: 0.3,
            key_light_intensity: 1.0,
            fill_light_intensity: 0.5,
            rim_light_intensity: 0.8,
            environment_preset: "forest".to_owned(),
            auto_frame: false,
            placeholder_src: None,
            show_screenshot_button: true,
            show_light_bulb: false,
            fade_in: false,
            auto_rotate: false,
            auto_rotate_speed: 0.35,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate the host's JSON options.
    ///
    /// # Errors
    ///
    /// [`ViewerError::ConfigParse`] for malformed JSON or mistyped keys,
    /// [`ViewerError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`ViewerError::InvalidConfig`] naming the first offending option.
    pub fn validate(&self) -> Result<(), ViewerError> {
        let numbers = [
            ("width", self.width),
            ("height", self.height),
            ("modelOffsetX", self.model_offset_x),
            ("modelOffsetY", self.model_offset_y),
            ("defaultRotationX", self.default_rotation_x),
            ("defaultRotationY", self.default_rotation_y),
            ("defaultZoom", self.default_zoom),
            ("minZoomDistance", self.min_zoom_distance),
            ("maxZoomDistance", self.max_zoom_distance),
            ("ambientIntensity", self.ambient_intensity),
            ("keyLightIntensity", self.key_light_intensity),
            ("fillLightIntensity", self.fill_light_intensity),
            ("rimLightIntensity", self.rim_light_intensity),
            ("autoRotateSpeed", self.auto_rotate_speed),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ViewerError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ViewerError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.min_zoom_distance <= 0.0 {
            return Err(ViewerError::InvalidConfig(format!(
                "minZoomDistance must be positive, got {}",
                self.min_zoom_distance
            )));
        }
        if self.min_zoom_distance > self.max_zoom_distance {
            return Err(ViewerError::InvalidConfig(format!(
                "minZoomDistance {} exceeds maxZoomDistance {}",
                self.min_zoom_distance, self.max_zoom_distance
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits::new(self.min_zoom_distance, self.max_zoom_distance)
    }

    /// Camera distance used before (or instead of) auto-framing.
    #[must_use]
    pub fn initial_distance(&self) -> f64 {
        self.zoom_limits().clamp(self.default_zoom)
    }

    #[must_use]
    pub fn initial_orientation(&self) -> Orientation {
        Orientation::from_degrees(self.default_rotation_x, self.default_rotation_y)
    }

    #[must_use]
    pub fn gesture_policy(&self) -> GesturePolicy {
        GesturePolicy {
            rotate: self.enable_manual_rotation,
            zoom: self.enable_manual_zoom,
            limits: self.zoom_limits(),
        }
    }

    #[must_use]
    pub fn lighting_rig(&self) -> LightingRig {
        LightingRig {
            ambient: self.ambient_intensity,
            key: self.key_light_intensity,
            fill: self.fill_light_intensity,
            rim: self.rim_light_intensity,
            directional: !self.show_light_bulb,
        }
    }

    /// Pixel offsets as an NDC offset for `viewport`.
    #[must_use]
    pub fn offset_ndc(&self, viewport: &Viewport) -> DVec2 {
        viewport.offset_to_ndc(self.model_offset_x, self.model_offset_y)
    }

    /// Autorotation speed when enabled.
    #[must_use]
    pub fn auto_rotate(&self) -> Option<f64> {
        self.auto_rotate.then_some(self.auto_rotate_speed)
    }

    /// Environment preset name, `None` when disabled.
    #[must_use]
    pub fn environment(&self) -> Option<&str> {
        let preset = self.environment_preset.trim();
        (!preset.is_empty() && preset != NO_ENVIRONMENT).then_some(preset)
    }
}
