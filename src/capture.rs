//! Screenshot capture with scoped suppression of shadows and overlays.
//!
//! [`CaptureGuard`] records the renderer's shadow map flag, every light's
//! shadow casting and every overlay's visibility, switches them all off, and
//! puts them back when dropped. [`capture`] renders and encodes while the
//! guard is alive, so the restore runs on the error path too.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use std::ops::{Deref, DerefMut};

use crate::consts::{CAPTURE_FILE_NAME, CAPTURE_MIME};
use crate::error::ViewerError;

/// The rendering backend, reduced to the switches capture needs.
pub trait Renderer {
    fn shadow_map_enabled(&self) -> bool;
    fn set_shadow_map_enabled(&mut self, enabled: bool);

    fn light_count(&self) -> usize;
    fn casts_shadow(&self, light: usize) -> bool;
    fn set_casts_shadow(&mut self, light: usize, cast: bool);

    /// Helper objects that are not part of the model (bulb, gizmos).
    fn overlay_count(&self) -> usize;
    fn overlay_visible(&self, overlay: usize) -> bool;
    fn set_overlay_visible(&mut self, overlay: usize, visible: bool);

    /// Draw one frame synchronously.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Render`] when the backend fails to draw.
    fn render(&mut self) -> Result<(), ViewerError>;

    /// Encode the last frame as a data URL of type `mime`.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Encode`] when the canvas cannot be encoded.
    fn encode_image(&mut self, mime: &str) -> Result<String, ViewerError>;
}

/// Renderer flags switched off for the lifetime of the guard.
pub struct CaptureGuard<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    shadow_map: bool,
    shadows: Vec<bool>,
    overlays: Vec<bool>,
}

impl<'a, R: Renderer + ?Sized> CaptureGuard<'a, R> {
    pub fn acquire(renderer: &'a mut R) -> Self {
        let shadow_map = renderer.shadow_map_enabled();
        let shadows = (0..renderer.light_count()).map(|i| renderer.casts_shadow(i)).collect::<Vec<_>>();
        let overlays = (0..renderer.overlay_count()).map(|i| renderer.overlay_visible(i)).collect::<Vec<_>>();

        renderer.set_shadow_map_enabled(false);
        for i in 0..shadows.len() {
            renderer.set_casts_shadow(i, false);
        }
        for i in 0..overlays.len() {
            renderer.set_overlay_visible(i, false);
        }
        Self { renderer, shadow_map, shadows, overlays }
    }
}

impl<R: Renderer + ?Sized> Deref for CaptureGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for CaptureGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for CaptureGuard<'_, R> {
    fn drop(&mut self) {
        for (i, cast) in self.shadows.iter().enumerate() {
            self.renderer.set_casts_shadow(i, *cast);
        }
        for (i, visible) in self.overlays.iter().enumerate() {
            self.renderer.set_overlay_visible(i, *visible);
        }
        self.renderer.set_shadow_map_enabled(self.shadow_map);
    }
}

/// An encoded screenshot ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub file_name: &'static str,
    pub data_url: String,
}

/// Render one clean frame and encode it as PNG.
///
/// # Errors
///
/// Propagates render and encode failures after the renderer's flags have
/// been restored.
pub fn capture<R: Renderer + ?Sized>(renderer: &mut R) -> Result<Capture, ViewerError> {
    let mut guard = CaptureGuard::acquire(renderer);
    guard.render()?;
    let data_url = guard.encode_image(CAPTURE_MIME)?;
    drop(guard);
    log::info!("captured {} ({} bytes)", CAPTURE_FILE_NAME, data_url.len());
    Ok(Capture { file_name: CAPTURE_FILE_NAME, data_url })
}
