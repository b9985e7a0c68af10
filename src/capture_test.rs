use super::*;

#[derive(Debug, Default)]
struct FakeRenderer {
    shadow_map: bool,
    shadows: Vec<bool>,
    overlays: Vec<bool>,
    fail_render: bool,
    fail_encode: bool,
    /// Snapshot of `(shadow_map, shadows, overlays)` taken at render time.
    seen_at_render: Option<(bool, Vec<bool>, Vec<bool>)>,
    renders: usize,
}

impl FakeRenderer {
    fn scene() -> Self {
        Self {
            shadow_map: true,
            shadows: vec![true, false, true],
            overlays: vec![true, false],
            ..Self::default()
        }
    }
}

impl Renderer for FakeRenderer {
    fn shadow_map_enabled(&self) -> bool {
        self.shadow_map
    }

    fn set_shadow_map_enabled(&mut self, enabled: bool) {
        self.shadow_map = enabled;
    }

    fn light_count(&self) -> usize {
        self.shadows.len()
    }

    fn casts_shadow(&self, light: usize) -> bool {
        self.shadows[light]
    }

    fn set_casts_shadow(&mut self, light: usize, cast: bool) {
        self.shadows[light] = cast;
    }

    fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    fn overlay_visible(&self, overlay: usize) -> bool {
        self.overlays[overlay]
    }

    fn set_overlay_visible(&mut self, overlay: usize, visible: bool) {
        self.overlays[overlay] = visible;
    }

    fn render(&mut self) -> Result<(), ViewerError> {
        self.renders += 1;
        self.seen_at_render = Some((self.shadow_map, self.shadows.clone(), self.overlays.clone()));
        if self.fail_render {
            return Err(ViewerError::Render("context lost".into()));
        }
        Ok(())
    }

    fn encode_image(&mut self, mime: &str) -> Result<String, ViewerError> {
        if self.fail_encode {
            return Err(ViewerError::Encode("tainted canvas".into()));
        }
        Ok(format!("data:{mime};base64,AAAA"))
    }
}

#[test]
fn capture_renders_clean_frame_and_restores() {
    let mut r = FakeRenderer::scene();
    let shot = capture(&mut r).unwrap();

    assert_eq!(shot.file_name, "model.png");
    assert_eq!(shot.data_url, "data:image/png;base64,AAAA");
    assert_eq!(r.renders, 1);

    let (map, shadows, overlays) = r.seen_at_render.clone().unwrap();
    assert!(!map);
    assert!(shadows.iter().all(|s| !s));
    assert!(overlays.iter().all(|v| !v));

    assert!(r.shadow_map);
    assert_eq!(r.shadows, vec![true, false, true]);
    assert_eq!(r.overlays, vec![true, false]);
}

#[test]
fn encode_failure_still_restores() {
    let mut r = FakeRenderer { fail_encode: true, ..FakeRenderer::scene() };
    let err = capture(&mut r).unwrap_err();
    assert!(matches!(err, ViewerError::Encode(_)));
    assert!(r.shadow_map);
    assert_eq!(r.shadows, vec![true, false, true]);
    assert_eq!(r.overlays, vec![true, false]);
}

#[test]
fn render_failure_still_restores() {
    let mut r = FakeRenderer { fail_render: true, ..FakeRenderer::scene() };
    let err = capture(&mut r).unwrap_err();
    assert!(matches!(err, ViewerError::Render(_)));
    assert_eq!(r.shadows, vec![true, false, true]);
    assert_eq!(r.overlays, vec![true, false]);
}

#[test]
fn guard_restores_on_drop() {
    let mut r = FakeRenderer::scene();
    {
        let guard = CaptureGuard::acquire(&mut r);
        assert!(!guard.shadow_map_enabled());
        assert!(!guard.casts_shadow(0));
        assert!(!guard.overlay_visible(0));
    }
    assert!(r.shadow_map);
    assert!(r.casts_shadow(0));
    assert!(r.overlay_visible(0));
}

#[test]
fn capture_works_through_trait_object() {
    let mut boxed: Box<dyn Renderer> = Box::new(FakeRenderer::scene());
    let shot = capture(boxed.as_mut()).unwrap();
    assert!(shot.data_url.starts_with("data:image/png"));
}

#[test]
fn empty_scene_captures() {
    let mut r = FakeRenderer::default();
    assert!(capture(&mut r).is_ok());
    assert!(!r.shadow_map);
}
