//! Asset sources, the scene-graph seam and bounding-sphere normalization.
//!
//! Parsing 3D file formats is left to an external [`AssetLoader`]; this
//! module only decides which loader a URL needs ([`AssetSource`]), talks to
//! the loaded content through the [`SceneGraph`] trait, and computes the one
//! transform that every downstream constant depends on: re-centering the
//! content on its bounding sphere and scaling it to a unit diameter.

#[cfg(test)]
#[path = "asset_test.rs"]
mod asset_test;

use glam::{DMat4, DVec3};

use crate::error::ViewerError;
use crate::geometry::{Aabb, Sphere};

/// Where an asset comes from, tagged by the loader that understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// glTF 2.0, text (`.gltf`) or binary (`.glb`).
    Gltf(String),
    /// Autodesk FBX.
    Fbx(String),
    /// Wavefront OBJ.
    Obj(String),
}

impl AssetSource {
    /// Resolve the loader from the URL's file extension (case-insensitive,
    /// query string and fragment ignored).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnsupportedFormat`] for any other extension.
    pub fn from_url(url: &str) -> Result<Self, ViewerError> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let ext = file.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();
        match ext.as_str() {
            "glb" | "gltf" => Ok(Self::Gltf(url.to_owned())),
            "fbx" => Ok(Self::Fbx(url.to_owned())),
            "obj" => Ok(Self::Obj(url.to_owned())),
            _ => Err(ViewerError::UnsupportedFormat(if ext.is_empty() { url.to_owned() } else { ext })),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Gltf(url) | Self::Fbx(url) | Self::Obj(url) => url,
        }
    }

    /// Short format tag for logs.
    #[must_use]
    pub fn format(&self) -> &'static str {
        match self {
            Self::Gltf(_) => "gltf",
            Self::Fbx(_) => "fbx",
            Self::Obj(_) => "obj",
        }
    }
}

/// Per-mesh render flags the viewer is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMaterial {
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub transparent: bool,
    pub opacity: f64,
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self { cast_shadow: false, receive_shadow: false, transparent: false, opacity: 1.0 }
    }
}

/// An already-parsed, traversable scene graph.
pub trait SceneGraph {
    /// Bounds of every mesh in the graph's own coordinates, `None` when empty.
    fn bounds(&self) -> Option<Aabb>;

    /// Visit the material flags of every mesh.
    fn for_each_mesh(&mut self, visit: &mut dyn FnMut(&mut MeshMaterial));
}

/// Turns an [`AssetSource`] into a scene graph.
pub trait AssetLoader {
    /// # Errors
    ///
    /// Implementations return [`ViewerError::Load`] when the content cannot
    /// be fetched or parsed.
    fn load(&mut self, source: &AssetSource) -> Result<Box<dyn SceneGraph>, ViewerError>;
}

/// One mesh of a [`MeshScene`]: vertex positions plus its material flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub material: MeshMaterial,
}

impl Mesh {
    #[must_use]
    pub fn new(positions: Vec<DVec3>) -> Self {
        Self { positions, material: MeshMaterial::default() }
    }
}

/// Plain in-memory scene graph for hosts that hand over raw vertex data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshScene {
    pub meshes: Vec<Mesh>,
}

impl MeshScene {
    #[must_use]
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    /// Rewrite every vertex through `normalization`.
    pub fn bake(&mut self, normalization: &Normalization) {
        for mesh in &mut self.meshes {
            for p in &mut mesh.positions {
                *p = normalization.apply(*p);
            }
        }
    }
}

impl SceneGraph for MeshScene {
    fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.meshes.iter().flat_map(|m| m.positions.iter().copied()))
    }

    fn for_each_mesh(&mut self, visit: &mut dyn FnMut(&mut MeshMaterial)) {
        for mesh in &mut self.meshes {
            visit(&mut mesh.material);
        }
    }
}

/// Re-centering and uniform scale that maps a bounding sphere to the unit
/// diameter sphere at the origin: `p' = (p + translation) × scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub translation: DVec3,
    pub scale: f64,
}

impl Default for Normalization {
    fn default() -> Self {
        Self { translation: DVec3::ZERO, scale: 1.0 }
    }
}

impl Normalization {
    /// Normalization for `sphere`. A degenerate sphere is only re-centered.
    #[must_use]
    pub fn for_sphere(sphere: &Sphere) -> Self {
        let translation = if sphere.center.is_finite() { -sphere.center } else { DVec3::ZERO };
        let scale = if sphere.is_degenerate() { 1.0 } else { 1.0 / (sphere.radius * 2.0) };
        Self { translation, scale }
    }

    #[must_use]
    pub fn apply(&self, p: DVec3) -> DVec3 {
        (p + self.translation) * self.scale
    }

    /// The sphere after normalization.
    #[must_use]
    pub fn apply_sphere(&self, sphere: &Sphere) -> Sphere {
        Sphere { center: self.apply(sphere.center), radius: sphere.radius * self.scale }
    }

    /// Matrix form, for the renderer's inner group.
    #[must_use]
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale(DVec3::splat(self.scale)) * DMat4::from_translation(self.translation)
    }

    /// Whether applying this normalization changes nothing (within `tolerance`).
    #[must_use]
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.translation.abs().max_element() <= tolerance && (self.scale - 1.0).abs() <= tolerance
    }
}

/// A scene graph that has been normalized once, on arrival.
pub struct LoadedAsset {
    pub source: AssetSource,
    pub scene: Box<dyn SceneGraph>,
    pub normalization: Normalization,
    /// Bounding sphere after normalization; `None` for an empty scene.
    pub sphere: Option<Sphere>,
}

impl LoadedAsset {
    /// Compute the normalization for freshly loaded content.
    #[must_use]
    pub fn normalize(source: AssetSource, scene: Box<dyn SceneGraph>) -> Self {
        let raw = scene.bounds().map(|b| b.bounding_sphere());
        let normalization = raw.as_ref().map(Normalization::for_sphere).unwrap_or_default();
        let sphere = raw.map(|s| normalization.apply_sphere(&s));
        Self { source, scene, normalization, sphere }
    }

    /// Normalized bounding sphere, unless empty or degenerate.
    #[must_use]
    pub fn frame_sphere(&self) -> Option<Sphere> {
        self.sphere.filter(|s| !s.is_degenerate())
    }

    /// Visit the material flags of every mesh.
    pub fn for_each_mesh(&mut self, visit: &mut dyn FnMut(&mut MeshMaterial)) {
        self.scene.for_each_mesh(visit);
    }
}

impl std::fmt::Debug for LoadedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedAsset")
            .field("source", &self.source)
            .field("normalization", &self.normalization)
            .field("sphere", &self.sphere)
            .finish_non_exhaustive()
    }
}
