//! Input-to-motion core for an interactive single-object 3D viewer.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to a
//! rendering backend it never draws with directly. It owns the part of the
//! viewer that decides how the object moves: normalizing raw pointer input,
//! classifying gestures, blending drag inertia with parallax, hover tilt and
//! autorotation once per frame, and the projection math that keeps the object
//! anchored on screen and lets a light be dragged across the floor. The host
//! layer wires DOM events and the render loop to [`bridge::ViewerSession`] and
//! reacts to the [`session::Action`]s it gets back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Orchestration and the browser-free [`session::SessionCore`] |
//! | [`bridge`] | DOM listener ownership, fade timer, download trigger |
//! | [`config`] | Host options, defaults and validation |
//! | [`input`] | Normalized pointer events and device classes |
//! | [`gesture`] | The idle/deciding/rotate/pinch state machine |
//! | [`motion`] | Per-frame blending of drag, inertia, parallax, hover, autorotate |
//! | [`camera`] | Perspective camera, projection, auto-framing, zoom limits |
//! | [`geometry`] | Boxes, spheres, rays and planes |
//! | [`asset`] | Asset sources, the scene-graph seam and normalization |
//! | [`light`] | Draggable, toggleable light bulb and the lighting rig |
//! | [`capture`] | Screenshot capture with scoped shadow/overlay suppression |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared tuning constants |

pub mod asset;
pub mod bridge;
pub mod camera;
pub mod capture;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod light;
pub mod motion;
pub mod session;
