//! arena-viewer
//!
//! A first-person viewer for a small walled arena, running natively and in
//! the browser. Shader programs, mesh buffers and textures are kept in typed
//! registries built once at startup; the scene references them by shared
//! handle and is drawn object by object every frame.
//!
//! High-level modules
//! - `camera`: first person camera state and its movement rules
//! - `config`: viewer configuration read from TOML
//! - `context`: window, surface, device and depth buffer
//! - `data_structures`: meshes, transforms, GPU textures and swappable handles
//! - `error`: typed setup errors
//! - `flow`: startup and the per-frame event loop
//! - `input`: the polled input contract and its winit implementation
//! - `pipelines`: shader vocabulary, shader builds and the shader registry
//! - `render`: per-frame uniforms and draw submission
//! - `resources`: mesh and texture registries and asset loading
//! - `scene`: the arena layout and its placed objects
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use flow::{run, run_with_config};
