#![allow(dead_code)]

use std::path::{Path, PathBuf};

use arena_viewer::input::{Binding, BindingState, InputSource};

/// Input that replays whatever the test sets up.
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    pub paused: bool,
    held: Vec<Binding>,
    mouse_x: f32,
    mouse_y: f32,
    reads: u32,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(bindings: &[Binding]) -> Self {
        Self {
            held: bindings.to_vec(),
            ..Self::default()
        }
    }

    pub fn hold(&mut self, binding: Binding) {
        if !self.held.contains(&binding) {
            self.held.push(binding);
        }
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Queues mouse movement, already in the "positive turns left" sense.
    pub fn move_mouse(&mut self, x: f32, y: f32) {
        self.mouse_x += x;
        self.mouse_y += y;
    }

    /// How many times a mouse delta was consumed.
    pub fn mouse_reads(&self) -> u32 {
        self.reads
    }

    pub fn pending_mouse(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }
}

impl InputSource for ScriptedInput {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn binding(&self, binding: Binding) -> BindingState {
        BindingState {
            is_down: self.held.contains(&binding),
            ..BindingState::default()
        }
    }

    fn take_mouse_delta_x(&mut self) -> f32 {
        self.reads += 1;
        std::mem::take(&mut self.mouse_x)
    }

    fn take_mouse_delta_y(&mut self) -> f32 {
        self.reads += 1;
        std::mem::take(&mut self.mouse_y)
    }
}

/// A fresh, empty directory under the system temp dir.
pub(crate) fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arena-viewer-{}-{}", test_name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir can be created");
    dir
}

/// Writes a `width` x `height` PNG filled with `rgba`.
pub(crate) fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
        .save(&path)
        .expect("png can be written");
    path
}

/// A device without a window, `None` when the machine has no usable adapter.
#[cfg(feature = "integration-tests")]
pub(crate) fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    futures::executor::block_on(async {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("test device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .ok()
    })
}
