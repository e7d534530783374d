//! Application flow and the winit event loop.
//!
//! Startup builds the GPU context, the shader, mesh and texture registries
//! and the scene, all inside one async initialisation (blocked on natively,
//! spawned on the web). After that every redraw runs one frame:
//!
//! 1. Update the camera from polled input
//! 2. Bring the surface in line with the drawable size
//! 3. Write per-object uniforms, clear and draw the scene
//! 4. Present and request the next redraw

use std::{fmt::Debug, iter, sync::Arc};

use anyhow::Context as _;
use cgmath::Vector3;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    camera::{Camera, CameraController},
    config::ViewerConfig,
    context::Context,
    input::InputState,
    pipelines::{
        builtin_shaders,
        shader::{ShaderRegistry, texture_bind_group_layout},
    },
    render::{FrameUniforms, clear_color, encode_frame},
    resources::{Spawner, mesh::BuffersRegistry, texture::TextureRegistry},
    scene::{ARENA_MESHES, ARENA_TEXTURES, Scene, arena_layout},
};

/// Everything a running viewer owns. Registries live as long as the viewer.
#[derive(Debug)]
pub struct Viewer {
    ctx: Context,
    shaders: ShaderRegistry,
    meshes: BuffersRegistry,
    textures: TextureRegistry,
    scene: Scene,
    camera: Camera,
    controller: CameraController,
    input: InputState,
    light_position: Vector3<f32>,
    clear_color: wgpu::Color,
}

impl Viewer {
    /// Builds the registries and the scene. Shader build failures and
    /// unknown names abort, texture decode failures only leave placeholders.
    pub async fn new(window: Arc<Window>, config: &ViewerConfig, spawner: Spawner) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let texture_layout = Arc::new(texture_bind_group_layout(&ctx.device));

        log::info!("building shaders");
        let mut shaders = ShaderRegistry::new(ctx.device.clone(), ctx.config.format, texture_layout.clone());
        for desc in builtin_shaders() {
            shaders
                .compile(&desc)
                .await
                .with_context(|| format!("cannot build shader `{}`", desc.name))?;
        }

        log::info!("uploading meshes");
        let mut meshes = BuffersRegistry::new(ctx.device.clone());
        for name in ARENA_MESHES {
            meshes.load(name)?;
        }

        log::info!("loading textures from {}", config.asset_dir.0.display());
        let mut textures = TextureRegistry::new(
            ctx.device.clone(),
            ctx.queue.clone(),
            texture_layout,
            config.asset_dir.0.clone(),
            spawner,
        );
        for name in ARENA_TEXTURES {
            textures.load(name, format!("{name}.png"));
        }

        let light_position = Vector3::from(config.render.light_position);
        let scene = Scene::build(
            &ctx.device,
            &arena_layout(light_position),
            &shaders,
            &meshes,
            &textures,
        )
        .context("cannot build the scene")?;

        Ok(Self {
            ctx,
            shaders,
            meshes,
            textures,
            scene,
            camera: Camera::from_config(&config.camera),
            controller: CameraController::from_config(&config.camera),
            input: InputState::new(),
            light_position,
            clear_color: clear_color(config.render.clear_color),
        })
    }

    /// Runs one frame `dt` seconds after the previous one.
    pub fn frame(&mut self, dt: f32) -> Result<(), FrameError> {
        self.controller.update(&mut self.camera, &mut self.input, dt);
        self.input.flush();

        self.ctx.sync_surface_size();
        let (output, suboptimal) = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) => (output, false),
            wgpu::CurrentSurfaceTexture::Suboptimal(output) => (output, true),
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                return Err(FrameError::Reconfigure);
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                return Err(FrameError::Skipped);
            }
            wgpu::CurrentSurfaceTexture::Validation => return Err(FrameError::Validation),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = FrameUniforms::new(&self.camera, self.ctx.size(), self.light_position);
        let commands = encode_frame(
            &self.ctx.device,
            &self.ctx.queue,
            &view,
            &self.ctx.depth_texture,
            &self.scene,
            &frame,
            self.clear_color,
        );
        self.ctx.queue.submit(iter::once(commands));
        output.present();

        if suboptimal {
            Err(FrameError::Reconfigure)
        } else {
            Ok(())
        }
    }

    pub fn window(&self) -> &Window {
        &self.ctx.window
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    pub fn meshes(&self) -> &BuffersRegistry {
        &self.meshes
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }
}

/// Why a frame could not be presented normally.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Lost, outdated or suboptimal surface. Reconfiguring fixes it.
    #[error("the surface needs to be reconfigured")]
    Reconfigure,
    /// Timed out or occluded, try again next frame.
    #[error("no surface texture was available")]
    Skipped,
    #[error("acquiring the surface texture failed validation")]
    Validation,
}

pub(crate) enum ViewerEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<Viewer>),
}

impl Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({e}))"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<ViewerEvent>,
    config: ViewerConfig,
    viewer: Option<Viewer>,
    initializing: bool,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<ViewerEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().context("cannot start the async runtime")?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            viewer: None,
            initializing: false,
            last_time: Instant::now(),
        })
    }

    fn start(&mut self, event_loop: &ActiveEventLoop, viewer: anyhow::Result<Viewer>) {
        self.initializing = false;
        match viewer {
            Ok(viewer) => {
                log::info!("viewer ready");
                self.last_time = Instant::now();
                viewer.window().request_redraw();
                self.viewer = Some(viewer);
            }
            Err(e) => {
                log::error!("App initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() || self.initializing {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot create the window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.initializing = true;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let spawner = Spawner::new(self.async_runtime.handle().clone());
            let viewer = self
                .async_runtime
                .block_on(Viewer::new(window, &self.config, spawner));
            self.start(event_loop, viewer);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let viewer = Viewer::new(window, &config, Spawner::current()).await;
                assert!(proxy.send_event(ViewerEvent::Initialized(viewer)).is_ok());
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            ViewerEvent::Initialized(viewer) => self.start(event_loop, viewer),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(viewer) = &mut self.viewer {
            viewer.input.handle_device_event(&event);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let viewer = match &mut self.viewer {
            Some(viewer) => viewer,
            None => return,
        };

        viewer.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                release_pointer(viewer.window());
                event_loop.exit();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => capture_pointer(viewer.window()),
            WindowEvent::Focused(false) => release_pointer(viewer.window()),
            WindowEvent::Resized(size) => viewer.ctx.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed().as_secs_f32();
                self.last_time = Instant::now();

                match viewer.frame(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(FrameError::Reconfigure) => {
                        let size = viewer.window().inner_size();
                        viewer.ctx.resize(size.width, size.height);
                    }
                    Err(FrameError::Skipped) => log::debug!("frame skipped"),
                    Err(e @ FrameError::Validation) => {
                        log::error!("Unable to render: {e}");
                        event_loop.exit();
                    }
                }
                viewer.window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Hides the cursor and keeps it in the window. Browsers and most desktops
/// support locking, the rest get a confined cursor.
fn capture_pointer(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => log::warn!("cannot capture the pointer: {e}"),
    }
}

fn release_pointer(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("cannot release the pointer: {e}");
    }
    window.set_cursor_visible(true);
}

fn init_logging(config: &ViewerConfig) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(log::LevelFilter::Info)
            .filter_module("wgpu_core", log::LevelFilter::Warn)
            .filter_module("wgpu_hal", log::LevelFilter::Warn);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        if let Some(filters) = &config.log_filter {
            builder.parse_filters(filters);
        }
        if let Err(e) = builder.try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        let level = config
            .log_filter
            .as_deref()
            .and_then(|filter| filter.parse().ok())
            .unwrap_or(log::Level::Info);
        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }
}

/// Loads the configuration and runs the viewer until the window closes.
pub fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::load().context("cannot load the viewer configuration")?;
    run_with_config(config)
}

pub fn run_with_config(config: ViewerConfig) -> anyhow::Result<()> {
    init_logging(&config);

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
