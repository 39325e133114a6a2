//! Application lifecycle and event loop.
//!
//! A [`SampleApp`] owns the scene: it loads resources in `init`, advances
//! state and builds UI in `update`, and records draws in `render`. The loop
//! here owns everything around that — window, GPU context, camera input,
//! debug overlay and UI painting.
//!
//! Each frame runs through the same sequence:
//! 1. Apply accumulated camera input and push the camera uniform
//! 2. Begin the UI pass and call the app's `update`
//! 3. Record the main render pass (scene, then overlay lines)
//! 4. Paint overlay labels and the UI, submit, present

use std::iter;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::camera::view_projection;
use crate::context::{Context, MouseButtonState};
use crate::debug_draw::DebugDraw;
use crate::gui::Gui;

/// A scene driven by the event loop.
pub trait SampleApp: Sized {
    /// Create the scene. Runs once, after the GPU context is ready.
    fn init(ctx: &mut Context) -> anyhow::Result<Self>;

    /// Advance state, build UI and queue overlay primitives for this frame.
    fn update(
        &mut self,
        ctx: &mut Context,
        ui: &egui::Context,
        debug: &mut DebugDraw,
        dt: Duration,
    );

    /// Record draw calls into the frame's main render pass.
    fn render(&mut self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>);

    /// React to the window changing size. Optional.
    fn resize(&mut self, _ctx: &Context, _width: u32, _height: u32) {}
}

/// Application state bundle: GPU context, the scene and surface status.
pub struct AppState<A: SampleApp> {
    ctx: Context,
    app: A,
    gui: Gui,
    debug: DebugDraw,
    is_surface_configured: bool,
}

impl<A: SampleApp> AppState<A> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window).await?;
        let gui = Gui::new(&ctx.window, &ctx.device, ctx.config.format);
        let debug = DebugDraw::new(&ctx.device, &ctx.config, &ctx.camera.bind_group_layout);
        let app = A::init(&mut ctx)?;
        Ok(Self {
            ctx,
            app,
            gui,
            debug,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.is_surface_configured = true;
            self.ctx.resize(width, height);
            self.app.resize(&self.ctx, width, height);
        }
    }

    fn render(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        // Apply the frame's camera input first so everything below sees the
        // same view.
        self.ctx
            .camera
            .controller
            .update(&mut self.ctx.camera.camera, dt);
        self.ctx.update_camera_buffer();

        self.gui.begin_frame(&self.ctx.window);
        self.debug.begin_frame();
        self.app.update(&mut self.ctx, &self.gui.ctx, &mut self.debug, dt);
        self.debug.flush(&self.ctx.device, &self.ctx.queue);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.app.render(&self.ctx, &mut render_pass);
            self.debug
                .draw(&mut render_pass, &self.ctx.camera.bind_group);
        }

        // Overlay labels ride on the still-open UI pass.
        let vp = view_projection(&self.ctx.camera.camera, &self.ctx.projection);
        self.debug.paint_texts(
            &self.gui.ctx,
            &vp,
            self.ctx.config.width as f32,
            self.ctx.config.height as f32,
        );
        self.gui.end_frame_and_paint(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &self.ctx.window,
            &view,
            &self.ctx.config,
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<A: SampleApp + 'static> {
    title: &'static str,
    state: Option<AppState<A>>,
    last_time: Instant,
}

impl<A: SampleApp + 'static> ApplicationHandler for App<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title(self.title);
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => panic!("Cannot create the main window: {}", e),
        };

        match pollster::block_on(AppState::new(window)) {
            Ok(state) => self.state = Some(state),
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        }
        self.last_time = Instant::now();
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            let speed_factor = 5.0;
            if let MouseButtonState::Right = state.ctx.mouse {
                state
                    .ctx
                    .camera
                    .controller
                    .handle_mouse(dx * speed_factor, dy * speed_factor);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // The UI gets first pick; events it consumes never reach the camera.
        let consumed = state.gui.on_window_event(&state.ctx.window, &event);
        if !consumed {
            state.ctx.camera.controller.handle_window_events(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !consumed => {
                state.ctx.mouse = match (button, button_state.is_pressed()) {
                    (MouseButton::Left, true) => MouseButtonState::Left,
                    (MouseButton::Right, true) => MouseButtonState::Right,
                    _ => MouseButtonState::None,
                };
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Create the window and drive `A` until the window closes.
pub fn run<A: SampleApp + 'static>(title: &'static str) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app: App<A> = App {
        title,
        state: None,
        last_time: Instant::now(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
