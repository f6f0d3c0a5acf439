//! GPU rendering session state machine.
//!
//! Owns every GPU handle and serializes surface lifecycle mutation
//! against in-flight frames with a single session lock. Each state
//! variant carries exactly the handles that are valid in that state, so
//! no operation can touch a stale surface or pipeline.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use winit::window::Window;

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::input::RotationAngle;
use crate::mesh::{Mesh, MeshBuffers};
use crate::resources::{self, UniformResources, ViewProjectionUniform, MESH_SHADER};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.5,
    a: 1.0,
};

const FRAME_LOG_INTERVAL: u64 = 60;

enum SessionState {
    Uninitialized,
    /// prepare() is awaiting adapter/device acquisition. Doubles as the
    /// single-flight guard for concurrent prepare calls.
    Preparing,
    Prepared(PreparedSession),
    Configured(ConfiguredSession),
}

/// Handles valid once device acquisition has completed.
struct PreparedSession {
    gpu: GpuContext,
    uniforms: UniformResources,
    mesh_buffers: MeshBuffers,
}

/// Handles additionally valid while a configured surface exists.
struct ConfiguredSession {
    prepared: PreparedSession,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    camera: Camera,
}

/// The rendering session exposed to the host.
pub struct RenderSession {
    state: Mutex<SessionState>,
    rotation: RotationAngle,
    frame_count: AtomicU64,
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState::Uninitialized),
            rotation: RotationAngle::new(),
            frame_count: AtomicU64::new(0),
        }
    }

    /// The drag-accumulated orbit angle, written by the input handler and
    /// read by the frame loop.
    pub fn rotation(&self) -> &RotationAngle {
        &self.rotation
    }

    pub fn is_prepared(&self) -> bool {
        matches!(
            *self.state.lock().unwrap(),
            SessionState::Prepared(_) | SessionState::Configured(_)
        )
    }

    pub fn is_configured(&self) -> bool {
        matches!(*self.state.lock().unwrap(), SessionState::Configured(_))
    }

    /// Width and height of the configured surface, if any.
    pub fn surface_extent(&self) -> Option<(u32, u32)> {
        match &*self.state.lock().unwrap() {
            SessionState::Configured(configured) => {
                Some((configured.config.width, configured.config.height))
            }
            _ => None,
        }
    }

    /// Acquires instance, adapter and device, then builds the uniform
    /// resources and uploads `mesh`. Idempotent; a concurrent call
    /// observes the in-progress or completed state and returns.
    pub async fn prepare(&self, mesh: &Mesh) {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                SessionState::Uninitialized => *state = SessionState::Preparing,
                _ => return,
            }
        }

        // The lock is not held across the await points below.
        let prepared = match Self::acquire_resources(mesh).await {
            Ok(prepared) => prepared,
            Err(error) => {
                log::error!("session initialization failed: {error:#}");
                let mut state = self.state.lock().unwrap();
                if matches!(*state, SessionState::Preparing) {
                    *state = SessionState::Uninitialized;
                }
                return;
            }
        };

        let mut state = self.state.lock().unwrap();
        // A reset() issued during acquisition wins over the late result.
        if matches!(*state, SessionState::Preparing) {
            *state = SessionState::Prepared(prepared);
            log::info!("session prepared");
        }
    }

    async fn acquire_resources(mesh: &Mesh) -> Result<PreparedSession> {
        let gpu = GpuContext::new().await?;
        let uniforms = UniformResources::new(&gpu.device);
        let mesh_buffers = MeshBuffers::upload(&gpu, mesh);

        Ok(PreparedSession {
            gpu,
            uniforms,
            mesh_buffers,
        })
    }

    /// Binds the session to a native window surface and configures it.
    /// Requires a prepared session; zero dimensions are ignored.
    /// Re-attaching while configured replaces the surface resources,
    /// which is what a host delivers after its window is recreated.
    pub fn attach_surface(&self, window: &Window, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("attach_surface ignored: invalid dimensions {width}x{height}");
            return;
        }

        let mut state = self.state.lock().unwrap();
        let prepared = match mem::replace(&mut *state, SessionState::Uninitialized) {
            SessionState::Prepared(prepared) => prepared,
            SessionState::Configured(configured) => configured.prepared,
            other => {
                *state = other;
                log::debug!("attach_surface ignored: session not prepared");
                return;
            }
        };

        match Self::configure_surface(&prepared, window, width, height) {
            Ok((surface, config, pipeline, camera)) => {
                log::info!("surface configured at {width}x{height} ({:?})", config.format);
                *state = SessionState::Configured(ConfiguredSession {
                    prepared,
                    surface,
                    config,
                    pipeline,
                    camera,
                });
            }
            Err(error) => {
                log::warn!("surface attach failed: {error:#}");
                *state = SessionState::Prepared(prepared);
            }
        }
    }

    fn configure_surface(
        prepared: &PreparedSession,
        window: &Window,
        width: u32,
        height: u32,
    ) -> Result<(
        wgpu::Surface<'static>,
        wgpu::SurfaceConfiguration,
        wgpu::RenderPipeline,
        Camera,
    )> {
        let gpu = &prepared.gpu;

        // The host keeps the window alive until detach_surface or reset
        // has dropped this surface.
        let surface = unsafe {
            gpu.instance
                .create_surface_unsafe(wgpu::SurfaceTargetUnsafe::from_window(window)?)?
        };

        let capabilities = surface.get_capabilities(&gpu.adapter);
        let Some(&format) = capabilities.formats.first() else {
            return Err(anyhow!("surface reports no supported texture formats"));
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let pipeline = resources::create_render_pipeline(
            &gpu.device,
            MESH_SHADER,
            &prepared.uniforms.bind_group_layout,
            format,
        );
        let camera = Camera::new(width as f32 / height as f32);

        Ok((surface, config, pipeline, camera))
    }

    /// Reconfigures the surface for new dimensions and re-derives the
    /// projection aspect. The pipeline is cached by format and only
    /// rebuilt if the advertised format moved.
    pub fn resize(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("resize ignored: invalid dimensions {width}x{height}");
            return;
        }

        let mut state = self.state.lock().unwrap();
        let SessionState::Configured(configured) = &mut *state else {
            log::debug!("resize ignored: no configured surface");
            return;
        };

        let gpu = &configured.prepared.gpu;
        let capabilities = configured.surface.get_capabilities(&gpu.adapter);
        let Some(&format) = capabilities.formats.first() else {
            log::warn!("resize ignored: surface reports no supported texture formats");
            return;
        };

        configured.config.width = width;
        configured.config.height = height;
        if format != configured.config.format {
            configured.config.format = format;
            configured.pipeline = resources::create_render_pipeline(
                &gpu.device,
                MESH_SHADER,
                &configured.prepared.uniforms.bind_group_layout,
                format,
            );
        }
        configured.surface.configure(&gpu.device, &configured.config);
        configured
            .camera
            .set_aspect_ratio(width as f32 / height as f32);
    }

    /// Drops the surface and pipeline; device and uniform resources
    /// persist so a later attach is cheap.
    pub fn detach_surface(&self) {
        let mut state = self.state.lock().unwrap();
        let previous = mem::replace(&mut *state, SessionState::Uninitialized);
        *state = match previous {
            SessionState::Configured(configured) => {
                log::info!("surface detached");
                SessionState::Prepared(configured.prepared)
            }
            other => other,
        };
    }

    /// Drops every owned handle and returns to the uninitialized state.
    /// Always safe, including before initialization and mid-prepare.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        *state = SessionState::Uninitialized;
        log::debug!("session reset");
    }

    /// One frame: recompute and upload the view-projection matrix, then
    /// encode, submit and present. Never panics; a failed frame is
    /// logged and dropped.
    pub fn frame_tick(&self) {
        let state = self.state.lock().unwrap();
        let SessionState::Configured(configured) = &*state else {
            return;
        };

        self.upload_view_projection(configured);

        match Self::render_frame(configured) {
            Ok(()) => {
                let rendered = self.frame_count.fetch_add(1, Ordering::Relaxed) + 1;
                if rendered % FRAME_LOG_INTERVAL == 0 {
                    log::debug!("rendered {rendered} frames");
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                let gpu = &configured.prepared.gpu;
                configured.surface.configure(&gpu.device, &configured.config);
            }
            Err(error) => log::error!("frame skipped: {error}"),
        }
    }

    fn upload_view_projection(&self, configured: &ConfiguredSession) {
        let matrix = configured.camera.view_projection(self.rotation.get());
        let uniform = ViewProjectionUniform::new(matrix);
        configured.prepared.gpu.queue.write_buffer(
            &configured.prepared.uniforms.buffer,
            0,
            bytemuck::bytes_of(&uniform),
        );
    }

    fn render_frame(configured: &ConfiguredSession) -> Result<(), wgpu::SurfaceError> {
        let gpu = &configured.prepared.gpu;
        let output = configured.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let buffers = &configured.prepared.mesh_buffers;
            pass.set_pipeline(&configured.pipeline);
            pass.set_bind_group(0, &configured.prepared.uniforms.bind_group, &[]);
            pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
            pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..buffers.index_count, 0, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        // Pump callbacks queued by the submission.
        gpu.device.poll(wgpu::Maintain::Poll);

        Ok(())
    }
}
