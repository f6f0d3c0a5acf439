//! Desktop host for the mesh viewer.
//!
//! Maps window lifecycle events 1:1 onto the rendering session:
//! resumed -> prepare + attach, resized -> resize, suspended -> detach,
//! loop exit -> reset. Rendering runs on a dedicated frame-loop thread;
//! the session lock keeps lifecycle changes and in-flight frames apart.
//!
//! # Input
//! - Left mouse drag: orbit the camera around the mesh
//! - Q/Escape: quit

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mesh_viewer::{mesh::Mesh, FrameLoop, RenderSession};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;

#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(about = "Interactive wgpu mesh viewer")]
struct Args {
    /// Initial window width in pixels
    #[arg(long, default_value_t = DEFAULT_WINDOW_WIDTH)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = DEFAULT_WINDOW_HEIGHT)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Mesh Viewer")
        .with_inner_size(PhysicalSize::new(args.width, args.height))
        .build(&event_loop)?;

    let mesh = Mesh::cube();
    let session = Arc::new(RenderSession::new());

    let frame_loop = FrameLoop::new(session.clone());
    let frame_handle = frame_loop.handle();
    let render_thread = std::thread::spawn(move || frame_loop.run());

    let mut mouse_pressed = false;
    let mut last_mouse_pos = PhysicalPosition::new(0.0f64, 0.0f64);

    let loop_handle = frame_handle.clone();
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::Resumed => {
                pollster::block_on(session.prepare(&mesh));
                let size = window.inner_size();
                session.attach_surface(&window, size.width, size.height);
            }
            Event::Suspended => session.detach_surface(),
            Event::LoopExiting => {
                loop_handle.cancel();
                session.reset();
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => {
                    // Some platforms report a zero size at creation, in
                    // which case the initial attach was skipped.
                    if session.is_configured() {
                        session.resize(size.width, size.height);
                    } else {
                        session.attach_surface(&window, size.width, size.height);
                    }
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    mouse_pressed = state == ElementState::Pressed;
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if mouse_pressed {
                        let delta_x = (position.x - last_mouse_pos.x) as f32;
                        session.rotation().apply_drag(delta_x);
                    }
                    last_mouse_pos = position;
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::KeyQ | KeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => elwt.exit(),
                _ => {}
            },
            _ => {}
        }
    })?;

    frame_handle.cancel();
    let _ = render_thread.join();
    Ok(())
}
