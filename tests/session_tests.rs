use std::sync::Arc;
use std::time::Duration;

use mesh_viewer::mesh::Mesh;
use mesh_viewer::{FrameLoop, RenderSession};

#[test]
fn test_frame_tick_before_initialization_is_a_no_op() {
    let session = RenderSession::new();
    session.frame_tick();
    assert!(!session.is_prepared());
    assert!(!session.is_configured());
}

#[test]
fn test_reset_then_frame_tick_never_draws_or_panics() {
    let session = RenderSession::new();
    session.reset();
    session.frame_tick();
    session.reset();
    session.frame_tick();
    assert!(!session.is_configured());
}

#[test]
fn test_lifecycle_calls_without_a_device_are_ignored() {
    let session = RenderSession::new();
    session.resize(800, 600);
    session.detach_surface();
    session.frame_tick();

    assert!(!session.is_prepared());
    assert_eq!(session.surface_extent(), None);
}

#[test]
fn test_prepare_is_idempotent_and_tick_safe() {
    let session = RenderSession::new();
    let mesh = Mesh::cube();

    // Headless hosts may have no adapter; either outcome must leave the
    // session usable and a second call must not change it.
    pollster::block_on(session.prepare(&mesh));
    let prepared = session.is_prepared();
    pollster::block_on(session.prepare(&mesh));
    assert_eq!(session.is_prepared(), prepared);

    // Without an attached surface a tick must not draw.
    session.frame_tick();
    assert!(!session.is_configured());
}

#[test]
fn test_concurrent_prepare_calls_are_single_flight() {
    let session = Arc::new(RenderSession::new());
    let mesh = Arc::new(Mesh::cube());

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let session = session.clone();
            let mesh = mesh.clone();
            std::thread::spawn(move || pollster::block_on(session.prepare(&mesh)))
        })
        .collect();
    for worker in workers {
        worker.join().expect("prepare must not panic");
    }

    // Whatever the outcome, the session stays usable.
    session.frame_tick();
    assert!(!session.is_configured());
}

#[test]
fn test_reset_tears_down_a_prepared_session() {
    let session = RenderSession::new();
    pollster::block_on(session.prepare(&Mesh::cube()));

    session.reset();
    assert!(!session.is_prepared());
    session.frame_tick();
}

#[test]
fn test_rotation_angle_is_shared_with_the_input_actor() {
    let session = Arc::new(RenderSession::new());

    let input = session.clone();
    let handle = std::thread::spawn(move || {
        for _ in 0..10 {
            input.rotation().apply_drag(2.5);
        }
    });
    handle.join().unwrap();

    approx::assert_relative_eq!(session.rotation().get(), -5.0);
}

#[test]
fn test_frame_loop_cancellation_is_cooperative() {
    let session = Arc::new(RenderSession::new());
    let frame_loop = FrameLoop::new(session);
    let handle = frame_loop.handle();
    assert!(handle.is_active());

    let worker = std::thread::spawn(move || frame_loop.run());
    std::thread::sleep(Duration::from_millis(50));
    handle.cancel();

    worker.join().expect("frame loop thread must exit cleanly");
    assert!(!handle.is_active());
}

#[test]
fn test_cancelled_loop_stops_scheduling_ticks() {
    let session = Arc::new(RenderSession::new());
    let frame_loop = FrameLoop::new(session.clone());
    let handle = frame_loop.handle();

    handle.cancel();
    // A pre-cancelled loop must return without ticking forever.
    frame_loop.run();
    assert!(!session.is_configured());
}
