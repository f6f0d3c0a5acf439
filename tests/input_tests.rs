use approx::assert_relative_eq;
use mesh_viewer::input::RotationAngle;

#[test]
fn test_drag_deltas_accumulate_by_a_fifth() {
    let angle = RotationAngle::new();
    let deltas = [12.0f32, -3.5, 0.25, 100.0, -47.75];

    for delta in deltas {
        angle.apply_drag(delta);
    }

    let expected = -deltas.iter().sum::<f32>() / 5.0;
    assert_relative_eq!(angle.get(), expected, epsilon = 1e-5);
}

#[test]
fn test_drag_direction_is_inverted() {
    let angle = RotationAngle::new();
    angle.apply_drag(5.0);
    assert_relative_eq!(angle.get(), -1.0);
}

#[test]
fn test_angle_is_unbounded() {
    let angle = RotationAngle::new();
    for _ in 0..1000 {
        angle.apply_drag(-500.0);
    }
    // 1000 drags of 100 degrees each, exactly representable in f32.
    assert_eq!(angle.get(), 100_000.0);
}

#[test]
fn test_set_overwrites_accumulated_state() {
    let angle = RotationAngle::new();
    angle.apply_drag(50.0);
    angle.set(0.0);
    assert_eq!(angle.get(), 0.0);
}

#[test]
fn test_writes_are_visible_across_threads() {
    let angle = std::sync::Arc::new(RotationAngle::new());

    let writer = {
        let angle = angle.clone();
        std::thread::spawn(move || {
            for _ in 0..100 {
                angle.apply_drag(1.0);
            }
        })
    };
    writer.join().unwrap();

    assert_relative_eq!(angle.get(), -20.0, epsilon = 1e-4);
}
