use approx::assert_relative_eq;
use glam::Vec4;
use mesh_viewer::camera::{view_projection_matrix, Camera, OPENGL_TO_WGPU};

#[test]
fn test_view_projection_is_deterministic() {
    let a = view_projection_matrix(37.5, 800.0 / 600.0);
    let b = view_projection_matrix(37.5, 800.0 / 600.0);

    // Pure function: identical inputs must be bit-identical.
    assert_eq!(a.to_cols_array(), b.to_cols_array());
}

#[test]
fn test_view_projection_tracks_aspect_ratio() {
    let wide = view_projection_matrix(0.0, 800.0 / 450.0);
    let narrow = view_projection_matrix(0.0, 400.0 / 300.0);

    assert_ne!(wide.to_cols_array(), narrow.to_cols_array());
}

#[test]
fn test_view_projection_tracks_rotation() {
    let a = view_projection_matrix(0.0, 1.0);
    let b = view_projection_matrix(90.0, 1.0);

    assert_ne!(a.to_cols_array(), b.to_cols_array());
}

#[test]
fn test_rotation_wraps_after_full_turn() {
    let a = view_projection_matrix(30.0, 1.0);
    let b = view_projection_matrix(390.0, 1.0);

    for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-4);
    }
}

#[test]
fn test_correction_matrix_remaps_clip_z() {
    let near = OPENGL_TO_WGPU * Vec4::new(0.0, 0.0, -1.0, 1.0);
    let far = OPENGL_TO_WGPU * Vec4::new(0.0, 0.0, 1.0, 1.0);

    assert_relative_eq!(near.z, 0.0);
    assert_relative_eq!(far.z, 1.0);
    assert_relative_eq!(near.w, 1.0);
    assert_relative_eq!(far.w, 1.0);
}

#[test]
fn test_projected_origin_lands_in_wgpu_depth_range() {
    let clip = view_projection_matrix(0.0, 16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let depth = clip.z / clip.w;

    assert!(
        depth > 0.0 && depth < 1.0,
        "depth {depth} outside wgpu's [0, 1] range"
    );
}

#[test]
fn test_matrices_stay_finite_for_extreme_angles() {
    for angle in [-100_000.0, -360.0, 0.0, 720.5, 1.0e6] {
        let matrix = view_projection_matrix(angle, 16.0 / 9.0);
        for value in matrix.to_cols_array() {
            assert!(value.is_finite(), "non-finite value at angle {angle}");
        }
    }
}

#[test]
fn test_camera_matches_free_function() {
    let mut camera = Camera::new(4.0 / 3.0);
    assert_eq!(
        camera.view_projection(12.0).to_cols_array(),
        view_projection_matrix(12.0, 4.0 / 3.0).to_cols_array()
    );

    camera.set_aspect_ratio(16.0 / 9.0);
    assert_eq!(camera.aspect_ratio(), 16.0 / 9.0);
    assert_eq!(
        camera.view_projection(12.0).to_cols_array(),
        view_projection_matrix(12.0, 16.0 / 9.0).to_cols_array()
    );
}
