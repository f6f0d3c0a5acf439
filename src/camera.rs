//! View-projection construction for the orbiting mesh camera.
//!
//! The eye starts at (0, 0, 5) and orbits the origin around the Y axis
//! by an accumulated drag angle in degrees. The projection uses GL
//! clip-space conventions and is remapped to wgpu's [0, 1] Z range by a
//! fixed correction matrix.

use glam::{Mat4, Vec3, Vec4};

const FOV_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const INITIAL_EYE: Vec4 = Vec4::new(0.0, 0.0, 5.0, 1.0);
const UP_VECTOR: Vec3 = Vec3::Y;

/// Remaps GL clip-space Z from [-1, 1] to wgpu's [0, 1].
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

/// Camera state tied to a configured surface.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    aspect_ratio: f32,
}

impl Camera {
    pub fn new(aspect_ratio: f32) -> Self {
        Self { aspect_ratio }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// View-projection for the current aspect at the given orbit angle.
    pub fn view_projection(&self, angle_degrees: f32) -> Mat4 {
        view_projection_matrix(angle_degrees, self.aspect_ratio)
    }
}

/// Pure view-projection construction. Identical inputs produce
/// bit-identical output.
pub fn view_projection_matrix(angle_degrees: f32, aspect_ratio: f32) -> Mat4 {
    let eye = Mat4::from_rotation_y(angle_degrees.to_radians()) * INITIAL_EYE;
    let view = Mat4::look_at_rh(eye.truncate(), Vec3::ZERO, UP_VECTOR);
    let projection = Mat4::perspective_rh_gl(
        FOV_DEGREES.to_radians(),
        aspect_ratio,
        NEAR_PLANE,
        FAR_PLANE,
    );
    OPENGL_TO_WGPU * projection * view
}
