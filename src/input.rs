//! Drag-to-rotation mapping.
//!
//! The one piece of state shared across actors: the gesture handler
//! writes, the frame loop reads. Atomic f32 load/store is sufficient
//! because there is a single writer.

use std::sync::atomic::{AtomicU32, Ordering};

const DRAG_DIVISOR: f32 = 5.0;

/// Accumulated orbit angle in degrees, stored as f32 bits.
#[derive(Debug, Default)]
pub struct RotationAngle(AtomicU32);

impl RotationAngle {
    pub fn new() -> Self {
        Self(AtomicU32::new(0.0f32.to_bits()))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, degrees: f32) {
        self.0.store(degrees.to_bits(), Ordering::Relaxed);
    }

    /// Applies one horizontal drag delta in pixels. Unbounded; the angle
    /// wraps via trigonometric periodicity.
    pub fn apply_drag(&self, delta_x: f32) {
        self.set(self.get() - delta_x / DRAG_DIVISOR);
    }
}
