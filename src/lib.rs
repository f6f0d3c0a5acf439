//! Interactive single-mesh viewer built on wgpu.
//!
//! The crate centers on [`session::RenderSession`], a state machine that
//! owns every GPU handle and survives surface creation, resize and
//! destruction without touching stale resources. The host binary maps
//! window lifecycle events onto the session and feeds drag input into
//! the shared rotation angle.

pub mod camera;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod resources;
pub mod session;

pub use frame::{FrameLoop, FrameLoopHandle};
pub use session::RenderSession;
