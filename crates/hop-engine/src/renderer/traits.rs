//! Presentation contract.
//!
//! Rendering happens outside the engine (a three.js scene in the browser
//! build). The controller only pushes the latest transform at the end of
//! each frame; it never reads anything back from the renderer.

use crate::components::transform::Transform;

/// A write-only visual stand-in for a physics body.
pub trait VisualProxy {
    /// Receive the transform to show this frame.
    fn present(&mut self, transform: &Transform);
}

/// A plain transform acts as a proxy that keeps the last value presented.
impl VisualProxy for Transform {
    fn present(&mut self, transform: &Transform) {
        *self = *transform;
    }
}

/// Discards everything. Handy for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProxy;

impl VisualProxy for NullProxy {
    fn present(&mut self, _transform: &Transform) {}
}
