//! Per-frame record read by the JS renderer through a raw pointer.
//! Must stay in sync with the page script that mirrors it onto the mesh.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [0]     frame counter
//! [1..4]  position x, y, z
//! [4..8]  orientation quaternion x, y, z, w
//! ```

use bytemuck::{Pod, Zeroable};

use crate::components::transform::Transform;
use crate::renderer::traits::VisualProxy;

/// Protocol version, bumped whenever the layout changes.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per record (wire format, fixed within a protocol version).
pub const FRAME_RECORD_FLOATS: usize = 8;

pub const RECORD_FRAME: usize = 0;
pub const RECORD_POSITION: usize = 1;
pub const RECORD_ROTATION: usize = 4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameRecord {
    pub frame: f32,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl FrameRecord {
    pub fn new() -> Self {
        Self {
            frame: 0.0,
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }
}

impl Default for FrameRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualProxy for FrameRecord {
    fn present(&mut self, transform: &Transform) {
        let [x, y, z, qx, qy, qz, qw] = transform.to_array();
        self.position = [x, y, z];
        self.rotation = [qx, qy, qz, qw];
    }
}
