use glam::{Quat, Vec3};

/// Position + orientation mirrored from a physics body.
///
/// Read-only with respect to physics: nothing ever writes a `Transform`
/// back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Flatten to `[x, y, z, qx, qy, qz, qw]`.
    pub fn to_array(&self) -> [f32; 7] {
        let p = self.position;
        let q = self.rotation;
        [p.x, p.y, p.z, q.x, q.y, q.z, q.w]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
