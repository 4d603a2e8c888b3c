use crate::Vec3;

/// Orthonormal tangent frame around a unit normal.
///
/// Local coordinates use `n` as the +Z axis, matching the hemisphere
/// sampling warps in [`crate::sampling`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub u: Vec3,
    pub v: Vec3,
    pub n: Vec3,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            u: Vec3::X,
            v: Vec3::Y,
            n: Vec3::Z,
        }
    }
}

impl Frame {
    /// Build a frame from a unit normal.
    ///
    /// Crosses with the coordinate axis least parallel to `n`, so the
    /// construction never degenerates.
    pub fn from_normal(n: Vec3) -> Self {
        let abs = n.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vec3::X
        } else if abs.y <= abs.z {
            Vec3::Y
        } else {
            Vec3::Z
        };

        let u = axis.cross(n).normalize();
        let v = n.cross(u);
        Self { u, v, n }
    }

    /// Express a world-space vector in this frame.
    pub fn to_local(&self, w: Vec3) -> Vec3 {
        Vec3::new(w.dot(self.u), w.dot(self.v), w.dot(self.n))
    }

    /// Bring a frame-local vector back to world space.
    pub fn to_world(&self, l: Vec3) -> Vec3 {
        l.x * self.u + l.y * self.v + l.z * self.n
    }
}
