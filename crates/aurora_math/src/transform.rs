// Transform utilities for Mat4
//
// Camera-to-world matrices are rigid: three orthonormal basis columns plus a
// translation column. glam::Mat4 already provides transform_point3() and
// transform_vector3(); this adds construction and basis access.

use glam::{Mat4, Vec3};

/// Build a camera-to-world transform looking from `eye` towards `target`.
///
/// The camera looks down its local -Z axis:
/// - forward = normalize(eye - target) (local +Z)
/// - right   = normalize(up x forward) (local +X)
/// - true_up = forward x right         (local +Y)
///
/// Returns `None` when `eye == target` or `up` is parallel to the view axis,
/// since no basis exists.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Mat4> {
    let forward = (eye - target).try_normalize()?;
    let right = up.cross(forward).try_normalize()?;
    let true_up = forward.cross(right);

    Some(Mat4::from_cols(
        right.extend(0.0),
        true_up.extend(0.0),
        forward.extend(0.0),
        eye.extend(1.0),
    ))
}

/// Extension trait for reading the rigid parts of a camera-to-world matrix.
pub trait Mat4Ext {
    /// Local +X axis in world space.
    fn right(&self) -> Vec3;

    /// Local +Y axis in world space.
    fn up(&self) -> Vec3;

    /// Local +Z axis in world space (the camera looks down the opposite way).
    fn backward(&self) -> Vec3;

    /// Translation column.
    fn position(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn right(&self) -> Vec3 {
        self.x_axis.truncate()
    }

    fn up(&self) -> Vec3 {
        self.y_axis.truncate()
    }

    fn backward(&self) -> Vec3 {
        self.z_axis.truncate()
    }

    fn position(&self) -> Vec3 {
        self.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_basis() {
        let eye = Vec3::new(1.0, 1.0, 35.0);
        let target = Vec3::new(1.0, 1.0, 0.0);
        let mat = look_at(eye, target, Vec3::Y).unwrap();

        assert!((mat.backward() - Vec3::Z).length() < 1e-6);
        assert!((mat.right() - Vec3::X).length() < 1e-6);
        assert!((mat.up() - Vec3::Y).length() < 1e-6);
        assert_eq!(mat.position(), eye);
    }

    #[test]
    fn test_look_at_orthonormal_for_oblique_up() {
        let mat = look_at(Vec3::new(3.0, 2.0, -4.0), Vec3::ZERO, Vec3::new(0.2, 1.0, 0.1)).unwrap();

        assert!(mat.right().dot(mat.up()).abs() < 1e-5);
        assert!(mat.right().dot(mat.backward()).abs() < 1e-5);
        assert!((mat.up().length() - 1.0).abs() < 1e-5);
        // True up stays on the same side as the requested up vector
        assert!(mat.up().y > 0.0);
    }

    #[test]
    fn test_look_at_transforms_points() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let mat = look_at(eye, Vec3::ZERO, Vec3::Y).unwrap();

        // One unit down the local -Z axis lands between eye and target
        let p = mat.transform_point3(Vec3::new(0.0, 0.0, -1.0));
        assert!((p - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-6);

        // Directions ignore the translation column
        let d = mat.transform_vector3(Vec3::X);
        assert!((d - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_look_at_degenerate() {
        assert!(look_at(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
        assert!(look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y).is_none());
    }
}
