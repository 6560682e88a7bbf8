//! Optional per-object transform component
//!
//! Each field is independently optional: an unset field contributes the
//! identity to the model matrix, never zero. This keeps "no transform" and
//! "transform of zero" unambiguous.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

/// Uniform or per-axis scale factor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scale {
    Uniform(f32),
    PerAxis(Vector3<f32>),
}

/// Position, rotation and scale for a scene entry.
///
/// Rotation is three Euler angles in degrees, applied in X then Y then Z
/// order. The model matrix composes as T · Rx · Ry · Rz · S with identity
/// factors skipped for unset fields.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Option<Vector3<f32>>,
    pub rotation: Option<Vector3<f32>>,
    pub scale: Option<Scale>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Some(Vector3::new(x, y, z));
        self
    }

    /// Rotation in degrees around X, Y and Z.
    pub fn with_rotation(mut self, rx: f32, ry: f32, rz: f32) -> Self {
        self.rotation = Some(Vector3::new(rx, ry, rz));
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(Scale::Uniform(scale));
        self
    }

    pub fn with_scale_xyz(mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.scale = Some(Scale::PerAxis(Vector3::new(sx, sy, sz)));
        self
    }

    /// Builds the model matrix, skipping identity factors for unset fields.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let mut model = Matrix4::identity();

        if let Some(position) = self.position {
            model = model * Matrix4::from_translation(position);
        }

        if let Some(rotation) = self.rotation {
            model = model
                * Matrix4::from_angle_x(Deg(rotation.x))
                * Matrix4::from_angle_y(Deg(rotation.y))
                * Matrix4::from_angle_z(Deg(rotation.z));
        }

        if let Some(scale) = self.scale {
            model = model
                * match scale {
                    Scale::Uniform(s) => Matrix4::from_scale(s),
                    Scale::PerAxis(v) => Matrix4::from_nonuniform_scale(v.x, v.y, v.z),
                };
        }

        model
    }

    /// Per-field override: set fields of `other` win, unset fields keep ours.
    ///
    /// Used for transient draw-time overrides that should not disturb the
    /// stored transform.
    pub fn overridden_by(&self, other: &Transform) -> Transform {
        Transform {
            position: other.position.or(self.position),
            rotation: other.rotation.or(self.rotation),
            scale: other.scale.or(self.scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn unset_transform_is_identity() {
        assert_eq!(Transform::new().model_matrix(), Matrix4::identity());
    }

    #[test]
    fn position_only_translates() {
        let m = Transform::new().with_position(1.0, 2.0, 3.0).model_matrix();
        let p = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn composition_order_is_translate_rotate_scale() {
        let t = Transform::new()
            .with_position(1.0, 0.0, 0.0)
            .with_rotation(0.0, 90.0, 0.0)
            .with_scale(2.0);
        // Scale first: (1,0,0) -> (2,0,0); rotate 90 about Y: -> (0,0,-2);
        // then translate: -> (1,0,-2).
        let p = t.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!((p.z + 2.0).abs() < 1e-5);
    }

    #[test]
    fn per_axis_scale_applies_independently() {
        let m = Transform::new().with_scale_xyz(2.0, 3.0, 4.0).model_matrix();
        let p = m * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vector4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn override_wins_per_field() {
        let stored = Transform::new().with_position(1.0, 1.0, 1.0).with_scale(2.0);
        let transient = Transform::new().with_position(5.0, 5.0, 5.0);
        let merged = stored.overridden_by(&transient);
        assert_eq!(merged.position, Some(Vector3::new(5.0, 5.0, 5.0)));
        assert_eq!(merged.scale, Some(Scale::Uniform(2.0)));
        assert_eq!(merged.rotation, None);
    }
}
