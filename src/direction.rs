use nalgebra::{Matrix3, Vector3};

/// Maps vectors between the index space (I, J, K) of a volume and world
/// (patient LPS) space.
///
/// The direction matrix is assumed orthonormal, so its inverse is its
/// transpose. Non-orthonormal input is not rejected; it produces a skewed,
/// non-rigid mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionModel {
    matrix: Matrix3<f64>,
}

impl DirectionModel {
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn to_world(&self, index_vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * index_vector
    }

    pub fn to_index(&self, world_vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.tr_mul(world_vector)
    }
}

impl Default for DirectionModel {
    fn default() -> Self {
        Self::new(Matrix3::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    #[test]
    fn identity_leaves_vectors_unchanged() {
        let model = DirectionModel::default();
        let v = Vector3::new(0.3, -2.0, 5.0);
        assert_eq!(model.to_world(&v), v);
        assert_eq!(model.to_index(&v), v);
    }

    #[test]
    fn columns_are_index_axes_in_world() {
        let rotation = Rotation3::from_euler_angles(0.2, -0.4, 1.1);
        let model = DirectionModel::new(*rotation.matrix());
        for axis in 0..3 {
            let unit = Vector3::ith(axis, 1.0);
            assert_relative_eq!(
                model.to_world(&unit),
                rotation.matrix().column(axis).into_owned(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn to_index_inverts_to_world_for_rotations() {
        let rotation = Rotation3::from_euler_angles(0.7, 0.1, -2.3);
        let model = DirectionModel::new(*rotation.matrix());
        let v = Vector3::new(1.5, -0.25, 4.0);
        assert_relative_eq!(model.to_index(&model.to_world(&v)), v, epsilon = 1e-12);
    }

    #[test]
    fn transform_is_linear_for_non_unit_input() {
        let model = DirectionModel::new(*Rotation3::from_euler_angles(0.3, 0.0, 0.9).matrix());
        let v = Vector3::new(0.0, 2.0, -1.0);
        assert_relative_eq!(
            model.to_world(&(v * 3.0)),
            model.to_world(&v) * 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn skewed_matrix_is_accepted() {
        let skewed = Matrix3::new(1.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0);
        let model = DirectionModel::new(skewed);
        assert_eq!(
            model.to_world(&Vector3::new(0.0, 1.0, 1.0)),
            Vector3::new(0.5, 1.0, 2.0)
        );
    }
}
