use nalgebra::{Matrix3, Matrix4, Vector3};
use ndarray::Array3;
use rayon::prelude::*;

/// A scalar volume together with the geometry that places it in patient space.
///
/// Voxels are stored as (depth, height, width), which is (K, J, I) in index
/// order. Every other accessor uses (I, J, K) order.
#[derive(Debug, Clone)]
pub struct Volume {
    pub data: Array3<f32>,
    /// Distance between voxel centres along I, J and K.
    pub spacing: [f64; 3],
    /// World position of voxel (0, 0, 0).
    pub origin: Vector3<f64>,
    /// Columns are the world directions of the I, J and K axes.
    pub direction: Matrix3<f64>,
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(Array3::zeros((1, 1, 1)), [1.0, 1.0, 1.0])
    }
}

impl Volume {
    /// Creates an axis-aligned volume with its first voxel at the world origin.
    pub fn new(data: Array3<f32>, spacing: [f64; 3]) -> Self {
        Self {
            data,
            spacing,
            origin: Vector3::zeros(),
            direction: Matrix3::identity(),
        }
    }

    pub fn with_origin(mut self, origin: Vector3<f64>) -> Self {
        self.origin = origin;
        self
    }

    /// The matrix is trusted as given; a non-orthonormal direction simply
    /// yields a skewed transform.
    pub fn with_direction(mut self, direction: Matrix3<f64>) -> Self {
        self.direction = direction;
        self
    }

    /// Number of voxels along I, J and K.
    pub fn dimensions(&self) -> [usize; 3] {
        let (depth, height, width) = self.data.dim();
        [width, height, depth]
    }

    /// Index extent as `[i_min, i_max, j_min, j_max, k_min, k_max]`.
    pub fn extent(&self) -> [i64; 6] {
        let [ni, nj, nk] = self.dimensions();
        let last = |n: usize| n.saturating_sub(1) as i64;
        [0, last(ni), 0, last(nj), 0, last(nk)]
    }

    /// Affine transform from continuous (I, J, K) index coordinates to world
    /// coordinates: `direction * diag(spacing)` followed by the origin.
    pub fn index_to_world(&self) -> Matrix4<f64> {
        let scaled = self.direction * Matrix3::from_diagonal(&Vector3::from(self.spacing));
        let mut transform = scaled.to_homogeneous();
        transform.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.origin);
        transform
    }

    pub fn index_to_world_point(&self, index: Vector3<f64>) -> Vector3<f64> {
        self.direction * index.component_mul(&Vector3::from(self.spacing)) + self.origin
    }

    /// Inverse of [`Volume::index_to_world_point`], using the transpose of the
    /// direction matrix.
    pub fn world_to_index_point(&self, world: Vector3<f64>) -> Vector3<f64> {
        let local = self.direction.transpose() * (world - self.origin);
        local.component_div(&Vector3::from(self.spacing))
    }

    /// World positions of the eight corner voxels.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let e = self.extent();
        let mut corners = [Vector3::zeros(); 8];
        for (n, corner) in corners.iter_mut().enumerate() {
            let index = Vector3::new(
                e[n & 1] as f64,
                e[2 + ((n >> 1) & 1)] as f64,
                e[4 + ((n >> 2) & 1)] as f64,
            );
            *corner = self.index_to_world_point(index);
        }
        corners
    }

    /// Axis-aligned world bounds `[x_min, x_max, y_min, y_max, z_min, z_max]`
    /// enclosing the corner voxels.
    pub fn bounds(&self) -> [f64; 6] {
        let mut bounds = [
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for corner in self.corners() {
            for axis in 0..3 {
                bounds[2 * axis] = bounds[2 * axis].min(corner[axis]);
                bounds[2 * axis + 1] = bounds[2 * axis + 1].max(corner[axis]);
            }
        }
        bounds
    }

    /// Smallest and largest intensity in the volume. Empty volumes report
    /// `(0.0, 0.0)`.
    pub fn scalar_range(&self) -> (f64, f64) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        let (min, max) = self
            .data
            .par_iter()
            .fold(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            )
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)),
            );
        (min as f64, max as f64)
    }
}
