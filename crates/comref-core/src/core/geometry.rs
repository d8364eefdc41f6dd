use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

pub const DIM: usize = 3;
pub const XX: usize = 0;
pub const YY: usize = 1;
pub const ZZ: usize = 2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BoxError {
    #[error("Box length along dimension {dim} must be positive and finite, got {length}")]
    InvalidLength { dim: usize, length: f64 },
}

/// A periodic simulation cell.
///
/// The full 3x3 matrix is kept so callers can hand over whatever their integrator uses,
/// but all periodic arithmetic in this crate works on the diagonal, i.e. it treats the
/// cell as rectangular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    matrix: Matrix3<f64>,
}

impl SimBox {
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, BoxError> {
        for dim in 0..DIM {
            let length = matrix[(dim, dim)];
            if !(length.is_finite() && length > 0.0) {
                return Err(BoxError::InvalidLength { dim, length });
            }
        }
        Ok(Self { matrix })
    }

    pub fn rectangular(lengths: Vector3<f64>) -> Result<Self, BoxError> {
        Self::new(Matrix3::from_diagonal(&lengths))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    #[inline]
    pub fn length(&self, dim: usize) -> f64 {
        self.matrix[(dim, dim)]
    }

    pub fn lengths(&self) -> Vector3<f64> {
        self.matrix.diagonal()
    }

    pub fn is_rectangular(&self) -> bool {
        (0..DIM).all(|i| (0..DIM).all(|j| i == j || self.matrix[(i, j)] == 0.0))
    }

    /// Shifts each coordinate by at most one box length so that it lands in `[0, L)`.
    ///
    /// This is a single-image correction: a point more than one box length outside the
    /// cell is not brought all the way back.
    pub fn fold_once(&self, point: &Point3<f64>) -> Point3<f64> {
        let mut folded = *point;
        for dim in 0..DIM {
            let length = self.length(dim);
            if folded[dim] < 0.0 {
                folded[dim] += length;
            }
            if folded[dim] >= length {
                folded[dim] -= length;
            }
        }
        folded
    }

    /// Radial distance between two points in the x-y plane under the minimum image.
    ///
    /// The z axis is the cylinder axis and does not contribute.
    pub fn cylinder_distance(&self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        let dx = fold_half_box(a[XX] - b[XX], self.length(XX));
        let dy = fold_half_box(a[YY] - b[YY], self.length(YY));
        dx.hypot(dy)
    }
}

/// Brings a one-dimensional displacement into `[-L/2, L/2]` by whole box lengths.
///
/// Non-finite input yields NaN.
#[inline]
pub fn fold_half_box(delta: f64, length: f64) -> f64 {
    delta - length * (delta / length).round()
}
