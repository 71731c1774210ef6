/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::errors::{DegenerateLatticeError, NonIntegerTransformationError, Error};
use crate::util::{Tol, float_m33};

use std::ops::{Mul, Div};
use std::sync::Arc;

use xtal_array_types::{V3, M33, mat, inv};
use xtal_assert_close::{CheckClose, Tolerances, CheckCloseError};

/// Defines a vector basis for periodic boundary conditions in three dimensions.
///
/// The lattice vectors are stored as the **rows** of a matrix, so that a
/// fractional row vector `f` maps to cartesian coordinates as `f * L`.
/// (use [`column_vector_matrix`] when talking to code that expects columns)
///
/// Cloning is cheap.
///
/// [`column_vector_matrix`]: #method.column_vector_matrix
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Arc<M33>,
    inverse: Arc<M33>,
}

// Manual impl that doesn't compare the inverse.
impl PartialEq<Lattice> for Lattice {
    fn eq(&self, other: &Lattice) -> bool {
        // deconstruct to get errors when new fields are added
        let Lattice { ref matrix, inverse: _ } = *self;
        matrix == &other.matrix
    }
}

impl Lattice {
    /// Create a lattice from a matrix where the rows are lattice vectors.
    ///
    /// Fails if the vectors are nearly linearly dependent; that is, if the
    /// determinant is no larger than `tol` times the product of the norms.
    pub fn new(matrix: &M33, tol: f64) -> Result<Self, DegenerateLatticeError> {
        let det = matrix.det();
        let scale: f64 = matrix.0.iter().map(|v| v.norm()).product();
        if !(det.abs() > tol * scale) {
            return Err(DegenerateLatticeError::new(det));
        }
        Ok(Self::new_unchecked(matrix))
    }

    /// Create a lattice from a matrix known to be well-conditioned.
    ///
    /// Meant for matrices produced by this library from an existing lattice
    /// (integer transformations, rotations).
    #[inline]
    pub fn new_unchecked(matrix: &M33) -> Self {
        debug_assert_ne!(matrix.det(), 0.0);
        let inverse = Arc::new(inv(matrix));
        let matrix = Arc::new(*matrix);
        Self { matrix, inverse }
    }

    /// Create a lattice from a matrix whose **columns** are the lattice vectors.
    pub fn from_column_vector_matrix(matrix: &[[f64; 3]; 3], tol: f64) -> Result<Self, DegenerateLatticeError> {
        Self::new(&mat::from_array(*matrix).t(), tol)
    }

    /// Get the reciprocal lattice.
    ///
    /// This is defined as the inverse transpose. **There is no 2 PI factor.**
    /// It is the lattice that transforms between reciprocal space fractional
    /// and reciprocal space Euclidean coordinates.
    #[inline]
    pub fn reciprocal(&self) -> Self {
        Self {
            matrix: Arc::new(self.inverse.t()),
            inverse: Arc::new(self.matrix.t()),
        }
    }

    /// Matrix where lattice vectors are rows.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    /// Get the (precomputed) inverse of the matrix where lattice vectors are rows.
    #[inline]
    pub fn inverse_matrix(&self) -> &M33
    { &self.inverse }

    /// Matrix where lattice vectors are columns.
    #[inline]
    pub fn column_vector_matrix(&self) -> M33
    { self.matrix.t() }

    #[inline]
    pub fn vectors(&self) -> &[V3; 3]
    { &self.matrix().0 }

    pub fn norms(&self) -> [f64; 3]
    {
        let v = self.vectors();
        [v[0].norm(), v[1].norm(), v[2].norm()]
    }

    /// Gram matrix of the lattice vectors, `L L^T`.
    ///
    /// This is invariant under rotations of the lattice.
    pub fn metric_tensor(&self) -> M33
    { self.matrix() * &self.matrix().t() }

    /// Get the (positive) volume of the lattice cell.
    pub fn volume(&self) -> f64
    { self.matrix().det().abs() }

    /// Determinant of the matrix of lattice vectors. (negative when left-handed)
    pub fn signed_volume(&self) -> f64
    { self.matrix().det() }

    /// Apply a cartesian transformation (acting on column vectors) to the lattice.
    pub fn transformed_by(&self, m: &M33) -> Lattice
    { self * &m.t() }

    /// Take an integer linear combination of the lattice vectors.
    ///
    /// Each row of `coeffs` produces one new lattice vector.
    pub fn linear_combination(&self, coeffs: &M33<i32>) -> Lattice
    { &float_m33(coeffs) * self }

    #[inline]
    pub fn fractional_to_cartesian(&self, frac: &V3) -> V3
    { frac * self }

    #[inline]
    pub fn cartesian_to_fractional(&self, cart: &V3) -> V3
    { cart / self }

    /// Construct the superlattice `L T`.
    ///
    /// `transformation` uses the column convention: the columns of `L T` are
    /// the superlattice vectors, where the columns of `L` are the vectors of
    /// `self`.  It must be integral (within `tol`) with a nonzero determinant.
    pub fn make_superlattice(&self, transformation: &M33, tol: f64) -> Result<Lattice, Error>
    {
        let t = Tol(tol).unfloat_m33(transformation)?;
        if t.det() == 0 {
            throw!(DegenerateLatticeError::new(0.0));
        }
        // in rows, (L T)^T = T^T L
        Ok(self.linear_combination(&t.t()))
    }

    /// Test if two Lattices represent the same Bravais lattice,
    /// in the mathematical sense. This is to say that they each
    /// generate the same infinite set of displacement vectors.
    ///
    /// The row-based matrices A and B both represent the same
    /// Bravais lattice if and only if A B^-1 is unimodular.
    ///
    /// tol is an absolute tolerance used to test integerness
    /// of a float.
    pub fn is_equivalent_to(&self, other: &Lattice, tol: f64) -> bool
    {
        let m = self.matrix() * other.inverse_matrix();
        match Tol(tol).unfloat_m33(&m) {
            Ok(m) => m.det().abs() == 1,
            Err(_) => false,
        }
    }
}

/// Find the integer `T` (column convention) such that `super = unit * T`.
///
/// Fails if `superlattice` is not a superlattice of `unit`.
pub fn make_transformation_matrix_to_super(
    superlattice: &Lattice,
    unit: &Lattice,
    tol: f64,
) -> Result<M33<i32>, NonIntegerTransformationError>
{
    // rows:  S = T^T U   ==>   T^T = S U^-1
    let t_transpose = superlattice.matrix() * unit.inverse_matrix();
    Ok(Tol(tol).unfloat_m33(&t_transpose)?.t())
}

/// Helper constructors
impl Lattice {
    /// The identity lattice.
    #[inline]
    pub fn eye() -> Self { Self::cubic(1.0) }

    #[inline]
    pub fn diagonal(&[x, y, z]: &[f64; 3]) -> Self { Self::orthorhombic(x, y, z) }

    /// A cubic lattice ((a, a, a), (90, 90, 90))
    #[inline]
    pub fn cubic(a: f64) -> Self { Self::orthorhombic(a, a, a) }

    /// An orthorhombic lattice ((a, b, c), (90, 90, 90))
    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self
    {
        assert!(a != 0.0 && b != 0.0 && c != 0.0, "zero length lattice vector");
        Self::new_unchecked(&mat::from_array([[a, 0., 0.], [0., b, 0.], [0., 0., c]]))
    }

    /// A hexagonal lattice with the `c` axis along `z`.
    pub fn hexagonal(a: f64, c: f64) -> Self
    {
        assert!(a != 0.0 && c != 0.0, "zero length lattice vector");
        let s = 0.75f64.sqrt();
        Self::new_unchecked(&mat::from_array([
            [a, 0.0, 0.0],
            [-0.5 * a, s * a, 0.0],
            [0.0, 0.0, c],
        ]))
    }

    // who needs quickcheck
    /// Generate a random lattice.
    ///
    /// Elements are pulled from a uniform distribution of [-x, x].
    #[cfg(test)]
    pub(crate) fn random_uniform(max: f64) -> Self {
        loop {
            let m = mat::from_fn(|_, _| (::rand::random::<f64>() - 0.5) * 2.0 * max);
            if let Ok(lattice) = Lattice::new(&m, 1e-2) {
                return lattice;
            }
        }
    }
}

/// Defaults to the identity matrix.
impl Default for Lattice {
    #[inline]
    fn default() -> Lattice { Lattice::eye() }
}

impl<'a, 'b> Mul<&'b M33> for &'a Lattice {
    type Output = Lattice;

    fn mul(self, other: &'b M33) -> Lattice {
        Lattice::new_unchecked(&(self.matrix() * other))
    }
}

impl<'a, 'b> Mul<&'b Lattice> for &'a M33 {
    type Output = Lattice;

    fn mul(self, other: &'b Lattice) -> Lattice {
        Lattice::new_unchecked(&(self * other.matrix()))
    }
}

impl<'a, 'b> Mul<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn mul(self, other: &'b Lattice) -> V3 {
        self * other.matrix()
    }
}

impl<'b> Mul<&'b Lattice> for V3 {
    type Output = V3;

    fn mul(self, other: &'b Lattice) -> V3 {
        self * other.matrix()
    }
}

impl<'a, 'b> Div<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn div(self, other: &'b Lattice) -> V3 {
        self * other.inverse_matrix()
    }
}

impl<'b> Div<&'b Lattice> for V3 {
    type Output = V3;

    fn div(self, other: &'b Lattice) -> V3 {
        self * other.inverse_matrix()
    }
}

impl CheckClose for Lattice {
    fn check_close(&self, other: &Lattice, tol: Tolerances) -> Result<(), CheckCloseError> {
        self.matrix().check_close(other.matrix(), tol)
    }
}
