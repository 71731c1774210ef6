/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator};
use crate::errors::{NonIntegerTransformationError, ToleranceViolationError};
use crate::util::{Tol, float_m33};

use xtal_array_types::{V3, M33, mat, inv};

/// A rigid motion, possibly combined with time reversal.
///
/// The linear part is a cartesian matrix acting on **column** vectors
/// (`x -> R x + t`), so that it reads like a textbook rotation matrix.
/// The translation is also cartesian.
///
/// Operations are compared modulo lattice translations by the code that
/// produces them, so a `SymOp` on its own carries no lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct SymOp {
    matrix: M33,
    translation: V3,
    time_reversal: bool,
}

impl SymOp {
    pub fn new(matrix: M33, translation: V3, time_reversal: bool) -> Self
    { SymOp { matrix, translation, time_reversal } }

    pub fn eye() -> Self
    { SymOp::new(M33::eye(), V3([0.0; 3]), false) }

    /// A pure cartesian rotation or rotoinversion.
    pub fn from_matrix(matrix: M33) -> Self
    { SymOp::new(matrix, V3([0.0; 3]), false) }

    pub fn from_translation(translation: V3) -> Self
    { SymOp::new(M33::eye(), translation, false) }

    /// Pure time reversal.
    pub fn time_reversal_op() -> Self
    { SymOp::new(M33::eye(), V3([0.0; 3]), true) }

    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    #[inline]
    pub fn translation(&self) -> &V3
    { &self.translation }

    #[inline]
    pub fn time_reversal(&self) -> bool
    { self.time_reversal }

    /// Determinant of the linear part.  (`+1` for proper rotations)
    pub fn det(&self) -> f64
    { self.matrix.det() }

    /// The same operation with time reversal toggled.
    pub fn with_time_reversal(&self, time_reversal: bool) -> Self
    { SymOp { time_reversal, ..self.clone() } }

    /// The same operation with a different translation.
    pub fn with_translation(&self, translation: V3) -> Self
    { SymOp { translation, ..self.clone() } }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.  The flipped order is more aligned
    /// with this library's generally row-centric design.
    pub fn then(&self, other: &SymOp) -> SymOp
    {
        // x -> B (A x + a) + b
        SymOp {
            matrix: &other.matrix * &self.matrix,
            translation: &other.matrix * &self.translation + other.translation,
            time_reversal: self.time_reversal ^ other.time_reversal,
        }
    }

    /// Conventional group operator.
    pub fn of(&self, other: &SymOp) -> SymOp
    { other.then(self) }

    #[must_use = "not an in-place operation"]
    pub fn inverted(&self) -> SymOp
    {
        let matrix = inv(&self.matrix);
        let translation = -(&matrix * &self.translation);
        SymOp { matrix, translation, time_reversal: self.time_reversal }
    }

    /// Apply to a cartesian position.
    pub fn transform_cart(&self, cart: &V3) -> V3
    { &self.matrix * cart + self.translation }

    /// Apply to a fractional position, with fractional coordinates
    /// in `lattice` both before and after.
    pub fn transform_frac(&self, lattice: &Lattice, frac: &V3) -> V3
    {
        let cart = lattice.fractional_to_cartesian(frac);
        lattice.cartesian_to_fractional(&self.transform_cart(&cart))
    }

    /// The translation in fractional coordinates of `lattice`.
    pub fn frac_translation(&self, lattice: &Lattice) -> V3
    { lattice.cartesian_to_fractional(&self.translation) }

    /// The linear part as an integer matrix in the basis of `lattice`.
    ///
    /// Fails if the operation does not map the lattice onto itself.
    pub fn frac_rot(&self, lattice: &Lattice, tol: f64) -> Result<FracRot, NonIntegerTransformationError>
    { FracRot::from_cart(&self.matrix, lattice, tol) }

    /// Test for equality, with translations compared modulo `lattice`.
    pub fn periodic_eq(&self, other: &SymOp, lattice: &Lattice, cmp: &Comparator) -> Result<bool, ToleranceViolationError>
    {Ok({
        self.time_reversal == other.time_reversal
        && self.matrix_eq(other, cmp)?
        && cmp.periodic_eq(lattice, &self.frac_translation(lattice), &other.frac_translation(lattice))?
    })}

    /// Test linear parts for equality. (ignores translation and time reversal)
    pub fn matrix_eq(&self, other: &SymOp, cmp: &Comparator) -> Result<bool, ToleranceViolationError>
    { cmp.is_negligible((&self.matrix - &other.matrix).max_abs()) }
}

/// The linear part of an operation that maps a lattice onto itself,
/// expressed in the basis of that lattice.
///
/// Hashable, so it is what gets used for group-theoretic bookkeeping.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FracRot {
    /// This is the transpose of what one would
    /// typically think of as the "rotation matrix"
    ///
    /// Invariants:
    ///  - `abs(det(t)) == 1`
    t: M33<i32>,
}

impl Default for FracRot {
    fn default() -> Self
    { Self::eye() }
}

impl FracRot {
    pub fn eye() -> Self
    { Self { t: mat::from_array([[1, 0, 0], [0, 1, 0], [0, 0, 1]]) } }

    /// Construct from a matrix.
    ///
    /// The input should be a matrix `W` such that `W f` is the image of a
    /// fractional column vector `f`.
    pub fn new(mat: &M33<i32>) -> FracRot
    {
        assert_eq!(mat.det().abs(), 1);
        FracRot { t: mat.t() }
    }

    /// Express a cartesian matrix in the basis of a lattice.
    pub fn from_cart(cart: &M33, lattice: &Lattice, tol: f64) -> Result<FracRot, NonIntegerTransformationError>
    {
        // row-centric:  f' = f L R^T L^-1
        let t = lattice.matrix() * &cart.t() * lattice.inverse_matrix();
        let t = Tol(tol).unfloat_m33(&t)?;
        if t.det().abs() != 1 {
            return Err(NonIntegerTransformationError::new(f64::from(t.det())));
        }
        Ok(FracRot { t })
    }

    /// The matrix `W` that acts on fractional column vectors.
    pub fn matrix(&self) -> M33<i32>
    { self.t.t() }

    /// The cartesian matrix of this operation for a given lattice.
    pub fn to_cart(&self, lattice: &Lattice) -> M33
    { (lattice.inverse_matrix() * &float_m33(&self.t) * lattice.matrix()).t() }

    pub fn det(&self) -> i32
    { self.t.det() }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.
    pub fn then(&self, other: &FracRot) -> FracRot
    {
        // (since these are transposes, this is the natural order of application)
        FracRot { t: &self.t * &other.t }
    }

    /// Conventional group operator.
    pub fn of(&self, other: &FracRot) -> FracRot
    { other.then(self) }

    pub fn transform_prim(&self, fracs: &[V3]) -> Vec<V3>
    {
        let t = float_m33(&self.t);
        fracs.iter().map(|v| v * &t).collect()
    }
}

impl<'a> From<&'a [[i32; 3]; 3]> for FracRot {
    fn from(m: &'a [[i32; 3]; 3]) -> Self
    { FracRot::new(&mat::from_array(*m)) }
}
