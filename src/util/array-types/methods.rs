/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{V3, M3, M33, Ring};

/// Construction of vectors.
pub mod vee {
    use super::*;

    #[inline(always)]
    pub fn from_fn<X, F>(mut f: F) -> V3<X>
    where F: FnMut(usize) -> X,
    { V3([f(0), f(1), f(2)]) }

    #[inline(always)]
    pub fn from_array<X>(arr: [X; 3]) -> V3<X>
    { V3(arr) }

    pub fn zero<X: Ring>() -> V3<X>
    { V3([X::zero(); 3]) }
}

/// Construction of matrices.
pub mod mat {
    use super::*;

    #[inline(always)]
    pub fn from_fn<X, F>(mut f: F) -> M33<X>
    where F: FnMut(usize, usize) -> X,
    { M3([
        V3([f(0, 0), f(0, 1), f(0, 2)]),
        V3([f(1, 0), f(1, 1), f(1, 2)]),
        V3([f(2, 0), f(2, 1), f(2, 2)]),
    ])}

    #[inline(always)]
    pub fn from_array<X>(arr: [[X; 3]; 3]) -> M33<X>
    {
        let [a, b, c] = arr;
        M3([V3(a), V3(b), V3(c)])
    }

    #[inline(always)]
    pub fn from_rows<X>(rows: [V3<X>; 3]) -> M33<X>
    { M3(rows) }
}

/// Dot product of two vectors.
#[inline]
pub fn dot<X: Ring>(a: &V3<X>, b: &V3<X>) -> X
{ a[0] * b[0] + a[1] * b[1] + a[2] * b[2] }

/// Matrix inverse.
///
/// The matrix is assumed to be invertible; singular input produces
/// non-finite elements rather than panicking.
pub fn inv(m: &M33) -> M33
{
    let cof = m.cofactors();
    let det = m.det();
    mat::from_fn(|r, c| cof[c][r] / det)
}

impl<X> V3<X> {
    #[inline]
    pub fn map<B, F>(&self, mut f: F) -> V3<B>
    where X: Copy, F: FnMut(X) -> B,
    { vee::from_fn(|k| f(self.0[k])) }

    #[inline]
    pub fn try_map<B, E, F>(&self, mut f: F) -> Result<V3<B>, E>
    where X: Copy, F: FnMut(X) -> Result<B, E>,
    { Ok(V3([f(self.0[0])?, f(self.0[1])?, f(self.0[2])?])) }

    #[inline]
    pub fn into_array(self) -> [X; 3]
    { self.0 }
}

impl<X: Ring> V3<X> {
    #[inline]
    pub fn dot(&self, other: &V3<X>) -> X
    { dot(self, other) }

    #[inline]
    pub fn sqnorm(&self) -> X
    { dot(self, self) }

    #[inline]
    pub fn cross(&self, other: &V3<X>) -> V3<X>
    {
        let (a, b) = (self, other);
        V3([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }
}

impl V3<f64> {
    #[inline]
    pub fn norm(&self) -> f64
    { self.sqnorm().sqrt() }

    /// Largest absolute value of an element.
    #[inline]
    pub fn max_abs(&self) -> f64
    { self.0.iter().fold(0.0, |acc: f64, x| acc.max(x.abs())) }
}

impl<X> M33<X> {
    #[inline]
    pub fn map<B, F>(&self, mut f: F) -> M33<B>
    where X: Copy, F: FnMut(X) -> B,
    { mat::from_fn(|r, c| f(self.0[r].0[c])) }

    #[inline]
    pub fn try_map<B, E, F>(&self, mut f: F) -> Result<M33<B>, E>
    where X: Copy, F: FnMut(X) -> Result<B, E>,
    { Ok(M3([
        self.0[0].try_map(&mut f)?,
        self.0[1].try_map(&mut f)?,
        self.0[2].try_map(&mut f)?,
    ]))}

    #[inline]
    pub fn into_array(self) -> [[X; 3]; 3]
    {
        let M3([a, b, c]) = self;
        [a.0, b.0, c.0]
    }

    /// Transpose.
    #[inline]
    pub fn t(&self) -> M33<X>
    where X: Copy,
    { mat::from_fn(|r, c| self.0[c].0[r]) }

    /// Column `c`, as a vector.
    #[inline]
    pub fn col(&self, c: usize) -> V3<X>
    where X: Copy,
    { vee::from_fn(|r| self.0[r].0[c]) }
}

impl<X: Ring> M33<X> {
    pub fn eye() -> M33<X>
    { mat::from_fn(|r, c| if r == c { X::one() } else { X::zero() }) }

    pub fn zero() -> M33<X>
    { mat::from_fn(|_, _| X::zero()) }

    pub fn det(&self) -> X
    {
        let m = self;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Matrix of cofactors. (the transpose of the adjugate)
    pub fn cofactors(&self) -> M33<X>
    {
        let m = self;
        mat::from_fn(|r, c| {
            let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
            let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
            // cyclic index order takes care of the checkerboard sign
            m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
        })
    }

    pub fn trace(&self) -> X
    { self[0][0] + self[1][1] + self[2][2] }
}

impl M33<f64> {
    /// Largest absolute value of an element.
    pub fn max_abs(&self) -> f64
    { self.0.iter().fold(0.0, |acc: f64, row| acc.max(row.max_abs())) }

    /// Flatten the rows into a single array.
    pub fn flat(&self) -> [f64; 9]
    {
        let m = self;
        [
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        ]
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn get_inverse() {
        // matrix whose inverse should be able to be computed exactly
        // by any reasonable matrix inversion algorithm working on f64s
        let matrix = mat::from_array([
            [2.0, 2.0, 0.0],
            [0.0, 4.0, 0.0],
            [0.0, 0.0, 2.0],
        ]);
        let exact_inverse = mat::from_array([
            [0.5, -0.25, 0.0],
            [0.0,  0.25, 0.0],
            [0.0,   0.0, 0.5],
        ]);
        assert_eq!(inv(&matrix), exact_inverse);
        assert_eq!(&matrix * &exact_inverse, M33::eye());
    }

    #[test]
    fn det_and_cross() {
        let m = mat::from_array([[0, 1, 0], [0, 0, 1], [1, 0, 0]]);
        assert_eq!(m.det(), 1);
        assert_eq!(mat::from_array([[0, 1, 0], [1, 0, 0], [0, 0, 1]]).det(), -1);
        assert_eq!(V3([1, 0, 0]).cross(&V3([0, 1, 0])), V3([0, 0, 1]));
        assert_eq!(m.t().t(), m);
        assert_eq!(m.col(0), V3([0, 0, 1]));
    }
}
