/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Column spaces of small dense matrices.
//!
//! These are used to compare restricted DoF bases, which are equivalent
//! whenever they span the same subspace regardless of the choice of axes.

use ndarray::{Array1, Array2, ArrayView2};

/// Orthonormal basis (as columns) for the column space of `cols`.
///
/// Modified Gram-Schmidt.  A column is considered dependent on the previous
/// ones if less than `tol` of its norm (relatively) survives projection.
pub fn orthonormal_basis(cols: ArrayView2<'_, f64>, tol: f64) -> Array2<f64>
{
    let dim = cols.shape()[0];
    let mut found: Vec<Array1<f64>> = vec![];
    for j in 0..cols.shape()[1] {
        let original = cols.column(j).to_owned();
        let original_norm = original.dot(&original).sqrt();
        if original_norm <= tol {
            continue;
        }

        let mut v = original;
        // second pass cleans up the roundoff from the first
        for _ in 0..2 {
            for q in &found {
                let overlap = q.dot(&v);
                v = v - &(q * overlap);
            }
        }

        let norm = v.dot(&v).sqrt();
        if norm > tol * original_norm {
            found.push(v / norm);
        }
    }
    Array2::from_shape_fn((dim, found.len()), |(r, c)| found[c][r])
}

/// Orthogonal projector onto the column space of `cols`.
pub fn projector(cols: ArrayView2<'_, f64>, tol: f64) -> Array2<f64>
{
    let dim = cols.shape()[0];
    let q = orthonormal_basis(cols, tol);
    if q.shape()[1] == 0 {
        return Array2::zeros((dim, dim));
    }
    q.dot(&q.t())
}

/// Dimension of the column space of `cols`.
pub fn rank(cols: ArrayView2<'_, f64>, tol: f64) -> usize
{ orthonormal_basis(cols, tol).shape()[1] }

/// Largest elementwise difference between the projectors onto the column
/// spaces of two matrices.  `None` if they live in different dimensions.
///
/// Zero exactly when the spans agree, whatever the number and scaling
/// of the columns.
pub fn span_distance(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>, tol: f64) -> Option<f64>
{
    if a.shape()[0] != b.shape()[0] {
        return None;
    }
    let pa = projector(a, tol);
    let pb = projector(b, tol);
    Some(pa.iter().zip(pb.iter()).fold(0.0, |acc, (x, y)| f64::max(acc, (x - y).abs())))
}
