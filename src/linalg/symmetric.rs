/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Spectral functions of symmetric 3x3 matrices, and least-squares
//! coordinates in a non-square basis.
//!
//! The matrices involved (metric and stretch tensors) are tiny, so a
//! handful of Jacobi sweeps is all the eigensolver anyone needs.

use crate::DegenerateMatrixError;

use ndarray::{Array2, ArrayView2};
use xtal_array_types::{M33, mat};

const MAX_SWEEPS: usize = 50;

/// Eigenvalues (ascending) and eigenvectors (as columns) of a symmetric matrix.
///
/// The input is assumed to be symmetric; only its upper triangle decides
/// which rotations are applied.
pub fn symmetric_eigen(m: &M33) -> ([f64; 3], M33)
{
    let mut a = *m;
    let mut vecs = M33::eye();
    let scale = m.max_abs();

    for _ in 0..MAX_SWEEPS {
        let off = a[0][1].abs() + a[0][2].abs() + a[1][2].abs();
        if off <= 1e-15 * scale {
            break;
        }

        for &(p, q) in &[(0, 1), (0, 2), (1, 2)] {
            if a[p][q] == 0.0 {
                continue;
            }
            // rotation in the (p, q) plane that zeroes a[p][q]
            let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            let mut rot = M33::eye();
            rot[p][p] = c;
            rot[q][q] = c;
            rot[p][q] = s;
            rot[q][p] = -s;

            a = &(&rot.t() * &a) * &rot;
            vecs = &vecs * &rot;
        }
    }

    let mut order = [0, 1, 2];
    order.sort_by(|&i, &j| a[i][i].partial_cmp(&a[j][j]).expect("NaN"));
    let values = [a[order[0]][order[0]], a[order[1]][order[1]], a[order[2]][order[2]]];
    let vecs = mat::from_fn(|r, c| vecs[r][order[c]]);
    (values, vecs)
}

/// Apply a scalar function to a symmetric matrix through its eigenvalues.
///
/// `V f(D) V^T`, where `M = V D V^T`.
pub fn symmetric_apply(m: &M33, mut f: impl FnMut(f64) -> f64) -> M33
{
    let (values, vecs) = symmetric_eigen(m);
    let mapped = [f(values[0]), f(values[1]), f(values[2])];
    let scaled = mat::from_fn(|r, c| vecs[r][c] * mapped[c]);
    &scaled * &vecs.t()
}

/// Left inverse `(B^T B)^-1 B^T` of a matrix with linearly independent columns.
///
/// Multiplying a vector by this gives the least-squares coordinates of that
/// vector in the basis given by the columns.
pub fn pseudo_inverse(cols: ArrayView2<'_, f64>) -> Result<Array2<f64>, DegenerateMatrixError>
{
    let gram = cols.t().dot(&cols);
    Ok(inverse(gram)?.dot(&cols.t()))
}

// Gauss-Jordan with partial pivoting.
fn inverse(mut a: Array2<f64>) -> Result<Array2<f64>, DegenerateMatrixError>
{
    let n = a.shape()[0];
    assert_eq!(n, a.shape()[1], "(BUG) inverse of non-square matrix!");

    let scale = a.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()));
    let mut out = Array2::eye(n);
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[(i, col)].abs().partial_cmp(&a[(j, col)].abs()).expect("NaN"))
            .expect("(BUG) no rows!?");
        if a[(pivot, col)].abs() <= 1e-12 * scale {
            return Err(DegenerateMatrixError);
        }
        for k in 0..n {
            a.swap((col, k), (pivot, k));
            out.swap((col, k), (pivot, k));
        }

        let diag = a[(col, col)];
        for k in 0..n {
            a[(col, k)] /= diag;
            out[(col, k)] /= diag;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[(row, k)] -= factor * a[(col, k)];
                out[(row, k)] -= factor * out[(col, k)];
            }
        }
    }
    Ok(out)
}
