/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use num_integer::Integer;
use xtal_array_types::{V3, M33};
use xtal_numtheory::extended_gcd;

use crate::DegenerateMatrixError;

/// Hermite Normal Form of the lattice generated by a set of integer row vectors.
///
/// # Conventions
///
/// The convention is row-based, as everywhere else in this workspace.  The
/// output is lower triangular with a positive diagonal, and each element below
/// the diagonal lies in `[0, pivot)` for the pivot of its column:
///
/// ```text
/// [ a 0 0 ]
/// [ b c 0 ]    0 < a,   0 < c,   0 < f,
/// [ d e f ]    0 <= b < a,   0 <= d < a,   0 <= e < c
/// ```
///
/// Its rows are a basis for the same lattice as the input rows.  Because the
/// HNF is unique, two generating sets describe the same lattice iff they
/// have the same HNF.
///
/// There may be any number of generators (including duplicates and zeros),
/// but together they must span all three dimensions.
pub fn hnf_of_generators(generators: &[V3<i64>]) -> Result<M33<i64>, DegenerateMatrixError>
{
    let mut rows: Vec<V3<i64>> = generators.iter().cloned().filter(|v| v != &V3([0; 3])).collect();
    let mut out = M33::zero();

    // Eliminate the last column first so that the pivots land on the diagonal
    // of a lower triangular matrix.
    for col in (0..3).rev() {
        let mut pivot: Option<V3<i64>> = None;
        let mut rest = Vec::with_capacity(rows.len());
        for row in rows {
            if row[col] == 0 {
                rest.push(row);
                continue;
            }
            pivot = Some(match pivot {
                None => row,
                Some(pivot) => {
                    let (new_pivot, zeroed) = gcd_step(pivot, row, col);
                    if zeroed != V3([0; 3]) {
                        rest.push(zeroed);
                    }
                    new_pivot
                },
            });
        }

        let mut pivot = pivot.ok_or(DegenerateMatrixError)?;
        if pivot[col] < 0 {
            pivot = -pivot;
        }
        out[col] = pivot;
        rows = rest;
    }
    debug_assert!(rows.is_empty());

    // canonicalize by reducing the elements below the diagonal
    let out = reduce_below(out, 2, 1);
    let out = reduce_below(out, 2, 0);
    let out = reduce_below(out, 1, 0);

    if cfg!(debug_assertions) {
        validate(&out);
    }
    Ok(out)
}

/// Hermite Normal Form of a square integer matrix, treated as three generators.
pub trait Hnf: Sized {
    fn hnf(self) -> Result<Self, DegenerateMatrixError>;
}

impl Hnf for M33<i64> {
    fn hnf(self) -> Result<Self, DegenerateMatrixError>
    { hnf_of_generators(&self.0) }
}

// Apply a unimodular 2x2 operation to rows `a` and `b` such that the first
// output has the gcd of their values in `col`, and the second has zero there.
fn gcd_step(a: V3<i64>, b: V3<i64>, col: usize) -> (V3<i64>, V3<i64>)
{
    let data = extended_gcd(a[col], b[col]);
    let (s, t) = data.coeffs;
    let (qa, qb) = data.quotients;

    // [ s   t ]
    // [-qb qa ]  has determinant (s * a + t * b) / gcd == 1
    let gcd_row = a * s + b * t;
    let zero_row = b * qa - a * qb;

    debug_assert_eq!(gcd_row[col], data.gcd);
    debug_assert_eq!(zero_row[col], 0);
    (gcd_row, zero_row)
}

// reduces m[reduce_row][col] modulo m[col][col] by adding multiples of row `col`.
fn reduce_below(mut m: M33<i64>, reduce_row: usize, col: usize) -> M33<i64>
{
    assert!(m[col][col] > 0);
    let mult = -(m[reduce_row][col].div_floor(&m[col][col]));
    let pivot_row = m[col];
    m[reduce_row] += pivot_row * mult;
    m
}

// This tests all necessary conditions on the shape of the result.
fn validate(hnf: &M33<i64>) {
    use std::cmp::Ordering;

    for r in 0..3 {
        for c in 0..3 {
            match r.cmp(&c) {
                Ordering::Less => assert_eq!(hnf[r][c], 0, "{:?}", hnf),
                Ordering::Equal => assert!(hnf[r][c] > 0, "{:?}", hnf),
                Ordering::Greater => {
                    assert!(0 <= hnf[r][c] && hnf[r][c] < hnf[c][c], "{:?}", hnf)
                },
            }
        }
    }
}
