/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator, SymOp, FracRot};
use crate::algo::reduction::{niggli_reduce, LatticeReduction};
use crate::errors::ToleranceViolationError;

use xtal_array_types::{V3, M33, mat};

use std::collections::HashSet;

/// No crystallographic point group is larger than this.
pub const MAX_POINT_GROUP_SIZE: usize = 48;

/// All rotations and rotoinversions that map a lattice onto itself.
///
/// The identity is first.  Every operation has zero translation, and its
/// matrix is the cartesian form of an integer unimodular matrix in the basis
/// of `lattice`.
pub fn enumerate_point_group(lattice: &Lattice, cmp: &Comparator) -> Result<Vec<SymOp>, ToleranceViolationError>
{
    let fracs = lattice_point_group(lattice, cmp)?;
    Ok(fracs.iter().map(|f| SymOp::from_matrix(f.to_cart(lattice))).collect())
}

/// `enumerate_point_group`, in the basis of `lattice`.
pub fn lattice_point_group(lattice: &Lattice, cmp: &Comparator) -> Result<Vec<FracRot>, ToleranceViolationError>
{
    let reduction = niggli_reduce(lattice, cmp.tol);
    let context = Context { reduction: &reduction, cmp };

    let (unimodulars, worst) = context.reduced_lattice_point_group()?;

    // express in the original basis:   L = C^-1 L_reduced   with   L_reduced = C L
    let c_mat = reduction.transform().matrix();
    let c_inv = reduction.transform().inverse_matrix();
    let mut fracs: Vec<FracRot> = unimodulars.iter()
        .map(|u| FracRot::new(&(c_inv * u * c_mat).t()))
        .collect();

    // identity first
    if let Some(pos) = fracs.iter().position(|f| f == &FracRot::eye()) {
        let eye = fracs.remove(pos);
        fracs.insert(0, eye);
    }

    debug!("Found point group of size {}", fracs.len());
    if fracs.len() > MAX_POINT_GROUP_SIZE || !is_closed(&fracs) {
        warn!("Tolerance {:e} gave an inconsistent point group of size {}", cmp.tol, fracs.len());
        return Err(ToleranceViolationError::new(worst, cmp.tol));
    }
    Ok(fracs)
}

fn is_closed(fracs: &[FracRot]) -> bool
{
    let set: HashSet<&FracRot> = fracs.iter().collect();
    fracs.iter().all(|a| fracs.iter().all(|b| set.contains(&a.then(b))))
}

// For a reduced cell, the only lattice points whose length can match one of
// the cell vectors lie within this many cells.
//
// FIXME: this is a fairly large region for the sake of paranoia.
//        Le Page (1982) J. Appl. Cryst. 15, 255-259 gives a bound of 2
//        for twofold axes.
const MAX_LATTICE_POINT: i32 = 5;

lazy_static!{
    static ref LATTICE_POINTS_INT: Vec<V3<i32>> = {
        const MAX: i32 = MAX_LATTICE_POINT;
        let mut indices = Vec::with_capacity((2 * MAX + 1).pow(3) as usize);
        for i in -MAX..MAX + 1 {
            for j in -MAX..MAX + 1 {
                for k in -MAX..MAX + 1 {
                    indices.push(V3([i, j, k]));
                }
            }
        }
        indices
    };

    static ref LATTICE_POINTS_FLOAT: Vec<V3> = floatify(&LATTICE_POINTS_INT);
}

/// Candidate rows for bases of a reduced lattice with the same vector lengths.
///
/// Element `k` holds every lattice point (in the basis of `reduced`, and in
/// cartesian coordinates) whose length matches that of the `k`th vector of
/// `reduced`.  Any basis whose vectors have the reduced lengths is built from
/// these, and the set does not depend on which reduced basis is given.
pub(crate) fn same_length_lattice_points(
    reduced: &Lattice,
    cmp: &Comparator,
) -> Result<[Vec<(V3<i32>, V3)>; 3], ToleranceViolationError>
{
    let lengths = reduced.norms();
    let carts: Vec<V3> = LATTICE_POINTS_FLOAT.iter().map(|frac| reduced.fractional_to_cartesian(frac)).collect();

    let mut out = [vec![], vec![], vec![]];
    for k in 0..3 {
        for (&int, cart) in izip!(LATTICE_POINTS_INT.iter(), &carts) {
            if cmp.is_negligible((cart.norm() - lengths[k]).abs())? {
                out[k].push((int, *cart));
            }
        }
    }
    Ok(out)
}

struct Context<'a> {
    reduction: &'a LatticeReduction,
    cmp: &'a Comparator,
}

impl<'a> Context<'a> {
    // Returns the row-acting unimodular matrices, and the worst metric
    // deviation among those accepted.
    fn reduced_lattice_point_group(&self) -> Result<(Vec<M33<i32>>, f64), ToleranceViolationError>
    {
        // Each rotation R of the lattice has a unimodular σ with  L R^T = σ L,
        // and so  (σ L) (σ L)^T == L L^T.
        //
        // The diagonal of that equality says that the rows of σ L have the
        // same lengths as those of L, which leaves very few candidates.
        let reduced = self.reduction.reduced();
        let lengths = reduced.norms();
        let choices = same_length_lattice_points(reduced, self.cmp)?;

        // off diagonal elements of L L^T
        let metric_off_diags = |m: &[V3; 3]| [
            m[1].dot(&m[2]),
            m[2].dot(&m[0]),
            m[0].dot(&m[1]),
        ];
        let target_off_diags = metric_off_diags(reduced.vectors());
        // a displacement of tol in either vector changes a dot product by
        // about tol times the sum of the lengths
        let length_sums = [
            lengths[1] + lengths[2],
            lengths[2] + lengths[0],
            lengths[0] + lengths[1],
        ];

        let mut unimodulars = vec![];
        let mut worst: f64 = 0.0;
        for &(frac_0, cart_0) in &choices[0] {
            for &(frac_1, cart_1) in &choices[1] {
                'candidate: for &(frac_2, cart_2) in &choices[2] {
                    let unimodular = mat::from_rows([frac_0, frac_1, frac_2]);
                    if unimodular.det().abs() != 1 {
                        continue;
                    }

                    // the off-diagonal of the metric completes  (σ L) (σ L)^T == L L^T
                    let off_diags = metric_off_diags(&[cart_0, cart_1, cart_2]);
                    let mut deviation: f64 = 0.0;
                    for k in 0..3 {
                        let distance = (off_diags[k] - target_off_diags[k]).abs() / length_sums[k];
                        if !self.cmp.is_negligible(distance)? {
                            continue 'candidate;
                        }
                        deviation = deviation.max(distance);
                    }
                    worst = worst.max(deviation);
                    unimodulars.push(unimodular);
                }
            }
        }
        trace!("{} unimodular candidates preserve the metric", unimodulars.len());
        Ok((unimodulars, worst))
    }
}

fn floatify(vs: &[V3<i32>]) -> Vec<V3>
{ vs.iter().map(|&v| v.map(f64::from)).collect() }

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::AmbiguityPolicy;
    use crate::algo::group::generate_finite_group;

    fn check_group(lattice: &Lattice, expected_size: usize)
    {
        let cmp = Comparator::new(1e-5);
        let fracs = lattice_point_group(lattice, &cmp).unwrap();
        assert_eq!(fracs.len(), expected_size);
        assert_eq!(fracs[0], FracRot::eye());

        // generating from all members gives nothing new
        let generated: HashSet<_> = generate_finite_group(&fracs, |a, b| a.then(b)).into_iter().collect();
        let found: HashSet<_> = fracs.iter().cloned().collect();
        assert_eq!(generated, found);

        // the cartesian matrices are orthogonal and preserve the lattice
        for op in enumerate_point_group(lattice, &cmp).unwrap() {
            let r = op.matrix();
            assert_close!(abs=1e-8, r * &r.t(), M33::eye());
            assert!(op.frac_rot(lattice, 1e-6).is_ok());
            assert_eq!(op.translation(), &V3([0.0; 3]));
        }
    }

    #[test]
    fn cubic() {
        check_group(&Lattice::cubic(1.0), 48);
        check_group(&Lattice::cubic(3.7), 48);
    }

    #[test]
    fn hexagonal() {
        check_group(&Lattice::hexagonal(1.0, 1.633), 24);
    }

    #[test]
    fn tetragonal_and_orthorhombic() {
        check_group(&Lattice::orthorhombic(1.0, 1.0, 2.0), 16);
        check_group(&Lattice::orthorhombic(1.0, 2.0, 3.0), 8);
    }

    #[test]
    fn fcc_in_any_basis() {
        let fcc = Lattice::new(&mat::from_array([
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.5],
            [0.5, 0.5, 0.0],
        ]), 1e-8).unwrap();
        check_group(&fcc, 48);

        // a skewed basis for the same lattice
        let skewed = fcc.linear_combination(&mat::from_array([[1, 0, 0], [1, 1, 0], [-2, 3, 1]]));
        check_group(&skewed, 48);
    }

    #[test]
    fn triclinic() {
        let lattice = Lattice::new(&mat::from_array([
            [1.0, 0.1, 0.2],
            [0.3, 1.7, 0.1],
            [-0.2, 0.4, 2.9],
        ]), 1e-8).unwrap();
        check_group(&lattice, 2);
    }

    #[test]
    fn rotated_lattice() {
        // the point group of a rotated lattice is the conjugated point group
        let (s, c) = (0.3f64.sin(), 0.3f64.cos());
        let rot = mat::from_array([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]);
        let lattice = Lattice::orthorhombic(1.0, 1.0, 2.0).transformed_by(&rot);
        check_group(&lattice, 16);
    }

    #[test]
    fn ambiguous_lengths() {
        // b differs from a by 1.5 tol
        let lattice = Lattice::orthorhombic(1.0, 1.0 + 1.5e-5, 2.0);
        assert_eq!(lattice_point_group(&lattice, &Comparator::new(1e-5)).unwrap().len(), 8);
        assert_eq!(lattice_point_group(&lattice, &Comparator::new(1e-4)).unwrap().len(), 16);

        let strict = Comparator::new(1e-5).ambiguity(AmbiguityPolicy::Error);
        assert!(enumerate_point_group(&lattice, &strict).is_err());
        assert_eq!(enumerate_point_group(&Lattice::orthorhombic(1.0, 1.1, 2.0), &strict).unwrap().len(), 8);
    }
}
