/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Comparator, Prim, Site};
use crate::errors::{Result, DegenerateLatticeError};
use crate::util::{Tol, i64_m33, float_m33};

use xtal_array_types::{V3, M33, inv};
use xtal_linalg::Hnf;

/// Tile a prim into the superlattice `L T`.
///
/// `transformation` uses the column convention of `Lattice::make_superlattice`.
/// Each site of the prim produces `|det T|` consecutive sites in the output,
/// wrapped into the supercell.
pub fn make_superstructure(prim: &Prim, transformation: &M33, cmp: &Comparator) -> Result<Prim>
{
    let lattice = prim.lattice().make_superlattice(transformation, cmp.tol)?;

    // the superlattice rows, in units of the prim lattice
    let rows = Tol(cmp.tol).unfloat_m33(transformation)?.t();
    let offsets = sc_offsets(&rows)?;

    let rows_inv = inv(&float_m33(&rows));
    let mut sites = Vec::with_capacity(prim.num_sites() * offsets.len());
    for site in prim.sites() {
        for offset in &offsets {
            let frac = (site.coord + offset) * &rows_inv;
            sites.push(Site {
                coord: cmp.fractional_within(&lattice, &frac),
                ..site.clone()
            });
        }
    }
    debug!("Built superstructure with {} images of {} sites", offsets.len(), prim.num_sites());

    Ok(Prim {
        lattice,
        sites,
        global_dof: prim.global_dof.clone(),
        occupants: prim.occupants.clone(),
    })
}

impl Prim {
    /// Method form of `make_superstructure`.
    pub fn make_superstructure(&self, transformation: &M33, cmp: &Comparator) -> Result<Prim>
    { make_superstructure(self, transformation, cmp) }
}

// One integer translation of the prim lattice for each distinct image
// in the superlattice described by `rows`.
fn sc_offsets(rows: &M33<i32>) -> Result<Vec<V3>>
{
    // The rows of the HNF generate the same lattice, and being lower
    // triangular, the box [0, a) x [0, c) x [0, f) holds exactly one
    // representative of every coset.
    let hnf = i64_m33(rows).hnf().map_err(|_| DegenerateLatticeError::new(0.0))?;
    let periods = [hnf[0][0], hnf[1][1], hnf[2][2]];

    let mut out = Vec::with_capacity((periods[0] * periods[1] * periods[2]) as usize);
    for i in 0..periods[0] {
        for j in 0..periods[1] {
            for k in 0..periods[2] {
                out.push(V3([i as f64, j as f64, k as f64]));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::Lattice;
    use crate::algo::factor_group::compute_factor_group;
    use xtal_array_types::mat;

    #[test]
    fn diagonal() {
        let cmp = Comparator::default();
        let prim = Prim::builder(Lattice::cubic(2.0))
            .site(V3([0.0; 3]), &["A"])
            .site(V3([0.5; 3]), &["B"])
            .build().unwrap();
        let t = mat::from_array([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 3.0]]);
        let sc = make_superstructure(&prim, &t, &cmp).unwrap();
        assert_eq!(prim.make_superstructure(&t, &cmp).unwrap(), sc);

        assert_eq!(sc.num_sites(), 12);
        assert_close!(sc.lattice().volume(), 6.0 * 8.0);
        // site-major order
        assert!(sc.sites()[..6].iter().all(|s| s.occ_dof == vec!["A".to_string()]));
        assert!(sc.sites()[6..].iter().all(|s| s.occ_dof == vec!["B".to_string()]));
        assert_close!(abs=1e-12, sc.sites()[1].coord, V3([0.0, 0.0, 1.0 / 3.0]));
        assert_close!(abs=1e-12, sc.sites()[6].coord, V3([0.25, 0.5, 1.0 / 6.0]));
    }

    #[test]
    fn non_diagonal() {
        let cmp = Comparator::default();
        let prim = Prim::builder(Lattice::hexagonal(1.0, 1.6))
            .site(V3([0.0; 3]), &["A"])
            .build().unwrap();
        let t = mat::from_array([[2.0, -1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let sc = make_superstructure(&prim, &t, &cmp).unwrap();
        assert_eq!(sc.num_sites(), 3);

        // the images are all distinct within the supercell
        for i in 0..3 {
            for j in 0..i {
                let (a, b) = (&sc.sites()[i].coord, &sc.sites()[j].coord);
                assert!(!cmp.periodic_eq(sc.lattice(), a, b).unwrap());
            }
            // and are all lattice points of the prim
            let cart = sc.lattice().fractional_to_cartesian(&sc.sites()[i].coord);
            let frac = prim.lattice().cartesian_to_fractional(&cart);
            assert!(Tol(1e-8).unfloat_v3(&frac).is_ok());
        }

        // a sqrt(3) x sqrt(3) cell of a hexagonal lattice keeps its full symmetry
        assert_eq!(compute_factor_group(&sc, &cmp).unwrap().len(), 24 * 3);
    }

    #[test]
    fn errors() {
        let cmp = Comparator::default();
        let prim = Prim::builder(Lattice::cubic(1.0)).site(V3([0.0; 3]), &["A"]).build().unwrap();
        let half = mat::from_array([[0.5, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(make_superstructure(&prim, &half, &cmp).is_err());
        let flat = mat::from_array([[1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(make_superstructure(&prim, &flat, &cmp).is_err());
    }
}
