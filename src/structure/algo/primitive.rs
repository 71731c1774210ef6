/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator, Threading, SymOp, Prim};
use crate::algo::factor_group::check_symmetry;
use crate::algo::reduction::niggli_reduce;
use crate::errors::{Result, ToleranceViolationError, ReductionError};

use xtal_array_types::V3;
use xtal_linalg::hnf_of_generators;

use rayon::prelude::*;

/// Fractional translations that map the decorated basis onto itself.
///
/// The zero translation is always first.  The others are wrapped into
/// `[0, 1)` and appear in the order of the sites they carry site 0 onto.
pub fn find_lattice_translations(prim: &Prim, cmp: &Comparator) -> std::result::Result<Vec<V3>, ToleranceViolationError>
{
    let lattice = prim.lattice();
    let coords = prim.coords();
    let first = match coords.first() {
        Some(first) => *first,
        None => return Ok(vec![V3([0.0; 3])]),
    };

    let candidates: Vec<V3> = coords[1..].iter()
        .map(|coord| cmp.fractional_within(lattice, &(coord - first)))
        .collect();

    let check = |frac: &V3| -> std::result::Result<bool, ToleranceViolationError> {
        // translating onto an image of site 0 itself is not a new translation
        if cmp.periodic_eq(lattice, frac, &V3([0.0; 3]))? {
            return Ok(false);
        }
        let op = SymOp::from_translation(lattice.fractional_to_cartesian(frac));
        Ok(check_symmetry(prim, &op, cmp)?.is_some())
    };
    let accepted: Vec<std::result::Result<bool, ToleranceViolationError>> = match cmp.threading {
        Threading::Rayon => candidates.par_iter().map(check).collect(),
        Threading::Serial => candidates.iter().map(check).collect(),
    };

    let mut out = vec![V3([0.0; 3])];
    for (frac, accepted) in candidates.into_iter().zip(accepted) {
        if !accepted? {
            continue;
        }
        let mut is_new = true;
        for existing in &out {
            if cmp.periodic_eq(lattice, existing, &frac)? {
                is_new = false;
                break;
            }
        }
        if is_new {
            out.push(frac);
        }
    }
    trace!("Found {} internal lattice translations", out.len());
    Ok(out)
}

/// Find the smallest cell that describes the same decorated crystal.
///
/// The output lattice is Niggli-reduced, and its sites are the first
/// periodic image of each distinct input site, wrapped into the cell.
/// Returns a clone if `prim` is already primitive.
pub fn make_primitive(prim: &Prim, cmp: &Comparator) -> Result<Prim>
{
    let translations = find_lattice_translations(prim, cmp)?;
    let n = translations.len();
    if n == 1 {
        return Ok(prim.clone());
    }
    let lattice = prim.lattice();

    // Multiplied by n, the translations and the old lattice are all integer
    // vectors generating n times the new lattice.
    let nf = n as f64;
    let mut generators = vec![V3([n as i64, 0, 0]), V3([0, n as i64, 0]), V3([0, 0, n as i64])];
    for t in &translations[1..] {
        let scaled = t * nf;
        let rounded = scaled.map(f64::round);
        let error = lattice.fractional_to_cartesian(&(scaled - rounded)).norm();
        if !(error <= nf * cmp.tol) {
            throw!(ReductionError::new(format!(
                "translation {:?} is not a multiple of 1/{} (off by {:e})", t, n, error,
            )));
        }
        generators.push(rounded.map(|x| x as i64));
    }

    let hnf = match hnf_of_generators(&generators) {
        Ok(hnf) => hnf,
        Err(_) => {
            throw!(ReductionError::new("translation lattice is degenerate".to_string()))
        },
    };
    if hnf.det() != (n * n) as i64 {
        throw!(ReductionError::new(format!(
            "{} translations do not form a lattice (HNF determinant {})", n, hnf.det(),
        )));
    }

    let new_rows = hnf.map(|x| x as f64 / nf) * lattice.matrix();
    let new_lattice = Lattice::new(&new_rows, cmp.tol)?;
    let new_lattice = niggli_reduce(&new_lattice, cmp.tol).reduced().clone();

    let mut coords: Vec<V3> = vec![];
    let mut kept: Vec<usize> = vec![];
    'sites: for (i, site) in prim.sites().iter().enumerate() {
        let cart = lattice.fractional_to_cartesian(&site.coord);
        let frac = cmp.fractional_within(&new_lattice, &new_lattice.cartesian_to_fractional(&cart));
        for existing in &coords {
            if cmp.periodic_eq(&new_lattice, existing, &frac)? {
                continue 'sites;
            }
        }
        coords.push(frac);
        kept.push(i);
    }

    let expected_sites = prim.num_sites() / n;
    if coords.len() != expected_sites || expected_sites * n != prim.num_sites() {
        throw!(ReductionError::new(format!(
            "expected {} sites in the primitive cell, found {}", expected_sites, coords.len(),
        )));
    }
    let expected_volume = lattice.volume() / nf;
    if (new_lattice.volume() - expected_volume).abs() > 1e-8 * lattice.volume() {
        throw!(ReductionError::new(format!(
            "expected primitive volume {}, found {}", expected_volume, new_lattice.volume(),
        )));
    }
    info!("Reduced a cell of {} sites to a primitive cell of {}", prim.num_sites(), coords.len());

    let sites = izip!(kept, coords)
        .map(|(i, coord)| crate::Site { coord, ..prim.sites()[i].clone() })
        .collect();
    Ok(Prim {
        lattice: new_lattice,
        sites,
        global_dof: prim.global_dof.clone(),
        occupants: prim.occupants.clone(),
    })
}
