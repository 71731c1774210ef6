/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Canonical forms of lattices and prims.
//!
//! Canonical forms depend only on the (cartesian) point set of the lattice
//! and the decoration of the sites, so that two descriptions of the same
//! crystal that differ by a change of basis, a reordering of sites, or a
//! shift of the origin produce prims that compare equal.

use crate::{Lattice, Comparator, OccupantOrder, Prim, Site};
use crate::algo::point_group::same_length_lattice_points;
use crate::algo::primitive::make_primitive;
use crate::algo::reduction::niggli_reduce;
use crate::errors::{Result, ToleranceViolationError};

use xtal_array_types::{V3, M33, mat};

use std::cmp::Ordering;

/// The canonical basis of a lattice.
///
/// The lengths of a Niggli-reduced basis are the same for every basis of the
/// lattice, but the reduced basis itself is not (signs, and the choice
/// between acute and obtuse angles, depend on the input).  So every
/// right-handed basis whose vectors have the reduced lengths is generated,
/// and the one whose column-vector matrix is greatest (fuzzily, in row-major
/// order) is chosen.
pub fn make_canonical_lattice(lattice: &Lattice, cmp: &Comparator) -> std::result::Result<Lattice, ToleranceViolationError>
{
    let reduced = niggli_reduce(lattice, cmp.tol).reduced().clone();
    let choices = same_length_lattice_points(&reduced, cmp)?;
    let handedness = match reduced.signed_volume() < 0.0 {
        true => -1,
        false => 1,
    };

    let mut num_candidates = 0;
    let mut best: Option<(M33<i32>, [f64; 9])> = None;
    for &(frac_0, _) in &choices[0] {
        for &(frac_1, _) in &choices[1] {
            for &(frac_2, _) in &choices[2] {
                let unimodular = mat::from_rows([frac_0, frac_1, frac_2]);
                // right-handed
                if unimodular.det() != handedness {
                    continue;
                }
                num_candidates += 1;

                let candidate = reduced.linear_combination(&unimodular);
                let key = candidate.column_vector_matrix().flat();
                let is_better = match &best {
                    None => true,
                    Some((_, best_key)) => cmp.fuzzy_cmp_slices(&key, best_key) == Ordering::Greater,
                };
                if is_better {
                    best = Some((unimodular, key));
                }
            }
        }
    }
    trace!("Chose the canonical basis among {} of the reduced lengths", num_candidates);

    let (unimodular, _) = best.expect("(BUG) the reduced basis or its negation is always a candidate!");
    Ok(reduced.linear_combination(&unimodular))
}

/// The canonical form of a prim.
///
/// Sites are re-expressed in the canonical lattice.  Then, for each site in
/// the smallest class of sites (by occupants and DoF), the origin is moved
/// onto that site and the basis is sorted; the smallest sorted basis wins.
///
/// This does not reduce to a primitive cell.
pub fn make_canonical_prim(prim: &Prim, cmp: &Comparator) -> std::result::Result<Prim, ToleranceViolationError>
{
    let lattice = make_canonical_lattice(prim.lattice(), cmp)?;
    let carts: Vec<V3> = prim.coords().iter()
        .map(|f| prim.lattice().fractional_to_cartesian(f))
        .collect();
    let fracs: Vec<V3> = carts.iter()
        .map(|c| cmp.fractional_within(&lattice, &lattice.cartesian_to_fractional(c)))
        .collect();

    if fracs.is_empty() {
        return Ok(Prim { lattice, ..prim.clone() });
    }

    let keys: Vec<SiteKey> = (0..prim.num_sites()).map(|i| SiteKey::new(prim, i, cmp)).collect();
    let min_key = keys.iter()
        .min_by(|a, b| a.fuzzy_cmp(b, cmp))
        .expect("(BUG) nonempty!?");
    let origins: Vec<usize> = (0..keys.len())
        .filter(|&i| keys[i].fuzzy_cmp(min_key, cmp) == Ordering::Equal)
        .collect();
    trace!("Trying {} candidate origins for the canonical basis", origins.len());

    let mut best: Option<Vec<(usize, V3)>> = None;
    for &origin in &origins {
        let shift = fracs[origin];
        let mut basis: Vec<(usize, V3)> = fracs.iter().enumerate()
            .map(|(i, f)| (i, cmp.fractional_within(&lattice, &(f - shift))))
            .collect();
        basis.sort_by(|a, b| cmp_sites(&keys, a, b, cmp));

        let is_better = match &best {
            None => true,
            Some(best) => cmp_bases(&keys, &basis, best, cmp) == Ordering::Less,
        };
        if is_better {
            best = Some(basis);
        }
    }
    let best = best.expect("(BUG) no candidate origins!?");

    let sites = best.into_iter()
        .map(|(i, coord)| Site { coord, ..prim.sites()[i].clone() })
        .collect();
    Ok(Prim { lattice, sites, ..prim.clone() })
}

/// Test whether two prims describe the same crystal.
///
/// Both are reduced to primitive cells and canonicalized before comparing.
pub fn is_same_crystal(a: &Prim, b: &Prim, cmp: &Comparator) -> Result<bool>
{
    let a = make_canonical_prim(&make_primitive(a, cmp)?, cmp)?;
    let b = make_canonical_prim(&make_primitive(b, cmp)?, cmp)?;
    Ok(a.is_same_prim(&b, cmp)?)
}

// Everything about a site except its position.
#[derive(Debug, Clone)]
struct SiteKey {
    occupants: Vec<(String, Vec<(String, Vec<f64>)>)>,
    dofs: Vec<(String, Vec<f64>)>,
}

impl SiteKey {
    fn new(prim: &Prim, site: usize, cmp: &Comparator) -> SiteKey
    {
        let mut occupants: Vec<_> = prim.site_occupants(site).into_iter()
            .map(|occ| {
                let props = occ.properties().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                (occ.name().to_string(), props)
            })
            .collect();
        if cmp.occupant_order == OccupantOrder::Insensitive {
            occupants.sort_by(|a, b| cmp_occupant_keys(a, b, cmp));
        }

        let mut dofs: Vec<_> = prim.sites()[site].local_dof.iter()
            .map(|dof| (dof.dof_type_name().to_string(), dof.projector_key(cmp.tol)))
            .collect();
        dofs.sort_by(|a, b| a.0.cmp(&b.0));

        SiteKey { occupants, dofs }
    }

    fn fuzzy_cmp(&self, other: &SiteKey, cmp: &Comparator) -> Ordering
    {
        cmp_lists(&self.occupants, &other.occupants, |a, b| cmp_occupant_keys(a, b, cmp))
            .then_with(|| cmp_lists(&self.dofs, &other.dofs, |a, b| {
                a.0.cmp(&b.0).then_with(|| cmp.fuzzy_cmp_slices(&a.1, &b.1))
            }))
    }
}

fn cmp_occupant_keys(
    a: &(String, Vec<(String, Vec<f64>)>),
    b: &(String, Vec<(String, Vec<f64>)>),
    cmp: &Comparator,
) -> Ordering
{
    a.0.cmp(&b.0).then_with(|| cmp_lists(&a.1, &b.1, |x, y| {
        x.0.cmp(&y.0).then_with(|| cmp.fuzzy_cmp_slices(&x.1, &y.1))
    }))
}

fn cmp_lists<T>(a: &[T], b: &[T], mut f: impl FnMut(&T, &T) -> Ordering) -> Ordering
{
    for (x, y) in a.iter().zip(b) {
        match f(x, y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_sites(keys: &[SiteKey], a: &(usize, V3), b: &(usize, V3), cmp: &Comparator) -> Ordering
{
    keys[a.0].fuzzy_cmp(&keys[b.0], cmp)
        .then_with(|| cmp.fuzzy_cmp_slices(&a.1[..], &b.1[..]))
}

fn cmp_bases(keys: &[SiteKey], a: &[(usize, V3)], b: &[(usize, V3)], cmp: &Comparator) -> Ordering
{ cmp_lists(a, b, |x, y| cmp_sites(keys, x, y, cmp)) }
