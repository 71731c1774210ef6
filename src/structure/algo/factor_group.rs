/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator, Threading, SymOp, Prim};
use crate::algo::point_group::enumerate_point_group;
use crate::core::prim::{Occupant, match_occupants, dofs_equivalent};
use crate::errors::ToleranceViolationError;

use xtal_array_types::V3;
use xtal_soa_ops::Perm;

use rayon::prelude::*;

/// How a symmetry operation permutes the sites of a prim.
///
/// This is the tagged side output of accepting an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMap {
    /// `site_perm.permute_index(i)` is the site that site `i` is carried onto.
    pub site_perm: Perm,
    /// For each site `i`, maps the index of an allowed occupant of site `i`
    /// to the index of its image among the occupants of the image site.
    pub occupant_perms: Vec<Perm>,
}

/// The operations that map a prim onto itself, modulo lattice translations.
///
/// The identity is first.
#[derive(Debug, Clone)]
pub struct FactorGroup {
    ops: Vec<SymOp>,
    site_maps: Vec<SiteMap>,
}

impl FactorGroup {
    pub fn ops(&self) -> &[SymOp]
    { &self.ops }

    pub fn site_maps(&self) -> &[SiteMap]
    { &self.site_maps }

    pub fn len(&self) -> usize
    { self.ops.len() }

    pub fn is_empty(&self) -> bool
    { self.ops.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item=(&SymOp, &SiteMap)>
    { self.ops.iter().zip(&self.site_maps) }

    pub fn into_ops(self) -> Vec<SymOp>
    { self.ops }
}

/// Test whether a single operation maps `prim` onto itself.
///
/// Returns the site map when it does.  This is a pure function of its
/// inputs, so independent candidates can be tested in parallel.
pub fn check_symmetry(prim: &Prim, op: &SymOp, cmp: &Comparator) -> Result<Option<SiteMap>, ToleranceViolationError>
{ Context::new(prim, cmp).check(op) }

/// Compute the factor group of a prim.
///
/// Candidates are every lattice point group operation (also combined with
/// time reversal, when anything in the prim is odd under it), paired with
/// each translation that carries site 0 onto a site.  Translations are
/// wrapped into the unit cell.
pub fn compute_factor_group(prim: &Prim, cmp: &Comparator) -> Result<FactorGroup, ToleranceViolationError>
{
    let lattice = prim.lattice();
    let point_group = enumerate_point_group(lattice, cmp)?;

    let time_reversals: &[bool] = match prim.has_time_reversal_odd_dof() {
        true => &[false, true],
        false => &[false],
    };

    // (key, op); ops with equal keys share a linear part
    let mut candidates: Vec<(usize, SymOp)> = vec![];
    for &time_reversal in time_reversals {
        for (pg_index, point_op) in point_group.iter().enumerate() {
            let key = 2 * pg_index + time_reversal as usize;
            let point_op = point_op.with_time_reversal(time_reversal);
            match prim.sites().first() {
                None => candidates.push((key, point_op)),
                Some(site_0) => {
                    let image_0 = point_op.transform_frac(lattice, &site_0.coord);
                    for site in prim.sites() {
                        let frac = cmp.fractional_within(lattice, &(site.coord - image_0));
                        let translation = lattice.fractional_to_cartesian(&frac);
                        candidates.push((key, point_op.with_translation(translation)));
                    }
                },
            }
        }
    }

    let context = Context::new(prim, cmp);
    let results: Vec<Result<Option<SiteMap>, ToleranceViolationError>> = match cmp.threading {
        Threading::Rayon => candidates.par_iter().map(|(_, op)| context.check(op)).collect(),
        Threading::Serial => candidates.iter().map(|(_, op)| context.check(op)).collect(),
    };

    let num_candidates = candidates.len();
    let mut keys = vec![];
    let mut ops = vec![];
    let mut site_maps = vec![];
    for ((key, op), result) in candidates.into_iter().zip(results) {
        let site_map = match result? {
            Some(site_map) => site_map,
            None => continue,
        };

        let mut is_duplicate = false;
        for (&other_key, other) in keys.iter().zip(&ops) {
            if other_key == key && op.periodic_eq(other, lattice, cmp)? {
                is_duplicate = true;
                break;
            }
        }
        if !is_duplicate {
            keys.push(key);
            ops.push(op);
            site_maps.push(site_map);
        }
    }
    debug!("Factor group: accepted {} of {} candidate operations", ops.len(), num_candidates);

    Ok(FactorGroup { ops, site_maps })
}

/// The distinct linear parts (with time reversal) of a factor group,
/// with zero translation.
pub fn make_crystal_point_group(factor_group: &[SymOp], cmp: &Comparator) -> Result<Vec<SymOp>, ToleranceViolationError>
{
    let mut out: Vec<SymOp> = vec![];
    for op in factor_group {
        let mut is_new = true;
        for existing in &out {
            if existing.time_reversal() == op.time_reversal() && existing.matrix_eq(op, cmp)? {
                is_new = false;
                break;
            }
        }
        if is_new {
            out.push(op.with_translation(V3([0.0; 3])));
        }
    }
    Ok(out)
}

struct Context<'a> {
    prim: &'a Prim,
    cmp: &'a Comparator,
    coords: Vec<V3>,
    occupants: Vec<Vec<Occupant>>,
}

impl<'a> Context<'a> {
    fn new(prim: &'a Prim, cmp: &'a Comparator) -> Self
    {
        let coords = prim.coords();
        let occupants = (0..prim.num_sites()).map(|i| prim.site_occupants(i)).collect();
        Context { prim, cmp, coords, occupants }
    }

    fn check(&self, op: &SymOp) -> Result<Option<SiteMap>, ToleranceViolationError>
    {
        let cmp = self.cmp;
        let lattice = self.prim.lattice();
        let sites = self.prim.sites();

        let images: Vec<V3> = self.coords.iter().map(|c| op.transform_frac(lattice, c)).collect();
        let site_perm = match brute_force_near_identity(lattice, &images, &self.coords, cmp)? {
            Some(perm) => perm,
            None => {
                trace!("Rejected operation (positions): {:?}", op);
                return Ok(None);
            },
        };

        let mut occupant_perms = Vec::with_capacity(sites.len());
        for (i, site) in sites.iter().enumerate() {
            let j = site_perm.permute_index(i);

            let transformed: Vec<Occupant> = self.occupants[i].iter().map(|occ| occ.transformed(op)).collect();
            match match_occupants(cmp, &transformed, &self.occupants[j])? {
                Some(perm) => occupant_perms.push(perm),
                None => {
                    trace!("Rejected operation (occupants of site {}): {:?}", i, op);
                    return Ok(None);
                },
            }

            let local_dof: Vec<_> = site.local_dof.iter().map(|dof| dof.transformed(op)).collect();
            if !dofs_equivalent(&local_dof, &sites[j].local_dof, cmp)? {
                trace!("Rejected operation (local DoF of site {}): {:?}", i, op);
                return Ok(None);
            }
        }

        let global_dof: Vec<_> = self.prim.global_dof().iter().map(|dof| dof.transformed(op)).collect();
        if !dofs_equivalent(&global_dof, self.prim.global_dof(), cmp)? {
            trace!("Rejected operation (global DoF): {:?}", op);
            return Ok(None);
        }

        Ok(Some(SiteMap { site_perm, occupant_perms }))
    }
}

/// Find where each of `from_fracs` sits among `to_fracs`, modulo the lattice.
///
/// Returns `None` if any position has no unclaimed match.
//
// Optimized for permutations near the identity.
fn brute_force_near_identity(
    lattice: &Lattice,
    from_fracs: &[V3],
    to_fracs: &[V3],
    cmp: &Comparator,
) -> Result<Option<Perm>, ToleranceViolationError>
{Ok({
    assert_eq!(from_fracs.len(), to_fracs.len());
    let n = from_fracs.len();

    const UNSET: usize = ::std::usize::MAX;
    assert!(n < UNSET);

    let mut perm = vec![UNSET; n];

    // optimization: Rather than filling the out vector in order,
    // we find where each index belongs (e.g. we place the 0, then
    // we place the 1, etc.).
    // Then we can track the first unassigned index.
    //
    // This works best if the permutation is close to the identity.
    // (more specifically, if the max value of 'out[i] - i' is small)
    let mut search_start = 0;

    'from: for from in 0..n {

        // Skip through things filled out of order.
        while search_start < n && perm[search_start] != UNSET {
            search_start += 1;
        }

        for to in search_start..n {
            if perm[to] != UNSET {
                continue;
            }
            if cmp.periodic_eq(lattice, &from_fracs[from], &to_fracs[to])? {
                perm[to] = from;
                continue 'from;
            }
        }
        return Ok(None);
    }

    // every 'from' was placed in a distinct 'to', so this is a bijection
    Some(Perm::from_vec(perm).expect("(BUG) invalid perm without match error!?"))
})}
