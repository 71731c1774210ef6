/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Comparator, Prim};
use crate::algo::factor_group::{compute_factor_group, SiteMap};
use crate::errors::ToleranceViolationError;

use petgraph::unionfind::UnionFind;

use std::collections::BTreeMap;

/// Partition the sites of a prim into orbits under its factor group.
///
/// Each orbit lists its members in ascending order, and the orbits are
/// sorted by their smallest member.
pub fn asymmetric_unit_indices(prim: &Prim, cmp: &Comparator) -> Result<Vec<Vec<usize>>, ToleranceViolationError>
{
    let factor_group = compute_factor_group(prim, cmp)?;
    Ok(orbits_from_site_maps(prim.num_sites(), factor_group.site_maps()))
}

pub(crate) fn orbits_from_site_maps(num_sites: usize, site_maps: &[SiteMap]) -> Vec<Vec<usize>>
{
    let mut sets = UnionFind::new(num_sites);
    for site_map in site_maps {
        for i in 0..num_sites {
            sets.union(i, site_map.site_perm.permute_index(i));
        }
    }

    // sites are visited in order, so both the orbits and their members
    // come out sorted
    let mut orbits: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut first_of_root: BTreeMap<usize, usize> = BTreeMap::new();
    for i in 0..num_sites {
        let first = *first_of_root.entry(sets.find(i)).or_insert(i);
        orbits.entry(first).or_insert_with(Vec::new).push(i);
    }
    orbits.into_iter().map(|(_, members)| members).collect()
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::Lattice;
    use xtal_array_types::V3;
    use xtal_soa_ops::Perm;

    #[test]
    fn union_of_cycles() {
        let maps = vec![
            SiteMap { site_perm: Perm::from_raw_inv(vec![0, 3, 2, 1, 4]).unwrap(), occupant_perms: vec![] },
            SiteMap { site_perm: Perm::from_raw_inv(vec![4, 1, 2, 3, 0]).unwrap(), occupant_perms: vec![] },
        ];
        assert_eq!(orbits_from_site_maps(5, &maps), vec![vec![0, 4], vec![1, 3], vec![2]]);
        assert_eq!(orbits_from_site_maps(0, &[]), Vec::<Vec<usize>>::new());
    }

    #[test]
    fn perovskite() {
        let cmp = Comparator::default();
        let prim = Prim::builder(Lattice::cubic(3.9))
            .site(V3([0.5, 0.5, 0.0]), &["O"])
            .site(V3([0.0, 0.0, 0.0]), &["Sr"])
            .site(V3([0.5, 0.0, 0.5]), &["O"])
            .site(V3([0.5, 0.5, 0.5]), &["Ti"])
            .site(V3([0.0, 0.5, 0.5]), &["O"])
            .build().unwrap();
        assert_eq!(asymmetric_unit_indices(&prim, &cmp).unwrap(), vec![vec![0, 2, 4], vec![1], vec![3]]);
    }
}
