/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::hash::Hash;

// NOTE: Currently there is no "group" trait, for a couple of reasons:
//
// * Many groups will depend on some form of context, which is awkward
//   to work into a trait (but trivial to add to a closure).
// * Making the group operation as part of the type hides some
//   potentially important considerations.  A type may have multiple
//   possible choices of the group operator, and use of a homomorphism
//   requires selecting the right one.

/// Generates a finite group from a non-empty set of generators.
///
/// The generators may contain duplicates or extraneous elements.
///
/// The order of the output is arbitrary, but consistent for
/// inputs that are related by a group isomorphism.
///
/// In line with the library's predominantly row-centric design,
/// `g_fn(a, b)` should perform *`a` followed by `b`*.
pub fn generate_finite_group<G>(
    generators: &[G],
    mut g_fn: impl FnMut(&G, &G) -> G,
) -> Vec<G>
where G: Hash + Eq + Clone,
{
    use std::collections::{HashSet, VecDeque};
    assert!(!generators.is_empty(), "empty groups do not exist!");

    let mut seen = HashSet::new();
    let mut out = vec![];

    let mut queue: VecDeque<_> = generators.iter().cloned().collect();

    while let Some(g) = queue.pop_front() {
        if seen.insert(g.clone()) {
            queue.extend(generators.iter().map(|h| g_fn(&g, h)));
            out.push(g);
        }
    }
    out
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::FracRot;
    use xtal_soa_ops::Perm;

    #[test]
    fn generates_cyclic_groups() {
        // a 4-cycle generates a group of order 4
        let cycle = Perm::from_raw_inv(vec![1, 2, 3, 0]).unwrap();
        let group = generate_finite_group(&[cycle], |a, b| a.then(b));
        assert_eq!(group.len(), 4);
        assert!(group.iter().any(|g| g.is_identity()));
    }

    #[test]
    fn generates_from_redundant_generators() {
        let fourfold = FracRot::from(&[[0, -1, 0], [1, 0, 0], [0, 0, 1]]);
        let mirror = FracRot::from(&[[1, 0, 0], [0, 1, 0], [0, 0, -1]]);
        let twofold = fourfold.then(&fourfold);

        // 4/m
        let group = generate_finite_group(&[fourfold.clone(), mirror.clone(), twofold], |a, b| a.then(b));
        assert_eq!(group.len(), 8);
        assert!(group.contains(&FracRot::eye()));
        assert!(group.contains(&fourfold.then(&mirror)));
    }
}
