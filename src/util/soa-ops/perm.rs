/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

/// Represents a reordering of sites.
///
/// See the [`Permute`] trait for more information.
///
/// [`Permute`]: trait.Permute.html
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Perm {
    // image of each index; "push" form
    inv: PermVec,
}

// The "pull" form, which is easier to reason about and is what `from_vec` takes.
// Methods on Perm describe how a perm relates to its inverse; methods on
// PermVec do the actual work.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct PermVec(Vec<usize>);

impl fmt::Debug for PermVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Tried to construct an invalid permutation.")]
pub struct InvalidPermutationError(::failure::Backtrace);

impl Perm {
    pub fn eye(n: usize) -> Perm
    { Perm { inv: PermVec::eye(n) } }

    pub fn len(&self) -> usize
    { self.inv.0.len() }

    pub fn is_empty(&self) -> bool
    { self.len() == 0 }

    pub fn is_identity(&self) -> bool
    { self.inv.0.iter().enumerate().all(|(i, &x)| i == x) }

    /// Compute the `Perm` that, when applied to the input slice, would (stably) sort it.
    pub fn argsort<T: Ord>(xs: &[T]) -> Perm
    { Perm { inv: PermVec::argsort(xs).inverted() } }

    /// Construct a perm from its "pull" representation.
    ///
    /// If the `k`th element of the vector is `value`, then applying the
    /// permutation will *pull* the data at index `value` into index `k`.
    /// (like indexing with an integer array in numpy)
    pub fn from_vec(vec: Vec<usize>) -> Result<Perm, InvalidPermutationError>
    { Ok(Perm { inv: PermVec::from_vec(vec)? }.inverted()) }

    /// Construct a perm from its "push" representation.
    ///
    /// If the `k`th element of the vector is `value`, then applying the
    /// permutation will *push* the data at index `k` over to index `value`.
    /// For a symmetry operation, this is the natural form: element `k` is the
    /// index of the site that site `k` is mapped onto.
    pub fn from_raw_inv(inv: Vec<usize>) -> Result<Perm, InvalidPermutationError>
    { Ok(Perm { inv: PermVec::from_vec(inv)? }) }

    pub fn random(n: usize) -> Perm
    {
        use rand::Rng;

        let mut inv: Vec<_> = (0..n).collect();
        rand::thread_rng().shuffle(&mut inv);
        Perm { inv: PermVec(inv) }
    }

    pub fn into_vec(self) -> Vec<usize>
    { self.inverted().inv.0 }

    /// No-op destructure into the "push" representation.
    pub fn into_raw_inv(self) -> Vec<usize>
    { self.inv.0 }

    #[must_use = "not an in-place operation"]
    pub fn inverted(&self) -> Perm
    { Perm { inv: self.inv.inverted() } }

    /// Apply the permutation to an index. O(1).
    ///
    /// For the site permutation of a symmetry operation, this gives the
    /// index of the site that site `i` is carried onto.
    pub fn permute_index(&self, i: usize) -> usize
    { self.inv.0[i] }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`, and
    /// `x.permuted_by(a).permuted_by(b) == x.permuted_by(&a.then(b))`.
    pub fn then(&self, other: &Perm) -> Perm
    {
        // the inverses compose in reverse
        Perm { inv: other.inv.then(&self.inv) }
    }

    /// Conventional group operator.
    pub fn of(&self, other: &Perm) -> Perm
    { other.then(self) }
}

impl PermVec {
    fn eye(n: usize) -> PermVec
    { PermVec((0..n).collect()) }

    fn argsort<T: Ord>(xs: &[T]) -> PermVec
    {
        let mut perm: Vec<_> = (0..xs.len()).collect();
        perm.sort_by(|&a, &b| xs[a].cmp(&xs[b]));
        PermVec(perm)
    }

    fn from_vec(vec: Vec<usize>) -> Result<PermVec, InvalidPermutationError>
    {
        if !Self::validate_data(&vec) {
            return Err(InvalidPermutationError(::failure::Backtrace::new()));
        }
        Ok(PermVec(vec))
    }

    #[must_use = "doesn't assert"]
    fn validate_data(xs: &[usize]) -> bool {
        let mut vec = xs.to_vec();
        vec.sort();
        vec.into_iter().eq(0..xs.len())
    }

    fn debug_validated(self) -> PermVec {
        debug_assert!(PermVec::validate_data(&self.0));
        self
    }

    #[must_use = "not an in-place operation"]
    fn inverted(&self) -> Self
    {
        let mut inv = vec![::std::usize::MAX; self.0.len()];
        for (i, &x) in self.0.iter().enumerate() {
            inv[x] = i;
        }
        PermVec(inv).debug_validated()
    }

    // Perm that applies self then other.
    fn then(&self, other: &PermVec) -> PermVec
    {
        assert_eq!(self.0.len(), other.0.len(), "Incorrect permutation length");

        let out = other.0.iter().map(|&i| self.0[i]).collect();
        PermVec(out).debug_validated()
    }
}

/// Trait for applying a permutation operation.
///
/// # Laws
///
/// * **Identity:** `data.permuted_by(&Perm::eye(data.len())) == data`
/// * **Compatibility:**
///   `data.permuted_by(a).permuted_by(b) == data.permuted_by(&a.then(b))`
pub trait Permute: Sized {
    // The receiver gets permuted, not the argument, and not in place.
    fn permuted_by(self, perm: &Perm) -> Self;
}

impl<T> Permute for Vec<T> {
    fn permuted_by(self, perm: &Perm) -> Vec<T>
    {
        assert_eq!(self.len(), perm.len(), "Incorrect permutation length");

        let mut slots: Vec<Option<T>> = (0..self.len()).map(|_| None).collect();
        for (x, &dest) in self.into_iter().zip(&perm.inv.0) {
            slots[dest] = Some(x);
        }
        slots.into_iter()
            .map(|x| x.expect("(BUG) Perm was not a permutation!"))
            .collect()
    }
}

// `Permute` doubles as the group operator.
impl Permute for Perm {
    fn permuted_by(self, other: &Perm) -> Perm
    { self.then(other) }
}

impl<A: Permute> Permute for Option<A> {
    fn permuted_by(self, perm: &Perm) -> Option<A>
    { self.map(|x| x.permuted_by(perm)) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn inverse()
    {
        let perm = Perm::random(20);
        let inv = perm.inverted();

        assert_eq!(perm.clone().permuted_by(&inv), Perm::eye(20));
        assert_eq!(inv.permuted_by(&perm), Perm::eye(20));
    }

    #[test]
    fn inverse_is_argsort()
    {
        let perm = Perm::random(20);
        assert_eq!(
            Perm::argsort(&perm.clone().into_vec()).into_vec(),
            perm.inverted().into_vec(),
        );
    }

    #[test]
    fn invalid() {
        assert_matches!(
            Err(InvalidPermutationError(_)),
            Perm::from_vec(vec![0, 1, 3, 3]));

        assert_matches!(
            Err(InvalidPermutationError(_)),
            Perm::from_raw_inv(vec![1, 2, 3]));
    }

    #[test]
    #[should_panic(expected = "permutation length")]
    fn incompatible() {
        let _ = vec![4, 2, 1].permuted_by(&Perm::eye(2));
    }

    #[test]
    fn push_and_pull() {
        // site 0 -> 2, site 1 -> 0, site 2 -> 1
        let perm = Perm::from_raw_inv(vec![2, 0, 1]).unwrap();
        assert_eq!(perm.permute_index(0), 2);
        assert_eq!(vec!['a', 'b', 'c'].permuted_by(&perm), vec!['b', 'c', 'a']);
        assert_eq!(perm.clone().into_vec(), vec![1, 2, 0]);
        assert_eq!(Perm::from_vec(vec![1, 2, 0]).unwrap(), perm);
    }

    #[test]
    fn then_composes_index_maps() {
        let a = Perm::random(12);
        let b = Perm::random(12);
        let ab = a.then(&b);
        for i in 0..12 {
            assert_eq!(ab.permute_index(i), b.permute_index(a.permute_index(i)));
        }
        assert_eq!(ab, b.of(&a));

        let data: Vec<_> = (0..12).map(|x| x * 10).collect();
        assert_eq!(
            data.clone().permuted_by(&a).permuted_by(&b),
            data.permuted_by(&ab),
        );
    }

    #[test]
    fn associativity()
    {
        let xy = Perm::from_vec(vec![1, 0, 2]).unwrap();
        let zx = Perm::from_vec(vec![2, 1, 0]).unwrap();
        let xyzx = Perm::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(xy.clone().permuted_by(&zx), xyzx);
        assert!(Perm::eye(4).is_identity());
        assert!(!xy.is_identity());
    }
}
