/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Lattice;
use crate::errors::{ToleranceViolationError, InvalidToleranceError};
use crate::util::reduce_half_open;

use std::cmp::Ordering;

use xtal_array_types::V3;

pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// What to do when a comparison lands in the ambiguous window `(tol, 2 tol)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AmbiguityPolicy {
    /// Log a warning and treat the values as unequal.
    Warn,
    /// Fail with a `ToleranceViolationError`.
    Error,
}

/// Whether the order of a site's allowed occupants matters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OccupantOrder {
    Sensitive,
    Insensitive,
}

impl Default for AmbiguityPolicy {
    fn default() -> Self { AmbiguityPolicy::Warn }
}

impl Default for OccupantOrder {
    fn default() -> Self { OccupantOrder::Insensitive }
}

/// How to evaluate independent symmetry candidates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Threading {
    /// Independent candidates are checked in parallel with rayon.
    Rayon,
    /// Everything runs on the calling thread.
    Serial,
}

impl Default for Threading {
    fn default() -> Self { Threading::Rayon }
}

/// The single tolerance and the policies that every comparison in this
/// crate is made with.
///
/// All distances are cartesian.  One `Comparator` should be used for an
/// entire computation so that group membership decisions are consistent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Comparator {
    pub tol: f64,
    pub ambiguity: AmbiguityPolicy,
    pub occupant_order: OccupantOrder,
    pub threading: Threading,
}

impl Default for Comparator {
    fn default() -> Self
    { Comparator::new(DEFAULT_TOLERANCE) }
}

impl Comparator {
    /// # Panics
    ///
    /// Panics if `tol` is not a positive finite number.
    /// See `try_new` for a fallible version.
    pub fn new(tol: f64) -> Self
    {
        match Comparator::try_new(tol) {
            Ok(cmp) => cmp,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(tol: f64) -> Result<Self, InvalidToleranceError>
    {
        if !(tol.is_finite() && tol > 0.0) {
            return Err(InvalidToleranceError::new(tol));
        }
        Ok(Comparator {
            tol,
            ambiguity: Default::default(),
            occupant_order: Default::default(),
            threading: Default::default(),
        })
    }

    pub fn ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self
    { self.ambiguity = ambiguity; self }

    pub fn occupant_order(mut self, occupant_order: OccupantOrder) -> Self
    { self.occupant_order = occupant_order; self }

    pub fn threading(mut self, threading: Threading) -> Self
    { self.threading = threading; self }

    /// Decide whether a non-negative distance counts as "equal".
    pub fn is_negligible(&self, distance: f64) -> Result<bool, ToleranceViolationError>
    {
        if distance <= self.tol {
            return Ok(true);
        }
        if distance < 2.0 * self.tol {
            match self.ambiguity {
                AmbiguityPolicy::Warn => {
                    warn!(
                        "Ambiguous comparison: distance {:e} is within a factor of 2 of \
                         the tolerance {:e}.  Treating it as unequal.",
                        distance, self.tol,
                    );
                },
                AmbiguityPolicy::Error => {
                    return Err(ToleranceViolationError::new(distance, self.tol));
                },
            }
        }
        Ok(false)
    }

    /// Cartesian displacement from `a` to the nearest image of `b`.
    ///
    /// The fractional difference is reduced component-wise into `(-0.5, 0.5]`.
    pub fn min_periodic_displacement(&self, lattice: &Lattice, frac_a: &V3, frac_b: &V3) -> V3
    {
        let diff = (frac_b - frac_a).map(reduce_half_open);
        diff * lattice
    }

    /// Test two fractional positions for equality modulo the lattice.
    pub fn periodic_eq(&self, lattice: &Lattice, frac_a: &V3, frac_b: &V3) -> Result<bool, ToleranceViolationError>
    { self.is_negligible(self.min_periodic_displacement(lattice, frac_a, frac_b).norm()) }

    /// Test two cartesian vectors for equality.
    pub fn vec_eq(&self, a: &V3, b: &V3) -> Result<bool, ToleranceViolationError>
    { self.is_negligible((a - b).norm()) }

    /// Test two equal-length lists of values for equality, as a vector.
    pub fn values_eq(&self, a: &[f64], b: &[f64]) -> Result<bool, ToleranceViolationError>
    {
        if a.len() != b.len() {
            return Ok(false);
        }
        let sqdist: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
        self.is_negligible(sqdist.sqrt())
    }

    /// Wrap a fractional position into `[0, 1)`.
    ///
    /// Components that end up within `tol` (cartesian, along that lattice
    /// vector) of `1` are snapped to `0`.
    pub fn fractional_within(&self, lattice: &Lattice, frac: &V3) -> V3
    {
        let norms = lattice.norms();
        let mut out = frac.map(|x| x - x.floor());
        for k in 0..3 {
            if (1.0 - out[k]) * norms[k] <= self.tol {
                out[k] = 0.0;
            }
        }
        out
    }

    /// Three-way comparison of scalars, treating values within `tol` as equal.
    pub fn fuzzy_cmp(&self, a: f64, b: f64) -> Ordering
    {
        if a < b - self.tol { Ordering::Less }
        else if a > b + self.tol { Ordering::Greater }
        else { Ordering::Equal }
    }

    /// Lexicographic `fuzzy_cmp`.
    pub fn fuzzy_cmp_slices(&self, a: &[f64], b: &[f64]) -> Ordering
    {
        for (&x, &y) in a.iter().zip(b) {
            match self.fuzzy_cmp(x, y) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        a.len().cmp(&b.len())
    }
}
