/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Niggli reduction of lattices.
//!
//! Citations:
//!
//! * B. Gruber, "The Relationship between Reduced Cells
//!   in a General Bravais lattice." Acta Crystallographica
//!   Section A 29 (1973): 433-440.
//!
//! * Grosse-Kunstleve, Ralf W., Nicholas K. Sauter,
//!   and Paul D. Adams. "Numerically stable algorithms
//!   for the computation of reduced unit cells."
//!   Acta Crystallographica Section A: Foundations of
//!   Crystallography 60.1 (2004): 1-6.

use crate::Lattice;
use crate::util::Tol;

use xtal_array_types::{M33, dot, mat, inv};

use std::cmp::Ordering;

/// Comparisons of squared lengths and dot products.
#[derive(Debug, Copy, Clone)]
struct Fuzz {
    tol: f64,
}

impl Fuzz {
    /// `tol` is a length; the quantities compared here are areas.
    pub fn new(tol: f64, volume: f64) -> Fuzz
    { Fuzz { tol: tol * volume.abs().cbrt() } }

    pub fn lt(&self, x: f64, y: f64) -> bool
    { x < y - self.tol }
    pub fn gt(&self, x: f64, y: f64) -> bool
    { self.lt(y, x) }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn le(&self, x: f64, y: f64) -> bool
    { ! self.gt(x, y) }
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn ge(&self, x: f64, y: f64) -> bool
    { ! self.lt(x, y) }

    pub fn eq(&self, x: f64, y: f64) -> bool
    { ! self.lt(x, y) && ! self.gt(x, y) }

    pub fn cmp(&self, x: f64, y: f64) -> Ordering
    {
        if self.lt(x, y) { Ordering::Less }
        else if self.gt(x, y) { Ordering::Greater }
        else { Ordering::Equal }
    }
}

pub use self::unimodular::Unimodular;
use self::unimodular::UnimodularState;
mod unimodular {
    use super::*;

    /// An integer matrix of determinant `+1`, along with its inverse.
    #[derive(Debug, Clone)]
    pub struct Unimodular {
        matrix: M33<i32>,
        inverse: M33<i32>,
    }

    impl Unimodular {
        #[inline] pub fn matrix(&self) -> &M33<i32> { &self.matrix }
        #[inline] pub fn inverse_matrix(&self) -> &M33<i32> { &self.inverse }
    }

    // easier to update
    #[derive(Debug, Clone)]
    pub(super) struct UnimodularState(pub(super) M33<i32>);

    impl UnimodularState {
        pub fn eye() -> Self
        { UnimodularState(mat::from_array([[1,0,0], [0,1,0], [0,0,1]])) }

        // steps N1, N2
        /// Swap two rows.
        #[inline]
        pub fn row_swap(&mut self, j: usize, k: usize)
        {
            // NOTE: Can't mem::swap because of simultaneous indexing
            let ghost = self.0;
            self.0[j] = ghost[k];
            self.0[k] = ghost[j];
        }

        // steps B2-B5
        /// Add a multiple of one lattice vector to a different one.
        #[inline]
        pub fn row_axpy(&mut self, to: usize, mul: i32, from: usize)
        {
            assert_ne!(from, to, "adding a row to itself is not a unimodular operation");
            let from_row = self.0[from];
            self.0[to] += from_row * mul;
        }

        // steps N3
        /// Negate a lattice vector.
        #[inline]
        pub fn row_negate(&mut self, row: usize)
        { self.0[row] *= -1; }

        pub fn finish(&self) -> Unimodular
        {
            // FIXME it feels cleaner to compute the inverse alongside
            //       the matrix rather than to do a float inversion at the end
            let floats_inv = inv(&self.0.map(f64::from));
            let inverse = Tol(1e-6).unfloat_m33(&floats_inv).expect("(BUG) unimodular inverse not integral!");

            Unimodular { matrix: self.0, inverse }
        }
    }
}

// a small inner module to let privacy assist in
//  protecting some invariants
use self::state::State;
mod state {
    use super::*;

    #[derive(Debug, Clone)]
    pub(super) struct State {
        // constant state
        original: Lattice,
        fuzz: Fuzz,

        // mutatable state
        unimodular: UnimodularState,

        // precomputed data
        // (invariant: these are always updated alongside unimodular)
        lattice: M33,
        abc: [f64; 3],
        xyz: [f64; 3],
    }

    impl State {
        pub fn new(lattice: &Lattice, tol: f64) -> Self
        { Self::from_matrices(lattice, &UnimodularState::eye(), Fuzz::new(tol, lattice.volume())) }

        pub(super) fn from_matrices(original: &Lattice, unimodular: &UnimodularState, fuzz: Fuzz) -> Self
        {
            let original = original.clone();
            let unimodular = unimodular.clone();

            let unimodular_float = unimodular.0.map(f64::from);
            let lattice = &unimodular_float * original.matrix();

            let sq = |k: usize| dot(&lattice[k], &lattice[k]);
            let off = |k: usize| 2.0 * dot(&lattice[(k + 1) % 3], &lattice[(k + 2) % 3]);
            let abc = [sq(0), sq(1), sq(2)];
            let xyz = [off(0), off(1), off(2)];
            State { original, unimodular, lattice, abc, xyz, fuzz }
        }

        pub fn unimodular_matrix(&self) -> &M33<i32> { &self.unimodular.0 }
        pub fn fuzz(&self) -> Fuzz { self.fuzz }
        pub fn abc(&self) -> &[f64; 3] { &self.abc }
        pub fn xyz(&self) -> &[f64; 3] { &self.xyz }
        // (only the reduced cell conditions use these)
        #[cfg_attr(not(test), allow(dead_code))]
        pub fn a(&self) -> f64 { self.abc()[0] }
        #[cfg_attr(not(test), allow(dead_code))]
        pub fn b(&self) -> f64 { self.abc()[1] }
        #[cfg_attr(not(test), allow(dead_code))]
        pub fn x(&self) -> f64 { self.xyz()[0] }
        #[cfg_attr(not(test), allow(dead_code))]
        pub fn y(&self) -> f64 { self.xyz()[1] }
        #[cfg_attr(not(test), allow(dead_code))]
        pub fn z(&self) -> f64 { self.xyz()[2] }

        pub fn change_basis<F>(&mut self, f: F)
        where F: FnOnce(&mut UnimodularState)
        {
            // change basis
            f(&mut self.unimodular);

            // update precomputed data
            *self = Self::from_matrices(&self.original, &self.unimodular, self.fuzz);
        }

        pub fn finish(self) -> LatticeReduction
        { LatticeReduction {
            original: self.original,
            transform: self.unimodular.finish(),
            reduced: Lattice::new_unchecked(&self.lattice),
        }}
    }
}


// Algorithm N of B. Gruber (1973),
// with interpretations from R. W. Grosse-Kunstleve (2004)
fn normalize_characteristic(state: &mut State)
{
    let fuzz = state.fuzz();

    //------------
    // Steps N1-N2.
    // These look like some kind of bubble sort.

    loop {
        let mut maybe_swap = |j: usize, k: usize| {
            let abc = *state.abc();
            let xyz = *state.xyz();

            // (note: this matches the Algol 60 in the footnote on page 433.
            //        Like modern languages, Algol gave higher precedence to AND.)
            let do_it = false
                || fuzz.gt(abc[j], abc[k])
                || fuzz.eq(abc[j], abc[k]) && fuzz.gt(xyz[j].abs(), xyz[k].abs());

            if do_it {
                state.change_basis(|u| u.row_swap(j, k));
            }
            do_it
        };

        // Step N1
        maybe_swap(0, 1);

        // Step N2
        if maybe_swap(1, 2) { continue; }
        else { break; }
    }

    //------------
    // Step N3
    // Make all offdiagonals the same sign (if they are all nonzero). (?)

    // This is cribbed from the 'cctbx/uctbx' python code
    //  (which is associated with Grosse-Kunstleve (2004))

    let xyz = *state.xyz();
    match fuzz.cmp(xyz[0] * xyz[1] * xyz[2], 0.0) {
        Ordering::Equal => {},

        Ordering::Less => {
            state.change_basis(|u| {
                for k in 0..3 {
                    if fuzz.lt(xyz[k], 0.0) {
                        u.row_negate(k);
                    }
                }
            });
        },

        Ordering::Greater => {

            // Grosse-Kunstleve (2004) appears to contain a typo
            // (using ζ instead of ξ when working
            //   with 'i' in formula (8)).
            //
            // The following reflects the python code
            //   at cctbx/uctbx/reduction_base.py
            state.change_basis(|u| {

                let mut flips = 0;
                let mut flip_me = None;
                for k in 0..3 {
                    match fuzz.cmp(xyz[k], 0.0) {
                        Ordering::Greater => {
                            u.row_negate(k);
                            flips += 1;
                        },
                        Ordering::Equal => {
                            flip_me = Some(k);
                        },
                        Ordering::Less => {},
                    }
                }

                if flips % 2 == 0 {
                    let flip_me = flip_me.expect("(BUG) flip_me without zeros?");
                    u.row_negate(flip_me);
                }
            })
        },
    };
}

/// A pairing of a lattice matrix with its reduced form,
/// along with the integer coefficient matrices that convert
/// between the two.
///
/// `reduced = transform * original` (rows).
#[derive(Debug, Clone)]
pub struct LatticeReduction {
    original: Lattice,
    transform: Unimodular,
    reduced: Lattice,
}

impl LatticeReduction {
    #[inline] pub fn original(&self) -> &Lattice { &self.original }
    #[inline] pub fn reduced(&self) -> &Lattice { &self.reduced }
    #[inline] pub fn transform(&self) -> &Unimodular { &self.transform }
}

/// Niggli-reduce a lattice. (Algorithm B of Grosse-Kunstleve et al.)
///
/// `tol` is a cartesian length; it is scaled by the cube root of the
/// volume when comparing the (squared-length) cell parameters.
/// The unimodular transform always has determinant `+1`, so the
/// handedness of the lattice is preserved.
pub fn niggli_reduce(lattice: &Lattice, tol: f64) -> LatticeReduction
{
    let mut state = State::new(lattice, tol);
    let fuzz = state.fuzz();

    'lets_try_that_again:
    loop {
        // B1
        normalize_characteristic(&mut state);

        // B2-B4.
        // I wouldn't bother trying to refactor these.
        let (a, b, _c) = tup3(state.abc());
        let (x, y, z) = tup3(state.xyz());

        // B2
        let do_it = fuzz.gt(x.abs(), b)
            || fuzz.eq(x,  b) && fuzz.gt(z, 2.0 * y)
            || fuzz.eq(x, -b) && fuzz.lt(z, 0.0);

        if do_it {
            state.change_basis(|u| {
                u.row_axpy(2, step((x + b) / (2.0 * b), x), 1);
            });
            continue 'lets_try_that_again;
        }

        // B3
        let do_it = fuzz.gt(y.abs(), a)
            || fuzz.eq(y,  a) && fuzz.gt(z, 2.0 * x)
            || fuzz.eq(y, -a) && fuzz.lt(z, 0.0);

        if do_it {
            state.change_basis(|u| {
                u.row_axpy(2, step((y + a) / (2.0 * a), y), 0);
            });
            continue 'lets_try_that_again;
        }

        // B4
        let do_it = fuzz.gt(z.abs(), a)
            || fuzz.eq(z,  a) && fuzz.gt(y, 2.0 * x)
            || fuzz.eq(z, -a) && fuzz.lt(y, 0.0);

        if do_it {
            state.change_basis(|u| {
                u.row_axpy(1, step((z + a) / (2.0 * a), z), 0);
            });
            continue 'lets_try_that_again;
        }

        // B5
        let xyzab = x + y + z + a + b;
        let aayyz = 2.0 * (a + y) + z;
        let do_it = fuzz.lt(xyzab, 0.0)
            || fuzz.eq(xyzab, 0.0) && fuzz.gt(aayyz, 0.0);

        if do_it {
            state.change_basis(|u| {
                // c += n (a + b), with n chosen to minimize |c|
                let mul = (-(xyzab / (2.0 * (a + b + z))).floor()).max(1.0) as i32;
                u.row_axpy(2, mul, 0);
                u.row_axpy(2, mul, 1);
            });
            continue 'lets_try_that_again;
        }

        break;
    }

    // Grosse-Kunstleve (2004) kept determinant positive by negating
    //  some matrices to fix the signs, which works since the dimension
    //  of 3 is odd. We'll just negate the final result instead.
    match state.unimodular_matrix().det() {
        1 => {},
        -1 => {
            state.change_basis(|u| {
                u.row_negate(0);
                u.row_negate(1);
                u.row_negate(2);
            })
        },
        d => panic!("(BUG) Bad unimodular determinant: {}", d),
    }

    state.finish()
}

// Multiple of a shorter vector to add to a longer one in steps B2-B4.
//
// When the off-diagonal is only fuzzily equal to the boundary, the exact
// quotient can land on the wrong side of an integer; we still need to move.
fn step(ratio: f64, off_diag: f64) -> i32
{
    let mul = -ratio.floor();
    if mul != 0.0 { mul as i32 }
    else if off_diag > 0.0 { -1 }
    else { 1 }
}



//--------------------

fn tup3<T:Copy>(x: &[T; 3]) -> (T, T, T)
{ (x[0], x[1], x[2]) }
