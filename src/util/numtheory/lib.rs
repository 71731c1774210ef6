/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

extern crate num_integer;
extern crate num_traits;
use num_integer::Integer;
use num_traits::{PrimInt, Signed};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GcdData<X> {
    /// Greatest common divisor. Always non-negative.
    pub gcd: X,
    /// Bezout coefficients; `coeffs.0 * a + coeffs.1 * b == gcd`.
    pub coeffs: (X, X),
    /// Quotients of the inputs by the gcd. (zero when the gcd is zero)
    pub quotients: (X, X),
}

// Since the bezout coefficients have no impact on each other or on the gcd,
// a sufficiently smart compiler can rip their computations out entirely.
#[allow(non_snake_case)]
#[inline(always)]
fn extended_gcd__inline<X>(a: X, b: X) -> GcdData<X>
where
    X: PrimInt + Integer + Signed,
{
    let (a_sign, a) = (a.signum(), a.abs());
    let (b_sign, b) = (b.signum(), b.abs());

    // Store the two targets in one variable! Order is (old, current).
    let mut s = (X::one(),  X::zero()); // a coefficient
    let mut t = (X::zero(), X::one());  // b coefficient
    let mut r = (a, b); // gcd
    while r.1 != X::zero() {
        let (div, rem) = (r.0 / r.1, r.0 % r.1);
        r = (r.1, rem);
        s = (s.1, s.0 - div * s.1);
        t = (t.1, t.0 - div * t.1);
    }

    GcdData {
        gcd: r.0,
        coeffs: (a_sign * s.0, b_sign * t.0),
        quotients: (a_sign * t.1.abs(), b_sign * s.1.abs()),
    }
}

/// Compute a greatest common divisor along with Bezout coefficients.
///
/// When both inputs are zero, the gcd and both coefficients are zero.
pub fn extended_gcd<X>(a: X, b: X) -> GcdData<X>
where
    X: PrimInt + Integer + Signed,
{ extended_gcd__inline(a, b) }

/// Compute a greatest common divisor.
pub fn gcd<X>(a: X, b: X) -> X
where
    X: PrimInt + Integer + Signed,
{ extended_gcd__inline(a, b).gcd }

/// Compute a (non-negative) least common multiple.
pub fn lcm<X>(a: X, b: X) -> X
where
    X: PrimInt + Integer + Signed,
{
    let g = gcd(a, b);
    if g == X::zero() { X::zero() } else { (a / g * b).abs() }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn bezout() {
        for &(a, b) in &[(12i64, 18), (-12, 18), (7, -3), (0, 5), (5, 0), (1, 1), (-4, -6)] {
            let GcdData { gcd, coeffs: (s, t), quotients: (qa, qb) } = extended_gcd(a, b);
            assert_eq!(s * a + t * b, gcd, "{} {}", a, b);
            assert!(gcd >= 0);
            assert_eq!(qa * gcd, a, "{} {}", a, b);
            assert_eq!(qb * gcd, b, "{} {}", a, b);
        }
    }

    #[test]
    fn zeros() {
        assert_eq!(gcd(0i32, 0), 0);
        assert_eq!(lcm(0i32, 4), 0);
        assert_eq!(lcm(4i32, -6), 12);
    }
}
