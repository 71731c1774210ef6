/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::errors::NonIntegerTransformationError;

use xtal_array_types::{V3, M33};

// these f64 -> integer conversions are written on a silly little type
// simply to avoid having a function with a signature like 'fn f(x: f64, tol: f64)'
// where the arguments could be swapped
pub(crate) struct Tol(pub(crate) f64);

impl Tol {
    pub(crate) fn unfloat(&self, x: f64) -> Result<i32, NonIntegerTransformationError>
    {Ok({
        let r = x.round();
        if !((r - x).abs() <= self.0) {
            return Err(NonIntegerTransformationError::new(x));
        }
        r as i32
    })}

    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn unfloat_v3(&self, v: &V3) -> Result<V3<i32>, NonIntegerTransformationError>
    { v.try_map(|x| self.unfloat(x)) }

    pub(crate) fn unfloat_m33(&self, m: &M33) -> Result<M33<i32>, NonIntegerTransformationError>
    { m.try_map(|x| self.unfloat(x)) }
}

pub(crate) fn float_m33(m: &M33<i32>) -> M33
{ m.map(f64::from) }

pub(crate) fn i64_m33(m: &M33<i32>) -> M33<i64>
{ m.map(i64::from) }

/// Reduce a value into `(-0.5, 0.5]`.
#[inline]
pub(crate) fn reduce_half_open(x: f64) -> f64
{ x - (x - 0.5).ceil() }

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn unfloat() {
        assert_eq!(Tol(1e-5).unfloat(2.000001).unwrap(), 2);
        assert_eq!(Tol(1e-5).unfloat(-3.0).unwrap(), -3);
        assert!(Tol(1e-5).unfloat(2.1).is_err());
        assert!(Tol(1e-5).unfloat(::std::f64::NAN).is_err());
    }

    #[test]
    fn half_open() {
        assert_eq!(reduce_half_open(0.5), 0.5);
        assert_eq!(reduce_half_open(-0.5), 0.5);
        assert_eq!(reduce_half_open(0.75), -0.25);
        assert_eq!(reduce_half_open(2.0), 0.0);
        assert_eq!(reduce_half_open(-1.25), -0.25);
    }
}
