/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub, Neg, Mul, Div};
use std::ops::{AddAssign, SubAssign, MulAssign};

use crate::{V3, M3, M33, Ring};
use crate::methods::{vee, mat};

// Generates a binary operator impl for every combination of owned and
// borrowed operands. The body always sees both operands by reference.
macro_rules! impl_binop {
    (
        [$($gen:tt)*] $Op:ident::$op:ident($A:ty, $B:ty) -> $Out:ty
        |$a:ident, $b:ident| $body:expr
    ) => {
        impl<$($gen)*> $Op<$B> for $A {
            type Output = $Out;
            #[inline]
            fn $op(self, other: $B) -> $Out
            { let $a = &self; let $b = &other; $body }
        }

        impl<'a, $($gen)*> $Op<$B> for &'a $A {
            type Output = $Out;
            #[inline]
            fn $op(self, other: $B) -> $Out
            { let $a = self; let $b = &other; $body }
        }

        impl<'b, $($gen)*> $Op<&'b $B> for $A {
            type Output = $Out;
            #[inline]
            fn $op(self, other: &'b $B) -> $Out
            { let $a = &self; let $b = other; $body }
        }

        impl<'a, 'b, $($gen)*> $Op<&'b $B> for &'a $A {
            type Output = $Out;
            #[inline]
            fn $op(self, other: &'b $B) -> $Out
            { let $a = self; let $b = other; $body }
        }
    };
}

// ---------------------------------------------------------------------------
// vector-vector ops

impl_binop!{ [X: Ring] Add::add(V3<X>, V3<X>) -> V3<X> |a, b| vee::from_fn(|k| a[k] + b[k]) }
impl_binop!{ [X: Ring] Sub::sub(V3<X>, V3<X>) -> V3<X> |a, b| vee::from_fn(|k| a[k] - b[k]) }

impl<X: Ring> Neg for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X>
    { vee::from_fn(|k| -self[k]) }
}

impl<'a, X: Ring> Neg for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X>
    { -*self }
}

impl<X: Ring> AddAssign<V3<X>> for V3<X> {
    #[inline]
    fn add_assign(&mut self, other: V3<X>)
    { *self = *self + other; }
}

impl<'b, X: Ring> AddAssign<&'b V3<X>> for V3<X> {
    #[inline]
    fn add_assign(&mut self, other: &'b V3<X>)
    { *self = *self + other; }
}

impl<X: Ring> SubAssign<V3<X>> for V3<X> {
    #[inline]
    fn sub_assign(&mut self, other: V3<X>)
    { *self = *self - other; }
}

impl<'b, X: Ring> SubAssign<&'b V3<X>> for V3<X> {
    #[inline]
    fn sub_assign(&mut self, other: &'b V3<X>)
    { *self = *self - other; }
}

// ---------------------------------------------------------------------------
// vector-scalar ops

// NOTE: these are generated per primitive rather than being generic over
//       `X: Ring`, because a generic `Mul<X> for V3<X>` makes coherence
//       unable to tell it apart from the matrix products below.
macro_rules! impl_scalar_ops {
    ($($X:ty)*) => {$(
        impl Mul<$X> for V3<$X> {
            type Output = V3<$X>;

            #[inline]
            fn mul(self, scalar: $X) -> V3<$X>
            { vee::from_fn(|k| self[k] * scalar) }
        }

        impl<'a> Mul<$X> for &'a V3<$X> {
            type Output = V3<$X>;

            #[inline]
            fn mul(self, scalar: $X) -> V3<$X>
            { *self * scalar }
        }

        impl Mul<V3<$X>> for $X {
            type Output = V3<$X>;

            #[inline(always)]
            fn mul(self, vector: V3<$X>) -> V3<$X>
            { vector * self }
        }

        impl<'a> Mul<&'a V3<$X>> for $X {
            type Output = V3<$X>;

            #[inline(always)]
            fn mul(self, vector: &'a V3<$X>) -> V3<$X>
            { *vector * self }
        }

        impl MulAssign<$X> for V3<$X> {
            #[inline]
            fn mul_assign(&mut self, scalar: $X)
            { *self = *self * scalar; }
        }

        impl Mul<$X> for M33<$X> {
            type Output = M33<$X>;

            #[inline]
            fn mul(self, scalar: $X) -> M33<$X>
            { mat::from_fn(|r, c| self[r][c] * scalar) }
        }
    )*};
}

impl_scalar_ops!{ f64 i32 i64 }

impl Div<f64> for V3<f64> {
    type Output = V3<f64>;

    #[inline]
    fn div(self, scalar: f64) -> V3<f64>
    { vee::from_fn(|k| self[k] / scalar) }
}

// ---------------------------------------------------------------------------
// matrix ops

// row vector times matrix
impl_binop!{ [X: Ring] Mul::mul(V3<X>, M33<X>) -> V3<X> |v, m| {
    vee::from_fn(|c| v[0] * m[0][c] + v[1] * m[1][c] + v[2] * m[2][c])
}}

// matrix times column vector
impl_binop!{ [X: Ring] Mul::mul(M33<X>, V3<X>) -> V3<X> |m, v| {
    vee::from_fn(|r| crate::dot(&m[r], v))
}}

impl_binop!{ [X: Ring] Mul::mul(M33<X>, M33<X>) -> M33<X> |a, b| {
    M3([a[0] * b, a[1] * b, a[2] * b])
}}

impl_binop!{ [X: Ring] Add::add(M33<X>, M33<X>) -> M33<X> |a, b| {
    M3([a[0] + b[0], a[1] + b[1], a[2] + b[2]])
}}

impl_binop!{ [X: Ring] Sub::sub(M33<X>, M33<X>) -> M33<X> |a, b| {
    M3([a[0] - b[0], a[1] - b[1], a[2] - b[2]])
}}

impl<X: Ring> Neg for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn neg(self) -> M33<X>
    { mat::from_fn(|r, c| -self[r][c]) }
}
