/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::Neg;
use num_traits::{Num, Float};

/// Scalars with `+`, `-`, `*` and negation.
///
/// Implemented for the primitive signed integers and floats.
pub trait Ring: Copy + PartialEq + Num + Neg<Output=Self> {}

/// Rings with a well-behaved division (i.e. floats).
pub trait Field: Ring + Float {}

impl<X> Ring for X where X: Copy + PartialEq + Num + Neg<Output=X> {}
impl<X> Field for X where X: Ring + Float {}
