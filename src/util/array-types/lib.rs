/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Small fixed-size linear algebra types.
//!
//! Everything here is row-centric: a `M33` is three row vectors, and the
//! natural product for transforming data is `v * m` (a row vector on the left).

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub use self::types::{V3, M3, M33};
mod types;

pub use self::traits::{Ring, Field};
mod traits;

mod ops;

pub use self::methods::{vee, mat, dot, inv};
mod methods;
