/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use]
extern crate failure;
#[cfg_attr(test, macro_use)]
extern crate ndarray;
extern crate num_integer;
#[cfg(test)]
extern crate rand;
#[cfg(test)]
#[macro_use]
extern crate xtal_assert_close;
extern crate xtal_array_types;
extern crate xtal_numtheory;

pub use crate::hnf::{Hnf, hnf_of_generators};
mod hnf;

pub use crate::subspace::{orthonormal_basis, projector, rank, span_distance};
mod subspace;

pub use crate::symmetric::{symmetric_eigen, symmetric_apply, pseudo_inverse};
mod symmetric;

#[derive(Debug, Fail)]
#[fail(display = "matrix was perfectly degenerate")]
pub struct DegenerateMatrixError;
