/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

pub(crate) mod reduction;
pub(crate) mod point_group;
pub(crate) mod factor_group;
pub(crate) mod primitive;
pub(crate) mod canonical;
pub(crate) mod orbits;
pub(crate) mod supercell;

// these are tested but not yet part of public APIs
#[cfg_attr(not(test), allow(unused))]
pub(crate) mod group;
