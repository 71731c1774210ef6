/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

pub(crate) mod lattice;
pub(crate) mod compare;
pub(crate) mod dof;
pub(crate) mod prim;
pub(crate) mod prim_spec;
pub(crate) mod strain;
