/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Symmetry analysis of decorated periodic crystals.
//!
//! The central types are [`Lattice`], [`Prim`] (a lattice with a basis of
//! sites, each with allowed occupants and continuous degrees of freedom),
//! [`SymOp`], and [`Comparator`], which carries the single tolerance that
//! every comparison in a computation is made with.
//!
//! [`Lattice`]: struct.Lattice.html
//! [`Prim`]: struct.Prim.html
//! [`SymOp`]: struct.SymOp.html
//! [`Comparator`]: struct.Comparator.html

extern crate xtal_array_types;
extern crate xtal_soa_ops;
extern crate xtal_linalg;
#[macro_use] extern crate xtal_assert_close;

extern crate ndarray;
extern crate petgraph;
extern crate rayon;
#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[macro_use] extern crate failure;
#[macro_use] extern crate lazy_static;
#[cfg(feature = "serde")]
#[macro_use] extern crate serde;
#[cfg(test)] extern crate rand;
#[cfg(all(test, feature = "serde"))] extern crate serde_json;

#[macro_use]
mod errors;

mod core;
mod algo;
mod oper;
mod util;

//---------------------------
// public reexports; API

pub use crate::errors::{Error, Result};
pub use crate::errors::{
    DegenerateLatticeError,
    NonIntegerTransformationError,
    InconsistentBasisError,
    ReductionError,
    ToleranceViolationError,
    UnknownDoFTypeError,
    InvalidToleranceError,
    InvalidStrainError,
};

pub use crate::core::lattice::{Lattice, make_transformation_matrix_to_super};
pub use crate::core::compare::{Comparator, AmbiguityPolicy, OccupantOrder, Threading, DEFAULT_TOLERANCE};
pub use crate::core::dof::{DoFType, DoFSetBasis, Representation, dof_type, dof_types, make_equivalent_property_values};
pub use crate::core::strain::{StrainMetric, StrainConverter, make_symmetry_adapted_strain_basis};
pub use crate::core::prim::{Occupant, Site, Prim, PrimBuilder};
pub use crate::core::prim_spec::{PrimSpec, SiteSpec, DoFSpec, OccupantSpec, CoordinateMode};

pub use crate::oper::symmops::{SymOp, FracRot};
pub use crate::oper::sym_info::{SymInfo, SymOpKind};

pub use crate::algo::reduction::{niggli_reduce, LatticeReduction, Unimodular};
pub use crate::algo::point_group::{enumerate_point_group, lattice_point_group, MAX_POINT_GROUP_SIZE};
pub use crate::algo::factor_group::{
    FactorGroup,
    SiteMap,
    check_symmetry,
    compute_factor_group,
    make_crystal_point_group,
};
pub use crate::algo::primitive::{find_lattice_translations, make_primitive};
pub use crate::algo::canonical::{make_canonical_lattice, make_canonical_prim, is_same_crystal};
pub use crate::algo::orbits::asymmetric_unit_indices;
pub use crate::algo::supercell::make_superstructure;
