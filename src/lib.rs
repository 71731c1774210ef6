/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Entry points for crystal symmetry computations.
//!
//! Every function comes in two forms: one taking a bare tolerance, and a
//! `_with` form taking full [`Settings`].  All of the real work is done by
//! `xtal_structure`; this crate owns the glue between settings documents,
//! logging, and the structure types.
//!
//! [`Settings`]: struct.Settings.html

extern crate xtal_structure;
extern crate xtal_config;
extern crate xtal_array_types;

#[macro_use] extern crate log;
extern crate fern;
extern crate ansi_term;
extern crate failure;

pub mod logging;

pub use xtal_structure::{
    Lattice, Prim, PrimBuilder, Site, Occupant, SymOp, FracRot, SymInfo, SymOpKind,
    DoFSetBasis, DoFType, Representation, Comparator, FactorGroup, SiteMap,
    StrainMetric, StrainConverter, make_symmetry_adapted_strain_basis,
    PrimSpec, SiteSpec, DoFSpec, OccupantSpec, CoordinateMode,
    Error, Result,
};
pub use xtal_config::{Settings, YamlRead};

/// Settings types, for building `Settings` in code.
pub mod config {
    pub use xtal_config::{Settings, AmbiguityPolicy, OccupantOrder, Threading, DEFAULT_TOLERANCE};
}

use xtal_array_types::{M33, mat};

use std::path::Path;

/// The comparator that carries `settings` into a computation.
///
/// Fails if the settings do not validate.
pub fn comparator(settings: &Settings) -> ::std::result::Result<Comparator, failure::Error>
{
    let settings = settings.clone().validate()?;
    Ok({
        Comparator::new(settings.tolerance)
            .ambiguity(settings.ambiguity)
            .occupant_order(settings.occupant_order)
            .threading(settings.threading)
    })
}

fn tol_comparator(tol: f64) -> Result<Comparator>
{ Ok(Comparator::try_new(tol)?) }

/// Read settings from a YAML file.  Unknown keys are logged and ignored.
pub fn load_settings(path: impl AsRef<Path>) -> ::std::result::Result<Settings, failure::Error>
{
    let file = ::std::fs::File::open(path.as_ref())?;
    let settings = Settings::from_reader(file)?.validate()?;
    debug!("Loaded settings from {}", path.as_ref().display());
    Ok(settings)
}

/// Read a prim document (YAML, or JSON since it is a subset) from a file.
pub fn load_prim(path: impl AsRef<Path>, settings: &Settings) -> ::std::result::Result<Prim, failure::Error>
{
    let file = ::std::fs::File::open(path.as_ref())?;
    let spec = PrimSpec::from_reader(file)?;
    let prim = spec.build(comparator(settings)?.tol)?;
    debug!("Loaded a prim of {} sites from {}", prim.num_sites(), path.as_ref().display());
    Ok(prim)
}

//---------------------------
// symmetry

/// The point group of a lattice, as cartesian operations with no translation.
///
/// The identity comes first.
pub fn enumerate_point_group(lattice: &Lattice, tol: f64) -> Result<Vec<SymOp>>
{ enumerate_point_group_impl(lattice, &tol_comparator(tol)?) }

pub fn enumerate_point_group_with(lattice: &Lattice, settings: &Settings) -> ::std::result::Result<Vec<SymOp>, failure::Error>
{ Ok(enumerate_point_group_impl(lattice, &comparator(settings)?)?) }

fn enumerate_point_group_impl(lattice: &Lattice, cmp: &Comparator) -> Result<Vec<SymOp>>
{ Ok(xtal_structure::enumerate_point_group(lattice, cmp)?) }

/// The factor group of a prim: every operation of its lattice's point group,
/// combined with a translation (and time reversal where applicable), that
/// maps the decorated crystal onto itself.
pub fn compute_factor_group(prim: &Prim, tol: f64) -> Result<Vec<SymOp>>
{ Ok(xtal_structure::compute_factor_group(prim, &tol_comparator(tol)?)?.into_ops()) }

pub fn compute_factor_group_with(prim: &Prim, settings: &Settings) -> ::std::result::Result<FactorGroup, failure::Error>
{ Ok(xtal_structure::compute_factor_group(prim, &comparator(settings)?)?) }

/// The distinct linear parts (with time reversal) of a factor group.
pub fn make_crystal_point_group(factor_group: &[SymOp], tol: f64) -> Result<Vec<SymOp>>
{ Ok(xtal_structure::make_crystal_point_group(factor_group, &tol_comparator(tol)?)?) }

/// Apply an operation to a prim, producing a new prim.
pub fn apply(op: &SymOp, prim: &Prim, tol: f64) -> Result<Prim>
{ Ok(prim.apply(op, &tol_comparator(tol)?)?) }

/// Classify an operation within the lattice it acts on.
pub fn sym_info(op: &SymOp, lattice: &Lattice, tol: f64) -> Result<SymInfo>
{ Ok(SymInfo::new(op, lattice, &tol_comparator(tol)?)?) }

/// The distinct images of a DoF value under a point group, in the axes of `dof`.
pub fn make_equivalent_property_values(point_group: &[SymOp], value: &[f64], dof: &DoFSetBasis, tol: f64) -> Result<Vec<Vec<f64>>>
{ xtal_structure::make_equivalent_property_values(point_group, value, dof, &tol_comparator(tol)?) }

//---------------------------
// cells

/// The smallest cell describing the same decorated crystal.
pub fn make_primitive(prim: &Prim, tol: f64) -> Result<Prim>
{ xtal_structure::make_primitive(prim, &tol_comparator(tol)?) }

pub fn make_primitive_with(prim: &Prim, settings: &Settings) -> ::std::result::Result<Prim, failure::Error>
{ Ok(xtal_structure::make_primitive(prim, &comparator(settings)?)?) }

/// Tile a prim into the superlattice whose column vectors are `L T`.
pub fn make_superstructure(transformation: &[[i32; 3]; 3], prim: &Prim, tol: f64) -> Result<Prim>
{
    let transformation: M33 = mat::from_array(*transformation).map(f64::from);
    xtal_structure::make_superstructure(prim, &transformation, &tol_comparator(tol)?)
}

/// Partition the sites of a prim into symmetry orbits.
///
/// Orbits are sorted by their smallest member, and list members in
/// ascending order.
pub fn asymmetric_unit_indices(prim: &Prim, tol: f64) -> Result<Vec<Vec<usize>>>
{ Ok(xtal_structure::asymmetric_unit_indices(prim, &tol_comparator(tol)?)?) }

pub fn asymmetric_unit_indices_with(prim: &Prim, settings: &Settings) -> ::std::result::Result<Vec<Vec<usize>>, failure::Error>
{ Ok(xtal_structure::asymmetric_unit_indices(prim, &comparator(settings)?)?) }

//---------------------------
// canonical forms

/// Types with a canonical representative.
///
/// Equivalent descriptions of the same object canonicalize to values that
/// compare equal within tolerance, and canonicalization is idempotent.
pub trait Canonicalize: Sized {
    fn make_canonical(&self, cmp: &Comparator) -> Result<Self>;
}

impl Canonicalize for Lattice {
    fn make_canonical(&self, cmp: &Comparator) -> Result<Lattice>
    { Ok(xtal_structure::make_canonical_lattice(self, cmp)?) }
}

impl Canonicalize for Prim {
    fn make_canonical(&self, cmp: &Comparator) -> Result<Prim>
    { Ok(xtal_structure::make_canonical_prim(self, cmp)?) }
}

pub fn make_canonical<T: Canonicalize>(value: &T, tol: f64) -> Result<T>
{ value.make_canonical(&tol_comparator(tol)?) }

pub fn make_canonical_with<T: Canonicalize>(value: &T, settings: &Settings) -> ::std::result::Result<T, failure::Error>
{ Ok(value.make_canonical(&comparator(settings)?)?) }

/// Whether two prims describe the same decorated crystal, up to choice of
/// cell, origin, orientation and site order.
pub fn is_same_crystal(a: &Prim, b: &Prim, tol: f64) -> Result<bool>
{ xtal_structure::is_same_crystal(a, b, &tol_comparator(tol)?) }

pub fn is_same_crystal_with(a: &Prim, b: &Prim, settings: &Settings) -> ::std::result::Result<bool, failure::Error>
{ Ok(xtal_structure::is_same_crystal(a, b, &comparator(settings)?)?) }
