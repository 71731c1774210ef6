/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator, OccupantOrder, SymOp};
use crate::core::dof::{DoFSetBasis, dof_type};
use crate::errors::{Error, InconsistentBasisError, ToleranceViolationError};

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use xtal_array_types::V3;
use xtal_soa_ops::Perm;

/// A named species that may sit on a site.
///
/// Properties are keyed by DoF type name (e.g. a fixed collinear spin as
/// `"Cmagspin" => [1.0]`) and transform under symmetry like that DoF type.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupant {
    name: String,
    properties: BTreeMap<String, Vec<f64>>,
}

impl Occupant {
    pub fn new(name: impl Into<String>) -> Self
    { Occupant { name: name.into(), properties: BTreeMap::new() } }

    /// Attach a property.  The value must have the dimension of the DoF type.
    pub fn with_property(mut self, dof_type_name: &str, value: Vec<f64>) -> Result<Self, Error>
    {
        let ty = dof_type(dof_type_name)?;
        if value.len() != ty.dim() {
            throw!(InconsistentBasisError::new(format!(
                "occupant {}: property {} has {} components (expected {})",
                self.name, ty.name, value.len(), ty.dim(),
            )));
        }
        self.properties.insert(ty.name.to_string(), value);
        Ok(self)
    }

    pub fn name(&self) -> &str
    { &self.name }

    pub fn properties(&self) -> &BTreeMap<String, Vec<f64>>
    { &self.properties }

    /// Whether any property changes sign under time reversal.
    pub fn has_time_reversal_odd_property(&self) -> bool
    {
        self.properties.keys()
            .filter_map(|name| dof_type(name).ok())
            .any(|ty| ty.is_magnetic())
    }

    /// Same name and the same properties (within tolerance).
    pub fn is_same(&self, other: &Occupant, cmp: &Comparator) -> Result<bool, ToleranceViolationError>
    {
        if self.name != other.name {
            return Ok(false);
        }
        if !self.properties.keys().eq(other.properties.keys()) {
            return Ok(false);
        }
        for (a, b) in self.properties.values().zip(other.properties.values()) {
            if !cmp.values_eq(a, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Image of this occupant under a symmetry operation.
    pub fn transformed(&self, op: &SymOp) -> Occupant
    {
        let properties = self.properties.iter().map(|(name, value)| {
            let ty = dof_type(name).expect("(BUG) occupant property with unregistered type!");
            let m = ty.representation_matrix(op);
            let new = (0..value.len()).map(|r| {
                (0..value.len()).map(|c| m[(r, c)] * value[c]).sum()
            }).collect();
            (name.clone(), new)
        }).collect();
        Occupant { name: self.name.clone(), properties }
    }
}

/// Match each occupant of `from` to an equal occupant of `to`.
///
/// On success, the permutation maps index `i` of `from` to the index of its
/// partner in `to`.  Under `OccupantOrder::Sensitive` only the identity is
/// allowed.
pub(crate) fn match_occupants(
    cmp: &Comparator,
    from: &[Occupant],
    to: &[Occupant],
) -> Result<Option<Perm>, ToleranceViolationError>
{
    if from.len() != to.len() {
        return Ok(None);
    }
    match cmp.occupant_order {
        OccupantOrder::Sensitive => {
            for (a, b) in from.iter().zip(to) {
                if !a.is_same(b, cmp)? {
                    return Ok(None);
                }
            }
            Ok(Some(Perm::eye(from.len())))
        },
        OccupantOrder::Insensitive => {
            let mut used = vec![false; to.len()];
            let mut map = Vec::with_capacity(from.len());
            for a in from {
                let mut found = None;
                for (j, b) in to.iter().enumerate() {
                    if !used[j] && a.is_same(b, cmp)? {
                        found = Some(j);
                        break;
                    }
                }
                match found {
                    Some(j) => { used[j] = true; map.push(j); },
                    None => return Ok(None),
                }
            }
            Ok(Some(Perm::from_raw_inv(map).expect("(BUG) matched occupants twice!")))
        },
    }
}

/// A site of the basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Fractional coordinates.
    pub coord: V3,
    /// Allowed occupant labels, in order.
    pub occ_dof: Vec<String>,
    pub local_dof: Vec<DoFSetBasis>,
}

/// A decorated crystal: lattice, basis sites, global DoF, occupant dictionary.
///
/// Immutable in practice; every transformation produces a new `Prim`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prim {
    pub(crate) lattice: Lattice,
    pub(crate) sites: Vec<Site>,
    pub(crate) global_dof: Vec<DoFSetBasis>,
    pub(crate) occupants: BTreeMap<String, Occupant>,
}

impl Prim {
    /// Validate and assemble a prim.
    ///
    /// `local_dof` may be empty to indicate that no site has local DoF;
    /// otherwise it must have one entry per site, as must `occ_dof`.
    pub fn new(
        lattice: Lattice,
        coords: Vec<V3>,
        occ_dof: Vec<Vec<String>>,
        local_dof: Vec<Vec<DoFSetBasis>>,
        global_dof: Vec<DoFSetBasis>,
        occupants: BTreeMap<String, Occupant>,
    ) -> Result<Prim, Error>
    {
        let n = coords.len();
        if occ_dof.len() != n {
            throw!(InconsistentBasisError::new(format!(
                "{} sites but {} occupant lists", n, occ_dof.len(),
            )));
        }
        let local_dof = match local_dof.len() {
            0 => vec![vec![]; n],
            m if m == n => local_dof,
            m => {
                throw!(InconsistentBasisError::new(format!(
                    "{} sites but {} local DoF lists", n, m,
                )))
            },
        };

        let sites = izip!(coords, occ_dof, local_dof)
            .map(|(coord, occ_dof, local_dof)| Site { coord, occ_dof, local_dof })
            .collect();
        let prim = Prim { lattice, sites, global_dof, occupants };
        prim.validate()?;
        Ok(prim)
    }

    pub fn builder(lattice: Lattice) -> PrimBuilder
    { PrimBuilder::new(lattice) }

    fn validate(&self) -> Result<(), Error>
    {
        if self.occupants.keys().any(|label| label.is_empty()) {
            throw!(InconsistentBasisError::new("empty occupant label".to_string()));
        }

        let check_unique = |what: &str, dofs: &[DoFSetBasis]| -> Result<(), Error> {
            let mut seen = BTreeSet::new();
            for dof in dofs {
                if !seen.insert(dof.dof_type_name()) {
                    throw!(InconsistentBasisError::new(format!(
                        "{}: DoF type {} appears more than once", what, dof.dof_type_name(),
                    )));
                }
            }
            Ok(())
        };

        for (i, site) in self.sites.iter().enumerate() {
            check_unique(&format!("site {}", i), &site.local_dof[..])?;
            let mut seen = BTreeSet::new();
            for label in &site.occ_dof {
                if !seen.insert(label) {
                    throw!(InconsistentBasisError::new(format!(
                        "site {}: occupant {} appears more than once", i, label,
                    )));
                }
            }
        }
        check_unique("global", &self.global_dof[..])?;
        Ok(())
    }

    pub fn lattice(&self) -> &Lattice
    { &self.lattice }

    pub fn sites(&self) -> &[Site]
    { &self.sites }

    pub fn num_sites(&self) -> usize
    { self.sites.len() }

    pub fn coords(&self) -> Vec<V3>
    { self.sites.iter().map(|s| s.coord).collect() }

    pub fn global_dof(&self) -> &[DoFSetBasis]
    { &self.global_dof }

    pub fn occupant_dict(&self) -> &BTreeMap<String, Occupant>
    { &self.occupants }

    /// Resolve an occupant label.
    ///
    /// Labels missing from the dictionary are bare occupants named by the label.
    pub fn occupant(&self, label: &str) -> Cow<'_, Occupant>
    {
        match self.occupants.get(label) {
            Some(occ) => Cow::Borrowed(occ),
            None => Cow::Owned(Occupant::new(label)),
        }
    }

    /// The resolved occupants of a site, in order.
    pub fn site_occupants(&self, site: usize) -> Vec<Occupant>
    {
        self.sites[site].occ_dof.iter()
            .map(|label| self.occupant(label).into_owned())
            .collect()
    }

    /// Whether anything in the prim is odd under time reversal, which makes
    /// time reversal a candidate symmetry.
    pub fn has_time_reversal_odd_dof(&self) -> bool
    {
        let dof_odd = |dofs: &[DoFSetBasis]| dofs.iter().any(|d| d.dof_type().is_magnetic());

        dof_odd(&self.global_dof[..])
        || self.sites.iter().any(|s| dof_odd(&s.local_dof[..]))
        || self.sites.iter().any(|s| {
            s.occ_dof.iter().any(|label| self.occupant(label).has_time_reversal_odd_property())
        })
    }

    /// Replace the lattice and coordinates, keeping everything else.
    pub(crate) fn with_geometry(&self, lattice: Lattice, coords: Vec<V3>) -> Prim
    {
        assert_eq!(coords.len(), self.sites.len());
        let sites = self.sites.iter().zip(coords)
            .map(|(site, coord)| Site { coord, ..site.clone() })
            .collect();
        Prim { lattice, sites, ..self.clone() }
    }

    /// Wrap all fractional coordinates into `[0, 1)`.
    pub fn make_within(&self, cmp: &Comparator) -> Prim
    {
        let coords = self.sites.iter()
            .map(|s| cmp.fractional_within(&self.lattice, &s.coord))
            .collect();
        self.with_geometry(self.lattice.clone(), coords)
    }

    /// Apply a symmetry operation to everything.
    ///
    /// The lattice vectors are rotated, sites keep their fractional
    /// coordinates (plus the fractional translation), DoF bases are
    /// transformed, and occupants whose properties change are relabeled to
    /// an existing equal entry of the dictionary (or to a new primed label).
    pub fn apply(&self, op: &SymOp, cmp: &Comparator) -> Result<Prim, ToleranceViolationError>
    {
        let lattice = self.lattice.transformed_by(op.matrix());
        let shift = op.frac_translation(&lattice);

        let (occupants, relabel) = self.transformed_occupants(op, cmp)?;
        let sites = self.sites.iter().map(|site| Site {
            coord: site.coord + shift,
            occ_dof: site.occ_dof.iter().map(|label| relabel.get(label).unwrap_or(label).clone()).collect(),
            local_dof: site.local_dof.iter().map(|dof| dof.transformed(op)).collect(),
        }).collect();
        let global_dof = self.global_dof.iter().map(|dof| dof.transformed(op)).collect();

        Ok(Prim { lattice, sites, global_dof, occupants })
    }

    fn transformed_occupants(&self, op: &SymOp, cmp: &Comparator)
    -> Result<(BTreeMap<String, Occupant>, BTreeMap<String, String>), ToleranceViolationError>
    {
        let mut dict = self.occupants.clone();
        let mut relabel = BTreeMap::new();
        for (label, occupant) in &self.occupants {
            let image = occupant.transformed(op);
            if image.is_same(occupant, cmp)? {
                continue;
            }

            let mut existing = None;
            for (other_label, other) in &self.occupants {
                if image.is_same(other, cmp)? {
                    existing = Some(other_label.clone());
                    break;
                }
            }
            let new_label = match existing {
                Some(other_label) => other_label,
                None => {
                    let mut new_label = format!("{}'", label);
                    while dict.contains_key(&new_label) {
                        new_label.push('\'');
                    }
                    dict.insert(new_label.clone(), image);
                    new_label
                },
            };
            relabel.insert(label.clone(), new_label);
        }
        Ok((dict, relabel))
    }

    /// Compare two prims site by site, in order.
    ///
    /// This is not a symmetry-aware comparison; canonicalize first for that.
    /// Occupants are compared by value, with their order mattering only
    /// under `OccupantOrder::Sensitive`.
    pub fn is_same_prim(&self, other: &Prim, cmp: &Comparator) -> Result<bool, ToleranceViolationError>
    {
        let lattice_diff = (self.lattice.matrix() - other.lattice.matrix()).max_abs();
        if !cmp.is_negligible(lattice_diff)? {
            return Ok(false);
        }
        if self.num_sites() != other.num_sites() {
            return Ok(false);
        }
        if !dofs_equivalent(&self.global_dof, &other.global_dof, cmp)? {
            return Ok(false);
        }
        for (i, (a, b)) in self.sites.iter().zip(&other.sites).enumerate() {
            if !cmp.periodic_eq(&self.lattice, &a.coord, &b.coord)? {
                return Ok(false);
            }
            if !dofs_equivalent(&a.local_dof, &b.local_dof, cmp)? {
                return Ok(false);
            }
            if match_occupants(cmp, &self.site_occupants(i), &other.site_occupants(i))?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Pairwise equivalence of two DoF lists, matched up by type.
pub(crate) fn dofs_equivalent(a: &[DoFSetBasis], b: &[DoFSetBasis], cmp: &Comparator) -> Result<bool, ToleranceViolationError>
{
    if a.len() != b.len() {
        return Ok(false);
    }
    for x in a {
        let mut found = false;
        for y in b {
            if x.is_equivalent(y, cmp)? {
                found = true;
                break;
            }
        }
        if !found {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Incremental construction of a `Prim`.
#[derive(Debug, Clone)]
pub struct PrimBuilder {
    lattice: Lattice,
    coords: Vec<V3>,
    occ_dof: Vec<Vec<String>>,
    local_dof: Vec<Vec<DoFSetBasis>>,
    global_dof: Vec<DoFSetBasis>,
    occupants: BTreeMap<String, Occupant>,
}

impl PrimBuilder {
    pub fn new(lattice: Lattice) -> Self
    {
        PrimBuilder {
            lattice,
            coords: vec![],
            occ_dof: vec![],
            local_dof: vec![],
            global_dof: vec![],
            occupants: BTreeMap::new(),
        }
    }

    /// Add a site with no local DoF.
    pub fn site(self, coord: V3, occupants: &[&str]) -> Self
    { self.site_with_dof(coord, occupants, vec![]) }

    pub fn site_with_dof(mut self, coord: V3, occupants: &[&str], local_dof: Vec<DoFSetBasis>) -> Self
    {
        self.coords.push(coord);
        self.occ_dof.push(occupants.iter().map(|s| s.to_string()).collect());
        self.local_dof.push(local_dof);
        self
    }

    pub fn global_dof(mut self, dof: DoFSetBasis) -> Self
    { self.global_dof.push(dof); self }

    /// Register an occupant under a label.
    pub fn occupant(mut self, label: &str, occupant: Occupant) -> Self
    { self.occupants.insert(label.to_string(), occupant); self }

    pub fn build(self) -> Result<Prim, Error>
    {
        let PrimBuilder { lattice, coords, occ_dof, local_dof, global_dof, occupants } = self;
        Prim::new(lattice, coords, occ_dof, local_dof, global_dof, occupants)
    }
}
