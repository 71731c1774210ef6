/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Plain-data description of a `Prim`, for reading and writing documents.

use crate::{Lattice, Prim, Occupant, DoFSetBasis};
use crate::errors::{Result, InconsistentBasisError};

use xtal_array_types::{V3, mat};

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct PrimSpec {
    /// Lattice vectors, one per row.
    pub lattice_vectors: [[f64; 3]; 3],
    #[cfg_attr(feature = "serde", serde(default))]
    pub coordinate_mode: CoordinateMode,
    pub basis: Vec<SiteSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub global_dof: Vec<DoFSpec>,
    /// Occupants with names or properties that differ from their label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub occupants: BTreeMap<String, OccupantSpec>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CoordinateMode {
    Fractional,
    Cartesian,
}

impl Default for CoordinateMode {
    fn default() -> Self
    { CoordinateMode::Fractional }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct SiteSpec {
    pub coordinate: [f64; 3],
    pub occupants: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dofs: Vec<DoFSpec>,
}

/// A DoF basis.  Omitting the axes means the standard basis of the type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct DoFSpec {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub dof_type: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub axis_names: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub axes: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct OccupantSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<String, Vec<f64>>,
}

impl PrimSpec {
    /// Validate and build the prim.
    ///
    /// `tol` is used to reject degenerate lattices.
    pub fn build(&self, tol: f64) -> Result<Prim>
    {
        let lattice = Lattice::new(&mat::from_array(self.lattice_vectors), tol)?;
        let coords = self.basis.iter().map(|site| {
            let v = V3(site.coordinate);
            match self.coordinate_mode {
                CoordinateMode::Fractional => v,
                CoordinateMode::Cartesian => lattice.cartesian_to_fractional(&v),
            }
        }).collect();
        let occ_dof = self.basis.iter().map(|site| site.occupants.clone()).collect();
        let local_dof = self.basis.iter()
            .map(|site| site.dofs.iter().map(DoFSpec::build).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        let global_dof = self.global_dof.iter().map(DoFSpec::build).collect::<Result<Vec<_>>>()?;
        let occupants = self.occupants.iter()
            .map(|(label, spec)| Ok((label.clone(), spec.build()?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Prim::new(lattice, coords, occ_dof, local_dof, global_dof, occupants)
    }
}

impl DoFSpec {
    pub fn build(&self) -> Result<DoFSetBasis>
    {
        match (&self.axis_names, &self.axes) {
            (None, None) => Ok(DoFSetBasis::new(&self.dof_type)?),
            (Some(names), Some(axes)) => DoFSetBasis::with_axes(&self.dof_type, names.clone(), axes.clone()),
            _ => {
                throw!(InconsistentBasisError::new(format!(
                    "{}: axis names and axes must be given together", self.dof_type,
                )))
            },
        }
    }

    pub fn from_basis(dof: &DoFSetBasis) -> DoFSpec
    {
        let dof_type = dof.dof_type_name().to_string();
        let standard = DoFSetBasis::new(&dof_type).expect("(BUG) DoFSetBasis with unregistered type!");
        if &standard == dof {
            return DoFSpec { dof_type, axis_names: None, axes: None };
        }
        let basis = dof.basis();
        let axes = (0..basis.cols()).map(|c| basis.column(c).to_vec()).collect();
        DoFSpec {
            dof_type,
            axis_names: Some(dof.axis_names().to_vec()),
            axes: Some(axes),
        }
    }
}

impl OccupantSpec {
    pub fn build(&self) -> Result<Occupant>
    {
        let mut occupant = Occupant::new(self.name.clone());
        for (dof_type, value) in &self.properties {
            occupant = occupant.with_property(dof_type, value.clone())?;
        }
        Ok(occupant)
    }

    pub fn from_occupant(occupant: &Occupant) -> OccupantSpec
    {
        OccupantSpec {
            name: occupant.name().to_string(),
            properties: occupant.properties().clone(),
        }
    }
}

impl Prim {
    /// The document form of this prim, with fractional coordinates.
    pub fn to_spec(&self) -> PrimSpec
    {
        PrimSpec {
            lattice_vectors: self.lattice().matrix().into_array(),
            coordinate_mode: CoordinateMode::Fractional,
            basis: self.sites().iter().map(|site| SiteSpec {
                coordinate: site.coord.into_array(),
                occupants: site.occ_dof.clone(),
                dofs: site.local_dof.iter().map(DoFSpec::from_basis).collect(),
            }).collect(),
            global_dof: self.global_dof().iter().map(DoFSpec::from_basis).collect(),
            occupants: self.occupant_dict().iter()
                .map(|(label, occ)| (label.clone(), OccupantSpec::from_occupant(occ)))
                .collect(),
        }
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn spec() -> PrimSpec
    {
        PrimSpec {
            lattice_vectors: [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]],
            coordinate_mode: CoordinateMode::Cartesian,
            basis: vec![
                SiteSpec {
                    coordinate: [0.0, 0.0, 0.0],
                    occupants: vec!["A.up".into(), "A.down".into()],
                    dofs: vec![DoFSpec { dof_type: "disp".into(), axis_names: None, axes: None }],
                },
                SiteSpec {
                    coordinate: [1.0, 1.0, 1.5],
                    occupants: vec!["B".into()],
                    dofs: vec![DoFSpec {
                        dof_type: "disp".into(),
                        axis_names: Some(vec!["dz".into()]),
                        axes: Some(vec![vec![0.0, 0.0, 1.0]]),
                    }],
                },
            ],
            global_dof: vec![DoFSpec { dof_type: "GLstrain".into(), axis_names: None, axes: None }],
            occupants: vec![
                ("A.up".to_string(), OccupantSpec { name: "A".into(), properties: vec![("Cmagspin".to_string(), vec![1.0])].into_iter().collect() }),
                ("A.down".to_string(), OccupantSpec { name: "A".into(), properties: vec![("Cmagspin".to_string(), vec![-1.0])].into_iter().collect() }),
            ].into_iter().collect(),
        }
    }

    #[test]
    fn build_and_back() {
        let prim = spec().build(1e-5).unwrap();
        assert_eq!(prim.num_sites(), 2);
        assert_close!(abs=1e-12, prim.sites()[1].coord, V3([0.5, 0.5, 0.5]));
        assert_eq!(prim.sites()[1].local_dof[0].len(), 1);
        assert_eq!(prim.occupant("A.down").properties()["Cmagspin"], vec![-1.0]);

        let written = prim.to_spec();
        assert_eq!(written.coordinate_mode, CoordinateMode::Fractional);
        assert_eq!(written.basis[0].dofs, spec().basis[0].dofs);
        assert_eq!(written.basis[1].dofs, spec().basis[1].dofs);
        assert_eq!(written.occupants, spec().occupants);
        assert_eq!(written.build(1e-5).unwrap(), prim);
    }

    #[test]
    fn invalid_documents() {
        let mut bad = spec();
        bad.basis[1].dofs[0].axes = None;
        match bad.build(1e-5) {
            Err(Error::InconsistentBasis(_)) => {},
            r => panic!("{:?}", r),
        }

        let mut bad = spec();
        bad.global_dof[0].dof_type = "strain".into();
        match bad.build(1e-5) {
            Err(Error::UnknownDoFType(_)) => {},
            r => panic!("{:?}", r),
        }

        let mut bad = spec();
        bad.occupants.get_mut("A.up").unwrap().properties.insert("Cmagspin".into(), vec![1.0, 0.0]);
        assert!(bad.build(1e-5).is_err());

        let mut bad = spec();
        bad.lattice_vectors[2] = [2.0, 2.0, 0.0];
        match bad.build(1e-5) {
            Err(Error::DegenerateLattice(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_document() {
        let json = r#"{
            "lattice-vectors": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "basis": [
                {"coordinate": [0.0, 0.0, 0.0], "occupants": ["A", "B"]},
                {"coordinate": [0.5, 0.5, 0.5], "occupants": ["A", "B"],
                 "dofs": [{"type": "disp", "axis-names": ["dz"], "axes": [[0.0, 0.0, 1.0]]}]}
            ],
            "global-dof": [{"type": "GLstrain"}]
        }"#;
        let spec: PrimSpec = ::serde_json::from_str(json).unwrap();
        assert_eq!(spec.coordinate_mode, CoordinateMode::Fractional);
        let prim = spec.build(1e-5).unwrap();
        assert_eq!(prim.num_sites(), 2);
        assert!(prim.sites()[0].local_dof.is_empty());

        let text = ::serde_json::to_string(&prim.to_spec()).unwrap();
        let back: PrimSpec = ::serde_json::from_str(&text).unwrap();
        assert_eq!(back.build(1e-5).unwrap(), prim);
    }
}
