/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Continuous degrees of freedom and how symmetry operations act on them.
//!
//! A DoF type is a row of a table: its dimension, the names of its standard
//! axes, and the kind of representation it carries.  Nothing here is
//! polymorphic; adding a type means adding a row.

use crate::{SymOp, Comparator};
use crate::errors::{Error, InconsistentBasisError, UnknownDoFTypeError, ToleranceViolationError};
use crate::core::compare::DEFAULT_TOLERANCE;

use ndarray::{Array2, ArrayView2, aview1};
use xtal_array_types::M33;

/// How a cartesian operation acts on the standard coordinates of a DoF type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Representation {
    /// Unaffected by the linear part.
    Scalar,
    /// Transforms like a position difference. (`R`)
    PolarVector,
    /// Transforms like an angular momentum. (`det(R) R`)
    AxialVector,
    /// A symmetric rank 2 tensor (`R E R^T`) in Voigt form
    /// `[xx, yy, zz, √2 yz, √2 xz, √2 xy]`.
    SymmetricTensor,
}

#[derive(Debug, PartialEq)]
pub struct DoFType {
    pub name: &'static str,
    pub axis_names: &'static [&'static str],
    pub representation: Representation,
    /// Whether the values change sign under time reversal.
    pub time_reversal_odd: bool,
}

const STRAIN_AXES: &[&str] = &["e_1", "e_2", "e_3", "e_4", "e_5", "e_6"];

const fn dof(
    name: &'static str,
    axis_names: &'static [&'static str],
    representation: Representation,
    time_reversal_odd: bool,
) -> DoFType
{ DoFType { name, axis_names, representation, time_reversal_odd } }

static DOF_TYPES: &[DoFType] = &[
    dof("disp", &["dx", "dy", "dz"], Representation::PolarVector, false),
    dof("force", &["fx", "fy", "fz"], Representation::PolarVector, false),
    dof("Cmagspin", &["sz"], Representation::Scalar, true),
    dof("Cunitmagspin", &["sz"], Representation::Scalar, true),
    dof("NCmagspin", &["sx", "sy", "sz"], Representation::AxialVector, true),
    dof("NCunitmagspin", &["sx", "sy", "sz"], Representation::AxialVector, true),
    dof("SOmagspin", &["sx", "sy", "sz"], Representation::AxialVector, true),
    dof("GLstrain", STRAIN_AXES, Representation::SymmetricTensor, false),
    dof("EAstrain", STRAIN_AXES, Representation::SymmetricTensor, false),
    dof("Hstrain", STRAIN_AXES, Representation::SymmetricTensor, false),
    dof("Ustrain", STRAIN_AXES, Representation::SymmetricTensor, false),
    dof("Bstrain", STRAIN_AXES, Representation::SymmetricTensor, false),
];

/// Look up a DoF type by name.
pub fn dof_type(name: &str) -> Result<&'static DoFType, UnknownDoFTypeError>
{
    DOF_TYPES.iter()
        .find(|ty| ty.name == name)
        .ok_or_else(|| UnknownDoFTypeError::new(name.to_string()))
}

/// All registered DoF types.
pub fn dof_types() -> &'static [DoFType]
{ DOF_TYPES }

impl DoFType {
    pub fn dim(&self) -> usize
    { self.axis_names.len() }

    /// Matrix acting on the standard coordinates of this type.
    pub fn representation_matrix(&self, op: &SymOp) -> Array2<f64>
    {
        let r = op.matrix();
        let mut out = match self.representation {
            Representation::Scalar => Array2::eye(1),
            Representation::PolarVector => m33_to_array(r),
            Representation::AxialVector => m33_to_array(r) * r.det(),
            Representation::SymmetricTensor => voigt_representation(r),
        };
        if self.is_magnetic() && op.time_reversal() {
            out *= -1.0;
        }
        out
    }

    /// `true` if the representation of a time reversing operation
    /// differs from that of its linear part alone.
    pub fn is_magnetic(&self) -> bool
    { self.time_reversal_odd }
}

fn m33_to_array(m: &M33) -> Array2<f64>
{ Array2::from_shape_fn((3, 3), |(r, c)| m[r][c]) }

const VOIGT_PAIRS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (1, 2), (0, 2), (0, 1)];

pub(crate) fn voigt_to_matrix(v: &[f64]) -> M33
{
    let s = ::std::f64::consts::FRAC_1_SQRT_2;
    let mut m = M33::zero();
    for (k, &(i, j)) in VOIGT_PAIRS.iter().enumerate() {
        if i == j {
            m[i][i] = v[k];
        } else {
            m[i][j] = s * v[k];
            m[j][i] = s * v[k];
        }
    }
    m
}

pub(crate) fn matrix_to_voigt(m: &M33) -> [f64; 6]
{
    let s = ::std::f64::consts::SQRT_2;
    let mut out = [0.0; 6];
    for (k, &(i, j)) in VOIGT_PAIRS.iter().enumerate() {
        out[k] = if i == j { m[i][i] } else { s * 0.5 * (m[i][j] + m[j][i]) };
    }
    out
}

// column k is the image of the k-th Voigt unit vector
fn voigt_representation(r: &M33) -> Array2<f64>
{
    let mut out = Array2::zeros((6, 6));
    for k in 0..6 {
        let mut unit = [0.0; 6];
        unit[k] = 1.0;
        let e = voigt_to_matrix(&unit);
        let image = matrix_to_voigt(&(r * &e * r.t()));
        for (row, &x) in image.iter().enumerate() {
            out[(row, k)] = x;
        }
    }
    out
}

/// The axes along which a DoF of some type may vary.
///
/// The columns of `basis` are expressed in the standard coordinates of
/// the type, so a restricted DoF simply has fewer columns than `dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoFSetBasis {
    dof_type: String,
    axis_names: Vec<String>,
    basis: Array2<f64>,
}

impl DoFSetBasis {
    /// The unrestricted basis with the standard axes.
    pub fn new(dof_type_name: &str) -> Result<Self, UnknownDoFTypeError>
    {
        let ty = dof_type(dof_type_name)?;
        Ok(DoFSetBasis {
            dof_type: ty.name.to_string(),
            axis_names: ty.axis_names.iter().map(|s| s.to_string()).collect(),
            basis: Array2::eye(ty.dim()),
        })
    }

    /// A (possibly restricted) basis from named axis vectors.
    ///
    /// Each axis is a vector in the standard coordinates of the type.
    /// The axes must be linearly independent.
    pub fn with_axes(dof_type_name: &str, axis_names: Vec<String>, axes: Vec<Vec<f64>>) -> Result<Self, Error>
    {
        let ty = dof_type(dof_type_name)?;
        let dim = ty.dim();
        if axis_names.len() != axes.len() {
            throw!(InconsistentBasisError::new(format!(
                "{}: {} axis names for {} axes", ty.name, axis_names.len(), axes.len(),
            )));
        }
        if axes.len() > dim {
            throw!(InconsistentBasisError::new(format!(
                "{}: {} axes exceed the dimension {}", ty.name, axes.len(), dim,
            )));
        }
        if let Some(bad) = axes.iter().find(|axis| axis.len() != dim) {
            throw!(InconsistentBasisError::new(format!(
                "{}: axis of length {} (expected {})", ty.name, bad.len(), dim,
            )));
        }

        let basis = Array2::from_shape_fn((dim, axes.len()), |(r, c)| axes[c][r]);
        if xtal_linalg::rank(basis.view(), DEFAULT_TOLERANCE) != axes.len() {
            throw!(InconsistentBasisError::new(format!(
                "{}: axes are not linearly independent", ty.name,
            )));
        }
        Ok(DoFSetBasis { dof_type: ty.name.to_string(), axis_names, basis })
    }

    pub fn dof_type_name(&self) -> &str
    { &self.dof_type }

    pub fn dof_type(&self) -> &'static DoFType
    { dof_type(&self.dof_type).expect("(BUG) DoFSetBasis with unregistered type!") }

    pub fn axis_names(&self) -> &[String]
    { &self.axis_names }

    /// Columns are axes, rows are standard coordinates.
    pub fn basis(&self) -> ArrayView2<'_, f64>
    { self.basis.view() }

    /// Number of axes.
    pub fn len(&self) -> usize
    { self.axis_names.len() }

    pub fn is_empty(&self) -> bool
    { self.axis_names.is_empty() }

    /// Image of this basis under a symmetry operation.
    pub fn transformed(&self, op: &SymOp) -> DoFSetBasis
    {
        let m = self.dof_type().representation_matrix(op);
        DoFSetBasis {
            dof_type: self.dof_type.clone(),
            axis_names: self.axis_names.clone(),
            basis: m.dot(&self.basis),
        }
    }

    /// Same type, and spanning the same subspace.
    ///
    /// The subspaces are compared through their projectors, whose largest
    /// difference is held to the tolerance of `cmp`.
    pub fn is_equivalent(&self, other: &DoFSetBasis, cmp: &Comparator) -> Result<bool, ToleranceViolationError>
    {
        if self.dof_type != other.dof_type {
            return Ok(false);
        }
        match xtal_linalg::span_distance(self.basis.view(), other.basis.view(), cmp.tol) {
            Some(distance) => cmp.is_negligible(distance),
            None => Ok(false),
        }
    }

    /// Orthogonal projector onto the span, flattened row-major.
    ///
    /// This does not depend on the choice of axes, so it can be used
    /// as a sort key.
    pub fn projector_key(&self, tol: f64) -> Vec<f64>
    { xtal_linalg::projector(self.basis.view(), tol).iter().cloned().collect() }
}

/// The distinct images of a property value under a group of operations.
///
/// `value` and the results are coordinates in the axes of `dof`, whose span
/// should be invariant under the group; any part of an image outside the
/// span is projected away.  Images are listed in the order first produced.
pub fn make_equivalent_property_values(
    point_group: &[SymOp],
    value: &[f64],
    dof: &DoFSetBasis,
    cmp: &Comparator,
) -> Result<Vec<Vec<f64>>, Error>
{
    if value.len() != dof.len() {
        throw!(InconsistentBasisError::new(format!(
            "{}: value of length {} for {} axes", dof.dof_type_name(), value.len(), dof.len(),
        )));
    }
    let ty = dof.dof_type();
    let pinv = xtal_linalg::pseudo_inverse(dof.basis()).expect("(BUG) DoFSetBasis with dependent axes!");
    let standard = dof.basis().dot(&aview1(value));

    let mut out: Vec<Vec<f64>> = vec![];
    'ops: for op in point_group {
        let image = pinv.dot(&ty.representation_matrix(op).dot(&standard));
        let image: Vec<f64> = image.iter().cloned().collect();
        for existing in &out {
            if cmp.values_eq(existing, &image)? {
                continue 'ops;
            }
        }
        out.push(image);
    }
    Ok(out)
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use xtal_array_types::{V3, mat};

    fn rot_z_90() -> SymOp
    { SymOp::from_matrix(mat::from_array([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])) }

    fn inversion() -> SymOp
    { SymOp::from_matrix(M33::eye() * -1.0) }

    #[test]
    fn lookup() {
        assert_eq!(dof_type("disp").unwrap().dim(), 3);
        assert_eq!(dof_type("GLstrain").unwrap().dim(), 6);
        assert_eq!(dof_type("Cmagspin").unwrap().dim(), 1);
        assert!(dof_type("occ").is_err());
        assert!(DoFSetBasis::new("spin").is_err());
    }

    #[test]
    fn vector_representations() {
        let disp = dof_type("disp").unwrap();
        let spin = dof_type("NCmagspin").unwrap();

        // polar vectors flip under inversion, axial vectors do not
        assert_close!(abs=1e-12, disp.representation_matrix(&inversion())[(0, 0)], -1.0);
        assert_close!(abs=1e-12, spin.representation_matrix(&inversion())[(0, 0)], 1.0);

        // ...and spins flip under time reversal, displacements do not
        let tr = SymOp::time_reversal_op();
        assert_close!(abs=1e-12, disp.representation_matrix(&tr)[(2, 2)], 1.0);
        assert_close!(abs=1e-12, spin.representation_matrix(&tr)[(2, 2)], -1.0);

        let cspin = dof_type("Cmagspin").unwrap();
        assert_close!(abs=1e-12, cspin.representation_matrix(&rot_z_90())[(0, 0)], 1.0);
        assert_close!(abs=1e-12, cspin.representation_matrix(&tr)[(0, 0)], -1.0);
    }

    #[test]
    fn strain_representation() {
        let strain = dof_type("GLstrain").unwrap();
        let m = strain.representation_matrix(&rot_z_90());

        // xx <-> yy, and yz <-> xz with a sign
        let xx = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let image: Vec<f64> = (0..6).map(|r| (0..6).map(|c| m[(r, c)] * xx[c]).sum()).collect();
        assert_close!(abs=1e-12, image, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_close!(abs=1e-12, m[(4, 3)], -1.0);
        assert_close!(abs=1e-12, m[(3, 4)], 1.0);

        // orthogonal, since the voigt form has the √2 factors
        let mtm = m.t().dot(&m);
        for r in 0..6 {
            for c in 0..6 {
                assert_close!(abs=1e-12, mtm[(r, c)], if r == c { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn representation_is_a_homomorphism() {
        let a = rot_z_90();
        let b = SymOp::new(mat::from_array([[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]]), V3([0.0; 3]), true);
        for ty in dof_types() {
            let lhs = ty.representation_matrix(&a.then(&b));
            let rhs = ty.representation_matrix(&b).dot(&ty.representation_matrix(&a));
            for (x, y) in lhs.iter().zip(rhs.iter()) {
                assert_close!(abs=1e-12, *x, *y, "{}", ty.name);
            }
        }
    }

    #[test]
    fn restricted_basis() {
        let cmp = Comparator::new(1e-8);
        let z_only = DoFSetBasis::with_axes("disp", vec!["d".into()], vec![vec![0.0, 0.0, 2.0]]).unwrap();
        let minus_z = DoFSetBasis::with_axes("disp", vec!["dz".into()], vec![vec![0.0, 0.0, -1.0]]).unwrap();
        let x_only = DoFSetBasis::with_axes("disp", vec!["dx".into()], vec![vec![1.0, 0.0, 0.0]]).unwrap();
        assert!(z_only.is_equivalent(&minus_z, &cmp).unwrap());
        assert!(!z_only.is_equivalent(&x_only, &cmp).unwrap());

        // a fourfold about x takes z to y; a fourfold about z leaves it alone
        assert!(z_only.transformed(&rot_z_90()).is_equivalent(&z_only, &cmp).unwrap());
        let rot_x = SymOp::from_matrix(mat::from_array([[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]]));
        assert!(!z_only.transformed(&rot_x).is_equivalent(&z_only, &cmp).unwrap());

        // full bases are always equivalent, whatever the axes
        let full = DoFSetBasis::new("disp").unwrap();
        assert!(full.transformed(&rot_x).is_equivalent(&full, &cmp).unwrap());
        assert!(!full.is_equivalent(&DoFSetBasis::new("force").unwrap(), &cmp).unwrap());

        // tilted by 1.5e-5 radians: between tol and 2 tol
        let tilted = DoFSetBasis::with_axes("disp", vec!["dz".into()], vec![vec![0.0, 1.5e-5, 1.0]]).unwrap();
        assert!(!z_only.is_equivalent(&tilted, &Comparator::new(1e-5)).unwrap());
        assert!(z_only.is_equivalent(&tilted, &Comparator::new(1e-4)).unwrap());
        let strict = Comparator::new(1e-5).ambiguity(crate::AmbiguityPolicy::Error);
        assert!(z_only.is_equivalent(&tilted, &strict).is_err());
    }

    #[test]
    fn invalid_axes() {
        let names = |n| (0..n).map(|i| format!("a{}", i)).collect::<Vec<_>>();
        assert!(DoFSetBasis::with_axes("disp", names(2), vec![vec![1.0, 0.0, 0.0]]).is_err());
        assert!(DoFSetBasis::with_axes("disp", names(1), vec![vec![1.0, 0.0]]).is_err());
        assert!(DoFSetBasis::with_axes("disp", names(2), vec![vec![1.0, 0.0, 0.0], vec![2.0, 0.0, 0.0]]).is_err());
        assert!(DoFSetBasis::with_axes("Cmagspin", names(2), vec![vec![1.0], vec![1.0]]).is_err());
        match DoFSetBasis::with_axes("bogus", names(0), vec![]) {
            Err(Error::UnknownDoFType(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn equivalent_property_values() {
        let cmp = Comparator::new(1e-8);
        let mut c4 = vec![SymOp::eye()];
        for _ in 0..3 {
            let next = c4[c4.len() - 1].then(&rot_z_90());
            c4.push(next);
        }

        let disp = DoFSetBasis::new("disp").unwrap();
        let images = make_equivalent_property_values(&c4, &[1.0, 0.0, 0.0], &disp, &cmp).unwrap();
        assert_eq!(images.len(), 4);
        assert_close!(abs=1e-12, images[0].clone(), vec![1.0, 0.0, 0.0]);
        assert_close!(abs=1e-12, images[1].clone(), vec![0.0, 1.0, 0.0]);
        assert_eq!(make_equivalent_property_values(&c4, &[0.0, 0.0, 2.0], &disp, &cmp).unwrap().len(), 1);

        // results stay in the axes of the basis
        let z_only = DoFSetBasis::with_axes("disp", vec!["d".into()], vec![vec![0.0, 0.0, 2.0]]).unwrap();
        let images = make_equivalent_property_values(&c4, &[0.5], &z_only, &cmp).unwrap();
        assert_eq!(images.len(), 1);
        assert_close!(abs=1e-12, images[0].clone(), vec![0.5]);

        // a uniaxial strain along x is equivalent to one along y
        let strain = DoFSetBasis::new("GLstrain").unwrap();
        let images = make_equivalent_property_values(&c4, &[0.01, 0.0, 0.0, 0.0, 0.0, 0.0], &strain, &cmp).unwrap();
        assert_eq!(images.len(), 2);
        assert_close!(abs=1e-12, images[1].clone(), vec![0.0, 0.01, 0.0, 0.0, 0.0, 0.0]);

        // collinear spins flip under time reversal
        let spin = DoFSetBasis::new("Cmagspin").unwrap();
        let group = [SymOp::eye(), SymOp::time_reversal_op()];
        let images = make_equivalent_property_values(&group, &[1.0], &spin, &cmp).unwrap();
        assert_eq!(images, vec![vec![1.0], vec![-1.0]]);

        match make_equivalent_property_values(&group, &[1.0, 2.0], &spin, &cmp) {
            Err(Error::InconsistentBasis(_)) => {},
            r => panic!("{:?}", r),
        }
    }
}
