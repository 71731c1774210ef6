/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Strain metrics, and conversion between deformations and strain DoF values.
//!
//! Every metric here is a function of the right stretch tensor
//! `U = sqrt(F^T F)` alone, so the rotational part of a deformation
//! gradient `F` never shows up in a strain.

use crate::DoFSetBasis;
use crate::core::dof::{dof_type, voigt_to_matrix, matrix_to_voigt};
use crate::errors::{Error, InconsistentBasisError, InvalidStrainError};

use ndarray::{Array2, ArrayView2, aview1};
use xtal_array_types::M33;
use xtal_linalg::{symmetric_eigen, symmetric_apply, pseudo_inverse};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StrainMetric {
    /// `(U^2 - I) / 2`. (`GLstrain`)
    GreenLagrange,
    /// `(I - U^-2) / 2`. (`EAstrain`)
    EulerAlmansi,
    /// `ln U`. (`Hstrain`)
    Hencky,
    /// `U - I`. (`Bstrain`)
    Biot,
    /// `U` itself. (`Ustrain`)
    Stretch,
}

impl StrainMetric {
    /// The metric of a strain DoF type.
    pub fn from_dof_type(name: &str) -> Result<Self, Error>
    {
        let ty = dof_type(name)?;
        Ok(match ty.name {
            "GLstrain" => StrainMetric::GreenLagrange,
            "EAstrain" => StrainMetric::EulerAlmansi,
            "Hstrain" => StrainMetric::Hencky,
            "Bstrain" => StrainMetric::Biot,
            "Ustrain" => StrainMetric::Stretch,
            _ => return Err(InconsistentBasisError::new(format!("{} is not a strain DoF type", ty.name)).into()),
        })
    }

    pub fn dof_type_name(self) -> &'static str
    {
        match self {
            StrainMetric::GreenLagrange => "GLstrain",
            StrainMetric::EulerAlmansi => "EAstrain",
            StrainMetric::Hencky => "Hstrain",
            StrainMetric::Biot => "Bstrain",
            StrainMetric::Stretch => "Ustrain",
        }
    }

    // strain along a principal axis with stretch `s`
    fn of_stretch(self, s: f64) -> f64
    {
        match self {
            StrainMetric::GreenLagrange => 0.5 * (s * s - 1.0),
            StrainMetric::EulerAlmansi => 0.5 * (1.0 - 1.0 / (s * s)),
            StrainMetric::Hencky => s.ln(),
            StrainMetric::Biot => s - 1.0,
            StrainMetric::Stretch => s,
        }
    }

    // NaN or non-positive when no stretch gives this strain
    fn stretch_of(self, e: f64) -> f64
    {
        match self {
            StrainMetric::GreenLagrange => (2.0 * e + 1.0).sqrt(),
            StrainMetric::EulerAlmansi => 1.0 / (1.0 - 2.0 * e).sqrt(),
            StrainMetric::Hencky => e.exp(),
            StrainMetric::Biot => e + 1.0,
            StrainMetric::Stretch => e,
        }
    }

    /// The strain tensor of a deformation gradient.
    pub fn strain_from_f(self, f: &M33) -> Result<M33, InvalidStrainError>
    {
        let metric = &(&f.t() * f);
        let (values, _) = symmetric_eigen(metric);
        if !(values[0] > 0.0) {
            throw!(InvalidStrainError::new(self.dof_type_name().to_string(), values[0].max(0.0).sqrt()));
        }
        Ok(symmetric_apply(metric, |c| self.of_stretch(c.sqrt())))
    }

    /// The symmetric (rotation-free) deformation gradient `U` with a given strain.
    pub fn f_from_strain(self, strain: &M33) -> Result<M33, InvalidStrainError>
    {
        let (values, _) = symmetric_eigen(strain);
        for &e in &values {
            let s = self.stretch_of(e);
            if !(s > 0.0 && s.is_finite()) {
                throw!(InvalidStrainError::new(self.dof_type_name().to_string(), s));
            }
        }
        Ok(symmetric_apply(strain, |e| self.stretch_of(e)))
    }
}

/// Converts between deformations and the coordinates of a strain DoF.
///
/// The columns of `basis` are axes in the Voigt coordinates
/// `[xx, yy, zz, √2 yz, √2 xz, √2 xy]` of the metric's strain tensor.
/// Strains outside the span of a restricted basis are projected onto it.
#[derive(Debug, Clone)]
pub struct StrainConverter {
    metric: StrainMetric,
    basis: Array2<f64>,
    basis_pinv: Array2<f64>,
}

impl StrainConverter {
    pub fn new(metric: StrainMetric, basis: Array2<f64>) -> Result<Self, Error>
    {
        if basis.shape()[0] != 6 {
            throw!(InconsistentBasisError::new(format!(
                "{}: strain basis has {} rows (expected 6)", metric.dof_type_name(), basis.shape()[0],
            )));
        }
        let basis_pinv = pseudo_inverse(basis.view()).map_err(|_| InconsistentBasisError::new(format!(
            "{}: axes are not linearly independent", metric.dof_type_name(),
        )))?;
        Ok(StrainConverter { metric, basis, basis_pinv })
    }

    /// The converter for a strain DoF.
    pub fn from_dof(dof: &DoFSetBasis) -> Result<Self, Error>
    {
        let metric = StrainMetric::from_dof_type(dof.dof_type_name())?;
        StrainConverter::new(metric, dof.basis().to_owned())
    }

    pub fn metric(&self) -> StrainMetric
    { self.metric }

    /// Number of axes.
    pub fn dim(&self) -> usize
    { self.basis.shape()[1] }

    pub fn basis(&self) -> ArrayView2<'_, f64>
    { self.basis.view() }

    /// Voigt coordinates of a value given in the axes of the basis.
    pub fn to_standard(&self, value: &[f64]) -> Result<[f64; 6], InconsistentBasisError>
    {
        if value.len() != self.dim() {
            throw!(InconsistentBasisError::new(format!(
                "{}: value of length {} for {} axes", self.metric.dof_type_name(), value.len(), self.dim(),
            )));
        }
        let mut out = [0.0; 6];
        for (dest, x) in out.iter_mut().zip(self.basis.dot(&aview1(value)).iter()) {
            *dest = *x;
        }
        Ok(out)
    }

    /// Least-squares coordinates of a Voigt vector in the axes of the basis.
    pub fn from_standard(&self, standard: &[f64; 6]) -> Vec<f64>
    { self.basis_pinv.dot(&aview1(standard)).iter().cloned().collect() }

    /// The strain tensor of a value.
    pub fn to_e_matrix(&self, value: &[f64]) -> Result<M33, InconsistentBasisError>
    { Ok(voigt_to_matrix(&self.to_standard(value)?)) }

    pub fn from_e_matrix(&self, strain: &M33) -> Vec<f64>
    { self.from_standard(&matrix_to_voigt(strain)) }

    /// The rotation-free deformation gradient `U` of a value.
    pub fn to_f(&self, value: &[f64]) -> Result<M33, Error>
    { Ok(self.metric.f_from_strain(&self.to_e_matrix(value)?)?) }

    pub fn from_f(&self, f: &M33) -> Result<Vec<f64>, InvalidStrainError>
    { Ok(self.from_e_matrix(&self.metric.strain_from_f(f)?)) }
}

/// An orthonormal basis of Voigt strain space adapted to cubic symmetry.
///
/// Columns, in order: hydrostatic `(1, 1, 1)/√3`, the two deviatoric axes
/// `(1, -1, 0)/√2` and `(-1, -1, 2)/√6`, then the three shears.
pub fn make_symmetry_adapted_strain_basis() -> Array2<f64>
{
    let r2 = 2f64.sqrt();
    let r3 = 3f64.sqrt();
    let r6 = 6f64.sqrt();
    let axes = [
        [1.0 / r3, 1.0 / r3, 1.0 / r3, 0.0, 0.0, 0.0],
        [1.0 / r2, -1.0 / r2, 0.0, 0.0, 0.0, 0.0],
        [-1.0 / r6, -1.0 / r6, 2.0 / r6, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    ];
    Array2::from_shape_fn((6, 6), |(r, c)| axes[c][r])
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use xtal_array_types::mat;

    use super::StrainMetric::*;
    const METRICS: [StrainMetric; 5] = [GreenLagrange, EulerAlmansi, Hencky, Biot, Stretch];

    fn uniaxial(x: f64) -> M33
    { mat::from_array([[x, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]) }

    fn diag(x: f64, y: f64, z: f64) -> M33
    { mat::from_array([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, z]]) }

    #[test]
    fn names() {
        for &metric in &METRICS {
            assert_eq!(StrainMetric::from_dof_type(metric.dof_type_name()).unwrap(), metric);
        }
        assert!(StrainMetric::from_dof_type("disp").is_err());
        match StrainMetric::from_dof_type("strain") {
            Err(Error::UnknownDoFType(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn uniaxial_stretch() {
        let f = uniaxial(1.1);
        let expected = [
            (GreenLagrange, 0.105),
            (EulerAlmansi, 0.5 * (1.0 - 1.0 / 1.21)),
            (Hencky, 1.1f64.ln()),
            (Biot, 0.1),
            (Stretch, 1.1),
        ];
        for &(metric, xx) in &expected {
            let e = metric.strain_from_f(&f).unwrap();
            let untouched = if metric == Stretch { 1.0 } else { 0.0 };
            assert_close!(abs=1e-12, e[0][0], xx, "{:?}", metric);
            assert_close!(abs=1e-12, e[1][1], untouched, "{:?}", metric);
            assert_close!(abs=1e-12, e[0][1], 0.0, "{:?}", metric);
        }
    }

    #[test]
    fn rotations_drop_out() {
        let (c, s) = (0.3f64.cos(), 0.3f64.sin());
        let rot = mat::from_array([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]);
        let u = mat::from_array([[1.1, 0.02, 0.0], [0.02, 0.95, 0.03], [0.0, 0.03, 1.05]]);
        for &metric in &METRICS {
            let e = metric.strain_from_f(&u).unwrap();
            assert_close!(abs=1e-10, metric.strain_from_f(&(&rot * &u)).unwrap(), e, "{:?}", metric);
            assert_close!(abs=1e-10, metric.f_from_strain(&e).unwrap(), u, "{:?}", metric);
        }
    }

    #[test]
    fn impossible_strains() {
        let compressed = diag(-0.6, 0.0, 0.0);
        assert!(GreenLagrange.f_from_strain(&compressed).is_err());
        assert!(EulerAlmansi.f_from_strain(&compressed).is_ok());
        assert!(Hencky.f_from_strain(&compressed).is_ok());
        assert!(Biot.f_from_strain(&compressed).is_ok());
        assert!(Stretch.f_from_strain(&compressed).is_err());

        assert!(EulerAlmansi.f_from_strain(&diag(0.5, 0.0, 0.0)).is_err());
        assert!(Biot.f_from_strain(&diag(-1.0, 0.0, 0.0)).is_err());
        assert!(Hencky.strain_from_f(&diag(1.0, 1.0, 0.0)).is_err());
    }

    #[test]
    fn adapted_basis() {
        let basis = make_symmetry_adapted_strain_basis();
        let gram = basis.t().dot(&basis);
        for r in 0..6 {
            for c in 0..6 {
                assert_close!(abs=1e-12, gram[(r, c)], if r == c { 1.0 } else { 0.0 });
            }
        }

        let conv = StrainConverter::new(GreenLagrange, basis).unwrap();
        assert_eq!(conv.dim(), 6);
        let value = [3f64.sqrt() * 0.01, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_close!(abs=1e-12, conv.to_e_matrix(&value).unwrap(), M33::eye() * 0.01);

        // a volume-preserving tetragonal strain lies along the third axis
        let tetragonal = conv.from_e_matrix(&diag(0.01, 0.01, -0.02));
        assert_close!(abs=1e-12, tetragonal, vec![0.0, 0.0, -0.06 / 6f64.sqrt(), 0.0, 0.0, 0.0]);

        let mut shear = M33::zero();
        shear[0][1] = 0.01;
        shear[1][0] = 0.01;
        assert_close!(abs=1e-12, conv.from_e_matrix(&shear)[5], 2f64.sqrt() * 0.01);
    }

    #[test]
    fn restricted_converter() {
        let dof = DoFSetBasis::with_axes("Hstrain", vec!["vol".into()], vec![vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]]).unwrap();
        let conv = StrainConverter::from_dof(&dof).unwrap();
        assert_eq!(conv.dim(), 1);
        assert_eq!(conv.metric(), Hencky);
        assert_eq!(conv.basis().shape(), &[6, 1]);

        let value = conv.from_f(&(M33::eye() * 1.1)).unwrap();
        assert_close!(abs=1e-12, value.clone(), vec![1.1f64.ln()]);
        assert_close!(abs=1e-12, conv.to_f(&value).unwrap(), M33::eye() * 1.1);

        // only the volumetric part of a uniaxial stretch survives
        assert_close!(abs=1e-12, conv.from_f(&uniaxial(1.1)).unwrap(), vec![1.1f64.ln() / 3.0]);
        assert!(conv.to_standard(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn invalid_converters() {
        assert!(StrainConverter::from_dof(&DoFSetBasis::new("disp").unwrap()).is_err());
        assert!(StrainConverter::new(Biot, Array2::eye(5)).is_err());
        let dependent = Array2::from_shape_fn((6, 2), |(r, _)| if r == 0 { 1.0 } else { 0.0 });
        assert!(StrainConverter::new(Biot, dependent).is_err());
    }
}
