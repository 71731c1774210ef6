/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, Comparator, SymOp};
use crate::errors::ToleranceViolationError;
use crate::util::reduce_half_open;

use xtal_array_types::{V3, M33};

use std::fmt;

/// Geometric classification of a `SymOp`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymOpKind {
    Identity,
    Translation,
    Inversion,
    Rotation,
    Screw,
    Mirror,
    Glide,
    Rotoinversion,
}

/// What a symmetry operation does, geometrically.
#[derive(Debug, Clone, PartialEq)]
pub struct SymInfo {
    pub kind: SymOpKind,
    /// Unit rotation axis of the proper part, or the normal of a mirror plane.
    ///
    /// `None` for identity, translation and inversion.
    pub axis: Option<V3>,
    /// Rotation angle of the proper part in degrees, in `[0, 180]`.
    pub angle: f64,
    /// Cartesian screw or glide component (or the translation itself, for a
    /// pure translation), reduced modulo the lattice.
    pub intrinsic_translation: V3,
    pub time_reversal: bool,
}

// number of rotations to try before deciding the op is not crystallographic
const MAX_ORDER: u32 = 6;

impl SymInfo {
    pub fn new(op: &SymOp, lattice: &Lattice, cmp: &Comparator) -> Result<SymInfo, ToleranceViolationError>
    {
        let matrix = op.matrix();
        let det = op.det().signum();
        let proper = *matrix * det;

        let cos = ((proper.trace() - 1.0) / 2.0).max(-1.0).min(1.0);
        let angle = cos.acos().to_degrees();
        let is_zero_angle = (1.0 - cos) <= cmp.tol;
        let is_half_turn = (1.0 + cos) <= cmp.tol;

        let axis = match (is_zero_angle, is_half_turn) {
            (true, _) => None,
            // P + I = 2 n n^T
            (_, true) => {
                let sym = &proper + &M33::eye();
                let col = (0..3)
                    .map(|k| sym.col(k))
                    .max_by(|a, b| a.sqnorm().partial_cmp(&b.sqnorm()).expect("NaN"))
                    .expect("(BUG) no columns!?");
                Some(canonical_sign(col / col.norm()))
            },
            // P - P^T = 2 sin θ [n]_x
            _ => {
                let p = &proper;
                let v = V3([p[2][1] - p[1][2], p[0][2] - p[2][0], p[1][0] - p[0][1]]);
                Some(v / v.norm())
            },
        };

        let intrinsic_translation = intrinsic_translation(op, lattice, cmp)?;
        let has_translation = !cmp.is_negligible(intrinsic_translation.norm())?;

        let kind = match (det > 0.0, is_zero_angle, is_half_turn, has_translation) {
            (true, true, _, false) => SymOpKind::Identity,
            (true, true, _, true) => SymOpKind::Translation,
            (true, false, _, false) => SymOpKind::Rotation,
            (true, false, _, true) => SymOpKind::Screw,
            (false, true, _, _) => SymOpKind::Inversion,
            (false, false, true, false) => SymOpKind::Mirror,
            (false, false, true, true) => SymOpKind::Glide,
            (false, false, false, _) => SymOpKind::Rotoinversion,
        };

        Ok(SymInfo {
            kind,
            axis,
            angle,
            intrinsic_translation,
            time_reversal: op.time_reversal(),
        })
    }
}

// (1/n) * sum_{k<n} R^k t, where n is the order of R.
fn intrinsic_translation(op: &SymOp, lattice: &Lattice, cmp: &Comparator) -> Result<V3, ToleranceViolationError>
{
    let matrix = op.matrix();
    let mut power = M33::eye();
    let mut sum = V3([0.0; 3]);
    let mut order = 0;
    for _ in 0..MAX_ORDER {
        sum += &power * op.translation();
        power = matrix * &power;
        order += 1;
        if cmp.is_negligible((&power - &M33::eye()).max_abs())? {
            break;
        }
    }
    let cart = sum / f64::from(order);

    let frac = lattice.cartesian_to_fractional(&cart).map(reduce_half_open);
    Ok(lattice.fractional_to_cartesian(&frac))
}

// the sign of a mirror normal or twofold axis is arbitrary
fn canonical_sign(v: V3) -> V3
{
    let first = v.iter().cloned().find(|x| x.abs() > 1e-8).unwrap_or(1.0);
    if first < 0.0 { -v } else { v }
}

impl fmt::Display for SymInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_v3 = |v: &V3| format!("[{:.6}, {:.6}, {:.6}]", v[0], v[1], v[2]);

        write!(f, "{:?}", self.kind)?;
        if let Some(axis) = &self.axis {
            match self.kind {
                SymOpKind::Mirror | SymOpKind::Glide => write!(f, " normal {}", fmt_v3(axis))?,
                _ => write!(f, " {:.1} deg about {}", self.angle, fmt_v3(axis))?,
            }
        }
        match self.kind {
            SymOpKind::Translation | SymOpKind::Screw | SymOpKind::Glide => {
                write!(f, " by {}", fmt_v3(&self.intrinsic_translation))?;
            },
            _ => {},
        }
        if self.time_reversal {
            write!(f, " with time reversal")?;
        }
        Ok(())
    }
}
