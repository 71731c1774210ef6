/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use xtal_structure::{AmbiguityPolicy, OccupantOrder, Threading};

pub use xtal_structure::DEFAULT_TOLERANCE;

/// Root settings object.
///
/// Every field may be omitted.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Cartesian distance below which two points are considered equal.
    ///
    /// Used for every comparison of a computation: positions, lattice
    /// vectors, DoF bases, and occupant properties.
    #[serde(default = "settings__tolerance")]
    pub tolerance: f64,

    /// What to do with distances between `tolerance` and twice `tolerance`.
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,

    /// Whether two sites with the same occupants listed in a different order
    /// are equivalent.
    #[serde(default)]
    pub occupant_order: OccupantOrder,

    #[serde(default)]
    pub threading: Threading,
}
fn settings__tolerance() -> f64 { DEFAULT_TOLERANCE }

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tolerance: settings__tolerance(),
            ambiguity: Default::default(),
            occupant_order: Default::default(),
            threading: Default::default(),
        }
    }
}
