/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::settings::*;
use failure::Error;
use xtal_structure::Comparator;

impl Settings {
    /// Check the values that serde cannot check on its own.
    pub fn validate(self) -> Result<Settings, Error> {
        Comparator::try_new(self.tolerance)?;
        if self.tolerance > 0.1 {
            warn!("tolerance {} is unusually large for a cartesian distance", self.tolerance);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use crate::*;

    fn init_logger() {
        let _ = ::env_logger::try_init();
    }

    #[test]
    fn defaults() {
        init_logger();
        let settings = Settings::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(settings.threading, Threading::Rayon);
        assert_eq!(settings.occupant_order, OccupantOrder::Insensitive);
    }

    #[test]
    fn kebab_case() {
        init_logger();
        let settings = Settings::from_str("
tolerance: 1e-3
ambiguity: error
occupant-order: sensitive
threading: serial
").unwrap();
        assert_eq!(settings, Settings {
            tolerance: 1e-3,
            ambiguity: AmbiguityPolicy::Error,
            occupant_order: OccupantOrder::Sensitive,
            threading: Threading::Serial,
        });
    }

    #[test]
    fn unknown_keys_are_not_fatal() {
        init_logger();
        let settings = Settings::from_str("tolerence: 1e-3\nthreading: serial\n").unwrap();
        assert_eq!(settings.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(settings.threading, Threading::Serial);
    }

    #[test]
    fn bad_values() {
        init_logger();
        assert!(Settings::from_str("threading: lammps").is_err());
        assert!(Settings::from_str("tolerance: [1]").is_err());

        let settings = Settings::from_str("tolerance: -1.0").unwrap();
        assert!(settings.validate().is_err());
        let settings = Settings::from_str("tolerance: 0.0").unwrap();
        assert!(settings.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn prim_document() {
        init_logger();
        let spec = PrimSpec::from_str("
lattice-vectors:
  - [2.0, 0.0, 0.0]
  - [0.0, 2.0, 0.0]
  - [0.0, 0.0, 2.0]
coordinate-mode: cartesian
basis:
  - coordinate: [1.0, 1.0, 1.0]
    occupants: [A, B]
    dofs:
      - type: disp
global-dof:
  - type: GLstrain
").unwrap();
        let prim = spec.build(1e-5).unwrap();
        assert_eq!(prim.num_sites(), 1);
        assert_eq!(prim.sites()[0].occ_dof, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(prim.global_dof().len(), 1);
    }
}
