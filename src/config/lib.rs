/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#![allow(non_snake_case)]

// Crate where the serde_yaml code for xtal's settings is monomorphized.
//
// The functions here also make use of serde_ignored to catch typos in the config.

// NOTE: Please use the YamlRead trait to read these types.
//       Don't call serde_yaml::from_{reader,str,value} outside this crate.

#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;
extern crate serde;
extern crate serde_ignored;

extern crate xtal_structure;

#[macro_use]
extern crate log;
extern crate failure;

use std::io::Read;
use failure::Error;

pub use crate::settings::*;
pub use xtal_structure::{PrimSpec, AmbiguityPolicy, OccupantOrder, Threading};
mod settings;
mod validation;

/// Provides an alternative to `serde_yaml::from_reader` where all of the
/// expensive codegen has already been performed in this crate.
///
/// It also uses `serde_ignored` to warn on unrecognized keys.
pub trait YamlRead: for <'de> serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_str(s: &str) -> Result<Self, Error>
    { YamlRead::from_dyn_reader(&mut s.as_bytes()) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, Error> {
        // serde_ignored needs a Deserializer, and serde_yaml only offers one
        // for Value.  Going through Value also loses the detail of any error,
        // so on failure the text is parsed again without serde_ignored.
        let mut s = String::new();
        r.read_to_string(&mut s)?;

        let value = value_from_str(&s)?;
        match Self::__serde_ignored__from_value(value) {
            Ok(out) => Ok(out),
            Err(e) => match Self::__serde_yaml__from_str(&s) {
                Err(better) => Err(better),
                // very unlikely; the two disagree
                Ok(_) => Err(e),
            },
        }
    }

    #[doc(hidden)]
    fn __serde_ignored__from_value(value: serde_yaml::Value) -> Result<Self, Error>;
    #[doc(hidden)]
    fn __serde_yaml__from_str(s: &str) -> Result<Self, Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        // NOTE: Moving these bodies into default fn definitions on the trait
        //       makes codegen lazy, which defeats the purpose of this crate.
        impl YamlRead for $Type {
            fn __serde_ignored__from_value(value: serde_yaml::Value) -> Result<$Type, Error> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                ).map_err(Into::into)
            }

            fn __serde_yaml__from_str(s: &str) -> Result<$Type, Error> {
                serde_yaml::from_str(s).map_err(Into::into)
            }
        }
    };
}

derive_yaml_read!{serde_yaml::Value}
derive_yaml_read!{Settings}
derive_yaml_read!{PrimSpec}

// (this also exists solely for codegen reasons)
fn value_from_str(s: &str) -> Result<serde_yaml::Value, Error>
{ serde_yaml::from_str(s).map_err(Into::into) }
