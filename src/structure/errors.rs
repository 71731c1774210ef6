/* ************************************************************************ **
** This file is part of xtal, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use failure::Backtrace;

/// The lattice vectors are (nearly) linearly dependent.
#[derive(Debug, Fail)]
#[fail(display = "degenerate lattice (|det| = {:e} is within tolerance of zero)", det)]
pub struct DegenerateLatticeError {
    pub backtrace: Backtrace,
    pub det: f64,
}

/// A matrix that should have been integral was not.
#[derive(Debug, Fail)]
#[fail(display = "Not nearly an integer: {}", value)]
pub struct NonIntegerTransformationError {
    pub backtrace: Backtrace,
    pub value: f64,
}

/// The pieces of a crystal description do not fit together.
#[derive(Debug, Fail)]
#[fail(display = "inconsistent basis: {}", message)]
pub struct InconsistentBasisError {
    pub backtrace: Backtrace,
    pub message: String,
}

/// An internal invariant was broken while reducing to a primitive cell.
///
/// This always indicates a bug or badly conditioned input (e.g. a tolerance
/// so large that the set of lattice translations is not closed).
#[derive(Debug, Fail)]
#[fail(display = "primitive cell reduction failed: {}", message)]
pub struct ReductionError {
    pub backtrace: Backtrace,
    pub message: String,
}

/// A comparison landed in the ambiguous window between `tol` and `2 * tol`.
#[derive(Debug, Fail)]
#[fail(display = "ambiguous comparison: distance {:e} is within a factor of 2 of tolerance {:e}", distance, tol)]
pub struct ToleranceViolationError {
    pub backtrace: Backtrace,
    pub distance: f64,
    pub tol: f64,
}

/// A DoF type name that is not in the registry.
#[derive(Debug, Fail)]
#[fail(display = "unknown DoF type: {:?}", name)]
pub struct UnknownDoFTypeError {
    pub backtrace: Backtrace,
    pub name: String,
}

/// A tolerance that is not a positive finite number.
#[derive(Debug, Fail)]
#[fail(display = "tolerance must be a positive number (got {:e})", tol)]
pub struct InvalidToleranceError {
    pub backtrace: Backtrace,
    pub tol: f64,
}

/// A strain value that no deformation produces under its metric.
#[derive(Debug, Fail)]
#[fail(display = "{}: strain has no corresponding deformation (stretch eigenvalue {:e})", metric, eigenvalue)]
pub struct InvalidStrainError {
    pub backtrace: Backtrace,
    pub metric: String,
    pub eigenvalue: f64,
}

macro_rules! error_ctors {
    ($($Error:ident { $($field:ident : $T:ty),* };)*) => {$(
        impl $Error {
            pub(crate) fn new($($field: $T),*) -> Self
            { $Error { backtrace: Backtrace::new(), $($field),* } }
        }
    )*};
}

error_ctors! {
    DegenerateLatticeError { det: f64 };
    NonIntegerTransformationError { value: f64 };
    InconsistentBasisError { message: String };
    ReductionError { message: String };
    ToleranceViolationError { distance: f64, tol: f64 };
    UnknownDoFTypeError { name: String };
    InvalidToleranceError { tol: f64 };
    InvalidStrainError { metric: String, eigenvalue: f64 };
}

/// Any error produced by this crate.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{}", _0)]
    DegenerateLattice(#[cause] DegenerateLatticeError),
    #[fail(display = "{}", _0)]
    NonIntegerTransformation(#[cause] NonIntegerTransformationError),
    #[fail(display = "{}", _0)]
    InconsistentBasis(#[cause] InconsistentBasisError),
    #[fail(display = "{}", _0)]
    Reduction(#[cause] ReductionError),
    #[fail(display = "{}", _0)]
    ToleranceViolation(#[cause] ToleranceViolationError),
    #[fail(display = "{}", _0)]
    UnknownDoFType(#[cause] UnknownDoFTypeError),
    #[fail(display = "{}", _0)]
    InvalidTolerance(#[cause] InvalidToleranceError),
    #[fail(display = "{}", _0)]
    InvalidStrain(#[cause] InvalidStrainError),
}

macro_rules! impl_from_for_error {
    ($($Variant:ident($Inner:ident),)*) => {$(
        impl From<$Inner> for Error {
            fn from(e: $Inner) -> Self
            { Error::$Variant(e) }
        }
    )*};
}

impl_from_for_error! {
    DegenerateLattice(DegenerateLatticeError),
    NonIntegerTransformation(NonIntegerTransformationError),
    InconsistentBasis(InconsistentBasisError),
    Reduction(ReductionError),
    ToleranceViolation(ToleranceViolationError),
    UnknownDoFType(UnknownDoFTypeError),
    InvalidTolerance(InvalidToleranceError),
    InvalidStrain(InvalidStrainError),
}

pub type Result<T> = ::std::result::Result<T, Error>;

// FIXME copied from failure 1.0 prerelease; remove once actually released
macro_rules! throw {
    ($e:expr) => {
        { return Err(::std::convert::Into::into($e)); }
    }
}
