// Helpers shared by the integration tests.
//
// Each test binary uses a different subset of these.
#![allow(dead_code)]

use xtal::{Prim, PrimSpec, Settings, CoordinateMode};
use xtal_array_types::{V3, M33, mat, vee};

use rand::Rng;

pub const TOL: f64 = 1e-5;

pub fn init_logger() {
    let _ = env_logger::try_init();
}

pub fn resource(name: &str) -> String
{ format!("tests/resources/{}", name) }

pub fn load_prim(name: &str) -> Prim
{
    init_logger();
    xtal::load_prim(resource(name), &Settings::default()).unwrap()
}

/// A random integer matrix of determinant 1, built from elementary shears.
pub fn random_unimodular() -> M33<i32>
{
    let mut rng = rand::thread_rng();
    let mut out = mat::from_array([[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
    for _ in 0..4 {
        let r = rng.gen_range(0, 3);
        let c = (r + rng.gen_range(1, 3)) % 3;
        let mut shear = mat::from_array([[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        shear[r][c] = rng.gen_range(-1, 2);
        out = &shear * &out;
    }
    assert_eq!(out.det(), 1);
    out
}

pub fn random_cart_shift() -> V3
{ vee::from_fn(|_| rand::random::<f64>() * 2.0 - 1.0) }

/// Rewrite a prim in cartesian coordinates with new lattice vectors
/// `U L`, the origin shifted by `shift`, and the sites listed in a
/// random order.  The result describes the same crystal.
pub fn redescribe(prim: &Prim, unimodular: &M33<i32>, shift: &V3) -> Prim
{
    let lattice = prim.lattice();
    let new_lattice = lattice.linear_combination(unimodular);

    let mut spec = prim.to_spec();
    spec.lattice_vectors = new_lattice.matrix().into_array();
    spec.coordinate_mode = CoordinateMode::Cartesian;
    for site in &mut spec.basis {
        let cart = lattice.fractional_to_cartesian(&V3(site.coordinate)) + shift;
        site.coordinate = cart.into_array();
    }
    rand::thread_rng().shuffle(&mut spec.basis);
    build(&spec)
}

pub fn build(spec: &PrimSpec) -> Prim
{ spec.build(TOL).unwrap() }
