#[macro_use] extern crate xtal_assert_close;
extern crate xtal;
extern crate xtal_array_types;
extern crate env_logger;
extern crate rand;

mod shared;
use self::shared::{load_prim, redescribe, resource, TOL};

use xtal::{Comparator, SymOpKind};
use xtal_array_types::{V3, mat};
use xtal::config;

#[test]
fn simple_cubic_binary() {
    let prim = load_prim("simple-cubic-binary.yaml");

    let point_group = xtal::enumerate_point_group(prim.lattice(), TOL).unwrap();
    assert_eq!(point_group.len(), 48);
    assert_eq!(point_group[0].matrix(), xtal::SymOp::eye().matrix());

    let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
    assert_eq!(factor_group.len(), 48);
    assert!(factor_group.iter().all(|op| !op.time_reversal()));

    assert_eq!(xtal::asymmetric_unit_indices(&prim, TOL).unwrap(), vec![vec![0]]);
}

#[test]
fn conventional_bcc_binary() {
    let prim = load_prim("bcc-conventional-binary.yaml");

    let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
    assert_eq!(factor_group.len(), 96);
    assert_eq!(xtal::make_crystal_point_group(&factor_group, TOL).unwrap().len(), 48);

    let translations: Vec<_> = factor_group.iter()
        .map(|op| xtal::sym_info(op, prim.lattice(), TOL).unwrap())
        .filter(|info| info.kind == SymOpKind::Translation)
        .collect();
    assert_eq!(translations.len(), 1);
    assert_close!(abs=1e-9, translations[0].intrinsic_translation, V3([0.5, 0.5, 0.5]));

    assert_eq!(xtal::asymmetric_unit_indices(&prim, TOL).unwrap(), vec![vec![0, 1]]);
}

#[test]
fn binary_sites_along_one_axis() {
    let prim = xtal::Prim::builder(xtal::Lattice::cubic(1.0))
        .site(V3([0.0, 0.0, 0.0]), &["A", "B"])
        .site(V3([0.5, 0.0, 0.0]), &["A", "B"])
        .build().unwrap();

    // 4/mmm about x, each with and without the half translation
    assert_eq!(xtal::compute_factor_group(&prim, TOL).unwrap().len(), 32);
    assert_eq!(xtal::asymmetric_unit_indices(&prim, TOL).unwrap(), vec![vec![0, 1]]);
}

#[test]
fn primitive_of_conventional_bcc() {
    let prim = load_prim("bcc-conventional-binary.yaml");
    let primitive = xtal::make_primitive(&prim, TOL).unwrap();
    assert_eq!(primitive.num_sites(), 1);
    assert_close!(rel=1e-9, primitive.lattice().volume(), 0.5);
    assert_eq!(xtal::compute_factor_group(&primitive, TOL).unwrap().len(), 48);

    assert!(xtal::is_same_crystal(&prim, &primitive, TOL).unwrap());
    assert!(!xtal::is_same_crystal(&prim, &load_prim("simple-cubic-binary.yaml"), TOL).unwrap());
}

#[test]
fn perovskite_orbits() {
    let prim = load_prim("perovskite.yaml");
    assert_eq!(xtal::compute_factor_group(&prim, TOL).unwrap().len(), 48);
    assert_eq!(
        xtal::asymmetric_unit_indices(&prim, TOL).unwrap(),
        vec![vec![0], vec![1], vec![2, 3, 4]],
    );
}

#[test]
fn simple_cubic_ising() {
    let prim = load_prim("simple-cubic-ising.yaml");
    let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
    assert_eq!(factor_group.len(), 96);
    assert_eq!(factor_group.iter().filter(|op| op.time_reversal()).count(), 48);
    assert_eq!(xtal::make_crystal_point_group(&factor_group, TOL).unwrap().len(), 96);
}

#[test]
fn simple_cubic_1d_disp() {
    let prim = load_prim("simple-cubic-1d-disp.yaml");
    let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
    assert_eq!(factor_group.len(), 16);

    // everything maps the z axis onto itself
    for op in &factor_group {
        assert_close!(abs=1e-9, op.matrix()[2][2].abs(), 1.0);
    }
    assert!(!xtal::is_same_crystal(&prim, &load_prim("simple-cubic-binary.yaml"), TOL).unwrap());
}

#[test]
fn nonprimitive_manydof() {
    let prim = load_prim("nonprimitive-manydof.yaml");
    assert_eq!(prim.num_sites(), 2);

    let primitive = xtal::make_primitive(&prim, TOL).unwrap();
    assert_eq!(primitive.num_sites(), 1);
    assert_close!(rel=1e-9, primitive.lattice().volume(), 1.0);
    assert_eq!(primitive.global_dof(), prim.global_dof());
    assert_eq!(primitive.sites()[0].local_dof, prim.sites()[0].local_dof);
}

#[test]
fn hcp_binary() {
    let prim = load_prim("hcp-binary.yaml");
    assert_eq!(xtal::enumerate_point_group(prim.lattice(), TOL).unwrap().len(), 24);
    assert_eq!(xtal::compute_factor_group(&prim, TOL).unwrap().len(), 24);
    assert_eq!(xtal::asymmetric_unit_indices(&prim, TOL).unwrap(), vec![vec![0, 1]]);
    assert_eq!(xtal::make_primitive(&prim, TOL).unwrap().num_sites(), 2);

    // the same crystal, with a 60 degree basis and a shifted origin
    let acute = mat::from_array([[1, 0, 0], [1, 1, 0], [0, 0, 1]]);
    let other = redescribe(&prim, &acute, &V3([0.3, -0.2, 1.1]));
    let canonical = xtal::make_canonical(&prim, TOL).unwrap();
    assert!(canonical.is_same_prim(&xtal::make_canonical(&other, TOL).unwrap(), &Comparator::new(TOL)).unwrap());
    assert!(xtal::is_same_crystal(&prim, &other, TOL).unwrap());
}

#[test]
fn monoclinic_ternary() {
    let prim = load_prim("monoclinic-ternary.yaml");
    assert_eq!(xtal::enumerate_point_group(prim.lattice(), TOL).unwrap().len(), 4);
    assert_eq!(xtal::compute_factor_group(&prim, TOL).unwrap().len(), 1);
    assert_eq!(xtal::asymmetric_unit_indices(&prim, TOL).unwrap(), vec![vec![0], vec![1], vec![2]]);

    // b and c negated: still reduced, but not a rotation of the original
    let flipped = mat::from_array([[1, 0, 0], [0, -1, 0], [0, 0, -1]]);
    let other = redescribe(&prim, &flipped, &V3([0.0; 3]));
    let canonical = xtal::make_canonical(&prim, TOL).unwrap();
    assert!(canonical.is_same_prim(&xtal::make_canonical(&other, TOL).unwrap(), &Comparator::new(TOL)).unwrap());
    assert!(xtal::is_same_crystal(&prim, &other, TOL).unwrap());
}

#[test]
fn superstructure_and_back() {
    let prim = load_prim("perovskite.yaml");
    let sc = xtal::make_superstructure(&[[1, 1, 0], [-1, 1, 0], [0, 0, 2]], &prim, TOL).unwrap();
    assert_eq!(sc.num_sites(), 20);
    assert_close!(rel=1e-9, sc.lattice().volume(), 4.0);

    let primitive = xtal::make_primitive(&sc, TOL).unwrap();
    assert_eq!(primitive.num_sites(), 5);
    assert!(xtal::is_same_crystal(&sc, &prim, TOL).unwrap());
}

#[test]
fn settings_file() {
    shared::init_logger();
    let settings = xtal::load_settings(resource("settings.yaml")).unwrap();
    assert_eq!(settings.threading, config::Threading::Serial);

    let prim = xtal::load_prim(resource("simple-cubic-ising.yaml"), &settings).unwrap();
    assert_eq!(xtal::compute_factor_group_with(&prim, &settings).unwrap().len(), 96);
    assert_eq!(xtal::asymmetric_unit_indices_with(&prim, &settings).unwrap(), vec![vec![0]]);

    let mut sensitive = settings.clone();
    sensitive.occupant_order = config::OccupantOrder::Sensitive;
    // swapping up and down reverses the occupant list
    assert_eq!(xtal::compute_factor_group_with(&prim, &sensitive).unwrap().len(), 48);

    assert!(xtal::load_settings(resource("no-such-file.yaml")).is_err());
}
