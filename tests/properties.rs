extern crate xtal;
extern crate xtal_array_types;
extern crate env_logger;
extern crate rand;

mod shared;
use self::shared::{load_prim, redescribe, random_unimodular, random_cart_shift, TOL};

use xtal::{Comparator, Prim};

const FIXTURES: &[&str] = &[
    "simple-cubic-binary.yaml",
    "bcc-conventional-binary.yaml",
    "perovskite.yaml",
    "simple-cubic-ising.yaml",
    "simple-cubic-1d-disp.yaml",
    "nonprimitive-manydof.yaml",
    "hcp-binary.yaml",
    "monoclinic-ternary.yaml",
    "tetragonal-binary.yaml",
    "triclinic-binary.yaml",
];

fn fixtures() -> Vec<(&'static str, Prim)>
{ FIXTURES.iter().map(|&name| (name, load_prim(name))).collect() }

fn cmp() -> Comparator
{ Comparator::new(TOL) }

#[test]
fn canonical_form_is_idempotent() {
    for (name, prim) in fixtures() {
        let once = xtal::make_canonical(&prim, TOL).unwrap();
        let twice = xtal::make_canonical(&once, TOL).unwrap();
        assert!(once.is_same_prim(&twice, &cmp()).unwrap(), "{}", name);

        let lattice = xtal::make_canonical(prim.lattice(), TOL).unwrap();
        let again = xtal::make_canonical(&lattice, TOL).unwrap();
        assert!((lattice.matrix() - again.matrix()).max_abs() < 1e-9, "{}", name);
    }
}

#[test]
fn canonical_form_ignores_description() {
    for (name, prim) in fixtures() {
        let expected = xtal::make_canonical(&prim, TOL).unwrap();
        for _ in 0..8 {
            let other = redescribe(&prim, &random_unimodular(), &random_cart_shift());
            let actual = xtal::make_canonical(&other, TOL).unwrap();
            assert!(expected.is_same_prim(&actual, &cmp()).unwrap(), "{}", name);
            assert!(xtal::is_same_crystal(&prim, &other, TOL).unwrap(), "{}", name);
        }
    }
}

#[test]
fn canonical_form_ignores_symmetry_operations() {
    for (name, prim) in fixtures() {
        let expected = xtal::make_canonical(&prim, TOL).unwrap();
        let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
        for op in factor_group.iter().step_by(7) {
            let image = xtal::apply(op, &prim, TOL).unwrap();
            let actual = xtal::make_canonical(&image, TOL).unwrap();
            assert!(expected.is_same_prim(&actual, &cmp()).unwrap(), "{}: {:?}", name, op);
        }
    }
}

#[test]
fn factor_groups_are_closed() {
    for (name, prim) in fixtures() {
        let factor_group = xtal::compute_factor_group(&prim, TOL).unwrap();
        let lattice = prim.lattice();
        let contains = |op: &xtal::SymOp| {
            factor_group.iter().any(|x| x.periodic_eq(op, lattice, &cmp()).unwrap())
        };
        for a in &factor_group {
            assert!(contains(&a.inverted()), "{}", name);
            for b in factor_group.iter().step_by(5) {
                assert!(contains(&a.then(b)), "{}", name);
            }
        }
        assert!(factor_group.len() <= 96, "{}", name);
    }
}

#[test]
fn primitive_cells() {
    for (name, prim) in fixtures() {
        let primitive = xtal::make_primitive(&prim, TOL).unwrap();
        assert_eq!(prim.num_sites() % primitive.num_sites(), 0, "{}", name);

        let ratio = prim.num_sites() / primitive.num_sites();
        let volume_ratio = prim.lattice().volume() / primitive.lattice().volume();
        assert!((volume_ratio - ratio as f64).abs() < 1e-8, "{}", name);

        let again = xtal::make_primitive(&primitive, TOL).unwrap();
        assert_eq!(again, primitive, "{}", name);
    }
}

#[test]
fn orbits_partition_the_basis() {
    for (name, prim) in fixtures() {
        let orbits = xtal::asymmetric_unit_indices(&prim, TOL).unwrap();
        let mut seen: Vec<usize> = orbits.iter().flat_map(|orbit| orbit.iter().cloned()).collect();
        seen.sort();
        assert_eq!(seen, (0..prim.num_sites()).collect::<Vec<_>>(), "{}", name);

        for orbit in &orbits {
            assert!(orbit.windows(2).all(|w| w[0] < w[1]), "{}", name);
        }
        assert!(orbits.windows(2).all(|w| w[0][0] < w[1][0]), "{}", name);
    }
}

#[test]
fn documents_round_trip() {
    for (name, prim) in fixtures() {
        let rebuilt = prim.to_spec().build(TOL).unwrap();
        assert_eq!(rebuilt, prim, "{}", name);

        // the canonical form is a fixed point through its document form
        let canonical = xtal::make_canonical(&prim, TOL).unwrap();
        let rebuilt = canonical.to_spec().build(TOL).unwrap();
        let again = xtal::make_canonical(&rebuilt, TOL).unwrap();
        assert!(canonical.is_same_prim(&again, &cmp()).unwrap(), "{}", name);
    }
}
