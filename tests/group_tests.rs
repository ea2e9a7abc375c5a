use bgn_pairing::elliptic_curve::{CurvePoint, EllipticCurve};
use bgn_pairing::field::{CubicExtensionField, FiniteField, PrimeField};
use bgn_pairing::integer::TrialDivision;

#[test]
fn test_classify_curve_over_prime_field() {
    let curve = EllipticCurve::new(PrimeField::new(5).unwrap(), 0, 1).unwrap();
    let group = curve.as_group().unwrap();
    assert_eq!(group.classify_finite_abelian_group(&TrialDivision).unwrap(), vec![2, 3]);
    assert_eq!(group.invariant_factors(&TrialDivision).unwrap(), vec![6]);
}

#[test]
fn test_classify_curve_over_extension_field() {
    let curve = EllipticCurve::new(CubicExtensionField::new(5).unwrap(), 0, 1).unwrap();
    let group = curve.as_group().unwrap();
    assert_eq!(group.order_of_group(), 36);
    assert_eq!(
        group.classify_finite_abelian_group(&TrialDivision).unwrap(),
        vec![2, 2, 3, 3]
    );
    assert_eq!(group.invariant_factors(&TrialDivision).unwrap(), vec![6, 6]);

    let curve = EllipticCurve::new(CubicExtensionField::new(11).unwrap(), 0, 1).unwrap();
    let group = curve.as_group().unwrap();
    assert_eq!(
        group.classify_finite_abelian_group(&TrialDivision).unwrap(),
        vec![4, 4, 3, 3]
    );
    assert_eq!(group.invariant_factors(&TrialDivision).unwrap(), vec![12, 12]);
}

#[test]
fn test_classify_silverman_curve() {
    let curve = EllipticCurve::new(PrimeField::new(631).unwrap(), 30, 34).unwrap();
    let group = curve.as_group().unwrap();
    assert_eq!(group.order_of_group(), 650);
    assert_eq!(
        group.classify_finite_abelian_group(&TrialDivision).unwrap(),
        vec![2, 5, 5, 13]
    );
    assert_eq!(group.invariant_factors(&TrialDivision).unwrap(), vec![5, 130]);
}

#[test]
fn test_classify_more_curves() {
    let cases: [(u64, i64, i64, Vec<u64>); 3] = [
        (7, 0, 1, vec![2, 2, 3]),
        (13, 0, 1, vec![2, 2, 3]),
        (7, 2, 3, vec![2, 3]),
    ];
    for (p, a, b, expected) in cases {
        let curve = EllipticCurve::new(PrimeField::new(p).unwrap(), a, b).unwrap();
        let group = curve.as_group().unwrap();
        let factors = group.classify_finite_abelian_group(&TrialDivision).unwrap();
        assert_eq!(factors, expected, "{curve}");
        assert_eq!(factors.iter().product::<u64>(), curve.cardinality());
    }
}

#[test]
fn test_torsion_of_silverman_curve() {
    let curve = EllipticCurve::new(PrimeField::new(631).unwrap(), 30, 34).unwrap();
    let group = curve.as_group().unwrap();
    let torsion = group.n_torsion_subgroup(5).unwrap();
    assert_eq!(torsion.order_of_group(), 25);

    // P and Q are independent 5-torsion points: together they span E[5]
    let p = curve.point(36, 60).unwrap();
    let q = curve.point(121, 387).unwrap();
    assert!(torsion.contains(&p) && torsion.contains(&q));
    let span = group.subgroup_generated_by(&[p.clone(), q]).unwrap();
    assert_eq!(span.order_of_group(), 25);
    let cyclic = group.cyclic_subgroup(&p).unwrap();
    assert_eq!(cyclic.order_of_group(), 5);
    assert_eq!(cyclic.elements()[0], CurvePoint::Infinity);
}

#[test]
fn test_quotient_of_curve_group() {
    let curve = EllipticCurve::new(PrimeField::new(5).unwrap(), 0, 1).unwrap();
    let group = curve.as_group().unwrap();
    let two_torsion = group.n_torsion_subgroup(2).unwrap();
    assert_eq!(two_torsion.order_of_group(), 2);

    let quotient = group.quotient_group(&two_torsion).unwrap();
    assert_eq!(quotient.order_of_group(), 3);
    for coset in quotient.elements() {
        assert_eq!(coset.len(), 2);
    }
    assert_eq!(
        quotient.classify_finite_abelian_group(&TrialDivision).unwrap(),
        vec![3]
    );
}

#[test]
fn test_nontrivial_element_of_curve_group() {
    let curve = EllipticCurve::new(PrimeField::new(5).unwrap(), 0, 1).unwrap();
    let group = curve.as_group().unwrap();
    let element = group.get_nontrivial_element().unwrap();
    assert_eq!(element, curve.point(4, 0).unwrap());
    assert_eq!(group.order(&element).unwrap(), 2);
}

#[test]
fn test_cube_roots_of_unity_in_extension_field() {
    let f5 = CubicExtensionField::new(5).unwrap();
    let alpha = f5.alpha();
    let roots = f5.group_nth_roots(3).unwrap();
    assert_eq!(roots.order_of_group(), 3);
    assert!(roots.contains(&f5.one()));
    assert!(roots.contains(&alpha));
    assert!(roots.contains(&(alpha.clone() * alpha.clone())));
    assert_eq!(roots.order(&alpha).unwrap(), 3);
    assert_eq!(
        roots.classify_finite_abelian_group(&TrialDivision).unwrap(),
        vec![3]
    );
}
