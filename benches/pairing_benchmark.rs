use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use bgn_pairing::elliptic_curve::EllipticCurve;
use bgn_pairing::field::{CubicExtensionField, PrimeField};
use bgn_pairing::integer::TrialDivision;
use bgn_pairing::pairing::{miller_function, modified_weil_pairing, weil_pairing};

fn bench_miller_function(c: &mut Criterion) {
    let curve = EllipticCurve::new(PrimeField::new(631).unwrap(), 30, 34).unwrap();
    let p = curve.point(36, 60).unwrap();
    let at = curve.add(&curve.point(121, 387).unwrap(), &curve.point(0, 36).unwrap());
    c.bench_function("miller_function_f631", |b| {
        b.iter(|| miller_function(&curve, black_box(&p), black_box(&at), 5))
    });
}

fn bench_weil_pairing(c: &mut Criterion) {
    let curve = EllipticCurve::new(PrimeField::new(631).unwrap(), 30, 34).unwrap();
    let p = curve.point(36, 60).unwrap();
    let q = curve.point(121, 387).unwrap();
    let s = curve.point(0, 36).unwrap();
    c.bench_function("weil_pairing_f631", |b| {
        b.iter(|| weil_pairing(&curve, black_box(&p), black_box(&q), 5, Some(&s)))
    });
}

fn bench_modified_weil_pairing(c: &mut Criterion) {
    let base = EllipticCurve::new(PrimeField::new(23).unwrap(), 0, 1).unwrap();
    let curve = EllipticCurve::new(CubicExtensionField::new(23).unwrap(), 0, 1).unwrap();
    let g = base.point(10, 9).unwrap();
    let s = curve.point(0, 1).unwrap();
    c.bench_function("modified_weil_pairing_f23", |b| {
        b.iter(|| modified_weil_pairing(&curve, black_box(&g), black_box(&g), 8, Some(&s)))
    });
}

fn bench_classification(c: &mut Criterion) {
    let curve = EllipticCurve::new(CubicExtensionField::new(5).unwrap(), 0, 1).unwrap();
    c.bench_function("classify_e_f5_alpha", |b| {
        b.iter(|| {
            let group = curve.as_group().unwrap();
            group.classify_finite_abelian_group(&TrialDivision)
        })
    });
}

criterion_group!(
    benches,
    bench_miller_function,
    bench_weil_pairing,
    bench_modified_weil_pairing,
    bench_classification
);
criterion_main!(benches);
