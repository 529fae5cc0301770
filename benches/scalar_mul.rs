//! Compares the scalar multiplication strategies on the named curves.

use {
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion},
    ecsig::{
        groups::named::{secp256k1, secp256r1, sm2p256v1},
        mod_ring::RingRefExt,
        signature::{KeyPair, Scheme, Signer},
        EllipticCurve, Strategy,
    },
    rand::{rngs::StdRng, SeedableRng},
    ruint::aliases::U256,
};

fn curves() -> [(&'static str, EllipticCurve<U256>); 3] {
    [
        ("secp256r1", secp256r1()),
        ("secp256k1", secp256k1()),
        ("sm2p256v1", sm2p256v1()),
    ]
}

/// `k·G`, where fixed-base can use its table.
fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_mul_generator");
    let mut rng = StdRng::seed_from_u64(42);
    for (name, curve) in curves() {
        let k = curve.scalar_field().random_nonzero(&mut rng);
        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), name), &k, |b, k| {
                b.iter(|| black_box(strategy.mul_generator(&curve, *k)));
            });
        }
    }
    group.finish();
}

/// `k·P` for an arbitrary point, fixed-base falls back to double-and-add.
fn bench_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_mul_point");
    let mut rng = StdRng::seed_from_u64(43);
    for (name, curve) in curves() {
        let field = curve.scalar_field();
        let point = curve.generator() * field.random_nonzero(&mut rng);
        let k = field.random_nonzero(&mut rng);
        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), name), &k, |b, k| {
                b.iter(|| black_box(strategy.mul_scalar(point, *k)));
            });
        }
    }
    group.finish();
}

fn bench_sign_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign_verify");
    let mut rng = StdRng::seed_from_u64(44);
    let curve = secp256r1();
    let pair = KeyPair::generate(&curve, &mut rng);
    let k = curve.scalar_field().random_nonzero(&mut rng);
    for strategy in [Strategy::FixedBase, Strategy::Jacobian] {
        let signer = Signer::new(&curve).with_strategy(strategy);
        for scheme in Scheme::ALL {
            let signature = signer.sign(scheme, pair.private, b"benchmark", k).unwrap();
            let id = format!("{scheme}/{strategy}");
            group.bench_function(BenchmarkId::new("sign", &id), |b| {
                b.iter(|| black_box(signer.sign(scheme, pair.private, b"benchmark", k)));
            });
            group.bench_function(BenchmarkId::new("verify", &id), |b| {
                b.iter(|| black_box(signer.verify(scheme, b"benchmark", &signature, pair.public)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generator, bench_point, bench_sign_verify);
criterion_main!(benches);
