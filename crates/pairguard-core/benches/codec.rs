//! Token pair codec benchmarks.
//!
//! Run with: `cargo bench -p pairguard-core --bench codec`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pairguard_core::{issue_pair, validate_pair, Identity, OriginIp, Secret, TokenPair};

const NOW: i64 = 1_700_000_000;

fn inputs() -> (Secret, Identity, OriginIp) {
    (
        Secret::from_bytes([0u8; 32]),
        Identity::new("11111111-1111-1111-1111-111111111111"),
        OriginIp::from(std::net::IpAddr::from([10, 0, 0, 1])),
    )
}

fn bench_issue_pair(c: &mut Criterion) {
    let (secret, subject, ip) = inputs();

    c.bench_function("issue_pair", |b| {
        b.iter(|| {
            let pair = issue_pair(&secret, black_box(&subject), black_box(&ip), NOW);
            black_box(pair)
        })
    });
}

fn bench_validate_pair(c: &mut Criterion) {
    let (secret, subject, ip) = inputs();
    let pair = issue_pair(&secret, &subject, &ip, NOW).expect("issue");

    c.bench_function("validate_pair", |b| {
        b.iter(|| {
            let result = validate_pair(&secret, black_box(&pair));
            black_box(result)
        })
    });
}

/// Cross-paired input fails at the AEAD tag, after the signature check.
fn bench_validate_cross_pair(c: &mut Criterion) {
    let (secret, subject, ip) = inputs();
    let a = issue_pair(&secret, &subject, &ip, NOW).expect("issue");
    let b_pair = issue_pair(&secret, &subject, &ip, NOW).expect("issue");
    let mixed = TokenPair::new(a.access().to_string(), b_pair.refresh().to_string());

    c.bench_function("validate_cross_pair", |b| {
        b.iter(|| {
            let result = validate_pair(&secret, black_box(&mixed));
            black_box(result)
        })
    });
}

fn bench_envelope(c: &mut Criterion) {
    let (secret, subject, ip) = inputs();
    let pair = issue_pair(&secret, &subject, &ip, NOW).expect("issue");
    let json = pair.to_json().expect("serialize");

    c.bench_function("envelope_parse", |b| {
        b.iter(|| {
            let parsed = TokenPair::from_json(black_box(&json));
            black_box(parsed)
        })
    });
}

criterion_group!(
    benches,
    bench_issue_pair,
    bench_validate_pair,
    bench_validate_cross_pair,
    bench_envelope,
);
criterion_main!(benches);
