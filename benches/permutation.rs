#[macro_use]
extern crate criterion;
extern crate fake;
extern crate ipshuffle;

use criterion::Criterion;
use fake::faker::internet::raw::IPv4;
use fake::locales::EN;
use fake::Fake;
use ipshuffle::{AddressRange, RangePermutation};

use std::net::{IpAddr, Ipv4Addr};

// /24-sized range around a random fake address
#[must_use]
pub fn random_v4_range() -> AddressRange {
    let val: String = IPv4(EN).fake();
    let start: Ipv4Addr = val.parse().unwrap();
    let base = u32::from(start) & 0xffff_ff00;
    AddressRange::new(
        IpAddr::V4(Ipv4Addr::from(base)),
        IpAddr::V4(Ipv4Addr::from(base | 0xff)),
    )
    .unwrap()
}

pub fn drain(range: AddressRange) -> usize {
    let mut permutation = RangePermutation::new(range);
    let mut count = 0;
    loop {
        let (_, done) = permutation.next();
        count += 1;
        if done {
            break;
        }
    }
    count
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let v4 = random_v4_range();
    c.bench_function("drain_v4_256", |b| b.iter(|| drain(v4)));
}

pub fn criterion_v6_benchmark(c: &mut Criterion) {
    let v6 = AddressRange::new(
        "2001:db8::".parse().unwrap(),
        "2001:db8::ff".parse().unwrap(),
    )
    .unwrap();
    c.bench_function("drain_v6_256", |b| b.iter(|| drain(v6)));
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10);

    targets = criterion_benchmark, criterion_v6_benchmark
}
criterion_main!(benches);
