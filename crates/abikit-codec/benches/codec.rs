use abikit_codec::{Address, DecodingRules, EncodingRules, Method, Value};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn transfer(c: &mut Criterion) {
    let method = Method::from_signature("transfer(address to, uint256 amount)").unwrap();
    let args = Value::Tuple(vec![Value::Address(Address::from_bytes([0x11; 20])), Value::uint(1_000_000)]);
    let calldata = method.encode(&args).unwrap();

    c.bench_function("encode transfer", |b| b.iter(|| method.encode(black_box(&args)).unwrap()));
    c.bench_function("decode transfer", |b| b.iter(|| method.decode(black_box(&calldata)).unwrap()));
}

fn batch(c: &mut Criterion) {
    let method = Method::from_signature("batch((address,uint256,bytes)[] calls, string memo)").unwrap();
    let calls = (0..64)
        .map(|i| {
            Value::Tuple(vec![
                Value::Address(Address::from_bytes([i as u8; 20])),
                Value::uint(i as u128),
                Value::Bytes(vec![0xab; 100]),
            ])
        })
        .collect();
    let args = Value::Tuple(vec![Value::Array(calls), Value::string("nightly settlement")]);
    let calldata = method.encode(&args).unwrap();
    let optimize = EncodingRules { optimize: true, ..EncodingRules::default() };

    c.bench_function("encode batch", |b| b.iter(|| method.encode(black_box(&args)).unwrap()));
    c.bench_function("encode batch optimized", |b| {
        b.iter(|| method.encode_with(black_box(&args), &optimize).unwrap())
    });
    c.bench_function("decode batch", |b| {
        b.iter(|| method.decode_with(black_box(&calldata), &DecodingRules::default()).unwrap())
    });
}

criterion_group!(benches, transfer, batch);
criterion_main!(benches);
