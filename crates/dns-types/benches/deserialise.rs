use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::net::Ipv4Addr;

use dns_types::protocol::types::test_util::*;
use dns_types::protocol::types::*;

#[allow(non_snake_case)]
fn bench__question(c: &mut Criterion) {
    let message = message(
        1234,
        0x0100,
        vec![question("www.example.com.", QueryType::Record(RecordType::A))],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    );

    let serialised = message.to_octets().unwrap();
    c.bench_function("deserialise/question", |b| {
        b.iter(|| Message::from_octets(black_box(&serialised)))
    });
}

#[allow(non_snake_case)]
fn bench__answer__small(c: &mut Criterion) {
    let message = message(
        1234,
        0x8180,
        vec![question("www.example.com.", QueryType::Record(RecordType::A))],
        vec![a_record("www.example.com.", Ipv4Addr::new(1, 1, 1, 1))],
        Vec::new(),
        Vec::new(),
    );

    let serialised = message.to_octets().unwrap();
    c.bench_function("deserialise/answer/small", |b| {
        b.iter(|| Message::from_octets(black_box(&serialised)))
    });
}

#[allow(non_snake_case)]
fn bench__answer__big(c: &mut Criterion) {
    let mut answers = Vec::with_capacity(256);
    for i in 0..64 {
        answers.push(a_record("www.example.com.", Ipv4Addr::new(1, 1, 1, i)));
        answers.push(record(
            "www.example.com.",
            RecordType::CNAME,
            &[3, b'w', b'e', b'b', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'n', b'e', b't', 0],
        ));
        answers.push(record("example.com.", RecordType::MX, &[0, 10, 0b1100_0000, 12]));
        answers.push(unknown_record("example.com.", &[0; 32]));
    }

    let message = message(
        1234,
        0x8180,
        vec![question("www.example.com.", QueryType::Wildcard)],
        answers,
        Vec::new(),
        Vec::new(),
    );

    let serialised = message.to_octets().unwrap();
    c.bench_function("deserialise/answer/big", |b| {
        b.iter(|| Message::from_octets(black_box(&serialised)))
    });
}

#[allow(non_snake_case)]
fn bench__pointer_chain(c: &mut Criterion) {
    // the first record's RDATA holds a chain of names, each one label
    // in front of a pointer to the previous name.  The second record's
    // name points at the end of the chain.
    let mut chain = vec![1, b'a', 0];
    let mut previous = HEADER_LEN + RDATA_OFFSET;
    for _ in 0..100 {
        let here = HEADER_LEN + RDATA_OFFSET + chain.len();
        let [hi, lo] = u16::try_from(previous).unwrap().to_be_bytes();
        chain.extend_from_slice(&[1, b'a', hi | 0b1100_0000, lo]);
        previous = here;
    }

    let mut octets = vec![0x12, 0x34, 0x81, 0x80, 0, 0, 0, 2, 0, 0, 0, 0];
    let [hi, lo] = u16::try_from(chain.len()).unwrap().to_be_bytes();
    octets.extend_from_slice(&[0, 0, 100, 0, 1, 0, 0, 0, 0, hi, lo]);
    octets.extend_from_slice(&chain);
    let [hi, lo] = u16::try_from(previous).unwrap().to_be_bytes();
    octets.extend_from_slice(&[hi | 0b1100_0000, lo, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0]);

    c.bench_function("deserialise/pointer_chain", |b| {
        b.iter(|| Message::from_octets(black_box(&octets)))
    });
}

/// Where the RDATA starts in a record with the root name.
const RDATA_OFFSET: usize = 11;

criterion_group!(
    benches,
    bench__question,
    bench__answer__small,
    bench__answer__big,
    bench__pointer_chain
);
criterion_main!(benches);
