// Curve, codec and cipher benchmarks for the rollup core.
//
// Covers BabyJubjub scalar multiplication, point (de)compression on both
// curves, MiMC hashing, KEM-DEM encryption and a full commitment
// decryption attempt.

use ark_bn254::{Fr, G1Projective, G2Projective};
use ark_ec::CurveGroup;
use ark_ff::UniformRand;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twilight_protocol::commitment::{encrypt_secrets, sync::try_decrypt, Commitment};
use twilight_protocol::config::GENERATOR;
use twilight_protocol::crypto::{encrypt, gen_ephemeral_keys, mimc_hash, ZkpKeys};
use twilight_protocol::curve::{
    compress_g1, compress_g2, decompress_g1, decompress_g2, edwards_compress, edwards_decompress,
    scalar_mult, Scalar,
};
use twilight_protocol::field::Word;
use twilight_protocol::transaction::{TransactionBuilder, TransactionType};

fn bench_scalar_mult(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let k = Scalar::rand(&mut rng);

    c.bench_function("babyjubjub/scalar_mult", |b| {
        b.iter(|| scalar_mult(&k, &GENERATOR));
    });
}

fn bench_edwards_compression(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let point = scalar_mult(&Scalar::rand(&mut rng), &GENERATOR).unwrap();
    let word = edwards_compress(&point);

    c.bench_function("babyjubjub/decompress", |b| {
        b.iter(|| edwards_decompress(&word));
    });
}

fn bench_pairing_compression(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let g1 = G1Projective::rand(&mut rng).into_affine();
    let g2 = G2Projective::rand(&mut rng).into_affine();
    let g1_word = compress_g1(&g1);
    let g2_words = compress_g2(&g2);

    let mut group = c.benchmark_group("bn254");
    group.bench_function("decompress_g1", |b| b.iter(|| decompress_g1(&g1_word)));
    group.bench_function("decompress_g2", |b| b.iter(|| decompress_g2(&g2_words)));
    group.finish();
}

fn bench_mimc(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let mut group = c.benchmark_group("mimc/hash");

    for len in [2usize, 6, 16] {
        let inputs: Vec<Fr> = (0..len).map(|_| Fr::rand(&mut rng)).collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &inputs, |b, inputs| {
            b.iter(|| mimc_hash(inputs));
        });
    }
    group.finish();
}

fn bench_kem_dem(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(5);
    let recipient = ZkpKeys::generate(&mut rng).unwrap();
    let (e, epub) = gen_ephemeral_keys(&mut rng).unwrap();
    let plaintexts: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut rng)).collect();

    c.bench_function("kem_dem/encrypt_4", |b| {
        b.iter(|| encrypt(&e, &epub, &recipient.pkd, &plaintexts));
    });
}

fn bench_try_decrypt(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(6);
    let owner = ZkpKeys::generate(&mut rng).unwrap();
    let commitment = Commitment::new(
        Word::from_u64(0xe7c),
        Word::ZERO,
        Word::from_u64(10),
        owner.pkd,
        Commitment::random_salt(&mut rng),
    );
    let tx = TransactionBuilder::new(TransactionType::SingleTransfer)
        .commitments(vec![commitment.hash, Word::ZERO])
        .encrypted_secrets(&encrypt_secrets(&commitment, &mut rng).unwrap())
        .build();
    let key = owner.wallet_key();

    c.bench_function("sync/try_decrypt", |b| {
        b.iter(|| try_decrypt(&tx, &key));
    });
}

criterion_group!(
    benches,
    bench_scalar_mult,
    bench_edwards_compression,
    bench_pairing_compression,
    bench_mimc,
    bench_kem_dem,
    bench_try_decrypt,
);
criterion_main!(benches);
