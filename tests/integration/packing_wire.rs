#![allow(missing_docs)]

use std::sync::Once;

use keypack::primitives::bytes::buf::Cursor;
use keypack::primitives::packing::{
    compress_integrated, decompress_integrated, estimate_compressed_array_length,
};
use keypack::storage::datatype::{IntDataType, KeyableDataType, LongDataType};
use keypack::storage::keys::{IntKeyManager, KeyManager, LongKeyManager};
use keypack::{KeyError, KeyManagerOptions};
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("keypack=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

fn encode(keys: &dyn KeyManager<i32>) -> Vec<u8> {
    let mut buf = Vec::new();
    keys.write(keys.key_count(), &mut buf).unwrap();
    buf
}

#[test]
fn one_aligned_block_of_unit_deltas() {
    init_tracing();
    let keys = IntKeyManager::new((1..=32).collect());
    assert_eq!(
        encode(&keys),
        [2, 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff],
        "word count, header, then one full word of ones"
    );
}

#[test]
fn prefix_key_becomes_frame_of_reference() {
    init_tracing();
    let keys = IntKeyManager::new((5..=37).collect());
    assert_eq!(encode(&keys), [5, 2, 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff]);
}

#[test]
fn long_words_are_eight_bytes_big_endian() {
    init_tracing();
    let keys = LongKeyManager::new((1..=64).collect());
    let mut buf = Vec::new();
    keys.write(64, &mut buf).unwrap();
    let mut expected = vec![2u8, 0, 0, 0, 0, 0, 0, 0, 1];
    expected.extend([0xff; 8]);
    assert_eq!(buf, expected);
}

#[test]
fn full_width_block_stores_raw_keys() {
    init_tracing();
    let keys = IntKeyManager::new((0..32).map(|i| i32::MIN + i).collect());
    let buf = encode(&keys);
    assert_eq!(buf[0], 33, "header plus 32 raw words");
    assert_eq!(&buf[1..5], [0, 0, 0, 32]);
    assert_eq!(&buf[5..9], [0x80, 0, 0, 0]);
    assert_eq!(&buf[9..13], [0x80, 0, 0, 1]);
    assert_eq!(buf.len(), 1 + 33 * 4);
    let decoded =
        IntKeyManager::read(&mut Cursor::new(&buf), 32, &KeyManagerOptions::default()).unwrap();
    assert_eq!(decoded, keys);
}

#[test]
fn zero_width_block_repeats_the_frame() {
    let packed = [0i32];
    let mut out = [0i32; 32];
    assert_eq!(decompress_integrated(&packed, 7, &mut out).unwrap(), 1);
    assert!(out.iter().all(|&k| k == 7));
}

#[test]
fn four_blocks_share_one_header() {
    let keys: Vec<u32> = (1..=128).map(|i| i * 2).collect();
    let len = estimate_compressed_array_length(&keys, 0);
    let mut packed = vec![0u32; len];
    assert_eq!(compress_integrated(&keys, 0, &mut packed), len);
    assert_eq!(packed[0], 2 << 24 | 2 << 16 | 2 << 8 | 2);
    assert_eq!(len, 1 + 4 * 2);
}

#[test]
fn every_truncation_is_an_error() {
    init_tracing();
    let keys = IntDataType
        .create_manager_from((0..129).map(|i| i * 1_001).collect())
        .unwrap();
    let buf = encode(keys.as_ref());
    for cut in 0..buf.len() {
        let res = IntDataType.create_manager(&mut Cursor::new(&buf[..cut]), 129);
        assert!(res.is_err(), "prefix of {cut} bytes decoded");
    }
}

#[test]
fn oversized_width_is_corruption() {
    // one aligned block: word count 2, header claims width 40
    let buf = [2u8, 0, 0, 0, 40, 0, 0, 0, 0];
    let err = IntKeyManager::read(&mut Cursor::new(&buf), 32, &KeyManagerOptions::default())
        .unwrap_err();
    assert!(matches!(err, KeyError::Corruption(_)));
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(
        buf in proptest::collection::vec(any::<u8>(), 0..600),
        count in 0usize..200,
    ) {
        let opts = KeyManagerOptions::verifying();
        let _ = IntDataType.create_manager_with(&mut Cursor::new(&buf), count, &opts);
        let _ = LongDataType.create_manager_with(&mut Cursor::new(&buf), count, &opts);
    }

    #[test]
    fn sorted_long_pages_roundtrip(
        keys in proptest::collection::btree_set(any::<i64>(), 0..300)
            .prop_map(|s| s.into_iter().collect::<Vec<_>>()),
    ) {
        let manager = LongKeyManager::new(keys.clone());
        let mut buf = Vec::new();
        manager.write(keys.len(), &mut buf).unwrap();
        prop_assert_eq!(buf.len(), manager.serialized_data_size());
        let mut cur = Cursor::new(&buf);
        let decoded = LongKeyManager::read(&mut cur, keys.len(), &KeyManagerOptions::verifying())
            .unwrap();
        prop_assert_eq!(cur.remaining(), 0);
        prop_assert_eq!(decoded.keys(), keys.as_slice());
    }
}
