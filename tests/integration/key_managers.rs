#![allow(missing_docs)]

use std::sync::Once;

use keypack::primitives::bytes::buf::Cursor;
use keypack::storage::datatype::{
    AsciiStringDataType, ByteArrayDataType, DataType, FixedByteArrayDataType, IntDataType,
    LongDataType, StringDataType,
};
use keypack::storage::keys::{insertion_point, ARRAY_OVERHEAD};
use keypack::storage::options::DEFAULT_KEYS_PER_PAGE;
use keypack::{KeyError, KeyManagerOptions, KeyableDataType, SharedKeys};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("keypack=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

/// Serializes `keys` the way a page flush would and decodes them again.
fn flush_and_load<D: KeyableDataType>(
    ty: &D,
    keys: &SharedKeys<D::Value>,
    opts: &KeyManagerOptions,
) -> SharedKeys<D::Value> {
    let mut page = Vec::new();
    keys.write(keys.key_count(), &mut page).unwrap();
    assert_eq!(page.len(), keys.serialized_data_size());
    ty.create_manager_with(&mut Cursor::new(&page), keys.key_count(), opts)
        .unwrap()
}

/// Splits a full page in half, flushes both halves and checks they
/// reassemble to the original keys.
fn split_page<D: KeyableDataType>(ty: D, keys: Vec<D::Value>) {
    let opts = KeyManagerOptions::verifying();
    let page = ty.create_manager_from(keys.clone()).unwrap();
    let mid = keys.len() / 2;
    let left = flush_and_load(&ty, &page.copy(0, mid).unwrap(), &opts);
    let right = flush_and_load(&ty, &page.copy(mid, keys.len()).unwrap(), &opts);
    let mut joined = left.to_vec().unwrap();
    joined.extend(right.to_vec().unwrap());
    assert_eq!(joined, keys);
    let merged = left.expand_keys(&right.to_vec().unwrap()).unwrap();
    assert_eq!(flush_and_load(&ty, &merged, &opts).to_vec().unwrap(), keys);
}

#[test]
fn default_page_splits_for_every_key_type() {
    init_tracing();
    let n = DEFAULT_KEYS_PER_PAGE;
    split_page(IntDataType, (0..n as i32).map(|i| i * 17 - 1_000).collect());
    split_page(LongDataType, (0..n as i64).map(|i| (i << 35) + 3).collect());
    split_page(StringDataType, (0..n).map(|i| format!("key-{i:05}")).collect());
    split_page(AsciiStringDataType, (0..n).map(|i| format!("{i:04}")).collect());
    split_page(
        ByteArrayDataType,
        (0..n as u32).map(|i| i.to_be_bytes()[1..].to_vec()).collect(),
    );
    split_page(
        FixedByteArrayDataType::new(4).unwrap(),
        (0..n as u32).map(|i| i.to_be_bytes().to_vec()).collect(),
    );
}

#[test]
fn leaf_insert_path_uses_hinted_search() {
    init_tracing();
    let mut page: SharedKeys<i64> = LongDataType.create_empty_manager();
    let mut hint = 0isize;
    for key in (0..300i64).rev().map(|k| k * 7) {
        let found = page.binary_search(&key, hint);
        assert!(found < 0, "{key} already present");
        let at = insertion_point(found);
        page = page.insert_key(at, key).unwrap();
        hint = at as isize + 1;
    }
    assert_eq!(page.key_count(), 300);
    assert_eq!(page.key(0).unwrap(), 0);
    assert_eq!(page.key(299).unwrap(), 299 * 7);
    let reloaded = flush_and_load(&LongDataType, &page, &KeyManagerOptions::default());
    assert_eq!(reloaded.to_vec().unwrap(), page.to_vec().unwrap());
}

#[test]
fn unordered_pages_are_rejected_only_when_verifying() {
    init_tracing();
    let mut page = Vec::new();
    for word in ["pear", "apple"] {
        StringDataType.write(&mut page, &word.to_string());
    }
    let err = StringDataType
        .create_manager_with(&mut Cursor::new(&page), 2, &KeyManagerOptions::verifying())
        .unwrap_err();
    assert_eq!(err, KeyError::Corruption("key array not strictly increasing"));
    assert_eq!(
        err.to_string(),
        "corruption: key array not strictly increasing"
    );

    let fixed = FixedByteArrayDataType::new(1).unwrap();
    let dup = [9u8, 9];
    assert!(fixed
        .create_manager_with(&mut Cursor::new(&dup), 2, &KeyManagerOptions::verifying())
        .is_err());
}

#[test]
fn fixed_width_pages_refuse_mismatched_keys() {
    init_tracing();
    let ty = FixedByteArrayDataType::new(4).unwrap();
    let bad = KeyError::Invalid("fixed key has wrong length");
    assert_eq!(
        ty.create_manager_from(vec![vec![0; 4], vec![1; 5]]).unwrap_err(),
        bad
    );

    let page = ty.create_manager_from(vec![vec![0; 4], vec![2; 4]]).unwrap();
    assert_eq!(page.insert_key(1, vec![1; 3]).unwrap_err(), bad);
    assert_eq!(page.expand_keys(&[vec![3; 8]]).unwrap_err(), bad);

    let grown = page.insert_key(1, vec![1; 4]).unwrap();
    assert_eq!(grown.insert_key(0, vec![]).unwrap_err(), bad);
    let reloaded = flush_and_load(&ty, &grown, &KeyManagerOptions::verifying());
    assert_eq!(reloaded.to_vec().unwrap(), [vec![0; 4], vec![1; 4], vec![2; 4]]);
}

#[test]
fn memory_estimates_follow_key_layout() {
    let ints = IntDataType.create_manager_from(vec![1, 2, 3]).unwrap();
    assert_eq!(ints.memory(), ARRAY_OVERHEAD + 12);
    let longs = LongDataType.create_manager_from(vec![1, 2, 3]).unwrap();
    assert_eq!(longs.memory(), ARRAY_OVERHEAD + 24);
    let strings = StringDataType.create_manager_from(vec!["ab".into(), "cd".into()]).unwrap();
    assert_eq!(strings.memory(), ARRAY_OVERHEAD + 2 * (24 + 4));
    let fixed = FixedByteArrayDataType::new(8)
        .unwrap()
        .create_manager_from(vec![vec![0; 8], vec![1; 8]])
        .unwrap();
    assert_eq!(fixed.memory(), ARRAY_OVERHEAD + 16);
}

#[test]
fn out_of_range_edits_report_bounds() {
    let page = IntDataType.create_manager_from(vec![1, 2, 3]).unwrap();
    assert_eq!(
        page.key(3).unwrap_err().to_string(),
        "index 3 out of bounds for 3 keys"
    );
    assert!(matches!(
        page.insert_key(4, 9),
        Err(KeyError::IndexOutOfBounds { index: 4, len: 3 })
    ));
    assert!(matches!(page.copy(2, 1), Err(KeyError::Invalid(_))));
    assert!(page.write(4, &mut Vec::new()).is_err());
}

#[test]
fn options_validate_page_capacity() {
    let opts = KeyManagerOptions::default();
    assert!(opts.validate().is_ok());
    assert!(opts.packing_friendly());
    assert!(opts.clone().keys_per_page(0).validate().is_err());
    assert!(!opts.keys_per_page(100).packing_friendly());
}
