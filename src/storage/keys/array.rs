//! Copy helpers for copy-on-write key arrays.

/// Copies `src` with `key` placed at `index`, shifting the tail right by one.
pub(crate) fn copy_with_gap<T: Clone>(src: &[T], index: usize, key: T) -> Vec<T> {
    debug_assert!(index <= src.len());
    let mut out = Vec::with_capacity(src.len() + 1);
    out.extend_from_slice(&src[..index]);
    out.push(key);
    out.extend_from_slice(&src[index..]);
    out
}

/// Copies `src` without the element at `index`.
pub(crate) fn copy_except<T: Clone>(src: &[T], index: usize) -> Vec<T> {
    debug_assert!(index < src.len());
    let mut out = Vec::with_capacity(src.len() - 1);
    out.extend_from_slice(&src[..index]);
    out.extend_from_slice(&src[index + 1..]);
    out
}

/// Copies `src` followed by `extra`.
pub(crate) fn concat<T: Clone>(src: &[T], extra: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(src.len() + extra.len());
    out.extend_from_slice(src);
    out.extend_from_slice(extra);
    out
}
