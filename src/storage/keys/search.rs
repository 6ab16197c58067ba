use std::cmp::Ordering;

/// Binary search seeded with a starting position.
///
/// `compare_at(x)` compares the searched key against the key at `x`.
/// The first comparison is at `hint - 1` when that lies inside `0..len`, the
/// midpoint otherwise. Returns the matching index, or
/// `-(insertion_point + 1)` when the key is absent.
pub(crate) fn hinted_binary_search(
    len: usize,
    hint: isize,
    mut compare_at: impl FnMut(usize) -> Ordering,
) -> isize {
    let mut low: isize = 0;
    let mut high: isize = len as isize - 1;
    let mut x = hint.wrapping_sub(1);
    if x < 0 || x > high {
        x = high >> 1;
    }
    while low <= high {
        match compare_at(x as usize) {
            Ordering::Greater => low = x + 1,
            Ordering::Less => high = x - 1,
            Ordering::Equal => return x,
        }
        x = (low + high) >> 1;
    }
    -(low + 1)
}

/// Whether every adjacent pair of `keys` is strictly increasing under `cmp`.
pub(crate) fn strictly_increasing<T>(keys: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> bool {
    keys.windows(2)
        .all(|pair| cmp(&pair[0], &pair[1]) == Ordering::Less)
}

/// Converts a search result into the index a key occupies or would occupy.
pub fn insertion_point(result: isize) -> usize {
    if result < 0 {
        (-(result + 1)) as usize
    } else {
        result as usize
    }
}
