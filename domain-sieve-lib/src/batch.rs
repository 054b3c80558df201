//! Fixed-size batching for bulk registrar calls.

/// Maximum number of domains the registrar accepts in one bulk call.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Split `items` into consecutive groups of at most `size` elements.
///
/// Concatenating the groups yields `items` in order. Only the last group may
/// be shorter than `size`, and empty input yields no groups. A `size` of zero
/// is treated as one.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}
