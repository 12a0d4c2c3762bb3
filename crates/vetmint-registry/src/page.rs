//! 1-based pagination arithmetic.

use std::ops::Range;

use crate::{RegistryError, Result};

/// Slice bounds of page `page_index` (1-based) of `page_size` items over a
/// sequence of `len` items.
///
/// Pages past the end yield an empty range; a short final page yields only the
/// remaining items.
pub fn bounds(len: usize, page_index: u64, page_size: u64) -> Result<Range<usize>> {
    if page_index == 0 || page_size == 0 {
        return Err(RegistryError::InvalidPage {
            page_index,
            page_size,
        });
    }
    let size = usize::try_from(page_size).unwrap_or(usize::MAX);
    let skipped = usize::try_from(page_index - 1).unwrap_or(usize::MAX);
    let start = skipped.saturating_mul(size);
    if start >= len {
        return Ok(len..len);
    }
    let end = start.saturating_add(size).min(len);
    Ok(start..end)
}
