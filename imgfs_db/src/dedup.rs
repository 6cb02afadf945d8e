// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::Error;
use crate::metadata::Slot;

/// Scans `table` for slots that collide with the newly populated slot at
/// index `i`, by id or by content (SHA-256).
///
/// On `Err(DuplicateId)` the caller must roll back slot `i` itself — this
/// function never mutates other slots and leaves `table[i]`'s `offset`
/// untouched except for clearing `offset[ORIG_RES]` up front.
pub fn dedup(table: &mut [Slot], i: usize) -> Result<(), Error> {
    use crate::metadata::ORIG_RES;
    table[i].offset[ORIG_RES] = 0;

    let target_id = table[i].img_id;
    let target_sha = table[i].sha;
    let mut content_match: Option<([u64; 3], [u32; 3])> = None;

    for (j, other) in table.iter().enumerate() {
        if j == i || !other.is_valid() {
            continue;
        }
        if other.img_id == target_id {
            return Err(Error::DuplicateId);
        }
        if content_match.is_none() && other.sha == target_sha {
            content_match = Some((other.offset, other.size));
        }
    }

    if let Some((offset, size)) = content_match {
        table[i].offset = offset;
        table[i].size = size;
    }
    Ok(())
}
