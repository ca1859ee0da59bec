//! Bounds and allocation checks on index-declared entries.
//!
//! Index fields are attacker-controlled. Before an entry is exposed, its
//! placement must be proven to lie inside the container, and its declared
//! unpacked size must be capped so a corrupt index cannot drive an unbounded
//! allocation. Archives prefer "entry omitted" over "entry exposed with
//! unchecked bounds".

use super::{EntryDescriptor, EntryKind};

/// A packed entry may not claim to expand beyond `size * MAX_EXPANSION_RATIO`
/// (floored at [`EXPANSION_FLOOR`] so tiny entries with legitimate headroom
/// still pass).
pub const MAX_EXPANSION_RATIO: u64 = 1024;
pub const EXPANSION_FLOOR: u64 = 0x1_0000;
/// Hard ceiling on any single decoded entry.
pub const ALLOC_CEILING: u64 = 1 << 30;

/// The error type returned by placement validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// `offset + size` overflows.
    Overflow { offset: u64, size: u64 },
    /// The entry extends past the end of the container.
    OutOfBounds { offset: u64, size: u64, bound: u64 },
    /// The declared unpacked size is implausible against the packed size:
    /// an allocation-bomb guard, not a correctness proof.
    SuspiciousUnpackedSize { declared: u64, ceiling: u64 },
    /// A ciphered prefix longer than the entry itself.
    PrefixBeyondEntry { prefix_len: u64, size: u64 },
}

/// Check that `entry` lies fully inside a container of `container_len` bytes
/// and cannot cause overflow or unbounded allocation downstream.
pub fn validate_entry(entry: &EntryDescriptor, container_len: u64) -> Result<(), PlacementError> {
    let end = match entry.offset.checked_add(entry.size) {
        Some(end) => end,
        None => {
            return Err(PlacementError::Overflow {
                offset: entry.offset,
                size: entry.size,
            })
        }
    };
    if end > container_len {
        return Err(PlacementError::OutOfBounds {
            offset: entry.offset,
            size: entry.size,
            bound: container_len,
        });
    }
    if let Some(step) = &entry.cipher {
        if let Some(prefix_len) = step.prefix_len {
            if prefix_len > entry.size {
                return Err(PlacementError::PrefixBeyondEntry {
                    prefix_len,
                    size: entry.size,
                });
            }
        }
    }
    if entry.kind == EntryKind::Packed {
        let ceiling = entry
            .size
            .saturating_mul(MAX_EXPANSION_RATIO)
            .max(EXPANSION_FLOOR)
            .min(ALLOC_CEILING);
        if entry.unpacked_size > ceiling {
            return Err(PlacementError::SuspiciousUnpackedSize {
                declared: entry.unpacked_size,
                ceiling,
            });
        }
    }
    return Ok(());
}
