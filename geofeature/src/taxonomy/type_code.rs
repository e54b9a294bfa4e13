//! Bit-packed type codes.
//!
//! A [`TypeCode`] packs a path through the taxonomy (one node index per
//! level) into a single `u64`:
//!
//! ```text
//!  bit:  60        48          36          24          12           0
//!        ┌──┬─────────┬───────────┬───────────┬───────────┬───────────┐
//!        │..│ marker  │  level 3  │  level 2  │  level 1  │  level 0  │
//!        └──┴─────────┴───────────┴───────────┴───────────┴───────────┘
//! ```
//!
//! Each level takes `SLOT_BITS` bits, first level in the lowest slot. A single
//! marker bit sits at the start of the first unused slot, so the depth of a
//! code is recovered without a separate length field, and an index of 0 is
//! still distinguishable from "no level". [`TypeCode::EMPTY`] is the marker
//! alone.

use std::fmt;

use thiserror::Error;

/// Bits per hierarchy level.
pub const SLOT_BITS: u32 = 12;

/// Maximum number of levels a code can hold.
pub const MAX_DEPTH: usize = 5;

/// Largest node index that fits in a slot.
pub const MAX_INDEX: u32 = (1 << SLOT_BITS) - 1;

const SLOT_MASK: u64 = MAX_INDEX as u64;

/// Errors from [`TypeCode::checked_push`] and [`TypeCode::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TypeCodeError {
    /// The code already holds `MAX_DEPTH` levels.
    #[error("Type code is full: cannot push more than {max} levels", max = MAX_DEPTH)]
    DepthOverflow,

    /// The node index does not fit in a slot.
    #[error("Node index {0} exceeds the type code slot limit of {max}", max = MAX_INDEX)]
    IndexOverflow(u32),

    /// The raw value is not a well-formed code.
    #[error("Invalid raw type code: {0:#x}")]
    InvalidRaw(u64),
}

/// A taxonomy path packed into one integer.
///
/// Codes are plain values: copy, compare and hash them directly.
///
/// # Example
///
/// ```
/// use geofeature::taxonomy::TypeCode;
///
/// let code = TypeCode::EMPTY.push(4).push(17);
/// assert_eq!(code.depth(), 2);
/// assert_eq!(code.unpack(), vec![4, 17]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode(u64);

impl TypeCode {
    /// The sentinel meaning "no level pushed yet".
    pub const EMPTY: TypeCode = TypeCode(1);

    /// Rebuild a code from its raw value, rejecting malformed input.
    pub fn from_raw(raw: u64) -> Result<Self, TypeCodeError> {
        if raw == 0 || raw >= 1 << (SLOT_BITS as usize * MAX_DEPTH + 1) {
            return Err(TypeCodeError::InvalidRaw(raw));
        }
        // The marker must sit exactly on a slot boundary.
        let marker_bit = 63 - raw.leading_zeros();
        if marker_bit % SLOT_BITS != 0 {
            return Err(TypeCodeError::InvalidRaw(raw));
        }
        Ok(TypeCode(raw))
    }

    /// The raw packed value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Number of levels pushed so far.
    #[inline]
    pub fn depth(self) -> usize {
        let marker_bit = 63 - self.0.leading_zeros();
        (marker_bit / SLOT_BITS) as usize
    }

    /// Append one more level.
    ///
    /// # Panics
    ///
    /// Panics if the code is already `MAX_DEPTH` deep or `index` exceeds
    /// `MAX_INDEX`. Both indicate a taxonomy that was built without the
    /// limits enforced by [`TaxonomyBuilder`](super::TaxonomyBuilder).
    #[must_use]
    pub fn push(self, index: u32) -> TypeCode {
        match self.checked_push(index) {
            Ok(code) => code,
            Err(e) => panic!("{e}"),
        }
    }

    /// Append one more level, reporting overflow instead of panicking.
    pub fn checked_push(self, index: u32) -> Result<TypeCode, TypeCodeError> {
        let depth = self.depth();
        if depth >= MAX_DEPTH {
            return Err(TypeCodeError::DepthOverflow);
        }
        if index > MAX_INDEX {
            return Err(TypeCodeError::IndexOverflow(index));
        }

        let shift = depth as u32 * SLOT_BITS;
        let without_marker = self.0 ^ (1 << shift);
        let value = without_marker | ((index as u64) << shift) | (1 << (shift + SLOT_BITS));
        Ok(TypeCode(value))
    }

    /// Index stored at `level`, if the code is that deep.
    #[inline]
    pub fn get(self, level: usize) -> Option<u32> {
        (level < self.depth()).then(|| ((self.0 >> (level as u32 * SLOT_BITS)) & SLOT_MASK) as u32)
    }

    /// Remove the last level. Popping an empty code returns it unchanged.
    #[must_use]
    pub fn pop(self) -> TypeCode {
        self.truncate(self.depth().saturating_sub(1))
    }

    /// Keep only the first `depth` levels.
    #[must_use]
    pub fn truncate(self, depth: usize) -> TypeCode {
        if depth >= self.depth() {
            return self;
        }
        let shift = depth as u32 * SLOT_BITS;
        let kept = self.0 & ((1u64 << shift) - 1);
        TypeCode(kept | (1 << shift))
    }

    /// Returns true if `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(self, other: TypeCode) -> bool {
        self.depth() <= other.depth() && other.truncate(self.depth()) == self
    }

    /// Node indices from the first level to the last.
    pub fn levels(self) -> impl Iterator<Item = u32> {
        (0..self.depth()).filter_map(move |level| self.get(level))
    }

    /// Node indices as a vector.
    pub fn unpack(self) -> Vec<u32> {
        self.levels().collect()
    }

    /// Build a code from a sequence of node indices.
    pub fn from_indices(indices: impl IntoIterator<Item = u32>) -> Result<Self, TypeCodeError> {
        indices
            .into_iter()
            .try_fold(Self::EMPTY, |code, index| code.checked_push(index))
    }
}

impl Default for TypeCode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({self})")
    }
}

/// Formats the node indices joined by dots, e.g. `3.7`; `-` when empty.
impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (i, index) in self.levels().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_code() {
        assert!(TypeCode::EMPTY.is_empty());
        assert_eq!(TypeCode::EMPTY.depth(), 0);
        assert!(TypeCode::EMPTY.unpack().is_empty());
        assert_eq!(TypeCode::default(), TypeCode::EMPTY);
    }

    #[test]
    fn test_push_two_levels() {
        let code = TypeCode::EMPTY.push(1).push(2);
        assert_eq!(code.depth(), 2);
        assert_eq!(code.unpack(), vec![1, 2]);
    }

    #[test]
    fn test_zero_index_is_not_empty() {
        let code = TypeCode::EMPTY.push(0);
        assert!(!code.is_empty());
        assert_eq!(code.depth(), 1);
        assert_eq!(code.get(0), Some(0));
        assert_eq!(code.get(1), None);
    }

    #[test]
    fn test_max_depth_and_index() {
        let code = TypeCode::from_indices([MAX_INDEX; MAX_DEPTH]).unwrap();
        assert_eq!(code.depth(), MAX_DEPTH);
        assert_eq!(code.unpack(), vec![MAX_INDEX; MAX_DEPTH]);
        assert_eq!(code.checked_push(0), Err(TypeCodeError::DepthOverflow));
    }

    #[test]
    fn test_index_overflow() {
        assert_eq!(
            TypeCode::EMPTY.checked_push(MAX_INDEX + 1),
            Err(TypeCodeError::IndexOverflow(MAX_INDEX + 1))
        );
    }

    #[test]
    #[should_panic(expected = "Type code is full")]
    fn test_push_past_max_depth_panics() {
        let _ = TypeCode::from_indices([1; MAX_DEPTH]).unwrap().push(1);
    }

    #[test]
    fn test_pop_and_truncate() {
        let code = TypeCode::from_indices([5, 6, 7]).unwrap();
        assert_eq!(code.pop().unpack(), vec![5, 6]);
        assert_eq!(code.truncate(1).unpack(), vec![5]);
        assert_eq!(code.truncate(0), TypeCode::EMPTY);
        assert_eq!(code.truncate(9), code);
        assert_eq!(TypeCode::EMPTY.pop(), TypeCode::EMPTY);
    }

    #[test]
    fn test_is_prefix_of() {
        let parent = TypeCode::EMPTY.push(3);
        let child = parent.push(9);
        assert!(parent.is_prefix_of(child));
        assert!(child.is_prefix_of(child));
        assert!(!child.is_prefix_of(parent));
        assert!(!TypeCode::EMPTY.push(4).is_prefix_of(child));
        assert!(TypeCode::EMPTY.is_prefix_of(child));
    }

    #[test]
    fn test_from_raw_validation() {
        let code = TypeCode::EMPTY.push(42).push(7);
        assert_eq!(TypeCode::from_raw(code.raw()), Ok(code));
        assert!(TypeCode::from_raw(0).is_err());
        // Marker not on a slot boundary
        assert!(TypeCode::from_raw(1 << 5).is_err());
        // Deeper than MAX_DEPTH
        assert!(TypeCode::from_raw(1 << 62).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeCode::EMPTY.to_string(), "-");
        assert_eq!(TypeCode::EMPTY.push(3).push(7).to_string(), "3.7");
        assert_eq!(format!("{:?}", TypeCode::EMPTY.push(3)), "TypeCode(3)");
    }

    proptest! {
        /// Property: unpack inverts a sequence of pushes.
        #[test]
        fn prop_unpack_inverts_push(indices in prop::collection::vec(0..=MAX_INDEX, 0..=MAX_DEPTH)) {
            let code = TypeCode::from_indices(indices.iter().copied()).unwrap();
            prop_assert_eq!(code.unpack(), indices);
        }

        /// Property: distinct sequences of the same length give distinct codes.
        #[test]
        fn prop_packing_is_injective(
            a in prop::collection::vec(0..=MAX_INDEX, 2),
            b in prop::collection::vec(0..=MAX_INDEX, 2),
        ) {
            let ca = TypeCode::from_indices(a.iter().copied()).unwrap();
            let cb = TypeCode::from_indices(b.iter().copied()).unwrap();
            prop_assert_eq!(ca == cb, a == b);
        }

        /// Property: every well-formed code survives a raw round trip.
        #[test]
        fn prop_raw_roundtrip(indices in prop::collection::vec(0..=MAX_INDEX, 0..=MAX_DEPTH)) {
            let code = TypeCode::from_indices(indices).unwrap();
            prop_assert_eq!(TypeCode::from_raw(code.raw()), Ok(code));
        }
    }
}
