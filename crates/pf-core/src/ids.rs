use core::fmt;
use core::num::NonZeroU32;

/// Compact handle for an element of the hydraulic network.
///
/// Stores `index + 1` in a `NonZeroU32`, so `Option<Id>` costs the same
/// four bytes as `Id` and index 0 stays representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Handle for a 0-based index.
    ///
    /// # Panics
    ///
    /// Panics on `u32::MAX`, which would wrap the internal `index + 1`.
    pub fn from_index(index: u32) -> Self {
        let raw = index.checked_add(1).expect("id index overflow");
        // raw >= 1 by construction
        Self(NonZeroU32::new(raw).expect("nonzero"))
    }

    /// The 0-based index this handle was created from.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// A point with a single head value.
pub type NodeId = Id;
/// A flow-carrying element between two nodes.
pub type LinkId = Id;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn option_id_is_pointer_sized() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn display_shows_the_index() {
        assert_eq!(Id::from_index(7).to_string(), "7");
        assert_eq!(format!("{:?}", Id::from_index(0)), "Id(0)");
    }

    proptest! {
        #[test]
        fn index_round_trips(i in 0u32..u32::MAX) {
            prop_assert_eq!(Id::from_index(i).index(), i);
        }
    }
}
