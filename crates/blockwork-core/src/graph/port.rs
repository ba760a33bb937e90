//! Block identity and port addressing.
//!
//! A [`PortRef`] names one float slot: which block, which side, which index.
//! Port indices are dense `0..N` per side per block.

use core::sync::atomic::{AtomicU32, Ordering};

/// Stable identity of a block instance.
///
/// Ids are assigned from a process-wide counter when a block's
/// [`BlockIo`](crate::BlockIo) is created and are never reused, so a block
/// keeps its id when it moves between containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) u32);

impl BlockId {
    /// Allocates a fresh id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for BlockId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

/// Which side of a block a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortDirection {
    /// Written by the container, read by the block.
    Input,
    /// Written by the block, read by the container.
    Output,
}

impl core::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Reference to a single port of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortRef {
    /// Owning block.
    pub block: BlockId,
    /// Input or output side.
    pub direction: PortDirection,
    /// Dense port index on that side.
    pub index: usize,
}

impl PortRef {
    /// Reference to input port `index` of `block`.
    #[inline]
    pub fn input(block: BlockId, index: usize) -> Self {
        Self {
            block,
            direction: PortDirection::Input,
            index,
        }
    }

    /// Reference to output port `index` of `block`.
    #[inline]
    pub fn output(block: BlockId, index: usize) -> Self {
        Self {
            block,
            direction: PortDirection::Output,
            index,
        }
    }
}

impl core::fmt::Display for PortRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}[{}]", self.block, self.direction, self.index)
    }
}
