//! Ordered container of owned blocks.
//!
//! [`Composite`] owns its children as `Box<dyn Block>` in insertion order and
//! keeps an id → position index for O(log n) lookups. Insertion order is the
//! node numbering the planner uses, so removal shifts later children down
//! rather than swapping.
//!
//! The container has no connection semantics; [`BlockSystem`](super::BlockSystem)
//! layers those on top.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use crate::block::Block;
use crate::error::GraphError;

use super::port::BlockId;

/// Owned child blocks in insertion order.
#[derive(Default)]
pub struct Composite {
    children: Vec<Box<dyn Block>>,
    positions: BTreeMap<BlockId, usize>,
}

impl Composite {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `block` and appends it.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateBlock`] if a block with the same id is already a child.
    pub fn add_child(&mut self, block: Box<dyn Block>) -> Result<BlockId, GraphError> {
        let id = block.id();
        if self.positions.contains_key(&id) {
            return Err(GraphError::DuplicateBlock(id));
        }
        self.positions.insert(id, self.children.len());
        self.children.push(block);
        Ok(id)
    }

    /// Removes a child and hands ownership back.
    ///
    /// Children added after it move down one position.
    ///
    /// # Errors
    ///
    /// [`GraphError::BlockNotFound`] if `id` is not a child.
    pub fn remove_child(&mut self, id: BlockId) -> Result<Box<dyn Block>, GraphError> {
        let position = self
            .positions
            .remove(&id)
            .ok_or(GraphError::BlockNotFound(id))?;
        let block = self.children.remove(position);
        for p in self.positions.values_mut() {
            if *p > position {
                *p -= 1;
            }
        }
        Ok(block)
    }

    /// Returns true if `id` is a child.
    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Insertion position of a child.
    #[inline]
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Number of children.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Looks up a child by id.
    pub fn get(&self, id: BlockId) -> Option<&dyn Block> {
        let position = self.position(id)?;
        Some(self.children[position].as_ref())
    }

    /// Looks up a child by id for mutation.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut dyn Block> {
        let position = self.position(id)?;
        Some(self.children[position].as_mut())
    }

    /// Child at insertion position `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    #[inline]
    pub fn at(&self, position: usize) -> &dyn Block {
        self.children[position].as_ref()
    }

    /// Mutable child at insertion position `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    #[inline]
    pub fn at_mut(&mut self, position: usize) -> &mut dyn Block {
        self.children[position].as_mut()
    }

    /// Child ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.children.iter().map(|b| b.id())
    }

    /// Prepares every child that carries a plan of its own.
    pub fn prepare(&mut self) {
        for child in &mut self.children {
            child.prepare();
        }
    }

    /// Resets every child.
    pub fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}

impl core::fmt::Debug for Composite {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.children.iter().map(|b| (b.id(), b.name())))
            .finish()
    }
}
