//! Directed port-to-port connections.
//!
//! A [`Connection`] carries one float per tick from an output port to an input
//! port. Connections are plain values with structural equality; a
//! [`BlockSystem`](super::BlockSystem) decides whether one is legal.

use super::port::{BlockId, PortRef};

/// A directed connection from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Output port the value is read from.
    pub source: PortRef,
    /// Input port the value is written to.
    pub target: PortRef,
}

impl Connection {
    /// Creates a connection from two port references.
    ///
    /// The directions are checked when the connection is added to a system.
    pub fn new(source: PortRef, target: PortRef) -> Self {
        Self { source, target }
    }

    /// Connects output `output` of `from` to input `input` of `to`.
    pub fn between(from: BlockId, output: usize, to: BlockId, input: usize) -> Self {
        Self {
            source: PortRef::output(from, output),
            target: PortRef::input(to, input),
        }
    }

    /// Returns true if either end of the connection is on `block`.
    #[inline]
    pub fn touches(&self, block: BlockId) -> bool {
        self.source.block == block || self.target.block == block
    }
}

impl core::fmt::Display for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
