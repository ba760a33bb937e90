//! Error taxonomy for block and graph operations.
//!
//! Every failure is a synchronous programmer/configuration error reported by
//! the mutation API or by the narrow port accessors. Validation always runs
//! before any state changes, so a returned error means nothing was committed.
//! Once a topology is accepted, evaluation itself cannot fail.

use crate::graph::{BlockId, Connection, PortDirection, PortRef};

/// Coarse classification of a [`GraphError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A port index or direction does not exist on the addressed block.
    IllegalPort,
    /// Structural misuse of the container API.
    InvalidOperation,
}

/// Errors that can occur while building or addressing a block graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A port index is outside the block's declared range.
    #[error("{direction} port {index} out of range for block {block} ({count} ports)")]
    IllegalPort {
        /// Block whose ports were addressed.
        block: BlockId,
        /// Side of the block that was addressed.
        direction: PortDirection,
        /// The offending index.
        index: usize,
        /// Number of ports the block declares on that side.
        count: usize,
    },

    /// A port reference points at the wrong side of a block.
    #[error("port {port} is not an {expected} port")]
    WrongDirection {
        /// The port that was supplied.
        port: PortRef,
        /// The direction the operation requires.
        expected: PortDirection,
    },

    /// The block is already owned by this container.
    #[error("block {0} is already part of this system")]
    DuplicateBlock(BlockId),

    /// The block is not owned by this container.
    #[error("block {0} not found")]
    BlockNotFound(BlockId),

    /// A connection references a block owned by some other container (or none).
    #[error("cannot connect block {0}: it does not belong to this system")]
    ForeignBlock(BlockId),

    /// The port is already the source (output) or target (input) of a connection.
    #[error("port {0} is already connected")]
    PortAlreadyConnected(PortRef),

    /// The port is already exposed as a system input or output.
    #[error("port {0} is already aliased")]
    AlreadyAliased(PortRef),

    /// No structurally equal connection exists.
    #[error("connection {0} not found")]
    ConnectionNotFound(Connection),

    /// No system input/output alias exists for the port.
    #[error("no alias for port {0}")]
    AliasNotFound(PortRef),
}

impl GraphError {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalPort { .. } | Self::WrongDirection { .. } => ErrorKind::IllegalPort,
            Self::DuplicateBlock(_)
            | Self::BlockNotFound(_)
            | Self::ForeignBlock(_)
            | Self::PortAlreadyConnected(_)
            | Self::AlreadyAliased(_)
            | Self::ConnectionNotFound(_)
            | Self::AliasNotFound(_) => ErrorKind::InvalidOperation,
        }
    }
}
