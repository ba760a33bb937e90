//! Compiled evaluation schedule.
//!
//! A [`CompiledSchedule`] is produced by [`BlockSystem::prepare()`](super::BlockSystem::prepare)
//! whenever the topology changed. It is a flat list of [`ProcessStep`]s with
//! every block id already resolved to a container position, so executing a
//! tick is a linear walk with indexed reads and writes only.
//!
//! Step layout for one tick:
//!
//! ```text
//! WriteInput*        one per system input alias
//! ( Evaluate         one per block, in evaluation order
//!   Propagate* )     one per connection leaving that block, feedback included
//! ReadOutput*        one per system output alias
//! ```

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use crate::block::BlockIo;

use super::composite::Composite;
use super::connection::Connection;
use super::planner;
use super::port::{BlockId, PortRef};

/// A single instruction in the compiled schedule.
///
/// All fields are container positions and port indices; no variant owns heap
/// memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessStep {
    /// Copy an external system input into an aliased block input.
    WriteInput {
        /// External input index.
        external: usize,
        /// Container position of the aliased block.
        block: usize,
        /// Input port on that block.
        port: usize,
    },

    /// Run one block's `evaluate()`.
    Evaluate {
        /// Container position of the block.
        block: usize,
    },

    /// Copy one output port value into one input port.
    Propagate {
        /// Container position of the source block.
        from_block: usize,
        /// Output port on the source block.
        from_port: usize,
        /// Container position of the target block.
        to_block: usize,
        /// Input port on the target block.
        to_port: usize,
    },

    /// Copy an aliased block output into an external system output.
    ReadOutput {
        /// Container position of the aliased block.
        block: usize,
        /// Output port on that block.
        port: usize,
        /// External output index.
        external: usize,
    },
}

/// Resolved evaluation plan of a block system.
#[derive(Clone, Debug, Default)]
pub struct CompiledSchedule {
    pub(crate) steps: Vec<ProcessStep>,
    pub(crate) order: Vec<BlockId>,
    pub(crate) feedback: Vec<Connection>,
}

impl CompiledSchedule {
    /// Plans and resolves a topology.
    ///
    /// `connections` holds each block's outgoing connections in insertion order.
    /// All ids must belong to `blocks`; the caller upholds this on every mutation.
    pub(crate) fn compile(
        blocks: &Composite,
        connections: &BTreeMap<BlockId, Vec<Connection>>,
        inputs: &[PortRef],
        outputs: &[PortRef],
    ) -> Self {
        let ids: Vec<BlockId> = blocks.ids().collect();
        let position = |id: BlockId| {
            blocks
                .position(id)
                .unwrap_or_else(|| panic!("{id} is referenced but not owned"))
        };
        let outgoing = |id: &BlockId| connections.get(id).map_or(&[][..], Vec::as_slice);

        // Condensed graph: one entry per connection, in list order, so a
        // feedback edge's slot indexes straight back into the connection list.
        let graph: Vec<Vec<usize>> = ids
            .iter()
            .map(|id| outgoing(id).iter().map(|c| position(c.target.block)).collect())
            .collect();

        let plan = planner::plan(&graph);

        let feedback = plan
            .feedback_edges
            .iter()
            .map(|edge| outgoing(&ids[edge.from])[edge.slot])
            .collect();

        let connection_count: usize = connections.values().map(Vec::len).sum();
        let mut steps =
            Vec::with_capacity(inputs.len() + ids.len() + connection_count + outputs.len());

        for (external, port) in inputs.iter().enumerate() {
            steps.push(ProcessStep::WriteInput {
                external,
                block: position(port.block),
                port: port.index,
            });
        }

        for &node in &plan.order {
            steps.push(ProcessStep::Evaluate { block: node });
            // Every connection propagates, not only the ones kept for ordering.
            for c in outgoing(&ids[node]) {
                steps.push(ProcessStep::Propagate {
                    from_block: node,
                    from_port: c.source.index,
                    to_block: position(c.target.block),
                    to_port: c.target.index,
                });
            }
        }

        for (external, port) in outputs.iter().enumerate() {
            steps.push(ProcessStep::ReadOutput {
                block: position(port.block),
                port: port.index,
                external,
            });
        }

        Self {
            steps,
            order: plan.order.iter().map(|&node| ids[node]).collect(),
            feedback,
        }
    }

    /// Executes one tick.
    ///
    /// `io` holds the system's external inputs and outputs. Performs only
    /// indexed reads and writes plus the blocks' own `evaluate()`.
    #[inline]
    pub(crate) fn run(&self, blocks: &mut Composite, io: &mut BlockIo) {
        for step in &self.steps {
            match *step {
                ProcessStep::WriteInput {
                    external,
                    block,
                    port,
                } => {
                    let value = io.inputs()[external];
                    blocks.at_mut(block).io_mut().inputs_mut()[port] = value;
                }
                ProcessStep::Evaluate { block } => blocks.at_mut(block).evaluate(),
                ProcessStep::Propagate {
                    from_block,
                    from_port,
                    to_block,
                    to_port,
                } => {
                    let value = blocks.at(from_block).io().outputs()[from_port];
                    blocks.at_mut(to_block).io_mut().inputs_mut()[to_port] = value;
                }
                ProcessStep::ReadOutput {
                    block,
                    port,
                    external,
                } => {
                    io.outputs_mut()[external] = blocks.at(block).io().outputs()[port];
                }
            }
        }
    }

    /// Flat instruction list, in execution order.
    pub fn steps(&self) -> &[ProcessStep] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Block ids in evaluation order.
    pub fn order(&self) -> &[BlockId] {
        &self.order
    }

    /// Connections that were cut for ordering. They still propagate, one tick late.
    pub fn feedback_connections(&self) -> &[Connection] {
        &self.feedback
    }
}
