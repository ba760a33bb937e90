//! Block system: owned blocks plus connections and external aliases.
//!
//! [`BlockSystem`] is the mutation API and the evaluator. Every mutation is
//! validated in full before anything changes, then marks the cached
//! [`CompiledSchedule`] stale. The next [`prepare()`](BlockSystem::prepare) or
//! [`evaluate()`](Block::evaluate) rebuilds it.
//!
//! A block system implements [`Block`]: its input aliases are its input ports
//! and its output aliases are its output ports, so a prepared system can be
//! added to another system as a single block.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use crate::block::{Block, BlockIo};
use crate::error::GraphError;

use super::composite::Composite;
use super::connection::Connection;
use super::port::{BlockId, PortDirection, PortRef};
use super::schedule::CompiledSchedule;

/// A dataflow graph of blocks that evaluates one tick per [`Block::evaluate`] call.
///
/// # Example
///
/// Two blocks in a loop: the feedback connection is cut for ordering but still
/// carries the previous tick's value.
///
/// ```rust
/// use blockwork_core::{Block, BlockIo, BlockSystem, Connection, PortRef};
///
/// struct Halve {
///     io: BlockIo,
/// }
///
/// impl Block for Halve {
///     fn io(&self) -> &BlockIo {
///         &self.io
///     }
///     fn io_mut(&mut self) -> &mut BlockIo {
///         &mut self.io
///     }
///     fn evaluate(&mut self) {
///         let sum: f32 = self.io.inputs().iter().sum();
///         self.io.outputs_mut()[0] = 0.5 * sum;
///     }
/// }
///
/// let mut system = BlockSystem::new();
/// let a = system.add_block(Box::new(Halve { io: BlockIo::new(2, 1) })).unwrap();
/// let b = system.add_block(Box::new(Halve { io: BlockIo::new(1, 1) })).unwrap();
/// system.add_connection(Connection::between(a, 0, b, 0)).unwrap();
/// system.add_connection(Connection::between(b, 0, a, 1)).unwrap();
/// system.add_input(PortRef::input(a, 0)).unwrap();
/// system.add_output(PortRef::output(b, 0)).unwrap();
///
/// assert_eq!(system.evaluation_order(), &[a, b]);
/// assert_eq!(system.feedback_connections(), &[Connection::between(b, 0, a, 1)]);
/// ```
#[derive(Debug)]
pub struct BlockSystem {
    io: BlockIo,
    blocks: Composite,
    /// Outgoing connections per source block, in insertion order.
    connections: BTreeMap<BlockId, Vec<Connection>>,
    inputs: Vec<PortRef>,
    outputs: Vec<PortRef>,
    schedule: CompiledSchedule,
    dirty: bool,
}

impl Default for BlockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockSystem {
    /// Creates an empty system with no ports.
    pub fn new() -> Self {
        Self {
            io: BlockIo::new(0, 0),
            blocks: Composite::new(),
            connections: BTreeMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            schedule: CompiledSchedule::default(),
            dirty: true,
        }
    }

    // --- Blocks ---

    /// Takes ownership of `block` and returns its id.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateBlock`] if the block is already owned.
    pub fn add_block(&mut self, block: Box<dyn Block>) -> Result<BlockId, GraphError> {
        let id = self.blocks.add_child(block)?;
        self.connections.insert(id, Vec::new());
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_add: block {id} ({})", self.blocks.at(self.blocks.len() - 1).name());
        Ok(id)
    }

    /// Removes a block, every connection touching it and every alias on it.
    ///
    /// Ownership of the block is returned to the caller. External indices of
    /// the remaining aliases shift down past any removed alias.
    ///
    /// # Errors
    ///
    /// [`GraphError::BlockNotFound`] if the block is not owned.
    pub fn remove_block(&mut self, id: BlockId) -> Result<Box<dyn Block>, GraphError> {
        if !self.blocks.contains(id) {
            return Err(GraphError::BlockNotFound(id));
        }

        self.connections.remove(&id);
        for list in self.connections.values_mut() {
            list.retain(|c| !c.touches(id));
        }
        for external in (0..self.inputs.len()).rev() {
            if self.inputs[external].block == id {
                self.inputs.remove(external);
                self.io.remove_input(external);
            }
        }
        for external in (0..self.outputs.len()).rev() {
            if self.outputs[external].block == id {
                self.outputs.remove(external);
                self.io.remove_output(external);
            }
        }

        let block = self.blocks.remove_child(id)?;
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_remove: block {id} ({})", block.name());
        Ok(block)
    }

    /// Returns true if the block is owned by this system.
    #[inline]
    pub fn has_block(&self, id: BlockId) -> bool {
        self.blocks.contains(id)
    }

    /// Looks up an owned block.
    pub fn block(&self, id: BlockId) -> Option<&dyn Block> {
        self.blocks.get(id)
    }

    /// Looks up an owned block for parameter changes.
    ///
    /// Port counts must not change while the block is owned.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut dyn Block> {
        self.blocks.get_mut(id)
    }

    /// Number of owned blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Owned block ids in insertion order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.ids()
    }

    // --- Connections ---

    /// Adds a connection from an output port to an input port.
    ///
    /// # Errors
    ///
    /// Checked in this order, nothing is changed on failure:
    /// - [`GraphError::WrongDirection`] if the source is not an output or the
    ///   target is not an input
    /// - [`GraphError::ForeignBlock`] if either block is not owned
    /// - [`GraphError::PortAlreadyConnected`] if the source already drives a
    ///   connection or the target is already driven
    /// - [`GraphError::IllegalPort`] if either index is out of range
    /// - [`GraphError::AlreadyAliased`] if the target is a system input or the
    ///   source is a system output
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        let Connection { source, target } = connection;
        expect_direction(source, PortDirection::Output)?;
        expect_direction(target, PortDirection::Input)?;

        for block in [source.block, target.block] {
            if !self.blocks.contains(block) {
                return Err(GraphError::ForeignBlock(block));
            }
        }
        for port in [source, target] {
            if self.is_port_connected(port) {
                return Err(GraphError::PortAlreadyConnected(port));
            }
        }
        self.check_port(source)?;
        self.check_port(target)?;
        if self.inputs.contains(&target) {
            return Err(GraphError::AlreadyAliased(target));
        }
        if self.outputs.contains(&source) {
            return Err(GraphError::AlreadyAliased(source));
        }

        self.connections
            .entry(source.block)
            .or_default()
            .push(connection);
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_connect: {connection}");
        Ok(())
    }

    /// Removes a structurally equal connection.
    ///
    /// # Errors
    ///
    /// [`GraphError::ConnectionNotFound`] if no such connection exists.
    pub fn remove_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        let list = self
            .connections
            .get_mut(&connection.source.block)
            .ok_or(GraphError::ConnectionNotFound(connection))?;
        let slot = list
            .iter()
            .position(|c| *c == connection)
            .ok_or(GraphError::ConnectionNotFound(connection))?;
        list.remove(slot);
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_disconnect: {connection}");
        Ok(())
    }

    /// Returns true if a structurally equal connection exists.
    pub fn has_connection(&self, connection: Connection) -> bool {
        self.connections
            .get(&connection.source.block)
            .is_some_and(|list| list.contains(&connection))
    }

    /// Returns true if the port takes part in a connection.
    ///
    /// An output port is connected when it is the source of a connection, an
    /// input port when it is the target of one.
    pub fn is_port_connected(&self, port: PortRef) -> bool {
        match port.direction {
            PortDirection::Output => self
                .connections
                .get(&port.block)
                .is_some_and(|list| list.iter().any(|c| c.source == port)),
            PortDirection::Input => self.connections().any(|c| c.target == port),
        }
    }

    /// Every connection, grouped by source block.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.values().flatten()
    }

    /// Total number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.values().map(Vec::len).sum()
    }

    // --- Aliases ---

    /// Exposes an inner input port as the next system input.
    ///
    /// Returns the new external input index.
    ///
    /// # Errors
    ///
    /// - [`GraphError::WrongDirection`] if `port` is not an input port
    /// - [`GraphError::BlockNotFound`] if its block is not owned
    /// - [`GraphError::IllegalPort`] if the index is out of range
    /// - [`GraphError::PortAlreadyConnected`] if the port is a connection target
    /// - [`GraphError::AlreadyAliased`] if the port is already a system input
    pub fn add_input(&mut self, port: PortRef) -> Result<usize, GraphError> {
        expect_direction(port, PortDirection::Input)?;
        self.check_alias(port, &self.inputs)?;
        self.inputs.push(port);
        self.io.push_input();
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_alias: input {} -> {port}", self.inputs.len() - 1);
        Ok(self.inputs.len() - 1)
    }

    /// Exposes an inner output port as the next system output.
    ///
    /// Returns the new external output index.
    ///
    /// # Errors
    ///
    /// As [`add_input`](Self::add_input), with the port required to be an
    /// output and not the source of a connection.
    pub fn add_output(&mut self, port: PortRef) -> Result<usize, GraphError> {
        expect_direction(port, PortDirection::Output)?;
        self.check_alias(port, &self.outputs)?;
        self.outputs.push(port);
        self.io.push_output();
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_alias: output {} <- {port}", self.outputs.len() - 1);
        Ok(self.outputs.len() - 1)
    }

    /// Removes a system input alias. Later inputs shift down by one.
    ///
    /// # Errors
    ///
    /// [`GraphError::AliasNotFound`] if the port is not a system input.
    pub fn remove_input(&mut self, port: PortRef) -> Result<(), GraphError> {
        let external = self
            .inputs
            .iter()
            .position(|p| *p == port)
            .ok_or(GraphError::AliasNotFound(port))?;
        self.inputs.remove(external);
        self.io.remove_input(external);
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_unalias: input {external} ({port})");
        Ok(())
    }

    /// Removes a system output alias. Later outputs shift down by one.
    ///
    /// # Errors
    ///
    /// [`GraphError::AliasNotFound`] if the port is not a system output.
    pub fn remove_output(&mut self, port: PortRef) -> Result<(), GraphError> {
        let external = self
            .outputs
            .iter()
            .position(|p| *p == port)
            .ok_or(GraphError::AliasNotFound(port))?;
        self.outputs.remove(external);
        self.io.remove_output(external);
        self.invalidate();
        #[cfg(feature = "tracing")]
        tracing::debug!("system_unalias: output {external} ({port})");
        Ok(())
    }

    /// System input aliases, indexed by external input.
    pub fn input_aliases(&self) -> &[PortRef] {
        &self.inputs
    }

    /// System output aliases, indexed by external output.
    pub fn output_aliases(&self) -> &[PortRef] {
        &self.outputs
    }

    // --- Planning ---

    /// Returns true if the topology changed since the last rebuild.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuilds the schedule if the topology changed, and returns it.
    ///
    /// Nested systems are prepared too, whether or not this one is dirty.
    /// Call this from the control thread after editing so the next
    /// [`evaluate()`](Block::evaluate) does no planning work.
    pub fn prepare(&mut self) -> &CompiledSchedule {
        self.blocks.prepare();
        if self.dirty {
            self.schedule = CompiledSchedule::compile(
                &self.blocks,
                &self.connections,
                &self.inputs,
                &self.outputs,
            );
            self.dirty = false;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "system_plan: {} blocks, {} steps, {} feedback connections",
                self.schedule.order().len(),
                self.schedule.step_count(),
                self.schedule.feedback_connections().len()
            );
        }
        &self.schedule
    }

    /// Current schedule, or `None` if it is stale.
    pub fn schedule(&self) -> Option<&CompiledSchedule> {
        (!self.dirty).then_some(&self.schedule)
    }

    /// Block ids in evaluation order, rebuilding the plan if needed.
    pub fn evaluation_order(&mut self) -> &[BlockId] {
        self.prepare().order()
    }

    /// Connections cut for ordering, rebuilding the plan if needed.
    pub fn feedback_connections(&mut self) -> &[Connection] {
        self.prepare().feedback_connections()
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn check_port(&self, port: PortRef) -> Result<(), GraphError> {
        self.blocks
            .get(port.block)
            .ok_or(GraphError::BlockNotFound(port.block))?
            .io()
            .check_port(port.direction, port.index)
    }

    fn check_alias(&self, port: PortRef, existing: &[PortRef]) -> Result<(), GraphError> {
        self.check_port(port)?;
        if self.is_port_connected(port) {
            return Err(GraphError::PortAlreadyConnected(port));
        }
        if existing.contains(&port) {
            return Err(GraphError::AlreadyAliased(port));
        }
        Ok(())
    }
}

fn expect_direction(port: PortRef, expected: PortDirection) -> Result<(), GraphError> {
    if port.direction == expected {
        Ok(())
    } else {
        Err(GraphError::WrongDirection { port, expected })
    }
}

impl Block for BlockSystem {
    fn io(&self) -> &BlockIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }

    fn evaluate(&mut self) {
        if self.dirty {
            self.prepare();
        }
        self.schedule.run(&mut self.blocks, &mut self.io);
    }

    fn prepare(&mut self) {
        BlockSystem::prepare(self);
    }

    fn reset(&mut self) {
        self.blocks.reset();
        self.io.clear();
    }

    fn name(&self) -> &str {
        self.io.name().unwrap_or("system")
    }
}
