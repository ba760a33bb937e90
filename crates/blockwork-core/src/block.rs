//! Core Block trait and per-block port storage.
//!
//! The [`Block`] trait is the only capability a container depends on: fixed
//! input/output port counts and an `evaluate()` step that reads the current
//! inputs and writes the current outputs. Concrete blocks embed a [`BlockIo`]
//! which holds their identity and port values, and get the checked
//! `set_input` / `output` accessors for free.
//!
//! ## Design Decisions
//!
//! - **Scalar ports**: one `f32` per port per tick. A tick is one sample.
//! - **Object-safe**: containers store `Box<dyn Block>`, so concrete block
//!   types never leak into the graph code.
//! - **No allocations**: `evaluate()` is called from the audio callback and
//!   must only do arithmetic and indexed reads/writes.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use crate::error::GraphError;
use crate::graph::{BlockId, PortDirection};

/// Identity, optional name and port values of a block.
///
/// Port vectors are sized at construction and only change length when a
/// [`BlockSystem`](crate::BlockSystem) grows or shrinks its external aliases.
#[derive(Debug)]
pub struct BlockIo {
    id: BlockId,
    name: Option<String>,
    inputs: Vec<f32>,
    outputs: Vec<f32>,
}

impl BlockIo {
    /// Creates port storage with the given counts, all ports at `0.0`.
    ///
    /// A fresh [`BlockId`] is allocated for the owning block.
    pub fn new(input_count: usize, output_count: usize) -> Self {
        Self {
            id: BlockId::next(),
            name: None,
            inputs: vec![0.0; input_count],
            outputs: vec![0.0; output_count],
        }
    }

    #[cfg(test)]
    pub(crate) fn with_id(id: BlockId, input_count: usize, output_count: usize) -> Self {
        Self {
            id,
            ..Self::new(input_count, output_count)
        }
    }

    /// Returns the identity of the owning block.
    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the block's name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets a human-readable name used in logs and listings.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Number of input ports.
    #[inline]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output ports.
    #[inline]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Current input values.
    #[inline]
    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    /// Mutable input values.
    #[inline]
    pub fn inputs_mut(&mut self) -> &mut [f32] {
        &mut self.inputs
    }

    /// Current output values.
    #[inline]
    pub fn outputs(&self) -> &[f32] {
        &self.outputs
    }

    /// Mutable output values, written by `evaluate()`.
    #[inline]
    pub fn outputs_mut(&mut self) -> &mut [f32] {
        &mut self.outputs
    }

    /// Writes input port `port`.
    pub fn set_input(&mut self, value: f32, port: usize) -> Result<(), GraphError> {
        match self.inputs.get_mut(port) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(self.illegal(PortDirection::Input, port)),
        }
    }

    /// Reads output port `port`.
    pub fn output(&self, port: usize) -> Result<f32, GraphError> {
        self.outputs
            .get(port)
            .copied()
            .ok_or_else(|| self.illegal(PortDirection::Output, port))
    }

    /// Checks that `port` exists on the given side.
    pub fn check_port(&self, direction: PortDirection, port: usize) -> Result<(), GraphError> {
        let count = match direction {
            PortDirection::Input => self.inputs.len(),
            PortDirection::Output => self.outputs.len(),
        };
        if port < count {
            Ok(())
        } else {
            Err(self.illegal(direction, port))
        }
    }

    /// Zeroes every port.
    pub fn clear(&mut self) {
        self.inputs.fill(0.0);
        self.outputs.fill(0.0);
    }

    pub(crate) fn push_input(&mut self) {
        self.inputs.push(0.0);
    }

    pub(crate) fn remove_input(&mut self, index: usize) {
        self.inputs.remove(index);
    }

    pub(crate) fn push_output(&mut self) {
        self.outputs.push(0.0);
    }

    pub(crate) fn remove_output(&mut self, index: usize) {
        self.outputs.remove(index);
    }

    fn illegal(&self, direction: PortDirection, index: usize) -> GraphError {
        let count = match direction {
            PortDirection::Input => self.inputs.len(),
            PortDirection::Output => self.outputs.len(),
        };
        GraphError::IllegalPort {
            block: self.id,
            direction,
            index,
            count,
        }
    }
}

/// Core trait for all processing blocks.
///
/// Implementors provide access to their [`BlockIo`] and an `evaluate()` step.
/// Everything a container needs beyond that is a provided method.
///
/// # Example
///
/// ```rust
/// use blockwork_core::{Block, BlockIo};
///
/// struct Invert {
///     io: BlockIo,
/// }
///
/// impl Block for Invert {
///     fn io(&self) -> &BlockIo {
///         &self.io
///     }
///
///     fn io_mut(&mut self) -> &mut BlockIo {
///         &mut self.io
///     }
///
///     fn evaluate(&mut self) {
///         let x = self.io.inputs()[0];
///         self.io.outputs_mut()[0] = -x;
///     }
/// }
///
/// let mut block = Invert { io: BlockIo::new(1, 1) };
/// block.set_input(0.25, 0).unwrap();
/// block.evaluate();
/// assert_eq!(block.output(0).unwrap(), -0.25);
/// assert!(block.output(1).is_err());
/// ```
pub trait Block: Send {
    /// Port storage and identity.
    fn io(&self) -> &BlockIo;

    /// Mutable port storage.
    fn io_mut(&mut self) -> &mut BlockIo;

    /// Reads the current inputs and writes the current outputs.
    ///
    /// May advance internal state (e.g. shift a delay line). Must be callable
    /// repeatedly; the only ordering requirement is that inputs are current.
    fn evaluate(&mut self);

    /// Builds any cached evaluation plan ahead of time.
    ///
    /// Atomic blocks have nothing to plan. Containers override this so that
    /// preparing an outer system also prepares every system nested in it.
    fn prepare(&mut self) {}

    /// Clears port values and any internal state.
    ///
    /// Default implementation zeroes the ports. Stateful blocks override this
    /// to also clear their history.
    fn reset(&mut self) {
        self.io_mut().clear();
    }

    /// Stable identity of this block.
    #[inline]
    fn id(&self) -> BlockId {
        self.io().id()
    }

    /// Human-readable name, `"block"` if none was set.
    fn name(&self) -> &str {
        self.io().name().unwrap_or("block")
    }

    /// Number of input ports.
    #[inline]
    fn input_count(&self) -> usize {
        self.io().input_count()
    }

    /// Number of output ports.
    #[inline]
    fn output_count(&self) -> usize {
        self.io().output_count()
    }

    /// Writes `value` into input port `port`.
    fn set_input(&mut self, value: f32, port: usize) -> Result<(), GraphError> {
        self.io_mut().set_input(value, port)
    }

    /// Reads output port `port`.
    fn output(&self, port: usize) -> Result<f32, GraphError> {
        self.io().output(port)
    }
}
