//! Fan-out block.

use blockwork_core::{Block, BlockIo};

/// Copies its single input to `n` outputs.
///
/// Each output port can drive at most one connection, so fan-out in a
/// [`BlockSystem`](blockwork_core::BlockSystem) goes through a splitter.
#[derive(Debug)]
pub struct Splitter {
    io: BlockIo,
}

impl Splitter {
    /// Creates a splitter with `outputs` output ports.
    pub fn new(outputs: usize) -> Self {
        Self {
            io: BlockIo::new(1, outputs),
        }
    }

    /// Creates a named splitter.
    pub fn named(name: &str, outputs: usize) -> Self {
        let mut block = Self::new(outputs);
        block.io.set_name(name);
        block
    }
}

impl Block for Splitter {
    fn io(&self) -> &BlockIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }

    #[inline]
    fn evaluate(&mut self) {
        let x = self.io.inputs()[0];
        self.io.outputs_mut().fill(x);
    }

    fn name(&self) -> &str {
        self.io.name().unwrap_or("splitter")
    }
}
