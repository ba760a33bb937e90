//! N-input summing block.

use blockwork_core::{Block, BlockIo};

/// Sums `n` inputs into one output.
#[derive(Debug)]
pub struct Adder {
    io: BlockIo,
}

impl Adder {
    /// Creates an adder with `inputs` input ports.
    pub fn new(inputs: usize) -> Self {
        Self {
            io: BlockIo::new(inputs, 1),
        }
    }

    /// Creates a named adder.
    pub fn named(name: &str, inputs: usize) -> Self {
        let mut block = Self::new(inputs);
        block.io.set_name(name);
        block
    }
}

impl Block for Adder {
    fn io(&self) -> &BlockIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }

    #[inline]
    fn evaluate(&mut self) {
        let sum: f32 = self.io.inputs().iter().sum();
        self.io.outputs_mut()[0] = sum;
    }

    fn name(&self) -> &str {
        self.io.name().unwrap_or("adder")
    }
}
