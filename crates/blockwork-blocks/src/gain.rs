//! Constant gain.

use blockwork_core::{Block, BlockIo};

/// Multiplies its single input by a constant.
///
/// # Example
///
/// ```rust
/// use blockwork_blocks::Gain;
/// use blockwork_core::Block;
///
/// let mut gain = Gain::new(0.5);
/// gain.set_input(0.8, 0).unwrap();
/// gain.evaluate();
/// assert_eq!(gain.output(0).unwrap(), 0.4);
/// ```
#[derive(Debug)]
pub struct Gain {
    io: BlockIo,
    gain: f32,
}

impl Gain {
    /// Creates a gain block with a linear factor.
    pub fn new(gain: f32) -> Self {
        Self {
            io: BlockIo::new(1, 1),
            gain,
        }
    }

    /// Creates a named gain block.
    pub fn named(name: &str, gain: f32) -> Self {
        let mut block = Self::new(gain);
        block.io.set_name(name);
        block
    }

    /// Returns the linear factor.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Sets the linear factor.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}

impl Block for Gain {
    fn io(&self) -> &BlockIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }

    #[inline]
    fn evaluate(&mut self) {
        let x = self.io.inputs()[0];
        self.io.outputs_mut()[0] = x * self.gain;
    }

    fn name(&self) -> &str {
        self.io.name().unwrap_or("gain")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_input() {
        let mut gain = Gain::new(-2.0);
        gain.set_input(0.25, 0).unwrap();
        gain.evaluate();
        assert_eq!(gain.output(0).unwrap(), -0.5);
    }

    #[test]
    fn set_gain_takes_effect_next_tick() {
        let mut gain = Gain::new(1.0);
        gain.set_input(1.0, 0).unwrap();
        gain.evaluate();
        gain.set_gain(3.0);
        assert_eq!(gain.output(0).unwrap(), 1.0);
        gain.evaluate();
        assert_eq!(gain.output(0).unwrap(), 3.0);
    }

    #[test]
    fn one_port_each_way() {
        let mut gain = Gain::named("dry", 1.0);
        assert_eq!(gain.input_count(), 1);
        assert_eq!(gain.output_count(), 1);
        assert!(gain.set_input(1.0, 1).is_err());
        assert_eq!(gain.name(), "dry");
        assert_eq!(Gain::new(1.0).name(), "gain");
    }
}
