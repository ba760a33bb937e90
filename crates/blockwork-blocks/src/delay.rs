//! Integer-sample delay line block.
//!
//! [`Delay`] pushes its input into a [`ShiftRegister`] every tick and outputs
//! the value pushed `n` ticks earlier, with `n = floor(sample_rate * time)`.
//! A delay of zero samples passes the current input straight through.
//!
//! # Memory
//!
//! Every delay owns a register of [`MAX_DELAY_SAMPLES`] floats allocated at
//! construction, so changing the time never reallocates.

use blockwork_core::{Block, BlockIo};

use crate::shift_register::ShiftRegister;

/// Register capacity of every [`Delay`], in samples.
///
/// Longest usable delay is one sample less (about 2.7 s at 48 kHz).
pub const MAX_DELAY_SAMPLES: usize = 131_072;

/// Delays its single input by a whole number of samples.
///
/// # Example
///
/// ```rust
/// use blockwork_blocks::Delay;
/// use blockwork_core::Block;
///
/// // 2 samples at 4 Hz.
/// let mut delay = Delay::new(0.5, 4.0);
/// let outputs: Vec<f32> = [1.0, 0.0, 0.0, 0.0]
///     .iter()
///     .map(|&x| {
///         delay.set_input(x, 0).unwrap();
///         delay.evaluate();
///         delay.output(0).unwrap()
///     })
///     .collect();
/// assert_eq!(outputs, vec![0.0, 0.0, 1.0, 0.0]);
/// ```
#[derive(Debug)]
pub struct Delay {
    io: BlockIo,
    register: ShiftRegister<f32>,
    samples: usize,
    sample_rate: f32,
}

impl Delay {
    /// Creates a delay of `time` seconds at `sample_rate`.
    ///
    /// Times beyond the register capacity are clamped; negative or NaN times
    /// give a zero-sample delay.
    pub fn new(time: f32, sample_rate: f32) -> Self {
        Self {
            io: BlockIo::new(1, 1),
            register: ShiftRegister::new(MAX_DELAY_SAMPLES),
            samples: samples_for(time, sample_rate),
            sample_rate,
        }
    }

    /// Creates a named delay.
    pub fn named(name: &str, time: f32, sample_rate: f32) -> Self {
        let mut block = Self::new(time, sample_rate);
        block.io.set_name(name);
        block
    }

    /// Sets the delay time in seconds. History is kept.
    pub fn set_time(&mut self, time: f32) {
        self.samples = samples_for(time, self.sample_rate);
    }

    /// Current delay in samples.
    pub fn delay_samples(&self) -> usize {
        self.samples
    }

    /// Current delay in seconds.
    pub fn time(&self) -> f32 {
        self.samples as f32 / self.sample_rate
    }
}

fn samples_for(time: f32, sample_rate: f32) -> usize {
    // `as` saturates: negative and NaN become 0.
    ((sample_rate * time) as usize).min(MAX_DELAY_SAMPLES - 1)
}

impl Block for Delay {
    fn io(&self) -> &BlockIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }

    #[inline]
    fn evaluate(&mut self) {
        self.register.push(self.io.inputs()[0]);
        self.io.outputs_mut()[0] = self.register.at(self.samples);
    }

    fn reset(&mut self) {
        self.io.clear();
        self.register.clear();
    }

    fn name(&self) -> &str {
        self.io.name().unwrap_or("delay")
    }
}
