//! Delay-with-feedback echo assembled from basic blocks.
//!
//! ```text
//!              ┌──► dry_gain ───────────────────────────────┐
//!  in ► input_splitter                                      ├─► output_adder ► out
//!              └──► input_adder ► delay ► delay_splitter ─► wet_gain ──┘
//!                       ▲                       │
//!                       └──── feedback_gain ◄───┘
//! ```
//!
//! The loop through `feedback_gain` is cut for ordering, so each repeat takes
//! `delay + 1` samples: the delay line plus one tick on the feedback connection.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use blockwork_core::{Block, BlockSystem, Connection, GraphError, PortRef};

use crate::{Adder, Delay, Gain, Splitter};

/// Parameters of [`echo_patch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EchoParams {
    /// Linear gain of the direct signal.
    pub dry: f32,
    /// Linear gain of the delayed signal.
    pub wet: f32,
    /// Linear gain of the delayed signal fed back into the delay.
    pub feedback: f32,
    /// Delay time in seconds.
    pub time: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            dry: 0.6,
            wet: 0.4,
            feedback: 0.3,
            time: 0.8,
        }
    }
}

/// Builds the echo as a prepared system with one input and one output.
///
/// # Example
///
/// ```rust
/// use blockwork_blocks::{EchoParams, echo_patch};
/// use blockwork_core::Block;
///
/// let mut echo = echo_patch(&EchoParams::default(), 48_000.0).unwrap();
/// echo.set_input(1.0, 0).unwrap();
/// echo.evaluate();
/// assert!((echo.output(0).unwrap() - 0.6).abs() < 1e-6);
/// ```
pub fn echo_patch(params: &EchoParams, sample_rate: f32) -> Result<BlockSystem, GraphError> {
    let mut system = BlockSystem::new();
    system.io_mut().set_name("echo");

    let dry = system.add_block(Box::new(Gain::named("dry_gain", params.dry)))?;
    let wet = system.add_block(Box::new(Gain::named("wet_gain", params.wet)))?;
    let feedback = system.add_block(Box::new(Gain::named("feedback_gain", params.feedback)))?;
    let delay = system.add_block(Box::new(Delay::named("delay", params.time, sample_rate)))?;
    let input_adder = system.add_block(Box::new(Adder::named("input_adder", 2)))?;
    let output_adder = system.add_block(Box::new(Adder::named("output_adder", 2)))?;
    let input_splitter = system.add_block(Box::new(Splitter::named("input_splitter", 2)))?;
    let delay_splitter = system.add_block(Box::new(Splitter::named("delay_splitter", 2)))?;

    for connection in [
        Connection::between(input_splitter, 0, dry, 0),
        Connection::between(input_splitter, 1, input_adder, 0),
        Connection::between(dry, 0, output_adder, 0),
        Connection::between(input_adder, 0, delay, 0),
        Connection::between(delay, 0, delay_splitter, 0),
        Connection::between(delay_splitter, 0, wet, 0),
        Connection::between(wet, 0, output_adder, 1),
        Connection::between(delay_splitter, 1, feedback, 0),
        Connection::between(feedback, 0, input_adder, 1),
    ] {
        system.add_connection(connection)?;
    }

    system.add_input(PortRef::input(input_splitter, 0))?;
    system.add_output(PortRef::output(output_adder, 0))?;
    system.prepare();
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let p = EchoParams::default();
        assert_eq!((p.dry, p.wet, p.feedback, p.time), (0.6, 0.4, 0.3, 0.8));
    }

    #[test]
    fn topology_shape() {
        let mut echo = echo_patch(&EchoParams::default(), 48_000.0).unwrap();
        assert_eq!(echo.block_count(), 8);
        assert_eq!(echo.connection_count(), 9);
        assert_eq!(echo.input_count(), 1);
        assert_eq!(echo.output_count(), 1);
        assert_eq!(echo.name(), "echo");
        assert!(!echo.is_dirty());

        let feedback = echo.feedback_connections().to_vec();
        assert_eq!(feedback.len(), 1);
        let target = echo.block(feedback[0].target.block).unwrap();
        assert_eq!(target.name(), "feedback_gain");
    }
}
