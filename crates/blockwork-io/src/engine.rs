//! Real-time host for a [`BlockSystem`].
//!
//! [`SystemEngine`] lives inside the transport callback and evaluates its
//! system once per sample. Topology edits never happen there: the control
//! thread builds and prepares a complete replacement system and hands it over
//! through a [`SystemSender`]. At the start of each buffer the engine polls
//! for a replacement with a non-blocking receive, swaps it in, and ships the
//! old system back so it is dropped off the audio thread.
//!
//! ```text
//!  control thread                         audio thread
//!  ──────────────                         ────────────
//!  build + prepare ── SystemSender ─────► try_recv, swap
//!  collect_retired ◄─ retired systems ─── old system
//! ```

use blockwork_core::{Block, BlockSystem};
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Slots for systems waiting to be dropped by the control thread.
const RETIRE_CAPACITY: usize = 4;

/// Failure to hand a system to its engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A previously sent system has not been picked up yet.
    #[error("a replacement system is already pending")]
    Busy,
    /// The engine has been dropped.
    #[error("the engine is no longer running")]
    Disconnected,
}

/// Evaluates a [`BlockSystem`] sample by sample from a transport callback.
///
/// Input 0 of the system receives the transport input and output 0 feeds the
/// transport output. A system with no inputs ignores the transport input; a
/// system with no outputs produces silence.
#[derive(Debug)]
pub struct SystemEngine {
    system: BlockSystem,
    incoming: Receiver<BlockSystem>,
    retired: Sender<BlockSystem>,
    swaps: u64,
}

/// Control-side handle of a [`SystemEngine`].
#[derive(Debug)]
pub struct SystemSender {
    outgoing: Sender<BlockSystem>,
    retired: Receiver<BlockSystem>,
}

impl SystemEngine {
    /// Wraps `system` and returns the engine with its control handle.
    ///
    /// The system is prepared here so the first buffer does no planning.
    pub fn new(mut system: BlockSystem) -> (Self, SystemSender) {
        system.prepare();
        let (outgoing, incoming) = crossbeam_channel::bounded(1);
        let (retired_tx, retired_rx) = crossbeam_channel::bounded(RETIRE_CAPACITY);
        tracing::debug!(
            blocks = system.block_count(),
            connections = system.connection_count(),
            "engine created"
        );
        (
            Self {
                system,
                incoming,
                retired: retired_tx,
                swaps: 0,
            },
            SystemSender {
                outgoing,
                retired: retired_rx,
            },
        )
    }

    /// The system currently being evaluated.
    pub fn system(&self) -> &BlockSystem {
        &self.system
    }

    /// Mutable access for block state and parameter edits.
    ///
    /// Topology edits here would leave the system dirty and make the next
    /// buffer plan on the audio thread. Build a new system and hand it over
    /// through [`SystemSender`] instead.
    pub fn system_mut(&mut self) -> &mut BlockSystem {
        &mut self.system
    }

    /// Number of systems swapped in since construction.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// Swaps in a pending replacement, if any. Returns whether a swap happened.
    ///
    /// Called automatically at the start of [`process_buffer`](Self::process_buffer).
    pub fn poll_replacement(&mut self) -> bool {
        let Ok(next) = self.incoming.try_recv() else {
            return false;
        };

        let old = std::mem::replace(&mut self.system, next);
        self.swaps += 1;
        tracing::debug!(swaps = self.swaps, "swapped in replacement system");

        if let Err(TrySendError::Full(old) | TrySendError::Disconnected(old)) =
            self.retired.try_send(old)
        {
            tracing::warn!("retire queue unavailable, dropping old system in place");
            drop(old);
        }
        true
    }

    /// Evaluates one tick with `input` on system input 0.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let io = self.system.io_mut();
        if let Some(slot) = io.inputs_mut().first_mut() {
            *slot = input;
        }
        self.system.evaluate();
        self.system.io().outputs().first().copied().unwrap_or(0.0)
    }

    /// Processes one transport buffer.
    ///
    /// Picks up a pending replacement first, so a swap always lands on a
    /// buffer boundary. `output` must be at least as long as `input`.
    pub fn process_buffer(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(output.len() >= input.len());
        self.poll_replacement();
        for (y, &x) in output.iter_mut().zip(input) {
            *y = self.process_sample(x);
        }
    }

    /// Renders a whole signal in `block_size` buffers.
    pub fn process_file(&mut self, input: &[f32], block_size: usize) -> Vec<f32> {
        let block_size = block_size.max(1);
        let mut output = vec![0.0; input.len()];
        for (in_chunk, out_chunk) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            self.process_buffer(in_chunk, out_chunk);
        }
        output
    }

    /// Resets the current system's blocks.
    pub fn reset(&mut self) {
        self.system.reset();
    }
}

impl SystemSender {
    /// Sends a replacement, blocking until the engine has taken the previous one.
    ///
    /// The system is prepared before it leaves this thread.
    pub fn send(&self, mut system: BlockSystem) -> Result<(), EngineError> {
        system.prepare();
        self.outgoing
            .send(system)
            .map_err(|_| EngineError::Disconnected)
    }

    /// Sends a replacement without blocking.
    ///
    /// Fails with [`EngineError::Busy`] while an earlier replacement is still
    /// pending; the rejected system is dropped.
    pub fn try_send(&self, mut system: BlockSystem) -> Result<(), EngineError> {
        system.prepare();
        self.outgoing.try_send(system).map_err(|e| match e {
            TrySendError::Full(_) => EngineError::Busy,
            TrySendError::Disconnected(_) => EngineError::Disconnected,
        })
    }

    /// Whether a sent system is still waiting to be swapped in.
    pub fn is_pending(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Drops every system the engine has retired. Returns how many there were.
    pub fn collect_retired(&self) -> usize {
        self.retired.try_iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwork_core::{BlockIo, Connection, PortRef};

    struct Scale {
        io: BlockIo,
        factor: f32,
    }

    impl Block for Scale {
        fn io(&self) -> &BlockIo {
            &self.io
        }
        fn io_mut(&mut self) -> &mut BlockIo {
            &mut self.io
        }
        fn evaluate(&mut self) {
            let x = self.io.inputs()[0];
            self.io.outputs_mut()[0] = x * self.factor;
        }
    }

    fn scaler(factor: f32) -> BlockSystem {
        let mut system = BlockSystem::new();
        let id = system
            .add_block(Box::new(Scale {
                io: BlockIo::new(1, 1),
                factor,
            }))
            .unwrap();
        system.add_input(PortRef::input(id, 0)).unwrap();
        system.add_output(PortRef::output(id, 0)).unwrap();
        system
    }

    #[test]
    fn new_prepares_system() {
        assert!(scaler(2.0).is_dirty());
        let (engine, _sender) = SystemEngine::new(scaler(2.0));
        assert!(!engine.system().is_dirty());
    }

    #[test]
    fn processes_sample_by_sample() {
        let (mut engine, _sender) = SystemEngine::new(scaler(3.0));
        assert_eq!(engine.process_sample(2.0), 6.0);
        assert_eq!(engine.process_file(&[1.0, -1.0, 0.5], 2), vec![3.0, -3.0, 1.5]);
    }

    #[test]
    fn swap_lands_on_buffer_boundary() {
        let (mut engine, sender) = SystemEngine::new(scaler(1.0));
        let mut out = [0.0; 2];
        engine.process_buffer(&[1.0, 1.0], &mut out);
        assert_eq!(out, [1.0, 1.0]);

        sender.send(scaler(5.0)).unwrap();
        assert!(sender.is_pending());
        engine.process_buffer(&[1.0, 1.0], &mut out);
        assert_eq!(out, [5.0, 5.0]);
        assert!(!sender.is_pending());
        assert_eq!(engine.swap_count(), 1);
        assert_eq!(sender.collect_retired(), 1);
        assert_eq!(sender.collect_retired(), 0);
    }

    #[test]
    fn try_send_reports_busy_until_picked_up() {
        let (mut engine, sender) = SystemEngine::new(scaler(1.0));
        sender.try_send(scaler(2.0)).unwrap();
        assert_eq!(sender.try_send(scaler(3.0)), Err(EngineError::Busy));

        assert!(engine.poll_replacement());
        assert!(!engine.poll_replacement());
        sender.try_send(scaler(4.0)).unwrap();
        assert!(engine.poll_replacement());
        assert_eq!(engine.process_sample(1.0), 4.0);
    }

    #[test]
    fn dropped_engine_disconnects_sender() {
        let (engine, sender) = SystemEngine::new(scaler(1.0));
        drop(engine);
        assert_eq!(sender.send(scaler(2.0)), Err(EngineError::Disconnected));
        assert_eq!(sender.try_send(scaler(2.0)), Err(EngineError::Disconnected));
    }

    #[test]
    fn full_retire_queue_does_not_stall_swaps() {
        let (mut engine, sender) = SystemEngine::new(scaler(0.0));
        for factor in 1..=RETIRE_CAPACITY + 2 {
            sender.send(scaler(factor as f32)).unwrap();
            assert!(engine.poll_replacement());
        }
        assert_eq!(engine.process_sample(1.0), (RETIRE_CAPACITY + 2) as f32);
        assert_eq!(sender.collect_retired(), RETIRE_CAPACITY);
    }

    #[test]
    fn system_without_ports_is_silent() {
        let (mut engine, _sender) = SystemEngine::new(BlockSystem::new());
        assert_eq!(engine.process_file(&[1.0, 2.0], 8), vec![0.0, 0.0]);
    }

    /// Multiplies input 0 by input 1. Input 1 is left unconnected as a gain control.
    struct Mul {
        io: BlockIo,
    }

    impl Block for Mul {
        fn io(&self) -> &BlockIo {
            &self.io
        }
        fn io_mut(&mut self) -> &mut BlockIo {
            &mut self.io
        }
        fn evaluate(&mut self) {
            let [x, gain] = [self.io.inputs()[0], self.io.inputs()[1]];
            self.io.outputs_mut()[0] = x * gain;
        }
    }

    #[test]
    fn state_edits_through_system_mut_keep_the_plan() {
        let mut system = BlockSystem::new();
        let a = system
            .add_block(Box::new(Scale {
                io: BlockIo::new(1, 1),
                factor: 2.0,
            }))
            .unwrap();
        let b = system
            .add_block(Box::new(Mul {
                io: BlockIo::new(2, 1),
            }))
            .unwrap();
        system.add_connection(Connection::between(a, 0, b, 0)).unwrap();
        system.add_input(PortRef::input(a, 0)).unwrap();
        system.add_output(PortRef::output(b, 0)).unwrap();

        let (mut engine, _sender) = SystemEngine::new(system);
        assert_eq!(engine.process_sample(1.0), 0.0);

        let gain = engine.system_mut().block_mut(b).unwrap();
        gain.io_mut().inputs_mut()[1] = 3.0;
        gain.io_mut().set_name("gain");
        assert!(!engine.system().is_dirty());
        assert_eq!(engine.process_sample(1.0), 6.0);
        assert_eq!(engine.system().block(b).unwrap().io().name(), Some("gain"));
    }
}
