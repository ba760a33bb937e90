//! Pluggable audio transport abstraction.
//!
//! A block system is driven by whatever moves samples in and out of the
//! process: a sound card driver, a plugin host, a DMA interrupt, or a file.
//! [`AudioBackend`] hides that behind one duplex callback that receives a
//! buffer of input samples and fills a buffer of the same length.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │  SystemEngine::process_buffer    │
//! └──────────────▲───────────────────┘
//!                │ duplex callback, once per buffer
//! ┌──────────────┴───────────────────┐
//! │        AudioBackend trait        │
//! └──────────────▲───────────────────┘
//!        ┌───────┴────────┐
//! ┌─────────────┐  ┌─────────────┐
//! │ Offline     │  │ (hardware,  │
//! │ (files, CI) │  │  host, ...) │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! The callback is a `&mut dyn FnMut`, so the trait stays object-safe and the
//! caller keeps ownership of whatever the callback captures.

use crate::Result;

/// Configuration for a transport run.
#[derive(Debug, Clone)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
        }
    }
}

/// Source and sink of mono sample buffers.
///
/// Implementations call `callback(input, output)` once per buffer with
/// `input.len() == output.len()`. On a real-time transport the callback runs
/// on the audio thread and must not allocate, lock, or block.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend.
    fn name(&self) -> &str;

    /// Runs the transport until its input is exhausted or it is stopped.
    fn run(
        &mut self,
        config: &BackendStreamConfig,
        callback: &mut dyn FnMut(&[f32], &mut [f32]),
    ) -> Result<()>;

    /// Sample rate the backend will actually use for `config`.
    ///
    /// Defaults to the requested rate.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        config.sample_rate
    }
}

/// Deterministic backend over in-memory buffers.
///
/// Feeds a fixed input signal through the callback in `buffer_size` chunks
/// (the last one possibly shorter), then appends `tail` buffers of silence
/// so decaying effects can ring out. Output accumulates in memory.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend {
    input: Vec<f32>,
    output: Vec<f32>,
    tail: usize,
    buffers: usize,
}

impl OfflineBackend {
    /// Creates a backend that plays `input` once.
    pub fn new(input: Vec<f32>) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Appends `samples` of silence after the input.
    pub fn with_tail(mut self, samples: usize) -> Self {
        self.tail = samples;
        self
    }

    /// Everything the callback has written so far.
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    /// Consumes the backend, returning the rendered output.
    pub fn into_output(self) -> Vec<f32> {
        self.output
    }

    /// Number of callback invocations in the last run.
    pub fn buffers_processed(&self) -> usize {
        self.buffers
    }
}

impl AudioBackend for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    fn run(
        &mut self,
        config: &BackendStreamConfig,
        callback: &mut dyn FnMut(&[f32], &mut [f32]),
    ) -> Result<()> {
        let block = (config.buffer_size as usize).max(1);
        let total = self.input.len() + self.tail;
        tracing::info!(
            backend = self.name(),
            samples = total,
            buffer_size = block,
            "starting run"
        );

        self.input.resize(total, 0.0);
        self.output.clear();
        self.output.resize(total, 0.0);
        self.buffers = 0;

        for (input, output) in self.input.chunks(block).zip(self.output.chunks_mut(block)) {
            callback(input, output);
            self.buffers += 1;
        }

        self.input.truncate(total - self.tail);
        tracing::info!(backend = self.name(), buffers = self.buffers, "run finished");
        Ok(())
    }
}
