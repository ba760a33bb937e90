//! Audio I/O layer for blockwork systems.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading/saving mono audio
//! - **Transport**: the [`AudioBackend`] trait and a deterministic [`OfflineBackend`]
//! - **Hosting**: [`SystemEngine`] runs a [`BlockSystem`](blockwork_core::BlockSystem)
//!   one sample per tick from a transport callback, and picks up rebuilt systems
//!   sent through a [`SystemSender`] without blocking
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blockwork_blocks::{EchoParams, echo_patch};
//! use blockwork_io::{SystemEngine, read_wav, write_wav};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! let echo = echo_patch(&EchoParams::default(), spec.sample_rate as f32)?;
//! let (mut engine, _sender) = SystemEngine::new(echo);
//! let processed = engine.process_file(&samples, 512);
//! write_wav("output.wav", &processed, spec)?;
//! ```

pub mod backend;
mod engine;
mod wav;

pub use backend::{AudioBackend, BackendStreamConfig, OfflineBackend};
pub use engine::{EngineError, SystemEngine, SystemSender};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Building or editing a block system failed.
    #[error("Graph error: {0}")]
    Graph(#[from] blockwork_core::GraphError),

    /// Handing a system to a running engine failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
