//! Blockwork Core - block/port model and dataflow evaluation for audio graphs
//!
//! This crate provides the container and scheduling layer for block-based
//! signal processing: blocks with float-valued input/output ports are wired
//! into a directed graph that is evaluated one tick (one sample) at a time.
//!
//! # Core Abstractions
//!
//! - [`Block`] - Object-safe capability trait: fixed port counts plus `evaluate()`
//! - [`BlockIo`] - Identity and port storage embedded in every block
//! - [`Composite`] - Ordered container of owned blocks (no connection semantics)
//! - [`BlockSystem`] - Blocks + connections + external aliases; itself a [`Block`]
//! - [`planner`] - Feedback-edge detection and deterministic topological ordering
//!
//! # Feedback Loops
//!
//! Cycles are legal. The planner cuts the edges that would close a cycle
//! relative to its depth-first traversal and orders the remaining acyclic graph.
//! Values still travel over every connection each tick, so a feedback
//! connection carries the value its source produced on the previous tick:
//! exactly one tick of latency, as in a delay-with-feedback effect.
//!
//! # Example
//!
//! ```rust
//! use blockwork_core::{Block, BlockIo, BlockSystem, Connection, PortRef};
//!
//! struct Gain {
//!     io: BlockIo,
//!     gain: f32,
//! }
//!
//! impl Block for Gain {
//!     fn io(&self) -> &BlockIo {
//!         &self.io
//!     }
//!     fn io_mut(&mut self) -> &mut BlockIo {
//!         &mut self.io
//!     }
//!     fn evaluate(&mut self) {
//!         let x = self.io.inputs()[0];
//!         self.io.outputs_mut()[0] = x * self.gain;
//!     }
//! }
//!
//! let mut system = BlockSystem::new();
//! let a = system.add_block(Box::new(Gain { io: BlockIo::new(1, 1), gain: 2.0 })).unwrap();
//! let b = system.add_block(Box::new(Gain { io: BlockIo::new(1, 1), gain: 4.0 })).unwrap();
//! system.add_connection(Connection::between(a, 0, b, 0)).unwrap();
//! system.add_input(PortRef::input(a, 0)).unwrap();
//! system.add_output(PortRef::output(b, 0)).unwrap();
//!
//! system.set_input(1.0, 0).unwrap();
//! system.evaluate();
//! assert_eq!(system.output(0).unwrap(), 8.0);
//! ```
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible with `alloc`. Disable the default `std`
//! feature to build for embedded targets.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod block;
pub mod error;
pub mod graph;

pub use block::{Block, BlockIo};
pub use error::{ErrorKind, GraphError};
pub use graph::{
    BlockId, BlockSystem, CompiledSchedule, Composite, Connection, EvaluationPlan, FeedbackEdge,
    PortDirection, PortRef, ProcessStep, planner,
};
