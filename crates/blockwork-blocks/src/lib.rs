//! Blockwork Blocks - concrete processing blocks
//!
//! Each block is a small function from N floats to M floats built on
//! [`blockwork_core::BlockIo`]:
//!
//! - [`Gain`] - 1 → 1, multiplies by a constant
//! - [`Delay`] - 1 → 1, reads the input back a fixed number of samples later
//! - [`Adder`] - N → 1, sums its inputs
//! - [`Splitter`] - 1 → N, copies its input to every output
//!
//! plus [`ShiftRegister`], the ring buffer behind [`Delay`], and
//! [`echo_patch`], the delay-with-feedback effect wired from these blocks.
//!
//! ## Example
//!
//! ```rust
//! use blockwork_blocks::{Gain, Splitter};
//! use blockwork_core::{Block, BlockSystem, Connection, PortRef};
//!
//! let mut system = BlockSystem::new();
//! let split = system.add_block(Box::new(Splitter::new(2))).unwrap();
//! let half = system.add_block(Box::new(Gain::new(0.5))).unwrap();
//! system.add_connection(Connection::between(split, 1, half, 0)).unwrap();
//! system.add_input(PortRef::input(split, 0)).unwrap();
//! system.add_output(PortRef::output(split, 0)).unwrap();
//! system.add_output(PortRef::output(half, 0)).unwrap();
//!
//! system.set_input(0.8, 0).unwrap();
//! system.evaluate();
//! assert_eq!(system.output(0).unwrap(), 0.8);
//! assert_eq!(system.output(1).unwrap(), 0.4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod adder;
pub mod delay;
pub mod echo;
pub mod gain;
pub mod shift_register;
pub mod splitter;

pub use adder::Adder;
pub use delay::{Delay, MAX_DELAY_SAMPLES};
pub use echo::{EchoParams, echo_patch};
pub use gain::Gain;
pub use shift_register::ShiftRegister;
pub use splitter::Splitter;
