//! Dataflow graph container and evaluation planning.
//!
//! The graph module turns a set of owned blocks plus port-to-port connections
//! into a flat, pre-resolved [`CompiledSchedule`] that is executed once per tick.
//!
//! # Architecture
//!
//! - [`Composite`] - owns blocks in insertion order. Insertion order defines the
//!   node numbering the planner works on.
//! - [`BlockSystem`] - adds connections and external input/output aliases on top
//!   of a [`Composite`], validates every mutation, and marks its schedule stale.
//! - [`planner`] - condensed block-level graph in, [`EvaluationPlan`] out:
//!   feedback edges found by depth-first traversal are cut, the acyclic rest is
//!   ordered with a depth-first emit.
//! - [`CompiledSchedule`] - the order expanded into [`ProcessStep`]s. Propagation
//!   steps cover *every* connection, including the ones cut for ordering.
//!
//! # Ordering vs. Propagation
//!
//! Two logically separate edge sets are derived from one connection list:
//!
//! | Edge set | Contents | Used for |
//! |----------|----------|----------|
//! | ordering | connections minus feedback edges | [`planner::topological_order`] only |
//! | propagation | all connections | `Propagate` steps every tick |
//!
//! Using the cut graph for propagation would silently break feedback effects;
//! using the full graph for ordering would be unorderable.
//!
//! # Threading
//!
//! Mutation and evaluation both take `&mut self`, so they cannot overlap within
//! one owner. To change topology while a real-time callback is running, build
//! and [`prepare`](BlockSystem::prepare) a new system on the control thread and
//! hand the whole system over (see `blockwork-io`'s `SystemEngine`).

pub mod composite;
pub mod connection;
pub mod planner;
pub mod port;
pub mod schedule;
pub mod system;

pub use composite::Composite;
pub use connection::Connection;
pub use planner::{EvaluationPlan, FeedbackEdge};
pub use port::{BlockId, PortDirection, PortRef};
pub use schedule::{CompiledSchedule, ProcessStep};
pub use system::BlockSystem;
