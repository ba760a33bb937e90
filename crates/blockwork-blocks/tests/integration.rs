//! End-to-end scenarios for block systems built from the concrete blocks.
//!
//! Covers chained gains, severed and removed connections, cascade on block
//! removal, feedback latency through a delay, idempotent evaluation, and the
//! impulse response of the echo patch.

use blockwork_blocks::{Adder, Delay, EchoParams, Gain, Splitter, echo_patch};
use blockwork_core::{Block, BlockId, BlockSystem, Connection, PortRef};
use proptest::prelude::*;

/// Gains 2, 4, 8 chained 0 → 1 → 2; input on block 0, output on block 2.
fn gain_chain() -> (BlockSystem, [BlockId; 3]) {
    let mut system = BlockSystem::new();
    let ids = [2.0, 4.0, 8.0].map(|g| system.add_block(Box::new(Gain::new(g))).unwrap());
    system
        .add_connection(Connection::between(ids[0], 0, ids[1], 0))
        .unwrap();
    system
        .add_connection(Connection::between(ids[1], 0, ids[2], 0))
        .unwrap();
    system.add_input(PortRef::input(ids[0], 0)).unwrap();
    system.add_output(PortRef::output(ids[2], 0)).unwrap();
    (system, ids)
}

fn tick(system: &mut BlockSystem, x: f32) -> f32 {
    system.set_input(x, 0).unwrap();
    system.evaluate();
    system.output(0).unwrap()
}

// ============================================================================
// Chains
// ============================================================================

#[test]
fn straight_chain() {
    let (mut system, _) = gain_chain();
    assert_eq!(tick(&mut system, 1.0), 64.0);
}

#[test]
fn severed_chain_outputs_zero() {
    let (mut system, [_, b, c]) = gain_chain();
    system
        .remove_connection(Connection::between(b, 0, c, 0))
        .unwrap();
    assert_eq!(tick(&mut system, 1.0), 0.0);
}

#[test]
fn removing_middle_block_cascades() {
    let (mut system, [a, b, c]) = gain_chain();
    system.remove_block(b).unwrap();

    assert!(!system.has_block(b));
    assert!(!system.has_connection(Connection::between(a, 0, b, 0)));
    assert!(!system.has_connection(Connection::between(b, 0, c, 0)));
    assert_eq!(tick(&mut system, 1.0), 0.0);

    // Reconnecting the ends restores a signal path (2 * 8).
    system
        .add_connection(Connection::between(a, 0, c, 0))
        .unwrap();
    assert_eq!(tick(&mut system, 1.0), 16.0);
}

#[test]
fn removed_connection_freezes_target_input() {
    let (mut system, [_, b, c]) = gain_chain();
    assert_eq!(tick(&mut system, 1.0), 64.0);

    system
        .remove_connection(Connection::between(b, 0, c, 0))
        .unwrap();
    // c keeps the last value it was given.
    assert_eq!(tick(&mut system, 0.5), 64.0);
    assert_eq!(tick(&mut system, 0.25), 64.0);
}

#[test]
fn evaluation_is_idempotent() {
    let (mut system, _) = gain_chain();
    let first = tick(&mut system, 0.3);
    system.evaluate();
    assert_eq!(system.output(0).unwrap(), first);
}

#[test]
fn splitter_fans_out_to_independent_paths() {
    let mut system = BlockSystem::new();
    let split = system.add_block(Box::new(Splitter::new(2))).unwrap();
    let up = system.add_block(Box::new(Gain::new(3.0))).unwrap();
    let down = system.add_block(Box::new(Gain::new(-1.0))).unwrap();
    let sum = system.add_block(Box::new(Adder::new(2))).unwrap();
    system.add_connection(Connection::between(split, 0, up, 0)).unwrap();
    system.add_connection(Connection::between(split, 1, down, 0)).unwrap();
    system.add_connection(Connection::between(up, 0, sum, 0)).unwrap();
    system.add_connection(Connection::between(down, 0, sum, 1)).unwrap();
    system.add_input(PortRef::input(split, 0)).unwrap();
    system.add_output(PortRef::output(sum, 0)).unwrap();

    assert_eq!(system.evaluation_order(), &[split, up, down, sum]);
    assert_eq!(tick(&mut system, 1.0), 2.0);
}

// ============================================================================
// Feedback
// ============================================================================

/// in → Gain(g) → Delay → out, with the delay output added back into the
/// gain's input through an adder.
fn feedback_loop(g: f32, delay_time: f32, sample_rate: f32) -> BlockSystem {
    let mut system = BlockSystem::new();
    let sum = system.add_block(Box::new(Adder::new(2))).unwrap();
    let gain = system.add_block(Box::new(Gain::new(g))).unwrap();
    let delay = system
        .add_block(Box::new(Delay::new(delay_time, sample_rate)))
        .unwrap();
    let split = system.add_block(Box::new(Splitter::new(2))).unwrap();

    system.add_connection(Connection::between(sum, 0, gain, 0)).unwrap();
    system.add_connection(Connection::between(gain, 0, delay, 0)).unwrap();
    system.add_connection(Connection::between(delay, 0, split, 0)).unwrap();
    system.add_connection(Connection::between(split, 1, sum, 1)).unwrap();
    system.add_input(PortRef::input(sum, 0)).unwrap();
    system.add_output(PortRef::output(split, 0)).unwrap();
    system
}

#[test]
fn feedback_contribution_arrives_one_tick_later() {
    // Zero-sample delay: the only latency in the loop is the feedback edge.
    let mut system = feedback_loop(0.5, 0.0, 48_000.0);
    assert_eq!(system.feedback_connections().len(), 1);

    let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0]
        .iter()
        .map(|&x| tick(&mut system, x))
        .collect();
    // Direct path at tick 0, each fed-back contribution one tick later.
    assert_eq!(out, vec![0.5, 0.25, 0.125, 0.0625]);
}

#[test]
fn feedback_through_a_delay_line() {
    // 2-sample delay: repeats every 3 ticks.
    let mut system = feedback_loop(0.5, 0.5, 4.0);
    let mut input = vec![0.0; 10];
    input[0] = 1.0;
    let out: Vec<f32> = input.iter().map(|&x| tick(&mut system, x)).collect();
    assert_eq!(
        out,
        vec![0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.0, 0.0, 0.125, 0.0]
    );
}

// ============================================================================
// Echo patch
// ============================================================================

#[test]
fn echo_impulse_response() {
    // 10-sample delay at 40 Hz.
    let params = EchoParams {
        time: 0.25,
        ..EchoParams::default()
    };
    let mut echo = echo_patch(&params, 40.0).unwrap();

    let mut out = Vec::new();
    out.push(tick(&mut echo, 1.0));
    for _ in 0..30 {
        out.push(tick(&mut echo, 0.0));
    }

    let close = |a: f32, b: f32| (a - b).abs() < 1e-6;
    assert!(close(out[0], 0.6), "dry path: {}", out[0]);
    assert!(close(out[10], 0.4), "first repeat: {}", out[10]);
    assert!(close(out[21], 0.4 * 0.3), "second repeat: {}", out[21]);
    for (i, &y) in out.iter().enumerate() {
        if ![0, 10, 21].contains(&i) {
            assert!(close(y, 0.0), "unexpected output {y} at sample {i}");
        }
    }
}

#[test]
fn echo_reset_silences_tail() {
    let params = EchoParams {
        time: 0.25,
        ..EchoParams::default()
    };
    let mut echo = echo_patch(&params, 40.0).unwrap();
    tick(&mut echo, 1.0);
    echo.reset();
    for _ in 0..30 {
        assert_eq!(tick(&mut echo, 0.0), 0.0);
    }
}

proptest! {
    /// With feedback below unity the echo stays bounded for bounded input.
    #[test]
    fn echo_output_is_bounded(
        feedback in 0.0f32..0.95,
        input in prop::collection::vec(-1.0f32..=1.0, 64),
    ) {
        let params = EchoParams { feedback, time: 0.1, ..EchoParams::default() };
        let mut echo = echo_patch(&params, 100.0).unwrap();
        for &x in &input {
            let y = tick(&mut echo, x);
            prop_assert!(y.is_finite());
            prop_assert!(y.abs() <= 0.6 + 0.4 / (1.0 - feedback) + 1e-3, "output {} out of bounds", y);
        }
    }
}
