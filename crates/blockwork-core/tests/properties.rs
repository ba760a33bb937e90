//! Property-based tests for the evaluation planner and block systems.
//!
//! Random graphs (cycles, self-edges and parallel edges included) are planned
//! and checked for the ordering contract: a permutation of all nodes that
//! respects every non-feedback edge.

use blockwork_core::{Block, BlockIo, BlockSystem, Connection, PortRef, planner};
use proptest::prelude::*;

/// Random adjacency list with `n` nodes and arbitrary edges among them.
fn arb_graph(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_nodes).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..4), n))
}

/// Random DAG: edges only go from lower to higher ids.
fn arb_dag(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    arb_graph(max_nodes).prop_map(|graph| {
        graph
            .into_iter()
            .enumerate()
            .map(|(node, targets)| targets.into_iter().filter(|&t| t > node).collect())
            .collect()
    })
}

fn positions(order: &[usize], n: usize) -> Vec<usize> {
    let mut pos = vec![usize::MAX; n];
    for (i, &node) in order.iter().enumerate() {
        pos[node] = i;
    }
    pos
}

struct Pass {
    io: BlockIo,
}

impl Block for Pass {
    fn io(&self) -> &BlockIo {
        &self.io
    }
    fn io_mut(&mut self) -> &mut BlockIo {
        &mut self.io
    }
    fn evaluate(&mut self) {
        let sum: f32 = self.io.inputs().iter().sum();
        self.io.outputs_mut().fill(sum);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The order contains every node exactly once.
    #[test]
    fn order_is_a_permutation(graph in arb_graph(24)) {
        let plan = planner::plan(&graph);
        let mut sorted = plan.order.clone();
        sorted.sort_unstable();
        let expected: Vec<usize> = (0..graph.len()).collect();
        prop_assert_eq!(sorted, expected);
    }

    /// Every edge that survives cutting points forward in the order.
    #[test]
    fn order_respects_kept_edges(graph in arb_graph(24)) {
        let plan = planner::plan(&graph);
        let kept = planner::remove_edges(&graph, &plan.feedback_edges);
        let pos = positions(&plan.order, graph.len());
        for (from, targets) in kept.iter().enumerate() {
            for &to in targets {
                prop_assert!(pos[from] < pos[to], "edge {}->{} violated by {:?}", from, to, plan.order);
            }
        }
    }

    /// Cutting the recorded feedback edges leaves nothing for a second pass to cut.
    #[test]
    fn cut_graph_is_acyclic(graph in arb_graph(24)) {
        let plan = planner::plan(&graph);
        let kept = planner::remove_edges(&graph, &plan.feedback_edges);
        prop_assert!(planner::find_feedback_edges(&kept).is_empty());
    }

    /// Acyclic graphs lose no edges.
    #[test]
    fn dags_have_no_feedback(graph in arb_dag(24)) {
        let plan = planner::plan(&graph);
        prop_assert!(plan.feedback_edges.is_empty());
    }

    /// Planning is deterministic.
    #[test]
    fn planning_is_deterministic(graph in arb_graph(16)) {
        prop_assert_eq!(planner::plan(&graph), planner::plan(&graph));
    }

    /// Adding then removing a connection leaves the system as it was.
    #[test]
    fn connection_round_trip(n in 2usize..8, from in 0usize..8, to in 0usize..8) {
        let (from, to) = (from % n, to % n);
        let mut system = BlockSystem::new();
        let ids: Vec<_> = (0..n)
            .map(|_| system.add_block(Box::new(Pass { io: BlockIo::new(1, 1) })).unwrap())
            .collect();
        let c = Connection::between(ids[from], 0, ids[to], 0);

        system.add_connection(c).unwrap();
        prop_assert!(system.has_connection(c));
        prop_assert!(system.is_port_connected(PortRef::input(ids[to], 0)));
        system.remove_connection(c).unwrap();
        prop_assert!(!system.has_connection(c));
        prop_assert_eq!(system.connection_count(), 0);
        prop_assert!(system.feedback_connections().is_empty());
    }
}
