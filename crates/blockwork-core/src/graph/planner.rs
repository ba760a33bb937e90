//! Evaluation planning: feedback-edge detection and topological ordering.
//!
//! The planner works on a condensed block-level graph given as an adjacency
//! list: `graph[u]` holds one entry per connection leaving node `u`, naming the
//! target node. Parallel edges and self-edges are allowed and treated like any
//! other edge.
//!
//! Planning is two passes:
//!
//! 1. [`find_feedback_edges`] - depth-first traversal rooted at node 0, then at
//!    each still-unvisited node in ascending id order. An edge whose target is
//!    on the current DFS stack closes a cycle and is recorded as feedback.
//!    Edges to finished nodes (forward/cross) are left alone.
//! 2. [`topological_order`] - on the graph minus feedback edges. The outer scan
//!    walks ids in ascending order; each ready node is emitted and its children
//!    are emitted depth-first as soon as their in-degree drops to zero, before
//!    the parent's remaining siblings.
//!
//! Both passes use explicit stacks, so long chains cannot overflow the call
//! stack. The planner never fails: a malformed graph (an edge naming a node
//! outside `0..n`) is an internal invariant violation and panics.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// An edge excluded from ordering because it closes a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackEdge {
    /// Source node.
    pub from: usize,
    /// Target node (an ancestor of `from` in the DFS tree, or `from` itself).
    pub to: usize,
    /// Position of the edge in `graph[from]`.
    pub slot: usize,
}

/// Result of planning a condensed graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvaluationPlan {
    /// Every node exactly once, dependencies first.
    pub order: Vec<usize>,
    /// Edges cut before ordering, in discovery order.
    pub feedback_edges: Vec<FeedbackEdge>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnStack,
    Done,
}

/// Plans a condensed graph: cut feedback edges, then order the rest.
///
/// # Example
///
/// ```rust
/// use blockwork_core::planner;
///
/// // 0 -> 1 -> 2 -> 0
/// let graph = vec![vec![1], vec![2], vec![0]];
/// let plan = planner::plan(&graph);
/// assert_eq!(plan.order, vec![0, 1, 2]);
/// assert_eq!(plan.feedback_edges.len(), 1);
/// assert_eq!((plan.feedback_edges[0].from, plan.feedback_edges[0].to), (2, 0));
/// ```
pub fn plan(graph: &[Vec<usize>]) -> EvaluationPlan {
    let feedback_edges = find_feedback_edges(graph);
    let acyclic = remove_edges(graph, &feedback_edges);
    let order = topological_order(&acyclic);
    EvaluationPlan {
        order,
        feedback_edges,
    }
}

/// Finds the edges that close a cycle relative to a depth-first traversal.
///
/// Roots are taken in ascending id order; out-edges are followed in list order.
pub fn find_feedback_edges(graph: &[Vec<usize>]) -> Vec<FeedbackEdge> {
    let n = graph.len();
    let mut state = vec![Visit::Unvisited; n];
    let mut feedback = Vec::new();
    // (node, next slot to inspect)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if state[root] != Visit::Unvisited {
            continue;
        }
        state[root] = Visit::OnStack;
        stack.push((root, 0));

        while let Some(&(node, slot)) = stack.last() {
            let Some(&target) = graph[node].get(slot) else {
                state[node] = Visit::Done;
                stack.pop();
                continue;
            };
            let top = stack.len() - 1;
            stack[top].1 += 1;

            assert!(
                target < n,
                "edge {node}->{target} references a node outside 0..{n}"
            );
            match state[target] {
                Visit::Unvisited => {
                    state[target] = Visit::OnStack;
                    stack.push((target, 0));
                }
                Visit::OnStack => feedback.push(FeedbackEdge {
                    from: node,
                    to: target,
                    slot,
                }),
                Visit::Done => {}
            }
        }
    }

    feedback
}

/// Returns a copy of `graph` without the given edges.
///
/// Edges are matched by `(from, slot)`, so exactly the recorded parallel edge
/// is dropped.
pub fn remove_edges(graph: &[Vec<usize>], edges: &[FeedbackEdge]) -> Vec<Vec<usize>> {
    let mut cut: Vec<Vec<bool>> = graph.iter().map(|e| vec![false; e.len()]).collect();
    for edge in edges {
        cut[edge.from][edge.slot] = true;
    }
    graph
        .iter()
        .zip(&cut)
        .map(|(targets, cut)| {
            targets
                .iter()
                .zip(cut)
                .filter(|&(_, &is_cut)| !is_cut)
                .map(|(&t, _)| t)
                .collect()
        })
        .collect()
}

/// Orders an acyclic graph with an ascending-id outer scan and depth-first emit.
///
/// A node is emitted as soon as its in-degree reaches zero, and its children
/// are considered immediately, before the caller's remaining out-edges.
///
/// # Panics
///
/// Panics if an edge references a node outside `0..graph.len()`. If the graph
/// still contains a cycle, the nodes on it are never emitted; this is caught by
/// a debug assertion.
pub fn topological_order(graph: &[Vec<usize>]) -> Vec<usize> {
    let n = graph.len();
    let mut in_degree = vec![0usize; n];
    for (node, targets) in graph.iter().enumerate() {
        for &target in targets {
            assert!(
                target < n,
                "edge {node}->{target} references a node outside 0..{n}"
            );
            in_degree[target] += 1;
        }
    }

    let mut emitted = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if emitted[root] || in_degree[root] != 0 {
            continue;
        }
        emitted[root] = true;
        order.push(root);
        stack.push((root, 0));

        while let Some(&(node, slot)) = stack.last() {
            let Some(&target) = graph[node].get(slot) else {
                stack.pop();
                continue;
            };
            let top = stack.len() - 1;
            stack[top].1 += 1;

            in_degree[target] -= 1;
            if in_degree[target] == 0 && !emitted[target] {
                emitted[target] = true;
                order.push(target);
                stack.push((target, 0));
            }
        }
    }

    debug_assert_eq!(order.len(), n, "graph passed to topological_order has a cycle");
    order
}
