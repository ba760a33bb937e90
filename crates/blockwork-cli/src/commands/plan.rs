//! Plan an evaluation order for an arbitrary directed graph.
//!
//! Edges are given as `FROM:TO` node indices. Parallel edges and self edges
//! are allowed; every edge the planner cuts to break a cycle is listed as
//! feedback.

use blockwork_core::planner;
use clap::Args;

#[derive(Args)]
pub struct PlanArgs {
    /// Edges as FROM:TO node indices (e.g. 0:1 1:2 2:0)
    #[arg(value_name = "EDGE", value_parser = parse_edge)]
    edges: Vec<(usize, usize)>,

    /// Number of nodes [default: highest index in EDGES + 1]
    #[arg(short, long)]
    nodes: Option<usize>,
}

fn parse_edge(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid edge '{s}' (expected FROM:TO)"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid node '{part}' in edge '{s}': {e}"))
    };
    Ok((parse(from)?, parse(to)?))
}

/// Builds the adjacency list, rejecting edges outside `0..nodes`.
fn adjacency(edges: &[(usize, usize)], nodes: Option<usize>) -> anyhow::Result<Vec<Vec<usize>>> {
    let mut needed = 0;
    for &(from, to) in edges {
        let end = from
            .max(to)
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("edge {from}:{to} names a node index that is too large"))?;
        needed = needed.max(end);
    }
    let nodes = nodes.unwrap_or(needed);
    anyhow::ensure!(
        needed <= nodes,
        "edge references node {} but the graph has {nodes} node(s)",
        needed - 1
    );

    let mut graph = vec![Vec::new(); nodes];
    for &(from, to) in edges {
        graph[from].push(to);
    }
    Ok(graph)
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let graph = adjacency(&args.edges, args.nodes)?;
    let plan = planner::plan(&graph);
    tracing::debug!(?plan, "planned");

    let order: Vec<String> = plan.order.iter().map(ToString::to_string).collect();
    println!("Nodes:    {}", graph.len());
    println!("Edges:    {}", args.edges.len());
    println!("Order:    {}", order.join(" "));
    if plan.feedback_edges.is_empty() {
        println!("Feedback: none");
    } else {
        for (i, edge) in plan.feedback_edges.iter().enumerate() {
            let label = if i == 0 { "Feedback:" } else { "" };
            println!("{label:<9} {} -> {}", edge.from, edge.to);
        }
    }
    Ok(())
}
