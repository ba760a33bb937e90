//! Describe the echo patch topology.

use crate::preset::EchoArgs;
use blockwork_blocks::{Delay, echo_patch};
use blockwork_core::{Block, BlockId, BlockSystem, PortDirection, PortRef};
use clap::Args;

/// Show the blocks, connections and evaluation plan of the echo patch.
#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    echo: EchoArgs,

    /// Sample rate used to size the delay line
    #[arg(long, default_value = "48000")]
    sample_rate: u32,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let preset = args.echo.resolve()?;
    let params = preset.params();
    let sample_rate = args.sample_rate as f32;
    let mut system = echo_patch(&params, sample_rate)?;

    println!("Patch:       {}", preset.name.as_deref().unwrap_or(system.name()));
    if let Some(description) = &preset.description {
        println!("Description: {description}");
    }
    println!(
        "Parameters:  dry {:.2}, wet {:.2}, feedback {:.2}",
        params.dry, params.wet, params.feedback
    );
    println!(
        "Delay:       {:.3}s = {} samples at {} Hz",
        params.time,
        Delay::new(params.time, sample_rate).delay_samples(),
        args.sample_rate
    );
    println!(
        "Size:        {} blocks, {} connections",
        system.block_count(),
        system.connection_count()
    );

    let order = system.evaluation_order().to_vec();
    println!("\nEvaluation order:");
    for (i, &id) in order.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, block_name(&system, id));
    }

    let feedback = system.feedback_connections().to_vec();
    println!("\nConnections:");
    for connection in system.connections() {
        let marker = if feedback.contains(connection) {
            "  (feedback)"
        } else {
            ""
        };
        println!(
            "  {} -> {}{marker}",
            port_label(&system, connection.source),
            port_label(&system, connection.target)
        );
    }

    println!("\nExternal ports:");
    for (i, &port) in system.input_aliases().iter().enumerate() {
        println!("  in[{i}]  = {}", port_label(&system, port));
    }
    for (i, &port) in system.output_aliases().iter().enumerate() {
        println!("  out[{i}] = {}", port_label(&system, port));
    }

    Ok(())
}

fn block_name(system: &BlockSystem, id: BlockId) -> String {
    system
        .block(id)
        .map_or_else(|| id.to_string(), |block| block.name().to_string())
}

fn port_label(system: &BlockSystem, port: PortRef) -> String {
    let side = match port.direction {
        PortDirection::Input => "in",
        PortDirection::Output => "out",
    };
    format!("{}.{side}{}", block_name(system, port.block), port.index)
}
