//! Render a WAV file through the echo patch.

use crate::preset::EchoArgs;
use blockwork_blocks::echo_patch;
use blockwork_io::{
    AudioBackend, BackendStreamConfig, OfflineBackend, SystemEngine, WavFormat, WavSpec,
    read_wav, write_wav,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    echo: EchoArgs,

    /// Seconds of silence appended so the echo can ring out
    #[arg(long, default_value = "0")]
    tail: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "unsupported bit depth {} (expected 16, 24, or 32)",
        args.bit_depth
    );
    anyhow::ensure!(
        args.tail.is_finite() && args.tail >= 0.0,
        "tail must be >= 0 seconds, got {}",
        args.tail
    );

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );

    let preset = args.echo.resolve()?;
    if let Some(name) = &preset.name {
        println!("Preset: {name}");
    }
    let params = preset.params();
    println!(
        "Echo: dry {:.2}, wet {:.2}, feedback {:.2}, time {:.3}s",
        params.dry, params.wet, params.feedback, params.time
    );

    let echo = echo_patch(&params, sample_rate)?;
    let (mut engine, _sender) = SystemEngine::new(echo);

    let tail_samples = (args.tail * sample_rate) as usize;
    let mut backend = OfflineBackend::new(samples).with_tail(tail_samples);
    let config = BackendStreamConfig {
        sample_rate: spec.sample_rate,
        buffer_size: args.block_size,
    };
    backend.run(&config, &mut |input, output| {
        engine.process_buffer(input, output);
    })?;
    tracing::info!(buffers = backend.buffers_processed(), "render complete");

    let output = backend.into_output();
    println!("Output peak: {:.1} dB", linear_to_db(peak(&output)));

    let out_spec = WavSpec {
        channels: 1,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
        format: if args.bit_depth == 32 {
            WavFormat::IeeeFloat
        } else {
            WavFormat::Pcm
        },
    };
    println!("Writing {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
