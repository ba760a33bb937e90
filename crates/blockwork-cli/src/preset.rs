//! Echo preset files and command-line overrides.
//!
//! A preset is a TOML file with any subset of the echo parameters:
//!
//! ```toml
//! name = "slapback"
//! dry = 0.8
//! wet = 0.5
//! feedback = 0.1
//! time = 0.12
//! ```
//!
//! Missing keys take the defaults of [`EchoParams`]; flags given on the
//! command line win over both.

use anyhow::Context;
use blockwork_blocks::EchoParams;
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Echo preset file format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EchoPreset {
    /// Name of the preset
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Dry (direct) gain
    pub dry: f32,
    /// Wet (delayed) gain
    pub wet: f32,
    /// Feedback gain around the delay
    pub feedback: f32,
    /// Delay time in seconds
    pub time: f32,
}

impl Default for EchoPreset {
    fn default() -> Self {
        let params = EchoParams::default();
        Self {
            name: None,
            description: None,
            dry: params.dry,
            wet: params.wet,
            feedback: params.feedback,
            time: params.time,
        }
    }
}

impl EchoPreset {
    /// Loads a preset from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display()))?;
        let preset: Self = toml::from_str(&content)
            .with_context(|| format!("parsing preset {}", path.display()))?;
        tracing::debug!(?preset, "loaded preset");
        Ok(preset)
    }

    /// Checks the parameters describe a usable echo.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [
            ("dry", self.dry),
            ("wet", self.wet),
            ("feedback", self.feedback),
            ("time", self.time),
        ] {
            anyhow::ensure!(value.is_finite(), "{key} must be finite, got {value}");
        }
        anyhow::ensure!(self.time >= 0.0, "time must be >= 0, got {}", self.time);
        if self.feedback.abs() >= 1.0 {
            tracing::warn!(
                feedback = self.feedback,
                "feedback magnitude >= 1, the echo will not decay"
            );
        }
        Ok(())
    }

    /// Parameters for [`echo_patch`](blockwork_blocks::echo_patch).
    pub fn params(&self) -> EchoParams {
        EchoParams {
            dry: self.dry,
            wet: self.wet,
            feedback: self.feedback,
            time: self.time,
        }
    }
}

/// Echo parameter flags shared by commands that build the echo patch.
#[derive(Args, Debug, Default)]
pub struct EchoArgs {
    /// Preset file (TOML)
    #[arg(short, long)]
    pub preset: Option<PathBuf>,

    /// Dry gain [default: 0.6]
    #[arg(long)]
    pub dry: Option<f32>,

    /// Wet gain [default: 0.4]
    #[arg(long)]
    pub wet: Option<f32>,

    /// Feedback gain [default: 0.3]
    #[arg(long)]
    pub feedback: Option<f32>,

    /// Delay time in seconds [default: 0.8]
    #[arg(long)]
    pub time: Option<f32>,
}

impl EchoArgs {
    /// Resolves defaults, the preset file and flag overrides, in that order.
    pub fn resolve(&self) -> anyhow::Result<EchoPreset> {
        let mut preset = match &self.preset {
            Some(path) => EchoPreset::load(path)?,
            None => EchoPreset::default(),
        };
        if let Some(dry) = self.dry {
            preset.dry = dry;
        }
        if let Some(wet) = self.wet {
            preset.wet = wet;
        }
        if let Some(feedback) = self.feedback {
            preset.feedback = feedback;
        }
        if let Some(time) = self.time {
            preset.time = time;
        }
        preset.validate()?;
        Ok(preset)
    }
}
