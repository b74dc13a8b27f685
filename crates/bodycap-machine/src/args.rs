use bodycap_core::{
    config::{CaptureConfig, JointColumns},
    error::ConfigError,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Record tracked skeleton joints to CSV", long_about = None)]
pub struct Args {
    /// JSON capture config; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds between samples
    #[arg(short, long)]
    pub interval: Option<f64>,

    /// Total recording time in seconds
    #[arg(short = 'D', long)]
    pub duration: Option<f64>,

    /// Countdown before recording, in seconds
    #[arg(long)]
    pub countdown: Option<u32>,

    /// Detection confidence threshold, 1 to 100
    #[arg(long)]
    pub confidence: Option<u8>,

    /// Write x, y and z of every joint to separate columns
    #[arg(long, default_value_t = false)]
    pub split_joints: bool,

    /// Record a synthetic subject instead of opening the camera
    #[arg(short, long, default_value_t = false)]
    pub simulate: bool,

    /// Print the effective config as JSON and exit
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Whether to use tracing
    #[arg(short, long, default_value_t = false)]
    pub tracing: bool,
}

impl Args {
    /// Config file (or defaults) with the command line applied on top, validated.
    pub fn resolve(&self) -> Result<CaptureConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => CaptureConfig::load(path)?,
            None => CaptureConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(countdown) = self.countdown {
            config.countdown = countdown;
        }
        if let Some(confidence) = self.confidence {
            config.body_tracking.detection_confidence_threshold = confidence;
        }
        if self.split_joints {
            config.joint_columns = JointColumns::Split;
        }

        config.validate()?;
        Ok(config)
    }
}
