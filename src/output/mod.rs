//! # Output Module
//!
//! Publishes velocity and gripper commands.
//!
//! Commands are written as JSON lines, either to stdout (for piping into a
//! motion bridge) or appended to a file.

pub mod sink;

pub use sink::{CommandSink, JsonlSink};

use tokio::fs::OpenOptions;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::Result;

/// Open the sink described by `config`
///
/// An empty `path` writes to stdout; otherwise the file is created if
/// needed and appended to.
///
/// # Errors
///
/// Returns `Io` error if the output file cannot be opened.
pub async fn open_sink(config: &OutputConfig) -> Result<Box<dyn CommandSink>> {
    if config.path.is_empty() {
        info!("Publishing commands to stdout");
        return Ok(Box::new(JsonlSink::new(
            tokio::io::stdout(),
            config.twist_topic.clone(),
            config.gripper_topic.clone(),
        )));
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .await?;
    info!("Publishing commands to {}", config.path);

    Ok(Box::new(JsonlSink::new(
        file,
        config.twist_topic.clone(),
        config.gripper_topic.clone(),
    )))
}
