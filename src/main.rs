//! # Arm Teleop
//!
//! Drive a robotic arm's end effector and gripper from a gamepad.
//!
//! This application reads gamepad samples (from evdev or JSON lines on
//! stdin) and publishes smoothed velocity commands and gripper commands as
//! JSON lines.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use arm_teleop::config::{Config, InputConfig, LoggingConfig};
use arm_teleop::controller::gamepad::Gamepad;
use arm_teleop::controller::joy_message::forward_lines;
use arm_teleop::controller::JoySample;
use arm_teleop::output::open_sink;
use arm_teleop::session::{RunExit, Session};
use arm_teleop::teleop::InputMapper;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// How long blocking input readers get to finish after shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

/// Main entry point for Arm Teleop
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or `config/default.toml`)
///    - Set up logging to stderr, plus rolling files when configured
///    - Start the input reader and open the command sink
///
/// 2. **Main Loop**
///    - Map every sample and publish its commands
///    - Stop on Ctrl+C, end of input or a closed command output
///
/// 3. **Graceful Shutdown**
///    - Log sample totals
///    - Give blocking readers a short grace period, then exit
///
/// The runtime is built by hand so that a reader blocked on the device or
/// on stdin cannot hold up process exit.
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output (stderr):
/// ```text
/// INFO arm_teleop: Arm Teleop v0.1.0 starting...
/// INFO arm_teleop::controller::gamepad: Found gamepad at: /dev/input/event5
/// WARN arm_teleop::teleop::gate: Press L2 and R2 (both triggers) to initialize the gamepad
/// ```
fn main() -> Result<()> {
    let (config, config_path) = load_config()?;
    let _log_guard = init_logging(&config.logging);

    match config_path {
        Some(path) => info!("Loaded configuration from {}", path),
        None => warn!("No config file at {}, using defaults", DEFAULT_CONFIG_PATH),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(run(config));
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

/// Load configuration from the first CLI argument or the default path.
///
/// Returns the path the configuration came from. A missing default file is
/// not an error; built-in defaults are used and no path is returned.
fn load_config() -> Result<(Config, Option<String>)> {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_string(),
        None => return Ok((Config::default(), None)),
    };

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path))?;
    Ok((config, Some(path)))
}

/// Initialize logging. Stdout carries commands, so logs go to stderr.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if config.dir.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.dir, "arm-teleop.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Some(guard)
}

/// Start the configured input reader and return its sample channel.
fn spawn_input(config: &InputConfig) -> Result<mpsc::Receiver<JoySample>> {
    let (tx, rx) = mpsc::channel(config.sample_queue_depth);

    match config.source.as_str() {
        "stdin" => {
            info!("Reading JSON samples from stdin");
            tokio::spawn(async move {
                match forward_lines(BufReader::new(tokio::io::stdin()), tx).await {
                    Ok(count) => info!("Input ended after {} samples", count),
                    Err(e) => error!("Input reader stopped: {}", e),
                }
            });
        }
        _ => {
            let device_path =
                (!config.device_path.is_empty()).then_some(config.device_path.as_str());
            let gamepad = Gamepad::open(device_path).context("Failed to open gamepad")?;
            let deadzone = config.deadzone;

            tokio::task::spawn_blocking(move || {
                if let Err(e) = gamepad.run_blocking(deadzone, tx) {
                    error!("Gamepad reader stopped: {}", e);
                }
            });
        }
    }

    Ok(rx)
}

async fn run(config: Config) -> Result<()> {
    info!("Arm Teleop v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Scales: linear {} m/s, vertical {} m/s, angular {} rad/s",
        config.teleop.linear_scale, config.teleop.vertical_scale, config.teleop.angular_scale
    );

    let mut samples = spawn_input(&config.input)?;
    let sink = open_sink(&config.output).await.context("Failed to open command output")?;
    let mapper = InputMapper::new(&config.teleop, config.output.frame_id.clone());
    let mut session = Session::new(mapper, sink);

    info!("Press Ctrl+C to exit");

    // Main control loop
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match session.run(&mut samples, shutdown).await {
        RunExit::InputClosed => info!("Input closed, shutting down..."),
        RunExit::OutputClosed => warn!("Command output closed, shutting down..."),
        RunExit::Shutdown => info!("Received Ctrl+C, shutting down..."),
    }

    info!(
        "Total samples handled: {} ({} gripper commands)",
        session.samples(),
        session.gripper_commands()
    );

    Ok(())
}
