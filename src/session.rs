//! # Teleop Session
//!
//! Connects the mapper to a command sink: every sample is mapped, the
//! gripper command (if any) is published, then the velocity command.
//!
//! A gripper command the sink rejected stays pending and is retried with
//! the next sample, so a button transition is never lost to a write error.

use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::controller::sample::JoySample;
use crate::error::Result;
use crate::output::CommandSink;
use crate::teleop::{GripperCommand, InputMapper};

/// Number of samples between status log messages
pub const LOG_INTERVAL_SAMPLES: u64 = 1000;

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The sample channel closed (device gone or end of input).
    InputClosed,
    /// The command output's reader went away.
    OutputClosed,
    /// The shutdown future completed.
    Shutdown,
}

/// Mapper plus sink, driven one sample at a time.
pub struct Session<S> {
    mapper: InputMapper,
    sink: S,
    samples: u64,
    gripper_commands: u64,
    pending_gripper: Option<GripperCommand>,
    was_initialized: bool,
}

impl<S: CommandSink> Session<S> {
    pub fn new(mapper: InputMapper, sink: S) -> Self {
        Self {
            mapper,
            sink,
            samples: 0,
            gripper_commands: 0,
            pending_gripper: None,
            was_initialized: false,
        }
    }

    /// Samples handled so far
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Gripper commands published so far
    pub fn gripper_commands(&self) -> u64 {
        self.gripper_commands
    }

    /// Gripper command still waiting for a successful publish
    pub fn pending_gripper(&self) -> Option<GripperCommand> {
        self.pending_gripper
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Map one sample and publish the resulting commands.
    ///
    /// The velocity command is attempted even when the gripper publish
    /// fails. A newer gripper transition replaces an undelivered one.
    ///
    /// # Errors
    ///
    /// Returns the first `Io` error the sink reported for this sample. The
    /// mapper state has already advanced by then.
    pub async fn handle(&mut self, sample: &JoySample) -> Result<()> {
        let output = self.mapper.process(sample);
        self.samples += 1;

        if !self.was_initialized && self.mapper.is_initialized() {
            info!("Motion output enabled after {} samples", self.samples);
            self.was_initialized = true;
        }

        if output.gripper.is_some() {
            self.pending_gripper = output.gripper;
        }

        let mut first_error = None;
        if let Some(gripper) = self.pending_gripper {
            match self.sink.publish_gripper(&gripper).await {
                Ok(()) => {
                    self.pending_gripper = None;
                    self.gripper_commands += 1;
                }
                Err(e) => first_error = Some(e),
            }
        }

        if let Err(e) = self.sink.publish_velocity(&output.velocity).await {
            first_error.get_or_insert(e);
        }

        if self.samples % LOG_INTERVAL_SAMPLES == 0 {
            info!(
                "Handled {} samples ({} gripper commands)",
                self.samples, self.gripper_commands
            );
        } else {
            debug!(twist = ?output.velocity.twist, "Published velocity");
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Handle samples until the input closes, the output's reader goes
    /// away, or `shutdown` completes.
    ///
    /// Other publish failures are logged at debug level and the next sample
    /// is handled.
    pub async fn run<F>(&mut self, samples: &mut mpsc::Receiver<JoySample>, shutdown: F) -> RunExit
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                next = samples.recv() => {
                    let Some(sample) = next else {
                        return RunExit::InputClosed;
                    };

                    if let Err(e) = self.handle(&sample).await {
                        if e.is_broken_pipe() {
                            return RunExit::OutputClosed;
                        }
                        debug!("Failed to publish commands: {}", e);
                    }
                }

                _ = &mut shutdown => return RunExit::Shutdown,
            }
        }
    }
}
