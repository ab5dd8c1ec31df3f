//! Trait abstraction for command output to enable testing

use async_trait::async_trait;
use serde::Serialize;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::teleop::command::{GripperCommand, VelocityCommand};

/// Destination for the two command channels
#[async_trait]
pub trait CommandSink: Send {
    /// Publish a velocity command
    async fn publish_velocity(&mut self, command: &VelocityCommand) -> io::Result<()>;

    /// Publish a gripper command
    async fn publish_gripper(&mut self, command: &GripperCommand) -> io::Result<()>;
}

#[async_trait]
impl<T: CommandSink + ?Sized> CommandSink for Box<T> {
    async fn publish_velocity(&mut self, command: &VelocityCommand) -> io::Result<()> {
        (**self).publish_velocity(command).await
    }

    async fn publish_gripper(&mut self, command: &GripperCommand) -> io::Result<()> {
        (**self).publish_gripper(command).await
    }
}

/// One output line: the channel name and the command.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    topic: &'a str,
    message: &'a T,
}

/// Encodes one envelope as a newline-terminated JSON line.
fn encode_line<T: Serialize>(topic: &str, message: &T) -> io::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(&Envelope { topic, message })?;
    line.push(b'\n');
    Ok(line)
}

/// Writes commands as JSON lines to any async writer
///
/// Each line looks like:
///
/// ```text
/// {"topic":"/robot/gripper/command","message":{"position":1.0,"max_effort":0.0}}
/// ```
pub struct JsonlSink<W> {
    writer: W,
    twist_topic: String,
    gripper_topic: String,
    lines_written: u64,
}

impl<W> std::fmt::Debug for JsonlSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlSink")
            .field("twist_topic", &self.twist_topic)
            .field("gripper_topic", &self.gripper_topic)
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}

impl<W> JsonlSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(
        writer: W,
        twist_topic: impl Into<String>,
        gripper_topic: impl Into<String>,
    ) -> Self {
        Self {
            writer,
            twist_topic: twist_topic.into(),
            gripper_topic: gripper_topic.into(),
            lines_written: 0,
        }
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Consumes the sink and returns the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line).await?;
        self.writer.flush().await?;
        self.lines_written += 1;
        Ok(())
    }
}

#[async_trait]
impl<W> CommandSink for JsonlSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish_velocity(&mut self, command: &VelocityCommand) -> io::Result<()> {
        let line = encode_line(&self.twist_topic, command)?;
        self.write_line(&line).await
    }

    async fn publish_gripper(&mut self, command: &GripperCommand) -> io::Result<()> {
        let line = encode_line(&self.gripper_topic, command)?;
        self.write_line(&line).await
    }
}
