//! # JSON Joy Message Source
//!
//! Reads gamepad samples as JSON lines, one object per device report:
//!
//! ```text
//! {"axes":[0.0,0.0,1.0,0.0,0.0,1.0,0.0,0.0],"buttons":[0,1,0,0,0,0,0,0,0,0,0]}
//! ```
//!
//! This is the shape a joystick driver bridge emits, and it lets recorded
//! sessions be replayed through the mapper without hardware.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::sample::JoySample;
use crate::error::Result;

/// One joystick report as produced by a driver.
#[derive(Debug, Clone, Deserialize)]
pub struct JoyMessage {
    pub axes: Vec<f32>,
    /// Buttons as integers, non-zero = pressed.
    pub buttons: Vec<i32>,
}

impl JoyMessage {
    /// Converts the message into a fixed-shape sample.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSample` when the message is shorter than the
    /// device report.
    pub fn into_sample(self, stamp: DateTime<Utc>) -> Result<JoySample> {
        let buttons: Vec<bool> = self.buttons.iter().map(|&b| b != 0).collect();
        JoySample::from_slices(&self.axes, &buttons, stamp)
    }
}

/// Parses one JSON line into a sample stamped with `stamp`.
///
/// # Examples
///
/// ```
/// use arm_teleop::controller::joy_message::parse_line;
///
/// let line = r#"{"axes":[0,0,0,0,0,0,0,0],"buttons":[0,1,0,0,0,0,0,0,0,0,0]}"#;
/// let sample = parse_line(line, chrono::Utc::now())?;
/// assert!(sample.buttons[1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_line(line: &str, stamp: DateTime<Utc>) -> Result<JoySample> {
    let message: JoyMessage = serde_json::from_str(line)?;
    message.into_sample(stamp)
}

/// Forwards every valid line of `reader` to `tx` until EOF or until the
/// receiver is dropped. Malformed lines are logged and skipped.
///
/// Returns the number of samples forwarded.
pub async fn forward_lines<R>(reader: R, tx: mpsc::Sender<JoySample>) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line, Utc::now()) {
            Ok(sample) => {
                if tx.send(sample).await.is_err() {
                    debug!("Sample receiver closed, stopping line reader");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => warn!("Dropping input line: {}", e),
        }
    }

    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeleopError;

    const VALID: &str = r#"{"axes":[0.5,0,0,0,0,0,0,0],"buttons":[0,1,0,0,0,0,0,0,0,0,0]}"#;

    #[test]
    fn test_parse_valid_line() {
        let sample = parse_line(VALID, Utc::now()).unwrap();
        assert_eq!(sample.axes[0], 0.5);
        assert!(!sample.buttons[0]);
        assert!(sample.buttons[1]);
    }

    #[test]
    fn test_parse_short_line() {
        let line = r#"{"axes":[0,0,0],"buttons":[0,0,0,0,0,0,0,0,0,0,0]}"#;
        let result = parse_line(line, Utc::now());
        assert!(matches!(result, Err(TeleopError::MalformedSample { axes: 3, .. })));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_line("not json", Utc::now());
        assert!(matches!(result, Err(TeleopError::Json(_))));
    }

    #[tokio::test]
    async fn test_forward_lines_skips_bad_input() {
        let input = format!("{}\n\nbroken\n{}\n", VALID, VALID);
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = forward_lines(input.as_bytes(), tx).await.unwrap();
        assert_eq!(forwarded, 2);

        let mut received = 0;
        while let Some(sample) = rx.recv().await {
            assert!(sample.buttons[1]);
            received += 1;
        }
        assert_eq!(received, 2);
    }

    #[tokio::test]
    async fn test_forward_lines_stops_when_receiver_dropped() {
        let input = format!("{}\n{}\n", VALID, VALID);
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let forwarded = forward_lines(input.as_bytes(), tx).await.unwrap();
        assert_eq!(forwarded, 0);
    }
}
