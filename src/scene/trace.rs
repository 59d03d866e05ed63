use crate::foundation::core::Fps;
use crate::foundation::error::{MotionError, MotionResult};
use crate::signal::env::EnvEvent;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Recorded environment events, replayed in order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventTrace {
    /// Events in dispatch order.
    pub events: Vec<EnvEvent>,
}

impl EventTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a trace from any reader (JSON).
    pub fn from_reader<R: std::io::Read>(r: R) -> MotionResult<Self> {
        serde_json::from_reader(r).map_err(|e| MotionError::serde(format!("parse trace JSON: {e}")))
    }

    /// Parse a trace from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MotionError::validation(format!("open trace JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Append one event.
    pub fn push(&mut self, event: EnvEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    /// Append `count` frame ticks at `cadence`, starting one frame after `start`.
    ///
    /// Returns the timestamp of the last tick.
    pub fn push_frames(&mut self, start: f64, cadence: Fps, count: u64) -> f64 {
        let mut at = start;
        for i in 1..=count {
            at = start + cadence.frames_to_secs(i);
            self.events.push(EnvEvent::Frame { at });
        }
        at
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the trace holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of frame ticks.
    pub fn frame_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EnvEvent::Frame { .. }))
            .count()
    }

    /// Reject non-finite timestamps and time going backwards.
    pub fn validate(&self) -> MotionResult<()> {
        let mut last = f64::NEG_INFINITY;
        for (idx, event) in self.events.iter().enumerate() {
            let at = event.at();
            if !at.is_finite() {
                return Err(MotionError::validation(format!(
                    "trace event {idx} has a non-finite timestamp"
                )));
            }
            if at < last {
                return Err(MotionError::validation(format!(
                    "trace event {idx} at {at} precedes the previous event at {last}"
                )));
            }
            last = at;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/trace.rs"]
mod tests;
