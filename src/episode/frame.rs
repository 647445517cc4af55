//! Per-tick geometry snapshots for external renderers and replays.

use serde::{Deserialize, Serialize};

use crate::core::{EnvError, Result};
use crate::env::Shape;

/// World geometry after one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Tick that produced this frame (0-indexed).
    pub tick: usize,
    /// Fitness accumulated up to and including this tick.
    pub fitness: f64,
    pub shapes: Vec<Shape>,
}

/// Receives a frame after every stepped tick.
pub trait FrameSink {
    fn record(&mut self, frame: &Frame);
}

/// Collects frames in memory.
///
/// ```
/// use evo_arcade::episode::{Frame, FrameRecorder, FrameSink};
///
/// let mut recorder = FrameRecorder::new(120);
/// recorder.record(&Frame { tick: 0, fitness: 0.0, shapes: Vec::new() });
///
/// let bytes = recorder.to_bytes().unwrap();
/// let restored = FrameRecorder::from_bytes(&bytes).unwrap();
/// assert_eq!(restored.frames().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecorder {
    /// Intended playback rate in frames per second.
    pub frame_rate: u32,
    frames: Vec<Frame>,
}

impl FrameRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate,
            frames: Vec::new(),
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop all frames, keeping the frame rate.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Encode the recording with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EnvError::Encoding(e.to_string()))
    }

    /// Decode a recording produced by [`FrameRecorder::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| EnvError::Encoding(e.to_string()))
    }
}

impl FrameSink for FrameRecorder {
    fn record(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}
