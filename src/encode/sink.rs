use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::backend::FrameRGBA;

/// What a [`FrameSink`] is told before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Frame width in pixels (border included).
    pub width: u32,
    /// Frame height in pixels (border included).
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Exact number of frames that will be pushed.
    pub frame_count: u64,
    /// Soundtrack to mux, if any.
    pub audio: Option<AudioInputConfig>,
}

/// Raw interleaved `f32le` PCM file handed to the encoder.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to the PCM file.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Consumer of rendered video frames.
///
/// `push_frame` is called with strictly increasing, gap-free indices starting at 0.
pub trait FrameSink {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> QuizResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuizResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> QuizResult<()>;
}

/// Sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received in `begin`.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames received so far.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> QuizResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuizResult<()> {
        if self.cfg.is_none() {
            return Err(QuizError::encode("in-memory sink not started"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> QuizResult<()> {
        self.ended = true;
        Ok(())
    }
}
