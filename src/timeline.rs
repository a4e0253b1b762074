//! Word-by-word timeline.
//!
//! The question is revealed one word at a time, then held, then the answer is shown and blinks
//! at growing sizes. The builder walks those phases in order and emits one [`TimelineEntry`] per
//! distinct frame; the assembler later turns entries into video frames.

use serde::Serialize;

use crate::assets::store::{FontRole, TextMeasure};
use crate::config::QuizStyle;
use crate::foundation::core::Millis;
use crate::foundation::error::{QuizError, QuizResult};
use crate::layout::wrap::LineAccumulator;

/// Builder state; every non-terminal phase emits entries tagged with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// One frame per word, showing the text so far.
    Accumulating,
    /// Hold on the full question.
    Pause,
    /// Full question plus the answer.
    Reveal,
    /// Answer drawn at an enlarged size.
    Blink,
    /// Nothing left to emit.
    Done,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Self::Accumulating => Self::Pause,
            Self::Pause => Self::Reveal,
            Self::Reveal => Self::Blink,
            Self::Blink | Self::Done => Self::Done,
        }
    }
}

/// Everything needed to draw one distinct frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSpec {
    /// Question text revealed so far, words joined by single spaces.
    pub question: String,
    /// Index into the job's picture list.
    pub picture: usize,
    /// Whether the answer is drawn.
    pub show_answer: bool,
    /// Answer font size in px.
    pub answer_size: f32,
}

/// How the frames of an entry are obtained.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSource {
    /// Compose a new image.
    Render(FrameSpec),
    /// Reuse the image of the previous entry.
    RepeatPrevious,
}

/// One frame of the timeline and how long it stays on screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineEntry {
    /// Phase that emitted the entry.
    pub phase: Phase,
    /// Display duration.
    pub duration: Millis,
    /// Image to show.
    pub source: FrameSource,
}

/// Ordered frames of a quiz video.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timeline {
    /// Entries in display order.
    pub entries: Vec<TimelineEntry>,
    /// Question lines as wrapped at the end of accumulation.
    pub lines: Vec<String>,
}

impl Timeline {
    /// Sum of all entry durations.
    pub fn total(&self) -> Millis {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Start offset of every entry followed by the total, `entries.len() + 1` values.
    pub fn boundaries(&self) -> Vec<Millis> {
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        let mut t = Millis::ZERO;
        out.push(t);
        for e in &self.entries {
            t += e.duration;
            out.push(t);
        }
        out
    }

    /// The [`FrameSpec`] that produces the image shown during entry `index`.
    ///
    /// `RepeatPrevious` entries resolve to the closest preceding rendered entry.
    pub fn resolve_spec(&self, index: usize) -> Option<&FrameSpec> {
        self.entries
            .get(..=index)?
            .iter()
            .rev()
            .find_map(|e| match &e.source {
                FrameSource::Render(spec) => Some(spec),
                FrameSource::RepeatPrevious => None,
            })
    }
}

/// Picture shown after word `word_index` (0-based).
pub fn picture_after_word(word_index: usize, cycle: usize, picture_count: usize) -> usize {
    (word_index / cycle.max(1) + 1) % picture_count.max(1)
}

/// Enlarged answer size for a blink increment of `percent`.
pub fn blink_size(base: f32, percent: u32) -> f32 {
    (f64::from(base) * (100.0 + f64::from(percent)) / 100.0).floor() as f32
}

/// Build the timeline for `text`.
///
/// Wrapping uses `metrics` with the question font of `style`, so the recorded lines match what
/// the frame layout draws.
#[tracing::instrument(skip(text, style, metrics))]
pub fn build_timeline<M: TextMeasure + ?Sized>(
    text: &str,
    picture_count: usize,
    style: &QuizStyle,
    metrics: &mut M,
) -> QuizResult<Timeline> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Err(QuizError::validation("question text is empty"));
    }
    if picture_count == 0 {
        return Err(QuizError::validation("at least one picture is required"));
    }

    let layout = &style.layout;
    let timing = &style.timing;
    let durations = timing.durations()?;
    let cycle = timing.picture_cycle as usize;
    let max_width = layout.text_width() as f32;

    let mut acc = LineAccumulator::new(max_width);
    let mut entries = Vec::with_capacity(words.len() + 2 + timing.blink_increments.len());
    let mut picture = 0usize;

    let mut phase = Phase::Accumulating;
    while phase != Phase::Done {
        match phase {
            Phase::Accumulating => {
                for (i, word) in words.iter().enumerate() {
                    let placement = acc.push_word(word, |s| {
                        metrics.width(FontRole::Question, layout.text_size, s)
                    })?;
                    picture = picture_after_word(i, cycle, picture_count);
                    tracing::debug!(word, ?placement, picture, "word");
                    entries.push(TimelineEntry {
                        phase,
                        duration: durations.word,
                        source: FrameSource::Render(FrameSpec {
                            question: acc.text_so_far(),
                            picture,
                            show_answer: false,
                            answer_size: layout.answer_size,
                        }),
                    });
                }
            }
            Phase::Pause => entries.push(TimelineEntry {
                phase,
                duration: durations.pause,
                source: FrameSource::RepeatPrevious,
            }),
            Phase::Reveal => entries.push(TimelineEntry {
                phase,
                duration: durations.word + durations.reveal_extra,
                source: FrameSource::Render(FrameSpec {
                    question: acc.text_so_far(),
                    picture,
                    show_answer: true,
                    answer_size: layout.answer_size,
                }),
            }),
            Phase::Blink => {
                for &p in &timing.blink_increments {
                    entries.push(TimelineEntry {
                        phase,
                        duration: durations.blink,
                        source: FrameSource::Render(FrameSpec {
                            question: acc.text_so_far(),
                            picture,
                            show_answer: true,
                            answer_size: blink_size(layout.answer_size, p),
                        }),
                    });
                }
            }
            Phase::Done => {}
        }
        phase = phase.next();
    }

    let lines = acc.finish();
    for line in &lines {
        let width = metrics.width(FontRole::Question, layout.text_size, line)?;
        if width > max_width {
            tracing::warn!(word = %line, width, max_width, "word is wider than a line");
        }
    }

    let timeline = Timeline { entries, lines };
    tracing::debug!(
        entries = timeline.entries.len(),
        lines = timeline.lines.len(),
        total_ms = timeline.total().0,
        "timeline built"
    );
    Ok(timeline)
}

#[cfg(test)]
#[path = "../tests/unit/timeline.rs"]
mod tests;
